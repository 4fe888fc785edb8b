//! Balance engine for expense-sharing groups.
//!
//! Given the members of a group and its expenses, splits and recorded
//! settlements, the engine computes each member's net balance
//! ([`compute_net_balances`]) and a short list of direct payments that would
//! settle everyone ([`simplify_debts`]). All amounts are integer minor units
//! ([`Money`]).
//!
//! Records come from a [`LedgerStore`]; [`SeaOrmStore`] reads the tables
//! created by the `migration` crate. [`BalanceService`] ties the two together
//! and emits a refresh signal after every settlement it records.

pub use balances::{BalanceStatus, NetBalance, NetBalances, compute_net_balances};
pub use error::EngineError;
pub use expense_splits::SplitRecord;
pub use expenses::ExpenseRecord;
pub use group_members::Member;
pub use ids::{ExpenseId, GroupId, MemberId, SettlementId};
pub use integrity::{IntegrityIssue, RecordRef};
pub use money::{EPSILON, Money};
pub use sea_store::SeaOrmStore;
pub use service::{BalanceService, BalanceServiceBuilder, GroupBalances};
pub use settlements::SettlementRecord;
pub use simplify::{Transfer, apply_transfers, simplify_debts};
pub use store::{LedgerStore, Loaded};

mod balances;
mod error;
mod expense_splits;
mod expenses;
mod group_members;
mod groups;
mod ids;
mod integrity;
mod money;
mod sea_store;
mod service;
mod settlements;
mod simplify;
mod store;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
