//! Per-member shares of an expense.
//!
//! Splits of one expense are expected to add up to its total. That is the
//! expense-entry side's invariant; a mismatch is tolerated here and simply
//! shows up in the group's balance sum.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    ExpenseId, IntegrityIssue, MemberId, Money, RecordRef,
    util::{stored_amount, valid},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRecord {
    pub expense_id: ExpenseId,
    pub member_id: MemberId,
    pub amount: Money,
}

impl SplitRecord {
    pub fn new(expense_id: ExpenseId, member_id: MemberId, amount: Money) -> Self {
        Self {
            expense_id,
            member_id,
            amount,
        }
    }

    pub(crate) fn record_ref(&self) -> RecordRef {
        RecordRef::Split {
            expense_id: self.expense_id.to_string(),
            member_id: self.member_id.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_splits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub expense_id: String,
    pub user_id: String,
    pub amount: String,
    pub percentage: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Expenses,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for SplitRecord {
    type Error = IntegrityIssue;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let record = RecordRef::Split {
            expense_id: model.expense_id.clone(),
            member_id: model.user_id.clone(),
        };
        Ok(Self {
            amount: stored_amount(&record, &model.amount)?,
            expense_id: valid(&record, ExpenseId::new(&model.expense_id))?,
            member_id: valid(&record, MemberId::new(&model.user_id))?,
        })
    }
}
