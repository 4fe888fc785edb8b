//! Group expenses.
//!
//! Only the payer and the total matter for balances; description and split
//! type belong to the expense-entry side and are not read into the record.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    ExpenseId, IntegrityIssue, MemberId, Money, RecordRef,
    util::{reject, stored_amount, valid},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    pub paid_by: MemberId,
    pub amount: Money,
}

impl ExpenseRecord {
    pub fn new(id: ExpenseId, paid_by: MemberId, amount: Money) -> Self {
        Self {
            id,
            paid_by,
            amount,
        }
    }

    pub(crate) fn record_ref(&self) -> RecordRef {
        RecordRef::Expense {
            id: self.id.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub paid_by: String,
    pub amount: String,
    pub description: String,
    pub split_type: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expense_splits::Entity")]
    ExpenseSplits,
}

impl Related<super::expense_splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseSplits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for ExpenseRecord {
    type Error = IntegrityIssue;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let record = RecordRef::Expense {
            id: model.id.clone(),
        };
        let amount = stored_amount(&record, &model.amount)?;
        if amount.is_negative() {
            return Err(reject(&record, "expense amount must be >= 0"));
        }
        Ok(Self {
            id: valid(&record, ExpenseId::new(&model.id))?,
            paid_by: valid(&record, MemberId::new(&model.paid_by))?,
            amount,
        })
    }
}
