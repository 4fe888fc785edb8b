//! [`LedgerStore`] on top of a sea-orm connection.

use chrono::Utc;
use sea_orm::{DatabaseConnection, QueryFilter, QueryOrder, prelude::*};

use crate::{
    EngineError, ExpenseId, ExpenseRecord, GroupId, LedgerStore, Loaded, Member, MemberId, Money,
    ResultEngine, SettlementRecord, SplitRecord, expense_splits, expenses, group_members, groups,
    settlements, users,
};

#[derive(Clone, Debug)]
pub struct SeaOrmStore {
    database: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    async fn require_group(&self, group_id: &GroupId) -> ResultEngine<groups::Model> {
        groups::Entity::find_by_id(group_id.as_str())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("group {group_id}")))
    }
}

impl LedgerStore for SeaOrmStore {
    async fn fetch_members(&self, group_id: &GroupId) -> ResultEngine<Loaded<Member>> {
        self.require_group(group_id).await?;

        let rows = group_members::Entity::find()
            .filter(group_members::Column::GroupId.eq(group_id.as_str()))
            .order_by_asc(group_members::Column::JoinedAt)
            .order_by_asc(group_members::Column::UserId)
            .find_also_related(users::Entity)
            .all(&self.database)
            .await?;
        Ok(Loaded::from_rows(rows))
    }

    async fn fetch_expenses(&self, group_id: &GroupId) -> ResultEngine<Loaded<ExpenseRecord>> {
        let rows = expenses::Entity::find()
            .filter(expenses::Column::GroupId.eq(group_id.as_str()))
            .order_by_asc(expenses::Column::CreatedAt)
            .order_by_asc(expenses::Column::Id)
            .all(&self.database)
            .await?;
        Ok(Loaded::from_rows(rows))
    }

    async fn fetch_splits(&self, expense_ids: &[ExpenseId]) -> ResultEngine<Loaded<SplitRecord>> {
        if expense_ids.is_empty() {
            return Ok(Loaded::default());
        }

        let rows = expense_splits::Entity::find()
            .filter(
                expense_splits::Column::ExpenseId.is_in(expense_ids.iter().map(ExpenseId::as_str)),
            )
            .order_by_asc(expense_splits::Column::CreatedAt)
            .order_by_asc(expense_splits::Column::Id)
            .all(&self.database)
            .await?;
        Ok(Loaded::from_rows(rows))
    }

    async fn fetch_settlements(
        &self,
        group_id: &GroupId,
    ) -> ResultEngine<Loaded<SettlementRecord>> {
        let rows = settlements::Entity::find()
            .filter(settlements::Column::GroupId.eq(group_id.as_str()))
            .order_by_asc(settlements::Column::CreatedAt)
            .order_by_asc(settlements::Column::Id)
            .all(&self.database)
            .await?;
        Ok(Loaded::from_rows(rows))
    }

    async fn insert_settlement(
        &self,
        group_id: &GroupId,
        from: &MemberId,
        to: &MemberId,
        amount: Money,
    ) -> ResultEngine<SettlementRecord> {
        let settlement = SettlementRecord::new(
            group_id.clone(),
            from.clone(),
            to.clone(),
            amount,
            Utc::now(),
        )?;
        settlements::ActiveModel::from(&settlement)
            .insert(&self.database)
            .await?;
        Ok(settlement)
    }
}
