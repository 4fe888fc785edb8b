//! Recorded payments between two group members.
//!
//! A settlement is already applied: `from` paid `to`. For balances this means
//! `from` gains `amount` and `to` loses it, the same direction a proposed
//! [`Transfer`](crate::Transfer) cancels debt in.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, GroupId, IntegrityIssue, MemberId, Money, RecordRef, ResultEngine, SettlementId,
    util::{reject, stored_amount, valid},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub id: SettlementId,
    pub group_id: GroupId,
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
}

impl SettlementRecord {
    /// Builds a new settlement with a fresh id.
    pub fn new(
        group_id: GroupId,
        from: MemberId,
        to: MemberId,
        amount: Money,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        validate_settlement(&from, &to, amount)?;
        Ok(Self {
            id: SettlementId::new(Uuid::new_v4().to_string())?,
            group_id,
            from,
            to,
            amount,
            created_at,
        })
    }

    pub(crate) fn record_ref(&self) -> RecordRef {
        RecordRef::Settlement {
            id: self.id.to_string(),
        }
    }
}

/// Rejects non-positive amounts and payments from a member to themselves.
pub(crate) fn validate_settlement(
    from: &MemberId,
    to: &MemberId,
    amount: Money,
) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidTransfer(
            "settlement amount must be > 0".to_string(),
        ));
    }
    if from == to {
        return Err(EngineError::InvalidTransfer(format!(
            "{from} cannot settle with themselves"
        )));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "settlements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Groups,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&SettlementRecord> for ActiveModel {
    fn from(settlement: &SettlementRecord) -> Self {
        Self {
            id: ActiveValue::Set(settlement.id.to_string()),
            group_id: ActiveValue::Set(settlement.group_id.to_string()),
            from_user_id: ActiveValue::Set(settlement.from.to_string()),
            to_user_id: ActiveValue::Set(settlement.to.to_string()),
            amount: ActiveValue::Set(settlement.amount.to_string()),
            created_at: ActiveValue::Set(settlement.created_at),
        }
    }
}

impl TryFrom<Model> for SettlementRecord {
    type Error = IntegrityIssue;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let record = RecordRef::Settlement {
            id: model.id.clone(),
        };
        let amount = stored_amount(&record, &model.amount)?;
        if !amount.is_positive() {
            return Err(reject(&record, "settlement amount must be > 0"));
        }
        Ok(Self {
            id: valid(&record, SettlementId::new(&model.id))?,
            group_id: valid(&record, GroupId::new(&model.group_id))?,
            from: valid(&record, MemberId::new(&model.from_user_id))?,
            to: valid(&record, MemberId::new(&model.to_user_id))?,
            amount,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str) -> MemberId {
        MemberId::new(id).unwrap()
    }

    #[test]
    fn new_rejects_self_and_non_positive() {
        let group = GroupId::new("g").unwrap();
        let now = Utc::now();
        assert!(matches!(
            SettlementRecord::new(group.clone(), member("a"), member("a"), Money::new(100), now),
            Err(EngineError::InvalidTransfer(_))
        ));
        assert!(matches!(
            SettlementRecord::new(group.clone(), member("a"), member("b"), Money::ZERO, now),
            Err(EngineError::InvalidTransfer(_))
        ));
        let ok = SettlementRecord::new(group, member("a"), member("b"), Money::new(100), now)
            .unwrap();
        assert_eq!(ok.amount, Money::new(100));
    }

    #[test]
    fn stored_row_with_text_amount_is_rejected() {
        let model = Model {
            id: "s1".to_string(),
            group_id: "g".to_string(),
            from_user_id: "a".to_string(),
            to_user_id: "b".to_string(),
            amount: "thirty".to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(
            SettlementRecord::try_from(model),
            Err(IntegrityIssue::InvalidAmount {
                record: RecordRef::Settlement {
                    id: "s1".to_string()
                },
                raw: "thirty".to_string(),
            })
        );
    }
}
