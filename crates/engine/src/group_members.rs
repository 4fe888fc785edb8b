//! Group memberships and the [`Member`] view built from them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{IntegrityIssue, MemberId, RecordRef, users};

/// A group participant as the balance engine sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub display_name: String,
}

impl Member {
    pub fn new(id: MemberId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "group_members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub user_id: String,
    pub joined_at: DateTimeUtc,
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
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<(Model, Option<users::Model>)> for Member {
    type Error = IntegrityIssue;

    fn try_from((membership, user): (Model, Option<users::Model>)) -> Result<Self, Self::Error> {
        let record = RecordRef::Member {
            id: membership.user_id.clone(),
        };
        let Some(user) = user else {
            return Err(IntegrityIssue::InvalidRecord {
                record,
                reason: "membership without a user row".to_string(),
            });
        };
        let id = MemberId::new(&user.id).map_err(|err| IntegrityIssue::InvalidRecord {
            record,
            reason: err.to_string(),
        })?;
        Ok(Member::new(id, user.name))
    }
}
