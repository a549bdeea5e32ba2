use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contact record associated with one or more monitored addresses.
/// `schedule` holds a JSON-encoded list of check hours.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "owner")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub discord_webhook: Option<String>,
    #[sea_orm(default_value = "[8, 12, 20]")]
    pub schedule: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::address_owner::Entity")]
    AddressOwner,
}

impl Related<super::address_owner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AddressOwner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
