use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-address snapshot of the BIS counters. One row per address,
/// overwritten on each check; there is no history.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "building_status")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub address: String,
    /// Building Identification Number, scraped lazily from the BIS page
    pub bin: Option<String>,
    pub last_checked: Option<DateTime>,
    pub complaints: i32,
    pub dob_violations: i32,
    pub ecb_violations: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
