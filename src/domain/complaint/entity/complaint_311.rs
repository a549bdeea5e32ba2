use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A 311 service request, keyed by the external incident id. Date and
/// coordinate fields are stored exactly as the Open Data API returns
/// them (ISO-8601 strings), which also makes them ordering-safe.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "complaint_311")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub incident_id: String,
    pub address: Option<String>,
    pub borough: Option<String>,
    pub incident_zip: Option<String>,
    pub created_date: Option<String>,
    pub complaint_type: Option<String>,
    pub descriptor: Option<String>,
    pub agency: Option<String>,
    pub status: Option<String>,
    pub closed_date: Option<String>,
    pub resolution_description: Option<String>,
    pub location_type: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
