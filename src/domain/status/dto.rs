use serde::Serialize;
use utoipa::ToSchema;

use super::entity::building_status;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub address: String,
    pub bin: Option<String>,
    /// Local naive timestamp of the last successful check
    pub last_checked: Option<String>,
    pub complaints: i32,
    pub dob_violations: i32,
    pub ecb_violations: i32,
}

impl From<building_status::Model> for StatusResponse {
    fn from(model: building_status::Model) -> Self {
        Self {
            address: model.address,
            bin: model.bin,
            last_checked: model
                .last_checked
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
            complaints: model.complaints,
            dob_violations: model.dob_violations,
            ecb_violations: model.ecb_violations,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusListResponse {
    pub statuses: Vec<StatusResponse>,
}

/// Live violation detail lookup keyed off the stored BIN.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViolationDetailsResponse {
    pub address: String,
    pub bin: String,
    pub dob_violations: Vec<serde_json::Value>,
    pub ecb_violations: Vec<serde_json::Value>,
}
