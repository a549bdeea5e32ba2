use serde::Serialize;
use utoipa::ToSchema;

use super::entity::complaint_311;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    pub incident_id: String,
    pub address: Option<String>,
    pub created_date: Option<String>,
    pub complaint_type: Option<String>,
    pub descriptor: Option<String>,
    pub agency: Option<String>,
    pub status: Option<String>,
    pub closed_date: Option<String>,
    pub resolution_description: Option<String>,
}

impl From<complaint_311::Model> for ComplaintResponse {
    fn from(model: complaint_311::Model) -> Self {
        Self {
            incident_id: model.incident_id,
            address: model.address,
            created_date: model.created_date,
            complaint_type: model.complaint_type,
            descriptor: model.descriptor,
            agency: model.agency,
            status: model.status,
            closed_date: model.closed_date,
            resolution_description: model.resolution_description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintListResponse {
    pub address: String,
    pub complaints: Vec<ComplaintResponse>,
}
