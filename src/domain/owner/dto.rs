use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::entity::owner;
use super::service::OwnerService;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerResponse {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Webhook configured flag only; the URL itself is never echoed back
    pub has_discord_webhook: bool,
    pub schedule: Vec<u32>,
}

impl From<owner::Model> for OwnerResponse {
    fn from(model: owner::Model) -> Self {
        let schedule = OwnerService::decode_schedule(&model.schedule);
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            has_discord_webhook: model
                .discord_webhook
                .as_deref()
                .is_some_and(|w| !w.is_empty()),
            schedule,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerListResponse {
    pub owners: Vec<OwnerResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerAddressesResponse {
    pub owner_id: i64,
    pub addresses: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOwnerRequest {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(url(message = "invalid webhook URL"))]
    pub discord_webhook: Option<String>,
    #[validate(custom(function = "validate_schedule_hours"))]
    pub schedule: Option<Vec<u32>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOwnerRequest {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(url(message = "invalid webhook URL"))]
    pub discord_webhook: Option<String>,
    #[validate(custom(function = "validate_schedule_hours"))]
    pub schedule: Option<Vec<u32>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignAddressRequest {
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: String,
}

fn validate_schedule_hours(hours: &Vec<u32>) -> Result<(), ValidationError> {
    if hours.is_empty() {
        return Err(ValidationError::new("schedule_empty"));
    }
    if hours.iter().any(|h| *h > 23) {
        return Err(ValidationError::new("schedule_hour_out_of_range"));
    }
    Ok(())
}
