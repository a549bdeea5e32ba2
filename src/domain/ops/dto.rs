use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    /// Wake hours in America/New_York, 24-hour clock
    pub times: Vec<u32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleRequest {
    #[validate(custom(function = "validate_hours"))]
    pub times: Vec<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    /// Whether a fallback webhook is configured; the URL is never echoed
    pub configured: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWebhookRequest {
    /// Empty string clears the webhook
    pub webhook_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentLogsResponse {
    pub lines: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TriggerCheckResponse {
    pub started: bool,
    pub owner_id: Option<i64>,
}

fn validate_hours(hours: &Vec<u32>) -> Result<(), ValidationError> {
    if hours.is_empty() {
        return Err(ValidationError::new("schedule_empty"));
    }
    if hours.iter().any(|h| *h > 23) {
        return Err(ValidationError::new("schedule_hour_out_of_range"));
    }
    Ok(())
}
