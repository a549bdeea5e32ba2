use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::monitor::{CheckRunner, CheckSchedule};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::log_tail;
use crate::utils::logging::MONITOR_LOG_PREFIX;
use crate::utils::response::ErrorResponse;
use crate::utils::BaseResponse;

use super::dto::{
    RecentLogsResponse, ScheduleResponse, TriggerCheckResponse, UpdateScheduleRequest,
    UpdateWebhookRequest, WebhookResponse,
};

const DEFAULT_LOG_LINES: usize = 50;
const MAX_LOG_LINES: usize = 500;

/// Current check schedule
#[utoipa::path(
    get,
    path = "/api/v1/schedule",
    responses(
        (status = 200, description = "Configured wake hours", body = ScheduleResponse)
    ),
    tag = "Ops"
)]
pub async fn get_schedule(
    State(state): State<AppState>,
) -> Result<Json<BaseResponse<ScheduleResponse>>, AppError> {
    let schedule = state.files.load_schedule();
    Ok(Json(BaseResponse::success(ScheduleResponse {
        times: schedule.times().to_vec(),
    })))
}

/// Replace the check schedule
///
/// The monitor picks the new hours up on its next cycle; no restart.
#[utoipa::path(
    put,
    path = "/api/v1/schedule",
    request_body = UpdateScheduleRequest,
    responses(
        (status = 200, description = "Schedule saved", body = ScheduleResponse),
        (status = 400, description = "Invalid hours", body = ErrorResponse)
    ),
    tag = "Ops"
)]
pub async fn put_schedule(
    State(state): State<AppState>,
    Json(req): Json<UpdateScheduleRequest>,
) -> Result<Json<BaseResponse<ScheduleResponse>>, AppError> {
    req.validate()?;
    let schedule = CheckSchedule::new(req.times);
    state.files.save_schedule(&schedule)?;
    info!(times = ?schedule.times(), "Schedule updated");
    Ok(Json(BaseResponse::success(ScheduleResponse {
        times: schedule.times().to_vec(),
    })))
}

/// Whether a fallback webhook is configured
#[utoipa::path(
    get,
    path = "/api/v1/webhook",
    responses(
        (status = 200, description = "Webhook state", body = WebhookResponse)
    ),
    tag = "Ops"
)]
pub async fn get_webhook(
    State(state): State<AppState>,
) -> Result<Json<BaseResponse<WebhookResponse>>, AppError> {
    Ok(Json(BaseResponse::success(WebhookResponse {
        configured: state.files.load_webhook().is_some(),
    })))
}

/// Set or clear the fallback webhook URL
#[utoipa::path(
    put,
    path = "/api/v1/webhook",
    request_body = UpdateWebhookRequest,
    responses(
        (status = 200, description = "Webhook saved", body = WebhookResponse),
        (status = 400, description = "Invalid URL", body = ErrorResponse)
    ),
    tag = "Ops"
)]
pub async fn put_webhook(
    State(state): State<AppState>,
    Json(req): Json<UpdateWebhookRequest>,
) -> Result<Json<BaseResponse<WebhookResponse>>, AppError> {
    let url = req.webhook_url.trim();
    if !url.is_empty() && !url.starts_with("https://") {
        return Err(AppError::bad_request("Webhook URL must use https"));
    }
    state.files.save_webhook(url)?;
    info!(configured = !url.is_empty(), "Fallback webhook updated");
    Ok(Json(BaseResponse::success(WebhookResponse {
        configured: !url.is_empty(),
    })))
}

#[derive(Debug, Deserialize)]
pub struct RecentLogsQuery {
    pub lines: Option<usize>,
}

/// Tail of the monitor daemon's log for today
#[utoipa::path(
    get,
    path = "/api/v1/logs/recent",
    params(("lines" = Option<usize>, Query, description = "Line count, default 50, max 500")),
    responses(
        (status = 200, description = "Recent log lines", body = RecentLogsResponse)
    ),
    tag = "Ops"
)]
pub async fn recent_logs(
    State(state): State<AppState>,
    Query(query): Query<RecentLogsQuery>,
) -> Result<Json<BaseResponse<RecentLogsResponse>>, AppError> {
    let requested = query.lines.unwrap_or(DEFAULT_LOG_LINES).min(MAX_LOG_LINES);
    let lines = log_tail::recent_lines(&state.config.log_dir, MONITOR_LOG_PREFIX, requested)?;
    Ok(Json(BaseResponse::success(RecentLogsResponse { lines })))
}

#[derive(Debug, Deserialize)]
pub struct TriggerCheckQuery {
    pub owner_id: Option<i64>,
}

/// Run a check now
///
/// The pass runs in the background; progress lands in the monitor log
/// and results in the status/complaints endpoints.
#[utoipa::path(
    post,
    path = "/api/v1/checks",
    params(("owner_id" = Option<i64>, Query, description = "Restrict to one owner's addresses")),
    responses(
        (status = 200, description = "Check started", body = TriggerCheckResponse)
    ),
    tag = "Ops"
)]
pub async fn trigger_check(
    State(state): State<AppState>,
    Query(query): Query<TriggerCheckQuery>,
) -> Result<Json<BaseResponse<TriggerCheckResponse>>, AppError> {
    let owner_id = query.owner_id;
    let runner = CheckRunner::new(state.db.clone(), state.config.clone());

    tokio::spawn(async move {
        if let Err(e) = runner.run_check(owner_id).await {
            tracing::error!(error = %e, "Triggered check failed");
        }
    });
    info!(owner_id = ?owner_id, "Check triggered from dashboard");

    Ok(Json(BaseResponse::success_with_message(
        TriggerCheckResponse {
            started: true,
            owner_id,
        },
        "Check started.",
    )))
}
