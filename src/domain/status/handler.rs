use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::scrape::open_data::OpenDataClient;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::ErrorResponse;
use crate::utils::BaseResponse;

use super::dto::{StatusListResponse, StatusResponse, ViolationDetailsResponse};
use super::service::StatusService;

/// Current snapshot for every checked address
#[utoipa::path(
    get,
    path = "/api/v1/status",
    responses(
        (status = 200, description = "Snapshot per address", body = StatusListResponse)
    ),
    tag = "Status"
)]
pub async fn list_statuses(
    State(state): State<AppState>,
) -> Result<Json<BaseResponse<StatusListResponse>>, AppError> {
    let statuses = StatusService::all_statuses(&state.db)
        .await?
        .into_iter()
        .map(StatusResponse::from)
        .collect();
    Ok(Json(BaseResponse::success(StatusListResponse { statuses })))
}

#[derive(Debug, Deserialize)]
pub struct ViolationQuery {
    pub address: String,
}

/// Live DOB and OATH/ECB violation details for an address
///
/// Requires a stored BIN; the monitor scrapes one the first time it
/// checks the address.
#[utoipa::path(
    get,
    path = "/api/v1/violations",
    params(("address" = String, Query, description = "Monitored address")),
    responses(
        (status = 200, description = "Violation details", body = ViolationDetailsResponse),
        (status = 404, description = "Address unknown or no BIN stored", body = ErrorResponse)
    ),
    tag = "Status"
)]
pub async fn violation_details(
    State(state): State<AppState>,
    Query(query): Query<ViolationQuery>,
) -> Result<Json<BaseResponse<ViolationDetailsResponse>>, AppError> {
    let address = query.address.trim();
    let bin = StatusService::get_bin(&state.db, address)
        .await?
        .ok_or_else(|| AppError::not_found("No BIN stored for this address yet"))?;

    let client = OpenDataClient::new(&state.config.open_data_base_url)?;
    let dob_violations = client.dob_violations_by_bin(&bin).await?;
    let ecb_violations = client.ecb_violations_by_bin(&bin).await?;

    Ok(Json(BaseResponse::success(ViolationDetailsResponse {
        address: address.to_string(),
        bin,
        dob_violations,
        ecb_violations,
    })))
}
