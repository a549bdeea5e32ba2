use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

use super::dto::{ComplaintListResponse, ComplaintResponse};
use super::service::ComplaintService;

#[derive(Debug, Deserialize)]
pub struct ComplaintQuery {
    pub address: String,
}

/// Stored 311 complaints for an address, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/complaints",
    params(("address" = String, Query, description = "Monitored address")),
    responses(
        (status = 200, description = "Stored complaints", body = ComplaintListResponse)
    ),
    tag = "Complaints"
)]
pub async fn list_complaints(
    State(state): State<AppState>,
    Query(query): Query<ComplaintQuery>,
) -> Result<Json<BaseResponse<ComplaintListResponse>>, AppError> {
    let address = query.address.trim().to_string();
    let complaints = ComplaintService::for_address(&state.db, &address)
        .await?
        .into_iter()
        .map(ComplaintResponse::from)
        .collect();
    Ok(Json(BaseResponse::success(ComplaintListResponse {
        address,
        complaints,
    })))
}
