use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::ErrorResponse;
use crate::utils::BaseResponse;

use super::dto::{
    AssignAddressRequest, CreateOwnerRequest, OwnerAddressesResponse, OwnerListResponse,
    OwnerResponse, UpdateOwnerRequest,
};
use super::service::OwnerService;

/// List all owners
#[utoipa::path(
    get,
    path = "/api/v1/owners",
    responses(
        (status = 200, description = "Owner list", body = OwnerListResponse)
    ),
    tag = "Owners"
)]
pub async fn list_owners(
    State(state): State<AppState>,
) -> Result<Json<BaseResponse<OwnerListResponse>>, AppError> {
    let owners = OwnerService::list_owners(&state.db)
        .await?
        .into_iter()
        .map(OwnerResponse::from)
        .collect();
    Ok(Json(BaseResponse::success(OwnerListResponse { owners })))
}

/// Create an owner
#[utoipa::path(
    post,
    path = "/api/v1/owners",
    request_body = CreateOwnerRequest,
    responses(
        (status = 200, description = "Owner created", body = OwnerResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "Owners"
)]
pub async fn create_owner(
    State(state): State<AppState>,
    Json(req): Json<CreateOwnerRequest>,
) -> Result<Json<BaseResponse<OwnerResponse>>, AppError> {
    req.validate()?;
    let created = OwnerService::create_owner(&state.db, req).await?;
    Ok(Json(BaseResponse::success(OwnerResponse::from(created))))
}

/// Update an owner's contact fields or schedule
#[utoipa::path(
    patch,
    path = "/api/v1/owners/{id}",
    params(("id" = i64, Path, description = "Owner id")),
    request_body = UpdateOwnerRequest,
    responses(
        (status = 200, description = "Owner updated", body = OwnerResponse),
        (status = 404, description = "Owner not found", body = ErrorResponse)
    ),
    tag = "Owners"
)]
pub async fn update_owner(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateOwnerRequest>,
) -> Result<Json<BaseResponse<OwnerResponse>>, AppError> {
    req.validate()?;
    let updated = OwnerService::update_owner(&state.db, id, req).await?;
    Ok(Json(BaseResponse::success(OwnerResponse::from(updated))))
}

/// List the addresses assigned to an owner
#[utoipa::path(
    get,
    path = "/api/v1/owners/{id}/addresses",
    params(("id" = i64, Path, description = "Owner id")),
    responses(
        (status = 200, description = "Assigned addresses", body = OwnerAddressesResponse),
        (status = 404, description = "Owner not found", body = ErrorResponse)
    ),
    tag = "Owners"
)]
pub async fn owner_addresses(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BaseResponse<OwnerAddressesResponse>>, AppError> {
    OwnerService::get_owner(&state.db, id).await?;
    let addresses = OwnerService::owner_addresses(&state.db, id).await?;
    Ok(Json(BaseResponse::success(OwnerAddressesResponse {
        owner_id: id,
        addresses,
    })))
}

/// Assign an address to an owner
#[utoipa::path(
    post,
    path = "/api/v1/owners/{id}/addresses",
    params(("id" = i64, Path, description = "Owner id")),
    request_body = AssignAddressRequest,
    responses(
        (status = 200, description = "Address assigned", body = OwnerAddressesResponse),
        (status = 404, description = "Owner not found", body = ErrorResponse)
    ),
    tag = "Owners"
)]
pub async fn assign_address(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<AssignAddressRequest>,
) -> Result<Json<BaseResponse<OwnerAddressesResponse>>, AppError> {
    req.validate()?;
    OwnerService::assign_address(&state.db, id, req.address.trim()).await?;
    let addresses = OwnerService::owner_addresses(&state.db, id).await?;
    Ok(Json(BaseResponse::success(OwnerAddressesResponse {
        owner_id: id,
        addresses,
    })))
}

/// Remove an address assignment from an owner
#[utoipa::path(
    delete,
    path = "/api/v1/owners/{id}/addresses",
    params(("id" = i64, Path, description = "Owner id")),
    request_body = AssignAddressRequest,
    responses(
        (status = 200, description = "Address unassigned", body = OwnerAddressesResponse),
        (status = 404, description = "Assignment not found", body = ErrorResponse)
    ),
    tag = "Owners"
)]
pub async fn unassign_address(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<AssignAddressRequest>,
) -> Result<Json<BaseResponse<OwnerAddressesResponse>>, AppError> {
    req.validate()?;
    OwnerService::unassign_address(&state.db, id, req.address.trim()).await?;
    let addresses = OwnerService::owner_addresses(&state.db, id).await?;
    Ok(Json(BaseResponse::success(OwnerAddressesResponse {
        owner_id: id,
        addresses,
    })))
}
