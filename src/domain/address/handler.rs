use axum::{extract::State, Json};
use tracing::info;
use validator::Validate;

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::ErrorResponse;
use crate::utils::BaseResponse;

use super::dto::{AddAddressRequest, AddressListResponse, RemoveAddressRequest};
use super::parser;

/// List the monitored addresses
#[utoipa::path(
    get,
    path = "/api/v1/addresses",
    responses(
        (status = 200, description = "Monitored address list", body = AddressListResponse)
    ),
    tag = "Addresses"
)]
pub async fn list_addresses(
    State(state): State<AppState>,
) -> Result<Json<BaseResponse<AddressListResponse>>, AppError> {
    let addresses = state.files.load_addresses();
    Ok(Json(BaseResponse::success(AddressListResponse {
        addresses,
    })))
}

/// Add an address to the monitored list
///
/// The address must decompose for both upstreams (BIS and 311) before it
/// is accepted; a line that can never be checked is rejected up front.
#[utoipa::path(
    post,
    path = "/api/v1/addresses",
    request_body = AddAddressRequest,
    responses(
        (status = 200, description = "Address added", body = AddressListResponse),
        (status = 400, description = "Unparseable or duplicate address", body = ErrorResponse)
    ),
    tag = "Addresses"
)]
pub async fn add_address(
    State(state): State<AppState>,
    Json(req): Json<AddAddressRequest>,
) -> Result<Json<BaseResponse<AddressListResponse>>, AppError> {
    req.validate()?;
    let address = req.address.trim().to_string();

    parser::parse_for_bis(&address)?;
    parser::parse_for_311(&address)?;

    let mut addresses = state.files.load_addresses();
    if addresses.iter().any(|a| a == &address) {
        return Err(AppError::bad_request("Address is already monitored"));
    }

    addresses.push(address.clone());
    state.files.save_addresses(&addresses)?;
    info!(address = %address, "Address added to monitored list");

    Ok(Json(BaseResponse::success(AddressListResponse {
        addresses,
    })))
}

/// Remove an address from the monitored list
#[utoipa::path(
    delete,
    path = "/api/v1/addresses",
    request_body = RemoveAddressRequest,
    responses(
        (status = 200, description = "Address removed", body = AddressListResponse),
        (status = 404, description = "Address not monitored", body = ErrorResponse)
    ),
    tag = "Addresses"
)]
pub async fn remove_address(
    State(state): State<AppState>,
    Json(req): Json<RemoveAddressRequest>,
) -> Result<Json<BaseResponse<AddressListResponse>>, AppError> {
    req.validate()?;
    let address = req.address.trim();

    let mut addresses = state.files.load_addresses();
    let before = addresses.len();
    addresses.retain(|a| a != address);
    if addresses.len() == before {
        return Err(AppError::not_found("Address is not monitored"));
    }

    state.files.save_addresses(&addresses)?;
    info!(address = %address, "Address removed from monitored list");

    Ok(Json(BaseResponse::success(AddressListResponse {
        addresses,
    })))
}
