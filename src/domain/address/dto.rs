use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressListResponse {
    pub addresses: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddAddressRequest {
    /// Full display address: `952A Greene Ave, Brooklyn, NY 11221`
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveAddressRequest {
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: String,
}
