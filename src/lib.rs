pub mod config;
pub mod domain;
pub mod monitor;
pub mod notify;
pub mod scrape;
pub mod state;
pub mod utils;

use axum::{
    routing::{get, patch, post},
    Router,
};
use state::AppState;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        domain::status::handler::list_statuses,
        domain::status::handler::violation_details,
        domain::address::handler::list_addresses,
        domain::address::handler::add_address,
        domain::address::handler::remove_address,
        domain::complaint::handler::list_complaints,
        domain::owner::handler::list_owners,
        domain::owner::handler::create_owner,
        domain::owner::handler::update_owner,
        domain::owner::handler::owner_addresses,
        domain::owner::handler::assign_address,
        domain::owner::handler::unassign_address,
        domain::ops::handler::get_schedule,
        domain::ops::handler::put_schedule,
        domain::ops::handler::get_webhook,
        domain::ops::handler::put_webhook,
        domain::ops::handler::recent_logs,
        domain::ops::handler::trigger_check,
    ),
    components(
        schemas(
            domain::status::dto::StatusResponse,
            domain::status::dto::StatusListResponse,
            domain::status::dto::ViolationDetailsResponse,
            domain::address::dto::AddressListResponse,
            domain::address::dto::AddAddressRequest,
            domain::address::dto::RemoveAddressRequest,
            domain::complaint::dto::ComplaintResponse,
            domain::complaint::dto::ComplaintListResponse,
            domain::owner::dto::OwnerResponse,
            domain::owner::dto::OwnerListResponse,
            domain::owner::dto::OwnerAddressesResponse,
            domain::owner::dto::CreateOwnerRequest,
            domain::owner::dto::UpdateOwnerRequest,
            domain::owner::dto::AssignAddressRequest,
            domain::ops::dto::ScheduleResponse,
            domain::ops::dto::UpdateScheduleRequest,
            domain::ops::dto::WebhookResponse,
            domain::ops::dto::UpdateWebhookRequest,
            domain::ops::dto::RecentLogsResponse,
            domain::ops::dto::TriggerCheckResponse,
            utils::response::ErrorResponse,
        )
    ),
    tags(
        (name = "Status", description = "Per-address snapshots and violation details"),
        (name = "Addresses", description = "Monitored address list"),
        (name = "Complaints", description = "Stored 311 complaints"),
        (name = "Owners", description = "Owner records and address assignments"),
        (name = "Ops", description = "Schedule, webhook, logs and manual checks")
    )
)]
pub struct ApiDoc;

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(|| async { "OK" }))
        .route("/api/v1/status", get(domain::status::handler::list_statuses))
        .route(
            "/api/v1/violations",
            get(domain::status::handler::violation_details),
        )
        .route(
            "/api/v1/addresses",
            get(domain::address::handler::list_addresses)
                .post(domain::address::handler::add_address)
                .delete(domain::address::handler::remove_address),
        )
        .route(
            "/api/v1/complaints",
            get(domain::complaint::handler::list_complaints),
        )
        .route(
            "/api/v1/owners",
            get(domain::owner::handler::list_owners).post(domain::owner::handler::create_owner),
        )
        .route(
            "/api/v1/owners/:id",
            patch(domain::owner::handler::update_owner),
        )
        .route(
            "/api/v1/owners/:id/addresses",
            get(domain::owner::handler::owner_addresses)
                .post(domain::owner::handler::assign_address)
                .delete(domain::owner::handler::unassign_address),
        )
        .route(
            "/api/v1/schedule",
            get(domain::ops::handler::get_schedule).put(domain::ops::handler::put_schedule),
        )
        .route(
            "/api/v1/webhook",
            get(domain::ops::handler::get_webhook).put(domain::ops::handler::put_webhook),
        )
        .route("/api/v1/logs/recent", get(domain::ops::handler::recent_logs))
        .route("/api/v1/checks", post(domain::ops::handler::trigger_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
