pub mod health;
pub mod links;
pub mod redirect;

pub use health::{health_routes, AppStartTime, HealthService};
pub use links::{link_api_routes, LinkApiService};
pub use redirect::{redirect_routes, RedirectService};

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use tracing::error;

use crate::errors::LinkTrackerError;

/// Maps a service error to the JSON error response of the API contract.
/// Storage failure detail stays server-side; clients get a generic 500.
pub(crate) fn error_response(err: &LinkTrackerError) -> HttpResponse {
    let status = match err {
        LinkTrackerError::Validation(_) => StatusCode::BAD_REQUEST,
        LinkTrackerError::CodeConflict(_) => StatusCode::CONFLICT,
        LinkTrackerError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("API error: {}", err.format_simple());
        HttpResponse::build(status)
            .json(serde_json::json!({ "error": "Internal server error" }))
    } else {
        HttpResponse::build(status).json(serde_json::json!({ "error": err.message() }))
    }
}
