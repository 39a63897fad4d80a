//! Redirect service
//!
//! The hot path: short code -> 302 redirect, with click recording as a
//! side effect. Recording never blocks or fails the redirect; failures
//! are logged and the visitor still lands on the destination.

use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;
use tracing::{debug, error, trace};

use crate::services::ClickRecorder;
use crate::storage::{Link, Storage};
use crate::utils::ip::extract_client_ip;
use crate::utils::is_valid_short_code;

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        storage: web::Data<Arc<dyn Storage>>,
        recorder: web::Data<ClickRecorder>,
    ) -> impl Responder {
        let code = path.into_inner();

        if !is_valid_short_code(&code) {
            trace!("Invalid short code rejected: {}", &code);
            return Self::not_found_response();
        }

        match storage.get_by_code(&code).await {
            Ok(Some(link)) => {
                Self::record_click(&req, &link, &recorder).await;
                Self::finish_redirect(link)
            }
            Ok(None) => {
                debug!("Redirect link not found: {}", &code);
                Self::not_found_response()
            }
            Err(e) => {
                error!("Storage error during redirect lookup: {}", e);
                Self::error_response()
            }
        }
    }

    /// Best-effort: a failed recording is logged, never surfaced
    async fn record_click(req: &HttpRequest, link: &Link, recorder: &ClickRecorder) {
        let ip = extract_client_ip(req);
        let user_agent = header_value(req, "User-Agent");
        let referrer = header_value(req, "Referer");

        if let Err(e) = recorder.record(&link.id, &ip, &user_agent, &referrer).await {
            error!(
                "Click recording failed for '{}': {}",
                link.short_code,
                e.format_simple()
            );
        }
    }

    fn finish_redirect(link: Link) -> HttpResponse {
        HttpResponse::build(StatusCode::FOUND)
            .insert_header(("Location", link.destination_url))
            .finish()
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .insert_header(("Cache-Control", "public, max-age=60"))
            .body("Link not found")
    }

    #[inline]
    fn error_response() -> HttpResponse {
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("Internal Server Error")
    }
}

fn header_value(req: &HttpRequest, name: &str) -> String {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

pub fn redirect_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/r/{code}", web::get().to(RedirectService::handle_redirect))
        .route(
            "/r/{code}",
            web::head().to(RedirectService::handle_redirect),
        );
}
