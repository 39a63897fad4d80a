use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, trace};

use crate::storage::Storage;

/// Process start timestamp, captured once in main
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        storage: web::Data<Arc<dyn Storage>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        trace!("Received health check request");

        let now = chrono::Utc::now();
        let uptime_seconds = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        match tokio::time::timeout(Duration::from_secs(5), storage.stats()).await {
            Ok(Ok(stats)) => HttpResponse::Ok().json(json!({
                "status": "ok",
                "timestamp": now.to_rfc3339(),
                "uptime": uptime_seconds,
                "backend": storage.backend_name(),
                "links_count": stats.links_count,
                "clicks_count": stats.clicks_count,
            })),
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                HttpResponse::ServiceUnavailable().json(json!({
                    "status": "unhealthy",
                    "timestamp": now.to_rfc3339(),
                    "uptime": uptime_seconds,
                    "backend": storage.backend_name(),
                    "error": "storage failure",
                }))
            }
            Err(_) => {
                error!("Storage health check timeout");
                HttpResponse::ServiceUnavailable().json(json!({
                    "status": "unhealthy",
                    "timestamp": now.to_rfc3339(),
                    "uptime": uptime_seconds,
                    "backend": storage.backend_name(),
                    "error": "timeout",
                }))
            }
        }
    }
}

pub fn health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(HealthService::health_check))
        .route("/health", web::head().to(HealthService::health_check));
}
