use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing::info;

use linktracker::api::services::{
    health_routes, link_api_routes, redirect_routes, AppStartTime,
};
use linktracker::config::AppConfig;
use linktracker::services::{AnalyticsService, ClickRecorder, GeoIpProvider, LinkService};
use linktracker::storage::StorageFactory;
use linktracker::system::init_logging;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("{}", e.format_simple());
        std::process::exit(1);
    });

    // guard must outlive the server so buffered log writes are flushed
    let _log_guard = init_logging(&config.logging);

    let storage = StorageFactory::create(&config.database)
        .await
        .expect("Failed to create storage");
    info!("Using storage backend: {}", storage.backend_name());

    let geoip = GeoIpProvider::new(&config.geoip);
    let recorder = ClickRecorder::new(
        storage.clone(),
        geoip,
        Duration::from_millis(config.geoip.lookup_timeout_ms),
    );
    let link_service = LinkService::new(storage.clone());
    let analytics_service = AnalyticsService::new(storage.clone());
    let server_config = config.server.clone();

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::Data::new(link_service.clone()))
            .app_data(web::Data::new(analytics_service.clone()))
            .app_data(web::Data::new(recorder.clone()))
            .wrap(Cors::permissive())
            .configure(link_api_routes)
            .configure(health_routes)
            .configure(redirect_routes)
    })
    .bind(&bind_address)?;

    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server.run().await
}
