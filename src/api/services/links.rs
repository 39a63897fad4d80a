//! Link management API
//!
//! JSON CRUD surface over the link service plus the per-link analytics
//! endpoint. Wire field names are camelCase.

use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::error_response;
use crate::config::ServerConfig;
use crate::errors::LinkTrackerError;
use crate::services::{AnalyticsService, CreateLinkRequest, LinkService};
use crate::storage::Storage;

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostNewLink {
    /// Required; validated by the service so the error shape is ours
    pub destination_url: Option<String>,
    pub title: Option<String>,
    pub custom_code: Option<String>,
    pub source: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreatedLinkResponse {
    pub id: String,
    pub short_code: String,
    /// Full redirect URL handed back to the link creator
    pub trackable_url: String,
    pub destination_url: String,
    pub title: String,
    pub source: Option<String>,
}

pub struct LinkApiService;

impl LinkApiService {
    pub async fn create_link(
        body: web::Json<PostNewLink>,
        links: web::Data<LinkService>,
        server: web::Data<ServerConfig>,
    ) -> impl Responder {
        let body = body.into_inner();
        trace!("Link API: create request: {:?}", body);

        let req = CreateLinkRequest {
            destination_url: body.destination_url.unwrap_or_default(),
            title: body.title,
            custom_code: body.custom_code,
            source: body.source,
        };

        match links.create_link(req).await {
            Ok(result) => {
                let link = result.link;
                HttpResponse::Created().json(CreatedLinkResponse {
                    trackable_url: trackable_url(&server.public_url, &link.short_code),
                    id: link.id,
                    short_code: link.short_code,
                    destination_url: link.destination_url,
                    title: link.title,
                    source: link.source,
                })
            }
            Err(e) => error_response(&e),
        }
    }

    pub async fn list_links(links: web::Data<LinkService>) -> impl Responder {
        match links.list_links().await {
            Ok(all) => HttpResponse::Ok().json(all),
            Err(e) => error_response(&e),
        }
    }

    pub async fn delete_link(
        path: web::Path<String>,
        links: web::Data<LinkService>,
    ) -> impl Responder {
        match links.delete_link(&path.into_inner()).await {
            Ok(()) => HttpResponse::Ok()
                .json(serde_json::json!({ "message": "Link deleted successfully" })),
            Err(e) => error_response(&e),
        }
    }

    pub async fn link_analytics(
        path: web::Path<String>,
        storage: web::Data<Arc<dyn Storage>>,
        analytics: web::Data<AnalyticsService>,
    ) -> impl Responder {
        let id = path.into_inner();

        let link = match storage.get_by_id(&id).await {
            Ok(Some(link)) => link,
            Ok(None) => {
                return error_response(&LinkTrackerError::not_found(format!(
                    "Link '{}' not found",
                    id
                )));
            }
            Err(e) => return error_response(&e),
        };

        match analytics.summarize(&id).await {
            Ok(summary) => HttpResponse::Ok().json(serde_json::json!({
                "link": link,
                "analytics": summary,
            })),
            Err(e) => error_response(&e),
        }
    }
}

fn trackable_url(public_url: &str, code: &str) -> String {
    format!("{}/r/{}", public_url.trim_end_matches('/'), code)
}

pub fn link_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/links")
            .route("", web::post().to(LinkApiService::create_link))
            .route("", web::get().to(LinkApiService::list_links))
            .route("/{id}", web::delete().to(LinkApiService::delete_link))
            .route(
                "/{id}/analytics",
                web::get().to(LinkApiService::link_analytics),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trackable_url_trims_trailing_slash() {
        assert_eq!(
            trackable_url("https://lnk.example/", "Ab3dE9"),
            "https://lnk.example/r/Ab3dE9"
        );
        assert_eq!(
            trackable_url("https://lnk.example", "Ab3dE9"),
            "https://lnk.example/r/Ab3dE9"
        );
    }
}
