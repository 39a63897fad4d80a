pub mod analytics_service;
pub mod click_recorder;
pub mod geoip;
pub mod link_service;

pub use analytics_service::{AnalyticsService, LinkAnalytics};
pub use click_recorder::ClickRecorder;
pub use geoip::{GeoInfo, GeoIpProvider};
pub use link_service::{CreateLinkRequest, LinkCreateResult, LinkService};
