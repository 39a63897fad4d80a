use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub geoip: GeoIpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public base used when composing trackable URLs (scheme + host, no
    /// trailing slash required)
    #[serde(default = "default_public_url")]
    pub public_url: String,
    /// Actix worker count; defaults to the runtime's choice
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: default_public_url(),
            workers: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `memory`, `sqlite`, `mysql`, `postgres`, or `auto` (infer from url)
    #[serde(default = "default_db_backend")]
    pub backend: String,
    #[serde(default)]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: default_db_backend(),
            url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// EnvFilter directive, e.g. `info` or `linktracker=debug,actix_web=warn`
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Log file path; empty/absent means stdout
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_true")]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            enable_rotation: true,
            max_backups: default_max_backups(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoIpConfig {
    /// Path to a local MaxMind GeoLite2-City database
    #[serde(default)]
    pub maxminddb_path: Option<String>,
    /// External lookup API template with `{ip}` placeholder, used when no
    /// local database is configured
    #[serde(default)]
    pub api_url: Option<String>,
    /// Upper bound for one lookup; expired lookups are skipped, never awaited
    #[serde(default = "default_geoip_timeout_ms")]
    pub lookup_timeout_ms: u64,
}

impl Default for GeoIpConfig {
    fn default() -> Self {
        Self {
            maxminddb_path: None,
            api_url: None,
            lookup_timeout_ms: default_geoip_timeout_ms(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3003
}

fn default_public_url() -> String {
    format!("http://{}:{}", default_host(), default_port())
}

fn default_db_backend() -> String {
    "memory".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_backups() -> u32 {
    7
}

fn default_geoip_timeout_ms() -> u64 {
    500
}
