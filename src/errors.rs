use std::fmt;

#[derive(Debug, Clone)]
pub enum LinkTrackerError {
    Config(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Validation(String),
    CodeConflict(String),
    NotFound(String),
    Serialization(String),
}

impl LinkTrackerError {
    /// Stable error code, used in logs and operator-facing output
    pub fn code(&self) -> &'static str {
        match self {
            LinkTrackerError::Config(_) => "E001",
            LinkTrackerError::DatabaseConfig(_) => "E002",
            LinkTrackerError::DatabaseConnection(_) => "E003",
            LinkTrackerError::DatabaseOperation(_) => "E004",
            LinkTrackerError::Validation(_) => "E005",
            LinkTrackerError::CodeConflict(_) => "E006",
            LinkTrackerError::NotFound(_) => "E007",
            LinkTrackerError::Serialization(_) => "E008",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            LinkTrackerError::Config(_) => "Configuration Error",
            LinkTrackerError::DatabaseConfig(_) => "Database Configuration Error",
            LinkTrackerError::DatabaseConnection(_) => "Database Connection Error",
            LinkTrackerError::DatabaseOperation(_) => "Database Operation Error",
            LinkTrackerError::Validation(_) => "Validation Error",
            LinkTrackerError::CodeConflict(_) => "Short Code Conflict",
            LinkTrackerError::NotFound(_) => "Resource Not Found",
            LinkTrackerError::Serialization(_) => "Serialization Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            LinkTrackerError::Config(msg) => msg,
            LinkTrackerError::DatabaseConfig(msg) => msg,
            LinkTrackerError::DatabaseConnection(msg) => msg,
            LinkTrackerError::DatabaseOperation(msg) => msg,
            LinkTrackerError::Validation(msg) => msg,
            LinkTrackerError::CodeConflict(msg) => msg,
            LinkTrackerError::NotFound(msg) => msg,
            LinkTrackerError::Serialization(msg) => msg,
        }
    }

    pub fn format_simple(&self) -> String {
        format!("[{}] {}: {}", self.code(), self.error_type(), self.message())
    }
}

impl fmt::Display for LinkTrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkTrackerError {}

// convenience constructors
impl LinkTrackerError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::Config(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::Validation(msg.into())
    }

    pub fn code_conflict<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::CodeConflict(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::Serialization(msg.into())
    }
}

impl From<sea_orm::DbErr> for LinkTrackerError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinkTrackerError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkTrackerError {
    fn from(err: serde_json::Error) -> Self {
        LinkTrackerError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkTrackerError>;
