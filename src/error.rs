use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ServiceMisconfigured(String),

    #[error("Generation API error: {0}")]
    GenerationApi(String),

    #[error("Mail error: {0}")]
    Mail(String),

    #[error("Database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<lettre::error::Error> for AppError {
    fn from(error: lettre::error::Error) -> Self {
        AppError::Mail(error.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for AppError {
    fn from(error: lettre::transport::smtp::Error) -> Self {
        AppError::Mail(error.to_string())
    }
}

impl From<lettre::address::AddressError> for AppError {
    fn from(error: lettre::address::AddressError) -> Self {
        AppError::Mail(format!("invalid address: {}", error))
    }
}

/// Coarse error categories surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    ServiceMisconfigured,
    UpstreamService,
    Storage,
    Internal,
}

impl ErrorKind {
    /// HTTP status a web front end would answer with.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::ServiceMisconfigured
            | ErrorKind::UpstreamService
            | ErrorKind::Storage
            | ErrorKind::Internal => 500,
        }
    }

    /// Process exit code used by the command-line front end.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Validation => 2,
            ErrorKind::NotFound => 3,
            ErrorKind::ServiceMisconfigured => 4,
            ErrorKind::UpstreamService => 5,
            ErrorKind::Storage => 6,
            ErrorKind::Internal => 1,
        }
    }
}

/// Kind-plus-message pair handed back to callers on failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::ServiceMisconfigured(_) => ErrorKind::ServiceMisconfigured,
            AppError::GenerationApi(_) | AppError::Mail(_) | AppError::Http(_) => {
                ErrorKind::UpstreamService
            }
            AppError::Database(_) | AppError::Sqlite(_) => ErrorKind::Storage,
            AppError::Io(_)
            | AppError::ConfigParse(_)
            | AppError::Config(_)
            | AppError::Json(_) => ErrorKind::Internal,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_status_codes() {
        assert_eq!(AppError::Validation("x".into()).kind().status_code(), 400);
        assert_eq!(AppError::NotFound("x".into()).kind().status_code(), 404);
        assert_eq!(
            AppError::ServiceMisconfigured("x".into()).kind(),
            ErrorKind::ServiceMisconfigured
        );
        assert_eq!(
            AppError::GenerationApi("boom".into()).kind(),
            ErrorKind::UpstreamService
        );
        assert_eq!(
            AppError::Sqlite(rusqlite::Error::QueryReturnedNoRows).kind(),
            ErrorKind::Storage
        );
    }

    #[test]
    fn report_carries_kind_and_message() {
        let report = AppError::NotFound("No summary found with id 7".into()).report();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "not_found");
        assert_eq!(json["message"], "No summary found with id 7");
    }
}
