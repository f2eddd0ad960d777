use std::path::PathBuf;

use sea_orm::DbErr;

/// Failure talking to the relational store. Empty results are never errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] DbErr),
    #[error("schema mismatch: {0}")]
    SchemaMismatch(#[source] DbErr),
    #[error("query failed: {0}")]
    Query(#[source] DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        let message = err.to_string();
        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => Self::StoreUnavailable(err),
            _ if is_connection_loss(&message) => Self::StoreUnavailable(err),
            _ if is_missing_schema(&message) => Self::SchemaMismatch(err),
            _ => Self::Query(err),
        }
    }
}

fn is_connection_loss(message: &str) -> bool {
    message.contains("error communicating with database")
        || message.contains("connection closed")
        || message.contains("pool timed out")
}

// sqlite: "no such table"/"no such column"; postgres: `relation "x" does not exist`.
fn is_missing_schema(message: &str) -> bool {
    message.contains("no such table")
        || message.contains("no such column")
        || message.contains("does not exist")
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("data file {0} does not exist")]
    MissingDataFile(PathBuf),
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to render report: {0}")]
    Render(#[from] serde_json::Error),
    #[error("failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("rendered report is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        Self::Store(err.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
