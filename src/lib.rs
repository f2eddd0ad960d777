pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod export;
pub mod loader;
pub mod models;
pub mod reports;

pub use error::{AppError, AppResult, StoreError, StoreResult};
pub use models::{Cell, CityGroup, OutputFormat, ReportKind, ReportOutput};
pub use reports::ReportExecutor;
