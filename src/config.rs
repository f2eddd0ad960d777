use std::path::PathBuf;

use anyhow::Context;

use crate::models::OutputFormat;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub max_concurrent: usize,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| "sqlite://pagila.db?mode=rwc".to_string());

        let max_connections: u32 =
            var("DB_MAX_CONNECTIONS").and_then(|s| s.parse().ok()).unwrap_or(5);

        let output_dir = var("REPORTS_OUTPUT_DIR").unwrap_or_else(|| "reports".to_string());

        let format = var("REPORTS_FORMAT")
            .map(|s| s.parse::<OutputFormat>())
            .transpose()
            .context("REPORTS_FORMAT")?
            .unwrap_or(OutputFormat::Json);

        let max_concurrent: usize =
            var("REPORTS_MAX_CONCURRENT").and_then(|s| s.parse().ok()).unwrap_or(4);

        let data_dir = var("PAGILA_DATA_DIR").unwrap_or_else(|| "data".to_string());

        Ok(Self {
            database_url,
            max_connections: max_connections.max(1),
            output_dir: output_dir.into(),
            format,
            max_concurrent: max_concurrent.max(1),
            data_dir: data_dir.into(),
        })
    }
}
