use anyhow::{Context, Result};
use collector::CollectorConfig;
use std::env;
use std::path::PathBuf;

use crate::llm::{DEFAULT_MODEL, OPENAI_API_URL};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    /// Checked when a notification is generated, not at startup
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    /// CSV export, rewritten on every email run
    pub notifications_path: PathBuf,
    pub collector: CollectorConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| OPENAI_API_URL.to_string()),
            notifications_path: env::var("NOTIFICATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("notifications.csv")),
            collector: CollectorConfig::from_env()?,
        })
    }
}
