use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const GMAIL_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";
pub const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// OAuth client secret downloaded from the Google console
    pub client_secret_path: PathBuf,
    /// Token cache rewritten after every refresh or authorization
    pub token_cache_path: PathBuf,
    pub scopes: Vec<String>,
    /// Only messages newer than this many days are fetched
    pub mail_recency_days: i64,
    pub mail_max_results: u32,
    pub calendar_id: String,
    /// Events from this many days ago up to now are fetched
    pub calendar_lookback_days: i64,
    pub calendar_max_results: i32,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            client_secret_path: PathBuf::from("client_secret.json"),
            token_cache_path: PathBuf::from("token.json"),
            scopes: vec![
                GMAIL_READONLY_SCOPE.to_string(),
                CALENDAR_READONLY_SCOPE.to_string(),
            ],
            mail_recency_days: 2,
            mail_max_results: 50,
            calendar_id: "primary".to_string(),
            calendar_lookback_days: 10,
            calendar_max_results: 50,
        }
    }
}

impl CollectorConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            client_secret_path: env::var("GOOGLE_CLIENT_SECRET_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.client_secret_path),
            token_cache_path: env::var("GOOGLE_TOKEN_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.token_cache_path),
            scopes: match env::var("GOOGLE_SCOPES") {
                Ok(value) => parse_scopes(&value),
                Err(_) => defaults.scopes,
            },
            mail_recency_days: env::var("MAIL_RECENCY_DAYS")
                .unwrap_or_else(|_| defaults.mail_recency_days.to_string())
                .parse()
                .context("MAIL_RECENCY_DAYS must be a valid number")?,
            mail_max_results: env::var("MAIL_MAX_RESULTS")
                .unwrap_or_else(|_| defaults.mail_max_results.to_string())
                .parse()
                .context("MAIL_MAX_RESULTS must be a valid number")?,
            calendar_id: env::var("CALENDAR_ID").unwrap_or(defaults.calendar_id),
            calendar_lookback_days: env::var("CALENDAR_LOOKBACK_DAYS")
                .unwrap_or_else(|_| defaults.calendar_lookback_days.to_string())
                .parse()
                .context("CALENDAR_LOOKBACK_DAYS must be a valid number")?,
            calendar_max_results: env::var("CALENDAR_MAX_RESULTS")
                .unwrap_or_else(|_| defaults.calendar_max_results.to_string())
                .parse()
                .context("CALENDAR_MAX_RESULTS must be a valid number")?,
        })
    }
}

fn parse_scopes(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
