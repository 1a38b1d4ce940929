mod client;
mod fetcher;

pub use client::GmailApi;
pub use fetcher::{parse_message, recency_query, MailFetcher};

use async_trait::async_trait;
use google_gmail1::api::Message as RawMessage;

use crate::error::FetchError;

/// Label every listing is restricted to
pub const INBOX_LABEL: &str = "INBOX";

/// The two Gmail calls the fetcher needs
#[async_trait]
pub trait MailApi: Send + Sync {
    /// Ids of inbox messages matching `query`, newest first as Gmail returns them
    async fn list_message_ids(&self, query: &str, max_results: u32)
        -> Result<Vec<String>, FetchError>;

    /// Full message including headers and MIME parts
    async fn get_message(&self, message_id: &str) -> Result<RawMessage, FetchError>;
}
