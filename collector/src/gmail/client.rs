//! Gmail API client backed by the generated `google-gmail1` hub.

use async_trait::async_trait;
use google_gmail1::api::Message;
use google_gmail1::hyper::client::HttpConnector;
use google_gmail1::hyper_rustls::HttpsConnector;
use google_gmail1::Gmail;

use super::{MailApi, INBOX_LABEL};
use crate::error::FetchError;

/// Client for reading the authorized user's mailbox
pub struct GmailApi {
    hub: Gmail<HttpsConnector<HttpConnector>>,
    scopes: Vec<String>,
}

impl GmailApi {
    pub fn new(hub: Gmail<HttpsConnector<HttpConnector>>, scopes: Vec<String>) -> Self {
        Self { hub, scopes }
    }
}

#[async_trait]
impl MailApi for GmailApi {
    async fn list_message_ids(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<String>, FetchError> {
        let (_, list_response) = self
            .hub
            .users()
            .messages_list("me")
            .add_label_ids(INBOX_LABEL)
            .q(query)
            .max_results(max_results)
            .add_scopes(&self.scopes)
            .doit()
            .await
            .map_err(FetchError::from_gmail)?;

        let ids = list_response
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| m.id)
            .collect();

        Ok(ids)
    }

    async fn get_message(&self, message_id: &str) -> Result<Message, FetchError> {
        let (_, message) = self
            .hub
            .users()
            .messages_get("me", message_id)
            .format("full")
            .add_scopes(&self.scopes)
            .doit()
            .await
            .map_err(FetchError::from_gmail)?;

        Ok(message)
    }
}
