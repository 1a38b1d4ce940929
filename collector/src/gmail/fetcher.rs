use chrono::{DateTime, Duration, Utc};
use google_gmail1::api::{Message as RawMessage, MessagePart};
use shared::Message;

use super::MailApi;
use crate::config::CollectorConfig;
use crate::error::FetchError;

/// Pulls recent inbox messages and extracts the fields the pipeline uses
pub struct MailFetcher<'a> {
    api: &'a dyn MailApi,
    recency_days: i64,
    max_results: u32,
}

impl<'a> MailFetcher<'a> {
    pub fn new(api: &'a dyn MailApi, config: &CollectorConfig) -> Self {
        Self {
            api,
            recency_days: config.mail_recency_days,
            max_results: config.mail_max_results,
        }
    }

    /// Fetch messages received after `now - recency_days`, in listing order.
    ///
    /// Any failed call fails the whole fetch.
    pub async fn fetch_recent(&self, now: DateTime<Utc>) -> Result<Vec<Message>, FetchError> {
        let query = recency_query(now, self.recency_days);
        let ids = self.api.list_message_ids(&query, self.max_results).await?;

        if ids.is_empty() {
            tracing::info!("No messages found for query '{}'", query);
            return Ok(Vec::new());
        }

        tracing::debug!("Fetching {} messages for query '{}'", ids.len(), query);

        let mut messages = Vec::with_capacity(ids.len());
        for id in ids {
            let raw = self.api.get_message(&id).await?;
            messages.push(parse_message(&raw));
        }

        Ok(messages)
    }
}

/// Gmail search query for messages after the day `days` before `now`
pub fn recency_query(now: DateTime<Utc>, days: i64) -> String {
    let since = now - Duration::days(days);
    format!("after:{}", since.format("%Y/%m/%d"))
}

/// Extract subject, sender, date and plain-text body from a full message.
///
/// Duplicate headers resolve to the first occurrence. The body is the first
/// `text/plain` part; HTML-only messages get no body.
pub fn parse_message(message: &RawMessage) -> Message {
    let mut parsed = Message::default();

    let payload = match message.payload.as_ref() {
        Some(p) => p,
        None => return parsed,
    };

    if let Some(headers) = &payload.headers {
        for header in headers {
            let slot = match header.name.as_deref() {
                Some("Subject") => &mut parsed.subject,
                Some("From") => &mut parsed.sender,
                Some("Date") => &mut parsed.date,
                _ => continue,
            };
            if slot.is_none() {
                *slot = header.value.clone();
            }
        }
    }

    // Only top-level parts are searched; a payload without parts has no body
    parsed.body = payload
        .parts
        .as_ref()
        .and_then(|parts| parts.iter().find_map(plain_text));

    parsed
}

fn plain_text(part: &MessagePart) -> Option<String> {
    if part.mime_type.as_deref() != Some("text/plain") {
        return None;
    }

    part.body
        .as_ref()
        .and_then(|body| body.data.as_deref())
        .map(|data| String::from_utf8_lossy(data).into_owned())
}
