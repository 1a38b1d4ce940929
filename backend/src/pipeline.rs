//! The two trigger operations, composed from the collector, store and notifier.

use anyhow::{Context, Result};
use chrono::Utc;
use collector::{group_by_subject, CollectorConfig, CredentialSupplier, EventFetcher, MailFetcher};
use shared::{CalendarEvent, NotificationRecord};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::db::Store;
use crate::llm::TextGenerator;
use crate::notifier::Notifier;

/// Outcome of one email run
#[derive(Debug)]
pub struct EmailRunSummary {
    pub messages: usize,
    pub groups: usize,
    pub notifications: Vec<NotificationRecord>,
}

pub struct Pipeline {
    credentials: Arc<dyn CredentialSupplier>,
    store: Arc<dyn Store>,
    generator: Arc<dyn TextGenerator>,
    collector: CollectorConfig,
    notifications_path: PathBuf,
    // Held for a whole run: one trigger at a time touches the token cache and export
    run_lock: Mutex<()>,
}

impl Pipeline {
    pub fn new(
        credentials: Arc<dyn CredentialSupplier>,
        store: Arc<dyn Store>,
        generator: Arc<dyn TextGenerator>,
        collector: CollectorConfig,
        notifications_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            credentials,
            store,
            generator,
            collector,
            notifications_path: notifications_path.into(),
            run_lock: Mutex::new(()),
        }
    }

    /// Fetch recent mail, group it by subject, store the groups and export
    /// one generated notification per group.
    ///
    /// Fetch and storage failures are logged and the run carries on with what
    /// it has; authorization and generation failures end the run.
    pub async fn process_emails(&self) -> Result<EmailRunSummary> {
        let _guard = self.run_lock.lock().await;

        let services = self
            .credentials
            .authorize()
            .await
            .context("Failed to authorize Google access")?;

        let messages = match MailFetcher::new(&*services.mail, &self.collector)
            .fetch_recent(Utc::now())
            .await
        {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!("Failed to fetch emails, continuing with none: {}", e);
                Vec::new()
            }
        };
        let message_count = messages.len();

        let groups = group_by_subject(messages);
        tracing::info!(
            "Grouped {} emails into {} subjects",
            message_count,
            groups.len()
        );

        if let Err(e) = self.store.save_grouped_messages(&groups).await {
            tracing::error!("Failed to store grouped emails: {}", e);
        }

        let notifications = Notifier::new(&*self.generator, &self.notifications_path)
            .context("Failed to generate notifications")?
            .export(&groups)
            .await
            .context("Failed to generate notifications")?;

        Ok(EmailRunSummary {
            messages: message_count,
            groups: groups.len(),
            notifications,
        })
    }

    /// Fetch the trailing calendar window and store every event
    pub async fn process_calendar_events(&self) -> Result<Vec<CalendarEvent>> {
        let _guard = self.run_lock.lock().await;

        let services = self
            .credentials
            .authorize()
            .await
            .context("Failed to authorize Google access")?;

        let events = match EventFetcher::new(&*services.calendar, &self.collector)
            .fetch_window(Utc::now())
            .await
        {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Failed to fetch calendar events, continuing with none: {}", e);
                Vec::new()
            }
        };
        tracing::info!("Fetched {} calendar events", events.len());

        if let Err(e) = self.store.save_events(&events).await {
            tracing::error!("Failed to store calendar events: {}", e);
        }

        Ok(events)
    }
}
