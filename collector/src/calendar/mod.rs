mod client;
mod fetcher;

pub use client::GoogleCalendarApi;
pub use fetcher::{to_calendar_event, EventFetcher};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use google_calendar3::api::Event;

use crate::error::FetchError;

/// Single-event listing over a time window
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Events in `[time_min, time_max]` with recurring events expanded,
    /// ordered by start time
    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        max_results: i32,
    ) -> Result<Vec<Event>, FetchError>;
}
