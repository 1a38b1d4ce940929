use async_trait::async_trait;
use chrono::{DateTime, Utc};
use google_calendar3::api::Event;
use google_calendar3::hyper::client::HttpConnector;
use google_calendar3::hyper_rustls::HttpsConnector;
use google_calendar3::CalendarHub;

use super::CalendarApi;
use crate::error::FetchError;

/// Client for interacting with Google Calendar API
pub struct GoogleCalendarApi {
    hub: CalendarHub<HttpsConnector<HttpConnector>>,
    scopes: Vec<String>,
}

impl GoogleCalendarApi {
    pub fn new(hub: CalendarHub<HttpsConnector<HttpConnector>>, scopes: Vec<String>) -> Self {
        Self { hub, scopes }
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarApi {
    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        max_results: i32,
    ) -> Result<Vec<Event>, FetchError> {
        let (_, events) = self
            .hub
            .events()
            .list(calendar_id)
            .time_min(time_min)
            .time_max(time_max)
            .max_results(max_results)
            .single_events(true)
            .order_by("startTime")
            .add_scopes(&self.scopes)
            .doit()
            .await
            .map_err(FetchError::from_calendar)?;

        Ok(events.items.unwrap_or_default())
    }
}
