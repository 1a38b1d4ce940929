use chrono::{DateTime, Duration, NaiveTime, Utc};
use google_calendar3::api::{Event, EventDateTime};
use shared::{CalendarEvent, NO_DESCRIPTION, NO_LOCATION, NO_TITLE};

use super::CalendarApi;
use crate::config::CollectorConfig;
use crate::error::FetchError;

/// Pulls the events of a trailing window from one calendar
pub struct EventFetcher<'a> {
    api: &'a dyn CalendarApi,
    calendar_id: String,
    lookback_days: i64,
    max_results: i32,
}

impl<'a> EventFetcher<'a> {
    pub fn new(api: &'a dyn CalendarApi, config: &CollectorConfig) -> Self {
        Self {
            api,
            calendar_id: config.calendar_id.clone(),
            lookback_days: config.calendar_lookback_days,
            max_results: config.calendar_max_results,
        }
    }

    /// Events from `now - lookback_days` through `now`, earliest start first
    pub async fn fetch_window(&self, now: DateTime<Utc>) -> Result<Vec<CalendarEvent>, FetchError> {
        let time_min = now - Duration::days(self.lookback_days);
        let mut raw = self
            .api
            .list_events(&self.calendar_id, time_min, now, self.max_results)
            .await?;

        if raw.is_empty() {
            tracing::info!("No events found between {} and {}", time_min, now);
            return Ok(Vec::new());
        }

        // Stable, so events sharing a start keep the provider's order
        raw.sort_by_key(|event| event.start.as_ref().and_then(start_instant));
        raw.truncate(usize::try_from(self.max_results).unwrap_or(0));

        Ok(raw.iter().map(to_calendar_event).collect())
    }
}

/// Flatten a provider event, substituting placeholders for missing text fields
pub fn to_calendar_event(event: &Event) -> CalendarEvent {
    CalendarEvent {
        summary: event.summary.clone().unwrap_or_else(|| NO_TITLE.to_string()),
        start: event.start.as_ref().map(render_time).unwrap_or_default(),
        end: event.end.as_ref().map(render_time).unwrap_or_default(),
        location: event
            .location
            .clone()
            .unwrap_or_else(|| NO_LOCATION.to_string()),
        description: event
            .description
            .clone()
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
    }
}

/// Timed value if present, otherwise the all-day date.
///
/// The hub hands back timed values already normalized to UTC, so the
/// provider's original offset is not recoverable and the rendered string
/// always ends in `+00:00`.
fn render_time(time: &EventDateTime) -> String {
    match (&time.date_time, &time.date) {
        (Some(date_time), _) => date_time.to_rfc3339(),
        (None, Some(date)) => date.format("%Y-%m-%d").to_string(),
        (None, None) => String::new(),
    }
}

/// All-day events start at midnight UTC for ordering purposes
fn start_instant(time: &EventDateTime) -> Option<DateTime<Utc>> {
    time.date_time
        .or_else(|| time.date.map(|d| d.and_time(NaiveTime::MIN).and_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone};
    use std::sync::Mutex;

    fn timed(hour: u32) -> EventDateTime {
        EventDateTime {
            date_time: Some(Utc.with_ymd_and_hms(2024, 5, 3, hour, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    fn all_day(day: u32) -> EventDateTime {
        EventDateTime {
            date: NaiveDate::from_ymd_opt(2024, 5, day),
            ..Default::default()
        }
    }

    fn event(summary: &str, start: EventDateTime, end: EventDateTime) -> Event {
        Event {
            summary: Some(summary.to_string()),
            start: Some(start),
            end: Some(end),
            ..Default::default()
        }
    }

    struct FakeCalendar {
        events: Vec<Event>,
        windows: Mutex<Vec<(String, DateTime<Utc>, DateTime<Utc>, i32)>>,
    }

    impl FakeCalendar {
        fn new(events: Vec<Event>) -> Self {
            Self {
                events,
                windows: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CalendarApi for FakeCalendar {
        async fn list_events(
            &self,
            calendar_id: &str,
            time_min: DateTime<Utc>,
            time_max: DateTime<Utc>,
            max_results: i32,
        ) -> Result<Vec<Event>, FetchError> {
            self.windows.lock().unwrap().push((
                calendar_id.to_string(),
                time_min,
                time_max,
                max_results,
            ));
            Ok(self.events.clone())
        }
    }

    #[test]
    fn test_missing_fields_get_placeholders() {
        let converted = to_calendar_event(&Event::default());

        assert_eq!(converted.summary, "No Title");
        assert_eq!(converted.location, "No Location");
        assert_eq!(converted.description, "No Description");
        assert_eq!(converted.start, "");
    }

    #[test]
    fn test_timed_value_preferred_over_date() {
        let both = EventDateTime {
            date: NaiveDate::from_ymd_opt(2024, 1, 1),
            date_time: Some(Utc.with_ymd_and_hms(2024, 5, 3, 9, 30, 0).unwrap()),
            ..Default::default()
        };
        let converted = to_calendar_event(&event("Review", both, all_day(4)));

        assert_eq!(converted.start, "2024-05-03T09:30:00+00:00");
        assert_eq!(converted.end, "2024-05-04");
    }

    #[test]
    fn test_offset_times_render_as_same_instant_in_utc() {
        let local = DateTime::parse_from_rfc3339("2024-05-03T11:30:00+02:00")
            .unwrap()
            .with_timezone(&Utc);
        let timed = EventDateTime {
            date_time: Some(local),
            ..Default::default()
        };
        let converted = to_calendar_event(&event("Sync", timed.clone(), timed));

        assert_eq!(converted.start, "2024-05-03T09:30:00+00:00");
        assert_eq!(
            DateTime::parse_from_rfc3339(&converted.start).unwrap(),
            DateTime::parse_from_rfc3339("2024-05-03T11:30:00+02:00").unwrap()
        );
    }

    #[tokio::test]
    async fn test_events_come_back_in_start_order() {
        let api = FakeCalendar::new(vec![
            event("late", timed(15), timed(16)),
            event("holiday", all_day(3), all_day(4)),
            event("early", timed(9), timed(10)),
        ]);
        let config = CollectorConfig::default();
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();

        let events = EventFetcher::new(&api, &config)
            .fetch_window(now)
            .await
            .unwrap();

        let summaries: Vec<_> = events.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(summaries, vec!["holiday", "early", "late"]);

        let windows = api.windows.lock().unwrap();
        assert_eq!(windows[0].0, "primary");
        assert_eq!(windows[0].1, now - Duration::days(10));
        assert_eq!(windows[0].2, now);
        assert_eq!(windows[0].3, 50);
    }

    #[tokio::test]
    async fn test_result_is_capped() {
        let api = FakeCalendar::new((0..5).map(|h| event("e", timed(h), timed(h))).collect());
        let config = CollectorConfig {
            calendar_max_results: 3,
            ..CollectorConfig::default()
        };

        let events = EventFetcher::new(&api, &config)
            .fetch_window(Utc::now())
            .await
            .unwrap();
        assert_eq!(events.len(), 3);
    }
}
