use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::pooled_connection::deadpool::{Pool, PoolError};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use shared::{CalendarEvent, MessageGroups};
use thiserror::Error;

use crate::schema::{calendar_events, grouped_emails};

pub type DbPool = Pool<AsyncPgConnection>;

const CREATE_GROUPED_EMAILS: &str = "\
    CREATE TABLE IF NOT EXISTS grouped_emails (
        id SERIAL PRIMARY KEY,
        subject VARCHAR(255) NOT NULL,
        body TEXT NOT NULL
    )";

const CREATE_CALENDAR_EVENTS: &str = "\
    CREATE TABLE IF NOT EXISTS calendar_events (
        id SERIAL PRIMARY KEY,
        summary VARCHAR(255),
        start TEXT,
        \"end\" TEXT,
        location VARCHAR(255),
        description TEXT
    )";

/// Longest value the VARCHAR(255) columns accept
const VARCHAR_LIMIT: usize = 255;

pub fn establish_connection_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    let pool = Pool::builder(config).build()?;

    Ok(pool)
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database connection error: {0}")]
    Connection(#[from] PoolError),

    #[error("Database error: {0}")]
    Query(#[from] diesel::result::Error),
}

/// Write side of the relational store.
///
/// Both operations append; there is no dedup key, so repeating a run with the
/// same data stores the rows again.
#[async_trait]
pub trait Store: Send + Sync {
    /// One row per group; returns rows written
    async fn save_grouped_messages(&self, groups: &MessageGroups) -> Result<usize, StoreError>;

    /// One row per event; returns rows written
    async fn save_events(&self, events: &[CalendarEvent]) -> Result<usize, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = grouped_emails)]
pub struct NewGroupedEmail<'a> {
    pub subject: &'a str,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = calendar_events)]
pub struct NewCalendarEvent<'a> {
    pub summary: &'a str,
    pub start: &'a str,
    pub end: &'a str,
    pub location: &'a str,
    pub description: &'a str,
}

/// Rows for the grouped_emails table, absent subjects replaced by the placeholder
pub fn grouped_rows(groups: &MessageGroups) -> Vec<NewGroupedEmail<'_>> {
    groups
        .iter()
        .map(|group| NewGroupedEmail {
            subject: truncate_chars(group.display_subject(), VARCHAR_LIMIT),
            body: group.joined_members(),
        })
        .collect()
}

pub fn event_rows(events: &[CalendarEvent]) -> Vec<NewCalendarEvent<'_>> {
    events
        .iter()
        .map(|event| NewCalendarEvent {
            summary: truncate_chars(&event.summary, VARCHAR_LIMIT),
            start: &event.start,
            end: &event.end,
            location: truncate_chars(&event.location, VARCHAR_LIMIT),
            description: &event.description,
        })
        .collect()
}

fn truncate_chars(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &value[..byte_index],
        None => value,
    }
}

/// Postgres-backed store; each call checks out its own pooled connection
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn save_grouped_messages(&self, groups: &MessageGroups) -> Result<usize, StoreError> {
        let rows = grouped_rows(groups);
        // Returned to the pool when dropped, on success or error
        let mut conn = self.pool.get().await?;

        let inserted = conn
            .transaction::<_, StoreError, _>(|conn| {
                async move {
                    diesel::sql_query(CREATE_GROUPED_EMAILS).execute(conn).await?;

                    let mut inserted = 0;
                    for row in &rows {
                        inserted += diesel::insert_into(grouped_emails::table)
                            .values(row)
                            .execute(conn)
                            .await?;
                    }
                    Ok(inserted)
                }
                .scope_boxed()
            })
            .await?;

        tracing::debug!("Stored {} grouped email rows", inserted);
        Ok(inserted)
    }

    async fn save_events(&self, events: &[CalendarEvent]) -> Result<usize, StoreError> {
        let rows = event_rows(events);
        let mut conn = self.pool.get().await?;

        let inserted = conn
            .transaction::<_, StoreError, _>(|conn| {
                async move {
                    diesel::sql_query(CREATE_CALENDAR_EVENTS).execute(conn).await?;

                    let mut inserted = 0;
                    for row in &rows {
                        inserted += diesel::insert_into(calendar_events::table)
                            .values(row)
                            .execute(conn)
                            .await?;
                    }
                    Ok(inserted)
                }
                .scope_boxed()
            })
            .await?;

        tracing::debug!("Stored {} calendar event rows", inserted);
        Ok(inserted)
    }
}
