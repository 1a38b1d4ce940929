//! Google mail and calendar collection.
//!
//! Everything that talks to Google lives behind the [`gmail::MailApi`] and
//! [`calendar::CalendarApi`] traits so the fetch and grouping logic can run
//! against fixtures.

pub mod auth;
pub mod calendar;
pub mod config;
pub mod error;
pub mod gmail;
pub mod grouper;

pub use auth::{CredentialSupplier, GoogleServices, InstalledFlowSupplier};
pub use calendar::{CalendarApi, EventFetcher};
pub use config::CollectorConfig;
pub use error::{AuthError, FetchError};
pub use gmail::{MailApi, MailFetcher};
pub use grouper::group_by_subject;
