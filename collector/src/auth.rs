//! Credential supply for the Google services.
//!
//! The installed-app flow reuses the token cache when it holds a valid or
//! refreshable token, and otherwise opens a local redirect server for
//! interactive consent.

use async_trait::async_trait;
use google_calendar3::CalendarHub;
use google_gmail1::oauth2::{self, InstalledFlowAuthenticator, InstalledFlowReturnMethod};
use google_gmail1::Gmail;

use crate::calendar::{CalendarApi, GoogleCalendarApi};
use crate::config::CollectorConfig;
use crate::error::AuthError;
use crate::gmail::{GmailApi, MailApi};

/// Authenticated handles for both services
pub struct GoogleServices {
    pub mail: Box<dyn MailApi>,
    pub calendar: Box<dyn CalendarApi>,
}

/// Produces authenticated service handles for one pipeline run
#[async_trait]
pub trait CredentialSupplier: Send + Sync {
    async fn authorize(&self) -> Result<GoogleServices, AuthError>;
}

/// Installed-app OAuth flow with an on-disk token cache
pub struct InstalledFlowSupplier {
    config: CollectorConfig,
}

impl InstalledFlowSupplier {
    pub fn new(config: CollectorConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CredentialSupplier for InstalledFlowSupplier {
    async fn authorize(&self) -> Result<GoogleServices, AuthError> {
        let secret = oauth2::read_application_secret(&self.config.client_secret_path)
            .await
            .map_err(AuthError::ClientSecret)?;

        let auth = InstalledFlowAuthenticator::builder(
            secret,
            InstalledFlowReturnMethod::HTTPRedirect,
        )
        .persist_tokens_to_disk(&self.config.token_cache_path)
        .build()
        .await
        .map_err(AuthError::Authenticator)?;

        // Resolve the token now so a missing or revoked grant fails the run up front
        auth.token(self.config.scopes.as_slice()).await?;
        tracing::debug!(
            "Authorized Google access using {}",
            self.config.token_cache_path.display()
        );

        let gmail_connector = google_gmail1::hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(AuthError::TlsRoots)?
            .https_or_http()
            .enable_http1()
            .build();
        let gmail = Gmail::new(
            google_gmail1::hyper::Client::builder().build(gmail_connector),
            auth.clone(),
        );

        let calendar_connector = google_calendar3::hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(AuthError::TlsRoots)?
            .https_or_http()
            .enable_http1()
            .build();
        let calendar = CalendarHub::new(
            google_calendar3::hyper::Client::builder().build(calendar_connector),
            auth,
        );

        Ok(GoogleServices {
            mail: Box::new(GmailApi::new(gmail, self.config.scopes.clone())),
            calendar: Box::new(GoogleCalendarApi::new(
                calendar,
                self.config.scopes.clone(),
            )),
        })
    }
}
