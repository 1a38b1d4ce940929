use thiserror::Error;

/// Failure while pulling data from Google.
///
/// Returned instead of an empty list so callers can tell "nothing new" from
/// "could not ask".
#[derive(Debug, Error)]
pub enum FetchError {
    /// The provider answered with an error status or an unparseable body
    #[error("Remote API error: {0}")]
    Api(String),

    /// The request never completed
    #[error("Transport error: {0}")]
    Transport(String),

    /// No usable access token for the request
    #[error("Authorization error: {0}")]
    Auth(String),
}

impl FetchError {
    pub fn from_gmail(err: google_gmail1::Error) -> Self {
        use google_gmail1::Error;

        match err {
            Error::HttpError(e) => FetchError::Transport(e.to_string()),
            Error::Io(e) => FetchError::Transport(e.to_string()),
            Error::MissingToken(e) => FetchError::Auth(e.to_string()),
            other => FetchError::Api(other.to_string()),
        }
    }

    pub fn from_calendar(err: google_calendar3::Error) -> Self {
        use google_calendar3::Error;

        match err {
            Error::HttpError(e) => FetchError::Transport(e.to_string()),
            Error::Io(e) => FetchError::Transport(e.to_string()),
            Error::MissingToken(e) => FetchError::Auth(e.to_string()),
            other => FetchError::Api(other.to_string()),
        }
    }
}

/// Failure while obtaining credentials for the Google services
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to read OAuth client secret: {0}")]
    ClientSecret(#[source] std::io::Error),

    #[error("Failed to build authenticator: {0}")]
    Authenticator(#[source] std::io::Error),

    #[error("Failed to load native TLS roots: {0}")]
    TlsRoots(#[source] std::io::Error),

    #[error("Failed to obtain access token: {0}")]
    Token(#[from] google_gmail1::oauth2::Error),
}
