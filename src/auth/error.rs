use thiserror::Error;

/// Errors raised while establishing a FileCloud session.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Login failed for user '{username}' (HTTP {status})")]
    FailedLogin { username: String, status: u16 },

    #[error("Invalid server URL: {0}")]
    InvalidServerUrl(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
