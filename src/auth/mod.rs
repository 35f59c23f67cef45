//! FileCloud guest login.
//!
//! A single `POST /core/loginguest` exchanges the user's credentials for
//! session cookies. Anything but HTTP 200 is a failed login; there is no
//! retry and no two-factor flow.

pub mod endpoints;
pub mod error;
pub mod session;

use std::time::Duration;

pub use self::error::AuthError;
pub use self::session::Session;

/// Log in to `server_url` and return a session carrying the login cookies.
pub async fn login(
    server_url: &str,
    username: &str,
    password: &str,
    timeout: Option<Duration>,
) -> Result<Session, AuthError> {
    let session = Session::new(server_url, timeout)?;

    tracing::debug!("Authenticating as {}", username);
    let response = session
        .post_form(
            &session.endpoints().login,
            &[
                ("userid", username),
                ("password", password),
                ("no2facode", "1"),
            ],
        )
        .await?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(AuthError::FailedLogin {
            username: username.to_string(),
            status: status.as_u16(),
        });
    }

    if !session.has_cookies() {
        tracing::warn!("Login succeeded but the server set no session cookie");
    }
    tracing::info!("Login successful!");
    Ok(session)
}
