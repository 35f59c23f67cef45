use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::CookieStore;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response, Url};

use super::endpoints::Endpoints;

const DEFAULT_USER_AGENT: &str = concat!("filecloud-organize/", env!("CARGO_PKG_VERSION"));

/// HTTP session bound to one FileCloud server.
///
/// Cookies set by the login response live in an in-memory jar attached to
/// the client, so every later request carries them. Nothing is persisted.
pub struct Session {
    client: Client,
    cookie_jar: Arc<reqwest::cookie::Jar>,
    endpoints: Endpoints,
    /// Login endpoint URL; the cookie jar is queried against it.
    cookie_url: Url,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("cookie_url", &self.cookie_url.as_str())
            .field("cookies", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Build an unauthenticated session for `server_url`.
    ///
    /// `timeout` applies per request; `None` keeps the client default.
    pub fn new(server_url: &str, timeout: Option<Duration>) -> Result<Self, super::AuthError> {
        let cookie_jar = Arc::new(reqwest::cookie::Jar::default());

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        let mut builder = Client::builder()
            .cookie_provider(cookie_jar.clone())
            .default_headers(default_headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let endpoints = Endpoints::for_server(server_url);
        let cookie_url = Url::parse(&endpoints.login).map_err(|e| {
            super::AuthError::InvalidServerUrl(format!("{}: {}", server_url, e))
        })?;

        Ok(Self {
            client,
            cookie_jar,
            endpoints,
            cookie_url,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Whether the server has set any cookie for this session yet.
    pub fn has_cookies(&self) -> bool {
        self.cookie_jar.cookies(&self.cookie_url).is_some()
    }

    /// Send a form-encoded POST, attaching the session cookies.
    pub async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<Response, reqwest::Error> {
        tracing::debug!("POST {}", url);
        self.client.post(url).form(form).send().await
    }
}
