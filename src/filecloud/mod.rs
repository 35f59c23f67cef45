//! FileCloud `core` API calls used by the organizer.
//!
//! Every call is one form-encoded POST through the authenticated
//! [`Session`](crate::auth::Session). Any status other than 200 is an error
//! and the body is not read. Listing and existence checks then parse the XML
//! body; the mutating calls are judged by HTTP status alone.

pub mod error;
pub mod responses;

use reqwest::StatusCode;

use crate::auth::Session;

pub use self::error::ApiError;
pub use self::responses::Existence;

/// The subset of the FileCloud API the organizer needs.
///
/// Implemented by [`FileCloudClient`] over HTTP; tests substitute an
/// in-memory recorder.
#[async_trait::async_trait]
pub trait FileCloudApi: Send + Sync {
    /// Full paths of the entries found under `location`, in server order.
    async fn search(&self, location: &str) -> Result<Vec<String>, ApiError>;

    /// Case-insensitive existence check for a file or folder path.
    async fn file_exists(&self, path: &str) -> Result<Existence, ApiError>;

    /// Create folder `name` inside `parent`.
    async fn create_folder(&self, parent: &str, name: &str) -> Result<(), ApiError>;

    /// Move or rename `from` to `to` (both full paths).
    async fn rename_or_move(&self, from: &str, to: &str) -> Result<(), ApiError>;

    /// Delete file `name` inside `parent`.
    async fn delete_file(&self, parent: &str, name: &str) -> Result<(), ApiError>;
}

/// HTTP implementation of [`FileCloudApi`].
#[derive(Debug)]
pub struct FileCloudClient {
    session: Session,
}

impl FileCloudClient {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// POST a form and return the body, failing on any non-200 status.
    async fn call(&self, url: &str, form: &[(&str, &str)]) -> Result<String, ApiError> {
        let response = self.session.post_form(url, form).await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::HttpStatus {
                endpoint: endpoint_name(url).to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Last path segment of an endpoint URL, for error messages.
fn endpoint_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

#[async_trait::async_trait]
impl FileCloudApi for FileCloudClient {
    async fn search(&self, location: &str) -> Result<Vec<String>, ApiError> {
        let url = &self.session.endpoints().search;
        let body = self.call(url, &[("location", location)]).await?;
        responses::parse_search(&body).map_err(|source| ApiError::Xml {
            endpoint: endpoint_name(url).to_string(),
            source,
        })
    }

    async fn file_exists(&self, path: &str) -> Result<Existence, ApiError> {
        let url = &self.session.endpoints().file_exists;
        let body = self
            .call(url, &[("file", path), ("caseinsensitive", "1")])
            .await?;
        responses::parse_existence(&body).map_err(|source| ApiError::Xml {
            endpoint: endpoint_name(url).to_string(),
            source,
        })
    }

    async fn create_folder(&self, parent: &str, name: &str) -> Result<(), ApiError> {
        let url = &self.session.endpoints().create_folder;
        self.call(url, &[("name", name), ("path", parent)]).await?;
        Ok(())
    }

    async fn rename_or_move(&self, from: &str, to: &str) -> Result<(), ApiError> {
        let url = &self.session.endpoints().rename_or_move;
        self.call(url, &[("fromname", from), ("toname", to)]).await?;
        Ok(())
    }

    async fn delete_file(&self, parent: &str, name: &str) -> Result<(), ApiError> {
        let url = &self.session.endpoints().delete_file;
        self.call(url, &[("path", parent), ("name", name)]).await?;
        Ok(())
    }
}
