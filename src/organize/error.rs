use thiserror::Error;

use crate::filecloud::{ApiError, Existence};

/// Why a single source file was not organized.
#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error("No 8-digit date found in '{filename}'")]
    NoDateToken { filename: String },

    #[error("Date '{token}' in '{filename}' is not in the format YYYYMMDD")]
    InvalidDateToken { token: String, filename: String },

    #[error("Unknown month '{code}' in '{filename}'")]
    UnknownMonth { code: String, filename: String },

    #[error("Existence check for {path} returned {existence}")]
    UnexpectedExistence { path: String, existence: Existence },

    #[error("Could not move {from} to {to}: {source}")]
    Move {
        from: String,
        to: String,
        source: ApiError,
    },

    #[error("Could not delete {path}: {source}")]
    Delete { path: String, source: ApiError },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl OrganizeError {
    /// Whether the file was unprocessable by name alone, before any request.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            OrganizeError::NoDateToken { .. }
                | OrganizeError::InvalidDateToken { .. }
                | OrganizeError::UnknownMonth { .. }
        )
    }
}
