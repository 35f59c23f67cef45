use thiserror::Error;

/// Errors from a single FileCloud API call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error {status} from {endpoint}")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("Malformed XML from {endpoint}: {source}")]
    Xml {
        endpoint: String,
        source: quick_xml::DeError,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
