use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport failure, propagated verbatim from the HTTP client.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Fixed sentinel for failed image fetches. The underlying transport
    /// error is logged but deliberately not surfaced; see DESIGN.md.
    #[error("request failed")]
    RequestFailed,

    /// Malformed or unexpected-shape search response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Fetched bytes did not decode as an image.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("model error: {0}")]
    Model(#[from] waypin_model::ModelError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("operation cancelled: {0}")]
    Cancelled(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
