use thiserror::Error;

/// Errors from the JSON bridge. Marker parsing itself never fails; it either
/// finds a marker or it does not.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid node JSON: {0}")]
    Node(#[source] serde_json::Error),
    #[error("invalid options JSON: {0}")]
    Options(#[source] serde_json::Error),
    #[error("failed to serialize marker: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
