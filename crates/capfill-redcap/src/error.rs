use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RedcapError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    /// The API answered with an `{"error": "..."}` payload instead of data.
    #[error("REDCap API error: {0}")]
    Api(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no records found where '{field}' = {value}")]
    NoMatch { field: String, value: String },

    #[error("{count} records found where '{field}' = {value} (expected exactly 1)")]
    MultipleMatches {
        field: String,
        value: String,
        count: usize,
    },

    #[error("failed to read secrets file {path}: {source}")]
    SecretsIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("secrets file must supply non-empty 'api_key' and 'url'")]
    IncompleteSecrets,
}
