use thiserror::Error;

/// Failure while fetching or decoding one of the view's data sources.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dataset has no `{0}` column")]
    MissingColumn(String),
    #[error("boundary file contains no polygon features")]
    EmptyGeometry,
}
