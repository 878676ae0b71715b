use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("zero-shot classifier error: {0}")]
    ZeroShot(String),

    #[error("TEI embed error: {0}")]
    Tei(String),

    #[error("inference call timed out after {0:?}")]
    Timeout(Duration),

    #[error("empty response: {0}")]
    EmptyResponse(&'static str),

    #[error("invalid model output: {0}")]
    InvalidOutput(String),
}
