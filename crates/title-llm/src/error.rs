use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Response parse error: {0}")]
    Parse(String),

    /// Every candidate model was tried and failed; wraps the last failure.
    #[error("all {attempts} candidate models failed for {task}")]
    Exhausted {
        task: String,
        attempts: usize,
        #[source]
        source: Box<LlmError>,
    },
}

pub type Result<T> = std::result::Result<T, LlmError>;
