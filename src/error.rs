use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("content is empty: {0}")]
    EmptyContent(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("analysis timed out after {0} ms")]
    Timeout(u64),

    #[error("text generation failed: {0}")]
    Generation(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
