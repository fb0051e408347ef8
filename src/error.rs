use thiserror::Error;

pub type TypoResult<T> = Result<T, TypoError>;

#[derive(Debug, Error)]
pub enum TypoError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("json failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corpus `{0}` is not bundled with this build")]
    MissingCorpus(String),

    #[error("corpus `{0}` has no passages")]
    EmptyCorpus(String),

    #[error("corpus `{corpus}` has an empty passage at index {index}")]
    EmptyPassage { corpus: String, index: usize },

    #[error("test duration must be at least one second (got {0})")]
    InvalidDuration(u32),

    #[error("logging setup failed: {0}")]
    Logging(String),
}
