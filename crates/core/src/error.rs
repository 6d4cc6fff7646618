use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("document parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}
