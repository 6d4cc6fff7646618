use pepcat_core::CoreError;
use pepcat_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),
}
