use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("date format error: {0}")]
    DateFormat(#[from] time::error::Format),
}

impl StorageError {
    /// Recoverable for the seeder; always fatal for the importer.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, StorageError::ConstraintViolation(_))
    }
}
