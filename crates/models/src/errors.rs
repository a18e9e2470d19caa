use thiserror::Error;

/// Failures raised by the persistence layer. Driver errors are carried
/// as text so callers never depend on sea_orm types.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("database error: {0}")]
    Db(String),
}

impl ModelError {
    pub fn db(e: impl std::fmt::Display) -> Self {
        Self::Db(e.to_string())
    }
}
