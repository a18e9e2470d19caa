use thiserror::Error;

/// Failure taxonomy for listing operations. Validation failures are
/// raised before any external call; `Upstream` aborts the whole request
/// before the persistence write. Authorization failures surface as 401
/// straight from the access guard and "not found" flows as `Option`
/// through the repository, so neither needs a variant here.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("upstream unavailable: {0}")]
    Upstream(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }
}
