//! Service layer providing business-oriented operations on top of models.
//! - Separates orchestration (validate, upload, persist) from data access.
//! - Reuses the entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod db;
pub mod errors;
pub mod listing;
pub mod media;
