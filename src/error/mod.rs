//! Migrator error types.
use thiserror::Error;

mod api;
pub use api::ApiError;

mod chain;
pub use chain::ChainError;

mod signing;
pub use signing::SigningError;

mod validation;
pub use validation::ValidationError;

/// The overarching error type returned by the migration entry points.
///
/// Only errors that abort a migration surface here. Per-asset failures are reported as
/// [`MigrationOutcome`](crate::types::MigrationOutcome) entries instead.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The request or the environment is invalid for a migration.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A balance, price or relay request failed.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// A chain request outside the scope of a single transfer failed.
    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl MigrationError {
    /// Whether this error was caused by a failed remote call.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Api(_) | Self::Chain(_))
    }
}
