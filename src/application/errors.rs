//! Error types for plan compilation

use thiserror::Error;

/// Error type for turning a plan request into a query plan
#[derive(Debug, Error)]
pub enum PlanRequestError {
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
