use thiserror::Error;

/// Failures raised while turning a plan into a concrete query.
///
/// Building conditions and chains never fails; these only surface when a
/// persistence adapter renders the plan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("Placeholder mismatch: fragment has {placeholders} placeholders but {params} params")]
    PlaceholderMismatch { placeholders: usize, params: usize },

    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Projection is empty after omitting fields")]
    EmptyProjection,
}
