mod postgres_query_target;
mod query_builder;
mod recording_query_target;

pub use postgres_query_target::{PostgresQueryTarget, RenderedQuery};
pub use query_builder::{check_identifier, push_condition, PLACEHOLDER};
pub use recording_query_target::{PlanOp, RecordingQueryTarget};
