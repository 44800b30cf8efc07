mod query_target;

pub use query_target::QueryTarget;
