use crate::domain::condition::Condition;
use crate::domain::value_objects::OrderBy;

/// Capability set a persistence adapter exposes so a plan can be applied to
/// its native query object.
///
/// Every method consumes the target and hands it back with the operation
/// applied, so builders can thread one value through a whole plan.
pub trait QueryTarget: Sized {
    /// Restrict the projection to `fields`
    fn select(self, fields: &[String]) -> Self;

    /// Drop `fields` from the projection
    fn omit(self, fields: &[String]) -> Self;

    fn limit(self, limit: u64) -> Self;

    fn offset(self, offset: u64) -> Self;

    /// Add a filter. Successive filters are combined with AND.
    fn filter(self, condition: &Condition) -> Self;

    /// Join `relation`, restricting the joined rows by `scope`
    fn joins(self, relation: &str, scope: &Condition) -> Self;

    /// Load `relation` in a separate query restricted by `scope`
    fn preload(self, relation: &str, scope: &Condition) -> Self;

    fn order(self, orders: &[OrderBy]) -> Self;
}
