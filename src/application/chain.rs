use tracing::debug;

use crate::application::association::Association;
use crate::application::builder::Builder;
use crate::application::ports::QueryTarget;
use crate::domain::condition::Condition;

/// Aggregate query plan: projection, row window, root filter and
/// associations.
///
/// Configuration methods take the chain by value and return it, so a chain
/// is never aliased while being configured. Building does not mutate it.
///
/// ```
/// use query_chain::qb::{eq, join, Chain};
///
/// let chain = Chain::new()
///     .select(["id", "name"])
///     .limit(10)
///     .filter(eq("active", true))
///     .associate([join("orders", [eq("orders.paid", true)])]);
///
/// assert_eq!(chain.row_limit(), Some(10));
/// assert_eq!(chain.associations().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chain {
    select_fields: Option<Vec<String>>,
    omit_fields: Option<Vec<String>>,
    limit: Option<u64>,
    offset: Option<u64>,
    condition: Option<Condition>,
    associations: Vec<Association>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the projection. An empty list keeps the current selection.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if !fields.is_empty() {
            self.select_fields = Some(fields);
        }
        self
    }

    /// Exclude fields from the projection. An empty list keeps the current set.
    pub fn omit<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if !fields.is_empty() {
            self.omit_fields = Some(fields);
        }
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the root condition. An empty condition keeps the current one.
    pub fn filter(mut self, condition: Condition) -> Self {
        if !condition.is_empty() {
            self.condition = Some(condition);
        }
        self
    }

    /// Replace the associations, dropping the `None` entries produced for
    /// blank relation names. Nothing left after dropping keeps the current list.
    pub fn associate<I>(mut self, associations: I) -> Self
    where
        I: IntoIterator<Item = Option<Association>>,
    {
        let associations: Vec<Association> = associations.into_iter().flatten().collect();
        if !associations.is_empty() {
            self.associations = associations;
        }
        self
    }

    pub fn selected(&self) -> Option<&[String]> {
        self.select_fields.as_deref()
    }

    pub fn omitted(&self) -> Option<&[String]> {
        self.omit_fields.as_deref()
    }

    pub fn row_limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn row_offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    pub fn associations(&self) -> &[Association] {
        &self.associations
    }
}

impl Builder for Chain {
    /// Applies select, omit, limit, offset, the root condition and then each
    /// association, always in that order.
    fn build<T: QueryTarget>(&self, mut target: T) -> T {
        debug!(
            select = ?self.select_fields,
            omit = ?self.omit_fields,
            limit = ?self.limit,
            offset = ?self.offset,
            has_condition = self.condition.is_some(),
            associations = self.associations.len(),
            "applying query chain"
        );

        if let Some(fields) = &self.select_fields {
            target = target.select(fields);
        }
        if let Some(fields) = &self.omit_fields {
            target = target.omit(fields);
        }
        if let Some(limit) = self.limit {
            target = target.limit(limit);
        }
        if let Some(offset) = self.offset {
            target = target.offset(offset);
        }
        target = self.condition.build(target);
        self.associations.as_slice().build(target)
    }
}
