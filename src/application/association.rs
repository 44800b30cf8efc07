use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::builder::Builder;
use crate::application::ports::QueryTarget;
use crate::domain::condition::{self, Condition};

/// How a related table is brought into the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssociationKind {
    /// Joined into the root query
    Join,
    /// Loaded by a separate query
    Preload,
}

impl std::fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssociationKind::Join => write!(f, "join"),
            AssociationKind::Preload => write!(f, "preload"),
        }
    }
}

/// A related table plus the condition scoped to it.
///
/// The scope only ever reaches the target through `joins`/`preload`; it is
/// never merged into the root filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Association {
    kind: AssociationKind,
    relation: String,
    scope: Condition,
}

impl Association {
    /// Returns `None` when `relation` is blank.
    pub fn new<I>(kind: AssociationKind, relation: &str, conditions: I) -> Option<Self>
    where
        I: IntoIterator<Item = Condition>,
    {
        let relation = relation.trim();
        if relation.is_empty() {
            debug!(%kind, "skipping association with blank relation");
            return None;
        }
        Some(Self {
            kind,
            relation: relation.to_string(),
            scope: condition::and(conditions),
        })
    }

    pub fn kind(&self) -> AssociationKind {
        self.kind
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub fn scope(&self) -> &Condition {
        &self.scope
    }
}

impl Builder for Association {
    fn build<T: QueryTarget>(&self, target: T) -> T {
        match self.kind {
            AssociationKind::Join => target.joins(&self.relation, &self.scope),
            AssociationKind::Preload => target.preload(&self.relation, &self.scope),
        }
    }
}

/// Join `relation`, AND-ing `conditions` into its scope.
pub fn join<I>(relation: &str, conditions: I) -> Option<Association>
where
    I: IntoIterator<Item = Condition>,
{
    Association::new(AssociationKind::Join, relation, conditions)
}

/// Preload `relation`, AND-ing `conditions` into its scope.
pub fn preload<I>(relation: &str, conditions: I) -> Option<Association>
where
    I: IntoIterator<Item = Condition>,
{
    Association::new(AssociationKind::Preload, relation, conditions)
}
