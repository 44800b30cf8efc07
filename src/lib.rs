//! # query_chain - Query Plan Builder
//!
//! Composes boolean predicates, projections, row windows and associations
//! into a query plan that a persistence adapter applies to its native query
//! object.
//!
//! ## Architecture Layers
//!
//! - **Domain**: Conditions, the value model and query errors
//! - **Application**: Chain, associations, pagination and the `QueryTarget` port
//! - **Infrastructure**: Postgres and recording query targets
//!
//! ## Key Features
//!
//! - Precedence-aware AND/OR composition with stable parameter order
//! - Join and preload scopes kept apart from the root filter
//! - Offset pagination with deterministic default ordering
//!
//! ## Example Usage
//!
//! ```
//! use query_chain::qb::{and, eq, is_in, or, Builder, Chain};
//! use query_chain::infrastructure::persistence::PostgresQueryTarget;
//!
//! let chain = Chain::new()
//!     .select(["id", "email"])
//!     .limit(20)
//!     .filter(and([or([eq("role", "admin"), eq("role", "owner")]), is_in("team_id", [1, 2])]));
//!
//! let rendered = chain.build(PostgresQueryTarget::new("users")).render().unwrap();
//! assert_eq!(
//!     rendered.sql(),
//!     "SELECT id, email FROM users WHERE (role = $1 OR role = $2) AND team_id IN ($3, $4) LIMIT $5"
//! );
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

/// Everything needed to compose and apply a plan
pub mod qb {
    pub use crate::application::association::{join, preload, Association, AssociationKind};
    pub use crate::application::builder::Builder;
    pub use crate::application::chain::Chain;
    pub use crate::application::paging::{OffsetPaging, OffsetPagingBuilder, DEFAULT_SORT_KEY};
    pub use crate::application::ports::QueryTarget;
    pub use crate::domain::condition::{
        and, between, eq, gt, gte, is_in, is_in_with, is_not_null, is_null, like, lt, lte,
        not, not_between, not_eq, not_in, not_in_with, not_like, or, raw, Condition,
    };
}

// Re-export key types explicitly to avoid ambiguity
pub use application::{dto, ports, use_cases};
pub use config::Config;
pub use domain::errors as domain_errors;
pub use domain::value_objects;
