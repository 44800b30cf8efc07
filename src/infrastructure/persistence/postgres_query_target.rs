use sqlx::{Postgres, QueryBuilder};
use tracing::{debug, warn};

use super::query_builder::{check_identifier, push_condition, push_scalar};
use crate::application::ports::QueryTarget;
use crate::domain::condition::{self, Condition};
use crate::domain::errors::QueryError;
use crate::domain::value_objects::{OrderBy, Value};

/// A rendered statement together with the values bound to it, in `$n` order
pub struct RenderedQuery {
    builder: QueryBuilder<'static, Postgres>,
    binds: Vec<Value>,
}

impl RenderedQuery {
    pub fn sql(&self) -> &str {
        self.builder.sql()
    }

    pub fn binds(&self) -> &[Value] {
        &self.binds
    }

    /// Hand the builder to the caller for `build()` / `build_query_as()`
    pub fn into_builder(self) -> QueryBuilder<'static, Postgres> {
        self.builder
    }
}

impl std::fmt::Debug for RenderedQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedQuery")
            .field("sql", &self.sql())
            .field("binds", &self.binds)
            .finish()
    }
}

/// Postgres adapter: collects a plan and renders it with `sqlx::QueryBuilder`.
///
/// ```text
/// SELECT <projection> FROM <table>
///   [LEFT JOIN <relation> ON <scope>]...
///   [WHERE <filters>] [ORDER BY ..] [LIMIT $n] [OFFSET $n]
/// ```
///
/// Preloads are not part of the root statement; each renders as its own
/// `SELECT * FROM <relation> WHERE <scope>`.
#[derive(Debug, Clone, Default)]
pub struct PostgresQueryTarget {
    table: String,
    columns: Vec<String>,
    select: Option<Vec<String>>,
    omit: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    filters: Vec<Condition>,
    joins: Vec<(String, Condition)>,
    preloads: Vec<(String, Condition)>,
    orders: Vec<OrderBy>,
}

impl PostgresQueryTarget {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    /// Known columns of the table, needed to honour `omit` without an
    /// explicit selection
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Columns that will be selected; empty means `*`.
    pub fn projection(&self) -> Vec<String> {
        let base = self.select.as_ref().unwrap_or(&self.columns);
        base.iter()
            .filter(|column| !self.omit.contains(*column))
            .cloned()
            .collect()
    }

    fn projection_sql(&self) -> Result<String, QueryError> {
        let projection = self.projection();
        if projection.is_empty() {
            if self.select.is_some() || !self.columns.is_empty() {
                return Err(QueryError::EmptyProjection);
            }
            if !self.omit.is_empty() {
                warn!(
                    table = %self.table,
                    omit = ?self.omit,
                    "cannot omit fields without known columns, selecting *"
                );
            }
            return Ok("*".to_string());
        }

        let columns = projection
            .iter()
            .map(|column| check_identifier(column))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns.join(", "))
    }

    fn push_from(
        &self,
        builder: &mut QueryBuilder<'static, Postgres>,
        binds: &mut Vec<Value>,
    ) -> Result<(), QueryError> {
        builder.push(" FROM ").push(check_identifier(&self.table)?);

        for (relation, scope) in &self.joins {
            builder
                .push(" LEFT JOIN ")
                .push(check_identifier(relation)?)
                .push(" ON ");
            if scope.is_empty() {
                builder.push("TRUE");
            } else {
                push_condition(builder, binds, scope)?;
            }
        }

        let root = condition::and(self.filters.iter().cloned());
        if !root.is_empty() {
            builder.push(" WHERE ");
            push_condition(builder, binds, &root)?;
        }

        Ok(())
    }

    /// Render the root statement.
    pub fn render(&self) -> Result<RenderedQuery, QueryError> {
        let mut builder = QueryBuilder::new("SELECT ");
        let mut binds = Vec::new();

        builder.push(self.projection_sql()?);
        self.push_from(&mut builder, &mut binds)?;

        if !self.orders.is_empty() {
            let clauses = self
                .orders
                .iter()
                .map(|order| {
                    check_identifier(&order.field).map(|field| format!("{} {}", field, order.order))
                })
                .collect::<Result<Vec<_>, _>>()?;
            builder.push(" ORDER BY ").push(clauses.join(", "));
        }
        if let Some(limit) = self.limit {
            builder.push(" LIMIT ");
            push_scalar(&mut builder, &mut binds, &Value::Int(to_i64(limit)))?;
        }
        if let Some(offset) = self.offset {
            builder.push(" OFFSET ");
            push_scalar(&mut builder, &mut binds, &Value::Int(to_i64(offset)))?;
        }

        debug!(sql = builder.sql(), binds = binds.len(), "rendered query");
        Ok(RenderedQuery { builder, binds })
    }

    /// Render `SELECT COUNT(*)` over the same joins and filters, ignoring
    /// projection, ordering and the row window.
    pub fn render_count(&self) -> Result<RenderedQuery, QueryError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*)");
        let mut binds = Vec::new();
        self.push_from(&mut builder, &mut binds)?;

        debug!(sql = builder.sql(), binds = binds.len(), "rendered count query");
        Ok(RenderedQuery { builder, binds })
    }

    /// Render one statement per preloaded relation, in preload order.
    pub fn render_preloads(&self) -> Result<Vec<(String, RenderedQuery)>, QueryError> {
        self.preloads
            .iter()
            .map(|(relation, scope)| -> Result<(String, RenderedQuery), QueryError> {
                let mut builder = QueryBuilder::new("SELECT * FROM ");
                let mut binds = Vec::new();
                builder.push(check_identifier(relation)?);
                if !scope.is_empty() {
                    builder.push(" WHERE ");
                    push_condition(&mut builder, &mut binds, scope)?;
                }
                Ok((relation.clone(), RenderedQuery { builder, binds }))
            })
            .collect()
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl QueryTarget for PostgresQueryTarget {
    fn select(mut self, fields: &[String]) -> Self {
        self.select = Some(fields.to_vec());
        self
    }

    fn omit(mut self, fields: &[String]) -> Self {
        self.omit.extend(fields.iter().cloned());
        self
    }

    fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    fn filter(mut self, condition: &Condition) -> Self {
        if !condition.is_empty() {
            self.filters.push(condition.clone());
        }
        self
    }

    fn joins(mut self, relation: &str, scope: &Condition) -> Self {
        self.joins.push((relation.to_string(), scope.clone()));
        self
    }

    fn preload(mut self, relation: &str, scope: &Condition) -> Self {
        self.preloads.push((relation.to_string(), scope.clone()));
        self
    }

    fn order(mut self, orders: &[OrderBy]) -> Self {
        self.orders.extend(orders.iter().cloned());
        self
    }
}
