//! Shared helpers for writing plan fragments into a `sqlx::QueryBuilder`.

use sqlx::{Postgres, QueryBuilder};

use crate::domain::condition::Condition;
use crate::domain::errors::QueryError;
use crate::domain::value_objects::Value;

/// Marker used by condition fragments for one bound parameter
pub const PLACEHOLDER: char = '?';

/// Write `condition` into `builder`, turning each `?` into a bound `$n`.
///
/// A `Value::List` expands into one bind per element (`NULL` when empty).
/// Every value bound is also pushed onto `binds` in bind order.
pub fn push_condition(
    builder: &mut QueryBuilder<'static, Postgres>,
    binds: &mut Vec<Value>,
    condition: &Condition,
) -> Result<(), QueryError> {
    let fragment = condition.fragment();
    let params = condition.params();

    let placeholders = fragment.matches(PLACEHOLDER).count();
    if placeholders != params.len() {
        return Err(QueryError::PlaceholderMismatch {
            placeholders,
            params: params.len(),
        });
    }

    let mut params = params.iter();
    let mut rest = fragment;
    while let Some(idx) = rest.find(PLACEHOLDER) {
        builder.push(&rest[..idx]);
        if let Some(value) = params.next() {
            push_value(builder, binds, value)?;
        }
        rest = &rest[idx + PLACEHOLDER.len_utf8()..];
    }
    builder.push(rest);

    Ok(())
}

fn push_value(
    builder: &mut QueryBuilder<'static, Postgres>,
    binds: &mut Vec<Value>,
    value: &Value,
) -> Result<(), QueryError> {
    match value {
        Value::List(items) if items.is_empty() => {
            builder.push("NULL");
        }
        Value::List(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    builder.push(", ");
                }
                push_scalar(builder, binds, item)?;
            }
        }
        scalar => push_scalar(builder, binds, scalar)?,
    }
    Ok(())
}

/// Bind a single non-list value.
pub fn push_scalar(
    builder: &mut QueryBuilder<'static, Postgres>,
    binds: &mut Vec<Value>,
    value: &Value,
) -> Result<(), QueryError> {
    match value {
        Value::Null => builder.push_bind(None::<String>),
        Value::Bool(b) => builder.push_bind(*b),
        Value::Int(i) => builder.push_bind(*i),
        Value::Float(f) => builder.push_bind(*f),
        Value::Text(s) => builder.push_bind(s.clone()),
        Value::Uuid(u) => builder.push_bind(*u),
        Value::Timestamp(t) => builder.push_bind(*t),
        Value::List(_) => {
            return Err(QueryError::UnsupportedValue(
                "nested list cannot be bound to a single placeholder".to_string(),
            ))
        }
    };
    binds.push(value.clone());
    Ok(())
}

/// Reject identifiers that could terminate or comment out the statement.
///
/// Identifiers are otherwise written verbatim; qualified names and
/// expressions such as `count(*)` are allowed.
pub fn check_identifier(identifier: &str) -> Result<&str, QueryError> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() || trimmed.contains(';') || trimmed.contains("--") {
        return Err(QueryError::InvalidIdentifier(identifier.to_string()));
    }
    Ok(trimmed)
}
