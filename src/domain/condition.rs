//! Boolean predicate composition.
//!
//! A [`Condition`] is a SQL-style fragment with `?` placeholders plus the
//! parameters bound to them, in textual order. Leaf constructors produce a
//! single predicate; [`and`], [`or`] and [`not`] combine them, adding
//! parentheses only where mixing `AND` and `OR` would otherwise change the
//! meaning of the text.
//!
//! ```
//! use query_chain::qb::{and, eq, gt, or};
//!
//! let cond = and([or([eq("a", 1), eq("b", 2)]), gt("c", 3)]);
//! assert_eq!(cond.fragment(), "(a = ? OR b = ?) AND c > ?");
//! assert_eq!(cond.params().len(), 3);
//! ```

use std::ops::Not;

use crate::domain::value_objects::{Membership, Operator, Value};

/// One predicate, or a group of predicates already combined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    operator: Option<Operator>,
    fragment: String,
    params: Vec<Value>,
}

impl Condition {
    fn leaf(fragment: String, params: Vec<Value>) -> Self {
        Self {
            operator: None,
            fragment,
            params,
        }
    }

    /// Combinator applied last at the top level, `None` for leaves.
    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// A condition with a blank fragment filters nothing.
    pub fn is_empty(&self) -> bool {
        self.fragment.trim().is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.fragment, self.params)
    }

    /// `self AND other`, parenthesizing whichever side was last combined with `OR`.
    pub fn and(self, other: Condition) -> Condition {
        self.append(Operator::And, [other])
    }

    /// `self OR other`, parenthesizing whichever side was last combined with `AND`.
    pub fn or(self, other: Condition) -> Condition {
        self.append(Operator::Or, [other])
    }

    fn append<I>(mut self, operator: Operator, conditions: I) -> Self
    where
        I: IntoIterator<Item = Condition>,
    {
        if self.is_empty() {
            self.fragment.clear();
            self.params.clear();
        } else if self.operator.is_some_and(|op| op != operator) {
            self.fragment = wrap(&self.fragment);
        }
        self.operator = Some(operator);

        for condition in conditions {
            if condition.is_empty() {
                continue;
            }
            let Condition {
                operator: inner,
                fragment,
                params,
            } = condition;

            let fragment = match inner {
                Some(op) if op != operator => wrap(&fragment),
                _ => fragment,
            };
            if !self.fragment.is_empty() {
                self.fragment.push_str(operator.token());
            }
            self.fragment.push_str(&fragment);
            self.params.extend(params);
        }

        self
    }
}

impl Not for Condition {
    type Output = Condition;

    /// Negation is atomic: the result carries no operator, so later
    /// combination never wraps it again.
    fn not(self) -> Condition {
        if self.is_empty() {
            return Condition::default();
        }
        Condition {
            operator: None,
            fragment: format!("NOT({})", self.fragment),
            params: self.params,
        }
    }
}

fn wrap(fragment: &str) -> String {
    format!("({})", fragment)
}

fn compare(field: &str, op: &str, value: Value) -> Condition {
    Condition::leaf(format!("{} {} ?", field, op), vec![value])
}

/// `field = value`
pub fn eq(field: &str, value: impl Into<Value>) -> Condition {
    compare(field, "=", value.into())
}

/// `field <> value`
pub fn not_eq(field: &str, value: impl Into<Value>) -> Condition {
    compare(field, "<>", value.into())
}

/// `field > value`
pub fn gt(field: &str, value: impl Into<Value>) -> Condition {
    compare(field, ">", value.into())
}

/// `field >= value`
pub fn gte(field: &str, value: impl Into<Value>) -> Condition {
    compare(field, ">=", value.into())
}

/// `field < value`
pub fn lt(field: &str, value: impl Into<Value>) -> Condition {
    compare(field, "<", value.into())
}

/// `field <= value`
pub fn lte(field: &str, value: impl Into<Value>) -> Condition {
    compare(field, "<=", value.into())
}

/// `field IN (?)` with a scalar, a sequence or an array of values.
///
/// ```
/// use query_chain::qb::is_in;
/// use query_chain::domain::value_objects::Value;
///
/// let cond = is_in("id", [1, 2, 3]);
/// assert_eq!(cond.fragment(), "id IN (?)");
/// assert_eq!(cond.params(), &[Value::from(vec![1, 2, 3])]);
/// ```
pub fn is_in(field: &str, values: impl Into<Membership>) -> Condition {
    membership(field, "IN", values.into().into_values(None::<Value>))
}

/// `field IN (?)` where `values` are followed by `extra` in the bound list.
pub fn is_in_with<I, V>(field: &str, values: impl Into<Membership>, extra: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    membership(field, "IN", values.into().into_values(extra))
}

/// `field NOT IN (?)`
pub fn not_in(field: &str, values: impl Into<Membership>) -> Condition {
    membership(field, "NOT IN", values.into().into_values(None::<Value>))
}

/// `field NOT IN (?)` where `values` are followed by `extra` in the bound list.
pub fn not_in_with<I, V>(field: &str, values: impl Into<Membership>, extra: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    membership(field, "NOT IN", values.into().into_values(extra))
}

fn membership(field: &str, op: &str, values: Vec<Value>) -> Condition {
    Condition::leaf(format!("{} {} (?)", field, op), vec![Value::List(values)])
}

/// `field LIKE pattern`
pub fn like(field: &str, pattern: impl Into<String>) -> Condition {
    compare(field, "LIKE", Value::Text(pattern.into()))
}

/// `field NOT LIKE pattern`
pub fn not_like(field: &str, pattern: impl Into<String>) -> Condition {
    compare(field, "NOT LIKE", Value::Text(pattern.into()))
}

/// `field IS NULL`
pub fn is_null(field: &str) -> Condition {
    Condition::leaf(format!("{} IS NULL", field), Vec::new())
}

/// `field IS NOT NULL`
pub fn is_not_null(field: &str) -> Condition {
    Condition::leaf(format!("{} IS NOT NULL", field), Vec::new())
}

/// `field BETWEEN lower AND upper`
pub fn between(field: &str, lower: impl Into<Value>, upper: impl Into<Value>) -> Condition {
    Condition::leaf(
        format!("{} BETWEEN ? AND ?", field),
        vec![lower.into(), upper.into()],
    )
}

/// `field NOT BETWEEN lower AND upper`
pub fn not_between(field: &str, lower: impl Into<Value>, upper: impl Into<Value>) -> Condition {
    Condition::leaf(
        format!("{} NOT BETWEEN ? AND ?", field),
        vec![lower.into(), upper.into()],
    )
}

/// Caller-written fragment, taken verbatim. No parentheses are added, so a
/// fragment containing a bare `OR` should be wrapped by the caller.
pub fn raw<I, V>(fragment: impl Into<String>, params: I) -> Condition
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Condition::leaf(fragment.into(), params.into_iter().map(Into::into).collect())
}

/// Join conditions with `AND`. Blank conditions are skipped.
pub fn and<I>(conditions: I) -> Condition
where
    I: IntoIterator<Item = Condition>,
{
    Condition::default().append(Operator::And, conditions)
}

/// Join conditions with `OR`. Blank conditions are skipped.
pub fn or<I>(conditions: I) -> Condition
where
    I: IntoIterator<Item = Condition>,
{
    Condition::default().append(Operator::Or, conditions)
}

/// `NOT(condition)`; negating an empty condition yields an empty condition.
pub fn not(condition: Condition) -> Condition {
    !condition
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_fragments() {
        assert_eq!(eq("a", 1).fragment(), "a = ?");
        assert_eq!(not_eq("a", 1).fragment(), "a <> ?");
        assert_eq!(gt("a", 1).fragment(), "a > ?");
        assert_eq!(gte("a", 1).fragment(), "a >= ?");
        assert_eq!(lt("a", 1).fragment(), "a < ?");
        assert_eq!(lte("a", 1).fragment(), "a <= ?");
        assert_eq!(like("a", "x%").fragment(), "a LIKE ?");
        assert_eq!(not_like("a", "x%").fragment(), "a NOT LIKE ?");
        assert_eq!(is_null("a").fragment(), "a IS NULL");
        assert_eq!(is_not_null("a").fragment(), "a IS NOT NULL");
        assert_eq!(between("a", 1, 2).fragment(), "a BETWEEN ? AND ?");
        assert_eq!(not_between("a", 1, 2).fragment(), "a NOT BETWEEN ? AND ?");
        assert_eq!(not_in("a", [1]).fragment(), "a NOT IN (?)");
    }

    #[test]
    fn test_leaf_has_no_operator() {
        assert_eq!(eq("a", 1).operator(), None);
        assert_eq!(raw("x = 1", Vec::<Value>::new()).operator(), None);
    }

    #[test]
    fn test_null_checks_carry_no_params() {
        assert!(is_null("deleted_at").params().is_empty());
        assert!(is_not_null("deleted_at").params().is_empty());
    }

    #[test]
    fn test_between_params_in_order() {
        let cond = between("age", 18, 65);
        assert_eq!(cond.params(), &[Value::Int(18), Value::Int(65)]);
    }

    #[test]
    fn test_blank_field_is_not_validated() {
        let cond = eq("", 1);
        assert_eq!(cond.fragment(), " = ?");
        assert_eq!(cond.params().len(), 1);
    }

    #[test]
    fn test_membership_sequence_then_extra() {
        let cond = is_in_with("id", vec![1, 2], [3]);
        assert_eq!(cond.fragment(), "id IN (?)");
        assert_eq!(
            cond.params(),
            &[Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])]
        );
    }

    #[test]
    fn test_membership_scalar() {
        let cond = is_in("id", 9);
        assert_eq!(cond.params(), &[Value::List(vec![Value::Int(9)])]);
    }

    #[test]
    fn test_membership_none_with_extra() {
        let cond = not_in_with("id", None::<Vec<i32>>, [4, 5]);
        assert_eq!(cond.fragment(), "id NOT IN (?)");
        assert_eq!(
            cond.params(),
            &[Value::List(vec![Value::Int(4), Value::Int(5)])]
        );
    }

    #[test]
    fn test_and_flat() {
        let cond = and([eq("a", 1), eq("b", 2), eq("c", 3)]);
        assert_eq!(cond.fragment(), "a = ? AND b = ? AND c = ?");
        assert_eq!(cond.operator(), Some(Operator::And));
        assert_eq!(
            cond.params(),
            &[Value::Int(1), Value::Int(2), Value::Int(3)]
        );
    }

    #[test]
    fn test_nested_or_inside_and() {
        let cond = and([or([eq("a", 1), eq("b", 2)]), eq("c", 3)]);
        assert_eq!(cond.fragment(), "(a = ? OR b = ?) AND c = ?");
        assert_eq!(
            cond.params(),
            &[Value::Int(1), Value::Int(2), Value::Int(3)]
        );
    }

    #[test]
    fn test_nested_and_inside_or() {
        let cond = or([eq("a", 1), and([eq("b", 2), eq("c", 3)])]);
        assert_eq!(cond.fragment(), "a = ? OR (b = ? AND c = ?)");
    }

    #[test]
    fn test_same_operator_nesting_stays_flat() {
        let cond = and([and([eq("a", 1), eq("b", 2)]), eq("c", 3)]);
        assert_eq!(cond.fragment(), "a = ? AND b = ? AND c = ?");
    }

    #[test]
    fn test_method_chaining_wraps_accumulator() {
        let cond = eq("a", 1).or(eq("b", 2)).and(eq("c", 3));
        assert_eq!(cond.fragment(), "(a = ? OR b = ?) AND c = ?");
        assert_eq!(cond.operator(), Some(Operator::And));
    }

    #[test]
    fn test_empty_is_identity() {
        let a = eq("a", 1);
        let combined = and([a.clone(), Condition::default()]);
        assert_eq!(combined.fragment(), a.fragment());
        assert_eq!(combined.params(), a.params());

        let combined = or([raw("   ", Vec::<Value>::new()), a.clone()]);
        assert_eq!(combined.fragment(), a.fragment());
    }

    #[test]
    fn test_blank_receiver_is_absent_when_chained() {
        let cond = raw("   ", Vec::<Value>::new()).and(eq("a", 1));
        assert_eq!(cond.fragment(), "a = ?");
        assert_eq!(cond.params(), &[Value::Int(1)]);

        // Params attached to a blank fragment are dropped with it
        let cond = raw(" ", [Value::Int(9)]).or(eq("a", 1));
        assert_eq!(cond.fragment(), "a = ?");
        assert_eq!(cond.params(), &[Value::Int(1)]);
    }

    #[test]
    fn test_and_of_nothing_is_empty() {
        assert!(and(Vec::<Condition>::new()).is_empty());
        assert!(or([Condition::default(), Condition::default()]).is_empty());
    }

    #[test]
    fn test_not_wraps_and_clears_operator() {
        let cond = not(or([eq("a", 1), eq("b", 2)]));
        assert_eq!(cond.fragment(), "NOT(a = ? OR b = ?)");
        assert_eq!(cond.operator(), None);

        let combined = and([cond, eq("c", 3)]);
        assert_eq!(combined.fragment(), "NOT(a = ? OR b = ?) AND c = ?");
    }

    #[test]
    fn test_not_of_empty_is_empty() {
        let cond = not(Condition::default());
        assert!(cond.is_empty());
        assert_eq!(cond, Condition::default());
    }

    #[test]
    fn test_not_operator_trait() {
        let cond = !eq("a", 1);
        assert_eq!(cond.fragment(), "NOT(a = ?)");
    }

    #[test]
    fn test_raw_passthrough() {
        let cond = raw("a = ? OR b = ?", [1, 2]);
        let combined = and([cond, eq("c", 3)]);
        // raw fragments carry no operator, so they are never wrapped
        assert_eq!(combined.fragment(), "a = ? OR b = ? AND c = ?");
        assert_eq!(combined.params().len(), 3);
    }

    #[test]
    fn test_into_parts() {
        let (fragment, params) = and([eq("a", "x"), is_null("b")]).into_parts();
        assert_eq!(fragment, "a = ? AND b IS NULL");
        assert_eq!(params, vec![Value::Text("x".to_string())]);
    }
}
