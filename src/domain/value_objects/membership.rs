use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Value;

/// The accepted argument shapes of a membership (`IN`) predicate.
///
/// The shape is fixed at the call site through `From`: scalars become
/// `Scalar`, vectors, slices and arrays become `Sequence`, and `None` is an
/// empty sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Membership {
    Scalar(Value),
    Sequence(Vec<Value>),
}

impl Membership {
    /// Flatten into one ordered list: own values first, then `extra`.
    pub fn into_values<I, V>(self, extra: I) -> Vec<Value>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut values = match self {
            Membership::Scalar(value) => vec![value],
            Membership::Sequence(values) => values,
        };
        values.extend(extra.into_iter().map(Into::into));
        values
    }
}

macro_rules! impl_scalar_membership {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Membership {
                fn from(v: $ty) -> Self {
                    Membership::Scalar(Value::from(v))
                }
            }
        )*
    };
}

impl_scalar_membership!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    String,
    &str,
    &String,
    Uuid,
    DateTime<Utc>
);

impl From<Value> for Membership {
    fn from(v: Value) -> Self {
        match v {
            Value::List(items) => Membership::Sequence(items),
            other => Membership::Scalar(other),
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Membership {
    fn from(v: Vec<T>) -> Self {
        Membership::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Membership {
    fn from(v: [T; N]) -> Self {
        Membership::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Membership {
    fn from(v: &[T]) -> Self {
        Membership::Sequence(v.iter().cloned().map(Into::into).collect())
    }
}

impl<M: Into<Membership>> From<Option<M>> for Membership {
    fn from(v: Option<M>) -> Self {
        v.map(Into::into)
            .unwrap_or_else(|| Membership::Sequence(Vec::new()))
    }
}
