use serde::{Deserialize, Serialize};

/// Boolean combinator last applied at the top level of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    /// Separator written between two combined fragments.
    pub fn token(self) -> &'static str {
        match self {
            Operator::And => " AND ",
            Operator::Or => " OR ",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::And => write!(f, "AND"),
            Operator::Or => write!(f, "OR"),
        }
    }
}
