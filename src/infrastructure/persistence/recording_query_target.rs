use serde::Serialize;

use crate::application::ports::QueryTarget;
use crate::domain::condition::Condition;
use crate::domain::value_objects::{OrderBy, Value};

/// One operation applied to a query target
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PlanOp {
    Select { fields: Vec<String> },
    Omit { fields: Vec<String> },
    Limit { value: u64 },
    Offset { value: u64 },
    Where { fragment: String, params: Vec<Value> },
    Join { relation: String, fragment: String, params: Vec<Value> },
    Preload { relation: String, fragment: String, params: Vec<Value> },
    Order { clauses: Vec<String> },
}

impl PlanOp {
    pub fn name(&self) -> &'static str {
        match self {
            PlanOp::Select { .. } => "select",
            PlanOp::Omit { .. } => "omit",
            PlanOp::Limit { .. } => "limit",
            PlanOp::Offset { .. } => "offset",
            PlanOp::Where { .. } => "where",
            PlanOp::Join { .. } => "join",
            PlanOp::Preload { .. } => "preload",
            PlanOp::Order { .. } => "order",
        }
    }
}

/// Query target that only records what was applied to it, in order.
///
/// Used to explain a plan without a database.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordingQueryTarget {
    ops: Vec<PlanOp>,
}

impl RecordingQueryTarget {
    pub fn ops(&self) -> &[PlanOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<PlanOp> {
        self.ops
    }

    fn record(mut self, op: PlanOp) -> Self {
        self.ops.push(op);
        self
    }
}

impl QueryTarget for RecordingQueryTarget {
    fn select(self, fields: &[String]) -> Self {
        self.record(PlanOp::Select {
            fields: fields.to_vec(),
        })
    }

    fn omit(self, fields: &[String]) -> Self {
        self.record(PlanOp::Omit {
            fields: fields.to_vec(),
        })
    }

    fn limit(self, limit: u64) -> Self {
        self.record(PlanOp::Limit { value: limit })
    }

    fn offset(self, offset: u64) -> Self {
        self.record(PlanOp::Offset { value: offset })
    }

    fn filter(self, condition: &Condition) -> Self {
        self.record(PlanOp::Where {
            fragment: condition.fragment().to_string(),
            params: condition.params().to_vec(),
        })
    }

    fn joins(self, relation: &str, scope: &Condition) -> Self {
        self.record(PlanOp::Join {
            relation: relation.to_string(),
            fragment: scope.fragment().to_string(),
            params: scope.params().to_vec(),
        })
    }

    fn preload(self, relation: &str, scope: &Condition) -> Self {
        self.record(PlanOp::Preload {
            relation: relation.to_string(),
            fragment: scope.fragment().to_string(),
            params: scope.params().to_vec(),
        })
    }

    fn order(self, orders: &[OrderBy]) -> Self {
        self.record(PlanOp::Order {
            clauses: orders.iter().map(ToString::to_string).collect(),
        })
    }
}
