use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::association::{Association, AssociationKind};
use crate::domain::condition::{self, Condition};
use crate::domain::value_objects::Value;

/// Declarative filter tree, deserialized from JSON such as
/// `{"op": "and", "filters": [{"op": "eq", "field": "a", "value": 1}]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FilterDto {
    Eq {
        field: String,
        value: Value,
    },
    NotEq {
        field: String,
        value: Value,
    },
    Gt {
        field: String,
        value: Value,
    },
    Gte {
        field: String,
        value: Value,
    },
    Lt {
        field: String,
        value: Value,
    },
    Lte {
        field: String,
        value: Value,
    },
    In {
        field: String,
        values: Vec<Value>,
    },
    NotIn {
        field: String,
        values: Vec<Value>,
    },
    Like {
        field: String,
        pattern: String,
    },
    NotLike {
        field: String,
        pattern: String,
    },
    IsNull {
        field: String,
    },
    IsNotNull {
        field: String,
    },
    Between {
        field: String,
        lower: Value,
        upper: Value,
    },
    NotBetween {
        field: String,
        lower: Value,
        upper: Value,
    },
    And {
        filters: Vec<FilterDto>,
    },
    Or {
        filters: Vec<FilterDto>,
    },
    Not {
        filter: Box<FilterDto>,
    },
    Raw {
        fragment: String,
        #[serde(default)]
        params: Vec<Value>,
    },
}

impl From<FilterDto> for Condition {
    fn from(dto: FilterDto) -> Self {
        match dto {
            FilterDto::Eq { field, value } => condition::eq(&field, value),
            FilterDto::NotEq { field, value } => condition::not_eq(&field, value),
            FilterDto::Gt { field, value } => condition::gt(&field, value),
            FilterDto::Gte { field, value } => condition::gte(&field, value),
            FilterDto::Lt { field, value } => condition::lt(&field, value),
            FilterDto::Lte { field, value } => condition::lte(&field, value),
            FilterDto::In { field, values } => condition::is_in(&field, values),
            FilterDto::NotIn { field, values } => condition::not_in(&field, values),
            FilterDto::Like { field, pattern } => condition::like(&field, pattern),
            FilterDto::NotLike { field, pattern } => condition::not_like(&field, pattern),
            FilterDto::IsNull { field } => condition::is_null(&field),
            FilterDto::IsNotNull { field } => condition::is_not_null(&field),
            FilterDto::Between {
                field,
                lower,
                upper,
            } => condition::between(&field, lower, upper),
            FilterDto::NotBetween {
                field,
                lower,
                upper,
            } => condition::not_between(&field, lower, upper),
            FilterDto::And { filters } => condition::and(filters.into_iter().map(Condition::from)),
            FilterDto::Or { filters } => condition::or(filters.into_iter().map(Condition::from)),
            FilterDto::Not { filter } => condition::not(Condition::from(*filter)),
            FilterDto::Raw { fragment, params } => condition::raw(fragment, params),
        }
    }
}

/// Related table and the filters scoped to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationDto {
    pub relation: String,
    #[serde(default)]
    pub filters: Vec<FilterDto>,
}

impl AssociationDto {
    pub fn into_association(self, kind: AssociationKind) -> Option<Association> {
        Association::new(
            kind,
            &self.relation,
            self.filters.into_iter().map(Condition::from),
        )
    }
}

/// Offset pagination parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PageQuery {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: i64,
    #[validate(range(min = 1, max = 1000, message = "per_page must be between 1 and 1000"))]
    pub per_page: Option<i64>,
    #[serde(default)]
    pub sort_by: Vec<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
}

/// A complete plan request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct PlanRequest {
    #[serde(default)]
    pub select: Vec<String>,
    #[serde(default)]
    pub omit: Vec<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub filter: Option<FilterDto>,
    #[serde(default)]
    pub joins: Vec<AssociationDto>,
    #[serde(default)]
    pub preloads: Vec<AssociationDto>,
    #[validate(nested)]
    pub page: Option<PageQuery>,
}
