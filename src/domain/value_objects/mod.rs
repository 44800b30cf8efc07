mod membership;
mod operator;
mod sort_order;
mod value;

pub use membership::Membership;
pub use operator::Operator;
pub use sort_order::{OrderBy, SortOrder};
pub use value::Value;
