pub mod condition;
pub mod errors;
pub mod value_objects;
