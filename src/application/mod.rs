pub mod association;
pub mod builder;
pub mod chain;
pub mod dto;
pub mod errors;
pub mod paging;
pub mod ports;
pub mod use_cases;
