pub mod common;
pub mod query;

pub use query::parse_query;
