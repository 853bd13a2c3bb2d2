pub mod query;

pub use query::{BooleanClause, Occur, QueryNode};
