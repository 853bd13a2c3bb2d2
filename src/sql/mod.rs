pub mod builder;
pub mod dialect;
pub mod predicate;
pub mod template;

pub use builder::QueryCompiler;
pub use dialect::{Dialect, SqlServerDialect, SqlServerFullTextDialect};
pub use predicate::{ParameterizedSql, Predicate};
pub use template::{Segment, Template, COLUMN_PLACEHOLDER};
