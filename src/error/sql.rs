use thiserror::Error;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum SqlError {
    /// A dialect leaf renderer received a node kind it must never see.
    /// This signals a contract violation in the dispatch layer, not bad
    /// user input, and is never swallowed.
    #[error("invalid query node for leaf rendering: {0}")]
    InvalidQueryNode(&'static str),

    #[error("empty table name")]
    EmptyTableName,

    #[error("no return columns specified")]
    NoReturnColumns,

    #[error("query has no supported clauses, cannot build a statement")]
    UnsupportedQuery,
}
