//! # Lucene Query to SQL
//!
//! A Rust library for compiling Lucene-style search queries into parameterized
//! SQL Server predicates.
//!
//! ## Features
//!
//! - **Lucene Query Syntax**: terms, quoted phrases, `prefix*` and `wild?card`
//!   patterns, `fuzzy~0.8` terms, `[a TO b]` ranges, `AND`/`OR`/`NOT`
//!   (plus `&&`, `||`, `!`), `+required`/`-prohibited` modifiers, grouping
//!   with parentheses, and `field:` prefixes
//! - **Parameterized Output**: every user-supplied value travels as a named
//!   `@fieldN` parameter, never as concatenated SQL text
//! - **Two Dialects**: `LIKE '%' + @fieldN + '%'` pattern matching and
//!   full-text `CONTAINS({{COLUMN}}, @fieldN)` rendering
//! - **Metacharacter Escaping**: `[`, `%`, `_`, and `{` in search text are
//!   escaped so they match literally inside `LIKE` patterns
//! - **Column Expansion**: replicate a compiled predicate across several
//!   columns, OR-combined, with parameters renumbered globally
//! - **Statement Assembly**: wrap a predicate into a full `SELECT` over
//!   quoted table and column identifiers
//!
//! ## Quick Start
//!
//! ```rust
//! use lucene_to_sql::QueryCompiler;
//!
//! let compiler = QueryCompiler::sql_server();
//!
//! let clause = compiler.build_where_clause("abc AND def").unwrap();
//! assert_eq!(
//!     clause.sql,
//!     "({{COLUMN}} LIKE '%' + @field1 + '%') AND ({{COLUMN}} LIKE '%' + @field2 + '%')"
//! );
//! assert_eq!(clause.parameter("field1"), Some("ABC"));
//! assert_eq!(clause.parameter("field2"), Some("DEF"));
//! ```
//!
//! Queries are uppercased before parsing, so matching is case-insensitive as
//! long as the searched columns are compared case-insensitively too.
//!
//! ## Column Expansion
//!
//! ```rust
//! use lucene_to_sql::like_where_clause_for_columns;
//!
//! let clause = like_where_clause_for_columns("abc", &["name", "summary"]).unwrap();
//! assert_eq!(
//!     clause.sql,
//!     "(name LIKE '%' + @field1 + '%') OR (summary LIKE '%' + @field2 + '%')"
//! );
//! ```
//!
//! Column names passed to the WHERE-clause entry points are spliced into the
//! SQL verbatim and must come from trusted configuration, never from user
//! input. Only [`QueryCompiler::build_statement`] quotes identifiers.
//!
//! ## Full-Text Search
//!
//! ```rust
//! use lucene_to_sql::full_text_where_clause;
//!
//! let clause = full_text_where_clause("\"apple pie\"").unwrap();
//! assert_eq!(clause.sql, "CONTAINS({{COLUMN}}, @field1)");
//! assert_eq!(clause.parameter("field1"), Some("APPLE PIE"));
//! ```
//!
//! ## Unsupported Queries
//!
//! Range queries have no rendering in either dialect. A query with no
//! supported content compiles to an empty result rather than an error:
//!
//! ```rust
//! use lucene_to_sql::like_where_clause;
//!
//! let clause = like_where_clause("[aaa TO bbb]").unwrap();
//! assert!(clause.is_empty());
//! ```

pub mod ast;
pub mod error;
pub mod parser;
pub mod sql;

pub use ast::{BooleanClause, Occur, QueryNode};
pub use error::{Error, ParseError, SqlError};
pub use parser::parse_query;
pub use sql::{
    Dialect, ParameterizedSql, Predicate, QueryCompiler, SqlServerDialect,
    SqlServerFullTextDialect, COLUMN_PLACEHOLDER,
};

/// Compiles a raw query into a `LIKE`-based WHERE-clause predicate over the
/// column placeholder.
///
/// # Examples
///
/// ```
/// use lucene_to_sql::like_where_clause;
///
/// let clause = like_where_clause("ab?cd*").unwrap();
/// assert_eq!(clause.sql, "{{COLUMN}} LIKE '%' + @field1 + '%'");
/// assert_eq!(clause.parameter("field1"), Some("AB_CD%"));
/// ```
pub fn like_where_clause(query: &str) -> Result<ParameterizedSql, Error> {
    QueryCompiler::sql_server().build_where_clause(query)
}

/// Compiles a raw query into a `LIKE`-based predicate replicated across the
/// given trusted columns.
pub fn like_where_clause_for_columns(
    query: &str,
    columns: &[&str],
) -> Result<ParameterizedSql, Error> {
    QueryCompiler::sql_server().build_where_clause_for_columns(query, columns)
}

/// Compiles a raw query into a full-text `CONTAINS` predicate over the
/// column placeholder.
///
/// # Examples
///
/// ```
/// use lucene_to_sql::full_text_where_clause;
///
/// let clause = full_text_where_clause("appl*").unwrap();
/// assert_eq!(clause.sql, "CONTAINS({{COLUMN}}, @field1)");
/// assert_eq!(clause.parameter("field1"), Some("\"APPL*\""));
/// ```
pub fn full_text_where_clause(query: &str) -> Result<ParameterizedSql, Error> {
    QueryCompiler::sql_server_full_text().build_where_clause(query)
}

/// Compiles a raw query into a full-text predicate replicated across the
/// given trusted columns.
pub fn full_text_where_clause_for_columns(
    query: &str,
    columns: &[&str],
) -> Result<ParameterizedSql, Error> {
    QueryCompiler::sql_server_full_text().build_where_clause_for_columns(query, columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_where_clause_uppercases() {
        let clause = like_where_clause("abc").unwrap();
        assert_eq!(clause.parameter("field1"), Some("ABC"));
    }

    #[test]
    fn test_like_where_clause_parse_error() {
        let result = like_where_clause("(abc");
        assert!(matches!(
            result,
            Err(Error::Parse(ParseError::UnclosedGroup))
        ));
    }

    #[test]
    fn test_like_where_clause_empty_query() {
        assert!(matches!(
            like_where_clause("   "),
            Err(Error::Parse(ParseError::EmptyQuery))
        ));
    }

    #[test]
    fn test_full_text_where_clause() {
        let clause = full_text_where_clause("abc").unwrap();
        assert_eq!(clause.sql, "CONTAINS({{COLUMN}}, @field1)");
    }

    #[test]
    fn test_columns_variant_renumbers() {
        let clause = like_where_clause_for_columns("abc def", &["a", "b"]).unwrap();
        assert_eq!(clause.parameters.len(), 4);
        assert_eq!(clause.parameters[3].0, "field4");
    }

    #[test]
    fn test_unsupported_query_is_empty_not_error() {
        let clause = full_text_where_clause("{aaa TO bbb}").unwrap();
        assert!(clause.is_empty());
    }
}
