use crate::ast::{BooleanClause, Occur, QueryNode};
use crate::error::{Error, SqlError};
use crate::parser;

use super::dialect::{Dialect, SqlServerDialect, SqlServerFullTextDialect};
use super::predicate::{ParameterizedSql, Predicate};

/// Compiles query trees into parameterized SQL predicates through a
/// dialect-specific leaf renderer.
///
/// Compilation is a pure tree transformation: the compiler holds no mutable
/// state and one instance may be shared across threads.
pub struct QueryCompiler {
    dialect: Box<dyn Dialect + Send + Sync>,
}

impl QueryCompiler {
    pub fn new(dialect: Box<dyn Dialect + Send + Sync>) -> Self {
        Self { dialect }
    }

    /// Pattern-match compiler: leaves render to `LIKE` predicates.
    pub fn sql_server() -> Self {
        Self::new(Box::new(SqlServerDialect))
    }

    /// Full-text compiler: leaves render to `CONTAINS` predicates.
    pub fn sql_server_full_text() -> Self {
        Self::new(Box::new(SqlServerFullTextDialect))
    }

    /// Parses a raw query string and compiles it into a WHERE-clause
    /// predicate over the column placeholder.
    ///
    /// The query is uppercased before parsing, so matching is
    /// case-insensitive provided the searched columns hold (or are compared
    /// against) uppercased text. An empty result means the query contained
    /// nothing the dialect supports; check [`ParameterizedSql::is_empty`].
    pub fn build_where_clause(&self, query: &str) -> Result<ParameterizedSql, Error> {
        let tree = parser::parse_query(&query.to_uppercase())?;
        Ok(self.compile(&tree)?)
    }

    /// Like [`Self::build_where_clause`], but replicates the predicate
    /// across the given trusted column identifiers, OR-combined.
    pub fn build_where_clause_for_columns(
        &self,
        query: &str,
        columns: &[&str],
    ) -> Result<ParameterizedSql, Error> {
        let tree = parser::parse_query(&query.to_uppercase())?;
        Ok(self.compile_for_columns(&tree, columns)?)
    }

    /// Wraps an expanded predicate into a full SELECT statement over
    /// trusted identifiers, which are quoted here.
    ///
    /// Unlike the WHERE-clause entry points, an unsupported query is an
    /// error: there is no meaningful statement without a WHERE clause.
    pub fn build_statement(
        &self,
        query: &str,
        table: &str,
        search_columns: &[&str],
        return_columns: &[&str],
    ) -> Result<ParameterizedSql, Error> {
        if table.is_empty() {
            return Err(SqlError::EmptyTableName.into());
        }
        if return_columns.is_empty() {
            return Err(SqlError::NoReturnColumns.into());
        }

        let quoted_search: Vec<String> =
            search_columns.iter().map(|c| quote_identifier(c)).collect();
        let search_refs: Vec<&str> = quoted_search.iter().map(String::as_str).collect();

        let tree = parser::parse_query(&query.to_uppercase())?;
        let predicate = self.compile_node(&tree)?;
        let expanded = self.expand_columns(&predicate, &search_refs);
        if expanded.is_unsupported() {
            return Err(SqlError::UnsupportedQuery.into());
        }

        let returns: Vec<String> = return_columns.iter().map(|c| quote_identifier(c)).collect();
        let where_clause = expanded.into_parameterized_sql();
        let sql = format!(
            "SELECT {}\nFROM {}\nWHERE {};",
            returns.join(", "),
            quote_identifier(table),
            where_clause.sql
        );

        Ok(ParameterizedSql {
            sql,
            parameters: where_clause.parameters,
        })
    }

    /// Compiles an already-parsed tree into a predicate over the column
    /// placeholder.
    pub fn compile(&self, node: &QueryNode) -> Result<ParameterizedSql, SqlError> {
        Ok(self.compile_node(node)?.into_parameterized_sql())
    }

    /// Compiles a tree and expands the result across trusted columns.
    pub fn compile_for_columns(
        &self,
        node: &QueryNode,
        columns: &[&str],
    ) -> Result<ParameterizedSql, SqlError> {
        let predicate = self.compile_node(node)?;
        Ok(self
            .expand_columns(&predicate, columns)
            .into_parameterized_sql())
    }

    /// Per-kind dispatch: booleans recurse, phrases and prefixes are
    /// normalized into the leaf kinds the dialect understands, everything
    /// else goes to the dialect.
    fn compile_node(&self, node: &QueryNode) -> Result<Predicate, SqlError> {
        match node {
            QueryNode::Boolean { clauses } => self.compile_boolean(clauses),
            QueryNode::Phrase { field, words } => {
                self.compile_node(&normalize_phrase(field, words))
            }
            QueryNode::Prefix { field, text } => {
                self.compile_node(&QueryNode::wildcard(field.clone(), format!("{}*", text)))
            }
            leaf => self.dialect.render_leaf(leaf),
        }
    }

    /// Renders a boolean node with Lucene occurrence semantics.
    ///
    /// Clauses are reordered into MUST, SHOULD, MUST_NOT; SHOULD clauses are
    /// dropped entirely when any MUST clause exists. Unsupported sub-trees
    /// are skipped and do not participate in grouping. Consecutive clauses
    /// of the same requirement form a group joined inline (`AND`, `OR`,
    /// `AND NOT` with a leading `NOT`); multiple groups are parenthesized
    /// and joined with `AND`. A lone MUST/SHOULD clause collapses to its own
    /// predicate. Parameters are renumbered in processing order, not input
    /// order.
    fn compile_boolean(&self, clauses: &[BooleanClause]) -> Result<Predicate, SqlError> {
        let has_must = clauses.iter().any(|c| c.occur == Occur::Must);

        let mut ordered: Vec<&BooleanClause> =
            clauses.iter().filter(|c| c.occur == Occur::Must).collect();
        if !has_must {
            // SHOULD clauses are only relevant when there are no MUST
            // clauses.
            ordered.extend(clauses.iter().filter(|c| c.occur == Occur::Should));
        }
        ordered.extend(clauses.iter().filter(|c| c.occur == Occur::MustNot));

        let mut rendered: Vec<(Occur, Predicate)> = Vec::new();
        for clause in ordered {
            let sub = self.compile_node(&clause.node)?;
            if sub.is_unsupported() {
                continue;
            }
            rendered.push((clause.occur, sub));
        }

        if rendered.is_empty() {
            return Ok(Predicate::unsupported());
        }
        if rendered.len() == 1 && rendered[0].0 != Occur::MustNot {
            return Ok(rendered.pop().map(|(_, p)| p).unwrap_or_default());
        }

        let mut groups: Vec<Predicate> = Vec::new();
        let mut current: Option<(Occur, Predicate)> = None;
        for (occur, sub) in rendered {
            match current.as_mut() {
                Some((kind, group)) if *kind == occur => {
                    group.push_literal(group_joiner(occur));
                    group.append_wrapped(sub);
                }
                _ => {
                    if let Some((_, done)) = current.take() {
                        groups.push(done);
                    }
                    let mut group = Predicate::default();
                    if occur == Occur::MustNot {
                        group.push_literal("NOT ");
                    }
                    group.append_wrapped(sub);
                    current = Some((occur, group));
                }
            }
        }
        if let Some((_, done)) = current {
            groups.push(done);
        }

        if groups.len() == 1 {
            return Ok(groups.into_iter().next().unwrap_or_default());
        }

        let mut combined = Predicate::default();
        for (position, group) in groups.into_iter().enumerate() {
            if position > 0 {
                combined.push_literal(" AND ");
            }
            combined.append_wrapped(group);
        }
        Ok(combined)
    }

    /// Substitutes the column placeholder per column and OR-combines the
    /// copies, renumbering parameters globally in column order. An
    /// unsupported predicate or an empty column list yields the sentinel.
    fn expand_columns(&self, predicate: &Predicate, columns: &[&str]) -> Predicate {
        if predicate.is_unsupported() || columns.is_empty() {
            return Predicate::unsupported();
        }

        let mut combined = Predicate::default();
        for (position, column) in columns.iter().enumerate() {
            if position > 0 {
                combined.push_literal(" OR ");
            }
            combined.append_wrapped(predicate.bind_column(column));
        }
        combined
    }
}

fn group_joiner(occur: Occur) -> &'static str {
    match occur {
        Occur::Must => " AND ",
        Occur::Should => " OR ",
        Occur::MustNot => " AND NOT ",
    }
}

/// Normalizes a phrase into the single leaf its joined words amount to: a
/// wildcard when the joined text contains pattern characters, a term
/// otherwise.
fn normalize_phrase(field: &str, words: &[String]) -> QueryNode {
    let joined = words.join(" ");
    if joined.contains('*') || joined.contains('?') {
        QueryNode::wildcard(field, joined)
    } else {
        QueryNode::term(field, joined)
    }
}

/// Quotes a trusted identifier: embedded quotes doubled, wrapped in `"`.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
