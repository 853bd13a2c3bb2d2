use crate::ast::QueryNode;
use crate::error::SqlError;

use super::predicate::Predicate;
use super::template::Template;

/// A dialect renders one normalized leaf node (`Term`, `Wildcard`, `Fuzzy`,
/// `Range`) into a single-parameter predicate fragment.
///
/// Returning `Predicate::unsupported()` means the dialect has no rendering
/// for a well-formed node (both built-in dialects do this for `Range`); the
/// clause is then dropped silently during composition. An `Err` is reserved
/// for contract violations: a `Phrase`, `Prefix`, or `Boolean` node must be
/// normalized or dispatched before it ever reaches a dialect.
pub trait Dialect {
    fn render_leaf(&self, node: &QueryNode) -> Result<Predicate, SqlError>;
}

/// Escapes SQL pattern metacharacters in a search literal.
///
/// The `[` replacement must run first: every later replacement emits
/// brackets of its own, and those must not be re-escaped. Escaping `{`
/// keeps a literal `{{COLUMN}}` in search text from colliding with the
/// column placeholder token.
pub fn escape_pattern_literal(text: &str) -> String {
    text.replace('[', "[[]")
        .replace('%', "[%]")
        .replace('_', "[_]")
        .replace('{', "[{]")
}

/// Pattern-match dialect: renders leaves as `{{COLUMN}} LIKE '%' + @fieldN
/// + '%'`, with `*`→`%` and `?`→`_` wildcard translation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerDialect;

impl SqlServerDialect {
    fn like_predicate(value: String) -> Predicate {
        let mut template = Template::new();
        template.push_column();
        template.push_literal(" LIKE '%' + ");
        template.push_param(1);
        template.push_literal(" + '%'");
        Predicate::single(template, value)
    }
}

impl Dialect for SqlServerDialect {
    fn render_leaf(&self, node: &QueryNode) -> Result<Predicate, SqlError> {
        match node {
            // Fuzzy similarity is discarded: no actual fuzzy search, only
            // literal containment.
            QueryNode::Term { text, .. } | QueryNode::Fuzzy { text, .. } => {
                Ok(Self::like_predicate(escape_pattern_literal(text)))
            }
            QueryNode::Wildcard { pattern, .. } => {
                let value = escape_pattern_literal(pattern)
                    .replace('*', "%")
                    .replace('?', "_");
                Ok(Self::like_predicate(value))
            }
            QueryNode::Range { .. } => Ok(Predicate::unsupported()),
            other => Err(SqlError::InvalidQueryNode(other.kind())),
        }
    }
}

/// Full-text dialect: renders leaves as `CONTAINS({{COLUMN}}, @fieldN)`.
///
/// Only `?` is translated (to `_`); a trailing `*` is native full-text
/// prefix syntax and must survive untouched. Wildcard literals are wrapped
/// in double quotes inside the parameter value, as `CONTAINS` requires for
/// multi-word and prefix patterns.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerFullTextDialect;

impl SqlServerFullTextDialect {
    fn contains_predicate(value: String) -> Predicate {
        let mut template = Template::new();
        template.push_literal("CONTAINS(");
        template.push_column();
        template.push_literal(", ");
        template.push_param(1);
        template.push_literal(")");
        Predicate::single(template, value)
    }
}

impl Dialect for SqlServerFullTextDialect {
    fn render_leaf(&self, node: &QueryNode) -> Result<Predicate, SqlError> {
        match node {
            QueryNode::Term { text, .. } | QueryNode::Fuzzy { text, .. } => {
                Ok(Self::contains_predicate(escape_pattern_literal(text)))
            }
            QueryNode::Wildcard { pattern, .. } => {
                let escaped = escape_pattern_literal(pattern).replace('?', "_");
                Ok(Self::contains_predicate(format!("\"{}\"", escaped)))
            }
            QueryNode::Range { .. } => Ok(Predicate::unsupported()),
            other => Err(SqlError::InvalidQueryNode(other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_order_all_metacharacters() {
        // Brackets first, then %, _, {; later steps must not double-escape
        // the brackets emitted by earlier ones.
        assert_eq!(escape_pattern_literal("[%_{"), "[[][%][_][{]");
    }

    #[test]
    fn test_escape_is_deterministic() {
        let input = "5% of [WEIRD] {{TEXT}}_x";
        assert_eq!(
            escape_pattern_literal(input),
            escape_pattern_literal(input)
        );
    }

    #[test]
    fn test_like_term() {
        let pred = SqlServerDialect
            .render_leaf(&QueryNode::term("{{COLUMN}}", "ABC"))
            .unwrap();
        let sql = pred.into_parameterized_sql();
        assert_eq!(sql.sql, "{{COLUMN}} LIKE '%' + @field1 + '%'");
        assert_eq!(sql.parameter("field1"), Some("ABC"));
    }

    #[test]
    fn test_like_wildcard_translation() {
        let pred = SqlServerDialect
            .render_leaf(&QueryNode::wildcard("{{COLUMN}}", "AB?CD*"))
            .unwrap();
        let sql = pred.into_parameterized_sql();
        assert_eq!(sql.parameter("field1"), Some("AB_CD%"));
    }

    #[test]
    fn test_like_escapes_before_translation() {
        // A literal % in the pattern is escaped; the * wildcard still maps
        // to an unescaped %.
        let pred = SqlServerDialect
            .render_leaf(&QueryNode::wildcard("{{COLUMN}}", "100%*"))
            .unwrap();
        let sql = pred.into_parameterized_sql();
        assert_eq!(sql.parameter("field1"), Some("100[%]%"));
    }

    #[test]
    fn test_like_fuzzy_as_term() {
        let pred = SqlServerDialect
            .render_leaf(&QueryNode::fuzzy("{{COLUMN}}", "ABLE", 0.7))
            .unwrap();
        let sql = pred.into_parameterized_sql();
        assert_eq!(sql.sql, "{{COLUMN}} LIKE '%' + @field1 + '%'");
        assert_eq!(sql.parameter("field1"), Some("ABLE"));
    }

    #[test]
    fn test_range_unsupported_in_both_dialects() {
        let range = QueryNode::Range {
            field: "{{COLUMN}}".to_string(),
            lower: Some("A".to_string()),
            upper: Some("B".to_string()),
            inclusive_lower: false,
            inclusive_upper: false,
        };
        assert!(SqlServerDialect.render_leaf(&range).unwrap().is_unsupported());
        assert!(SqlServerFullTextDialect
            .render_leaf(&range)
            .unwrap()
            .is_unsupported());
    }

    #[test]
    fn test_full_text_term() {
        let pred = SqlServerFullTextDialect
            .render_leaf(&QueryNode::term("{{COLUMN}}", "ABC"))
            .unwrap();
        let sql = pred.into_parameterized_sql();
        assert_eq!(sql.sql, "CONTAINS({{COLUMN}}, @field1)");
        assert_eq!(sql.parameter("field1"), Some("ABC"));
    }

    #[test]
    fn test_full_text_wildcard_keeps_star_and_quotes_value() {
        let pred = SqlServerFullTextDialect
            .render_leaf(&QueryNode::wildcard("{{COLUMN}}", "AB?CD*"))
            .unwrap();
        let sql = pred.into_parameterized_sql();
        assert_eq!(sql.sql, "CONTAINS({{COLUMN}}, @field1)");
        assert_eq!(sql.parameter("field1"), Some("\"AB_CD*\""));
    }

    #[test]
    fn test_boolean_node_is_invalid_for_leaf_rendering() {
        let node = QueryNode::boolean(vec![]);
        assert_eq!(
            SqlServerDialect.render_leaf(&node),
            Err(SqlError::InvalidQueryNode("boolean"))
        );
    }

    #[test]
    fn test_phrase_node_is_invalid_for_leaf_rendering() {
        let node = QueryNode::phrase("f", vec!["A".to_string()]);
        assert_eq!(
            SqlServerFullTextDialect.render_leaf(&node),
            Err(SqlError::InvalidQueryNode("phrase"))
        );
    }
}
