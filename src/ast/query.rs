use serde::{Deserialize, Serialize};

/// Whether a boolean clause must match, may match, or must not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occur {
    Must,
    Should,
    MustNot,
}

/// One clause of a boolean query: a sub-node and its occurrence requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanClause {
    pub occur: Occur,
    pub node: QueryNode,
}

impl BooleanClause {
    pub fn new(occur: Occur, node: QueryNode) -> Self {
        Self { occur, node }
    }

    pub fn must(node: QueryNode) -> Self {
        Self::new(Occur::Must, node)
    }

    pub fn should(node: QueryNode) -> Self {
        Self::new(Occur::Should, node)
    }

    pub fn must_not(node: QueryNode) -> Self {
        Self::new(Occur::MustNot, node)
    }
}

/// A parsed search query node.
///
/// Produced by the parser (or constructed directly by callers) and consumed
/// read-only by the compiler. The compiler may build normalized copies of
/// leaf nodes internally but never mutates a caller-supplied tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryNode {
    /// A single word to match.
    Term { field: String, text: String },
    /// A quoted phrase, split into whitespace-analyzed words.
    Phrase { field: String, words: Vec<String> },
    /// A `text*` prefix match.
    Prefix { field: String, text: String },
    /// A pattern containing `?` and/or `*` wildcards.
    Wildcard { field: String, pattern: String },
    /// A `text~similarity` fuzzy match.
    Fuzzy {
        field: String,
        text: String,
        similarity: f32,
    },
    /// A `[lower TO upper]` / `{lower TO upper}` range. `None` bounds are open.
    Range {
        field: String,
        lower: Option<String>,
        upper: Option<String>,
        inclusive_lower: bool,
        inclusive_upper: bool,
    },
    /// A nested boolean combination of clauses.
    Boolean { clauses: Vec<BooleanClause> },
}

impl QueryNode {
    pub fn term(field: impl Into<String>, text: impl Into<String>) -> Self {
        QueryNode::Term {
            field: field.into(),
            text: text.into(),
        }
    }

    pub fn phrase(field: impl Into<String>, words: Vec<String>) -> Self {
        QueryNode::Phrase {
            field: field.into(),
            words,
        }
    }

    pub fn prefix(field: impl Into<String>, text: impl Into<String>) -> Self {
        QueryNode::Prefix {
            field: field.into(),
            text: text.into(),
        }
    }

    pub fn wildcard(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        QueryNode::Wildcard {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    pub fn fuzzy(field: impl Into<String>, text: impl Into<String>, similarity: f32) -> Self {
        QueryNode::Fuzzy {
            field: field.into(),
            text: text.into(),
            similarity,
        }
    }

    pub fn boolean(clauses: Vec<BooleanClause>) -> Self {
        QueryNode::Boolean { clauses }
    }

    /// Stable name of the node kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryNode::Term { .. } => "term",
            QueryNode::Phrase { .. } => "phrase",
            QueryNode::Prefix { .. } => "prefix",
            QueryNode::Wildcard { .. } => "wildcard",
            QueryNode::Fuzzy { .. } => "fuzzy",
            QueryNode::Range { .. } => "range",
            QueryNode::Boolean { .. } => "boolean",
        }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, QueryNode::Boolean { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_constructor() {
        let node = QueryNode::term("{{COLUMN}}", "ABC");
        assert_eq!(node.kind(), "term");
        assert!(!node.is_boolean());
    }

    #[test]
    fn test_boolean_clause_helpers() {
        let clause = BooleanClause::must_not(QueryNode::term("f", "x"));
        assert_eq!(clause.occur, Occur::MustNot);
    }

    #[test]
    fn test_boolean_constructor() {
        let node = QueryNode::boolean(vec![
            BooleanClause::must(QueryNode::term("f", "a")),
            BooleanClause::should(QueryNode::term("f", "b")),
        ]);
        assert!(node.is_boolean());
        match node {
            QueryNode::Boolean { clauses } => assert_eq!(clauses.len(), 2),
            _ => panic!("expected boolean"),
        }
    }

    #[test]
    fn test_kind_names() {
        let range = QueryNode::Range {
            field: "f".to_string(),
            lower: Some("A".to_string()),
            upper: Some("B".to_string()),
            inclusive_lower: false,
            inclusive_upper: false,
        };
        assert_eq!(range.kind(), "range");
        assert_eq!(QueryNode::fuzzy("f", "x", 0.5).kind(), "fuzzy");
    }

    #[test]
    fn test_node_serialization() {
        let node = QueryNode::wildcard("f", "AB?C*");
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("wildcard"));
        assert!(json.contains("AB?C*"));
    }
}
