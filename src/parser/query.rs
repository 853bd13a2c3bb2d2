use crate::ast::{BooleanClause, Occur, QueryNode};
use crate::error::ParseError;
use crate::sql::COLUMN_PLACEHOLDER;

use super::common::{
    field_prefix, keyword, scan_phrase_body, scan_word, similarity, skip_ws,
};

const DEFAULT_FUZZY_SIMILARITY: f32 = 0.5;

/// `(value, remaining input)` pair threaded through the descent.
type PResult<'a, T> = Result<(T, &'a str), ParseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conj {
    None,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mods {
    None,
    Required,
    Prohibited,
}

/// Parses a Lucene-syntax query into a query tree.
///
/// The parser is case-preserving; `AND`, `OR`, `NOT`, and `TO` keywords are
/// matched exactly. Compiler entry points that take a raw query string
/// uppercase it first, which also makes keyword matching effectively
/// case-insensitive for end users.
pub fn parse_query(input: &str) -> Result<QueryNode, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::EmptyQuery);
    }

    let (node, rest) = query(input, COLUMN_PLACEHOLDER)?;
    let rest = skip_ws(rest);
    if !rest.is_empty() {
        if rest.starts_with(')') {
            return Err(ParseError::UnexpectedClosingParenthesis);
        }
        return Err(ParseError::TrailingInput(rest.to_string()));
    }
    Ok(node)
}

/// A clause sequence at one nesting level. A single clause that carried no
/// modifier collapses to its inner node instead of a one-clause boolean.
fn query<'a>(i: &'a str, field: &str) -> PResult<'a, QueryNode> {
    let mut clauses: Vec<BooleanClause> = Vec::new();

    let (mods, rest) = modifiers(skip_ws(i));
    let (node, mut i) = clause(skip_ws(rest), field)?;
    let first = (mods == Mods::None).then(|| node.clone());
    add_clause(&mut clauses, Conj::None, mods, node);

    loop {
        let rest = skip_ws(i);
        if rest.is_empty() || rest.starts_with(')') {
            i = rest;
            break;
        }

        let (conj, rest) = conjunction(rest);
        let (mods, rest) = modifiers(skip_ws(rest));
        let rest = skip_ws(rest);
        if rest.is_empty() || rest.starts_with(')') {
            return Err(ParseError::ExpectedClause(rest.to_string()));
        }

        let (node, rest) = clause(rest, field)?;
        add_clause(&mut clauses, conj, mods, node);
        i = rest;
    }

    if clauses.len() == 1 {
        if let Some(node) = first {
            return Ok((node, i));
        }
    }
    Ok((QueryNode::boolean(clauses), i))
}

/// Occurrence resolution for a newly parsed clause, with AND as the default
/// operator: `AND` promotes a non-prohibited predecessor to MUST, `OR`
/// demotes a non-prohibited predecessor to SHOULD; the clause itself is
/// MUST_NOT when prohibited, SHOULD when introduced by `OR`, else MUST.
fn add_clause(clauses: &mut Vec<BooleanClause>, conj: Conj, mods: Mods, node: QueryNode) {
    if let Some(last) = clauses.last_mut() {
        if last.occur != Occur::MustNot {
            match conj {
                Conj::And => last.occur = Occur::Must,
                Conj::Or => last.occur = Occur::Should,
                Conj::None => {}
            }
        }
    }

    let occur = if mods == Mods::Prohibited {
        Occur::MustNot
    } else if conj == Conj::Or {
        Occur::Should
    } else {
        Occur::Must
    };

    clauses.push(BooleanClause::new(occur, node));
}

fn conjunction(i: &str) -> (Conj, &str) {
    if let Some(rest) = keyword(i, "AND") {
        (Conj::And, rest)
    } else if let Some(rest) = i.strip_prefix("&&") {
        (Conj::And, rest)
    } else if let Some(rest) = keyword(i, "OR") {
        (Conj::Or, rest)
    } else if let Some(rest) = i.strip_prefix("||") {
        (Conj::Or, rest)
    } else {
        (Conj::None, i)
    }
}

fn modifiers(i: &str) -> (Mods, &str) {
    if let Some(rest) = i.strip_prefix('+') {
        (Mods::Required, rest)
    } else if let Some(rest) = i.strip_prefix('-') {
        (Mods::Prohibited, rest)
    } else if let Some(rest) = i.strip_prefix('!') {
        (Mods::Prohibited, rest)
    } else if let Some(rest) = keyword(i, "NOT") {
        (Mods::Prohibited, rest)
    } else {
        (Mods::None, i)
    }
}

/// One clause: an optional `field:` override followed by a group, phrase,
/// range, or term. The field override also applies inside a `field:(...)`
/// group.
fn clause<'a>(i: &'a str, field: &str) -> PResult<'a, QueryNode> {
    let (field, i): (&str, &str) = match field_prefix(i) {
        Ok((rest, name)) => (name, rest),
        Err(_) => (field, i),
    };

    if let Some(rest) = i.strip_prefix('(') {
        return group(rest, field);
    }
    if let Some(rest) = i.strip_prefix('"') {
        return phrase(rest, field);
    }
    if i.starts_with('[') || i.starts_with('{') {
        return range(i, field);
    }
    term(i, field)
}

fn group<'a>(i: &'a str, field: &str) -> PResult<'a, QueryNode> {
    let (node, rest) = query(i, field)?;
    let rest = skip_ws(rest);
    match rest.strip_prefix(')') {
        Some(rest) => Ok((node, rest)),
        None => Err(ParseError::UnclosedGroup),
    }
}

fn phrase<'a>(i: &'a str, field: &str) -> PResult<'a, QueryNode> {
    let (body, rest) = scan_phrase_body(i).ok_or(ParseError::UnterminatedPhrase)?;
    let words = body.split_whitespace().map(str::to_string).collect();

    // A proximity suffix ("a b"~3) is accepted and discarded; proximity has
    // no SQL rendering.
    let rest = match rest.strip_prefix('~') {
        Some(after) => match similarity(after) {
            Ok((after, _)) => after,
            Err(_) => after,
        },
        None => rest,
    };

    Ok((QueryNode::phrase(field, words), rest))
}

fn range<'a>(i: &'a str, field: &str) -> PResult<'a, QueryNode> {
    let (inclusive_lower, i) = match i.chars().next() {
        Some('[') => (true, &i[1..]),
        Some('{') => (false, &i[1..]),
        _ => return Err(ParseError::InvalidRange(i.to_string())),
    };

    let (lower, i) = range_bound(skip_ws(i))?;
    let i = skip_ws(i);
    let i = keyword(i, "TO").ok_or_else(|| ParseError::InvalidRange(i.to_string()))?;
    let (upper, i) = range_bound(skip_ws(i))?;

    let i = skip_ws(i);
    let (inclusive_upper, i) = match i.chars().next() {
        Some(']') => (true, &i[1..]),
        Some('}') => (false, &i[1..]),
        _ => return Err(ParseError::InvalidRange(i.to_string())),
    };

    Ok((
        QueryNode::Range {
            field: field.to_string(),
            lower,
            upper,
            inclusive_lower,
            inclusive_upper,
        },
        i,
    ))
}

fn range_bound(i: &str) -> PResult<'_, Option<String>> {
    let end = i
        .find(|c: char| c.is_whitespace() || c == ']' || c == '}')
        .unwrap_or(i.len());
    let token = &i[..end];
    if token.is_empty() {
        return Err(ParseError::InvalidRange(i.to_string()));
    }
    let bound = (token != "*").then(|| token.to_string());
    Ok((bound, &i[end..]))
}

fn term<'a>(i: &'a str, field: &str) -> PResult<'a, QueryNode> {
    let (word, rest) = scan_word(i);
    if word.text.is_empty() {
        let head: String = i.chars().take(1).collect();
        return Err(ParseError::UnexpectedToken(head));
    }

    if let Some(after) = rest.strip_prefix('~') {
        let (sim, rest) = match similarity(after) {
            Ok((rest, raw)) => {
                let value: f32 = raw
                    .parse()
                    .map_err(|_| ParseError::InvalidFuzzySimilarity(raw.to_string()))?;
                if !(0.0..=1.0).contains(&value) {
                    return Err(ParseError::InvalidFuzzySimilarity(raw.to_string()));
                }
                (value, rest)
            }
            Err(_) => (DEFAULT_FUZZY_SIMILARITY, after),
        };
        return Ok((QueryNode::fuzzy(field, word.text, sim), rest));
    }

    let node = if word.is_prefix {
        QueryNode::prefix(field, word.text.trim_end_matches('*'))
    } else if word.has_wildcard {
        QueryNode::wildcard(field, word.text)
    } else {
        QueryNode::term(field, word.text)
    };
    Ok((node, rest))
}
