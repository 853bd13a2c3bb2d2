use nom::{
    bytes::complete::take_while1,
    character::complete::char,
    combinator::recognize,
    number::complete::recognize_float,
    sequence::terminated,
    IResult,
};

/// Characters that end a bare word and start the next token.
const WORD_TERMINATORS: &str = "()\"~";

/// Characters that may legally follow a keyword like `AND` or `NOT`.
const KEYWORD_BOUNDARY: &str = "()\"+-!";

pub fn skip_ws(i: &str) -> &str {
    i.trim_start()
}

pub fn identifier(i: &str) -> IResult<&str, &str> {
    recognize(take_while1(|c: char| c.is_alphanumeric() || c == '_'))(i)
}

/// `field:` lookahead at the start of a clause.
pub fn field_prefix(i: &str) -> IResult<&str, &str> {
    terminated(identifier, char(':'))(i)
}

/// Matches a bare keyword (`AND`, `OR`, `NOT`, `TO`) only when it is not a
/// prefix of a longer word, so `ANDY` still parses as a term.
pub fn keyword<'a>(i: &'a str, kw: &str) -> Option<&'a str> {
    let rest = i.strip_prefix(kw)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() || KEYWORD_BOUNDARY.contains(c) => Some(rest),
        Some(_) => None,
    }
}

/// An optional fuzzy similarity after `~`, e.g. the `0.8` of `TERM~0.8`.
pub fn similarity(i: &str) -> IResult<&str, &str> {
    recognize_float(i)
}

/// A bare word scanned with backslash escapes resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedWord {
    /// The word with `\x` escapes replaced by `x`.
    pub text: String,
    /// Whether an unescaped `*` or `?` appeared.
    pub has_wildcard: bool,
    /// Whether the only unescaped wildcard is a single trailing `*`.
    pub is_prefix: bool,
}

/// Scans a word up to whitespace or a terminator character. Escaped
/// characters lose any special meaning and are kept literally; wildcard
/// classification looks only at unescaped `*`/`?`.
pub fn scan_word(i: &str) -> (ScannedWord, &str) {
    let mut text = String::new();
    let mut wildcards: Vec<(usize, char)> = Vec::new();
    let mut chars = i.char_indices();
    let mut rest = "";

    while let Some((pos, c)) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some((_, escaped)) => text.push(escaped),
                None => text.push('\\'),
            }
            continue;
        }
        if c.is_whitespace() || WORD_TERMINATORS.contains(c) {
            rest = &i[pos..];
            break;
        }
        if c == '*' || c == '?' {
            wildcards.push((text.len(), c));
        }
        text.push(c);
    }

    let is_prefix = wildcards.len() == 1
        && wildcards[0].1 == '*'
        && wildcards[0].0 + 1 == text.len();

    (
        ScannedWord {
            has_wildcard: !wildcards.is_empty(),
            is_prefix,
            text,
        },
        rest,
    )
}

/// Scans the body of a quoted phrase, starting after the opening `"`, up to
/// the closing unescaped `"`. Returns the unescaped body and the remainder
/// after the closing quote, or `None` when the phrase never closes.
pub fn scan_phrase_body(i: &str) -> Option<(String, &str)> {
    let mut body = String::new();
    let mut chars = i.char_indices();

    while let Some((pos, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped)) => body.push(escaped),
                None => body.push('\\'),
            },
            '"' => return Some((body, &i[pos + 1..])),
            _ => body.push(c),
        }
    }

    None
}
