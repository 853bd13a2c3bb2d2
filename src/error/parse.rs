use thiserror::Error;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum ParseError {
    #[error("empty query")]
    EmptyQuery,

    #[error("unclosed group")]
    UnclosedGroup,

    #[error("unexpected closing parenthesis")]
    UnexpectedClosingParenthesis,

    #[error("unterminated phrase")]
    UnterminatedPhrase,

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("invalid fuzzy similarity: {0}")]
    InvalidFuzzySimilarity(String),

    #[error("expected a clause after operator: {0}")]
    ExpectedClause(String),

    #[error("unexpected trailing input: {0}")]
    TrailingInput(String),

    #[error("unexpected token: {0}")]
    UnexpectedToken(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::InvalidRange("[A TO".to_string());
        assert!(err.to_string().contains("invalid range"));
    }

    #[test]
    fn test_parse_error_eq() {
        assert_eq!(ParseError::EmptyQuery, ParseError::EmptyQuery);
        assert_ne!(
            ParseError::UnclosedGroup,
            ParseError::UnexpectedClosingParenthesis
        );
    }

    #[test]
    fn test_parse_error_clone() {
        let err = ParseError::TrailingInput(")".to_string());
        assert_eq!(err, err.clone());
    }
}
