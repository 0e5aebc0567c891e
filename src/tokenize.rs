//! Literal-delimiter row tokenization.

use crate::error::{ParseError, Result};

/// Split a line into tokens on literal occurrences of the delimiter.
///
/// No quoting, no escaping: a delimiter inside a value always splits there.
/// Trailing empty tokens are kept, so `"a,b,"` yields three tokens. The
/// delimiter is re-checked here even though the configuration builder
/// already rejects an empty one.
pub fn split_line<'a>(line: &'a str, delimiter: &str) -> Result<Vec<&'a str>> {
    if delimiter.is_empty() {
        return Err(ParseError::InvalidDelimiter);
    }
    Ok(line.split(delimiter).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        assert_eq!(split_line("a,b,c", ",").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_pipe_delimiter() {
        assert_eq!(
            split_line("EUR/USD|1.1|1.2", "|").unwrap(),
            vec!["EUR/USD", "1.1", "1.2"]
        );
    }

    #[test]
    fn test_split_multichar_delimiter() {
        assert_eq!(split_line("a::b::c", "::").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_no_quoting() {
        // A delimiter inside a quoted value still splits.
        assert_eq!(
            split_line("\"a,b\",c", ",").unwrap(),
            vec!["\"a", "b\"", "c"]
        );
    }

    #[test]
    fn test_trailing_empty_token_kept() {
        assert_eq!(split_line("a,b,", ",").unwrap(), vec!["a", "b", ""]);
    }

    #[test]
    fn test_empty_delimiter_rejected() {
        assert!(matches!(
            split_line("a,b", ""),
            Err(ParseError::InvalidDelimiter)
        ));
    }
}
