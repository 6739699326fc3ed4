use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A parse failure at the right-most position the parser reached.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct SyntaxError {
    /// Human readable description, e.g. `Expected "}" but end of input found.`
    pub message: String,
    /// Sorted, deduplicated descriptions of what would have been accepted.
    pub expected: Vec<String>,
    /// The character found at the failure offset, `None` at end of input.
    pub found: Option<char>,
    /// Offset in chars.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
}

impl SyntaxError {
    pub(crate) fn new(
        mut expected: Vec<String>,
        found: Option<char>,
        offset: usize,
        line: usize,
        column: usize,
    ) -> Self {
        expected.sort();
        expected.dedup();
        let message = build_message(&expected, found);
        Self {
            message,
            expected,
            found,
            offset,
            line,
            column,
        }
    }
}

fn build_message(expected: &[String], found: Option<char>) -> String {
    let expected = match expected {
        [] => "end of input".to_string(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    };
    let found = match found {
        Some(ch) => quote(&ch.to_string()),
        None => "end of input".to_string(),
    };
    format!("Expected {expected} but {found} found.")
}

/// Rejected rule name passed to [`crate::Rule::from_str`](std::str::FromStr).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid rule name: {}.", quote(.0))]
pub struct UnknownRule(pub String);

/// Quotes a literal the way it is shown in expected-token lists.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() || !c.is_ascii() => {
                let code = c as u32;
                if code <= 0xFF {
                    out.push_str(&format!("\\x{code:02X}"));
                } else if code <= 0xFFFF {
                    out.push_str(&format!("\\u{code:04X}"));
                } else {
                    out.push_str(&format!("\\u{{{code:X}}}"));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quote_escapes_backslashes_and_controls() {
        assert_eq!(quote("\\"), r#""\\""#);
        assert_eq!(quote("\r\n"), r#""\r\n""#);
        assert_eq!(quote("\u{2028}"), r#""\u2028""#);
        assert_eq!(quote("\u{a0}"), r#""\xA0""#);
        assert_eq!(quote("}"), r#""}""#);
    }

    #[test]
    fn expected_list_is_sorted_and_deduplicated() {
        let err = SyntaxError::new(
            vec!["\"}\"".into(), "any character".into(), "\"{\"".into(), "\"}\"".into()],
            None,
            9,
            1,
            10,
        );
        assert_eq!(err.expected, vec!["\"{\"", "\"}\"", "any character"]);
        assert_eq!(
            err.message,
            r#"Expected "{", "}" or any character but end of input found."#
        );
    }

    #[test]
    fn message_with_single_expectation_and_found_char() {
        let err = SyntaxError::new(vec!["\"]\"".into()], Some('x'), 3, 1, 4);
        assert_eq!(err.to_string(), r#"Expected "]" but "x" found."#);
    }

    #[test]
    fn message_with_no_expectations() {
        let err = SyntaxError::new(vec![], Some('}'), 0, 1, 1);
        assert_eq!(err.to_string(), r#"Expected end of input but "}" found."#);
    }
}
