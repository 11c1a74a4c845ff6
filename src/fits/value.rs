//! Typed FITS card values and the free-format value parser.

use std::fmt;

/// A parsed FITS card value.
///
/// The variants mirror the value types the FITS standard allows on a card:
/// quoted strings, logicals (`T`/`F`), integers, and reals. Values that fit
/// none of those are kept verbatim as strings.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    /// Character string (surrounding quotes removed, `''` unescaped).
    Str(String),
    /// Integer value.
    Int(i64),
    /// Real (floating point) value.
    Real(f64),
    /// Logical value.
    Logical(bool),
}

impl HeaderValue {
    /// True when the value counts as "empty" for extraction purposes:
    /// the empty string, integer zero, real zero, or logical false.
    ///
    /// This deliberately drops legitimate zero-valued numeric cards; the
    /// normalization rule tables and fixtures assume this definition.
    pub fn is_empty(&self) -> bool {
        match self {
            HeaderValue::Str(s) => s.is_empty(),
            HeaderValue::Int(i) => *i == 0,
            HeaderValue::Real(r) => *r == 0.0,
            HeaderValue::Logical(b) => !*b,
        }
    }

    /// Borrow the string content, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content, if this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            HeaderValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Str(s) => write!(f, "{s}"),
            HeaderValue::Int(i) => write!(f, "{i}"),
            HeaderValue::Real(r) => write!(f, "{r}"),
            HeaderValue::Logical(true) => write!(f, "T"),
            HeaderValue::Logical(false) => write!(f, "F"),
        }
    }
}

/// Parse the value field of a card (everything after the `= ` indicator).
///
/// An inline comment after `/` is discarded. Reals accept the FITS `D`
/// exponent form (`1.5D3`).
pub(crate) fn parse_value(field: &str) -> HeaderValue {
    let trimmed = field.trim_start();

    if let Some(rest) = trimmed.strip_prefix('\'') {
        return HeaderValue::Str(parse_quoted(rest));
    }

    // Cut any inline comment, then classify.
    let bare = trimmed.split('/').next().unwrap_or("").trim();
    match bare {
        "T" => return HeaderValue::Logical(true),
        "F" => return HeaderValue::Logical(false),
        _ => {}
    }
    if let Ok(i) = bare.parse::<i64>() {
        return HeaderValue::Int(i);
    }
    let exponent_fixed = bare.replace('D', "E").replace('d', "E");
    if let Ok(r) = exponent_fixed.parse::<f64>() {
        return HeaderValue::Real(r);
    }
    HeaderValue::Str(bare.to_string())
}

/// Consume a quoted string body, unescaping `''` and dropping the trailing
/// padding the standard requires.
fn parse_quoted(body: &str) -> String {
    let mut out = String::new();
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
                out.push('\'');
            } else {
                break; // closing quote; remainder is padding/comment
            }
        } else {
            out.push(c);
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quoted_string() {
        assert_eq!(
            parse_value("'M13     '           / object name"),
            HeaderValue::Str("M13".to_string())
        );
    }

    #[test]
    fn test_parse_quote_escape() {
        assert_eq!(
            parse_value("'O''NEILL'"),
            HeaderValue::Str("O'NEILL".to_string())
        );
    }

    #[test]
    fn test_parse_logical_and_numbers() {
        assert_eq!(parse_value("                   T"), HeaderValue::Logical(true));
        assert_eq!(parse_value("                   F / flag"), HeaderValue::Logical(false));
        assert_eq!(parse_value("                  16"), HeaderValue::Int(16));
        assert_eq!(parse_value("              250.42"), HeaderValue::Real(250.42));
        assert_eq!(parse_value("              1.5D3"), HeaderValue::Real(1500.0));
    }

    #[test]
    fn test_parse_unclassifiable_is_string() {
        assert_eq!(
            parse_value("  not-a-number"),
            HeaderValue::Str("not-a-number".to_string())
        );
    }

    #[test]
    fn test_emptiness_rules() {
        assert!(HeaderValue::Str(String::new()).is_empty());
        assert!(HeaderValue::Int(0).is_empty());
        assert!(HeaderValue::Real(0.0).is_empty());
        assert!(HeaderValue::Logical(false).is_empty());

        assert!(!HeaderValue::Str("0".to_string()).is_empty());
        assert!(!HeaderValue::Int(-1).is_empty());
        assert!(!HeaderValue::Real(0.5).is_empty());
        assert!(!HeaderValue::Logical(true).is_empty());
    }
}
