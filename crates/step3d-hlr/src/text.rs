//! Presentation of raw exchange-file literals.
//!
//! Values read from the pool keep their exchange notation: `'Part'`,
//! `('Author')`, `('A','B')`. Two decorations can be removed:
//! - one level of delimiting apostrophes (string literal)
//! - one level of delimiting parentheses (aggregate of strings)
//!
//! Nothing else is touched; escapes such as `''` or `\X2\...\X0\` are left
//! exactly as read.

use anyhow::{anyhow, Result};
use serde::Serialize;

/// How names are presented in extraction output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TextStyle {
    /// Exchange notation as read.
    Raw,
    /// Delimiters removed.
    #[default]
    Cleaned,
}

impl TextStyle {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "cleaned" | "clean" => Ok(Self::Cleaned),
            other => Err(anyhow!("unknown text style `{other}` (expected raw|cleaned)")),
        }
    }

    pub fn apply(self, raw: &str) -> String {
        match self {
            TextStyle::Raw => to_raw(raw),
            TextStyle::Cleaned => to_cleaned(raw),
        }
    }
}

/// One level of delimiting apostrophes.
pub fn strip_quotes(s: &str) -> &str {
    strip_delimiters(s, '\'', '\'')
}

/// One level of delimiting parentheses.
pub fn strip_parentheses(s: &str) -> &str {
    strip_delimiters(s, '(', ')')
}

fn strip_delimiters(s: &str, open: char, close: char) -> &str {
    if s.len() >= 2 && s.starts_with(open) && s.ends_with(close) {
        &s[open.len_utf8()..s.len() - close.len_utf8()]
    } else {
        s
    }
}

pub fn to_raw(s: &str) -> String {
    s.to_string()
}

/// Both decorations removed.
///
/// Inside an aggregate the apostrophes belong to each element, so they are
/// stripped per top-level element: `('A','B')` becomes `A,B`.
pub fn to_cleaned(s: &str) -> String {
    let inner = strip_parentheses(s);
    if inner.len() == s.len() {
        return strip_quotes(s).to_string();
    }
    split_elements(inner)
        .into_iter()
        .map(strip_quotes)
        .collect::<Vec<_>>()
        .join(",")
}

/// Split at commas that are outside string literals and nested aggregates.
fn split_elements(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut in_string = false;
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '\'' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth = depth.saturating_sub(1),
            ',' if !in_string && depth == 0 => {
                out.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&s[start..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_string_literals() {
        assert_eq!(to_cleaned("'Part'"), "Part");
        assert_eq!(to_cleaned("'2;1'"), "2;1");
        assert_eq!(to_cleaned("'=>[0:1:1:1]'"), "=>[0:1:1:1]");
        assert_eq!(to_cleaned("''"), "");
    }

    #[test]
    fn cleans_aggregates() {
        assert_eq!(to_cleaned("('A','B')"), "A,B");
        assert_eq!(to_cleaned("('FreeCAD Model')"), "FreeCAD Model");
        assert_eq!(to_cleaned("('')"), "");
        assert_eq!(
            to_cleaned("('AUTOMOTIVE_DESIGN { 1 0 10303 214 1 1 1 1 }')"),
            "AUTOMOTIVE_DESIGN { 1 0 10303 214 1 1 1 1 }"
        );
    }

    #[test]
    fn inner_characters_are_untouched() {
        assert_eq!(to_cleaned("'it''s (big)'"), "it''s (big)");
        assert_eq!(to_cleaned("('a,b','c')"), "a,b,c");
        assert_eq!(to_cleaned("Part"), "Part");
    }

    #[test]
    fn single_transforms_strip_one_level() {
        assert_eq!(strip_quotes("''x''"), "'x'");
        assert_eq!(strip_parentheses("(('a'))"), "('a')");
        assert_eq!(strip_quotes("'"), "'");
        assert_eq!(to_raw("'Part'"), "'Part'");
    }

    #[test]
    fn style_parse() {
        assert_eq!(TextStyle::parse("RAW").unwrap(), TextStyle::Raw);
        assert!(TextStyle::parse("fancy").is_err());
        assert_eq!(TextStyle::Cleaned.apply("'Caja'"), "Caja");
        assert_eq!(TextStyle::Raw.apply("'Caja'"), "'Caja'");
    }
}
