//! Regex-based query line styling.
//!
//! A line is cut into tokens (string literals, bracketed identifiers, `${...}` variables,
//! comments, word runs, whitespace runs and single punctuation), each token is classified, and
//! the result is rendered as inline markup: styled tokens become spans, consecutive plain tokens
//! are merged into a single text node.

use crate::document::{Inline, Line};
use std::sync::LazyLock;

use regex::Regex;

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#""(?:\\"|[^"])*"?|'(?:\\'|[^'])*'?|\[.*?\]|\$\{.*?\}|(?:--|#).*|[^\x{A0}\s\[\]()'".#$-]+|[\x{A0}\s\]()]+|\.|-|\[|\$"#,
    )
    .expect("valid token pattern")
});

/// Style a keyword source assigns to a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StyleType {
    /// Not a keyword.
    #[default]
    None,
    /// Ordinary keyword (`SELECT`, `FROM`).
    Keyword,
    /// Reserved word that is not a keyword.
    Reserved,
}

/// Lookup of keyword styles, case-insensitively.
pub trait KeywordStyles {
    /// Style for `token`.
    fn style_of(&self, token: &str) -> StyleType;
}

/// Visual class of a styled token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleClass {
    /// Keyword.
    Keyword,
    /// Reserved word.
    Reserved,
    /// Quoted string literal.
    Literal,
    /// `--` or `#` comment.
    Comment,
    /// `${...}` template variable.
    Variable,
}

impl StyleClass {
    /// Class name as used by the presentation layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Reserved => "reserved",
            Self::Literal => "literal",
            Self::Comment => "comment",
            Self::Variable => "variable",
        }
    }
}

/// Split `text` into styling tokens.
///
/// Concatenating the tokens always reproduces `text`: characters the pattern does not match
/// come back as their own tokens.
pub fn style_tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for m in TOKEN_PATTERN.find_iter(text) {
        if m.start() > last {
            tokens.push(&text[last..m.start()]);
        }
        if !m.as_str().is_empty() {
            tokens.push(m.as_str());
        }
        last = m.end();
    }
    if last < text.len() {
        tokens.push(&text[last..]);
    }
    tokens
}

/// Class of a single token, or `None` for plain text.
pub fn classify(token: &str, keywords: Option<&dyn KeywordStyles>) -> Option<StyleClass> {
    if token.starts_with('\'') || token.starts_with('"') {
        return Some(StyleClass::Literal);
    }
    if token.starts_with("--") || token.starts_with('#') {
        return Some(StyleClass::Comment);
    }
    if token.starts_with("${") && token.ends_with('}') {
        return Some(StyleClass::Variable);
    }
    match keywords.map(|k| k.style_of(token)) {
        Some(StyleType::Keyword) => Some(StyleClass::Keyword),
        Some(StyleType::Reserved) => Some(StyleClass::Reserved),
        _ => None,
    }
}

/// Render `text` as one styled line.
pub fn render_line(text: &str, keywords: Option<&dyn KeywordStyles>) -> Line {
    if text.is_empty() {
        return Line::empty();
    }

    let mut nodes = Vec::new();
    let mut plain = String::new();
    for token in style_tokenize(text) {
        match classify(token, keywords) {
            Some(class) => {
                if !plain.is_empty() {
                    nodes.push(Inline::Text(std::mem::take(&mut plain)));
                }
                nodes.push(Inline::span(class, token));
            }
            None => plain.push_str(token),
        }
    }
    if !plain.is_empty() {
        nodes.push(Inline::Text(plain));
    }
    Line::new(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Select;

    impl KeywordStyles for Select {
        fn style_of(&self, token: &str) -> StyleType {
            match token.to_ascii_uppercase().as_str() {
                "SELECT" | "FROM" => StyleType::Keyword,
                "USER" => StyleType::Reserved,
                _ => StyleType::None,
            }
        }
    }

    #[test]
    fn test_tokenize_covers_input() {
        let text = "select [my col], 'it''s' from t -- done";
        let tokens = style_tokenize(text);
        assert_eq!(tokens.concat(), text);
        assert!(tokens.contains(&"[my col]"));
        assert!(tokens.contains(&"-- done"));
    }

    #[test]
    fn test_tokenize_variables_and_dots() {
        assert_eq!(style_tokenize("a.${b}"), vec!["a", ".", "${b}"]);
        assert_eq!(style_tokenize("x-1"), vec!["x", "-", "1"]);
    }

    #[test]
    fn test_render_merges_plain_runs() {
        let line = render_line("select a, b from user", Some(&Select));
        assert_eq!(
            line.nodes(),
            &[
                Inline::span(StyleClass::Keyword, "select"),
                Inline::Text(" a, b ".into()),
                Inline::span(StyleClass::Keyword, "from"),
                Inline::Text(" ".into()),
                Inline::span(StyleClass::Reserved, "user"),
            ]
        );
        assert_eq!(line.text(), "select a, b from user");
    }

    #[test]
    fn test_render_empty_line_is_break() {
        assert_eq!(render_line("", None).nodes(), &[Inline::Break]);
    }

    #[test]
    fn test_literals_and_comments_without_keywords() {
        assert_eq!(classify("'abc'", None), Some(StyleClass::Literal));
        assert_eq!(classify("# note", None), Some(StyleClass::Comment));
        assert_eq!(classify("${v}", None), Some(StyleClass::Variable));
        assert_eq!(classify("select", None), None);
    }
}
