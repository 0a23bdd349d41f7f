//! Line classification
//!
//! The format is line oriented: every physical line is a blank/comment
//! line, a section header, a field assignment, or something else. Whether
//! "something else" is an error depends on the parser state, so this module
//! only reports the shape of the line.

use regex::Regex;
use std::sync::LazyLock;

/// Identifier pattern shared by section and field names
pub(crate) const NAME_PATTERN: &str = r"[-a-zA-Z0-9_$]+";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{NAME_PATTERN}$")).expect("valid name pattern"));

static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*\[\s*({NAME_PATTERN})\s*\]\s*$")).expect("valid header pattern")
});

static ASSIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*({NAME_PATTERN})\s*=(.*)$")).expect("valid assignment pattern")
});

/// Returns true if `name` is a valid section or field name
pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

/// Shape of one physical line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    /// Whitespace only, or a comment
    Blank,
    /// `[name]`
    Header(&'a str),
    /// `name = value`, with the value text exactly as written after `=`
    Assignment { name: &'a str, value: &'a str },
    Other,
}

/// Classifies lines for one parse call
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineLexer {
    comment_char: char,
}

impl LineLexer {
    pub(crate) fn new(comment_char: char) -> Self {
        Self { comment_char }
    }

    /// True for blank lines and lines whose first non-whitespace character
    /// is the comment character
    pub(crate) fn is_blank(&self, line: &str) -> bool {
        let rest = line.trim_start();
        rest.is_empty() || rest.starts_with(self.comment_char)
    }

    pub(crate) fn classify<'a>(&self, line: &'a str) -> Line<'a> {
        if self.is_blank(line) {
            return Line::Blank;
        }
        if let Some(caps) = SECTION_RE.captures(line) {
            if let Some(name) = caps.get(1) {
                return Line::Header(name.as_str());
            }
        }
        if let Some(caps) = ASSIGN_RE.captures(line) {
            if let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) {
                return Line::Assignment {
                    name: name.as_str(),
                    value: value.as_str(),
                };
            }
        }
        Line::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_comment_lines() {
        let lexer = LineLexer::new('#');
        assert_eq!(lexer.classify(""), Line::Blank);
        assert_eq!(lexer.classify("   \t"), Line::Blank);
        assert_eq!(lexer.classify("  # comment = 1"), Line::Blank);
        assert_eq!(lexer.classify("; not a comment"), Line::Other);
    }

    #[test]
    fn test_comment_char_is_literal() {
        // '(' and '.' are regex metacharacters
        let lexer = LineLexer::new('(');
        assert_eq!(lexer.classify("( comment"), Line::Blank);
        assert_eq!(lexer.classify("x = (1)"), Line::Assignment { name: "x", value: " (1)" });

        let lexer = LineLexer::new('.');
        assert_eq!(lexer.classify(". comment"), Line::Blank);
        assert_eq!(lexer.classify("x = 1"), Line::Assignment { name: "x", value: " 1" });
    }

    #[test]
    fn test_headers() {
        let lexer = LineLexer::new('#');
        assert_eq!(lexer.classify("[sect]"), Line::Header("sect"));
        assert_eq!(lexer.classify("  [ my-sect_2$ ]  "), Line::Header("my-sect_2$"));
        assert_eq!(lexer.classify("[two words]"), Line::Other);
        assert_eq!(lexer.classify("[sect] trailing"), Line::Other);
        assert_eq!(lexer.classify("[]"), Line::Other);
    }

    #[test]
    fn test_assignments() {
        let lexer = LineLexer::new('#');
        assert_eq!(
            lexer.classify(" name=Frank"),
            Line::Assignment { name: "name", value: "Frank" }
        );
        assert_eq!(
            lexer.classify("level =  37 "),
            Line::Assignment { name: "level", value: "  37 " }
        );
        assert_eq!(lexer.classify("y="), Line::Assignment { name: "y", value: "" });
        assert_eq!(
            lexer.classify("eq = a=b"),
            Line::Assignment { name: "eq", value: " a=b" }
        );
        assert_eq!(lexer.classify("bad name = 1"), Line::Other);
        assert_eq!(lexer.classify("= 1"), Line::Other);
    }

    #[test]
    fn test_name_validation() {
        assert!(is_valid_name("abc-DEF_123$"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("a b"));
        assert!(!is_valid_name("a.b"));
    }
}
