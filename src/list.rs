//! Multi-line bracketed list literals
//!
//! ```text
//! factors = [
//! # comments and blank lines are skipped by the parser
//! 10, 20,
//! 23.5, "12.75"
//! ]
//! ```
//!
//! Elements are separated by commas and by line ends. Commas inside quotes
//! do not separate. A blank final piece on a line (trailing comma, or a line
//! holding only the bracket) is not an element. The literal closes at the
//! first `]` outside quotes; only whitespace may follow it.

use smallvec::SmallVec;

/// Raw element text together with the line it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawElement {
    pub line: usize,
    pub text: String,
}

/// Result of feeding one line segment to the accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Feed {
    /// More lines are needed
    Open,
    /// The closing bracket was found
    Closed,
    /// Non-whitespace text follows the closing bracket
    TrailingText,
}

/// Collects raw element texts until the closing bracket
#[derive(Debug)]
pub(crate) struct ListAccumulator {
    quote_char: Option<char>,
    elements: SmallVec<[RawElement; 8]>,
}

impl ListAccumulator {
    pub(crate) fn new(quote_char: Option<char>) -> Self {
        Self {
            quote_char,
            elements: SmallVec::new(),
        }
    }

    /// If `value` opens a list literal, returns the text after the `[`
    pub(crate) fn opening(value: &str) -> Option<&str> {
        value.trim_start().strip_prefix('[')
    }

    /// Splits one line's worth of list text into elements
    pub(crate) fn feed(&mut self, line: usize, segment: &str) -> Feed {
        let mut in_quote = false;
        let mut piece_start = 0;
        let mut pieces: SmallVec<[&str; 8]> = SmallVec::new();
        let mut close_at = None;

        for (i, c) in segment.char_indices() {
            if Some(c) == self.quote_char {
                in_quote = !in_quote;
                continue;
            }
            if in_quote {
                continue;
            }
            match c {
                ',' => {
                    pieces.push(&segment[piece_start..i]);
                    piece_start = i + 1;
                }
                ']' => {
                    close_at = Some(i);
                    break;
                }
                _ => {}
            }
        }

        let end = close_at.unwrap_or(segment.len());
        pieces.push(&segment[piece_start..end]);
        if pieces.last().is_some_and(|p| p.trim().is_empty()) {
            pieces.pop();
        }
        self.elements.extend(pieces.into_iter().map(|text| RawElement {
            line,
            text: text.to_string(),
        }));

        match close_at {
            None => Feed::Open,
            Some(i) if segment[i + 1..].trim().is_empty() => Feed::Closed,
            Some(_) => Feed::TrailingText,
        }
    }

    pub(crate) fn into_elements(self) -> SmallVec<[RawElement; 8]> {
        self.elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(acc: ListAccumulator) -> Vec<String> {
        acc.into_elements().into_iter().map(|e| e.text).collect()
    }

    #[test]
    fn test_opening_detection() {
        assert_eq!(ListAccumulator::opening(" ["), Some(""));
        assert_eq!(ListAccumulator::opening(" [1, 2]"), Some("1, 2]"));
        assert_eq!(ListAccumulator::opening(" \"[\""), None);
        assert_eq!(ListAccumulator::opening("10"), None);
    }

    #[test]
    fn test_single_line_literal() {
        let mut acc = ListAccumulator::new(Some('"'));
        assert_eq!(acc.feed(1, "1, 2 ,3 ]"), Feed::Closed);
        assert_eq!(texts(acc), vec!["1", " 2 ", "3 "]);
    }

    #[test]
    fn test_multi_line_with_trailing_commas() {
        let mut acc = ListAccumulator::new(Some('"'));
        assert_eq!(acc.feed(2, ""), Feed::Open);
        assert_eq!(acc.feed(3, "10, 20,"), Feed::Open);
        assert_eq!(acc.feed(5, "23.5, \"12.75\","), Feed::Open);
        assert_eq!(acc.feed(6, "]"), Feed::Closed);
        let elements = acc.into_elements();
        let lines: Vec<usize> = elements.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 3, 5, 5]);
        let texts: Vec<&str> = elements.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["10", " 20", "23.5", " \"12.75\""]);
    }

    #[test]
    fn test_quotes_protect_separators() {
        let mut acc = ListAccumulator::new(Some('"'));
        assert_eq!(acc.feed(1, "\"a, b\", \"c]\" ]"), Feed::Closed);
        assert_eq!(texts(acc), vec!["\"a, b\"", " \"c]\" "]);
    }

    #[test]
    fn test_disabled_quotes_split_everywhere() {
        let mut acc = ListAccumulator::new(None);
        assert_eq!(acc.feed(1, "\"a, b\"]"), Feed::Closed);
        assert_eq!(texts(acc), vec!["\"a", " b\""]);
    }

    #[test]
    fn test_inner_empty_elements_are_kept() {
        let mut acc = ListAccumulator::new(Some('"'));
        assert_eq!(acc.feed(1, "a,,b]"), Feed::Closed);
        assert_eq!(texts(acc), vec!["a", "", "b"]);
    }

    #[test]
    fn test_empty_literal() {
        let mut acc = ListAccumulator::new(Some('"'));
        assert_eq!(acc.feed(1, " ]"), Feed::Closed);
        assert!(texts(acc).is_empty());
    }

    #[test]
    fn test_text_after_close() {
        let mut acc = ListAccumulator::new(Some('"'));
        assert_eq!(acc.feed(1, "1 ] 2"), Feed::TrailingText);
    }
}
