//! Unmatched-run coalescing.
//!
//! Consecutive unmatched tokens on a line merge into one span. Whitespace
//! between them stays inside the span, so the span text is the original
//! source slice:
//!
//! ```text
//! tokens:  [timing] [self_ref] ?foo ?bar [punct] ?baz
//! spans:                        └──────┘         └─┘
//!                               "foo bar"        "baz"
//! ```

use crate::error::{Error, Result};
use crate::variants::VariantKind;
use crate::{Range, Token, TokenKind};
use serde::Serialize;

/// What sits next to an unmatched span on its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "type", content = "kind", rename_all = "snake_case")]
pub enum Neighbour {
    LineStart,
    LineEnd,
    Variant(VariantKind),
}

impl Neighbour {
    pub fn label(&self) -> &'static str {
        match self {
            Neighbour::LineStart => "^",
            Neighbour::LineEnd => "$",
            Neighbour::Variant(kind) => kind.name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedSpan {
    pub text: String,
    /// Byte range within the normalized line.
    pub range: Range,
    /// Number of unmatched tokens merged into this span.
    pub tokens: usize,
    pub before: Neighbour,
    pub after: Neighbour,
}

/// Merge runs of unmatched tokens in one line.
///
/// Runs shorter than `min_run_len` tokens are dropped. Only 1 and 2 are
/// accepted: 1 keeps isolated unmatched words, 2 keeps only multi-word runs.
pub fn coalesce(line: &str, tokens: &[Token], min_run_len: usize) -> Result<Vec<UnmatchedSpan>> {
    if !(1..=2).contains(&min_run_len) {
        return Err(Error::InvalidRunLength(min_run_len));
    }

    let mut spans = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].kind != TokenKind::Unmatched {
            i += 1;
            continue;
        }
        let first = i;
        while i < tokens.len() && tokens[i].kind == TokenKind::Unmatched {
            i += 1;
        }
        let run = &tokens[first..i];
        if run.len() < min_run_len {
            continue;
        }

        let range = Range { start: run[0].range.start, end: run[run.len() - 1].range.end };
        let before = match first.checked_sub(1).map(|p| tokens[p].kind) {
            Some(TokenKind::Variant(kind)) => Neighbour::Variant(kind),
            _ => Neighbour::LineStart,
        };
        let after = match tokens.get(i).map(|t| t.kind) {
            Some(TokenKind::Variant(kind)) => Neighbour::Variant(kind),
            _ => Neighbour::LineEnd,
        };
        spans.push(UnmatchedSpan {
            text: line.get(range.start..range.end).unwrap_or_default().to_string(),
            range,
            tokens: run.len(),
            before,
            after,
        });
    }
    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, start: usize, end: usize) -> Token {
        Token { kind, range: Range { start, end } }
    }

    const YOU_MAY: TokenKind = TokenKind::Variant(VariantKind::YouMay);
    const PUNCT: TokenKind = TokenKind::Variant(VariantKind::Punctuation);

    #[test]
    fn merges_runs_and_records_neighbours() {
        let line = "foo bar you may baz.";
        let tokens = [
            tok(TokenKind::Unmatched, 0, 3),
            tok(TokenKind::Unmatched, 4, 7),
            tok(YOU_MAY, 8, 15),
            tok(TokenKind::Unmatched, 16, 19),
            tok(PUNCT, 19, 20),
        ];
        let spans = coalesce(line, &tokens, 1).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "foo bar");
        assert_eq!(spans[0].tokens, 2);
        assert_eq!(spans[0].before, Neighbour::LineStart);
        assert_eq!(spans[0].after, Neighbour::Variant(VariantKind::YouMay));
        assert_eq!(spans[1].text, "baz");
        assert_eq!(spans[1].before, Neighbour::Variant(VariantKind::YouMay));
        assert_eq!(spans[1].after, Neighbour::Variant(VariantKind::Punctuation));
    }

    #[test]
    fn minimum_run_of_two_drops_isolated_words() {
        let line = "foo bar you may baz";
        let tokens = [
            tok(TokenKind::Unmatched, 0, 3),
            tok(TokenKind::Unmatched, 4, 7),
            tok(YOU_MAY, 8, 15),
            tok(TokenKind::Unmatched, 16, 19),
        ];
        let spans = coalesce(line, &tokens, 2).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "foo bar");
    }

    #[test]
    fn rejects_other_run_lengths() {
        assert!(matches!(coalesce("", &[], 0), Err(Error::InvalidRunLength(0))));
        let err = coalesce("", &[], 3).unwrap_err();
        assert!(!err.is_defect());
    }

    #[test]
    fn fully_matched_line_has_no_spans() {
        assert!(coalesce("you may", &[tok(YOU_MAY, 0, 7)], 1).unwrap().is_empty());
    }
}
