//! Engine run metrics.
//!
//! Two kinds of observation live here:
//!
//! - [`Coverage`]: how much of a line (or card, or corpus) the vocabulary
//!   explains. This is the headline number of every report and the only
//!   "failure" signal for unexplained text.
//! - [`RunMetrics`]: wall-clock timings per pipeline stage, for profiling.
//!
//! ## Design notes
//!
//! - Coverage is byte-weighted over token ranges. Whitespace belongs to no
//!   token and counts for nothing.
//! - Coverage of an empty line is 1.0: there is nothing left to explain.

use crate::{Token, TokenKind};
use serde::Serialize;
use std::ops::AddAssign;
use std::time::Duration;

// --- Coverage ----------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coverage {
    pub matched_bytes: usize,
    pub unmatched_bytes: usize,
}

impl Coverage {
    pub fn of_tokens(tokens: &[Token]) -> Self {
        let mut coverage = Coverage::default();
        for token in tokens {
            let len = token.range.end - token.range.start;
            match token.kind {
                TokenKind::Variant(_) => coverage.matched_bytes += len,
                TokenKind::Unmatched => coverage.unmatched_bytes += len,
            }
        }
        coverage
    }

    /// Matched share in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        let total = self.matched_bytes + self.unmatched_bytes;
        if total == 0 { 1.0 } else { self.matched_bytes as f64 / total as f64 }
    }

    pub fn percent(&self) -> f64 {
        self.ratio() * 100.0
    }
}

impl AddAssign for Coverage {
    fn add_assign(&mut self, other: Coverage) {
        self.matched_bytes += other.matched_bytes;
        self.unmatched_bytes += other.unmatched_bytes;
    }
}

impl std::iter::Sum for Coverage {
    fn sum<I: Iterator<Item = Coverage>>(iter: I) -> Self {
        iter.fold(Coverage::default(), |mut acc, c| {
            acc += c;
            acc
        })
    }
}

// --- Timings -----------------------------------------------------------------

#[derive(Debug, Default, Clone, Serialize)]
pub struct RunMetrics {
    /// Total elapsed time for the corpus run.
    pub total: Duration,
    /// Normalization, tokenization and hydration of every card.
    pub lines: Duration,
    /// Building the digest and the suffix automaton, extracting repeats.
    pub repeats: Duration,
    /// Building and ranking the prefix trie.
    pub ranking: Duration,
    /// Distinct words interned for the automaton.
    pub vocabulary: usize,
    /// States in the finished automaton.
    pub automaton_states: usize,
}
