extern crate self as glyphscan;

#[macro_use]
mod macros;
mod api;
pub mod capture;
pub mod descriptor;
pub mod engine;
mod error;
pub mod gaps;
pub mod variants;

use serde::Serialize;

pub use api::{
    CardAnalysis, CorpusItem, CorpusReport, Engine, LineAnalysis, Options, VariantCount, normalize, normalize_name,
};
pub use capture::{CaptureNode, ChoiceValue, Field, Value};
pub use engine::{Coverage, RunMetrics};
pub use error::{Error, Result};
pub use variants::VariantKind;

// --- Core types --------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Range {
    /// Start byte index (inclusive).
    pub start: usize,
    /// End byte index (exclusive).
    pub end: usize,
}

impl Range {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, other: Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// What a token was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "kind", rename_all = "snake_case")]
pub enum TokenKind {
    Variant(VariantKind),
    /// Claimed by the catch-all: text no variant explains.
    Unmatched,
}

impl TokenKind {
    pub fn is_matched(&self) -> bool {
        matches!(self, TokenKind::Variant(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            TokenKind::Variant(kind) => kind.name(),
            TokenKind::Unmatched => "?",
        }
    }
}

/// One token of a line: its kind and the byte range it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub range: Range,
}

impl Token {
    pub fn text<'l>(&self, line: &'l str) -> &'l str {
        line.get(self.range.start..self.range.end).unwrap_or_default()
    }
}
