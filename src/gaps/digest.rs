//! Corpus digest: every unmatched span, with enough provenance to find it
//! again.

use super::coalesce::UnmatchedSpan;
use crate::Range;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestEntry {
    /// Index of the card in the corpus.
    pub card: usize,
    /// Line number within the card's normalized text.
    pub line: usize,
    /// Byte range within the card's normalized text (all lines joined by `\n`).
    pub absolute: Range,
    pub span: UnmatchedSpan,
}

/// A span in context, ready to be highlighted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Excerpt {
    pub before: String,
    pub span: String,
    pub after: String,
}

/// Multiset of unmatched spans across a corpus.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Digest {
    pub entries: Vec<DigestEntry>,
}

impl Digest {
    pub fn new() -> Self {
        Digest::default()
    }

    pub fn push(&mut self, entry: DigestEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Occurrences per span text.
    pub fn counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.span.text.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Distinct span texts with their counts, most frequent first, ties by text.
    pub fn weighted(&self) -> Vec<(&str, usize)> {
        let mut weighted: Vec<(&str, usize)> = self.counts().into_iter().collect();
        weighted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        weighted
    }

    /// Span texts in corpus order, one per occurrence.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.span.text.as_str())
    }

    /// Entries whose span text is exactly `text`.
    pub fn occurrences<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a DigestEntry> + 'a {
        self.entries.iter().filter(move |e| e.span.text == text)
    }
}

impl DigestEntry {
    /// Cut the entry's line out of `card_text` (the normalized card text the
    /// entry was recorded against) around the span.
    ///
    /// Returns `None` when `card_text` is not the text the entry came from.
    pub fn excerpt(&self, card_text: &str) -> Option<Excerpt> {
        let Range { start, end } = self.absolute;
        let span = card_text.get(start..end)?;
        if span != self.span.text {
            return None;
        }
        let line_start = card_text[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = card_text[end..].find('\n').map_or(card_text.len(), |i| end + i);
        Some(Excerpt {
            before: card_text[line_start..start].to_string(),
            span: span.to_string(),
            after: card_text[end..line_end].to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaps::Neighbour;

    fn entry(card: usize, line: usize, text: &str, absolute: Range) -> DigestEntry {
        DigestEntry {
            card,
            line,
            absolute,
            span: UnmatchedSpan {
                text: text.to_string(),
                range: Range { start: 0, end: text.len() },
                tokens: text.split_whitespace().count(),
                before: Neighbour::LineStart,
                after: Neighbour::LineEnd,
            },
        }
    }

    #[test]
    fn weighted_orders_by_count_then_text() {
        let mut digest = Digest::new();
        digest.push(entry(0, 0, "scry 1", Range { start: 0, end: 6 }));
        digest.push(entry(1, 0, "proliferate", Range { start: 0, end: 11 }));
        digest.push(entry(2, 0, "scry 1", Range { start: 0, end: 6 }));
        digest.push(entry(3, 0, "investigate", Range { start: 0, end: 11 }));
        assert_eq!(digest.weighted(), vec![("scry 1", 2), ("investigate", 1), ("proliferate", 1)]);
        assert_eq!(digest.occurrences("scry 1").count(), 2);
    }

    #[test]
    fn excerpt_reconstructs_the_line() {
        let card_text = "flying\nwhen ~ dies, scry 1.";
        let start = card_text.find("scry 1").unwrap();
        let e = entry(0, 1, "scry 1", Range { start, end: start + 6 });
        let excerpt = e.excerpt(card_text).unwrap();
        assert_eq!(excerpt.before, "when ~ dies, ");
        assert_eq!(excerpt.span, "scry 1");
        assert_eq!(excerpt.after, ".");

        assert!(e.excerpt("something else entirely").is_none());
    }
}
