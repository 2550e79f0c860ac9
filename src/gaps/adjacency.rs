//! Which tokens surround each unmatched span.
//!
//! For a span text, the counts answer "what usually comes right before this,
//! and what right after?", which tells a template author which existing
//! variant a new pattern would attach to.

use super::digest::Digest;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NeighbourCounts {
    pub occurrences: usize,
    pub before: BTreeMap<&'static str, usize>,
    pub after: BTreeMap<&'static str, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Adjacency {
    pub spans: BTreeMap<String, NeighbourCounts>,
}

impl Adjacency {
    pub fn build(digest: &Digest) -> Self {
        let mut spans: BTreeMap<String, NeighbourCounts> = BTreeMap::new();
        for entry in &digest.entries {
            let counts = spans.entry(entry.span.text.clone()).or_default();
            counts.occurrences += 1;
            *counts.before.entry(entry.span.before.label()).or_insert(0) += 1;
            *counts.after.entry(entry.span.after.label()).or_insert(0) += 1;
        }
        Adjacency { spans }
    }

    pub fn get(&self, text: &str) -> Option<&NeighbourCounts> {
        self.spans.get(text)
    }

    /// Most common neighbour on each side, ties broken by label.
    pub fn dominant(&self, text: &str) -> Option<(&'static str, &'static str)> {
        let counts = self.spans.get(text)?;
        Some((most_common(&counts.before)?, most_common(&counts.after)?))
    }
}

fn most_common(counts: &BTreeMap<&'static str, usize>) -> Option<&'static str> {
    // BTreeMap iterates labels ascending; `max_by_key` keeps the last maximum.
    counts.iter().rev().max_by_key(|(_, count)| **count).map(|(label, _)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaps::{DigestEntry, Neighbour, UnmatchedSpan};
    use crate::variants::VariantKind;
    use crate::Range;

    fn entry(text: &str, before: Neighbour, after: Neighbour) -> DigestEntry {
        DigestEntry {
            card: 0,
            line: 0,
            absolute: Range { start: 0, end: text.len() },
            span: UnmatchedSpan { text: text.into(), range: Range { start: 0, end: text.len() }, tokens: 1, before, after },
        }
    }

    #[test]
    fn counts_neighbours_per_span() {
        let mut digest = Digest::new();
        let punct = Neighbour::Variant(VariantKind::Punctuation);
        let timing = Neighbour::Variant(VariantKind::Timing);
        digest.push(entry("scry 1", punct, Neighbour::LineEnd));
        digest.push(entry("scry 1", punct, punct));
        digest.push(entry("scry 1", timing, punct));

        let adjacency = Adjacency::build(&digest);
        let counts = adjacency.get("scry 1").unwrap();
        assert_eq!(counts.occurrences, 3);
        assert_eq!(counts.before.get("punctuation"), Some(&2));
        assert_eq!(counts.before.get("timing"), Some(&1));
        assert_eq!(counts.after.get("$"), Some(&1));
        assert_eq!(adjacency.dominant("scry 1"), Some(("punctuation", "punctuation")));
        assert_eq!(adjacency.dominant("missing"), None);
    }

    #[test]
    fn dominant_ties_prefer_the_smaller_label() {
        let mut digest = Digest::new();
        digest.push(entry("x", Neighbour::LineStart, Neighbour::LineEnd));
        digest.push(entry("x", Neighbour::Variant(VariantKind::Timing), Neighbour::LineEnd));
        assert_eq!(adjacency_before(&digest), "^");
    }

    fn adjacency_before(digest: &Digest) -> &'static str {
        Adjacency::build(digest).dominant("x").map(|(before, _)| before).unwrap()
    }
}
