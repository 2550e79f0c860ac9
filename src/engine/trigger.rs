//! Trigger scanning (line pre-selection).
//!
//! Before the tokenizer walks a line position by position, one pass of a
//! `RegexSet` over the whole line tells it which variants can match anywhere
//! in it. Variants outside that set are skipped at every position.
//!
//! ## Design notes
//!
//! - The set holds each variant's unanchored search pattern, so a variant that
//!   matches at some position is always in the set. Gating only reduces work;
//!   it never changes which token is committed.
//! - A line with no active variants still tokenizes, entirely as unmatched.

use super::compiled_variants::CompiledVariants;
use crate::error::{Error, Result};
use regex::{RegexSet, RegexSetBuilder};

const SIZE_LIMIT: usize = 256 << 20;

/// Per-line activation, indexed like `CompiledVariants::variants`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerInfo {
    pub active: Vec<bool>,
}

impl TriggerInfo {
    pub fn is_active(&self, index: usize) -> bool {
        self.active.get(index).copied().unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }
}

/// The compiled gate for a variant table.
#[derive(Debug, Clone)]
pub(crate) struct Triggers {
    set: RegexSet,
}

impl Triggers {
    pub fn new(compiled: &CompiledVariants) -> Result<Self> {
        let sources = compiled.iter().map(|v| v.pattern.source.as_str());
        let set = RegexSetBuilder::new(sources).size_limit(SIZE_LIMIT).dfa_size_limit(SIZE_LIMIT).build().map_err(
            |source| Error::InvalidPattern { variant: "trigger set", source },
        )?;
        Ok(Triggers { set })
    }

    /// Which variants match somewhere in `line`.
    pub fn scan(&self, line: &str) -> TriggerInfo {
        let matches = self.set.matches(line);
        let mut active = vec![false; self.set.len()];
        for index in matches.iter() {
            active[index] = true;
        }
        TriggerInfo { active }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::{self, VariantKind};

    #[test]
    fn scan_marks_only_present_variants() {
        let compiled = CompiledVariants::new(&variants::get()).unwrap();
        let triggers = Triggers::new(&compiled).unwrap();
        let info = triggers.scan("you may draw a card.");

        let active: Vec<VariantKind> =
            compiled.iter().enumerate().filter(|(i, _)| info.is_active(*i)).map(|(_, v)| v.kind).collect();
        assert!(active.contains(&VariantKind::YouMay));
        assert!(active.contains(&VariantKind::DrawCards));
        assert!(active.contains(&VariantKind::Punctuation));
        assert!(!active.contains(&VariantKind::PhaseTrigger));
        assert!(!active.contains(&VariantKind::ManaSymbols));
        assert!(info.count() < compiled.len());
    }

    #[test]
    fn empty_line_activates_nothing() {
        let compiled = CompiledVariants::new(&variants::get()).unwrap();
        let triggers = Triggers::new(&compiled).unwrap();
        assert_eq!(triggers.scan("").count(), 0);
        assert!(!triggers.scan("").is_active(999));
    }
}
