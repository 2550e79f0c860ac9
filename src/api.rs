use crate::capture::CaptureNode;
use crate::descriptor::VariantDescriptor;
use crate::engine::fragment::{self, Edge, EdgeClass};
use crate::engine::{self, CompiledVariants, Coverage, RunMetrics, Tokenizer};
use crate::error::{Error, Result};
use crate::gaps::{self, Adjacency, Candidate, Digest, DigestEntry, Excerpt, Repeat, SuffixAutomaton, UnmatchedSpan};
use crate::variants::{self, VariantKind};
use crate::{Range, Token, TokenKind};
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// The token every occurrence of a card's own name is replaced with.
pub const SELF_REF: &str = "~";

/// One card of the input corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusItem {
    pub name: String,
    #[serde(default)]
    pub text: String,
}

impl CorpusItem {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        CorpusItem { name: name.into(), text: text.into() }
    }
}

/// Options that affect analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Options {
    /// Build capture trees for matched tokens.
    pub hydrate: bool,
    /// Shortest unmatched run kept as a span: 1 or 2 tokens.
    pub min_run_len: usize,
    /// Drop parenthesized reminder text before tokenizing.
    pub strip_reminder_text: bool,
    /// Analyze cards on the rayon thread pool.
    pub parallel: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options { hydrate: true, min_run_len: 1, strip_reminder_text: false, parallel: true }
    }
}

impl Options {
    pub fn validate(&self) -> Result<()> {
        if !(1..=2).contains(&self.min_run_len) {
            return Err(Error::InvalidRunLength(self.min_run_len));
        }
        Ok(())
    }
}

/// Result for one normalized line.
#[derive(Debug, Clone, Serialize)]
pub struct LineAnalysis {
    pub text: String,
    pub tokens: Vec<Token>,
    /// One tree per matched token, in token order. Empty unless hydration is on.
    pub captures: Vec<CaptureNode>,
    pub coverage: Coverage,
    pub unmatched: Vec<UnmatchedSpan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardAnalysis {
    pub name: String,
    /// Normalized text, lines joined by `\n`. Span offsets refer to this.
    pub text: String,
    pub lines: Vec<LineAnalysis>,
    pub coverage: Coverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariantCount {
    pub kind: VariantKind,
    pub count: usize,
}

/// Everything learned from one corpus run.
#[derive(Debug, Clone, Serialize)]
pub struct CorpusReport {
    pub card_count: usize,
    pub line_count: usize,
    pub token_count: usize,
    pub coverage: Coverage,
    /// Matched tokens per variant, most frequent first.
    pub variant_counts: Vec<VariantCount>,
    pub digest: Digest,
    /// Maximal repeats with every whole span unioned back in.
    pub repeats: Vec<Repeat>,
    pub candidates: Vec<Candidate>,
    pub adjacency: Adjacency,
    pub metrics: RunMetrics,
    #[serde(skip)]
    pub cards: Vec<CardAnalysis>,
}

impl CorpusReport {
    /// Highlightable context for a digest entry.
    pub fn excerpt(&self, entry: &DigestEntry) -> Option<Excerpt> {
        entry.excerpt(&self.cards.get(entry.card)?.text)
    }
}

/// Compiled vocabulary plus tokenizer. Build once, share freely.
#[derive(Debug, Clone)]
pub struct Engine {
    tokenizer: Tokenizer,
}

impl Engine {
    /// Compile `descriptors` and order them with `priority`.
    ///
    /// Fails on any defect in the declared metadata; no partially valid
    /// engine is ever returned.
    pub fn new(descriptors: &[VariantDescriptor], priority: &[VariantKind]) -> Result<Self> {
        let started = Instant::now();
        let compiled = CompiledVariants::new(descriptors)?;
        let tokenizer = Tokenizer::new(compiled, priority)?;
        tracing::debug!(variants = descriptors.len(), elapsed = ?started.elapsed(), "engine ready");
        Ok(Engine { tokenizer })
    }

    /// The standard vocabulary from [`variants::get`].
    pub fn standard() -> Result<Self> {
        Engine::new(&variants::get(), variants::PRIORITY)
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn compiled(&self) -> &CompiledVariants {
        self.tokenizer.compiled()
    }

    pub fn tokenize(&self, line: &str) -> Vec<Token> {
        self.tokenizer.tokenize(line)
    }

    /// Capture tree for a matched token; `None` for unmatched ones.
    pub fn hydrate(&self, line: &str, token: &Token) -> Result<Option<CaptureNode>> {
        match token.kind {
            TokenKind::Variant(kind) => engine::hydrate(self.compiled(), kind, line, token.range).map(Some),
            TokenKind::Unmatched => Ok(None),
        }
    }

    /// Tokenize one already normalized line.
    pub fn analyze_line(&self, line: &str, options: &Options) -> Result<LineAnalysis> {
        let tokens = self.tokenize(line);
        let mut captures = Vec::new();
        if options.hydrate {
            for token in &tokens {
                if let Some(node) = self.hydrate(line, token)? {
                    captures.push(node);
                }
            }
        }
        let unmatched = gaps::coalesce(line, &tokens, options.min_run_len)?;
        let coverage = Coverage::of_tokens(&tokens);
        Ok(LineAnalysis { text: line.to_string(), tokens, captures, coverage, unmatched })
    }

    pub fn analyze_card(&self, item: &CorpusItem, options: &Options) -> Result<CardAnalysis> {
        let normalized = normalize(&item.name, &item.text, options.strip_reminder_text)?;
        let lines = normalized.iter().map(|line| self.analyze_line(line, options)).collect::<Result<Vec<_>>>()?;
        let coverage: Coverage = lines.iter().map(|l| l.coverage).sum();
        Ok(CardAnalysis { name: item.name.clone(), text: normalized.join("\n"), lines, coverage })
    }

    /// Analyze every card, then run gap analysis over what none of them matched.
    pub fn analyze_corpus(&self, items: &[CorpusItem], options: &Options) -> Result<CorpusReport> {
        options.validate()?;
        let started = Instant::now();
        let mut metrics = RunMetrics::default();

        let cards: Vec<CardAnalysis> = if options.parallel {
            items.par_iter().map(|item| self.analyze_card(item, options)).collect::<Result<_>>()?
        } else {
            items.iter().map(|item| self.analyze_card(item, options)).collect::<Result<_>>()?
        };
        metrics.lines = started.elapsed();

        let mut digest = Digest::new();
        let mut counts: BTreeMap<VariantKind, usize> = BTreeMap::new();
        let mut line_count = 0;
        let mut token_count = 0;
        for (card_index, card) in cards.iter().enumerate() {
            let mut offset = 0;
            for (line_index, line) in card.lines.iter().enumerate() {
                line_count += 1;
                token_count += line.tokens.len();
                for token in &line.tokens {
                    if let TokenKind::Variant(kind) = token.kind {
                        *counts.entry(kind).or_insert(0) += 1;
                    }
                }
                for span in &line.unmatched {
                    digest.push(DigestEntry {
                        card: card_index,
                        line: line_index,
                        absolute: Range { start: offset + span.range.start, end: offset + span.range.end },
                        span: span.clone(),
                    });
                }
                offset += line.text.len() + 1;
            }
        }

        let phase = Instant::now();
        let automaton = SuffixAutomaton::build(digest.texts());
        let repeats = gaps::union_spans(automaton.maximal_repeats(), &digest);
        metrics.vocabulary = automaton.interner().len();
        metrics.automaton_states = automaton.states().len();
        metrics.repeats = phase.elapsed();

        let phase = Instant::now();
        let candidates = gaps::rank(digest.weighted());
        metrics.ranking = phase.elapsed();

        let adjacency = Adjacency::build(&digest);

        let mut variant_counts: Vec<VariantCount> =
            counts.into_iter().map(|(kind, count)| VariantCount { kind, count }).collect();
        variant_counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.kind.cmp(&b.kind)));

        let coverage: Coverage = cards.iter().map(|c| c.coverage).sum();
        metrics.total = started.elapsed();

        tracing::info!(
            cards = cards.len(),
            lines = line_count,
            spans = digest.len(),
            repeats = repeats.len(),
            coverage = coverage.percent(),
            elapsed = ?metrics.total,
            "analyzed corpus"
        );

        Ok(CorpusReport {
            card_count: cards.len(),
            line_count,
            token_count,
            coverage,
            variant_counts,
            digest,
            repeats,
            candidates,
            adjacency,
            metrics,
            cards,
        })
    }
}

// --- Normalization -----------------------------------------------------------

/// Lowercased names a card's text may use to refer to itself, longest first:
/// the full name, each half of a split card (`a // b`), and the short name of
/// a legendary card (the part before `, `).
pub fn normalize_name(name: &str) -> Vec<String> {
    let full = name.trim().to_lowercase();
    let mut names = vec![full.clone()];
    if full.contains(" // ") {
        names.extend(full.split(" // ").map(|half| half.trim().to_string()));
    }
    if let Some((short, _)) = full.split_once(", ") {
        names.push(short.trim().to_string());
    }
    names.retain(|n| !n.is_empty());
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    names.dedup();
    names
}

/// Normalize a card's rules text into lines ready for tokenizing.
///
/// Lowercases, optionally strips reminder text, replaces self references with
/// `~`, collapses runs of spaces and tabs and trims every line.
pub fn normalize(name: &str, text: &str, strip_reminder_text: bool) -> Result<Vec<String>> {
    let mut text = text.to_lowercase();
    if strip_reminder_text {
        text = regex!(r"\s*\([^)]*\)").replace_all(&text, "").into_owned();
    }
    if let Some(pattern) = self_ref_pattern(name)? {
        text = pattern.replace_all(&text, SELF_REF).into_owned();
    }
    let text = regex!(r"[ \t]+").replace_all(&text, " ");
    Ok(text.split('\n').map(|line| line.trim().to_string()).collect())
}

fn self_ref_pattern(name: &str) -> Result<Option<Regex>> {
    let names = normalize_name(name);
    if names.is_empty() {
        return Ok(None);
    }
    let alternatives: Vec<String> = names
        .iter()
        .map(|n| {
            let escaped = regex::escape(n);
            let lead = if fragment::edge(&escaped, Edge::Leading) == EdgeClass::Word { r"\b" } else { "" };
            let trail = if fragment::edge(&escaped, Edge::Trailing) == EdgeClass::Word { r"\b" } else { "" };
            format!("{lead}{escaped}{trail}")
        })
        .collect();
    Regex::new(&alternatives.join("|"))
        .map(Some)
        .map_err(|source| Error::InvalidPattern { variant: "self reference", source })
}
