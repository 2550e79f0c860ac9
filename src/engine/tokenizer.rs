//! The tokenizer.
//!
//! ## Ordering
//!
//! ```text
//! PRIORITY list (as listed)  ──▶  remaining variants, longest pattern first  ──▶  catch-all
//! ```
//!
//! At each position the variants are tried in that order and the first one
//! that matches *at that position* is committed. This is not longest-match:
//! templates are written to exploit the order, so a shorter variant in the
//! priority list beats a longer one further down.
//!
//! Whitespace between tokens is skipped and never emitted. Text no variant
//! claims is covered by the catch-all, one run of non-space, non-terminal
//! characters (or a single stray symbol) at a time.

use super::compiled_variants::{CompiledVariant, CompiledVariants};
use super::trigger::{TriggerInfo, Triggers};
use crate::error::{Error, Result};
use crate::variants::VariantKind;
use crate::{Range, Token, TokenKind};

#[derive(Debug, Clone)]
pub struct Tokenizer {
    compiled: CompiledVariants,
    /// Indices into `compiled.variants`, in matching order.
    order: Vec<usize>,
    triggers: Triggers,
}

impl Tokenizer {
    /// Build the matching order over `compiled`.
    ///
    /// Every entry of `priority` must be registered; duplicates are ignored
    /// after their first appearance.
    pub fn new(compiled: CompiledVariants, priority: &[VariantKind]) -> Result<Self> {
        let mut order: Vec<usize> = Vec::with_capacity(compiled.len());
        for &kind in priority {
            let index = compiled.iter().position(|v| v.kind == kind).ok_or(Error::UndeclaredVariant(kind.name()))?;
            if !order.contains(&index) {
                order.push(index);
            }
        }

        let mut rest: Vec<usize> = (0..compiled.len()).filter(|i| !order.contains(i)).collect();
        // Stable: equal lengths keep declaration order.
        rest.sort_by(|&a, &b| compiled.variants[b].pattern.len().cmp(&compiled.variants[a].pattern.len()));
        order.extend(rest);

        let triggers = Triggers::new(&compiled)?;
        tracing::debug!(
            variants = compiled.len(),
            priority = priority.len(),
            order = ?order.iter().map(|&i| compiled.variants[i].kind.name()).collect::<Vec<_>>(),
            "built tokenizer"
        );
        Ok(Tokenizer { compiled, order, triggers })
    }

    pub fn compiled(&self) -> &CompiledVariants {
        &self.compiled
    }

    /// Variant kinds in the order they are tried.
    pub fn order(&self) -> impl Iterator<Item = VariantKind> + '_ {
        self.order.iter().map(|&i| self.compiled.variants[i].kind)
    }

    pub fn scan(&self, line: &str) -> TriggerInfo {
        self.triggers.scan(line)
    }

    /// Split `line` into tokens covering every non-whitespace byte exactly once.
    pub fn tokenize(&self, line: &str) -> Vec<Token> {
        let info = self.triggers.scan(line);
        let candidates: Vec<&CompiledVariant> =
            self.order.iter().filter(|&&i| info.is_active(i)).map(|&i| &self.compiled.variants[i]).collect();

        let mut tokens = Vec::new();
        let mut pos = 0;
        while pos < line.len() {
            let rest = &line[pos..];
            let skipped = rest.len() - rest.trim_start().len();
            if skipped > 0 {
                pos += skipped;
                continue;
            }

            let (kind, end) = match candidates.iter().find_map(|v| match_at(v, line, pos)) {
                Some(found) => found,
                None => (TokenKind::Unmatched, catch_all_end(line, pos)),
            };
            tracing::trace!(?kind, start = pos, end, text = &line[pos..end], "token");
            tokens.push(Token { kind, range: Range { start: pos, end } });
            pos = end;
        }
        tokens
    }
}

/// End of a non-empty match of `variant` that starts exactly at `pos`.
fn match_at(variant: &CompiledVariant, line: &str, pos: usize) -> Option<(TokenKind, usize)> {
    let m = variant.search.find_at(line, pos)?;
    (m.start() == pos && m.end() > pos).then_some((TokenKind::Variant(variant.kind), m.end()))
}

fn catch_all_end(line: &str, pos: usize) -> usize {
    match regex!(r"[^\s.,;]+|\S").find_at(line, pos) {
        Some(m) if m.start() == pos => m.end(),
        // Only reachable if `pos` sits on whitespace; consume one char.
        _ => pos + line[pos..].chars().next().map_or(1, char::len_utf8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::field;
    use crate::variants;

    fn standard() -> Tokenizer {
        Tokenizer::new(CompiledVariants::new(&variants::get()).unwrap(), variants::PRIORITY).unwrap()
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn priority_list_decides_between_prefix_patterns() {
        let compiled = CompiledVariants::new(&variants::get()).unwrap();

        let tokenizer = Tokenizer::new(compiled.clone(), &[VariantKind::ActivationCost]).unwrap();
        let tokens = tokenizer.tokenize("{t}: add {g}.");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Variant(VariantKind::ActivationCost),
                TokenKind::Variant(VariantKind::AddMana),
                TokenKind::Variant(VariantKind::Punctuation),
            ]
        );

        // With the symbol run first, the colon is left over as its own token.
        let tokenizer = Tokenizer::new(compiled, &[VariantKind::ManaSymbols]).unwrap();
        let tokens = tokenizer.tokenize("{t}: add {g}.");
        assert_eq!(tokens[0].kind, TokenKind::Variant(VariantKind::ManaSymbols));
        assert_eq!(tokens[0].range, Range { start: 0, end: 3 });
        assert_eq!(tokens[1].kind, TokenKind::Variant(VariantKind::Punctuation));
    }

    #[test]
    fn first_match_wins_over_longest() {
        let descriptors = vec![
            variant! { kind: VariantKind::YouMay, template: "you" },
            variant! { kind: VariantKind::DrawCards, template: "you draw" },
        ];
        let compiled = CompiledVariants::new(&descriptors).unwrap();

        let tokenizer = Tokenizer::new(compiled.clone(), &[VariantKind::YouMay]).unwrap();
        let tokens = tokenizer.tokenize("you draw");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Variant(VariantKind::YouMay));
        assert_eq!(tokens[1].kind, TokenKind::Unmatched);

        // Without a priority, the longer pattern is tried first.
        let tokenizer = Tokenizer::new(compiled, &[]).unwrap();
        let tokens = tokenizer.tokenize("you draw");
        assert_eq!(kinds(&tokens), vec![TokenKind::Variant(VariantKind::DrawCards)]);
    }

    #[test]
    fn order_is_priority_then_length() {
        let descriptors = vec![
            variant! { kind: VariantKind::YouMay, template: "you may" },
            variant! { kind: VariantKind::Keyword, template: "{keyword}", fields: [field::text("keyword", &["flying", "reach"])] },
            variant! { kind: VariantKind::Timing, template: "when" },
        ];
        let tokenizer = Tokenizer::new(CompiledVariants::new(&descriptors).unwrap(), &[VariantKind::Timing]).unwrap();
        let order: Vec<VariantKind> = tokenizer.order().collect();
        assert_eq!(order, vec![VariantKind::Timing, VariantKind::Keyword, VariantKind::YouMay]);
    }

    #[test]
    fn unknown_priority_entry_is_an_error() {
        let descriptors = vec![variant! { kind: VariantKind::YouMay, template: "you may" }];
        let err = Tokenizer::new(CompiledVariants::new(&descriptors).unwrap(), &[VariantKind::Shuffle]).unwrap_err();
        assert!(matches!(err, Error::UndeclaredVariant("shuffle")));
    }

    #[test]
    fn catch_all_stops_at_terminal_punctuation() {
        let tokenizer = Tokenizer::new(CompiledVariants::new(&[]).unwrap(), &[]).unwrap();
        let line = "frobnicate it, twice.";
        let tokens = tokenizer.tokenize(line);
        let texts: Vec<&str> = tokens.iter().map(|t| &line[t.range.start..t.range.end]).collect();
        assert_eq!(texts, vec!["frobnicate", "it", ",", "twice", "."]);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Unmatched));
    }

    #[test]
    fn tokens_reconstruct_the_line() {
        let tokenizer = standard();
        let lines = [
            "when ~ enters the battlefield, draw a card.",
            "{1}{g}, {t}: put a +1/+1 counter on target creature you control.",
            "target creature gets +2/+2 until end of turn and gains trample.",
            "frobnicate the  widget ; twice",
            "",
            "   ",
        ];
        for line in lines {
            let tokens = tokenizer.tokenize(line);
            let mut pos = 0;
            let mut rebuilt = String::new();
            for token in &tokens {
                assert!(token.range.start >= pos, "overlapping token in {line:?}");
                assert!(line[pos..token.range.start].trim().is_empty(), "dropped text in {line:?}");
                assert!(token.range.end > token.range.start);
                rebuilt.push_str(&line[token.range.start..token.range.end]);
                pos = token.range.end;
            }
            assert!(line[pos..].trim().is_empty());
            // Multi-word tokens keep their inner spaces; compare without any.
            let rebuilt: String = rebuilt.split_whitespace().collect();
            let expected: String = line.split_whitespace().collect();
            assert_eq!(rebuilt, expected);
        }
    }

    #[test]
    fn words_are_never_split_at_optional_edges() {
        let tokenizer = standard();
        let texts = |line: &'static str| -> Vec<(TokenKind, &'static str)> {
            tokenizer.tokenize(line).iter().map(|t| (t.kind, t.text(line))).collect()
        };

        let tokens = texts("that player shuffles.");
        assert!(tokens.contains(&(TokenKind::Unmatched, "shuffles")), "{tokens:?}");
        assert!(tokens.iter().all(|(kind, _)| *kind != TokenKind::Variant(VariantKind::Shuffle)));

        let tokens = texts("you shuffled it");
        assert!(tokens.contains(&(TokenKind::Unmatched, "shuffled")), "{tokens:?}");

        let tokens = texts("target creatureless thing");
        assert!(tokens.contains(&(TokenKind::Unmatched, "creatureless")), "{tokens:?}");
        assert!(tokens.iter().all(|(kind, _)| *kind != TokenKind::Variant(VariantKind::ObjectRef)));

        // The same templates still match whole words.
        assert_eq!(texts("then shuffle.")[0], (TokenKind::Variant(VariantKind::Shuffle), "then shuffle"));
        assert_eq!(texts("target creature")[0], (TokenKind::Variant(VariantKind::ObjectRef), "target creature"));
    }

    #[test]
    fn tokenizes_a_triggered_ability() {
        let tokens = standard().tokenize("when ~ enters the battlefield, draw a card.");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Variant(VariantKind::Timing),
                TokenKind::Variant(VariantKind::SelfRef),
                TokenKind::Variant(VariantKind::Event),
                TokenKind::Variant(VariantKind::Punctuation),
                TokenKind::Variant(VariantKind::DrawCards),
                TokenKind::Variant(VariantKind::Punctuation),
            ]
        );
    }
}
