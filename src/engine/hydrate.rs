//! Hydration: matched tokens to capture trees.
//!
//! The tokenizer only records *which* variant matched and *where*. Hydration
//! re-runs the variant's anchored pattern on the token's own text so every
//! group's span is relative to that token, then reads each declared field:
//!
//! ```text
//! flag    ── group present? ───────────────▶ Value::Flag(bool)   (always set)
//! choice  ── first member regex to match ──▶ Value::Choice       (skipped if absent)
//! text    ── captured text ────────────────▶ Value::Text         (skipped if absent)
//! nested  ── recurse on the child's span ──▶ Value::Child(index) (skipped if absent)
//! ```
//!
//! A variant with a custom `hydrate` hook bypasses all of the above.

use super::compiled_variants::CompiledVariants;
use crate::capture::{CaptureNode, ChoiceValue, Field, Value};
use crate::descriptor::FieldKind;
use crate::error::{Error, Result};
use crate::variants::VariantKind;
use crate::Range;

/// Hydrate the token of `kind` spanning `range` in `line`.
pub fn hydrate(variants: &CompiledVariants, kind: VariantKind, line: &str, range: Range) -> Result<CaptureNode> {
    let variant = variants.get(kind).ok_or(Error::UndeclaredVariant(kind.name()))?;
    if let Some(custom) = variant.hydrate {
        return custom(kind, line, range);
    }

    let text = line.get(range.start..range.end).unwrap_or_default();
    let caps = variant
        .exact
        .captures(text)
        .ok_or_else(|| Error::HydrationMismatch { variant: kind.name(), text: text.to_string() })?;

    let mut node = CaptureNode::new(kind, range);
    // (field slot, child) pairs; indices are assigned once children are sorted.
    let mut children: Vec<(usize, CaptureNode)> = Vec::new();

    for field in &variant.fields {
        let group = caps.name(field.name);
        let span = group.map(|m| Range { start: range.start + m.start(), end: range.start + m.end() });

        let value = match (&field.kind, group) {
            (FieldKind::Flag(_), _) => Value::Flag(group.is_some()),
            (_, None) => continue,
            (FieldKind::Choice(set), Some(m)) => {
                let index = field.members.iter().position(|re| re.is_match(m.as_str())).ok_or_else(|| {
                    Error::NoMatchingMember { field: field.name, family: set.family, text: m.as_str().to_string() }
                })?;
                Value::Choice(ChoiceValue { family: set.family, member: set.members[index].name, index })
            }
            (FieldKind::Text(_), Some(m)) => Value::Text(m.as_str().to_string()),
            (FieldKind::Nested(child_kind), Some(m)) => {
                let child_range = Range { start: range.start + m.start(), end: range.start + m.end() };
                let child = hydrate(variants, *child_kind, line, child_range)?;
                children.push((node.fields.len(), child));
                Value::Child(usize::MAX)
            }
        };
        node.fields.push(Field { name: field.name, value, range: span });
    }

    children.sort_by_key(|(_, child)| child.range);
    for (index, (slot, child)) in children.into_iter().enumerate() {
        node.fields[slot].value = Value::Child(index);
        node.children.push(child);
    }

    tracing::trace!(variant = kind.name(), fields = node.fields.len(), children = node.children.len(), "hydrated");
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::field;
    use crate::engine::Tokenizer;
    use crate::variants::{self, Action, Color, ObjectNoun, Selector};
    use crate::TokenKind;

    fn standard() -> Tokenizer {
        Tokenizer::new(CompiledVariants::new(&variants::get()).unwrap(), variants::PRIORITY).unwrap()
    }

    fn hydrate_line(tokenizer: &Tokenizer, line: &str) -> Vec<CaptureNode> {
        tokenizer
            .tokenize(line)
            .into_iter()
            .filter_map(|t| match t.kind {
                TokenKind::Variant(kind) => Some(hydrate(tokenizer.compiled(), kind, line, t.range).unwrap()),
                TokenKind::Unmatched => None,
            })
            .collect()
    }

    #[test]
    fn flag_round_trip() {
        let descriptors = vec![variant! {
            kind: VariantKind::Shuffle,
            template: "{then} shuffle",
            fields: [field::flag("then", &["then"])],
        }];
        let compiled = CompiledVariants::new(&descriptors).unwrap();

        let node = hydrate(&compiled, VariantKind::Shuffle, "shuffle", Range { start: 0, end: 7 }).unwrap();
        assert!(!node.flag("then"));
        assert_eq!(node.get("then").map(|f| f.range), Some(None));

        let node = hydrate(&compiled, VariantKind::Shuffle, "then shuffle", Range { start: 0, end: 12 }).unwrap();
        assert!(node.flag("then"));
        assert_eq!(node.get("then").and_then(|f| f.range), Some(Range { start: 0, end: 4 }));
    }

    #[test]
    fn nested_object_reference() {
        let tokenizer = standard();
        let line = "destroy target nonblack creature.";
        let nodes = hydrate_line(&tokenizer, line);
        let removal = &nodes[0];
        assert_eq!(removal.kind, VariantKind::Removal);
        assert_eq!(removal.choice::<Action>("action"), Some(Action::Destroy));

        let object = removal.child("object").unwrap();
        assert_eq!(object.kind, VariantKind::ObjectRef);
        assert_eq!(&line[object.range.start..object.range.end], "target nonblack creature");
        assert_eq!(object.choice::<Selector>("selector"), Some(Selector::Target));
        assert_eq!(object.choice::<ObjectNoun>("noun"), Some(ObjectNoun::Creature));
        assert!(!object.flag("card"));
        assert!(object.get("controller").is_none());

        let filter = object.child("filter").unwrap();
        assert!(filter.flag("non"));
        assert_eq!(filter.choice::<Color>("color"), Some(Color::Black));
    }

    #[test]
    fn plural_nouns_hydrate_to_their_member() {
        let tokenizer = standard();
        let nodes = hydrate_line(&tokenizer, "exile all sorceries");
        let object = nodes[0].child("object").unwrap();
        assert_eq!(object.choice::<ObjectNoun>("noun"), Some(ObjectNoun::Sorcery));
        assert_eq!(object.choice::<Selector>("selector"), Some(Selector::All));
    }

    #[test]
    fn field_spans_stay_inside_their_token() {
        let tokenizer = standard();
        let lines = [
            "{2}{w}, {t}: create a 1/1 white soldier creature token.",
            "+1: up to one target creature gets +2/+2 until end of turn.",
            "at the beginning of your upkeep, you may put a +1/+1 counter on ~.",
            "return target creature you don't control to its owner's hand.",
            "~ deals 3 damage to any target. you gain 3 life.",
        ];
        for line in lines {
            for node in hydrate_line(&tokenizer, line) {
                for inner in node.walk() {
                    assert!(inner.range.start >= node.range.start && inner.range.end <= node.range.end);
                    for field in &inner.fields {
                        if let Some(span) = field.range {
                            assert!(span.start >= inner.range.start && span.end <= inner.range.end, "{line:?}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn children_follow_span_order() {
        let tokenizer = standard();
        let line = "{1}{g}, {t}: add {g}{g}.";
        let nodes = hydrate_line(&tokenizer, line);
        for node in &nodes {
            let starts: Vec<usize> = node.children.iter().map(|c| c.range.start).collect();
            let mut sorted = starts.clone();
            sorted.sort();
            assert_eq!(starts, sorted);
        }
        let add = nodes.iter().find(|n| n.kind == VariantKind::AddMana).unwrap();
        assert_eq!(add.child("mana").and_then(|m| m.text("symbols")), Some("{g}{g}"));
    }

    #[test]
    fn custom_hook_replaces_table_hydration() {
        let tokenizer = standard();
        let nodes = hydrate_line(&tokenizer, "−2: draw two cards.");
        let cost = &nodes[0];
        assert_eq!(cost.kind, VariantKind::LoyaltyCost);
        assert!(cost.flag("negative"));
        assert_eq!(cost.text("amount"), Some("2"));
        assert!(cost.get("cost").is_none());
    }

    #[test]
    fn unknown_member_text_is_a_defect() {
        choice! {
            enum Only: "only" {
                Blue,
            }
        }
        let descriptors = vec![variant! {
            kind: VariantKind::Keyword,
            template: "{word}",
            fields: [field::choice::<Only>("word")],
        }];
        let mut compiled = CompiledVariants::new(&descriptors).unwrap();
        // Widen the matched alternation without touching the member regexes.
        let variant = &mut compiled.variants[0];
        variant.exact = regex::Regex::new(r"^(?P<word>\w+)$").unwrap();

        let err = hydrate(&compiled, VariantKind::Keyword, "red", Range { start: 0, end: 3 }).unwrap_err();
        assert!(matches!(err, Error::NoMatchingMember { field: "word", family: "only", .. }));
        assert!(err.is_defect());
    }

    #[test]
    fn mismatch_is_reported() {
        let compiled = CompiledVariants::new(&variants::get()).unwrap();
        let err = hydrate(&compiled, VariantKind::YouMay, "you must", Range { start: 0, end: 8 }).unwrap_err();
        assert!(matches!(err, Error::HydrationMismatch { variant: "you_may", .. }));
    }
}
