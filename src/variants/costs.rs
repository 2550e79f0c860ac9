//! Costs and mana.

use super::VariantKind;
use crate::capture::{CaptureNode, Field, Value};
use crate::descriptor::{VariantDescriptor, field};
use crate::error::{Error, Result};
use crate::Range;

pub(super) fn get() -> Vec<VariantDescriptor> {
    vec![mana_symbols(), activation_cost(), loyalty_cost(), equip(), add_mana()]
}

/// `{2}{u}`, `{t}`, `{w/u}`
fn mana_symbols() -> VariantDescriptor {
    variant! {
        kind: VariantKind::ManaSymbols,
        template: "{symbols}",
        fields: [field::text("symbols", &[r"(?:\{[wubrgcxts0-9/]+\})+"])],
    }
}

/// `{1}{g}, {t}:`
fn activation_cost() -> VariantDescriptor {
    variant! {
        kind: VariantKind::ActivationCost,
        template: "{cost}:",
        fields: [field::nested("cost", VariantKind::ManaSymbols)],
    }
}

/// `+1:`, `−3:`, `0:`
fn loyalty_cost() -> VariantDescriptor {
    variant! {
        kind: VariantKind::LoyaltyCost,
        template: "{cost}:",
        fields: [field::text("cost", &[r"[+−-]?(?:\d+|x)"])],
        hydrate: hydrate_loyalty,
    }
}

/// `equip {2}`
fn equip() -> VariantDescriptor {
    variant! {
        kind: VariantKind::Equip,
        template: "equip {cost}",
        fields: [field::nested("cost", VariantKind::ManaSymbols)],
    }
}

/// `add {g}{g}`
fn add_mana() -> VariantDescriptor {
    variant! {
        kind: VariantKind::AddMana,
        template: "add {mana}",
        fields: [field::nested("mana", VariantKind::ManaSymbols)],
    }
}

/// Split a loyalty cost into its sign and amount instead of one opaque text.
///
/// Yields a `negative` flag (absent when the cost has no sign) and an `amount`
/// text field holding the digits or `x`.
pub fn hydrate_loyalty(kind: VariantKind, line: &str, range: Range) -> Result<CaptureNode> {
    let text = line.get(range.start..range.end).unwrap_or_default();
    let mismatch = || Error::HydrationMismatch { variant: kind.name(), text: text.to_string() };
    let caps = regex!(r"^([+−-]?)(\d+|x):$").captures(text).ok_or_else(mismatch)?;
    let (Some(sign), Some(amount)) = (caps.get(1), caps.get(2)) else {
        return Err(mismatch());
    };

    let mut node = CaptureNode::new(kind, range);
    let at = |m: regex::Match<'_>| Range { start: range.start + m.start(), end: range.start + m.end() };
    node.fields.push(Field {
        name: "negative",
        value: Value::Flag(matches!(sign.as_str(), "-" | "−")),
        range: (!sign.is_empty()).then(|| at(sign)),
    });
    node.fields.push(Field { name: "amount", value: Value::Text(amount.as_str().to_string()), range: Some(at(amount)) });
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loyalty_sign_and_amount() {
        let line = "−3: destroy target creature.";
        let node = hydrate_loyalty(VariantKind::LoyaltyCost, line, Range { start: 0, end: "−3:".len() }).unwrap();
        assert!(node.flag("negative"));
        assert_eq!(node.text("amount"), Some("3"));

        let node = hydrate_loyalty(VariantKind::LoyaltyCost, "0: draw", Range { start: 0, end: 2 }).unwrap();
        assert!(!node.flag("negative"));
        assert_eq!(node.get("negative").and_then(|f| f.range), None);
    }

    #[test]
    fn loyalty_rejects_foreign_text() {
        let err = hydrate_loyalty(VariantKind::LoyaltyCost, "draw", Range { start: 0, end: 4 }).unwrap_err();
        assert!(matches!(err, Error::HydrationMismatch { variant: "loyalty_cost", .. }));
    }
}
