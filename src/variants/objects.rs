//! Things on the battlefield and their attributes.

use super::{Color, Controller, Keyword, ObjectNoun, Selector, Supertype, VariantKind};
use crate::descriptor::{VariantDescriptor, field};

pub(super) fn get() -> Vec<VariantDescriptor> {
    vec![self_ref(), keyword(), color_filter(), object_ref(), power_toughness()]
}

/// The card's own name, already replaced with `~` by normalization.
fn self_ref() -> VariantDescriptor {
    variant! { kind: VariantKind::SelfRef, template: "~" }
}

fn keyword() -> VariantDescriptor {
    variant! {
        kind: VariantKind::Keyword,
        template: "{keyword}",
        fields: [field::choice::<Keyword>("keyword")],
    }
}

/// `white`, `nonblack`, `non-green`
fn color_filter() -> VariantDescriptor {
    variant! {
        kind: VariantKind::ColorFilter,
        template: "{non}{color}",
        fields: [field::flag("non", &["non-?"]), field::choice::<Color>("color")],
    }
}

/// `target creature`, `another nonblack creature you control`,
/// `all legendary artifacts`, `a creature card`
fn object_ref() -> VariantDescriptor {
    variant! {
        kind: VariantKind::ObjectRef,
        template: "{selector} {supertype} {filter} {noun} {card} {controller}",
        fields: [
            field::choice::<Selector>("selector").optional(),
            field::choice::<Supertype>("supertype").optional(),
            field::nested("filter", VariantKind::ColorFilter).optional(),
            field::choice::<ObjectNoun>("noun").plural(),
            field::flag("card", &["cards?"]),
            field::choice::<Controller>("controller").optional(),
        ],
    }
}

/// `2/2`, `+1/+1`, `-x/-x`, `*/*`
fn power_toughness() -> VariantDescriptor {
    variant! {
        kind: VariantKind::PowerToughness,
        template: "{power}/{toughness}",
        fields: [
            field::text("power", &[r"[+-]?(?:\d+|x|\*)"]),
            field::text("toughness", &[r"[+-]?(?:\d+|x|\*)"]),
        ],
    }
}
