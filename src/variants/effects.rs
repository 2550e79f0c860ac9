//! One-shot and continuous effects.

use super::{Action, Color, CounterKind, EffectDuration, Keyword, LifeDirection, Player, Quantity, Recipient, VariantKind, Zone};
use crate::descriptor::{VariantDescriptor, field};

pub(super) fn get() -> Vec<VariantDescriptor> {
    vec![
        removal(),
        bounce(),
        draw_cards(),
        discard_cards(),
        deal_damage(),
        life_change(),
        pt_modifier(),
        gain_keyword(),
        put_counters(),
        create_token(),
        quoted_ability(),
        search_library(),
        shuffle(),
        you_may(),
        punctuation(),
    ]
}

/// `destroy target creature`, `exile all enchantments`
fn removal() -> VariantDescriptor {
    variant! {
        kind: VariantKind::Removal,
        template: "{action} {object}",
        fields: [field::choice::<Action>("action"), field::nested("object", VariantKind::ObjectRef)],
    }
}

/// `return target creature to its owner's hand`
fn bounce() -> VariantDescriptor {
    variant! {
        kind: VariantKind::Bounce,
        template: "return {object} to (?:its|their) (?:owner's|owners') {zone}",
        fields: [field::nested("object", VariantKind::ObjectRef), field::choice::<Zone>("zone").plural()],
    }
}

/// `draw a card`, `target player draws two cards`
fn draw_cards() -> VariantDescriptor {
    variant! {
        kind: VariantKind::DrawCards,
        template: "{player} draws? {count} cards?",
        fields: [field::choice::<Player>("player").optional(), field::choice::<Quantity>("count")],
    }
}

fn discard_cards() -> VariantDescriptor {
    variant! {
        kind: VariantKind::DiscardCards,
        template: "{player} discards? {count} cards?",
        fields: [field::choice::<Player>("player").optional(), field::choice::<Quantity>("count")],
    }
}

/// `deals 3 damage to any target`
fn deal_damage() -> VariantDescriptor {
    variant! {
        kind: VariantKind::DealDamage,
        template: "deals {amount} damage to {recipient}",
        fields: [field::choice::<Quantity>("amount"), field::choice::<Recipient>("recipient")],
    }
}

/// `you gain 3 life`, `each opponent loses 1 life`
fn life_change() -> VariantDescriptor {
    variant! {
        kind: VariantKind::LifeChange,
        template: "{player} {direction} {amount} life",
        fields: [
            field::choice::<Player>("player").optional(),
            field::choice::<LifeDirection>("direction"),
            field::choice::<Quantity>("amount"),
        ],
    }
}

/// `gets +2/+2 until end of turn`
fn pt_modifier() -> VariantDescriptor {
    variant! {
        kind: VariantKind::PtModifier,
        template: "gets? {pt} {duration}",
        fields: [
            field::nested("pt", VariantKind::PowerToughness),
            field::choice::<EffectDuration>("duration").optional(),
        ],
    }
}

/// `gains flying until end of turn`, `has haste`
fn gain_keyword() -> VariantDescriptor {
    variant! {
        kind: VariantKind::GainKeyword,
        template: "{verb} {keyword} {duration}",
        fields: [
            field::text("verb", &["gains?", "has", "have"]),
            field::choice::<Keyword>("keyword"),
            field::choice::<EffectDuration>("duration").optional(),
        ],
    }
}

/// `put a +1/+1 counter on target creature`
fn put_counters() -> VariantDescriptor {
    variant! {
        kind: VariantKind::PutCounters,
        template: "put {count} {counter} counters? on {object}",
        fields: [
            field::choice::<Quantity>("count"),
            field::choice::<CounterKind>("counter"),
            field::nested("object", VariantKind::ObjectRef).optional(),
        ],
    }
}

/// `create a 1/1 white soldier creature token`
fn create_token() -> VariantDescriptor {
    variant! {
        kind: VariantKind::CreateToken,
        template: "create {count} {pt} {color} {subtype} creature tokens?",
        fields: [
            field::choice::<Quantity>("count"),
            field::nested("pt", VariantKind::PowerToughness),
            field::choice::<Color>("color").optional(),
            field::text("subtype", &["[a-z]+"]),
        ],
    }
}

/// `with "{t}: add {g}."`
fn quoted_ability() -> VariantDescriptor {
    variant! {
        kind: VariantKind::QuotedAbility,
        template: r#"with "{text}""#,
        fields: [field::text("text", &[r#"[^"]+"#])],
    }
}

fn search_library() -> VariantDescriptor {
    variant! {
        kind: VariantKind::SearchLibrary,
        template: "search your library for {object}",
        fields: [field::nested("object", VariantKind::ObjectRef)],
    }
}

/// `shuffle`, `then shuffle your library`
fn shuffle() -> VariantDescriptor {
    variant! {
        kind: VariantKind::Shuffle,
        template: "{then} shuffle {library}",
        fields: [field::flag("then", &["then"]), field::flag("library", &["your library"])],
    }
}

fn you_may() -> VariantDescriptor {
    variant! { kind: VariantKind::YouMay, template: "you may" }
}

fn punctuation() -> VariantDescriptor {
    variant! {
        kind: VariantKind::Punctuation,
        template: "{mark}",
        fields: [field::text("mark", &["[.,;:]"])],
    }
}
