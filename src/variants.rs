//! The standard vocabulary: every token kind the engine can capture.
//!
//! [`VariantKind`] is closed; adding a kind means adding an enum member here
//! *and* a descriptor in one of the submodules. [`get`] is the registration
//! table the compiler consumes.
//!
//! ```text
//! costs.rs     mana symbols, activation/loyalty costs, equip, add mana
//! objects.rs   self reference, object references, colors, keywords, P/T
//! effects.rs   removal, card draw, damage, life, counters, tokens, ...
//! triggers.rs  when/whenever, trigger events, beginning-of-step triggers
//! ```

use crate::descriptor::VariantDescriptor;
use serde::Serialize;

mod choices;
mod costs;
mod effects;
mod objects;
mod triggers;

pub use choices::*;
pub use costs::hydrate_loyalty;


#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    SelfRef,
    ManaSymbols,
    ActivationCost,
    LoyaltyCost,
    Equip,
    AddMana,
    Keyword,
    ColorFilter,
    ObjectRef,
    PowerToughness,
    Removal,
    Bounce,
    DrawCards,
    DiscardCards,
    DealDamage,
    LifeChange,
    PtModifier,
    GainKeyword,
    Timing,
    Event,
    PhaseTrigger,
    PutCounters,
    CreateToken,
    QuotedAbility,
    SearchLibrary,
    Shuffle,
    YouMay,
    Punctuation,
}

impl VariantKind {
    pub const ALL: [VariantKind; 28] = [
        VariantKind::SelfRef,
        VariantKind::ManaSymbols,
        VariantKind::ActivationCost,
        VariantKind::LoyaltyCost,
        VariantKind::Equip,
        VariantKind::AddMana,
        VariantKind::Keyword,
        VariantKind::ColorFilter,
        VariantKind::ObjectRef,
        VariantKind::PowerToughness,
        VariantKind::Removal,
        VariantKind::Bounce,
        VariantKind::DrawCards,
        VariantKind::DiscardCards,
        VariantKind::DealDamage,
        VariantKind::LifeChange,
        VariantKind::PtModifier,
        VariantKind::GainKeyword,
        VariantKind::Timing,
        VariantKind::Event,
        VariantKind::PhaseTrigger,
        VariantKind::PutCounters,
        VariantKind::CreateToken,
        VariantKind::QuotedAbility,
        VariantKind::SearchLibrary,
        VariantKind::Shuffle,
        VariantKind::YouMay,
        VariantKind::Punctuation,
    ];

    /// Stable snake_case name, used in errors, logs and reports.
    pub fn name(self) -> &'static str {
        match self {
            VariantKind::SelfRef => "self_ref",
            VariantKind::ManaSymbols => "mana_symbols",
            VariantKind::ActivationCost => "activation_cost",
            VariantKind::LoyaltyCost => "loyalty_cost",
            VariantKind::Equip => "equip",
            VariantKind::AddMana => "add_mana",
            VariantKind::Keyword => "keyword",
            VariantKind::ColorFilter => "color_filter",
            VariantKind::ObjectRef => "object_ref",
            VariantKind::PowerToughness => "power_toughness",
            VariantKind::Removal => "removal",
            VariantKind::Bounce => "bounce",
            VariantKind::DrawCards => "draw_cards",
            VariantKind::DiscardCards => "discard_cards",
            VariantKind::DealDamage => "deal_damage",
            VariantKind::LifeChange => "life_change",
            VariantKind::PtModifier => "pt_modifier",
            VariantKind::GainKeyword => "gain_keyword",
            VariantKind::Timing => "timing",
            VariantKind::Event => "event",
            VariantKind::PhaseTrigger => "phase_trigger",
            VariantKind::PutCounters => "put_counters",
            VariantKind::CreateToken => "create_token",
            VariantKind::QuotedAbility => "quoted_ability",
            VariantKind::SearchLibrary => "search_library",
            VariantKind::Shuffle => "shuffle",
            VariantKind::YouMay => "you_may",
            VariantKind::Punctuation => "punctuation",
        }
    }

    pub fn from_name(name: &str) -> Option<VariantKind> {
        VariantKind::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl std::fmt::Display for VariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Variants tried before the length-ordered remainder.
///
/// `{t}:` must become one activation cost rather than a mana symbol followed
/// by stray punctuation; both cost kinds outrank the shorter symbol run.
pub const PRIORITY: &[VariantKind] = &[VariantKind::ActivationCost, VariantKind::LoyaltyCost, VariantKind::PhaseTrigger];

/// The full registration table, in declaration order.
pub fn get() -> Vec<VariantDescriptor> {
    let mut all = Vec::with_capacity(VariantKind::ALL.len());
    all.extend(costs::get());
    all.extend(objects::get());
    all.extend(effects::get());
    all.extend(triggers::get());
    all
}
