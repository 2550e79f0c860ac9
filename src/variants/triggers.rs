//! Triggered-ability framing.

use super::{Step, StepOwner, Timing, TriggerEvent, VariantKind};
use crate::descriptor::{VariantDescriptor, field};

pub(super) fn get() -> Vec<VariantDescriptor> {
    vec![timing(), event(), phase_trigger()]
}

fn timing() -> VariantDescriptor {
    variant! {
        kind: VariantKind::Timing,
        template: "{timing}",
        fields: [field::choice::<Timing>("timing")],
    }
}

/// `enters the battlefield`, `dies`, `deals combat damage to a player`
fn event() -> VariantDescriptor {
    variant! {
        kind: VariantKind::Event,
        template: "{event}",
        fields: [field::choice::<TriggerEvent>("event")],
    }
}

/// `at the beginning of your upkeep`
fn phase_trigger() -> VariantDescriptor {
    variant! {
        kind: VariantKind::PhaseTrigger,
        template: "at the beginning of {owner} {step}",
        fields: [field::choice::<StepOwner>("owner"), field::choice::<Step>("step")],
    }
}
