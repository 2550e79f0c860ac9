//! Declarative variant metadata.
//!
//! A [`VariantDescriptor`] is the registration-table entry for one token kind:
//! a template plus the [`FieldDescriptor`]s its placeholders refer to. The
//! compiler turns descriptors into regexes; the hydrator uses the same
//! descriptors to read captured text back into a [`CaptureNode`].
//!
//! Descriptors are built once at startup (see `crate::variants::get`) and are
//! never mutated afterwards.

use crate::capture::CaptureNode;
use crate::engine::FragmentFlags;
use crate::error::Result;
use crate::variants::VariantKind;
use crate::Range;

/// Override for table-driven hydration.
///
/// Receives the variant, the full (normalized) line and the token's range.
pub type HydrateFn = fn(VariantKind, &str, Range) -> Result<CaptureNode>;

/// One member of a choice family.
#[derive(Debug)]
pub struct Member<T: 'static> {
    pub value: T,
    /// Rust identifier of the member, as written in the `choice!` block.
    pub name: &'static str,
    /// Regex override; `None` means "the lowercased member name".
    pub pattern: Option<&'static str>,
}

/// A closed set of alternatives a field may capture (colors, zones, ...).
///
/// Implemented by the `choice!` macro; never by hand.
pub trait Choice: Copy + 'static {
    const FAMILY: &'static str;
    const MEMBERS: &'static [Member<Self>];
}

/// Type-erased view of a [`Choice`] family, as stored on a field.
#[derive(Debug, Clone)]
pub struct ChoiceSet {
    pub family: &'static str,
    pub members: Vec<MemberPattern>,
}

#[derive(Debug, Clone)]
pub struct MemberPattern {
    pub name: &'static str,
    pub pattern: String,
}

impl ChoiceSet {
    pub fn of<T: Choice>() -> Self {
        let members = T::MEMBERS
            .iter()
            .map(|m| MemberPattern {
                name: m.name,
                pattern: m.pattern.map(str::to_string).unwrap_or_else(|| m.name.to_lowercase()),
            })
            .collect();
        ChoiceSet { family: T::FAMILY, members }
    }
}

/// What kind of value a field hydrates into, together with its pattern source.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// One member of an enumerated family.
    Choice(ChoiceSet),
    /// Presence flag: `true` when any alternative is present.
    Flag(&'static [&'static str]),
    /// Another capturable variant, inlined into this one.
    Nested(VariantKind),
    /// Opaque text matched by any of the given regex alternatives.
    Text(&'static [&'static str]),
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    pub flags: FragmentFlags,
}

impl FieldDescriptor {
    /// Whether the field's group may be absent from a match.
    pub fn is_optional(&self) -> bool {
        matches!(self.kind, FieldKind::Flag(_)) || self.flags.contains(FragmentFlags::OPTIONAL)
    }

    pub fn optional(mut self) -> Self {
        self.flags |= FragmentFlags::OPTIONAL;
        self
    }

    pub fn plural(mut self) -> Self {
        self.flags |= FragmentFlags::PLURAL;
        self
    }

    pub fn bounded(mut self) -> Self {
        self.flags |= FragmentFlags::BOUNDED;
        self
    }
}

/// Field constructors used by the registration table.
pub mod field {
    use super::{Choice, ChoiceSet, FieldDescriptor, FieldKind};
    use crate::engine::FragmentFlags;
    use crate::variants::VariantKind;

    pub fn choice<T: Choice>(name: &'static str) -> FieldDescriptor {
        FieldDescriptor { name, kind: FieldKind::Choice(ChoiceSet::of::<T>()), flags: FragmentFlags::empty() }
    }

    pub fn flag(name: &'static str, alternatives: &'static [&'static str]) -> FieldDescriptor {
        FieldDescriptor { name, kind: FieldKind::Flag(alternatives), flags: FragmentFlags::empty() }
    }

    pub fn text(name: &'static str, alternatives: &'static [&'static str]) -> FieldDescriptor {
        FieldDescriptor { name, kind: FieldKind::Text(alternatives), flags: FragmentFlags::empty() }
    }

    pub fn nested(name: &'static str, kind: VariantKind) -> FieldDescriptor {
        FieldDescriptor { name, kind: FieldKind::Nested(kind), flags: FragmentFlags::empty() }
    }
}

/// Registration-table entry for one token kind.
#[derive(Debug, Clone)]
pub struct VariantDescriptor {
    pub kind: VariantKind,
    /// Literal regex snippets and `{field}` placeholders, separated by spaces.
    pub template: &'static str,
    pub fields: Vec<FieldDescriptor>,
    pub hydrate: Option<HydrateFn>,
}

impl VariantDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    choice! {
        enum Shade: "shade" {
            Light,
            DeepDark => r"deep dark",
        }
    }

    #[test]
    fn choice_set_lowercases_names_without_override() {
        let set = ChoiceSet::of::<Shade>();
        assert_eq!(set.family, "shade");
        assert_eq!(set.members[0].pattern, "light");
        assert_eq!(set.members[1].name, "DeepDark");
        assert_eq!(set.members[1].pattern, "deep dark");
    }

    #[test]
    fn flags_are_always_optional() {
        assert!(field::flag("then", &["then"]).is_optional());
        assert!(!field::text("word", &["[a-z]+"]).is_optional());
        assert!(field::text("word", &["[a-z]+"]).optional().is_optional());
    }
}
