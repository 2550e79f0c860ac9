//! Hydrated capture trees.
//!
//! A [`CaptureNode`] is what a matched token turns into once its groups are
//! read back: the variant, the exact span it came from, one [`Field`] per
//! participating field and the nested child nodes in ascending span order.
//!
//! Nested fields do not own their child; they hold an index into
//! [`CaptureNode::children`]. This keeps the tree finite at the type level and
//! lets callers walk children without re-deriving them from field values.

use crate::descriptor::Choice;
use crate::variants::VariantKind;
use crate::Range;
use serde::Serialize;

/// A resolved member of a choice family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChoiceValue {
    pub family: &'static str,
    pub member: &'static str,
    /// Position of the member in its family's declaration order.
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Choice(ChoiceValue),
    Flag(bool),
    Text(String),
    /// Index into the owning node's `children`.
    Child(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: &'static str,
    pub value: Value,
    /// Span of the captured group; `None` only for an absent flag.
    pub range: Option<Range>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureNode {
    pub kind: VariantKind,
    pub range: Range,
    pub fields: Vec<Field>,
    pub children: Vec<CaptureNode>,
}

impl CaptureNode {
    pub fn new(kind: VariantKind, range: Range) -> Self {
        CaptureNode { kind, range, fields: Vec::new(), children: Vec::new() }
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Flag value of `name`; absent fields read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name).map(|f| &f.value), Some(Value::Flag(true)))
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match &self.get(name)?.value {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Typed choice lookup. Returns `None` when the field is unset or belongs
    /// to a different family.
    pub fn choice<T: Choice>(&self, name: &str) -> Option<T> {
        match &self.get(name)?.value {
            Value::Choice(cv) if cv.family == T::FAMILY => T::MEMBERS.get(cv.index).map(|m| m.value),
            _ => None,
        }
    }

    pub fn child(&self, name: &str) -> Option<&CaptureNode> {
        match self.get(name)?.value {
            Value::Child(idx) => self.children.get(idx),
            _ => None,
        }
    }

    /// Pre-order walk over this node and all descendants.
    pub fn walk(&self) -> impl Iterator<Item = &CaptureNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Number of nodes in the subtree rooted here.
    pub fn size(&self) -> usize {
        self.walk().count()
    }
}
