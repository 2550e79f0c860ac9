//! Variant compilation and indexing.
//!
//! This module holds the *static* side of the engine: everything derived from
//! the registration table before a single line is tokenized.
//!
//! Compilation happens in two layers:
//!
//! 1. [`Compiler`] renders one [`CompiledPattern`] per variant. Nested fields
//!    need the nested variant's own pattern, so compilation is lazy and
//!    memoized instead of following declaration order.
//! 2. [`CompiledVariants::new`] wraps every pattern in ready-to-run regexes
//!    (a search regex for the tokenizer, an anchored one for hydration) and
//!    pre-compiles the per-member regexes that choice fields hydrate with.
//!
//! ## Rendering a template
//!
//! ```text
//! template:  {selector} {filter} {noun} {controller}
//!            └─ optional ─┘        │      └─ optional
//!
//! rendered:  \b(?:(?P<selector>..) )?(?:(?P<filter>..) )?(?P<noun>..)(?: (?P<controller>..))?\b
//! ```
//!
//! - Consecutive snippets are joined with one space, except before terminal
//!   punctuation and while inside a pair of `"`.
//! - An optional snippet carries its own space inside the optional group, so
//!   its absence never leaves a double space behind.
//! - `\b` is added only at ends that begin/end with a word character.
//!
//! ## Invariants
//!
//! - Group names are unique within a pattern: a nested variant's groups are
//!   qualified as `<field>__<group>`.
//! - Compiling the same descriptors twice yields byte-identical patterns.

use super::fragment::{self, Edge, EdgeClass, FragmentFlags};
use super::template::{self, PAIRED, Part, Snippet};
use crate::descriptor::{FieldDescriptor, FieldKind, HydrateFn, VariantDescriptor};
use crate::error::{Error, Result};
use crate::variants::VariantKind;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

/// Compiled regexes for nested vocabularies get large; the default limit is
/// tuned for hand-written patterns.
const SIZE_LIMIT: usize = 64 << 20;

/// Separator between a parent field name and a nested group name.
pub const QUALIFIER: &str = "__";

/// Rendered pattern of one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    pub kind: VariantKind,
    pub source: String,
    /// Own field names, in template order. Each is a group in `source`.
    pub fields: Vec<&'static str>,
    /// Every group in `source`, nested ones qualified.
    pub groups: Vec<String>,
    pub leading: EdgeClass,
    pub trailing: EdgeClass,
}

impl CompiledPattern {
    /// Rendered length, used as a complexity proxy when ordering variants.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}

/// Renders variant patterns on demand, memoizing each one.
#[derive(Debug)]
pub struct Compiler<'d> {
    descriptors: HashMap<VariantKind, &'d VariantDescriptor>,
    cache: HashMap<VariantKind, CompiledPattern>,
    in_progress: Vec<VariantKind>,
}

/// One field rendered as a named group.
struct RenderedField {
    group: String,
    optional: bool,
    leading: EdgeClass,
    trailing: EdgeClass,
    groups: Vec<String>,
}

impl<'d> Compiler<'d> {
    pub fn new(descriptors: &'d [VariantDescriptor]) -> Result<Self> {
        let mut by_kind = HashMap::new();
        for descriptor in descriptors {
            if by_kind.insert(descriptor.kind, descriptor).is_some() {
                return Err(Error::DuplicateVariant(descriptor.kind.name()));
            }
        }
        Ok(Compiler { descriptors: by_kind, cache: HashMap::new(), in_progress: Vec::new() })
    }

    /// Compile `kind`, compiling any nested variants it references first.
    pub fn compile(&mut self, kind: VariantKind) -> Result<CompiledPattern> {
        if let Some(pattern) = self.cache.get(&kind) {
            return Ok(pattern.clone());
        }
        if let Some(pos) = self.in_progress.iter().position(|&k| k == kind) {
            let mut chain: Vec<&'static str> = self.in_progress[pos..].iter().map(|k| k.name()).collect();
            chain.push(kind.name());
            return Err(Error::RecursiveVariant { chain });
        }
        let descriptor = *self.descriptors.get(&kind).ok_or(Error::UndeclaredVariant(kind.name()))?;

        self.in_progress.push(kind);
        let rendered = self.render(descriptor);
        self.in_progress.pop();

        let pattern = rendered?;
        tracing::trace!(variant = kind.name(), pattern = %pattern.source, "rendered variant");
        self.cache.insert(kind, pattern.clone());
        Ok(pattern)
    }

    fn render(&mut self, descriptor: &VariantDescriptor) -> Result<CompiledPattern> {
        let variant = descriptor.kind.name();
        let snippets = template::parse(descriptor.template);
        let placeholders = template::placeholders(&snippets);

        for (i, field) in descriptor.fields.iter().enumerate() {
            if descriptor.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(Error::DuplicateField { variant, field: field.name });
            }
            if !placeholders.contains(&field.name) {
                return Err(Error::UnreferencedField { variant, field: field.name });
            }
        }

        let mut rendered: HashMap<&str, RenderedField> = HashMap::new();
        let mut fields = Vec::new();
        for name in &placeholders {
            let field = descriptor
                .field(name)
                .ok_or_else(|| Error::UnknownField { variant, field: name.to_string() })?;
            if rendered.contains_key(name) {
                return Err(Error::DuplicateField { variant, field: field.name });
            }
            rendered.insert(field.name, self.render_field(field)?);
            fields.push(field.name);
        }

        let body = join(variant, &snippets, &rendered)?;
        let leading = outer_edge(snippets.iter(), &rendered, Edge::Leading);
        let trailing = outer_edge(snippets.iter().rev(), &rendered, Edge::Trailing);

        let mut source = String::with_capacity(body.len() + 4);
        if leading == EdgeClass::Word {
            source.push_str(r"\b");
        }
        source.push_str(&body);
        if trailing == EdgeClass::Word {
            source.push_str(r"\b");
        }

        let mut groups: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        for name in &fields {
            groups.extend(rendered[name].groups.iter().cloned());
        }

        Ok(CompiledPattern { kind: descriptor.kind, source, fields, groups, leading, trailing })
    }

    fn render_field(&mut self, field: &FieldDescriptor) -> Result<RenderedField> {
        let flags = field.flags - FragmentFlags::OPTIONAL;
        let (body, leading, trailing, nested_groups) = match &field.kind {
            FieldKind::Choice(set) => {
                let patterns: Vec<&str> = set.members.iter().map(|m| m.pattern.as_str()).collect();
                (
                    fragment::alternation(&patterns, flags),
                    fragment::edge_all(&patterns, Edge::Leading),
                    fragment::edge_all(&patterns, Edge::Trailing),
                    Vec::new(),
                )
            }
            FieldKind::Flag(alternatives) | FieldKind::Text(alternatives) => (
                fragment::alternation(alternatives.iter(), flags),
                fragment::edge_all(alternatives.iter(), Edge::Leading),
                fragment::edge_all(alternatives.iter(), Edge::Trailing),
                Vec::new(),
            ),
            FieldKind::Nested(child) => {
                let child = self.compile(*child)?;
                let groups = child.groups.iter().map(|g| format!("{}{QUALIFIER}{g}", field.name)).collect();
                (qualify_groups(&child.source, field.name), child.leading, child.trailing, groups)
            }
        };

        Ok(RenderedField {
            group: format!("(?P<{}>{body})", field.name),
            optional: field.is_optional(),
            leading,
            trailing,
            groups: nested_groups,
        })
    }
}

fn is_optional_snippet(snippet: &Snippet<'_>, rendered: &HashMap<&str, RenderedField>) -> bool {
    snippet.sole_field().and_then(|name| rendered.get(name)).is_some_and(|f| f.optional)
}

/// Join snippets into the pattern body (without outer boundaries).
fn join(variant: &'static str, snippets: &[Snippet<'_>], rendered: &HashMap<&str, RenderedField>) -> Result<String> {
    let lead_run_end =
        snippets.iter().position(|s| !is_optional_snippet(s, rendered)).unwrap_or(snippets.len());

    let mut out = String::new();
    let mut paired = 0usize;
    let mut prev_pads_trailing = false;

    for (i, snippet) in snippets.iter().enumerate() {
        let optional = is_optional_snippet(snippet, rendered);
        let pads_trailing = optional && i < lead_run_end;
        let pads_leading = optional && !pads_trailing;

        if i > 0 {
            let glued = matches!(snippet, Snippet::Terminal(_))
                || paired % 2 == 1
                || pads_leading
                || prev_pads_trailing;
            if !glued {
                out.push(' ');
            }
        }

        match (snippet, snippet.sole_field().filter(|_| optional)) {
            (Snippet::Terminal(c) | Snippet::Delimiter(c), _) => out.push_str(&regex::escape(&c.to_string())),
            (_, Some(name)) => {
                let group = &rendered[name].group;
                if pads_trailing {
                    out.push_str(&format!("(?:{group} )?"));
                } else {
                    out.push_str(&format!("(?: {group})?"));
                }
            }
            (Snippet::Parts(parts), None) => {
                for part in parts {
                    match part {
                        Part::Literal(lit) => out.push_str(lit),
                        Part::Field(name) => {
                            let field = &rendered[name];
                            if field.optional {
                                out.push_str(&format!("(?:{})?", field.group));
                            } else {
                                out.push_str(&field.group);
                            }
                        }
                    }
                }
            }
        }

        paired += snippet.paired_count();
        prev_pads_trailing = pads_trailing;
    }

    if paired % 2 == 1 {
        return Err(Error::UnbalancedTemplate { variant, delimiter: PAIRED });
    }
    Ok(out)
}

/// Edge class of the whole template at one end.
///
/// Optional snippets at that end may be absent, so the class is `Word` only if
/// every optional snippet up to and including the first required one is.
fn outer_edge<'a, 't: 'a, I>(snippets: I, rendered: &HashMap<&str, RenderedField>, which: Edge) -> EdgeClass
where
    I: Iterator<Item = &'a Snippet<'t>>,
{
    for snippet in snippets {
        let class = match snippet {
            Snippet::Terminal(_) | Snippet::Delimiter(_) => return EdgeClass::Other,
            Snippet::Parts(parts) => {
                let class = match which {
                    Edge::Leading => parts_edge(parts.iter(), rendered, which),
                    Edge::Trailing => parts_edge(parts.iter().rev(), rendered, which),
                };
                // Only optional word-edged fields: the neighbouring snippet decides.
                let Some(class) = class else { continue };
                class
            }
        };
        if class != EdgeClass::Word || !is_optional_snippet(snippet, rendered) {
            return class;
        }
    }
    EdgeClass::Other
}

/// Edge class of one snippet's parts, or `None` when every part is an optional
/// field with a word edge.
fn parts_edge<'a, 't: 'a, I>(parts: I, rendered: &HashMap<&str, RenderedField>, which: Edge) -> Option<EdgeClass>
where
    I: Iterator<Item = &'a Part<'t>>,
{
    for part in parts {
        match part {
            Part::Literal(lit) => return Some(fragment::edge(lit, which)),
            Part::Field(name) => {
                let Some(field) = rendered.get(name) else { return Some(EdgeClass::Other) };
                let class = match which {
                    Edge::Leading => field.leading,
                    Edge::Trailing => field.trailing,
                };
                if class != EdgeClass::Word || !field.optional {
                    return Some(class);
                }
            }
        }
    }
    None
}

/// Prefix every named group in `source` with `<prefix>__`.
pub fn qualify_groups(source: &str, prefix: &str) -> String {
    let marker = "(?P<";
    let mut out = String::with_capacity(source.len() + 16);
    let mut rest = source;
    while let Some(pos) = rest.find(marker) {
        // An odd run of backslashes escapes the paren.
        let escaped = rest[..pos].bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1;
        out.push_str(&rest[..pos + marker.len()]);
        if !escaped {
            out.push_str(prefix);
            out.push_str(QUALIFIER);
        }
        rest = &rest[pos + marker.len()..];
    }
    out.push_str(rest);
    out
}

// --- Ready-to-run variants ---------------------------------------------------

/// A field as the hydrator needs it.
#[derive(Debug, Clone)]
pub struct CompiledField {
    pub name: &'static str,
    pub kind: FieldKind,
    /// For choice fields: one anchored, case-insensitive regex per member, in
    /// declaration order.
    pub members: Vec<Regex>,
}

#[derive(Debug, Clone)]
pub struct CompiledVariant {
    pub kind: VariantKind,
    pub pattern: CompiledPattern,
    /// Unanchored; the tokenizer searches from a position and checks the start.
    pub search: Regex,
    /// Anchored at both ends; the hydrator runs it on a token's own text.
    pub exact: Regex,
    pub fields: Vec<CompiledField>,
    pub hydrate: Option<HydrateFn>,
}

impl CompiledVariant {
    pub fn field(&self, name: &str) -> Option<&CompiledField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Every registered variant, compiled, in declaration order.
#[derive(Debug, Clone)]
pub struct CompiledVariants {
    pub variants: Vec<CompiledVariant>,
    index: HashMap<VariantKind, usize>,
}

impl CompiledVariants {
    /// Compile the whole registration table.
    ///
    /// Any defect in the declared metadata aborts the whole build: the
    /// tokenizer is never built from a partially valid table.
    pub fn new(descriptors: &[VariantDescriptor]) -> Result<Self> {
        let mut compiler = Compiler::new(descriptors)?;
        let mut variants = Vec::with_capacity(descriptors.len());
        let mut index = HashMap::new();

        for descriptor in descriptors {
            let pattern = compiler.compile(descriptor.kind)?;
            let variant = descriptor.kind.name();
            let search = build_regex(variant, &pattern.source)?;
            let exact = build_regex(variant, &format!("^(?:{})$", pattern.source))?;

            let mut fields = Vec::with_capacity(pattern.fields.len());
            for name in &pattern.fields {
                let Some(field) = descriptor.field(name) else {
                    return Err(Error::UnknownField { variant, field: name.to_string() });
                };
                fields.push(CompiledField { name: field.name, kind: field.kind.clone(), members: member_regexes(variant, field)? });
            }

            tracing::debug!(variant, len = pattern.len(), groups = pattern.groups.len(), "compiled variant");
            index.insert(descriptor.kind, variants.len());
            variants.push(CompiledVariant { kind: descriptor.kind, pattern, search, exact, fields, hydrate: descriptor.hydrate });
        }

        Ok(CompiledVariants { variants, index })
    }

    pub fn get(&self, kind: VariantKind) -> Option<&CompiledVariant> {
        self.index.get(&kind).map(|&i| &self.variants[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledVariant> {
        self.variants.iter()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

fn build_regex(variant: &'static str, source: &str) -> Result<Regex> {
    RegexBuilder::new(source)
        .size_limit(SIZE_LIMIT)
        .build()
        .map_err(|source| Error::InvalidPattern { variant, source })
}

fn member_regexes(variant: &'static str, field: &FieldDescriptor) -> Result<Vec<Regex>> {
    let FieldKind::Choice(set) = &field.kind else {
        return Ok(Vec::new());
    };
    set.members
        .iter()
        .map(|m| {
            let pattern = if field.flags.contains(FragmentFlags::PLURAL) {
                fragment::pluralize(&m.pattern)
            } else {
                m.pattern.clone()
            };
            RegexBuilder::new(&format!("^(?:{pattern})$"))
                .case_insensitive(true)
                .build()
                .map_err(|source| Error::InvalidPattern { variant, source })
        })
        .collect()
}
