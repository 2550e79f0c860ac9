//! Capture engine.
//!
//! This module is the entry point for everything between a registration table
//! and a list of hydrated tokens. It is split into focused submodules under
//! `src/engine/` while keeping public paths flat (for example
//! `crate::engine::Tokenizer` and `crate::engine::FragmentFlags`).
//!
//! ## How the parts work together
//!
//! ```text
//! variants::get()  ──┐
//!                    │  CompiledVariants::new        (compiled_variants.rs)
//!                    │    - parse templates          (template.rs)
//!                    │    - resolve field fragments  (fragment.rs)
//!                    │    - inline nested variants (lazy, memoized)
//!                    └───────────────┬──────────────
//!                                    │
//!                    Tokenizer::new(compiled, PRIORITY)   (tokenizer.rs)
//!                      - priority list, then by pattern length
//!                      - RegexSet gate per line            (trigger.rs)
//!                                    │
//! line ── Tokenizer::tokenize ───────┼─ first successful match wins
//!                                    v
//!                              Vec<Token>
//!                                    │
//!                                    v
//!                         hydrate (hydrate.rs)
//!                           - re-run anchored pattern on the token
//!                           - choices, flags, text, nested children
//!                                    │
//!                                    v
//!                              CaptureNode
//! ```
//!
//! Everything built here is immutable once constructed and safe to share
//! across threads. Tokenizing and hydrating are pure functions of the input.
//!
//! ## Responsibilities by module
//!
//! - `fragment.rs`: one field's alternatives to one alternation; edge classes.
//! - `template.rs`: template strings to snippets.
//! - `compiled_variants.rs`: snippets and fields to named-group regexes.
//! - `trigger.rs`: cheap per-line pre-selection of candidate variants.
//! - `tokenizer.rs`: ordering and the position-by-position matching loop.
//! - `hydrate.rs`: matched tokens to capture trees.
//! - `metrics.rs`: coverage and timing data.
//!
//! ## Debugging
//!
//! Set `GLYPHSCAN_LOG=glyphscan=trace` to print every rendered pattern and
//! every token as it is committed.

#[path = "engine/compiled_variants.rs"]
mod compiled_variants;
#[path = "engine/fragment.rs"]
pub mod fragment;
#[path = "engine/hydrate.rs"]
mod hydrate;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/template.rs"]
pub mod template;
#[path = "engine/tokenizer.rs"]
mod tokenizer;
#[path = "engine/trigger.rs"]
mod trigger;

pub use compiled_variants::{
    CompiledField, CompiledPattern, CompiledVariant, CompiledVariants, Compiler, QUALIFIER, qualify_groups,
};
pub use fragment::{EdgeClass, FragmentFlags};
pub use hydrate::hydrate;
pub use metrics::{Coverage, RunMetrics};
pub use tokenizer::Tokenizer;
pub use trigger::TriggerInfo;
