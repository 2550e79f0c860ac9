//! Gap analysis: what the vocabulary fails to explain, across a whole corpus.
//!
//! ```text
//! tokens per line ── coalesce ──▶ UnmatchedSpan*          (coalesce.rs)
//!                                      │
//!                                      v
//!                                   Digest                 (digest.rs)
//!                   ┌──────────────────┼────────────────────┐
//!                   v                  v                    v
//!        SuffixAutomaton::build   Trie::build        Adjacency::build
//!        (automaton.rs)           (trie.rs)          (adjacency.rs)
//!                   │                  │                    │
//!                   v                  v                    v
//!         maximal repeats      ranked candidates    neighbour counts
//! ```
//!
//! Everything here works on span *text* and is deterministic: identical
//! inputs give identical, identically ordered outputs.

#[path = "gaps/adjacency.rs"]
mod adjacency;
#[path = "gaps/automaton.rs"]
mod automaton;
#[path = "gaps/coalesce.rs"]
mod coalesce;
#[path = "gaps/digest.rs"]
mod digest;
#[path = "gaps/trie.rs"]
mod trie;

pub use adjacency::{Adjacency, NeighbourCounts};
pub use automaton::{Interner, Repeat, SEPARATOR, State, SuffixAutomaton, union_spans};
pub use coalesce::{Neighbour, UnmatchedSpan, coalesce};
pub use digest::{Digest, DigestEntry, Excerpt};
pub use trie::{Candidate, Trie, rank};
