//! Word-level suffix automaton over the corpus digest.
//!
//! Every unmatched span is split into words, every word is interned, and all
//! spans are concatenated into one sequence with [`SEPARATOR`] between them:
//!
//! ```text
//! ["destroy target creature", "exile target creature"]
//!   ──▶  destroy target creature 0 exile target creature
//! ```
//!
//! The automaton is built online over that sequence. States live in an arena
//! (`Vec<State>`) and refer to each other by index; suffix links point
//! backwards, so owned pointers would form cycles.
//!
//! After construction, occurrence counts are propagated up the suffix-link
//! tree in descending `len` order. A state is a **maximal repeat** when it
//! occurs at least twice and no transition on a real word keeps the same
//! count, i.e. the substring cannot grow on the right without losing an
//! occurrence. The representative is the longest string of the state, which is
//! already left-maximal.
//!
//! ## Separator handling
//!
//! The separator never appears inside a reported repeat. A representative
//! that runs across a separator is cut back to the words after the last
//! separator; if that cut leaves the state's equivalence class, the candidate
//! is dropped (a shorter state reports it instead).

use super::digest::Digest;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Word id reserved for the boundary between two spans.
pub const SEPARATOR: u32 = 0;

/// Word to id table. Id 0 is the separator and has no word.
#[derive(Debug, Clone)]
pub struct Interner {
    ids: HashMap<String, u32>,
    words: Vec<String>,
}

impl Default for Interner {
    fn default() -> Self {
        Interner { ids: HashMap::new(), words: vec![String::new()] }
    }
}

impl Interner {
    pub fn new() -> Self {
        Interner::default()
    }

    pub fn intern(&mut self, word: &str) -> u32 {
        if let Some(&id) = self.ids.get(word) {
            return id;
        }
        let id = self.words.len() as u32;
        self.words.push(word.to_string());
        self.ids.insert(word.to_string(), id);
        id
    }

    pub fn word(&self, id: u32) -> &str {
        self.words.get(id as usize).map_or("", String::as_str)
    }

    /// Number of real words (the separator excluded).
    pub fn len(&self) -> usize {
        self.words.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct State {
    pub next: BTreeMap<u32, usize>,
    pub link: Option<usize>,
    /// Length of the longest string in this state's class.
    pub len: usize,
    /// End-position occurrences (after propagation).
    pub count: usize,
    /// One end position of the class, as an index into the word sequence.
    pub end_pos: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repeat {
    pub text: String,
    pub count: usize,
    /// Length in words.
    pub words: usize,
}

#[derive(Debug, Clone)]
pub struct SuffixAutomaton {
    states: Vec<State>,
    last: usize,
    sequence: Vec<u32>,
    interner: Interner,
}

impl SuffixAutomaton {
    /// Build over whitespace-split span texts, one item per span.
    pub fn build<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut interner = Interner::new();
        let sequences: Vec<Vec<u32>> = items
            .into_iter()
            .map(|item| item.as_ref().split_whitespace().map(|w| interner.intern(w)).collect())
            .collect();
        SuffixAutomaton::from_sequences(&sequences, interner)
    }

    /// Build over pre-interned word-id sequences. Empty sequences are skipped
    /// and contribute no separator.
    pub fn from_sequences(sequences: &[Vec<u32>], interner: Interner) -> Self {
        let mut automaton =
            SuffixAutomaton { states: vec![State::default()], last: 0, sequence: Vec::new(), interner };

        for words in sequences.iter().filter(|s| !s.is_empty()) {
            if !automaton.sequence.is_empty() {
                automaton.extend(SEPARATOR);
            }
            for &word in words {
                automaton.extend(word);
            }
        }
        automaton.propagate();

        tracing::debug!(
            states = automaton.states.len(),
            words = automaton.sequence.len(),
            vocabulary = automaton.interner.len(),
            "built suffix automaton"
        );
        automaton
    }

    fn extend(&mut self, word: u32) {
        let pos = self.sequence.len();
        self.sequence.push(word);

        let cur = self.states.len();
        self.states.push(State { len: self.states[self.last].len + 1, count: 1, end_pos: pos, ..State::default() });

        let mut p = Some(self.last);
        while let Some(pi) = p {
            if self.states[pi].next.contains_key(&word) {
                break;
            }
            self.states[pi].next.insert(word, cur);
            p = self.states[pi].link;
        }

        match p {
            None => self.states[cur].link = Some(0),
            Some(pi) => {
                let q = self.states[pi].next[&word];
                if self.states[pi].len + 1 == self.states[q].len {
                    self.states[cur].link = Some(q);
                } else {
                    let clone = self.states.len();
                    let cloned = State {
                        next: self.states[q].next.clone(),
                        link: self.states[q].link,
                        len: self.states[pi].len + 1,
                        count: 0,
                        end_pos: self.states[q].end_pos,
                    };
                    self.states.push(cloned);

                    let mut p = Some(pi);
                    while let Some(pj) = p {
                        if self.states[pj].next.get(&word) != Some(&q) {
                            break;
                        }
                        self.states[pj].next.insert(word, clone);
                        p = self.states[pj].link;
                    }
                    self.states[q].link = Some(clone);
                    self.states[cur].link = Some(clone);
                }
            }
        }
        self.last = cur;
    }

    fn propagate(&mut self) {
        let mut order: Vec<usize> = (1..self.states.len()).collect();
        order.sort_by(|&a, &b| self.states[b].len.cmp(&self.states[a].len));
        for v in order {
            if let Some(link) = self.states[v].link {
                self.states[link].count += self.states[v].count;
            }
        }
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Every maximal repeat, most frequent first, then longest, then by text.
    pub fn maximal_repeats(&self) -> Vec<Repeat> {
        let mut repeats: Vec<Repeat> = (1..self.states.len()).into_par_iter().filter_map(|v| self.repeat_at(v)).collect();
        sort_repeats(&mut repeats);
        repeats
    }

    fn repeat_at(&self, v: usize) -> Option<Repeat> {
        let state = &self.states[v];
        if state.count < 2 {
            return None;
        }
        let extends = state
            .next
            .iter()
            .any(|(&word, &target)| word != SEPARATOR && self.states[target].count == state.count);
        if extends {
            return None;
        }

        let min_len = state.link.map_or(0, |l| self.states[l].len) + 1;
        let start = state.end_pos + 1 - state.len;
        let mut words = &self.sequence[start..=state.end_pos];
        if let Some(sep) = words.iter().rposition(|&w| w == SEPARATOR) {
            words = &words[sep + 1..];
        }
        if words.len() < min_len || words.is_empty() {
            return None;
        }

        let text = words.iter().map(|&w| self.interner.word(w)).collect::<Vec<_>>().join(" ");
        Some(Repeat { text, count: state.count, words: words.len() })
    }
}

fn sort_repeats(repeats: &mut [Repeat]) {
    repeats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| b.words.cmp(&a.words)).then_with(|| a.text.cmp(&b.text)));
}

/// Add every whole span of `digest` that is not already a repeat, with its
/// digest count. Existing entries keep their automaton count.
pub fn union_spans(mut repeats: Vec<Repeat>, digest: &Digest) -> Vec<Repeat> {
    let mut seen: std::collections::HashSet<String> = repeats.iter().map(|r| r.text.clone()).collect();
    let mut whole: BTreeMap<String, usize> = BTreeMap::new();
    for text in digest.texts() {
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !normalized.is_empty() {
            *whole.entry(normalized).or_insert(0) += 1;
        }
    }
    for (text, count) in whole {
        if seen.insert(text.clone()) {
            let words = text.split(' ').count();
            repeats.push(Repeat { text, count, words });
        }
    }
    sort_repeats(&mut repeats);
    repeats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaps::{DigestEntry, Neighbour, UnmatchedSpan};
    use crate::Range;

    fn find<'a>(repeats: &'a [Repeat], text: &str) -> Option<&'a Repeat> {
        repeats.iter().find(|r| r.text == text)
    }

    #[test]
    fn shared_suffix_is_a_maximal_repeat() {
        let automaton = SuffixAutomaton::build(["destroy target creature", "exile target creature"]);
        let repeats = automaton.maximal_repeats();

        assert_eq!(find(&repeats, "target creature").map(|r| r.count), Some(2));
        // "creature" has the same occurrences and is subsumed.
        assert!(find(&repeats, "creature").is_none());
        // No longer repeat with the same count contains it.
        assert!(!repeats.iter().any(|r| r.count == 2 && r.words > 2 && r.text.contains("target creature")));
    }

    #[test]
    fn repeats_never_cross_items() {
        let items = ["a b c", "c d e"];
        let repeats = SuffixAutomaton::build(items).maximal_repeats();
        assert_eq!(repeats, vec![Repeat { text: "c".into(), count: 2, words: 1 }]);
        for repeat in &repeats {
            assert!(items.iter().any(|item| item.contains(&repeat.text)));
            assert!(!repeat.text.contains("  "));
        }
    }

    #[test]
    fn repeat_preceded_by_separator_everywhere_is_cut_back() {
        // Every later "a b" follows a separator; the repeat must still surface.
        let repeats = SuffixAutomaton::build(["x", "a b", "a b"]).maximal_repeats();
        assert_eq!(find(&repeats, "a b").map(|r| r.count), Some(2));
        assert!(repeats.iter().all(|r| !r.text.is_empty()));
    }

    #[test]
    fn counts_propagate_through_clones() {
        let automaton = SuffixAutomaton::build(["a b a b a"]);
        let repeats = automaton.maximal_repeats();
        assert_eq!(find(&repeats, "a b a").map(|r| r.count), Some(2));
        assert_eq!(find(&repeats, "a").map(|r| r.count), Some(3));
        // Clone states start empty; the root's count is never reported.
        assert!(automaton.states().iter().skip(1).all(|s| s.link.is_some()));
    }

    #[test]
    fn empty_items_add_no_separator() {
        let automaton = SuffixAutomaton::build(["", "a", "", "a"]);
        assert_eq!(automaton.maximal_repeats(), vec![Repeat { text: "a".into(), count: 2, words: 1 }]);
        assert_eq!(automaton.interner().len(), 1);
        assert_eq!(automaton.interner().word(SEPARATOR), "");
    }

    #[test]
    fn union_keeps_existing_counts() {
        let mut digest = Digest::new();
        for (i, text) in ["destroy target creature", "exile target creature", "target creature"].iter().enumerate() {
            digest.push(DigestEntry {
                card: i,
                line: 0,
                absolute: Range { start: 0, end: text.len() },
                span: UnmatchedSpan {
                    text: text.to_string(),
                    range: Range { start: 0, end: text.len() },
                    tokens: 3,
                    before: Neighbour::LineStart,
                    after: Neighbour::LineEnd,
                },
            });
        }
        let repeats = SuffixAutomaton::build(digest.texts()).maximal_repeats();
        assert_eq!(find(&repeats, "target creature").map(|r| r.count), Some(3));

        let all = union_spans(repeats, &digest);
        // Automaton count wins over the whole-span count of 1.
        assert_eq!(find(&all, "target creature").map(|r| r.count), Some(3));
        assert_eq!(find(&all, "destroy target creature").map(|r| r.count), Some(1));
        assert_eq!(find(&all, "exile target creature").map(|r| r.count), Some(1));
        assert_eq!(all[0].text, "target creature");
    }
}
