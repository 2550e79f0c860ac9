//! Prefix-trie ranking of candidate patterns.
//!
//! Every unmatched span is inserted word by word, weighted by how often it
//! occurs. Each non-root node is a candidate: a prefix that many spans share
//! and after which they diverge is a good place to start a new template.
//!
//! ```text
//! fitness = support × branching × length
//!
//! "scry 1" ×3, "scry 2" ×1  ──▶  scry      support 4, branching 2, length 1 → 8
//!                                scry 1    support 3, branching 0, length 2 → 0
//! ```
//!
//! Nothing is filtered: leaves have zero fitness and simply sort last.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub prefix: String,
    /// Distinct words seen right after the prefix, sorted.
    pub next_words: Vec<String>,
    pub support: usize,
    pub branching: usize,
    /// Prefix length in words.
    pub length: usize,
    pub fitness: usize,
}

#[derive(Debug, Clone, Default)]
struct Node {
    children: BTreeMap<String, usize>,
    weight: usize,
}

#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<Node>,
}

impl Default for Trie {
    fn default() -> Self {
        Trie { nodes: vec![Node::default()] }
    }
}

impl Trie {
    pub fn build<'a, I>(spans: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, usize)>,
    {
        let mut trie = Trie::default();
        for (text, weight) in spans {
            trie.insert(text, weight);
        }
        trie
    }

    pub fn insert(&mut self, text: &str, weight: usize) {
        let mut at = 0;
        for word in text.split_whitespace() {
            at = match self.nodes[at].children.get(word) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[at].children.insert(word.to_string(), child);
                    child
                }
            };
            self.nodes[at].weight += weight;
        }
    }

    /// Number of nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// One candidate per non-root node, in depth-first order.
    pub fn candidates(&self) -> Vec<Candidate> {
        let mut out = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        let mut stack: Vec<(usize, Vec<&str>)> =
            self.nodes[0].children.iter().rev().map(|(w, &c)| (c, vec![w.as_str()])).collect();

        while let Some((index, prefix)) = stack.pop() {
            let node = &self.nodes[index];
            let branching = node.children.len();
            out.push(Candidate {
                prefix: prefix.join(" "),
                next_words: node.children.keys().cloned().collect(),
                support: node.weight,
                branching,
                length: prefix.len(),
                fitness: node.weight * branching * prefix.len(),
            });
            for (word, &child) in node.children.iter().rev() {
                let mut next = prefix.clone();
                next.push(word.as_str());
                stack.push((child, next));
            }
        }
        out
    }
}

/// Rank weighted spans: fitness, then support, then length (all descending),
/// then prefix text.
pub fn rank<'a, I>(weighted: I) -> Vec<Candidate>
where
    I: IntoIterator<Item = (&'a str, usize)>,
{
    let mut candidates = Trie::build(weighted).candidates();
    candidates.sort_by(|a, b| {
        b.fitness
            .cmp(&a.fitness)
            .then_with(|| b.support.cmp(&a.support))
            .then_with(|| b.length.cmp(&a.length))
            .then_with(|| a.prefix.cmp(&b.prefix))
    });
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPANS: &[(&str, usize)] = &[("scry 1", 3), ("scry 2", 1), ("investigate", 2), ("scry 1 then", 1)];

    #[test]
    fn fitness_multiplies_support_branching_length() {
        let ranked = rank(SPANS.iter().copied());
        let scry = ranked.iter().find(|c| c.prefix == "scry").unwrap();
        assert_eq!(scry.support, 5);
        assert_eq!(scry.branching, 2);
        assert_eq!(scry.next_words, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(scry.fitness, 10);

        let scry_one = ranked.iter().find(|c| c.prefix == "scry 1").unwrap();
        assert_eq!((scry_one.support, scry_one.branching, scry_one.length, scry_one.fitness), (4, 1, 2, 8));

        assert_eq!(ranked[0].prefix, "scry");
        assert_eq!(ranked.len(), 5);
        assert!(ranked.iter().any(|c| c.prefix == "investigate" && c.fitness == 0));
    }

    #[test]
    fn ranking_is_idempotent() {
        let first = rank(SPANS.iter().copied());
        let second = rank(SPANS.iter().rev().copied());
        assert_eq!(first, second);
    }

    #[test]
    fn ties_break_on_prefix_text() {
        let ranked = rank([("b", 1), ("a", 1)]);
        let prefixes: Vec<&str> = ranked.iter().map(|c| c.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["a", "b"]);
    }

    #[test]
    fn empty_input_has_no_candidates() {
        assert!(rank(std::iter::empty()).is_empty());
        assert!(Trie::build(std::iter::empty()).is_empty());
    }
}
