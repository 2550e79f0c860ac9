//! Pattern fragment resolution.
//!
//! Turns one field's declared alternatives into a single alternation fragment.
//! This is the leaf of the compiler: it knows nothing about templates, groups
//! or other variants.
//!
//! ```text
//! ["deep dark", "light"] ──sort by length──▶ (?:deep dark|light)
//!                         └─ PLURAL  ──▶ (?:deep dark(?:s)?|light(?:s)?)
//!                         └─ BOUNDED ──▶ \b(?:...)\b
//! ```
//!
//! Edge classification lives here as well: the compiler only wraps a variant
//! in `\b` where its first/last character is a word character, and that is
//! decided by looking at the first and last one or two characters of a
//! fragment's source.

bitflags::bitflags! {
    /// Rendering options for a single field fragment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FragmentFlags: u8 {
        /// Accept the rule-based plural of every alternative.
        const PLURAL   = 1 << 0;
        /// Wrap the alternation in `\b` assertions.
        const BOUNDED  = 1 << 1;
        /// The field's group may be absent from a match.
        const OPTIONAL = 1 << 2;
    }
}

/// Which end of a fragment is being classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Leading,
    Trailing,
}

/// Whether a fragment starts/ends with a word character.
///
/// Anything that can't be classified with confidence (a group, a class) is
/// `Other`, and gets no boundary assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeClass {
    Word,
    Other,
}

/// Rule-based plural suffix for a single word pattern.
///
/// Only patterns ending in an ASCII letter are pluralized; regex overrides
/// such as `\+1/\+1` are returned unchanged.
pub fn pluralize(word: &str) -> String {
    let Some(last) = word.chars().last() else {
        return String::new();
    };
    if !last.is_ascii_alphabetic() {
        return word.to_string();
    }

    let mut chars = word.chars().rev();
    let _ = chars.next();
    let before = chars.next();

    if last == 'y' && before.is_some_and(|c| c.is_ascii_alphabetic() && !is_vowel(c)) {
        return format!("{}(?:y|ies)", &word[..word.len() - 1]);
    }
    if matches!(last, 's' | 'x' | 'z') || word.ends_with("ch") || word.ends_with("sh") {
        return format!("{word}(?:es)?");
    }
    format!("{word}(?:s)?")
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Render alternatives as one non-capturing alternation.
///
/// Longer alternatives come first so that leftmost-first matching prefers the
/// more specific one. Ties keep declaration order.
pub fn alternation<I, S>(alternatives: I, flags: FragmentFlags) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut alts: Vec<String> = Vec::new();
    for alt in alternatives {
        let alt = alt.as_ref();
        let rendered = if flags.contains(FragmentFlags::PLURAL) { pluralize(alt) } else { alt.to_string() };
        if !alts.contains(&rendered) {
            alts.push(rendered);
        }
    }
    alts.sort_by(|a, b| b.len().cmp(&a.len()));

    let body = format!("(?:{})", alts.join("|"));
    if flags.contains(FragmentFlags::BOUNDED) { format!(r"\b{body}\b") } else { body }
}

/// Classify one end of a regex source fragment.
pub fn edge(source: &str, which: Edge) -> EdgeClass {
    match which {
        Edge::Leading => leading_edge(source),
        Edge::Trailing => trailing_edge(source),
    }
}

/// Classify all alternatives together: `Word` only if every one of them is.
pub fn edge_all<I, S>(alternatives: I, which: Edge) -> EdgeClass
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut any = false;
    for alt in alternatives {
        any = true;
        if edge(alt.as_ref(), which) != EdgeClass::Word {
            return EdgeClass::Other;
        }
    }
    if any { EdgeClass::Word } else { EdgeClass::Other }
}

fn leading_edge(source: &str) -> EdgeClass {
    let mut chars = source.chars();
    match chars.next() {
        Some('\\') => match chars.next() {
            Some('w' | 'd') => EdgeClass::Word,
            _ => EdgeClass::Other,
        },
        Some(c) if is_word_char(c) => EdgeClass::Word,
        _ => EdgeClass::Other,
    }
}

fn trailing_edge(source: &str) -> EdgeClass {
    let mut body = source;
    if let Some(stripped) = body.strip_suffix(['?', '+', '*']) {
        if stripped.ends_with(')') || stripped.ends_with(']') || stripped.ends_with('}') {
            return EdgeClass::Other;
        }
        body = stripped;
    }

    let mut rev = body.chars().rev();
    let last = rev.next();
    let before = rev.next();
    match (before, last) {
        (Some('\\'), Some('w' | 'd')) => EdgeClass::Word,
        (Some('\\'), Some(_)) => EdgeClass::Other,
        (_, Some(c)) if is_word_char(c) => EdgeClass::Word,
        _ => EdgeClass::Other,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::consonant_y("sorcery", "sorcer(?:y|ies)")]
    #[case::vowel_y("day", "day(?:s)?")]
    #[case::sibilant_s("loss", "loss(?:es)?")]
    #[case::sibilant_x("box", "box(?:es)?")]
    #[case::ch("march", "march(?:es)?")]
    #[case::sh("ash", "ash(?:es)?")]
    #[case::plain("creature", "creature(?:s)?")]
    #[case::regex_override(r"\+1/\+1", r"\+1/\+1")]
    fn pluralize_cases(#[case] word: &str, #[case] expected: &str) {
        assert_eq!(pluralize(word), expected);
    }

    #[test]
    fn alternation_prefers_longer_alternatives() {
        let rendered = alternation(["strike", "first strike", "double strike"], FragmentFlags::empty());
        assert_eq!(rendered, "(?:double strike|first strike|strike)");
    }

    #[test]
    fn alternation_bounded_and_plural() {
        let rendered = alternation(["land"], FragmentFlags::PLURAL | FragmentFlags::BOUNDED);
        assert_eq!(rendered, r"\b(?:land(?:s)?)\b");
    }

    #[test]
    fn alternation_drops_duplicates() {
        assert_eq!(alternation(["a", "a"], FragmentFlags::empty()), "(?:a)");
    }

    #[rstest]
    #[case::word("target", Edge::Leading, EdgeClass::Word)]
    #[case::escaped_word(r"\w+", Edge::Leading, EdgeClass::Word)]
    #[case::escaped_space(r"\s+", Edge::Leading, EdgeClass::Other)]
    #[case::escaped_brace(r"\{t\}", Edge::Leading, EdgeClass::Other)]
    #[case::class("[+-]?x", Edge::Leading, EdgeClass::Other)]
    #[case::tilde("~", Edge::Leading, EdgeClass::Other)]
    #[case::optional_letter("cards?", Edge::Trailing, EdgeClass::Word)]
    #[case::digits(r"\d+", Edge::Trailing, EdgeClass::Word)]
    #[case::escaped_dot(r"\.", Edge::Trailing, EdgeClass::Other)]
    #[case::optional_group("enters(?: the battlefield)?", Edge::Trailing, EdgeClass::Other)]
    #[case::colon("{cost}:", Edge::Trailing, EdgeClass::Other)]
    fn edge_cases(#[case] source: &str, #[case] which: Edge, #[case] expected: EdgeClass) {
        assert_eq!(edge(source, which), expected);
    }

    #[test]
    fn edge_all_requires_every_alternative() {
        assert_eq!(edge_all(["white", "blue"], Edge::Leading), EdgeClass::Word);
        assert_eq!(edge_all(["white", r"\{w\}"], Edge::Leading), EdgeClass::Other);
        assert_eq!(edge_all(Vec::<&str>::new(), Edge::Leading), EdgeClass::Other);
    }
}
