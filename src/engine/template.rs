//! Template parsing.
//!
//! A variant template is written as whitespace-separated chunks:
//!
//! ```text
//! "put {count} {counter} counters? on {object}."
//!  │    │       │         │         │   └─ placeholder + terminal punctuation
//!  │    │       │         │         └──── literal regex
//!  └────┴───────┴─────────┴────────────── one snippet per chunk
//! ```
//!
//! Inside a chunk, literal regex text and `{field}` placeholders concatenate
//! without spaces (`{cost}:`). Trailing `.`, `,` and `;` and any leading or
//! trailing paired delimiter (`"`) are split off into snippets of their own so
//! the joiner can decide spacing around them.

/// The paired delimiter tracked by the joiner.
pub const PAIRED: char = '"';

/// One piece of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part<'t> {
    /// Regex source copied verbatim.
    Literal(&'t str),
    /// `{name}` placeholder.
    Field(&'t str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snippet<'t> {
    Parts(Vec<Part<'t>>),
    /// `.`, `,` or `;` at the end of a chunk.
    Terminal(char),
    Delimiter(char),
}

impl<'t> Snippet<'t> {
    /// The placeholder name when the snippet is exactly one placeholder.
    pub fn sole_field(&self) -> Option<&'t str> {
        match self {
            Snippet::Parts(parts) => match parts.as_slice() {
                [Part::Field(name)] => Some(name),
                _ => None,
            },
            _ => None,
        }
    }

    /// Number of paired-delimiter characters this snippet contributes.
    pub fn paired_count(&self) -> usize {
        match self {
            Snippet::Delimiter(c) if *c == PAIRED => 1,
            Snippet::Parts(parts) => parts
                .iter()
                .map(|p| match p {
                    Part::Literal(lit) => lit.chars().filter(|&c| c == PAIRED).count(),
                    Part::Field(_) => 0,
                })
                .sum(),
            _ => 0,
        }
    }
}

/// Split a template into snippets.
pub fn parse(template: &str) -> Vec<Snippet<'_>> {
    let mut snippets = Vec::new();
    for chunk in template.split_whitespace() {
        parse_chunk(chunk, &mut snippets);
    }
    snippets
}

/// Placeholder names in template order (duplicates kept).
pub fn placeholders<'t>(snippets: &[Snippet<'t>]) -> Vec<&'t str> {
    snippets
        .iter()
        .filter_map(|s| match s {
            Snippet::Parts(parts) => Some(parts),
            _ => None,
        })
        .flatten()
        .filter_map(|p| match p {
            Part::Field(name) => Some(*name),
            Part::Literal(_) => None,
        })
        .collect()
}

fn parse_chunk<'t>(chunk: &'t str, out: &mut Vec<Snippet<'t>>) {
    let mut body = chunk;
    while let Some(rest) = body.strip_prefix(PAIRED) {
        out.push(Snippet::Delimiter(PAIRED));
        body = rest;
    }

    let mut suffix = Vec::new();
    loop {
        if let Some(rest) = body.strip_suffix(PAIRED) {
            suffix.push(Snippet::Delimiter(PAIRED));
            body = rest;
            continue;
        }
        match body.chars().last() {
            Some(c @ ('.' | ',' | ';')) if !body[..body.len() - 1].ends_with('\\') => {
                suffix.push(Snippet::Terminal(c));
                body = &body[..body.len() - 1];
            }
            _ => break,
        }
    }

    if !body.is_empty() {
        out.push(Snippet::Parts(split_parts(body)));
    }
    out.extend(suffix.into_iter().rev());
}

fn split_parts(body: &str) -> Vec<Part<'_>> {
    let mut parts = Vec::new();
    let bytes = body.as_bytes();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'{' && (i == 0 || bytes[i - 1] != b'\\') {
            if let Some(len) = placeholder_len(&body[i + 1..]) {
                if literal_start < i {
                    parts.push(Part::Literal(&body[literal_start..i]));
                }
                parts.push(Part::Field(&body[i + 1..i + 1 + len]));
                i += len + 2;
                literal_start = i;
                continue;
            }
        }
        i += 1;
    }
    if literal_start < body.len() {
        parts.push(Part::Literal(&body[literal_start..]));
    }
    parts
}

/// Length of the identifier in `name}...`, if `rest` starts with one.
fn placeholder_len(rest: &str) -> Option<usize> {
    let end = rest.find('}')?;
    let name = &rest[..end];
    let mut chars = name.chars();
    let first = chars.next()?;
    if !(first.is_ascii_lowercase() || first == '_') {
        return None;
    }
    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
        return None;
    }
    Some(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_punctuation_and_placeholders() {
        let snippets = parse("destroy {object}.");
        assert_eq!(
            snippets,
            vec![
                Snippet::Parts(vec![Part::Literal("destroy")]),
                Snippet::Parts(vec![Part::Field("object")]),
                Snippet::Terminal('.'),
            ]
        );
    }

    #[test]
    fn keeps_inline_literals_attached() {
        let snippets = parse("{cost}:");
        assert_eq!(snippets, vec![Snippet::Parts(vec![Part::Field("cost"), Part::Literal(":")])]);
    }

    #[test]
    fn splits_paired_delimiters() {
        let snippets = parse(r#"with "{text}""#);
        assert_eq!(
            snippets,
            vec![
                Snippet::Parts(vec![Part::Literal("with")]),
                Snippet::Delimiter('"'),
                Snippet::Parts(vec![Part::Field("text")]),
                Snippet::Delimiter('"'),
            ]
        );
        assert_eq!(snippets.iter().map(Snippet::paired_count).sum::<usize>(), 2);
    }

    #[test]
    fn escaped_braces_and_quantifiers_are_literal() {
        let snippets = parse(r"\{t\} x{2}");
        assert_eq!(placeholders(&snippets), Vec::<&str>::new());
        let snippets = parse(r"a\.");
        assert_eq!(snippets, vec![Snippet::Parts(vec![Part::Literal(r"a\.")])]);
    }

    #[test]
    fn placeholders_in_order() {
        let snippets = parse("{player} draws? {count} cards?");
        assert_eq!(placeholders(&snippets), vec!["player", "count"]);
        assert_eq!(snippets[0].sole_field(), Some("player"));
        assert_eq!(snippets[1].sole_field(), None);
    }
}
