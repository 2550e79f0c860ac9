use glyphscan::gaps::Excerpt;
use glyphscan::{CaptureNode, CardAnalysis, CorpusReport, Coverage, LineAnalysis, TokenKind, Value};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

fn section(palette: &ansi::Palette, title: &str) {
    println!("\n{}", palette.paint(format!("━━━ {title} ━━━"), ansi::GRAY));
}

pub fn print_card(card: &CardAnalysis, variant_count: usize, color: bool) {
    let palette = ansi::Palette::new(color);
    let title = if card.name.is_empty() { "Scanning".to_string() } else { format!("Scanning: \"{}\"", card.name) };
    println!("\n{}", palette.bold(palette.paint(format!("⚙  {title}"), ansi::CYAN)));
    println!("  {}", palette.dim(format!("{variant_count} variants compiled")));

    for (idx, line) in card.lines.iter().enumerate() {
        section(&palette, &format!("Line {idx}"));
        print_line(line, &palette);
    }

    section(&palette, "Coverage");
    println!("  {}", fmt_coverage(&card.coverage, &palette));
    println!();
}

fn print_line(line: &LineAnalysis, palette: &ansi::Palette) {
    println!("  {}", palette.dim(&line.text));
    if line.text.is_empty() {
        println!("  {}", palette.dim("(empty line)"));
        return;
    }

    for token in &line.tokens {
        let text = token.text(&line.text);
        let label = match token.kind {
            TokenKind::Variant(kind) => palette.paint(kind.name(), ansi::BLUE),
            TokenKind::Unmatched => palette.paint("unmatched", ansi::YELLOW),
        };
        let text = if token.kind.is_matched() { palette.paint(text, ansi::GREEN) } else { palette.paint(text, ansi::YELLOW) };
        println!(
            "  {} {} {} {}",
            palette.paint(format!("{:>3}..{:<3}", token.range.start, token.range.end), ansi::GRAY),
            label,
            palette.dim("│"),
            text
        );
    }

    if !line.captures.is_empty() {
        println!("\n  {}", palette.paint("Captures:", ansi::BLUE));
        for node in &line.captures {
            print_node(node, &line.text, 2, palette);
        }
    }

    if !line.unmatched.is_empty() {
        println!("\n  {}", palette.paint("Unmatched:", ansi::YELLOW));
        for span in &line.unmatched {
            println!(
                "    {} {} {}",
                palette.paint(span.before.label(), ansi::GRAY),
                palette.bold(palette.paint(&span.text, ansi::YELLOW)),
                palette.paint(span.after.label(), ansi::GRAY),
            );
        }
    }
    println!("  {}", fmt_coverage(&line.coverage, palette));
}

fn print_node(node: &CaptureNode, line: &str, depth: usize, palette: &ansi::Palette) {
    let indent = "  ".repeat(depth);
    let text = line.get(node.range.start..node.range.end).unwrap_or_default();
    println!(
        "{indent}{} {} {}",
        palette.bold(palette.paint(node.kind.name(), ansi::CYAN)),
        palette.paint(format!("{}..{}", node.range.start, node.range.end), ansi::YELLOW),
        palette.dim(format!("\"{text}\""))
    );

    for field in &node.fields {
        let value = match &field.value {
            Value::Choice(choice) => palette.paint(format!("{}::{}", choice.family, choice.member), ansi::GREEN),
            Value::Flag(set) => palette.paint(set.to_string(), if *set { ansi::GREEN } else { ansi::GRAY }),
            Value::Text(text) => palette.paint(format!("\"{text}\""), ansi::GREEN),
            Value::Child(_) => palette.dim("↓"),
        };
        println!("{indent}  {} {}", palette.paint(format!("{}:", field.name), ansi::BLUE), value);

        if let Some(child) = match field.value {
            Value::Child(idx) => node.children.get(idx),
            _ => None,
        } {
            print_node(child, line, depth + 2, palette);
        }
    }
}

fn fmt_coverage(coverage: &Coverage, palette: &ansi::Palette) -> String {
    let percent = coverage.percent();
    let color = if percent >= 100.0 { ansi::GREEN } else { ansi::YELLOW };
    format!(
        "{} {}  {}",
        palette.dim("coverage:"),
        palette.paint(format!("{percent:.1}%"), color),
        palette.dim(format!("({} matched / {} unmatched bytes)", coverage.matched_bytes, coverage.unmatched_bytes))
    )
}

fn fmt_excerpt(excerpt: &Excerpt, palette: &ansi::Palette) -> String {
    format!(
        "{}{}{}",
        palette.dim(&excerpt.before),
        palette.bold(palette.paint(&excerpt.span, ansi::YELLOW)),
        palette.dim(&excerpt.after)
    )
}

pub fn print_report(report: &CorpusReport, top: usize, color: bool) {
    let palette = ansi::Palette::new(color);
    println!(
        "\n{}",
        palette.bold(palette.paint(format!("⚙  Corpus: {} cards, {} lines", report.card_count, report.line_count), ansi::CYAN))
    );

    section(&palette, "Coverage");
    println!("  {}", fmt_coverage(&report.coverage, &palette));
    println!(
        "  {} {}  {} {}",
        palette.dim("tokens:"),
        palette.paint(report.token_count.to_string(), ansi::BLUE),
        palette.dim("unmatched spans:"),
        palette.paint(report.digest.len().to_string(), ansi::YELLOW)
    );

    section(&palette, "Variants");
    if report.variant_counts.is_empty() {
        println!("{}", palette.dim("  No variant matched"));
    }
    for entry in report.variant_counts.iter().take(top) {
        println!("  {:>6}  {}", palette.paint(entry.count.to_string(), ansi::GREEN), palette.paint(entry.kind.name(), ansi::BLUE));
    }

    section(&palette, "Repeats");
    if report.repeats.is_empty() {
        println!("{}", palette.dim("  No unmatched text"));
    }
    for repeat in report.repeats.iter().take(top) {
        println!(
            "  {:>6}  {}",
            palette.paint(format!("×{}", repeat.count), ansi::GREEN),
            palette.bold(palette.paint(&repeat.text, ansi::YELLOW))
        );
        let sample = report.digest.entries.iter().find(|e| e.span.text.contains(repeat.text.as_str()));
        if let Some(excerpt) = sample.and_then(|e| report.excerpt(e)) {
            println!("          {}", fmt_excerpt(&excerpt, &palette));
        }
    }

    section(&palette, "Candidates");
    for candidate in report.candidates.iter().filter(|c| c.fitness > 0).take(top) {
        println!(
            "  {:>6}  {} {}",
            palette.paint(candidate.fitness.to_string(), ansi::GREEN),
            palette.bold(palette.paint(&candidate.prefix, ansi::CYAN)),
            palette.dim(format!(
                "support {} │ branching {} │ next: {}",
                candidate.support,
                candidate.branching,
                candidate.next_words.join(", ")
            ))
        );
    }

    section(&palette, "Adjacency");
    for (text, _) in report.digest.weighted().into_iter().take(top) {
        let Some(counts) = report.adjacency.get(text) else {
            continue;
        };
        let fmt_side = |side: &std::collections::BTreeMap<&'static str, usize>| {
            let mut side: Vec<_> = side.iter().collect();
            side.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            side.iter().take(3).map(|(label, n)| format!("{label}×{n}")).collect::<Vec<_>>().join(" ")
        };
        println!(
            "  {} {} {} {}",
            palette.paint(fmt_side(&counts.before), ansi::GRAY),
            palette.bold(palette.paint(text, ansi::YELLOW)),
            palette.paint(fmt_side(&counts.after), ansi::GRAY),
            palette.dim(format!("({})", counts.occurrences))
        );
    }

    let metrics = &report.metrics;
    section(&palette, "Timing");
    println!(
        "  Total: {}  │  Lines: {}  │  Repeats: {}  │  Ranking: {}",
        palette.paint(format!("{:?}", metrics.total), ansi::GREEN),
        palette.paint(format!("{:?}", metrics.lines), ansi::CYAN),
        palette.dim(format!("{:?}", metrics.repeats)),
        palette.dim(format!("{:?}", metrics.ranking)),
    );
    println!(
        "  {}",
        palette.dim(format!("vocabulary {} words │ automaton {} states", metrics.vocabulary, metrics.automaton_states))
    );
    println!();
}
