mod debug_report;

use clap::{Args, Parser, Subcommand};
use glyphscan::{CorpusItem, Engine, Options};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "GLYPHSCAN_LOG";

/// Capture engine for card rules text, with corpus-wide gap analysis.
#[derive(Debug, Parser)]
#[command(name = "glyphscan", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Force ANSI color output.
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable ANSI color output.
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Tokenize one card's text and print tokens, capture trees and coverage.
    Scan(ScanArgs),
    /// Analyze a JSON corpus (`[{"name": .., "text": ..}, ..]`) and print the gap report.
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args)]
struct ScanArgs {
    /// Card name, replaced with `~` in the text.
    #[arg(short, long, default_value = "")]
    name: String,

    /// Drop parenthesized reminder text before tokenizing.
    #[arg(long)]
    strip_reminder: bool,

    /// Rules text. Read from stdin when omitted.
    #[arg(trailing_var_arg = true)]
    text: Vec<String>,
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// Path to the corpus JSON file.
    corpus: PathBuf,

    /// Print the full report as JSON instead of the summary.
    #[arg(long)]
    json: bool,

    /// Shortest unmatched run to keep, in tokens (1 or 2).
    #[arg(long, default_value_t = 1)]
    min_run: usize,

    /// Drop parenthesized reminder text before tokenizing.
    #[arg(long)]
    strip_reminder: bool,

    /// Rows to print per summary section.
    #[arg(long, default_value_t = 20)]
    top: usize,

    /// Analyze cards one at a time instead of on the thread pool.
    #[arg(long)]
    sequential: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let color = if cli.color {
        true
    } else if cli.no_color {
        false
    } else {
        io::stdout().is_terminal()
    };

    match run(cli.command, color) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Usage(msg)) => {
            eprintln!("error: {msg}");
            ExitCode::from(2)
        }
        Err(CliError::Failed(msg)) => {
            eprintln!("error: {msg}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init();
}

enum CliError {
    /// Bad arguments or unusable input.
    Usage(String),
    /// A defect in the vocabulary or an I/O failure.
    Failed(String),
}

impl From<glyphscan::Error> for CliError {
    fn from(err: glyphscan::Error) -> Self {
        if err.is_defect() { CliError::Failed(err.to_string()) } else { CliError::Usage(err.to_string()) }
    }
}

fn run(command: Command, color: bool) -> Result<(), CliError> {
    match command {
        Command::Scan(args) => scan(args, color),
        Command::Analyze(args) => analyze(args, color),
    }
}

fn scan(args: ScanArgs, color: bool) -> Result<(), CliError> {
    let text = if args.text.is_empty() { read_stdin_input()? } else { args.text.join(" ") };
    if text.trim().is_empty() {
        return Err(CliError::Usage("no input provided".to_string()));
    }

    let engine = Engine::standard()?;
    let options = Options { strip_reminder_text: args.strip_reminder, parallel: false, ..Options::default() };
    let card = engine.analyze_card(&CorpusItem::new(args.name, text), &options)?;
    debug_report::print_card(&card, engine.compiled().len(), color);
    Ok(())
}

fn analyze(args: AnalyzeArgs, color: bool) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(&args.corpus)
        .map_err(|err| CliError::Failed(format!("failed to read {}: {err}", args.corpus.display())))?;
    let items: Vec<CorpusItem> = serde_json::from_str(&raw)
        .map_err(|err| CliError::Usage(format!("invalid corpus {}: {err}", args.corpus.display())))?;

    let options = Options {
        // Corpus reports never show capture trees.
        hydrate: false,
        min_run_len: args.min_run,
        strip_reminder_text: args.strip_reminder,
        parallel: !args.sequential,
    };
    let engine = Engine::standard()?;
    let report = engine.analyze_corpus(&items, &options)?;

    if args.json {
        let out = serde_json::to_string_pretty(&report).map_err(|err| CliError::Failed(err.to_string()))?;
        println!("{out}");
    } else {
        debug_report::print_report(&report, args.top, color);
    }
    Ok(())
}

fn read_stdin_input() -> Result<String, CliError> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| CliError::Failed(format!("failed to read stdin: {err}")))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_args(corpus: PathBuf) -> AnalyzeArgs {
        AnalyzeArgs { corpus, json: true, min_run: 1, strip_reminder: false, top: 5, sequential: true }
    }

    #[test]
    fn unreadable_corpus_is_a_failure() {
        let missing = std::env::temp_dir().join("glyphscan-missing-corpus.json");
        let _ = std::fs::remove_file(&missing);
        assert!(matches!(analyze(analyze_args(missing), false), Err(CliError::Failed(_))));
    }

    #[test]
    fn malformed_corpus_is_a_usage_error() {
        let path = std::env::temp_dir().join(format!("glyphscan-bad-corpus-{}.json", std::process::id()));
        std::fs::write(&path, "{not json").unwrap();
        let result = analyze(analyze_args(path.clone()), false);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(CliError::Usage(_))));
    }
}
