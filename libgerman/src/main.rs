use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use libgerman::{
    comparator, CharState, ComparisonResult, GermanConfig, MatchStatus, Orthography, WordMatch,
};

#[derive(Parser)]
#[command(name = "diktat", about = "Compare typed German dictation against a reference")]
struct Args {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify every word of INPUT against REFERENCE
    Compare {
        reference: String,
        input: String,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the normalized form of TEXT
    Normalize {
        text: String,
        #[arg(long)]
        preserve_case: bool,
    },
    /// Explain the similarity score of one word pair
    Score { expected: String, actual: String },
    /// Type attempts at REFERENCE until every word is right
    Practice { reference: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GermanConfig::load_toml(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GermanConfig::default(),
    };

    match args.command {
        Command::Compare {
            reference,
            input,
            json,
        } => {
            let result = comparator(&config).compare(&reference, &input);
            if json {
                println!("{}", result.to_json_pretty()?);
            } else {
                print_result(&result);
            }
        }
        Command::Normalize {
            text,
            preserve_case,
        } => {
            let engine = comparator(&config);
            println!("{}", engine.orthography().normalize(&text, preserve_case));
        }
        Command::Score { expected, actual } => {
            let engine = comparator(&config);
            let detail = engine.scorer().explain(&expected, &actual);
            println!("rule:      {:?}", detail.rule);
            println!("raw:       {:.3}", detail.raw);
            println!("bonus:     {:.3}", detail.bonus);
            println!("threshold: {:.3}", detail.threshold);
            println!("score:     {:.3}", detail.score);
        }
        Command::Practice { reference } => practice(&config, &reference)?,
    }
    Ok(())
}

fn print_result(result: &ComparisonResult) {
    for m in result.words.iter().chain(result.extra_words.iter()) {
        let expected = m.expected.as_ref().map_or("-", |w| w.text.as_str());
        let actual = m.actual.as_ref().map_or("-", |w| w.text.as_str());
        println!(
            "{:<10} {:<16} {:<16} {:.3}",
            format!("{:?}", m.status).to_lowercase(),
            expected,
            actual,
            m.similarity
        );
    }
    let s = &result.stats;
    println!(
        "correct {} / misspelled {} / missing {} / extra {} / accuracy {:.0}%",
        s.correct,
        s.misspelled,
        s.missing,
        s.extra,
        s.accuracy * 100.0
    );
}

fn practice(config: &GermanConfig, reference: &str) -> Result<()> {
    let engine = comparator(config);
    let words = engine.tokenize(reference).len();
    println!("{} words. Type your attempt and press Enter (Ctrl+D to quit).", words);

    let stdin = io::stdin();
    let mut sequence = 0u64;
    for line in stdin.lock().lines() {
        let attempt = line.context("failed to read stdin")?;
        sequence += 1;
        let options = libgerman::CallOptions {
            suppress_auto_advance: false,
            sequence: Some(sequence),
        };
        let result = engine.compare_with(reference, attempt.trim(), &options);

        let rendered: Vec<String> = result
            .words
            .iter()
            .chain(result.extra_words.iter())
            .map(render_word)
            .collect();
        println!("  {}", rendered.join(" "));
        println!(
            "  {} of {} correct",
            result.stats.correct,
            result.words.len()
        );
        io::stdout().flush()?;

        if result.auto_advance {
            println!("Complete.");
            break;
        }
    }
    Ok(())
}

/// Display a word without revealing letters the learner has not typed:
/// wrong letters in parentheses, extra letters in brackets, gaps as `_`.
fn render_word(m: &WordMatch) -> String {
    match m.status {
        MatchStatus::Correct => m.actual.as_ref().map_or(String::new(), |w| w.text.clone()),
        MatchStatus::Missing => "?".to_string(),
        MatchStatus::Extra => m
            .actual
            .as_ref()
            .map_or(String::new(), |w| format!("+{}", w.text)),
        MatchStatus::Misspelled => {
            let (Some(actual), Some(chars)) = (&m.actual, &m.characters) else {
                return "?".to_string();
            };
            let mut out = String::new();
            for f in chars.input_feedback(&actual.text) {
                if let Some(t) = chars.input_to_transformed.get(&f.input_index) {
                    for _ in chars.missing.iter().filter(|g| g.before_transformed == *t) {
                        out.push('_');
                    }
                }
                match f.state {
                    CharState::Correct => out.push(f.ch),
                    CharState::Wrong => out.push_str(&format!("({})", f.ch)),
                    CharState::Extra => out.push_str(&format!("[{}]", f.ch)),
                    CharState::Merged => out.push(f.ch),
                }
            }
            let end = chars.transformed_input.chars().count();
            for _ in chars.missing.iter().filter(|g| g.before_transformed == end) {
                out.push('_');
            }
            out
        }
    }
}
