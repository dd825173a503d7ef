use std::io::{BufRead, Write};

use mathdash_core::model::SessionSummary;
use mathdash_core::{QuestionGenerator, SESSION_SECONDS};
use services::{AnswerFeedback, SessionEvent, SessionLoopService, SessionService};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum ArgsError {
    #[error("{flag} requires a value")]
    MissingValue { flag: &'static str },
    #[error("unknown argument: {0}")]
    UnknownArg(String),
    #[error("invalid --seed value: {raw}")]
    InvalidSeed { raw: String },
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p mathdash -- [--seed <u64>] [--json] [--verbose]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --seed <u64>  replay the same question sequence");
    eprintln!("  --json        print the final summary as JSON");
    eprintln!("  --verbose     debug logging on stderr");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MATHDASH_SEED, RUST_LOG");
}

#[derive(Debug, Default)]
struct Args {
    seed: Option<u64>,
    json: bool,
    verbose: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut parsed = Self {
            seed: std::env::var("MATHDASH_SEED")
                .ok()
                .and_then(|value| value.trim().parse::<u64>().ok()),
            ..Self::default()
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let seed = value
                        .trim()
                        .parse::<u64>()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    parsed.seed = Some(seed);
                }
                "--json" => parsed.json = true,
                "--verbose" | "-v" => parsed.verbose = true,
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(parsed))
    }
}

fn init_logging(verbose: bool) {
    // warnings and up by default; per-answer driver logs are debug
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Passes each line of `input` to `forward` until EOF or `forward` returns false.
///
/// Bytes that are not valid UTF-8 are replaced rather than ending the read, so
/// a garbled line reaches the session as an unparseable answer.
fn forward_lines(
    mut input: impl BufRead,
    mut forward: impl FnMut(String) -> bool,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if !forward(line.to_owned()) {
            return Ok(());
        }
    }
}

/// Forwards stdin lines to the session until input closes or the session stops listening.
///
/// Runs on a plain thread: a blocked stdin read must not hold up runtime shutdown.
fn spawn_stdin_reader(answers: mpsc::Sender<String>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        if let Err(err) = forward_lines(stdin.lock(), |line| answers.blocking_send(line).is_ok()) {
            warn!(%err, "stdin read failed");
        }
        debug!("stdin reader finished");
    });
}

fn render(event: &SessionEvent) {
    match event {
        SessionEvent::QuestionReady(question) => println!("\n  {question} = ?"),
        SessionEvent::Feedback { feedback, progress } => {
            match feedback {
                AnswerFeedback::Correct { points } => println!("✓ Correct! +{points} points"),
                AnswerFeedback::Wrong { expected } => {
                    println!("✗ Wrong! The answer was {expected}");
                }
            }
            println!(
                "  score {} | streak {} | {}s left",
                progress.score, progress.streak, progress.time_remaining
            );
        }
        SessionEvent::Rejected(_) => println!("Please enter a valid number"),
        SessionEvent::Tick { remaining } => {
            if *remaining > 0 && (*remaining % 10 == 0 || *remaining <= 5) {
                println!("  ⏱ {remaining}s left");
            }
        }
        SessionEvent::Finished(_) => println!("\nGame over!"),
    }
}

fn report(
    out: &mut impl Write,
    summary: &SessionSummary,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        serde_json::to_writer_pretty(&mut *out, summary)?;
        writeln!(out)?;
        return Ok(());
    }
    writeln!(out, "Final score:        {}", summary.score())?;
    writeln!(out, "Questions answered: {}", summary.total_questions())?;
    writeln!(out, "Accuracy:           {}%", summary.accuracy())?;
    if let Some(played) = summary.duration() {
        writeln!(out, "Time played:        {}s", played.num_seconds())?;
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = match Args::parse(&mut argv) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            // main prints the error itself
            print_usage();
            return Err(err.into());
        }
    };

    init_logging(parsed.verbose);

    let generator = match parsed.seed {
        Some(seed) => {
            info!(seed, "using seeded question generator");
            QuestionGenerator::seeded(seed)
        }
        None => QuestionGenerator::from_entropy(),
    };
    let session = SessionService::new(generator);

    let (answer_tx, answer_rx) = mpsc::channel(8);
    let (event_tx, mut event_rx) = mpsc::channel(64);
    spawn_stdin_reader(answer_tx);

    println!("You have {SESSION_SECONDS} seconds. Type each answer and press Enter.");
    let driver = SessionLoopService::default();
    let game = tokio::spawn(async move { driver.run(session, answer_rx, event_tx).await });

    while let Some(event) = event_rx.recv().await {
        render(&event);
    }

    let summary = game.await?;
    report(&mut std::io::stdout().lock(), &summary, parsed.json)?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathdash_core::model::{AnswerError, parse_answer};
    use mathdash_core::time::fixed_now;

    fn parse(args: &[&str]) -> Result<Option<Args>, ArgsError> {
        let mut iter = args.iter().map(|arg| (*arg).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn parses_flags() {
        let args = parse(&["--seed", "42", "--json", "-v"]).unwrap().unwrap();
        assert_eq!(args.seed, Some(42));
        assert!(args.json);
        assert!(args.verbose);
    }

    #[test]
    fn help_short_circuits() {
        assert!(parse(&["--help"]).unwrap().is_none());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            parse(&["--seed"]),
            Err(ArgsError::MissingValue { flag: "--seed" })
        ));
        assert!(matches!(
            parse(&["--seed", "soon"]),
            Err(ArgsError::InvalidSeed { .. })
        ));
        assert!(matches!(
            parse(&["--fast"]),
            Err(ArgsError::UnknownArg(arg)) if arg == "--fast"
        ));
    }

    #[test]
    fn argument_errors_name_the_offender() {
        let err = parse(&["--seed", "soon"]).unwrap_err();
        assert_eq!(err.to_string(), "invalid --seed value: soon");
        let err = parse(&["--fast"]).unwrap_err();
        assert_eq!(err.to_string(), "unknown argument: --fast");
    }

    #[test]
    fn invalid_utf8_lines_are_forwarded() {
        let mut lines = Vec::new();
        forward_lines(&b"caf\xe9\n12\r\n7"[..], |line| {
            lines.push(line);
            true
        })
        .unwrap();
        assert_eq!(lines, ["caf\u{FFFD}", "12", "7"]);
        assert!(matches!(
            parse_answer(&lines[0]),
            Err(AnswerError::NotANumber { .. })
        ));
        assert_eq!(parse_answer(&lines[1]), Ok(12));
    }

    #[test]
    fn forwarding_stops_when_receiver_goes_away() {
        let mut seen = 0;
        forward_lines(&b"1\n2\n3\n"[..], |_| {
            seen += 1;
            false
        })
        .unwrap();
        assert_eq!(seen, 1);
    }

    #[test]
    fn report_includes_time_played() {
        let start = fixed_now();
        let summary = SessionSummary::new(21, 3, 2)
            .with_period(Some(start), start + chrono::Duration::seconds(60));
        let mut out = Vec::new();
        report(&mut out, &summary, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Accuracy:           67%"), "{text}");
        assert!(text.contains("Time played:        60s"), "{text}");

        let mut out = Vec::new();
        report(&mut out, &summary, true).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["score"], 21);
        assert!(json["started_at"].is_string());
        assert!(json["ended_at"].is_string());
    }
}
