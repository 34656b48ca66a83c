//! Demo driver: loads a specification from disk, resolving `include`s
//! relative to it, and parses a single input string against a chosen
//! start rule. This binary lives outside THE CORE (§6: "No CLI... surface
//! is part of the core") — it exists only to exercise the library end to
//! end the way a real host program would.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use peg_interpret::{FsLoader, Parser, Specification};

#[derive(ClapParser, Debug)]
#[command(about = "Parse an input string against a PEG-like specification")]
struct Args {
    /// Path to the specification file.
    grammar: PathBuf,

    /// Rule to start matching from.
    #[arg(long, default_value = "main")]
    start: String,

    /// Input text to parse.
    input: String,

    /// Allow the parse to succeed without consuming all of `input`.
    #[arg(long)]
    open: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let text = match std::fs::read_to_string(&args.grammar) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: cannot read {}: {e}", args.grammar.display());
            return ExitCode::FAILURE;
        }
    };

    let base = args.grammar.display().to_string();
    let spec = match Specification::parse_with_loader(&text, &base, &FsLoader) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut parser = Parser::new(&spec);
    match parser.parse(&args.input, &args.start, !args.open) {
        Ok(value) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("parse failed: {e}");
            ExitCode::FAILURE
        }
    }
}
