mod error;
mod repl;
mod runner;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// What to do with each parsed input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Evaluate,
    /// Print the parsed program instead of running it.
    Ast,
}

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Source file to run. Starts the REPL when omitted.
    path: Option<PathBuf>,
    /// Print the rendered AST instead of evaluating.
    #[arg(long)]
    ast: bool,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Only initialize if RUST_LOG is set
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let mode = if cli.ast { Mode::Ast } else { Mode::Evaluate };

    let result = match cli.path {
        None => repl::start(mode),
        Some(path) => runner::run_file(&path, mode),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if !err.is_reported() {
                eprintln!("dessa: {err}");
            }
            ExitCode::FAILURE
        }
    }
}
