//! reflint CLI
//!
//! Cross-reference linter for mod script assets: flags, event targets and
//! scripted localisation.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use reflint_core::{Corpus, Report, ValidatorError, scripted_loc, variables};

mod git;

/// reflint - Cross-reference linter for mod script assets
#[derive(Parser)]
#[command(name = "reflint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate country, state and global flags plus event targets
    Variables {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Validate scripted localisation definitions and references
    ScriptedLoc {
        #[command(flatten)]
        scan: ScanArgs,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Path to the mod folder
    #[arg(long, default_value = ".")]
    path: PathBuf,

    /// Exit with an error code if issues are found
    #[arg(long)]
    strict: bool,

    /// Save validation results to a file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Disable ANSI color codes in output
    #[arg(long)]
    no_color: bool,

    /// Only validate git staged files (for pre-commit hooks)
    #[arg(long)]
    staged: bool,
}

type Validator = fn(&Corpus, &mut Report, Option<&Path>) -> Result<usize, ValidatorError>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match &cli.command {
        Commands::Variables { scan } => run_scan(scan, &["txt", "yml"], variables::run),
        Commands::ScriptedLoc { scan } => run_scan(scan, &["txt", "yml", "gui"], scripted_loc::run),
    }
}

fn run_scan(scan: &ScanArgs, staged_extensions: &[&str], validate: Validator) -> Result<ExitCode> {
    let mut corpus = match Corpus::open(&scan.path) {
        Ok(corpus) => corpus,
        Err(e) => {
            error!("Error: {e}");
            return Ok(ExitCode::from(1));
        }
    };

    if scan.staged {
        match git::staged_files(corpus.root(), staged_extensions) {
            Some(files) => corpus = corpus.with_staged(files),
            None => warn!("No staged files found; validating the full tree"),
        }
    }

    let mut report = Report::new(!scan.no_color);
    let issues = validate(&corpus, &mut report, scan.output.as_deref()).into_diagnostic()?;

    if scan.strict && issues > 0 {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
