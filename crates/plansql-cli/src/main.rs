//! `plansql`: reconstruct runnable SQL from a captured showplan.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use plansql_cli::{commands, input};
use plansql_core::MismatchPolicy;
use plansql_error::{PlanSqlError, Result};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "plansql", version)]
#[command(about = "Reconstruct runnable SQL from a captured SQL Server execution plan")]
#[command(long_about = "Reconstruct runnable SQL from a captured SQL Server execution plan.

A cached plan records the parameter values the engine compiled with.
plansql extracts them per statement and merges them back into the
plan's embedded SQL text, or into your own copy of the original
script, so you can see exactly which literals produced a given plan.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Substitute compiled parameter values into each statement and print it
    Inline {
        /// Showplan XML file (UTF-16 or UTF-8)
        plan: PathBuf,
        /// Original script whose statements replace the plan's embedded text
        script: Option<PathBuf>,
        /// What to do when plan and script statement counts differ
        #[arg(long, value_enum, default_value = "truncate")]
        on_mismatch: MismatchArg,
    },
    /// Print per-statement DECLARE lines followed by the unmodified SQL
    Declare {
        /// Showplan XML file (UTF-16 or UTF-8)
        plan: PathBuf,
        /// Original script whose statements replace the plan's embedded text
        script: Option<PathBuf>,
        /// What to do when plan and script statement counts differ
        #[arg(long, value_enum, default_value = "truncate")]
        on_mismatch: MismatchArg,
    },
    /// Print the token-tree structure of a script
    Dump {
        /// SQL script file
        script: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MismatchArg {
    /// Stop at the shorter of plan and script (default)
    Truncate,
    /// Fail when the counts differ
    Error,
    /// Continue to the longer side with empty pairings
    Pad,
}

impl From<MismatchArg> for MismatchPolicy {
    fn from(arg: MismatchArg) -> Self {
        match arg {
            MismatchArg::Truncate => Self::Truncate,
            MismatchArg::Error => Self::Error,
            MismatchArg::Pad => Self::Pad,
        }
    }
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Command::Inline {
            plan,
            script,
            on_mismatch,
        } => {
            let plan_doc = input::read_text(&plan)?;
            let script_text = script.map(|p| input::read_text(&p)).transpose()?;
            commands::inline(&plan_doc, script_text.as_deref(), on_mismatch.into(), out)
        }
        Command::Declare {
            plan,
            script,
            on_mismatch,
        } => {
            let plan_doc = input::read_text(&plan)?;
            let script_text = script.map(|p| input::read_text(&p)).transpose()?;
            commands::declare(&plan_doc, script_text.as_deref(), on_mismatch.into(), out)
        }
        Command::Dump { script } => {
            let script_text = input::read_text(&script)?;
            commands::dump(&script_text, out)
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();
    if let Err(err) = run(cli, &mut stdout) {
        eprintln!("plansql: {err}");
        if matches!(err, PlanSqlError::LengthMismatch { .. }) {
            eprintln!("plansql: use --on-mismatch truncate to take the shorter side");
        }
        std::process::exit(1);
    }
}
