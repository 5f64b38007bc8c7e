//! gifgate CLI
//!
//! One-shot batch commands over a catalog root:
//! - `scan`: classify candidates, optionally organize, write manifest + review queue
//! - `apply-decisions`: replay the decision map against the intake stage
//! - `decide` / `decisions`: edit and list human overrides
//! - `config`: show the resolved layout

use anyhow::Result;
use clap::{Parser, Subcommand};
use gifgate::catalog::ScanScope;
use gifgate_logging::{init_logging, LogConfig};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "gifgate", version, about = "GIF intake pipeline")]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Catalog root directory
    #[arg(long, global = true, env = "GIFGATE_ROOT", default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate, dedupe and classify GIFs, then regenerate the manifest
    Scan {
        /// Which part of the catalog to walk (inbox or all)
        #[arg(long, default_value = "inbox")]
        scope: ScanScope,

        /// Move intake files to approved/rejected according to their status
        #[arg(long)]
        organize: bool,

        /// Size limit in KB before `too_large`
        #[arg(long)]
        max_kb: Option<f64>,

        /// Aspect ratio beyond which a file is rejected as a banner
        #[arg(long)]
        reject_aspect: Option<f64>,

        /// Aspect ratio beyond which a file is flagged for review
        #[arg(long)]
        review_aspect: Option<f64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move intake files according to recorded decisions
    ApplyDecisions {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record or clear a decision for one asset id
    Decide {
        /// Asset id (file name without .gif)
        id: String,

        #[arg(value_enum)]
        action: cli::decide::DecideAction,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recorded decisions
    Decisions {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved catalog paths and thresholds
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn command_wants_json(command: &Commands) -> bool {
    match command {
        Commands::Scan { json, .. } => *json,
        Commands::ApplyDecisions { json } => *json,
        Commands::Decide { json, .. } => *json,
        Commands::Decisions { json } => *json,
        Commands::Config { json } => *json,
    }
}

fn run_command(cli: Cli) -> Result<()> {
    let root = cli.root;
    match cli.command {
        Commands::Scan {
            scope,
            organize,
            max_kb,
            reject_aspect,
            review_aspect,
            json,
        } => cli::scan::run(cli::scan::ScanArgs {
            root,
            scope,
            organize,
            max_kb,
            reject_aspect,
            review_aspect,
            json,
        }),
        Commands::ApplyDecisions { json } => {
            cli::apply::run(cli::apply::ApplyArgs { root, json })
        }
        Commands::Decide { id, action, json } => cli::decide::run(cli::decide::DecideArgs {
            root,
            id,
            action,
            json,
        }),
        Commands::Decisions { json } => cli::decide::list(cli::decide::ListArgs { root, json }),
        Commands::Config { json } => cli::config::run(cli::config::ConfigArgs { root, json }),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_mode = command_wants_json(&cli.command);

    if let Err(err) = init_logging(LogConfig {
        app_name: "gifgate",
        verbose: cli.verbose,
        json_mode,
    }) {
        eprintln!("Warning: logging unavailable: {:#}", err);
    }

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json_mode {
                cli::error::print_json_error(&err);
            } else if let Some(helpful) = err.downcast_ref::<cli::error::HelpfulError>() {
                eprint!("{}", helpful);
            } else {
                eprintln!("{:?}", err);
            }
            ExitCode::from(1)
        }
    }
}
