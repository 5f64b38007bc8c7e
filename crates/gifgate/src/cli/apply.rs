//! Apply-decisions command

use crate::cli::output::print_table;
use crate::cli::{open_catalog, print_json};
use anyhow::Result;
use gifgate::catalog::{apply_decisions, DecisionMap};
use std::path::PathBuf;

#[derive(Debug)]
pub struct ApplyArgs {
    pub root: PathBuf,
    pub json: bool,
}

pub fn run(args: ApplyArgs) -> Result<()> {
    let catalog = open_catalog(&args.root)?;
    let decisions = DecisionMap::load(&catalog.layout.decisions);
    let report = apply_decisions(&catalog.layout, &decisions);

    if args.json {
        return print_json(&report);
    }

    if decisions.is_empty() {
        println!("No decisions recorded in {}", catalog.layout.decisions.display());
        return Ok(());
    }

    print_table(
        &["Moved approved", "Moved rejected", "Skipped"],
        vec![vec![
            report.moved_approved.to_string(),
            report.moved_rejected.to_string(),
            report.skipped.to_string(),
        ]],
    );
    for failure in &report.failures {
        println!("  FAILED {}: {}", failure.path, failure.message);
    }
    Ok(())
}
