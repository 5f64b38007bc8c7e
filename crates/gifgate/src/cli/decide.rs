//! Decision map commands: record, clear and list human overrides

use crate::cli::error::HelpfulError;
use crate::cli::output::{decision_color, print_table_colored};
use crate::cli::{open_catalog, print_json};
use anyhow::{Context, Result};
use clap::ValueEnum;
use gifgate::catalog::{normalize_id, Decision, DecisionMap};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// What `decide` does to an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecideAction {
    Approve,
    Reject,
    /// Remove the recorded decision
    Clear,
}

#[derive(Debug)]
pub struct DecideArgs {
    pub root: PathBuf,
    pub id: String,
    pub action: DecideAction,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct DecideOutcome<'a> {
    id: &'a str,
    decision: Option<Decision>,
    previous: Option<Decision>,
}

pub fn run(args: DecideArgs) -> Result<()> {
    let Some(id) = normalize_id(&args.id) else {
        return Err(HelpfulError::invalid_id(&args.id).into());
    };

    let catalog = open_catalog(&args.root)?;
    let path = &catalog.layout.decisions;
    let mut decisions = DecisionMap::load(path);

    let (decision, previous) = match args.action {
        DecideAction::Approve => (Some(Decision::Approve), decisions.set(id, Decision::Approve)),
        DecideAction::Reject => (Some(Decision::Reject), decisions.set(id, Decision::Reject)),
        DecideAction::Clear => (None, decisions.clear(id)),
    };

    decisions
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(
        id = %id,
        decision = decision.map(|d| d.as_str()).unwrap_or("cleared"),
        "decision map updated"
    );

    if args.json {
        return print_json(&DecideOutcome {
            id,
            decision,
            previous,
        });
    }

    match (decision, previous) {
        (Some(d), Some(p)) if d == p => println!("{}: already {}", id, d.as_str()),
        (Some(d), Some(p)) => println!("{}: {} (was {})", id, d.as_str(), p.as_str()),
        (Some(d), None) => println!("{}: {}", id, d.as_str()),
        (None, Some(p)) => println!("{}: cleared (was {})", id, p.as_str()),
        (None, None) => println!("{}: no decision recorded", id),
    }
    Ok(())
}

#[derive(Debug)]
pub struct ListArgs {
    pub root: PathBuf,
    pub json: bool,
}

pub fn list(args: ListArgs) -> Result<()> {
    let catalog = open_catalog(&args.root)?;
    let decisions = DecisionMap::load(&catalog.layout.decisions);

    if args.json {
        return print_json(&decisions);
    }

    if decisions.is_empty() {
        println!("No decisions recorded.");
        return Ok(());
    }

    let rows = decisions
        .iter()
        .map(|(id, decision)| {
            let pending = catalog.layout.find_intake_file(id).is_some();
            vec![
                (id.to_string(), None),
                (decision.as_str().to_string(), Some(decision_color(decision))),
                ((if pending { "yes" } else { "no" }).to_string(), None),
            ]
        })
        .collect();
    print_table_colored(&["Id", "Decision", "In intake"], rows);
    Ok(())
}
