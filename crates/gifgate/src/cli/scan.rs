//! Scan command - classify the catalog and regenerate its outputs

use crate::cli::error::HelpfulError;
use crate::cli::output::{format_size, print_table, print_table_colored, status_color};
use crate::cli::{open_catalog, print_json};
use anyhow::{Context, Result};
use chrono::Utc;
use gifgate::catalog::{
    organize, write_outputs, ClassificationStatus, DecisionMap, IdCollision, Manifest,
    OrganizeReport, ScanError, ScanScope, ScanStats, Scanner, SourceIndex, StatusCounts,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

/// Arguments for the scan command
#[derive(Debug)]
pub struct ScanArgs {
    pub root: PathBuf,
    pub scope: ScanScope,
    pub organize: bool,
    pub max_kb: Option<f64>,
    pub reject_aspect: Option<f64>,
    pub review_aspect: Option<f64>,
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanSummary {
    scope: ScanScope,
    manifest: PathBuf,
    review: PathBuf,
    counts: StatusCounts,
    stats: ScanStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    organize: Option<OrganizeReport>,
    errors: Vec<ScanError>,
    collisions: Vec<IdCollision>,
}

/// Execute the scan command
pub fn run(args: ScanArgs) -> Result<()> {
    let catalog = open_catalog(&args.root)?;
    let layout = &catalog.layout;

    let thresholds = catalog.config.thresholds.with_overrides(
        args.max_kb,
        args.reject_aspect,
        args.review_aspect,
    );
    thresholds
        .validate()
        .map_err(|details| HelpfulError::invalid_threshold(&details))?;

    let decisions = DecisionMap::load(&layout.decisions);
    let mut sources = SourceIndex::load(&layout.sources);

    let mut result = Scanner::new(layout, thresholds)
        .scan(args.scope, &decisions, &sources)
        .context("Scan failed")?;

    let organize_report = if args.organize {
        let report = organize(&mut result.entries, layout, &mut sources);
        if report.moved() > 0 {
            if let Err(e) = sources.save(&layout.sources) {
                warn!(path = %layout.sources.display(), error = %e, "failed to update provenance sidecar");
            }
        }
        Some(report)
    } else {
        None
    };

    let manifest = Manifest::build(
        &result.entries,
        &result.errors,
        layout,
        args.scope,
        thresholds,
        Utc::now(),
    );
    write_outputs(layout, &manifest).context("Failed to write catalog outputs")?;

    let summary = ScanSummary {
        scope: args.scope,
        manifest: layout.manifest.clone(),
        review: layout.review.clone(),
        counts: manifest.counts,
        stats: result.stats,
        organize: organize_report,
        errors: result.errors,
        collisions: result.collisions,
    };

    if args.json {
        print_json(&summary)
    } else {
        print_summary(&summary);
        Ok(())
    }
}

fn print_summary(summary: &ScanSummary) {
    println!(
        "Scanned {} file(s) ({}) in scope '{}'",
        summary.stats.files_assessed,
        format_size(summary.stats.bytes_scanned),
        summary.scope.as_str()
    );
    println!();

    let counts = summary.counts;
    let rows = [
        (ClassificationStatus::AutoAccept, counts.auto_accept),
        (ClassificationStatus::NeedsReview, counts.needs_review),
        (ClassificationStatus::Reject, counts.reject),
    ]
    .into_iter()
    .map(|(status, n)| {
        vec![
            (status.as_str().to_string(), Some(status_color(status))),
            (n.to_string(), None),
        ]
    })
    .collect();
    print_table_colored(&["Status", "Count"], rows);

    if let Some(report) = &summary.organize {
        println!(
            "Relocated: {} approved, {} rejected, {} left for review",
            report.moved_approved, report.moved_rejected, report.left_for_review
        );
        for failure in &report.failures {
            println!("  FAILED {}: {}", failure.path, failure.message);
        }
    }

    if !summary.errors.is_empty() {
        println!();
        println!("Unreadable files ({}):", summary.errors.len());
        print_table(
            &["Path", "Error"],
            summary
                .errors
                .iter()
                .map(|e| vec![e.path.clone(), e.message.clone()])
                .collect(),
        );
    }

    if !summary.collisions.is_empty() {
        println!();
        println!("Id collisions ({}):", summary.collisions.len());
        print_table(
            &["Id", "First", "Second"],
            summary
                .collisions
                .iter()
                .map(|c| vec![c.id.clone(), c.first.clone(), c.second.clone()])
                .collect(),
        );
    }

    println!();
    println!("Manifest: {}", summary.manifest.display());
    println!("Review queue: {}", summary.review.display());
}
