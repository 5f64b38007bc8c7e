//! Manifest and review-queue documents
//!
//! Both are regenerated in full on every scan and written atomically.

use super::error::Result;
use super::fsops::write_atomic;
use super::policy::Thresholds;
use super::scanner::{ScanError, ScanScope};
use super::tagger::{Mood, Theme};
use super::types::{CatalogEntry, ClassificationStatus, Decision, Provenance, Stage};
use crate::config::CatalogLayout;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use tracing::info;

/// Per-status totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub total: usize,
    pub auto_accept: usize,
    pub needs_review: usize,
    pub reject: usize,
}

impl StatusCounts {
    pub fn tally(statuses: impl IntoIterator<Item = ClassificationStatus>) -> Self {
        let mut counts = Self::default();
        for status in statuses {
            counts.total += 1;
            match status {
                ClassificationStatus::AutoAccept => counts.auto_accept += 1,
                ClassificationStatus::NeedsReview => counts.needs_review += 1,
                ClassificationStatus::Reject => counts.reject += 1,
            }
        }
        counts
    }
}

/// One asset as seen by downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub id: String,
    pub file_name: String,
    pub rel_path: String,
    pub web_path: String,
    pub stage: Stage,
    pub folder: String,
    pub status: ClassificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
    pub reasons: Vec<String>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub frames: u32,
    pub size_bytes: u64,
    pub size_kb: f64,
    pub hash: String,
    pub themes: Vec<Theme>,
    pub mood: Mood,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

impl ManifestEntry {
    pub fn project(entry: &CatalogEntry, layout: &CatalogLayout) -> Self {
        let asset = &entry.asset;
        Self {
            id: asset.id.clone(),
            file_name: asset.file_name.clone(),
            rel_path: asset.rel_path.clone(),
            web_path: layout.web_path(&asset.rel_path),
            stage: entry.stage,
            folder: layout.folder_of(&asset.path),
            status: entry.status,
            decision: entry.decision,
            reasons: entry.reason_strings(),
            valid: entry.metadata.valid,
            error: entry.metadata.error.map(|e| e.kind()),
            width: entry.metadata.width,
            height: entry.metadata.height,
            frames: entry.metadata.frames,
            size_bytes: asset.size,
            size_kb: round2(asset.size_kb()),
            hash: asset.hash.to_hex(),
            themes: entry.themes.clone(),
            mood: entry.mood,
            provenance: entry.provenance.clone(),
        }
    }

    fn dimensions(&self) -> String {
        match (self.width, self.height) {
            (Some(w), Some(h)) => format!("{}x{}", w, h),
            _ => "?".to_string(),
        }
    }
}

/// Full snapshot of one scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub generated_at: String,
    pub scope: ScanScope,
    pub thresholds: Thresholds,
    pub counts: StatusCounts,
    /// Sorted by `relPath`
    pub entries: Vec<ManifestEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ScanError>,
}

impl Manifest {
    pub fn build(
        entries: &[CatalogEntry],
        errors: &[ScanError],
        layout: &CatalogLayout,
        scope: ScanScope,
        thresholds: Thresholds,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let mut projected: Vec<ManifestEntry> = entries
            .iter()
            .map(|e| ManifestEntry::project(e, layout))
            .collect();
        projected.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));

        Self {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            scope,
            thresholds,
            counts: StatusCounts::tally(projected.iter().map(|e| e.status)),
            entries: projected,
            errors: errors.to_vec(),
        }
    }

    pub fn review_queue(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries
            .iter()
            .filter(|e| e.status == ClassificationStatus::NeedsReview)
    }
}

/// Markdown review queue for `needs_review` entries.
pub fn render_review_queue(manifest: &Manifest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Review queue");
    let _ = writeln!(out);
    let _ = writeln!(out, "Generated {}.", manifest.generated_at);
    let _ = writeln!(out);

    let queue: Vec<&ManifestEntry> = manifest.review_queue().collect();
    if queue.is_empty() {
        let _ = writeln!(out, "_Nothing to review._");
        return out;
    }

    let _ = writeln!(out, "| Path | Size | Dimensions | Frames | Themes | Reasons |");
    let _ = writeln!(out, "| --- | ---: | --- | ---: | --- | --- |");
    for entry in queue {
        let themes: Vec<&str> = entry.themes.iter().map(Theme::as_str).collect();
        let _ = writeln!(
            out,
            "| {} | {:.1} KB | {} | {} | {} | {} |",
            escape_cell(&entry.rel_path),
            entry.size_kb,
            entry.dimensions(),
            entry.frames,
            themes.join(", "),
            escape_cell(&entry.reasons.join(", ")),
        );
    }
    out
}

/// Write `manifest.json` and the review queue.
pub fn write_outputs(layout: &CatalogLayout, manifest: &Manifest) -> Result<()> {
    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    write_atomic(&layout.manifest, json.as_bytes())?;
    write_atomic(&layout.review, render_review_queue(manifest).as_bytes())?;

    info!(
        manifest = %layout.manifest.display(),
        review = %layout.review.display(),
        entries = manifest.counts.total,
        needs_review = manifest.counts.needs_review,
        "wrote catalog outputs"
    );
    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
