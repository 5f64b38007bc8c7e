//! Turn verdicts into lifecycle moves for assets still in intake
//!
//! `auto_accept` goes to approved, `reject` to rejected, `needs_review`
//! stays put. Assets outside the intake stage are never touched.

use super::fsops::relocate;
use super::sidecar::SourceIndex;
use super::types::{CatalogEntry, ClassificationStatus, Stage};
use crate::config::CatalogLayout;
use serde::Serialize;
use tracing::{info, warn};

/// A move that could not be completed. The asset keeps its old path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelocationFailure {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizeReport {
    pub moved_approved: usize,
    pub moved_rejected: usize,
    pub left_for_review: usize,
    pub failures: Vec<RelocationFailure>,
}

impl OrganizeReport {
    pub fn moved(&self) -> usize {
        self.moved_approved + self.moved_rejected
    }
}

/// Relocate intake entries by status and update them in place.
///
/// Moved entries get new paths and stage, and their provenance `folder` is
/// set in both the entry and `sources`. The caller persists `sources`.
pub fn organize(
    entries: &mut [CatalogEntry],
    layout: &CatalogLayout,
    sources: &mut SourceIndex,
) -> OrganizeReport {
    let mut report = OrganizeReport::default();

    for entry in entries.iter_mut().filter(|e| e.stage == Stage::Intake) {
        let target = match entry.status {
            ClassificationStatus::AutoAccept => Stage::Approved,
            ClassificationStatus::Reject => Stage::Rejected,
            ClassificationStatus::NeedsReview => {
                report.left_for_review += 1;
                continue;
            }
        };
        let Some(dir) = layout.stage_dir(target) else {
            continue;
        };
        let dest = dir.join(&entry.asset.file_name);

        if let Err(e) = relocate(&entry.asset.path, &dest) {
            warn!(path = %entry.asset.rel_path, error = %e, "relocation failed");
            report.failures.push(RelocationFailure {
                path: entry.asset.rel_path.clone(),
                message: e.to_string(),
            });
            continue;
        }

        let folder = layout.folder_of(&dest);
        info!(
            id = %entry.asset.id,
            status = %entry.status,
            folder = %folder,
            "relocated"
        );

        entry.asset.rel_path = layout.rel_path(&dest);
        entry.asset.path = dest;
        entry.stage = target;
        entry
            .provenance
            .get_or_insert_with(Default::default)
            .folder = Some(folder.clone());
        sources.set_folder(&entry.asset.file_name, &folder);

        match target {
            Stage::Approved => report.moved_approved += 1,
            _ => report.moved_rejected += 1,
        }
    }

    report
}
