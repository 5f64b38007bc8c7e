//! Replay persisted decisions against files still in intake
//!
//! Independent of scanning: nothing is parsed or classified here. The
//! decision map is read-only, so applying it again is safe and every
//! already-moved id simply counts as skipped.

use super::fsops::relocate;
use super::organizer::RelocationFailure;
use super::sidecar::DecisionMap;
use super::types::Decision;
use crate::config::CatalogLayout;
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    pub moved_approved: usize,
    pub moved_rejected: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RelocationFailure>,
}

/// Move `<intake>/<id>.gif` into the stage named by each decision.
pub fn apply_decisions(layout: &CatalogLayout, decisions: &DecisionMap) -> ApplyReport {
    let mut report = ApplyReport::default();

    for (id, decision) in decisions.iter() {
        if !is_plain_id(id) {
            warn!(id = %id, "ignoring decision with a path-like id");
            report.skipped += 1;
            continue;
        }

        let Some(source) = layout.find_intake_file(id) else {
            debug!(id = %id, "no intake file, skipping");
            report.skipped += 1;
            continue;
        };

        let dir = match decision {
            Decision::Approve => &layout.approved,
            Decision::Reject => &layout.rejected,
        };
        let Some(file_name) = source.file_name() else {
            report.skipped += 1;
            continue;
        };
        let dest = dir.join(file_name);

        match relocate(&source, &dest) {
            Ok(_) => {
                info!(id = %id, decision = decision.as_str(), "applied decision");
                match decision {
                    Decision::Approve => report.moved_approved += 1,
                    Decision::Reject => report.moved_rejected += 1,
                }
            }
            Err(e) => {
                warn!(id = %id, error = %e, "failed to apply decision");
                report.failures.push(RelocationFailure {
                    path: layout.rel_path(&source),
                    message: e.to_string(),
                });
            }
        }
    }

    report
}

/// Ids are bare file stems; anything that could escape the intake dir is refused.
fn is_plain_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(['/', '\\']) && id != "." && id != ".."
}

/// Turn user input (`siren`, `siren.gif`, `ALARM.GIF`) into a decision id.
///
/// The extension is dropped before the id is checked, so `..gif` is refused.
pub fn normalize_id(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let split = trimmed.len().saturating_sub(4);
    let id = match trimmed.get(split..) {
        Some(ext) if ext.eq_ignore_ascii_case(".gif") => &trimmed[..split],
        _ => trimmed,
    };
    is_plain_id(id).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use gifgate_test_utils::{GifBuilder, TestCatalog};

    fn decisions(pairs: &[(&str, Decision)]) -> DecisionMap {
        let mut map = DecisionMap::default();
        for (id, d) in pairs {
            map.set(*id, *d);
        }
        map
    }

    #[test]
    fn test_apply_moves_and_skips() {
        let catalog = TestCatalog::new();
        let gif = GifBuilder::new(50, 50).frames(3).build();
        catalog.drop_in_inbox("keep.gif", &gif);
        catalog.drop_in_inbox("drop.gif", b"whatever");
        let layout = CatalogConfig::default().layout(catalog.root());
        let map = decisions(&[
            ("keep", Decision::Approve),
            ("drop", Decision::Reject),
            ("ghost", Decision::Approve),
        ]);

        let report = apply_decisions(&layout, &map);
        assert_eq!(report.moved_approved, 1);
        assert_eq!(report.moved_rejected, 1);
        assert_eq!(report.skipped, 1);
        assert!(catalog.exists("approved/keep.gif"));
        assert!(catalog.exists("rejected/drop.gif"));
    }

    #[test]
    fn test_second_run_skips_everything() {
        let catalog = TestCatalog::new();
        catalog.drop_in_inbox("a.gif", b"a");
        catalog.drop_in_inbox("b.gif", b"b");
        let layout = CatalogConfig::default().layout(catalog.root());
        let map = decisions(&[("a", Decision::Approve), ("b", Decision::Reject)]);

        apply_decisions(&layout, &map);
        let second = apply_decisions(&layout, &map);
        assert_eq!(
            second,
            ApplyReport {
                moved_approved: 0,
                moved_rejected: 0,
                skipped: 2,
                failures: vec![]
            }
        );
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_path_like_ids_refused() {
        let catalog = TestCatalog::new();
        catalog.write_file("secret.gif", b"outside intake");
        let layout = CatalogConfig::default().layout(catalog.root());
        let map = decisions(&[("../secret", Decision::Reject), ("..", Decision::Reject)]);

        let report = apply_decisions(&layout, &map);
        assert_eq!(report.skipped, 2);
        assert!(catalog.exists("secret.gif"));
    }

    #[test]
    fn test_uppercase_extension_is_applied() {
        let catalog = TestCatalog::new();
        catalog.drop_in_inbox("ALARM.GIF", &GifBuilder::new(50, 50).frames(3).build());
        let layout = CatalogConfig::default().layout(catalog.root());
        let map = decisions(&[("ALARM", Decision::Approve)]);

        let report = apply_decisions(&layout, &map);
        assert_eq!(report.moved_approved, 1);
        assert_eq!(report.skipped, 0);
        assert!(catalog.exists("approved/ALARM.GIF"));
        assert!(!catalog.exists("inbox/ALARM.GIF"));
    }

    #[test]
    fn test_replaces_older_copy_in_stage() {
        let catalog = TestCatalog::new();
        let refetched = GifBuilder::new(50, 50).frames(3).build();
        catalog.write_file("approved/siren.gif", b"older bytes");
        catalog.drop_in_inbox("siren.gif", &refetched);
        let layout = CatalogConfig::default().layout(catalog.root());

        let report = apply_decisions(&layout, &decisions(&[("siren", Decision::Approve)]));
        assert_eq!(report.moved_approved, 1);
        assert!(report.failures.is_empty());
        assert!(!catalog.exists("inbox/siren.gif"));
        let on_disk = std::fs::read(catalog.approved().join("siren.gif")).unwrap();
        assert_eq!(on_disk, refetched);
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("siren"), Some("siren"));
        assert_eq!(normalize_id(" siren.gif "), Some("siren"));
        assert_eq!(normalize_id("X.GIF"), Some("X"));
        assert_eq!(normalize_id("wave.Gif"), Some("wave"));
        assert_eq!(normalize_id("siren.v2"), Some("siren.v2"));
        assert_eq!(normalize_id("..gif"), None);
        assert_eq!(normalize_id(".gif"), None);
        assert_eq!(normalize_id("../escape"), None);
        assert_eq!(normalize_id("   "), None);
    }

    #[test]
    fn test_plain_id() {
        assert!(is_plain_id("siren"));
        assert!(is_plain_id("siren.v2"));
        assert!(!is_plain_id(""));
        assert!(!is_plain_id("a/b"));
        assert!(!is_plain_id("a\\b"));
    }
}
