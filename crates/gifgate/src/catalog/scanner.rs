//! Candidate discovery and per-asset classification
//!
//! # Design
//!
//! - Walk the scope with `walkdir`, sorted by file name, so the processing
//!   order (and therefore which copy of a duplicate counts as first) is stable
//! - Each asset is read, hashed, parsed, classified and tagged in isolation;
//!   a file that cannot be read becomes a [`ScanError`] and the batch goes on
//! - The seen-hash set is created per call and threaded through explicitly

use super::error::Result;
use super::hasher::{ContentHash, SeenHashes};
use super::policy::{derive_status, evaluate, PolicyInput, Thresholds};
use super::sidecar::{DecisionMap, SourceIndex};
use super::tagger::tag_file_name;
use super::types::{Asset, CatalogEntry, ReasonCode};
use crate::config::CatalogLayout;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Which part of the catalog a scan covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanScope {
    /// Intake directory only
    #[default]
    Inbox,
    /// The whole catalog root
    All,
}

impl ScanScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::All => "all",
        }
    }
}

impl FromStr for ScanScope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inbox" => Ok(Self::Inbox),
            "all" => Ok(Self::All),
            other => Err(format!("unknown scope '{}' (expected inbox or all)", other)),
        }
    }
}

/// A file that could not be assessed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanError {
    pub path: String,
    pub message: String,
}

/// Two assets sharing an id. Decisions and intake lookups cannot tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdCollision {
    pub id: String,
    pub first: String,
    pub second: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub files_discovered: usize,
    pub files_assessed: usize,
    pub bytes_scanned: u64,
    pub duplicates: usize,
    pub duration_ms: u64,
}

/// Result of a scan operation
#[derive(Debug, Default)]
pub struct ScanResult {
    /// In processing order
    pub entries: Vec<CatalogEntry>,
    pub errors: Vec<ScanError>,
    pub collisions: Vec<IdCollision>,
    pub stats: ScanStats,
}

/// One-shot catalog scanner.
pub struct Scanner<'a> {
    layout: &'a CatalogLayout,
    thresholds: Thresholds,
}

impl<'a> Scanner<'a> {
    pub fn new(layout: &'a CatalogLayout, thresholds: Thresholds) -> Self {
        Self { layout, thresholds }
    }

    /// Assess every candidate in `scope`.
    pub fn scan(
        &self,
        scope: ScanScope,
        decisions: &DecisionMap,
        sources: &SourceIndex,
    ) -> Result<ScanResult> {
        let start = Instant::now();
        let mut result = ScanResult::default();

        let base = match scope {
            ScanScope::Inbox => &self.layout.intake,
            ScanScope::All => &self.layout.root,
        };
        if !base.is_dir() {
            warn!(path = %base.display(), "scan directory does not exist, nothing to do");
            return Ok(result);
        }

        info!(scope = scope.as_str(), path = %base.display(), "starting scan");

        let candidates = self.discover(base, &mut result.errors);
        result.stats.files_discovered = candidates.len();

        let mut seen = SeenHashes::new();
        let mut ids: HashMap<String, String> = HashMap::new();

        for path in candidates {
            let bytes = match std::fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to read candidate");
                    result.errors.push(ScanError {
                        path: self.layout.rel_path(&path),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let entry = self.assess(path, &bytes, &mut seen, decisions, sources);

            if let Some(first) = ids.get(&entry.asset.id) {
                warn!(
                    id = %entry.asset.id,
                    first = %first,
                    second = %entry.asset.rel_path,
                    "id collision: decisions and intake lookups cannot tell these apart"
                );
                result.collisions.push(IdCollision {
                    id: entry.asset.id.clone(),
                    first: first.clone(),
                    second: entry.asset.rel_path.clone(),
                });
            } else {
                ids.insert(entry.asset.id.clone(), entry.asset.rel_path.clone());
            }

            result.stats.bytes_scanned += entry.asset.size;
            if entry.has_reason(ReasonCode::Duplicate) {
                result.stats.duplicates += 1;
            }
            result.entries.push(entry);
        }

        result.stats.files_assessed = result.entries.len();
        result.stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            assessed = result.stats.files_assessed,
            errors = result.errors.len(),
            duplicates = result.stats.duplicates,
            duration_ms = result.stats.duration_ms,
            "scan complete"
        );

        Ok(result)
    }

    /// Sorted `.gif` files under `base`. Walk errors are recorded, not fatal.
    fn discover(&self, base: &Path, errors: &mut Vec<ScanError>) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        for item in WalkDir::new(base).sort_by_file_name() {
            match item {
                Ok(entry) if entry.file_type().is_file() && is_gif(entry.path()) => {
                    candidates.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => {
                    let path = e
                        .path()
                        .map(|p| self.layout.rel_path(p))
                        .unwrap_or_default();
                    warn!(path = %path, error = %e, "walk error");
                    errors.push(ScanError {
                        path,
                        message: e.to_string(),
                    });
                }
            }
        }
        candidates
    }

    /// Hash, parse, classify and tag one file's bytes.
    pub fn assess(
        &self,
        path: PathBuf,
        bytes: &[u8],
        seen: &mut SeenHashes,
        decisions: &DecisionMap,
        sources: &SourceIndex,
    ) -> CatalogEntry {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let asset = Asset {
            rel_path: self.layout.rel_path(&path),
            file_name,
            id,
            size: bytes.len() as u64,
            hash: ContentHash::compute(bytes),
            path,
        };
        let stage = self.layout.stage_of(&asset.path);

        let duplicate = seen.observe(asset.hash);
        let metadata = gifgate_gif::parse(bytes);
        let reasons = evaluate(
            PolicyInput {
                metadata: &metadata,
                size_kb: asset.size_kb(),
                duplicate,
            },
            &self.thresholds,
        );
        let decision = decisions.get(&asset.id);
        let status = derive_status(&reasons, decision);
        let tags = tag_file_name(&asset.file_name);
        let provenance = sources.get(&asset.file_name).cloned();

        debug!(
            path = %asset.rel_path,
            status = %status,
            reasons = reasons.len(),
            "assessed"
        );

        CatalogEntry {
            asset,
            stage,
            metadata,
            reasons,
            status,
            decision,
            themes: tags.themes,
            mood: tags.mood,
            provenance,
        }
    }
}

/// `.gif` in any letter case.
pub(crate) fn is_gif(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("gif"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{ClassificationStatus, Decision, Stage};
    use crate::config::CatalogConfig;
    use gifgate_test_utils::{GifBuilder, TestCatalog};

    fn scan(catalog: &TestCatalog, scope: ScanScope, decisions: &DecisionMap) -> ScanResult {
        let layout = CatalogConfig::default().layout(catalog.root());
        Scanner::new(&layout, Thresholds::default())
            .scan(scope, decisions, &SourceIndex::default())
            .unwrap()
    }

    #[test]
    fn test_scope_parse() {
        assert_eq!("inbox".parse::<ScanScope>().unwrap(), ScanScope::Inbox);
        assert_eq!("ALL".parse::<ScanScope>().unwrap(), ScanScope::All);
        assert!("everything".parse::<ScanScope>().is_err());
    }

    #[test]
    fn test_only_gif_extension_is_candidate() {
        let catalog = TestCatalog::new();
        let gif = GifBuilder::new(50, 50).frames(3).build();
        catalog.drop_in_inbox("a.gif", &gif);
        catalog.drop_in_inbox("b.GIF", &gif);
        catalog.drop_in_inbox("notes.txt", b"hello");
        catalog.drop_in_inbox("sources.json", b"{}");

        let result = scan(&catalog, ScanScope::Inbox, &DecisionMap::default());
        let names: Vec<_> = result.entries.iter().map(|e| e.asset.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.gif", "b.GIF"]);
    }

    #[test]
    fn test_first_copy_is_not_duplicate() {
        let catalog = TestCatalog::new();
        let gif = GifBuilder::new(50, 50).frames(3).build();
        catalog.drop_in_inbox("a_first.gif", &gif);
        catalog.drop_in_inbox("b_second.gif", &gif);

        let result = scan(&catalog, ScanScope::Inbox, &DecisionMap::default());
        assert_eq!(result.entries.len(), 2);
        assert!(!result.entries[0].has_reason(ReasonCode::Duplicate));
        assert!(result.entries[1].has_reason(ReasonCode::Duplicate));
        assert_eq!(result.entries[1].status, ClassificationStatus::Reject);
        assert_eq!(result.stats.duplicates, 1);
    }

    #[test]
    fn test_duplicates_are_scan_scoped() {
        let catalog = TestCatalog::new();
        let gif = GifBuilder::new(50, 50).frames(3).build();
        catalog.drop_in_inbox("only.gif", &gif);

        for _ in 0..2 {
            let result = scan(&catalog, ScanScope::Inbox, &DecisionMap::default());
            assert!(!result.entries[0].has_reason(ReasonCode::Duplicate));
        }
    }

    #[test]
    fn test_inbox_scope_ignores_other_stages() {
        let catalog = TestCatalog::new();
        let gif = GifBuilder::new(50, 50).frames(3).build();
        catalog.write_file("approved/kept.gif", &gif);
        catalog.drop_in_inbox("fresh.gif", &gif);

        let inbox = scan(&catalog, ScanScope::Inbox, &DecisionMap::default());
        assert_eq!(inbox.entries.len(), 1);
        assert!(!inbox.entries[0].has_reason(ReasonCode::Duplicate));

        let all = scan(&catalog, ScanScope::All, &DecisionMap::default());
        assert_eq!(all.entries.len(), 2);
        let kept = all.entries.iter().find(|e| e.asset.id == "kept").unwrap();
        assert_eq!(kept.stage, Stage::Approved);
        // approved/ sorts before inbox/, so the inbox copy is the duplicate
        let fresh = all.entries.iter().find(|e| e.asset.id == "fresh").unwrap();
        assert!(fresh.has_reason(ReasonCode::Duplicate));
    }

    #[test]
    fn test_decision_applied_to_status() {
        let catalog = TestCatalog::new();
        catalog.drop_in_inbox("broken.gif", b"GIF89a but not really a gif");
        let mut decisions = DecisionMap::default();
        decisions.set("broken", Decision::Approve);

        let result = scan(&catalog, ScanScope::Inbox, &decisions);
        let entry = &result.entries[0];
        assert!(entry.has_reason(ReasonCode::Invalid));
        assert_eq!(entry.decision, Some(Decision::Approve));
        assert_eq!(entry.status, ClassificationStatus::AutoAccept);
    }

    #[test]
    fn test_id_collision_reported_without_changing_status() {
        let catalog = TestCatalog::new();
        catalog.drop_in_inbox("a/same.gif", &GifBuilder::new(50, 50).frames(3).build());
        catalog.drop_in_inbox("b/same.gif", &GifBuilder::new(60, 60).frames(3).build());

        let result = scan(&catalog, ScanScope::Inbox, &DecisionMap::default());
        assert_eq!(result.collisions.len(), 1);
        assert_eq!(result.collisions[0].id, "same");
        assert_eq!(result.collisions[0].first, "inbox/a/same.gif");
        assert!(result
            .entries
            .iter()
            .all(|e| e.status == ClassificationStatus::AutoAccept));
    }

    #[test]
    fn test_missing_intake_is_empty() {
        let catalog = TestCatalog::new();
        std::fs::remove_dir_all(catalog.inbox()).unwrap();
        let result = scan(&catalog, ScanScope::Inbox, &DecisionMap::default());
        assert!(result.entries.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_provenance_attached_by_file_name() {
        let catalog = TestCatalog::new();
        catalog.drop_in_inbox("siren.gif", &GifBuilder::new(50, 50).frames(3).build());
        catalog.write_sources(&serde_json::json!({
            "siren.gif": {"sourceUrl": "https://example.test/siren.gif", "query": "siren"}
        }));

        let layout = CatalogConfig::default().layout(catalog.root());
        let sources = SourceIndex::load(&layout.sources);
        let result = Scanner::new(&layout, Thresholds::default())
            .scan(ScanScope::Inbox, &DecisionMap::default(), &sources)
            .unwrap();
        let prov = result.entries[0].provenance.as_ref().unwrap();
        assert_eq!(prov.query.as_deref(), Some("siren"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_is_isolated() {
        use std::os::unix::fs::PermissionsExt;

        let catalog = TestCatalog::new();
        let gif = GifBuilder::new(50, 50).frames(3).build();
        catalog.drop_in_inbox("good.gif", &gif);
        let locked = catalog.drop_in_inbox("locked.gif", b"GIF89a-locked-content");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop root; nothing to assert in that case.
        if std::fs::read(&locked).is_ok() {
            return;
        }

        let result = scan(&catalog, ScanScope::Inbox, &DecisionMap::default());
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "inbox/locked.gif");
    }
}
