//! Catalog layout configuration
//!
//! Resolution: built-in defaults, then `<root>/gifgate.toml` if present, then
//! CLI overrides applied by the command layer.

use crate::catalog::policy::Thresholds;
use crate::catalog::scanner::is_gif;
use crate::catalog::types::Stage;
use crate::catalog::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Config file looked up at the catalog root.
pub const CONFIG_FILE_NAME: &str = "gifgate.toml";

/// Layout and policy settings for one catalog root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Intake stage directory, relative to the root
    #[serde(default = "default_intake_dir")]
    pub intake_dir: String,

    #[serde(default = "default_approved_dir")]
    pub approved_dir: String,

    #[serde(default = "default_rejected_dir")]
    pub rejected_dir: String,

    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,

    #[serde(default = "default_review_file")]
    pub review_file: String,

    #[serde(default = "default_decisions_file")]
    pub decisions_file: String,

    /// Provenance sidecar, relative to the intake directory
    #[serde(default = "default_sources_file")]
    pub sources_file: String,

    /// Prefix for the web-servable path of each manifest entry
    #[serde(default = "default_web_prefix")]
    pub web_prefix: String,

    #[serde(default)]
    pub thresholds: Thresholds,
}

fn default_intake_dir() -> String {
    "inbox".to_string()
}

fn default_approved_dir() -> String {
    "approved".to_string()
}

fn default_rejected_dir() -> String {
    "rejected".to_string()
}

fn default_manifest_file() -> String {
    "manifest.json".to_string()
}

fn default_review_file() -> String {
    "REVIEW.md".to_string()
}

fn default_decisions_file() -> String {
    "decisions.json".to_string()
}

fn default_sources_file() -> String {
    "sources.json".to_string()
}

fn default_web_prefix() -> String {
    "/gifs".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            intake_dir: default_intake_dir(),
            approved_dir: default_approved_dir(),
            rejected_dir: default_rejected_dir(),
            manifest_file: default_manifest_file(),
            review_file: default_review_file(),
            decisions_file: default_decisions_file(),
            sources_file: default_sources_file(),
            web_prefix: default_web_prefix(),
            thresholds: Thresholds::default(),
        }
    }
}

impl CatalogConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CatalogConfig =
            toml::from_str(&content).map_err(|e| CatalogError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// `<root>/gifgate.toml` when present, defaults otherwise.
    pub fn load_for_root(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            debug!(path = %path.display(), "loading catalog config");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CatalogError::Config(e.to_string()))?;
        crate::catalog::fsops::write_atomic(path, content.as_bytes())
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate().map_err(CatalogError::Config)?;
        if self.thresholds.reject_aspect < self.thresholds.review_aspect {
            warn!(
                reject_aspect = self.thresholds.reject_aspect,
                review_aspect = self.thresholds.review_aspect,
                "reject aspect is below review aspect; banner_ratio will never be raised"
            );
        }
        for (name, dir) in [
            ("intake_dir", &self.intake_dir),
            ("approved_dir", &self.approved_dir),
            ("rejected_dir", &self.rejected_dir),
        ] {
            if dir.trim().is_empty() {
                return Err(CatalogError::Config(format!("{} must not be empty", name)));
            }
        }
        Ok(())
    }

    /// Resolve every path against `root`.
    pub fn layout(&self, root: &Path) -> CatalogLayout {
        let intake = root.join(&self.intake_dir);
        CatalogLayout {
            root: root.to_path_buf(),
            sources: intake.join(&self.sources_file),
            intake,
            approved: root.join(&self.approved_dir),
            rejected: root.join(&self.rejected_dir),
            manifest: root.join(&self.manifest_file),
            review: root.join(&self.review_file),
            decisions: root.join(&self.decisions_file),
            web_prefix: self.web_prefix.trim_end_matches('/').to_string(),
        }
    }
}

/// Absolute paths for one catalog root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogLayout {
    pub root: PathBuf,
    pub intake: PathBuf,
    pub approved: PathBuf,
    pub rejected: PathBuf,
    pub manifest: PathBuf,
    pub review: PathBuf,
    pub decisions: PathBuf,
    pub sources: PathBuf,
    pub web_prefix: String,
}

impl CatalogLayout {
    /// Stage implied by where `path` sits.
    pub fn stage_of(&self, path: &Path) -> Stage {
        if path.starts_with(&self.intake) {
            Stage::Intake
        } else if path.starts_with(&self.approved) {
            Stage::Approved
        } else if path.starts_with(&self.rejected) {
            Stage::Rejected
        } else {
            Stage::Other
        }
    }

    /// Directory for a lifecycle stage; `None` for [`Stage::Other`].
    pub fn stage_dir(&self, stage: Stage) -> Option<&Path> {
        match stage {
            Stage::Intake => Some(&self.intake),
            Stage::Approved => Some(&self.approved),
            Stage::Rejected => Some(&self.rejected),
            Stage::Other => None,
        }
    }

    /// Folder name reported for `path`: the stage directory relative to the
    /// root, or the first path component for files outside every stage.
    pub fn folder_of(&self, path: &Path) -> String {
        match self.stage_dir(self.stage_of(path)) {
            Some(dir) => self.rel_path(dir),
            None => {
                let rel = self.rel_path(path);
                match rel.split_once('/') {
                    Some((first, _)) => first.to_string(),
                    None => String::new(),
                }
            }
        }
    }

    /// `/`-separated path relative to the root.
    pub fn rel_path(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn web_path(&self, rel_path: &str) -> String {
        format!("{}/{}", self.web_prefix, rel_path)
    }

    /// Intake file a decision id refers to: `<id>.gif` directly in intake,
    /// matching the extension in any case as the scanner does.
    pub fn find_intake_file(&self, id: &str) -> Option<PathBuf> {
        let conventional = self.intake.join(format!("{}.gif", id));
        if conventional.is_file() {
            return Some(conventional);
        }
        let mut matches: Vec<PathBuf> = fs::read_dir(&self.intake)
            .ok()?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                is_gif(path) && path.file_stem().is_some_and(|stem| stem == id) && path.is_file()
            })
            .collect();
        matches.sort();
        matches.into_iter().next()
    }
}
