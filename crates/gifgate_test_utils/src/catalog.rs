//! Temporary catalog roots with the default stage layout.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const INBOX: &str = "inbox";
pub const APPROVED: &str = "approved";
pub const REJECTED: &str = "rejected";
pub const DECISIONS_FILE: &str = "decisions.json";
pub const SOURCES_FILE: &str = "sources.json";

/// RAII catalog root. The directory tree is deleted on drop.
pub struct TestCatalog {
    _temp: TempDir,
    root: PathBuf,
}

impl TestCatalog {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let root = temp.path().join("catalog");
        for stage in [INBOX, APPROVED, REJECTED] {
            fs::create_dir_all(root.join(stage)).expect("Failed to create stage dir");
        }
        Self { _temp: temp, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn inbox(&self) -> PathBuf {
        self.root.join(INBOX)
    }

    pub fn approved(&self) -> PathBuf {
        self.root.join(APPROVED)
    }

    pub fn rejected(&self) -> PathBuf {
        self.root.join(REJECTED)
    }

    /// Write `bytes` to `rel` under the root, creating parents.
    pub fn write_file(&self, rel: &str, bytes: &[u8]) -> PathBuf {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, bytes).expect("Failed to write file");
        path
    }

    pub fn drop_in_inbox(&self, name: &str, bytes: &[u8]) -> PathBuf {
        self.write_file(&format!("{}/{}", INBOX, name), bytes)
    }

    pub fn write_decisions(&self, decisions: &serde_json::Value) -> PathBuf {
        let text = serde_json::to_string_pretty(decisions).expect("Failed to encode decisions");
        self.write_file(DECISIONS_FILE, text.as_bytes())
    }

    pub fn write_sources(&self, sources: &serde_json::Value) -> PathBuf {
        let text = serde_json::to_string_pretty(sources).expect("Failed to encode sources");
        self.write_file(&format!("{}/{}", INBOX, SOURCES_FILE), text.as_bytes())
    }

    pub fn read_json(&self, rel: &str) -> serde_json::Value {
        let text = fs::read_to_string(self.root.join(rel)).expect("Failed to read JSON file");
        serde_json::from_str(&text).expect("Failed to parse JSON file")
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.root.join(rel).exists()
    }
}

impl Default for TestCatalog {
    fn default() -> Self {
        Self::new()
    }
}
