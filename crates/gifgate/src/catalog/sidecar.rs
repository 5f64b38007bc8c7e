//! JSON sidecars: the decision map and the intake provenance index
//!
//! Both load with the same rule: a missing file is an empty map, and an
//! unreadable or schema-mismatched file is logged and treated as empty.

use super::error::Result;
use super::fsops::write_atomic;
use super::types::{Decision, Provenance};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

fn load_or_default<T>(path: &Path, what: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable {}, using empty default", what);
            return T::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed {}, using empty default", what);
            T::default()
        }
    }
}

fn save_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    write_atomic(path, json.as_bytes())
}

/// Human overrides keyed by asset id.
///
/// Only [`DecisionMap::clear`] removes an entry; nothing in the pipeline
/// clears decisions on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionMap(BTreeMap<String, Decision>);

impl DecisionMap {
    pub fn load(path: &Path) -> Self {
        load_or_default(path, "decision map")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_pretty(path, self)
    }

    pub fn get(&self, id: &str) -> Option<Decision> {
        self.0.get(id).copied()
    }

    /// Record a decision, returning the previous one.
    pub fn set(&mut self, id: impl Into<String>, decision: Decision) -> Option<Decision> {
        self.0.insert(id.into(), decision)
    }

    pub fn clear(&mut self, id: &str) -> Option<Decision> {
        self.0.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decision)> {
        self.0.iter().map(|(id, d)| (id.as_str(), *d))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Provenance sidecar in the intake directory, keyed by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceIndex(BTreeMap<String, Provenance>);

impl SourceIndex {
    pub fn load(path: &Path) -> Self {
        load_or_default(path, "provenance sidecar")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_pretty(path, self)
    }

    pub fn get(&self, file_name: &str) -> Option<&Provenance> {
        self.0.get(file_name)
    }

    /// Record the stage folder a file now lives in. Creates a bare record
    /// for files that arrived without provenance.
    pub fn set_folder(&mut self, file_name: &str, folder: &str) {
        self.0.entry(file_name.to_string()).or_default().folder = Some(folder.to_string());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
