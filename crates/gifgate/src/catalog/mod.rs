//! Catalog pipeline: discovery, classification, outputs and lifecycle moves
//!
//! A scan walks the candidate set, parses and hashes each file, runs the
//! policy and tagger, and yields [`CatalogEntry`] values. The manifest writer
//! turns those into `manifest.json` + `REVIEW.md`; the organizer and the
//! decision applier move files between stage directories.

pub mod applier;
pub mod error;
pub mod fsops;
pub mod hasher;
pub mod manifest;
pub mod organizer;
pub mod policy;
pub mod scanner;
pub mod sidecar;
pub mod tagger;
pub mod types;

pub use applier::{apply_decisions, normalize_id, ApplyReport};
pub use error::{CatalogError, Result};
pub use fsops::{relocate, write_atomic, Relocation};
pub use hasher::{ContentHash, SeenHashes};
pub use manifest::{render_review_queue, write_outputs, Manifest, ManifestEntry, StatusCounts};
pub use organizer::{organize, OrganizeReport, RelocationFailure};
pub use policy::{derive_status, evaluate, PolicyInput, Thresholds};
pub use scanner::{IdCollision, ScanError, ScanResult, ScanScope, ScanStats, Scanner};
pub use sidecar::{DecisionMap, SourceIndex};
pub use tagger::{tag_file_name, Mood, Tags, Theme};
pub use types::{
    Asset, CatalogEntry, ClassificationStatus, Decision, Provenance, Reason, ReasonCode, Stage,
};
