//! Core types for the catalog pipeline
//!
//! An asset's **stage** (which directory it sits in) and its
//! **classification status** (what the policy thinks of it) are separate
//! axes. Only the organizer and the decision applier turn one into the other.

use super::hasher::ContentHash;
use super::tagger::{Mood, Theme};
use gifgate_gif::GifMetadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ============================================================================
// Lifecycle
// ============================================================================

/// Lifecycle stage, derived from where the file currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Intake,
    Approved,
    Rejected,
    /// Somewhere else under the catalog root
    Other,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Other => "other",
        }
    }
}

// ============================================================================
// Reasons
// ============================================================================

/// Machine-readable flag codes raised by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    Invalid,
    Duplicate,
    TooLarge,
    StaticLike,
    OversizedDimensions,
    TinyDimensions,
    BannerRatio,
    BannerRatioReject,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Duplicate => "duplicate",
            Self::TooLarge => "too_large",
            Self::StaticLike => "static_like",
            Self::OversizedDimensions => "oversized_dimensions",
            Self::TinyDimensions => "tiny_dimensions",
            Self::BannerRatio => "banner_ratio",
            Self::BannerRatioReject => "banner_ratio_reject",
        }
    }

    /// Codes that force `reject` when no decision overrides them.
    pub fn is_hard_reject(&self) -> bool {
        matches!(
            self,
            Self::Invalid | Self::Duplicate | Self::TooLarge | Self::BannerRatioReject
        )
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `{code, value?}` flag. Several may attach to one asset; they are never
/// merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub code: ReasonCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Reason {
    pub fn new(code: ReasonCode) -> Self {
        Self { code, value: None }
    }

    pub fn with_value(code: ReasonCode, value: impl Into<String>) -> Self {
        Self {
            code,
            value: Some(value.into()),
        }
    }
}

/// Renders as `code` or `code:value`.
impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}:{}", self.code, value),
            None => write!(f, "{}", self.code),
        }
    }
}

// ============================================================================
// Verdicts and decisions
// ============================================================================

/// Final verdict for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationStatus {
    AutoAccept,
    NeedsReview,
    Reject,
}

impl ClassificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutoAccept => "auto_accept",
            Self::NeedsReview => "needs_review",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for ClassificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human override persisted in the decision map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

// ============================================================================
// Assets
// ============================================================================

/// Upstream fetch metadata from the intake sidecar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

/// A candidate file found by the scanner.
#[derive(Debug, Clone)]
pub struct Asset {
    /// Absolute path
    pub path: PathBuf,
    /// Path relative to the catalog root, `/`-separated
    pub rel_path: String,
    pub file_name: String,
    /// File name without extension; the key for decisions
    pub id: String,
    pub size: u64,
    pub hash: ContentHash,
}

impl Asset {
    pub fn size_kb(&self) -> f64 {
        self.size as f64 / 1024.0
    }
}

/// Everything the pipeline knows about one asset after a scan.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub asset: Asset,
    pub stage: Stage,
    pub metadata: GifMetadata,
    pub reasons: Vec<Reason>,
    pub status: ClassificationStatus,
    pub decision: Option<Decision>,
    pub themes: Vec<Theme>,
    pub mood: Mood,
    pub provenance: Option<Provenance>,
}

impl CatalogEntry {
    pub fn has_reason(&self, code: ReasonCode) -> bool {
        self.reasons.iter().any(|r| r.code == code)
    }

    /// Reasons rendered as `code[:value]` strings.
    pub fn reason_strings(&self) -> Vec<String> {
        self.reasons.iter().map(ToString::to_string).collect()
    }
}
