//! Classification policy
//!
//! Every applicable check runs; nothing short-circuits. The verdict is then a
//! pure function of `(reasons, decision)`:
//!
//! 1. decision `reject`  → `reject`
//! 2. decision `approve` → `auto_accept` (even over `invalid`)
//! 3. any hard-reject reason → `reject`
//! 4. any reason at all → `needs_review`
//! 5. otherwise → `auto_accept`

use super::types::{ClassificationStatus, Decision, Reason, ReasonCode};
use gifgate_gif::GifMetadata;
use serde::{Deserialize, Serialize};

/// Width or height above this is `oversized_dimensions`.
pub const MAX_DIMENSION: u16 = 900;
/// Width or height below this is `tiny_dimensions`.
pub const MIN_DIMENSION: u16 = 18;
/// Fewer frames than this is `static_like`.
pub const MIN_FRAMES: u32 = 2;

pub const DEFAULT_MAX_KB: f64 = 1536.0;
pub const DEFAULT_REJECT_ASPECT: f64 = 5.0;
pub const DEFAULT_REVIEW_ASPECT: f64 = 3.6;

/// Tunable policy thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    #[serde(default = "default_max_kb", alias = "max_kb")]
    pub max_kb: f64,
    #[serde(default = "default_reject_aspect", alias = "reject_aspect")]
    pub reject_aspect: f64,
    #[serde(default = "default_review_aspect", alias = "review_aspect")]
    pub review_aspect: f64,
}

fn default_max_kb() -> f64 {
    DEFAULT_MAX_KB
}

fn default_reject_aspect() -> f64 {
    DEFAULT_REJECT_ASPECT
}

fn default_review_aspect() -> f64 {
    DEFAULT_REVIEW_ASPECT
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_kb: DEFAULT_MAX_KB,
            reject_aspect: DEFAULT_REJECT_ASPECT,
            review_aspect: DEFAULT_REVIEW_ASPECT,
        }
    }
}

impl Thresholds {
    /// Apply CLI overrides on top of configured values.
    pub fn with_overrides(
        mut self,
        max_kb: Option<f64>,
        reject_aspect: Option<f64>,
        review_aspect: Option<f64>,
    ) -> Self {
        if let Some(v) = max_kb {
            self.max_kb = v;
        }
        if let Some(v) = reject_aspect {
            self.reject_aspect = v;
        }
        if let Some(v) = review_aspect {
            self.review_aspect = v;
        }
        self
    }

    /// All thresholds must be finite and positive.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("maxKb", self.max_kb),
            ("rejectAspect", self.reject_aspect),
            ("reviewAspect", self.review_aspect),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be a positive number, got {}", name, value));
            }
        }
        Ok(())
    }
}

/// Inputs the policy looks at for one asset.
#[derive(Debug, Clone, Copy)]
pub struct PolicyInput<'a> {
    pub metadata: &'a GifMetadata,
    pub size_kb: f64,
    /// Content hash already seen earlier in this scan
    pub duplicate: bool,
}

/// Collect every applicable reason.
pub fn evaluate(input: PolicyInput<'_>, thresholds: &Thresholds) -> Vec<Reason> {
    let mut reasons = Vec::new();
    let meta = input.metadata;

    if let Some(error) = meta.error.filter(|_| !meta.valid) {
        reasons.push(Reason::with_value(ReasonCode::Invalid, error.kind()));
    }

    if input.duplicate {
        reasons.push(Reason::new(ReasonCode::Duplicate));
    }

    if input.size_kb > thresholds.max_kb {
        reasons.push(Reason::with_value(
            ReasonCode::TooLarge,
            format!("{}kb", input.size_kb.ceil() as u64),
        ));
    }

    if meta.valid {
        let (width, height) = meta.dimensions().unwrap_or((0, 0));
        reasons.extend(shape_reasons(width, height, meta.frames, thresholds));
    }

    reasons
}

fn shape_reasons(width: u16, height: u16, frames: u32, thresholds: &Thresholds) -> Vec<Reason> {
    let mut reasons = Vec::new();
    let dims = format!("{}x{}", width, height);

    if frames < MIN_FRAMES {
        reasons.push(Reason::with_value(ReasonCode::StaticLike, frames.to_string()));
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        reasons.push(Reason::with_value(ReasonCode::OversizedDimensions, dims.clone()));
    }
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        reasons.push(Reason::with_value(ReasonCode::TinyDimensions, dims));
    }

    let aspect = aspect_ratio(width, height);
    let value = format!("{:.2}", aspect);
    if outside_band(aspect, thresholds.reject_aspect) {
        reasons.push(Reason::with_value(ReasonCode::BannerRatioReject, value));
    } else if outside_band(aspect, thresholds.review_aspect) {
        reasons.push(Reason::with_value(ReasonCode::BannerRatio, value));
    }

    reasons
}

/// `width / height`, or 0 when height is 0.
pub fn aspect_ratio(width: u16, height: u16) -> f64 {
    if height == 0 {
        return 0.0;
    }
    f64::from(width) / f64::from(height)
}

fn outside_band(aspect: f64, limit: f64) -> bool {
    aspect > limit || aspect < 1.0 / limit
}

/// Final verdict. An explicit decision always wins over computed reasons.
pub fn derive_status(reasons: &[Reason], decision: Option<Decision>) -> ClassificationStatus {
    match decision {
        Some(Decision::Reject) => return ClassificationStatus::Reject,
        Some(Decision::Approve) => return ClassificationStatus::AutoAccept,
        None => {}
    }

    if reasons.iter().any(|r| r.code.is_hard_reject()) {
        ClassificationStatus::Reject
    } else if !reasons.is_empty() {
        ClassificationStatus::NeedsReview
    } else {
        ClassificationStatus::AutoAccept
    }
}
