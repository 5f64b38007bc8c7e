//! gifgate - GIF Intake Pipeline
//!
//! Validates incoming GIF files, deduplicates them by content, classifies each
//! into `auto_accept` / `needs_review` / `reject`, and files them into
//! lifecycle-stage directories while regenerating a machine-readable manifest
//! and a human review queue.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌─────────────┐
//! │  inbox/  │──▶│  parse   │──▶│  policy  │──▶│ organize │──▶│ manifest +  │
//! │ (intake) │   │ + hash   │   │ + tags   │   │ (opt-in) │   │ REVIEW.md   │
//! └──────────┘   └──────────┘   └──────────┘   └──────────┘   └─────────────┘
//!
//!      decisions.json ──▶ apply-decisions ──▶ approved/ | rejected/
//! ```
//!
//! # Core Concepts
//!
//! - **Stage**: which lifecycle directory a file currently sits in
//!   (intake, approved, rejected). Independent of its classification.
//! - **Reason**: a structured `{code, value?}` flag raised by the policy.
//! - **Decision**: a persisted human override keyed by asset id.

pub mod catalog;
pub mod config;

pub use catalog::{CatalogError, Result};
pub use config::{CatalogConfig, CatalogLayout};
