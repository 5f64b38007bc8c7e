//! Command-line interface for gifgate
//!
//! Every command resolves the catalog root first, then loads
//! `<root>/gifgate.toml` on top of the built-in defaults.

pub mod apply;
pub mod config;
pub mod decide;
pub mod error;
pub mod output;
pub mod scan;

use crate::cli::error::HelpfulError;
use anyhow::Result;
use gifgate::catalog::CatalogError;
use gifgate::config::CONFIG_FILE_NAME;
use gifgate::{CatalogConfig, CatalogLayout};
use std::path::Path;

/// Resolved configuration for one catalog root.
pub struct Catalog {
    pub config: CatalogConfig,
    pub layout: CatalogLayout,
}

/// Check the root exists and load its config.
pub fn open_catalog(root: &Path) -> Result<Catalog> {
    if !root.is_dir() {
        return Err(HelpfulError::root_not_found(root).into());
    }

    let config = match CatalogConfig::load_for_root(root) {
        Ok(config) => config,
        Err(CatalogError::Config(details)) => {
            return Err(HelpfulError::bad_config(&root.join(CONFIG_FILE_NAME), &details).into());
        }
        Err(e) => return Err(e.into()),
    };
    let layout = config.layout(root);
    Ok(Catalog { config, layout })
}

/// Serialize `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
