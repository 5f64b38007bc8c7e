//! Config command - show the resolved catalog layout

use crate::cli::open_catalog;
use gifgate::config::CONFIG_FILE_NAME;
use gifgate_logging::{gifgate_home, logs_dir};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct ConfigArgs {
    pub root: PathBuf,
    pub json: bool,
}

fn exists_word(path: &Path) -> &'static str {
    if path.exists() {
        "exists"
    } else {
        "not found"
    }
}

/// Run the config command - shows resolved paths and thresholds
pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let catalog = open_catalog(&args.root)?;
    let layout = &catalog.layout;
    let thresholds = catalog.config.thresholds;
    let config_file = layout.root.join(CONFIG_FILE_NAME);

    let paths: [(&str, &Path); 7] = [
        ("intake", &layout.intake),
        ("approved", &layout.approved),
        ("rejected", &layout.rejected),
        ("manifest", &layout.manifest),
        ("review", &layout.review),
        ("decisions", &layout.decisions),
        ("sources", &layout.sources),
    ];

    if args.json {
        let mut entries = serde_json::Map::new();
        for (name, path) in paths {
            entries.insert(
                name.to_string(),
                serde_json::json!({
                    "path": path.to_string_lossy(),
                    "exists": path.exists(),
                }),
            );
        }
        let config = serde_json::json!({
            "root": layout.root.to_string_lossy(),
            "configFile": {
                "path": config_file.to_string_lossy(),
                "exists": config_file.exists(),
            },
            "paths": entries,
            "webPrefix": layout.web_prefix,
            "thresholds": thresholds,
            "home": gifgate_home().to_string_lossy(),
            "logs": logs_dir().to_string_lossy(),
        });
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("GIFGATE CONFIGURATION");
    println!("=====================");
    println!();
    println!("Root:       {}", layout.root.display());
    println!(
        "Config:     {} ({})",
        config_file.display(),
        exists_word(&config_file)
    );
    println!("Web prefix: {}", layout.web_prefix);
    println!();
    for (name, path) in paths {
        println!("{:<10}  {} ({})", name, path.display(), exists_word(path));
    }
    println!();
    println!("Thresholds:");
    println!("  max_kb        {}", thresholds.max_kb);
    println!("  reject_aspect {}", thresholds.reject_aspect);
    println!("  review_aspect {}", thresholds.review_aspect);
    println!();
    println!("Logs:       {}", logs_dir().display());

    Ok(())
}
