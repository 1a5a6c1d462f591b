//! Detect command - preview which engine classes the plugin uses

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use gdslim_config::sconstruct::BuildDirs;
use gdslim_core::{close, ScanConfig, UsageScanner};

use super::{load_catalogue, load_config, read_sconstruct, resolve_root};
use crate::progress::{finish_spinner, finish_spinner_error, spinner};
use crate::GlobalOptions;

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Directories to scan (defaults to the SConstruct's source/include
    /// dirs plus the configured godot-cpp dirs)
    dirs: Vec<PathBuf>,

    /// Also include every transitive ancestor of the detected classes
    #[arg(long)]
    closure: bool,

    /// Print machine-readable JSON
    #[arg(long)]
    json: bool,
}

/// Execute the detect command
pub fn execute(args: DetectArgs, global: GlobalOptions) -> Result<()> {
    let root = resolve_root(&global)?;
    let config = load_config(&global, &root)?;
    let catalogue = load_catalogue(&config, &root)?;

    let roots = if args.dirs.is_empty() {
        let (_, content) = read_sconstruct(&config, &root)?;
        let dirs = BuildDirs::parse(&content);
        config.scan_roots(&root, &dirs)
    } else {
        args.dirs.clone()
    };

    let scan_config = ScanConfig {
        exclude_dirs: config.scan.exclude_dirs.iter().cloned().collect(),
    };
    let scanner = UsageScanner::with_config(catalogue.names().map(String::from), scan_config)?;

    let pb = spinner("Scanning source tree for class usage...", global.quiet);
    let used = match scanner.scan(&roots) {
        Ok(used) => {
            finish_spinner(pb, &format!("Detected {} classes", used.len()));
            used
        }
        Err(e) => {
            finish_spinner_error(pb, "Scan failed");
            return Err(e.into());
        }
    };

    let classes = if args.closure {
        close(&used, &catalogue)
    } else {
        used
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&classes)?);
    } else {
        for name in &classes {
            println!("{}", name);
        }
    }

    Ok(())
}
