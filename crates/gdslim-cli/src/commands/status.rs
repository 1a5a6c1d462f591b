//! Status command - show the active build profile

use anyhow::Result;
use clap::Args;
use gdslim_config::{ProfileMode, ProfileModeFlags};
use gdslim_core::ProfileArtifact;

use super::{load_config, read_sconstruct, resolve_root};
use crate::GlobalOptions;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print machine-readable JSON
    #[arg(long)]
    json: bool,
}

/// Execute the status command
pub fn execute(args: StatusArgs, global: GlobalOptions) -> Result<()> {
    let root = resolve_root(&global)?;
    let config = load_config(&global, &root)?;

    let (_, content) = read_sconstruct(&config, &root)?;
    let flags = ProfileModeFlags::parse(&content)?;
    let mode = flags.mode();

    let profile_path = config.profile_path(&root, mode);
    let profile = profile_path
        .as_ref()
        .filter(|p| p.exists())
        .map(|p| ProfileArtifact::read_from(p))
        .transpose()?;

    if args.json {
        let payload = serde_json::json!({
            "mode": mode.as_str(),
            "profile": profile.as_ref().map(|p| serde_json::json!({
                "kind": if p.is_enabled_list() { "enabled" } else { "disabled" },
                "classes": p.classes().len(),
            })),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    match mode {
        ProfileMode::None => println!("Active profile: none (all classes included)"),
        mode => println!("Active profile: {}", mode),
    }

    match (profile, profile_path) {
        (Some(profile), Some(path)) => {
            let kind = if profile.is_enabled_list() {
                "enabled"
            } else {
                "disabled"
            };
            println!(
                "Profile file: {} ({} classes {})",
                path.display(),
                profile.classes().len(),
                kind
            );
        }
        (None, Some(path)) => {
            println!(
                "Profile file {} is missing; run 'gdslim set {}' to generate it.",
                path.display(),
                mode
            );
        }
        _ => {}
    }

    Ok(())
}
