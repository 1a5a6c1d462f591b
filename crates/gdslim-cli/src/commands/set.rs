//! Set command - select a build profile, generate its artifact, and record
//! the choice in the SConstruct.
//!
//! Pipeline order matters: everything is computed in memory first, the
//! profile file is written next, and the SConstruct flags are rewritten
//! last, so a failure never leaves the build pointing at a missing or
//! stale profile.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use gdslim_config::sconstruct::BuildDirs;
use gdslim_config::{ProfileMode, ProfileModeFlags};
use gdslim_core::{
    classify, close, custom_profile, minimal_profile, preset_profile, ExtraDomains, Preset,
    ScanConfig, UsageScanner,
};

use super::{load_catalogue, load_config, print_info, print_warning, read_sconstruct, resolve_root};
use crate::progress::{finish_spinner, finish_spinner_error, finish_spinner_warn, spinner};
use crate::GlobalOptions;

/// Arguments for the set command
#[derive(Args, Debug)]
pub struct SetArgs {
    #[command(subcommand)]
    mode: ModeCommand,
}

#[derive(Subcommand, Debug)]
enum ModeCommand {
    /// No profile: compile every engine class
    None,

    /// 2D preset: disable the 3D bucket (plus opted-out domains)
    #[command(name = "2d")]
    TwoD(PresetArgs),

    /// 3D preset: disable the 2D bucket (plus opted-out domains)
    #[command(name = "3d")]
    ThreeD(PresetArgs),

    /// Custom profile from detected usage, closed over ancestry
    Custom(CustomArgs),
}

/// Per-domain opt-out toggles for the dimension presets
#[derive(Args, Debug)]
struct PresetArgs {
    /// Also disable XR classes
    #[arg(long)]
    disable_xr: bool,

    /// Also disable networking-related classes
    #[arg(long)]
    disable_networking: bool,

    /// Also disable navigation-related classes
    #[arg(long)]
    disable_navigation: bool,

    /// Also disable editor-only classes
    #[arg(long)]
    disable_editor: bool,

    /// Also disable animation-related classes
    #[arg(long)]
    disable_animation: bool,

    /// Also disable UI (Control) classes
    #[arg(long)]
    disable_ui: bool,
}

impl PresetArgs {
    fn extras(&self) -> ExtraDomains {
        ExtraDomains {
            xr: self.disable_xr,
            networking: self.disable_networking,
            navigation: self.disable_navigation,
            editor: self.disable_editor,
            animation: self.disable_animation,
            ui: self.disable_ui,
        }
    }
}

/// Arguments for `set custom`
#[derive(Args, Debug)]
struct CustomArgs {
    /// Skip usage detection; keep an existing build_profile.json or create
    /// a minimal one to edit by hand
    #[arg(long)]
    no_detect: bool,
}

/// Execute the set command
pub fn execute(args: SetArgs, global: GlobalOptions) -> Result<()> {
    let root = resolve_root(&global)?;
    let config = load_config(&global, &root)?;
    let (sconstruct_path, content) = read_sconstruct(&config, &root)?;

    // Validate the flag declarations up front so nothing is generated when
    // the SConstruct cannot record the outcome.
    ProfileModeFlags::parse(&content)?;

    let mode = match &args.mode {
        ModeCommand::None => ProfileMode::None,
        ModeCommand::TwoD(_) => ProfileMode::TwoD,
        ModeCommand::ThreeD(_) => ProfileMode::ThreeD,
        ModeCommand::Custom(_) => ProfileMode::Custom,
    };

    match &args.mode {
        ModeCommand::None => {
            print_info("Profile set to none (all classes included).", global.quiet);
        }

        ModeCommand::TwoD(preset_args) | ModeCommand::ThreeD(preset_args) => {
            let preset = match mode {
                ProfileMode::TwoD => Preset::TwoD,
                _ => Preset::ThreeD,
            };

            let catalogue = load_catalogue(&config, &root)?;
            let buckets = classify(&catalogue);
            let profile = preset_profile(preset, preset_args.extras(), &buckets);

            let path = config
                .profile_path(&root, mode)
                .context("preset mode always has a profile file")?;
            profile.write_to(&path)?;

            print_info(
                &format!(
                    "{} profile: {} of {} classes disabled ({}).",
                    preset.as_str().to_uppercase(),
                    profile.classes().len(),
                    catalogue.len(),
                    path.display()
                ),
                global.quiet,
            );
        }

        ModeCommand::Custom(custom) => {
            let path = config
                .profile_path(&root, mode)
                .context("custom mode always has a profile file")?;

            if custom.no_detect {
                if path.exists() {
                    print_info(
                        "Custom profile enabled: edit build_profile.json to adjust classes.",
                        global.quiet,
                    );
                } else {
                    minimal_profile().write_to(&path)?;
                    print_info(
                        &format!(
                            "Created a minimal {} - edit it to add classes.",
                            path.display()
                        ),
                        global.quiet,
                    );
                }
            } else {
                let catalogue = load_catalogue(&config, &root)?;
                let dirs = BuildDirs::parse(&content);
                let roots = config.scan_roots(&root, &dirs);

                let scan_config = ScanConfig {
                    exclude_dirs: config.scan.exclude_dirs.iter().cloned().collect(),
                };
                let scanner =
                    UsageScanner::with_config(catalogue.names().map(String::from), scan_config)?;

                let pb = spinner("Scanning source tree for class usage...", global.quiet);
                let used = match scanner.scan(&roots) {
                    Ok(used) => used,
                    Err(e) => {
                        finish_spinner_error(pb, "Scan failed");
                        return Err(e.into());
                    }
                };

                let closed = close(&used, &catalogue);
                if closed.is_empty() {
                    finish_spinner_warn(pb, "No engine classes detected");
                    print_warning(
                        "no engine classes detected in your sources; writing the minimal profile",
                    );
                } else {
                    finish_spinner(
                        pb,
                        &format!("Detected {} classes (including base classes)", closed.len()),
                    );
                }

                let profile = custom_profile(&closed);
                profile.write_to(&path)?;

                print_info(
                    &format!(
                        "Custom profile: {} classes enabled ({}).",
                        profile.classes().len(),
                        path.display()
                    ),
                    global.quiet,
                );
            }
        }
    }

    // Flags last: the SConstruct only records a mode whose artifact exists.
    let flags = ProfileModeFlags::from_mode(mode);
    let rewritten = flags.apply(&content)?;
    std::fs::write(&sconstruct_path, rewritten).with_context(|| {
        format!(
            "failed to write SConstruct at '{}'",
            sconstruct_path.display()
        )
    })?;

    print_info(
        "SConstruct updated with new profile settings; recompile to apply.",
        global.quiet,
    );

    Ok(())
}
