//! gdslim Core
//!
//! Decides which subset of the engine class catalogue a GDExtension plugin
//! must compile. The pipeline:
//!
//! 1. [`catalogue`] - parse `extension_api.json` into a name → parent map
//!    and answer ancestry queries over it.
//! 2. [`domains`] - bucket every class into feature domains (2D, 3D, XR,
//!    networking, ...) for the preset profiles.
//! 3. [`usage`] - scan the plugin's C++ tree for lexical evidence of class
//!    use (includes + whole-word occurrences).
//! 4. [`closure`] - expand the detected set with every transitive ancestor.
//! 5. [`profile`] - emit the `feature_profile` JSON the godot-cpp build
//!    consumes.
//!
//! Everything here is synchronous and side-effect-free except the explicit
//! file reads/writes; persisted state is only touched by [`profile`] writes.

pub mod catalogue;
pub mod closure;
pub mod domains;
pub mod profile;
pub mod usage;

pub use catalogue::{CatalogueError, ClassCatalogue};
pub use closure::close;
pub use domains::{classify, Domain, DomainBuckets, UnknownDomain};
pub use profile::{
    custom_profile, minimal_profile, preset_profile, ExtraDomains, Preset, ProfileArtifact,
    ProfileError, MINIMAL_ENABLED, PROFILE_TYPE,
};
pub use usage::{ScanConfig, UsageError, UsageScanner, CRITICAL_CLASSES};
