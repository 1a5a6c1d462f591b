//! Static Usage Detection
//!
//! Scans a plugin's C++ tree for lexical evidence that an engine class is
//! referenced. Two independent signals, unioned: `#include` directives that
//! name a per-class godot-cpp header, and whole-word occurrences of a class
//! name anywhere in file content.
//!
//! Known limitation: the word scan is purely textual, so a class named in a
//! comment or string literal counts as used. That over-approximation is
//! deliberate - an oversized profile still links, an undersized one does not.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Regex, RegexSet, RegexSetBuilder};
use thiserror::Error;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Errors during a usage scan.
///
/// A scan fails as a whole on the first unreadable file: a partially scanned
/// tree would silently produce an undersized profile.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("failed to read source file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to compile class-name patterns: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, UsageError>;

/// File extensions considered part of the scanned source tree.
const SOURCE_EXTENSIONS: &[&str] = &["cpp", "cc", "cxx", "h", "hpp"];

/// Infrastructure classes retained when detection already found them and the
/// catalogue knows them. A retention check, never an unconditional add.
pub const CRITICAL_CLASSES: &[&str] = &[
    "OS",
    "ClassDB",
    "Engine",
    "ProjectSettings",
    "Input",
    "String",
    "Variant",
];

/// Matches includes of per-class godot-cpp headers and captures the file
/// stem, e.g. `#include <godot_cpp/classes/node_2d.hpp>` captures `node_2d`.
fn include_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"#include\s+["<]godot_cpp/(?:classes|core|variant)/([^/">]+)\.h(?:pp)?[">]"#)
            .expect("invalid include pattern")
    })
}

/// Convert a PascalCase class name to the snake_case header file stem used
/// by godot-cpp, with the trailing-dimension contraction (`Node2D` becomes
/// `node_2d`, not `node_2_d`).
pub fn class_to_file_stem(name: &str) -> String {
    static BOUNDARY_WORD: OnceLock<Regex> = OnceLock::new();
    static BOUNDARY_UPPER: OnceLock<Regex> = OnceLock::new();
    static BOUNDARY_DIGIT: OnceLock<Regex> = OnceLock::new();

    let boundary_word =
        BOUNDARY_WORD.get_or_init(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("invalid word pattern"));
    let boundary_upper = BOUNDARY_UPPER
        .get_or_init(|| Regex::new(r"([a-z0-9])([A-Z])").expect("invalid upper pattern"));
    let boundary_digit = BOUNDARY_DIGIT
        .get_or_init(|| Regex::new(r"([a-z])([0-9])").expect("invalid digit pattern"));

    let s = boundary_word.replace_all(name, "${1}_${2}");
    let s = boundary_upper.replace_all(&s, "${1}_${2}");
    let s = s.to_lowercase();
    let s = boundary_digit.replace_all(&s, "${1}_${2}");
    s.replace("2_d", "2d").replace("3_d", "3d")
}

/// Configuration for a usage scan.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Directory names skipped while walking, in addition to hidden
    /// directories (which are always skipped).
    pub exclude_dirs: HashSet<String>,
}

/// Scanner for engine-class usage in a source tree.
///
/// Holds the valid-class set and the compiled detection machinery so one
/// scanner can sweep many roots. Detection is additive and order
/// independent: scanning roots or files in any order yields the same set.
pub struct UsageScanner {
    valid: HashSet<String>,
    /// Header file stem (and lowercased name) → class name.
    stem_to_class: HashMap<String, String>,
    /// Whole-word patterns, one per class, parallel to `word_classes`.
    word_patterns: RegexSet,
    word_classes: Vec<String>,
    config: ScanConfig,
}

impl UsageScanner {
    /// Build a scanner for the given valid class names.
    pub fn new<I, S>(valid_classes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(valid_classes, ScanConfig::default())
    }

    /// Build a scanner with custom scan configuration.
    pub fn with_config<I, S>(valid_classes: I, config: ScanConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let valid: HashSet<String> = valid_classes.into_iter().map(Into::into).collect();

        // Sorted so pattern indices (and any collision resolution in the
        // stem map) are stable across runs.
        let mut word_classes: Vec<String> = valid.iter().cloned().collect();
        word_classes.sort();

        let mut stem_to_class = HashMap::with_capacity(word_classes.len() * 2);
        for name in &word_classes {
            stem_to_class.insert(class_to_file_stem(name), name.clone());
            stem_to_class.insert(name.to_lowercase(), name.clone());
        }

        let patterns: Vec<String> = word_classes
            .iter()
            .map(|name| format!(r"\b{}\b", regex::escape(name)))
            .collect();
        let word_patterns = RegexSetBuilder::new(&patterns)
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            valid,
            stem_to_class,
            word_patterns,
            word_classes,
            config,
        })
    }

    /// Number of class names this scanner recognizes.
    pub fn class_count(&self) -> usize {
        self.valid.len()
    }

    /// Scan the given roots and return every detected class.
    ///
    /// Roots that do not exist are skipped; an unreadable file inside an
    /// existing root fails the scan.
    pub fn scan(&self, roots: &[PathBuf]) -> Result<BTreeSet<String>> {
        let mut used = BTreeSet::new();
        let mut files_scanned = 0usize;

        for root in roots {
            if !root.exists() {
                debug!(root = %root.display(), "scan root does not exist, skipping");
                continue;
            }

            for entry in WalkDir::new(root).into_iter().filter_entry(|e| {
                if !e.file_type().is_dir() || e.depth() == 0 {
                    return true;
                }
                let name = e.file_name().to_string_lossy();
                !name.starts_with('.') && !self.config.exclude_dirs.contains(name.as_ref())
            }) {
                let entry = entry?;
                if !entry.file_type().is_file() || !is_source_file(entry.path()) {
                    continue;
                }

                let path = entry.path();
                let content =
                    std::fs::read_to_string(path).map_err(|e| UsageError::Read {
                        path: path.to_path_buf(),
                        source: e,
                    })?;
                self.scan_content(path, &content, &mut used);
                files_scanned += 1;
            }
        }

        // Retention check for critical infrastructure classes: kept only
        // when already present in both the valid and detected sets.
        let retained: Vec<String> = CRITICAL_CLASSES
            .iter()
            .filter(|c| self.valid.contains(**c) && used.contains(**c))
            .map(|c| c.to_string())
            .collect();
        used.extend(retained);

        debug!(
            files = files_scanned,
            classes = used.len(),
            "usage scan complete"
        );
        Ok(used)
    }

    /// Apply both detection signals to one file's content.
    fn scan_content(&self, path: &Path, content: &str, used: &mut BTreeSet<String>) {
        // Signal (a): per-class godot-cpp header includes. The mapped name
        // must be a valid class, which rejects incidental filename
        // collisions.
        for line in content.lines() {
            let trimmed = line.trim_start();
            if !trimmed.starts_with("#include") {
                continue;
            }
            if let Some(caps) = include_regex().captures(trimmed) {
                if let Some(class) = self.stem_to_class.get(&caps[1]) {
                    if used.insert(class.clone()) {
                        trace!(class = %class, file = %path.display(), "detected via include");
                    }
                }
            }
        }

        // Signal (b): whole-word, case-insensitive occurrence of any valid
        // class name anywhere in the file.
        for idx in self.word_patterns.matches(content) {
            let class = &self.word_classes[idx];
            if used.insert(class.clone()) {
                trace!(class = %class, file = %path.display(), "detected via word match");
            }
        }
    }
}

impl std::fmt::Debug for UsageScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageScanner")
            .field("classes", &self.valid.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Whether a path has one of the scanned source/header extensions.
fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SOURCE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}
