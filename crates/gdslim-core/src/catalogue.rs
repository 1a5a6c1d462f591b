//! Class Catalogue Loading and Ancestry Resolution
//!
//! Parses the `extension_api.json` dump shipped with godot-cpp into an
//! immutable name → parent map and answers inheritance queries over it.
//! Each class has at most one parent, so the catalogue is a forest walked
//! by name lookups, not a general graph.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors during catalogue loading.
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("failed to read catalogue '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalogue is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalogue class record #{index} has no name")]
    MissingName { index: usize },
}

pub type Result<T> = std::result::Result<T, CatalogueError>;

/// Raw shape of the API dump. Only the class list and inheritance links are
/// consumed; everything else in the file is ignored.
#[derive(Debug, Deserialize)]
struct ApiDump {
    #[serde(default)]
    classes: Vec<RawClass>,
}

#[derive(Debug, Deserialize)]
struct RawClass {
    name: Option<String>,
    inherits: Option<String>,
}

/// Immutable mapping from class name to its declared parent.
///
/// Loaded fresh on every run - the catalogue changes whenever the targeted
/// engine version does, so nothing is cached across invocations.
#[derive(Debug, Clone, Default)]
pub struct ClassCatalogue {
    parents: HashMap<String, Option<String>>,
}

impl ClassCatalogue {
    /// Load the catalogue from an `extension_api.json` file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogueError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let catalogue = Self::from_json(&content)?;
        debug!(
            classes = catalogue.len(),
            path = %path.display(),
            "loaded class catalogue"
        );
        Ok(catalogue)
    }

    /// Parse the catalogue from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let dump: ApiDump = serde_json::from_str(json)?;

        let mut parents = HashMap::with_capacity(dump.classes.len());
        for (index, class) in dump.classes.into_iter().enumerate() {
            let name = class.name.ok_or(CatalogueError::MissingName { index })?;
            parents.insert(name, class.inherits);
        }

        Ok(Self { parents })
    }

    /// Build a catalogue directly from (name, parent) pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<S>)>,
        S: Into<String>,
    {
        let parents = pairs
            .into_iter()
            .map(|(name, parent)| (name.into(), parent.map(Into::into)))
            .collect();
        Self { parents }
    }

    /// Number of classes in the catalogue.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Whether the catalogue contains a class with this exact name.
    pub fn contains(&self, name: &str) -> bool {
        self.parents.contains_key(name)
    }

    /// Declared parent of a class, if the class exists and has one.
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        self.parents.get(name).and_then(|p| p.as_deref())
    }

    /// Iterate over all class names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parents.keys().map(String::as_str)
    }

    /// All ancestors of a class, nearest first.
    ///
    /// Unknown classes yield an empty sequence. The walk keeps a visited set
    /// so a corrupt catalogue with an inheritance cycle terminates with the
    /// chain collected before the repeat instead of looping.
    pub fn ancestors_of(&self, name: &str) -> Vec<String> {
        let mut ancestors = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        let mut current = self.parent_of(name);
        while let Some(parent) = current {
            if !seen.insert(parent) {
                warn!(class = name, ancestor = parent, "inheritance cycle in catalogue, stopping walk");
                break;
            }
            ancestors.push(parent.to_string());
            current = self.parent_of(parent);
        }

        ancestors
    }

    /// Whether `name` transitively inherits from `base`.
    ///
    /// `false` for unknown classes, for `name == base`, and for corrupt
    /// catalogues whose parent chain cycles before reaching `base`.
    pub fn is_descendant_of(&self, name: &str, base: &str) -> bool {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut current = name;

        while seen.insert(current) {
            match self.parent_of(current) {
                None => return false,
                Some(parent) if parent == base => return true,
                Some(parent) => current = parent,
            }
        }

        false
    }
}
