//! Effective manifests and the flat library output.

use std::collections::BTreeMap;
use std::sync::Arc;

use pomgraph_maven::coordinate::Coordinate;
use serde::{Deserialize, Serialize};

use crate::management::ManagementTable;
use crate::version::VersionRequirement;

/// One output entry: `name` is `groupId:artifactId`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
    pub version: String,
}

impl Library {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl From<&Coordinate> for Library {
    fn from(c: &Coordinate) -> Self {
        Self::new(c.key().to_string(), c.version.clone())
    }
}

/// A dependency after interpolation and version precedence.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDependency {
    pub coordinate: Coordinate,
    /// How the version was declared, before management was applied.
    pub requirement: VersionRequirement,
}

/// A manifest merged with its ancestors and imports.
#[derive(Debug, Clone)]
pub struct EffectiveManifest {
    pub coordinate: Coordinate,
    pub properties: BTreeMap<String, String>,
    pub management: Arc<ManagementTable>,
    pub dependencies: Vec<ResolvedDependency>,
    pub modules: Vec<String>,
}

impl EffectiveManifest {
    /// The manifest itself followed by each dependency, in declaration order.
    pub fn libraries(&self) -> Vec<Library> {
        std::iter::once(Library::from(&self.coordinate))
            .chain(self.dependencies.iter().map(|d| Library::from(&d.coordinate)))
            .collect()
    }
}
