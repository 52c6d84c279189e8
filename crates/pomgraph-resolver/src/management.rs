//! The effective dependency-management table.
//!
//! Entries are layered by precedence: the table is filled highest priority
//! first and a GA keeps the first entry it receives.

use std::collections::HashMap;

use pomgraph_maven::coordinate::ArtifactKey;
use pomgraph_maven::pom::PomDependency;

/// Management entries keyed by `groupId:artifactId`, in precedence order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagementTable {
    entries: Vec<PomDependency>,
    index: HashMap<ArtifactKey, usize>,
}

impl ManagementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry unless its GA is already managed. Returns whether it was added.
    pub fn insert_missing(&mut self, entry: PomDependency) -> bool {
        let key = entry.key();
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Add every entry whose GA is not managed yet.
    pub fn extend_missing<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = PomDependency>,
    {
        for entry in entries {
            self.insert_missing(entry);
        }
    }

    pub fn get(&self, key: &ArtifactKey) -> Option<&PomDependency> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Managed version for a GA, if the entry declares one.
    pub fn version_of(&self, key: &ArtifactKey) -> Option<&str> {
        self.get(key).and_then(|d| d.version.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PomDependency> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
