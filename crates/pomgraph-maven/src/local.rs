//! Local Maven repository on disk, laid out like a remote repository.

use std::path::{Path, PathBuf};

use pomgraph_util::errors::PomResult;
use pomgraph_util::fs::read_if_exists;

use crate::coordinate::Coordinate;
use crate::repository::pom_filename;

/// A local repository rooted at a directory such as `~/.m2/repository`.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory of this repository.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory within the repository for a given Maven coordinate.
    pub fn artifact_dir(&self, coordinate: &Coordinate) -> PathBuf {
        let mut dir = self.root.clone();
        for segment in coordinate.group_id.split('.') {
            dir.push(segment);
        }
        dir.join(&coordinate.artifact_id).join(&coordinate.version)
    }

    /// Path to the POM of a coordinate.
    pub fn pom_path(&self, coordinate: &Coordinate) -> PathBuf {
        self.artifact_dir(coordinate).join(pom_filename(coordinate))
    }

    /// Read the POM bytes for a coordinate; `Ok(None)` when it does not exist.
    pub fn read_pom(&self, coordinate: &Coordinate) -> PomResult<Option<Vec<u8>>> {
        read_if_exists(&self.pom_path(coordinate))
    }
}
