//! Maven coordinates and `groupId:artifactId` keys.

use std::fmt;

use pomgraph_util::errors::PomError;

/// `groupId:artifactId`: identifies an artifact family irrespective of version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactKey {
    pub group_id: String,
    pub artifact_id: String,
}

impl ArtifactKey {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    /// Attach a version, producing a full coordinate.
    pub fn with_version(&self, version: impl Into<String>) -> Coordinate {
        Coordinate {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// Maven coordinates of one published artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Coordinate {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Parse `"group:artifact:version"` into coordinates.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(g), Some(a), Some(v), None) if !g.is_empty() && !a.is_empty() => {
                Some(Self::new(g, a, v))
            }
            _ => None,
        }
    }

    pub fn key(&self) -> ArtifactKey {
        ArtifactKey::new(self.group_id.clone(), self.artifact_id.clone())
    }

    /// The repository-miss error naming this coordinate.
    pub fn not_found(&self) -> PomError {
        PomError::not_found(&self.group_id, &self.artifact_id, &self.version)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}
