//! Parent chain resolution and inheritance merging.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pomgraph_maven::coordinate::{ArtifactKey, Coordinate};
use pomgraph_maven::locator::FetchSession;
use pomgraph_maven::pom::{self, ParentRef, Pom, PomDependency};
use pomgraph_util::errors::{PomError, PomResult};
use pomgraph_util::fs::{read_if_exists, relative_manifest_path};

use crate::cycle::{ResolutionStack, MAX_DEPTH};
use crate::properties::ProjectVars;

/// One resolved ancestor and, when it was read from disk, its location.
#[derive(Debug, Clone)]
pub struct Ancestor {
    pub pom: Arc<Pom>,
    pub location: Option<PathBuf>,
}

/// Follow `parent` references up to the root, immediate parent first.
///
/// Each parent is read from its relative path when the child lives on disk,
/// and fetched from the repositories otherwise.
pub fn resolve_ancestors(
    pom: &Pom,
    location: Option<&Path>,
    fetch: &mut FetchSession<'_>,
    stack: &ResolutionStack,
) -> PomResult<Vec<Ancestor>> {
    let mut chain: Vec<Ancestor> = Vec::new();
    let mut seen: Vec<Coordinate> = Vec::new();
    if let (Some(g), Some(v)) = (pom.effective_group_id(), pom.effective_version()) {
        seen.push(Coordinate::new(g, &pom.artifact_id, v));
    }

    let mut next = pom.parent.clone();
    let mut child_location = location.map(Path::to_path_buf);
    while let Some(parent_ref) = next {
        let coordinate = parent_ref.coordinate();
        if seen.contains(&coordinate) || stack.contains(&coordinate) {
            return Err(PomError::malformed(format!(
                "cyclic reference: {coordinate} is its own ancestor"
            )));
        }
        if chain.len() >= MAX_DEPTH {
            return Err(PomError::malformed(format!(
                "parent chain deeper than {MAX_DEPTH} manifests at {coordinate}"
            )));
        }

        let ancestor = load_parent(&parent_ref, child_location.as_deref(), fetch)?;
        seen.push(coordinate);
        next = ancestor.pom.parent.clone();
        child_location = ancestor.location.clone();
        chain.push(ancestor);
    }
    Ok(chain)
}

fn load_parent(
    parent: &ParentRef,
    child_location: Option<&Path>,
    fetch: &mut FetchSession<'_>,
) -> PomResult<Ancestor> {
    let coordinate = parent.coordinate();
    if let (Some(relative), Some(child)) = (parent.lookup_path(), child_location) {
        let path = relative_manifest_path(child, relative);
        match read_if_exists(&path) {
            Ok(Some(bytes)) => match pom::parse_pom_bytes(&bytes) {
                Ok(candidate) if matches_parent(&candidate, parent) => {
                    tracing::debug!("Resolved parent {coordinate} from {}", path.display());
                    return Ok(Ancestor {
                        pom: Arc::new(candidate),
                        location: Some(path),
                    });
                }
                Ok(_) => tracing::debug!(
                    "{} is not {coordinate}, looking in repositories",
                    path.display()
                ),
                Err(e) => tracing::warn!("Ignoring parent candidate {}: {e}", path.display()),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring parent candidate {}: {e}", path.display()),
        }
    }

    tracing::debug!("Resolving parent {coordinate} from repositories");
    let pom = fetch.fetch_pom(&coordinate)?;
    Ok(Ancestor {
        pom,
        location: None,
    })
}

fn matches_parent(candidate: &Pom, parent: &ParentRef) -> bool {
    candidate.artifact_id == parent.artifact_id
        && candidate.effective_group_id() == Some(parent.group_id.as_str())
        && candidate.effective_version() == Some(parent.version.as_str())
}

/// Merge properties from the root ancestor down; nearer declarations win.
pub fn merge_properties(pom: &Pom, ancestors: &[Ancestor]) -> BTreeMap<String, String> {
    let mut merged = BTreeMap::new();
    for ancestor in ancestors.iter().rev() {
        merged.extend(ancestor.pom.properties.clone());
    }
    merged.extend(pom.properties.clone());
    merged
}

/// The manifest's own project variables, inheriting `groupId` and `version`
/// from the nearest ancestor that declares them.
pub fn inherit_project(pom: &Pom, ancestors: &[Ancestor]) -> ProjectVars {
    let group_id = pom
        .group_id
        .clone()
        .or_else(|| ancestors.iter().find_map(|a| a.pom.group_id.clone()))
        .or_else(|| pom.parent.as_ref().map(|p| p.group_id.clone()));
    let version = pom
        .version
        .clone()
        .or_else(|| ancestors.iter().find_map(|a| a.pom.version.clone()))
        .or_else(|| pom.parent.as_ref().map(|p| p.version.clone()));

    ProjectVars {
        group_id,
        artifact_id: pom.artifact_id.clone(),
        version,
        packaging: pom.packaging.clone(),
        parent: pom.parent.clone(),
    }
}

/// Union of dependency declarations, nearest level first.
///
/// A declaration for a GA in a nearer level replaces every declaration of
/// that GA in farther levels.
pub fn merge_dependencies(levels: Vec<Vec<PomDependency>>) -> Vec<PomDependency> {
    let mut merged = Vec::new();
    let mut claimed: HashSet<ArtifactKey> = HashSet::new();
    for level in levels {
        let level_keys: Vec<ArtifactKey> = level.iter().map(PomDependency::key).collect();
        merged.extend(level.into_iter().filter(|d| !claimed.contains(&d.key())));
        claimed.extend(level_keys);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(g: &str, a: &str, v: Option<&str>) -> PomDependency {
        PomDependency {
            group_id: g.into(),
            artifact_id: a.into(),
            version: v.map(Into::into),
            ..Default::default()
        }
    }

    fn ancestor(pom: Pom) -> Ancestor {
        Ancestor {
            pom: Arc::new(pom),
            location: None,
        }
    }

    #[test]
    fn nearer_properties_win() {
        let mut root = Pom::default();
        root.properties.insert("x".into(), "root".into());
        root.properties.insert("only.root".into(), "r".into());
        let mut parent = Pom::default();
        parent.properties.insert("x".into(), "parent".into());
        let mut child = Pom::default();
        child.properties.insert("y".into(), "child".into());

        let merged = merge_properties(&child, &[ancestor(parent), ancestor(root)]);
        assert_eq!(merged["x"], "parent");
        assert_eq!(merged["only.root"], "r");
        assert_eq!(merged["y"], "child");
    }

    #[test]
    fn coordinate_inherited_from_nearest_declaring_ancestor() {
        let root = Pom {
            group_id: Some("com.root".into()),
            version: Some("1.0.0".into()),
            ..Default::default()
        };
        let parent = Pom {
            version: Some("2.0.0".into()),
            ..Default::default()
        };
        let child = Pom {
            artifact_id: "child".into(),
            ..Default::default()
        };
        let vars = inherit_project(&child, &[ancestor(parent), ancestor(root)]);
        assert_eq!(vars.group_id.as_deref(), Some("com.root"));
        assert_eq!(vars.version.as_deref(), Some("2.0.0"));
        assert_eq!(vars.artifact_id, "child");
    }

    #[test]
    fn coordinate_falls_back_to_parent_reference() {
        let child = Pom {
            artifact_id: "child".into(),
            parent: Some(ParentRef {
                group_id: "com.example".into(),
                artifact_id: "parent".into(),
                version: "1.0.0-SNAPSHOT".into(),
                relative_path: None,
            }),
            ..Default::default()
        };
        let vars = inherit_project(&child, &[]);
        assert_eq!(vars.group_id.as_deref(), Some("com.example"));
        assert_eq!(vars.version.as_deref(), Some("1.0.0-SNAPSHOT"));
    }

    #[test]
    fn nearer_dependency_replaces_ancestor_entirely() {
        let mut child_dep = dep("org.example", "example-api", None);
        child_dep.scope = Some("test".into());
        let merged = merge_dependencies(vec![
            vec![child_dep],
            vec![
                dep("org.example", "example-api", Some("1.0.0")),
                dep("org.example", "other", Some("2.0.0")),
            ],
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].version, None);
        assert_eq!(merged[0].scope.as_deref(), Some("test"));
        assert_eq!(merged[1].artifact_id, "other");
    }

    #[test]
    fn duplicates_within_one_level_are_kept() {
        let merged = merge_dependencies(vec![vec![
            dep("g", "a", Some("1")),
            dep("g", "a", Some("2")),
        ]]);
        assert_eq!(merged.len(), 2);
    }
}
