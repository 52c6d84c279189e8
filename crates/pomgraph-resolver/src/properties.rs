//! `${...}` placeholder interpolation against inherited properties and
//! built-in project variables.

use std::collections::BTreeMap;

use pomgraph_maven::pom::ParentRef;
use pomgraph_util::errors::{PomError, PomResult};

/// Project values exposed as built-in properties (`project.version`, ...).
#[derive(Debug, Clone, Default)]
pub struct ProjectVars {
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub parent: Option<ParentRef>,
}

/// Interpolates placeholders in a single pass.
///
/// Lookup order is the merged property table (own properties shadow inherited
/// ones, nearest ancestor first), then built-in project variables. Substituted
/// text is never re-scanned, so self-references stay inert.
#[derive(Debug, Clone)]
pub struct PropertyResolver<'a> {
    properties: &'a BTreeMap<String, String>,
    project: ProjectVars,
    strict: bool,
}

impl<'a> PropertyResolver<'a> {
    pub fn new(properties: &'a BTreeMap<String, String>, project: ProjectVars) -> Self {
        Self {
            properties,
            project,
            strict: false,
        }
    }

    /// Treat unresolved placeholders as errors instead of copying them through.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Replace every `${key}` in `input` with its value.
    pub fn interpolate(&self, input: &str) -> PomResult<String> {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                // Unterminated placeholder: copy the remainder verbatim.
                out.push_str(&rest[start..]);
                return Ok(out);
            };
            let key = &after[..end];
            match self.lookup(key) {
                Some(value) => out.push_str(value),
                None if self.strict => {
                    return Err(PomError::UnresolvedProperty {
                        key: key.to_string(),
                    });
                }
                None => out.push_str(&rest[start..start + end + 3]),
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    /// Interpolate an optional value.
    pub fn interpolate_opt(&self, input: Option<&str>) -> PomResult<Option<String>> {
        input.map(|s| self.interpolate(s)).transpose()
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        if let Some(value) = self.properties.get(key) {
            return Some(value);
        }
        let project = &self.project;
        match key {
            "project.groupId" | "pom.groupId" | "groupId" => project.group_id.as_deref(),
            "project.artifactId" | "pom.artifactId" | "artifactId" => {
                Some(project.artifact_id.as_str())
            }
            "project.version" | "pom.version" | "version" => project.version.as_deref(),
            "project.packaging" | "pom.packaging" => {
                Some(project.packaging.as_deref().unwrap_or("jar"))
            }
            "project.parent.groupId" => project.parent.as_ref().map(|p| p.group_id.as_str()),
            "project.parent.artifactId" => {
                project.parent.as_ref().map(|p| p.artifact_id.as_str())
            }
            "project.parent.version" => project.parent.as_ref().map(|p| p.version.as_str()),
            _ => None,
        }
    }
}
