//! Effective manifest resolution: parent inheritance, interpolation,
//! dependency-management imports, version precedence and module aggregation.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pomgraph_maven::coordinate::{ArtifactKey, Coordinate};
use pomgraph_maven::locator::{FetchSession, RepositoryLocator};
use pomgraph_maven::pom::{self, Pom, PomDependency};
use pomgraph_util::errors::{PomError, PomResult};
use pomgraph_util::fs::module_manifest_path;

use crate::chain::{self, Ancestor};
use crate::config::ResolverConfig;
use crate::cycle::ResolutionStack;
use crate::effective::{EffectiveManifest, Library, ResolvedDependency};
use crate::management::ManagementTable;
use crate::properties::{ProjectVars, PropertyResolver};
use crate::version::{self, VersionRequirement};

/// Resolves a project manifest into the flat list of libraries it and its
/// modules declare.
///
/// A parser holds no per-parse state, so the same instance can be reused for
/// any number of manifests.
#[derive(Debug, Clone)]
pub struct PomParser {
    config: ResolverConfig,
    locator: RepositoryLocator,
}

impl PomParser {
    pub fn new(config: ResolverConfig) -> PomResult<Self> {
        let locator = config.locator()?;
        Ok(Self { config, locator })
    }

    /// Resolve the manifest read from `source`.
    ///
    /// `manifest_path` is where the document lives on disk; relative parent
    /// paths and module directories are resolved against it.
    pub fn parse<R: Read>(&self, manifest_path: &Path, mut source: R) -> PomResult<Vec<Library>> {
        let pom = read_manifest(manifest_path, &mut source)?;
        let mut resolution = Resolution::new(&self.config, &self.locator);
        let libraries = resolution.aggregate(manifest_path, &pom)?;
        tracing::debug!(
            "Resolved {} libraries from {} ({} repository lookups)",
            libraries.len(),
            manifest_path.display(),
            resolution.fetch.fetched()
        );
        Ok(libraries)
    }

    /// Resolve the manifest stored at `manifest_path`.
    pub fn parse_file(&self, manifest_path: &Path) -> PomResult<Vec<Library>> {
        let file = std::fs::File::open(manifest_path).map_err(|source| PomError::Read {
            path: manifest_path.to_path_buf(),
            source,
        })?;
        self.parse(manifest_path, std::io::BufReader::new(file))
    }

    /// Compute the effective manifest of a single document, without
    /// descending into its modules.
    pub fn effective<R: Read>(
        &self,
        manifest_path: &Path,
        mut source: R,
    ) -> PomResult<EffectiveManifest> {
        let pom = read_manifest(manifest_path, &mut source)?;
        Resolution::new(&self.config, &self.locator).effective(&pom, Some(manifest_path))
    }
}

fn read_manifest<R: Read>(path: &Path, source: &mut R) -> PomResult<Pom> {
    let mut bytes = Vec::new();
    source
        .read_to_end(&mut bytes)
        .map_err(|source| PomError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    pom::parse_pom_bytes(&bytes)
}

/// A manifest merged with its ancestors, before versions are resolved.
struct Model {
    coordinate: Coordinate,
    properties: BTreeMap<String, String>,
    management: Arc<ManagementTable>,
    dependencies: Vec<PomDependency>,
    modules: Vec<String>,
}

/// State for one top-level parse.
struct Resolution<'a> {
    config: &'a ResolverConfig,
    fetch: FetchSession<'a>,
    stack: ResolutionStack,
    imported: HashMap<Coordinate, Arc<ManagementTable>>,
    modules_seen: HashSet<PathBuf>,
}

impl<'a> Resolution<'a> {
    fn new(config: &'a ResolverConfig, locator: &'a RepositoryLocator) -> Self {
        Self {
            config,
            fetch: locator.session(),
            stack: ResolutionStack::new(),
            imported: HashMap::new(),
            modules_seen: HashSet::new(),
        }
    }

    /// Libraries of a manifest followed by those of each module, depth first
    /// in declaration order.
    fn aggregate(&mut self, manifest_path: &Path, pom: &Pom) -> PomResult<Vec<Library>> {
        let seen_key = manifest_path
            .canonicalize()
            .unwrap_or_else(|_| manifest_path.to_path_buf());
        if !self.modules_seen.insert(seen_key) {
            return Err(PomError::malformed(format!(
                "{} is aggregated more than once",
                manifest_path.display()
            )));
        }

        let effective = self.effective(pom, Some(manifest_path))?;
        let mut libraries = effective.libraries();

        let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new(""));
        for module in &effective.modules {
            let module_path = module_manifest_path(base_dir, module)?;
            tracing::debug!("Aggregating module {module} from {}", module_path.display());
            let bytes = std::fs::read(&module_path).map_err(|source| PomError::Read {
                path: module_path.clone(),
                source,
            })?;
            let module_pom = pom::parse_pom_bytes(&bytes)?;
            libraries.extend(self.aggregate(&module_path, &module_pom)?);
        }
        Ok(libraries)
    }

    fn effective(&mut self, pom: &Pom, location: Option<&Path>) -> PomResult<EffectiveManifest> {
        let model = self.model(pom, location)?;
        let verify = self.config.verify_dependencies && self.fetch.locator().has_sources();
        if self.config.verify_dependencies && !verify {
            tracing::debug!("No repositories configured, skipping dependency verification");
        }

        let mut dependencies = Vec::with_capacity(model.dependencies.len());
        for declared in &model.dependencies {
            let resolved = resolve_version(declared, &model.management)?;
            if verify && !version::is_range(&resolved.coordinate.version) {
                self.fetch.ensure_exists(&resolved.coordinate)?;
            }
            dependencies.push(resolved);
        }

        Ok(EffectiveManifest {
            coordinate: model.coordinate,
            properties: model.properties,
            management: model.management,
            dependencies,
            modules: model.modules,
        })
    }

    fn model(&mut self, pom: &Pom, location: Option<&Path>) -> PomResult<Model> {
        let strict = self.config.strict_properties;
        let ancestors = chain::resolve_ancestors(pom, location, &mut self.fetch, &self.stack)?;
        let merged = chain::merge_properties(pom, &ancestors);

        let declared = chain::inherit_project(pom, &ancestors);
        let project = {
            let resolver = PropertyResolver::new(&merged, declared.clone()).strict(strict);
            ProjectVars {
                group_id: resolver.interpolate_opt(declared.group_id.as_deref())?,
                artifact_id: resolver.interpolate(&declared.artifact_id)?,
                version: resolver.interpolate_opt(declared.version.as_deref())?,
                packaging: resolver.interpolate_opt(declared.packaging.as_deref())?,
                parent: declared.parent,
            }
        };
        let coordinate = project_coordinate(&project)?;
        let resolver = PropertyResolver::new(&merged, project).strict(strict);

        self.stack.enter(&coordinate)?;
        let management = self.management(pom, &ancestors, &resolver);
        self.stack.leave();
        let management = Arc::new(management?);

        let mut levels = Vec::with_capacity(ancestors.len() + 1);
        levels.push(interpolate_all(&resolver, &pom.dependencies)?);
        for ancestor in &ancestors {
            levels.push(interpolate_all(&resolver, &ancestor.pom.dependencies)?);
        }
        let dependencies = chain::merge_dependencies(levels);

        let modules = pom
            .modules
            .iter()
            .map(|m| resolver.interpolate(m))
            .collect::<PomResult<Vec<_>>>()?;
        let properties = merged
            .iter()
            .map(|(k, v)| Ok((k.clone(), resolver.interpolate(v)?)))
            .collect::<PomResult<BTreeMap<_, _>>>()?;

        tracing::debug!(
            "Effective model of {coordinate}: {} ancestors, {} managed, {} dependencies",
            ancestors.len(),
            management.len(),
            dependencies.len()
        );
        Ok(Model {
            coordinate,
            properties,
            management,
            dependencies,
            modules,
        })
    }

    /// Build the management table by precedence: own entries, then imports
    /// (own first, then each ancestor's, nearest first), then inherited
    /// entries nearest first.
    fn management(
        &mut self,
        pom: &Pom,
        ancestors: &[Ancestor],
        resolver: &PropertyResolver<'_>,
    ) -> PomResult<ManagementTable> {
        let mut table = ManagementTable::new();
        table.extend_missing(interpolate_all(resolver, pom.managed())?);

        let mut imported_keys: HashSet<ArtifactKey> = HashSet::new();
        let levels = std::iter::once(pom).chain(ancestors.iter().map(|a| a.pom.as_ref()));
        for level in levels {
            for import in level.imports() {
                let import = interpolate_dependency(resolver, import)?;
                if !imported_keys.insert(import.key()) {
                    tracing::debug!("Skipping {} import, already imported nearer", import.key());
                    continue;
                }
                let coordinate = import_coordinate(&import)?;
                let bom = self.imported_management(&coordinate)?;
                table.extend_missing(bom.iter().cloned());
            }
        }

        for ancestor in ancestors {
            table.extend_missing(interpolate_all(resolver, ancestor.pom.managed())?);
        }
        Ok(table)
    }

    fn imported_management(&mut self, coordinate: &Coordinate) -> PomResult<Arc<ManagementTable>> {
        if let Some(table) = self.imported.get(coordinate) {
            return Ok(Arc::clone(table));
        }
        tracing::debug!("Importing dependency management from {coordinate}");
        let pom = self.fetch.fetch_pom(coordinate)?;
        let model = self.model(&pom, None)?;
        self.imported
            .insert(coordinate.clone(), Arc::clone(&model.management));
        Ok(model.management)
    }
}

fn project_coordinate(project: &ProjectVars) -> PomResult<Coordinate> {
    let group_id = project.group_id.as_deref().ok_or_else(|| {
        PomError::malformed(format!(
            "{} declares no groupId and has no parent",
            project.artifact_id
        ))
    })?;
    let version = project.version.as_deref().ok_or_else(|| {
        PomError::malformed(format!(
            "{} declares no version and has no parent",
            project.artifact_id
        ))
    })?;
    Ok(Coordinate::new(group_id, &project.artifact_id, version))
}

fn import_coordinate(import: &PomDependency) -> PomResult<Coordinate> {
    match import.version.as_deref().map(str::trim) {
        Some(version) if !version.is_empty() => Ok(import.key().with_version(version)),
        _ => Err(PomError::malformed(format!(
            "dependency management import {} declares no version",
            import.key()
        ))),
    }
}

fn resolve_version(
    declared: &PomDependency,
    management: &ManagementTable,
) -> PomResult<ResolvedDependency> {
    if declared.group_id.is_empty() || declared.artifact_id.is_empty() {
        return Err(PomError::malformed(format!(
            "dependency `{}` is missing its groupId or artifactId",
            declared.key()
        )));
    }
    let key = declared.key();
    let requirement = VersionRequirement::parse(declared.version.as_deref());
    let version = requirement
        .resolve(management.version_of(&key))
        .ok_or_else(|| PomError::not_found(&key.group_id, &key.artifact_id, ""))?;
    Ok(ResolvedDependency {
        coordinate: key.with_version(version),
        requirement,
    })
}

fn interpolate_dependency(
    resolver: &PropertyResolver<'_>,
    dep: &PomDependency,
) -> PomResult<PomDependency> {
    Ok(PomDependency {
        group_id: resolver.interpolate(&dep.group_id)?,
        artifact_id: resolver.interpolate(&dep.artifact_id)?,
        version: resolver.interpolate_opt(dep.version.as_deref())?,
        scope: resolver.interpolate_opt(dep.scope.as_deref())?,
        classifier: resolver.interpolate_opt(dep.classifier.as_deref())?,
        type_: resolver.interpolate_opt(dep.type_.as_deref())?,
    })
}

fn interpolate_all<'d, I>(resolver: &PropertyResolver<'_>, deps: I) -> PomResult<Vec<PomDependency>>
where
    I: IntoIterator<Item = &'d PomDependency>,
{
    deps.into_iter()
        .map(|d| interpolate_dependency(resolver, d))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> PomParser {
        PomParser::new(ResolverConfig::default()).unwrap()
    }

    #[test]
    fn standalone_manifest_without_repositories() {
        let xml = r#"<project>
    <groupId>com.example</groupId>
    <artifactId>standalone</artifactId>
    <version>1.0.0</version>
    <properties><api.version>1.7.30</api.version></properties>
    <dependencies>
        <dependency>
            <groupId>org.example</groupId>
            <artifactId>example-api</artifactId>
            <version>${api.version}</version>
        </dependency>
    </dependencies>
</project>"#;
        let libraries = parser()
            .parse(Path::new("/nonexistent/pom.xml"), xml.as_bytes())
            .unwrap();
        assert_eq!(
            libraries,
            vec![
                Library::new("com.example:standalone", "1.0.0"),
                Library::new("org.example:example-api", "1.7.30"),
            ]
        );
    }

    #[test]
    fn missing_version_without_management_is_not_found() {
        let xml = r#"<project>
    <groupId>com.example</groupId>
    <artifactId>standalone</artifactId>
    <version>1.0.0</version>
    <dependencies>
        <dependency>
            <groupId>org.example</groupId>
            <artifactId>example-api</artifactId>
        </dependency>
    </dependencies>
</project>"#;
        let err = parser()
            .parse(Path::new("/nonexistent/pom.xml"), xml.as_bytes())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "org.example:example-api: was not found in local/remote repositories"
        );
    }

    #[test]
    fn own_management_overrides_soft_version() {
        let xml = r#"<project>
    <groupId>com.example</groupId>
    <artifactId>managed</artifactId>
    <version>1.0.0</version>
    <dependencyManagement>
        <dependencies>
            <dependency>
                <groupId>org.example</groupId>
                <artifactId>example-dependency</artifactId>
                <version>1.2.4</version>
            </dependency>
        </dependencies>
    </dependencyManagement>
    <dependencies>
        <dependency>
            <groupId>org.example</groupId>
            <artifactId>example-dependency</artifactId>
            <version>1.2.3</version>
        </dependency>
    </dependencies>
</project>"#;
        let manifest = parser()
            .effective(Path::new("/nonexistent/pom.xml"), xml.as_bytes())
            .unwrap();
        assert_eq!(manifest.dependencies[0].coordinate.version, "1.2.4");
        assert_eq!(
            manifest.dependencies[0].requirement,
            VersionRequirement::Soft("1.2.3".into())
        );
    }

    #[test]
    fn missing_group_id_is_malformed() {
        let xml = "<project><artifactId>orphan</artifactId><version>1</version></project>";
        let err = parser()
            .parse(Path::new("/nonexistent/pom.xml"), xml.as_bytes())
            .unwrap_err();
        assert!(matches!(err, PomError::Malformed { .. }), "got: {err}");
    }

    #[test]
    fn import_without_version_is_malformed() {
        let xml = r#"<project>
    <groupId>com.example</groupId>
    <artifactId>imports</artifactId>
    <version>1.0.0</version>
    <dependencyManagement>
        <dependencies>
            <dependency>
                <groupId>org.example</groupId>
                <artifactId>example-bom</artifactId>
                <type>pom</type>
                <scope>import</scope>
            </dependency>
        </dependencies>
    </dependencyManagement>
</project>"#;
        let err = parser()
            .parse(Path::new("/nonexistent/pom.xml"), xml.as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("example-bom"), "got: {err}");
    }

    #[test]
    fn parser_is_reusable() {
        let xml = "<project><groupId>g</groupId><artifactId>a</artifactId><version>1</version></project>";
        let parser = parser();
        let first = parser.parse(Path::new("/x/pom.xml"), xml.as_bytes()).unwrap();
        let second = parser.parse(Path::new("/x/pom.xml"), xml.as_bytes()).unwrap();
        assert_eq!(first, second);
    }
}
