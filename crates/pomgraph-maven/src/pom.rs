//! POM decoding: coordinates, parent reference, properties, dependency
//! declarations, dependency management and modules.

use std::collections::BTreeMap;

use pomgraph_util::errors::{PomError, PomResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::coordinate::{ArtifactKey, Coordinate};

/// Relative path of the parent manifest when `<relativePath>` is omitted.
pub const DEFAULT_RELATIVE_PATH: &str = "../pom.xml";

const DEPENDENCY: &str = "project>dependencies>dependency";
const MANAGED_DEPENDENCY: &str = "project>dependencyManagement>dependencies>dependency";
const PARENT: &str = "project>parent";

/// A parsed POM (Project Object Model) file, exactly as declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub version: Option<String>,
    pub packaging: Option<String>,

    pub parent: Option<ParentRef>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub dependency_management: Vec<PomDependency>,
    pub modules: Vec<String>,
}

/// Reference to a parent POM.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    /// `None` when the element is absent, `Some("")` for `<relativePath/>`.
    pub relative_path: Option<String>,
}

impl ParentRef {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(&self.group_id, &self.artifact_id, &self.version)
    }

    /// Filesystem path to try before the repositories, if any.
    pub fn lookup_path(&self) -> Option<&str> {
        match self.relative_path.as_deref() {
            None => Some(DEFAULT_RELATIVE_PATH),
            Some(p) if p.trim().is_empty() => None,
            Some(p) => Some(p.trim()),
        }
    }
}

/// A dependency declared in a POM file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub classifier: Option<String>,
    pub type_: Option<String>,
}

impl PomDependency {
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey::new(self.group_id.clone(), self.artifact_id.clone())
    }

    /// Whether this management entry imports another POM's management table
    /// (`scope = "import"` and `type = "pom"`).
    pub fn is_import(&self) -> bool {
        self.scope.as_deref() == Some("import") && self.type_.as_deref().unwrap_or("jar") == "pom"
    }
}

impl Pom {
    /// Effective group ID (falls back to parent).
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.group_id.as_str()))
    }

    /// Effective version (falls back to parent).
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.version.as_str()))
    }

    /// Management imports in declaration order.
    pub fn imports(&self) -> impl Iterator<Item = &PomDependency> {
        self.dependency_management.iter().filter(|d| d.is_import())
    }

    /// Management entries that are not imports, in declaration order.
    pub fn managed(&self) -> impl Iterator<Item = &PomDependency> {
        self.dependency_management.iter().filter(|d| !d.is_import())
    }
}

/// Decode POM bytes. The document must be UTF-8.
pub fn parse_pom_bytes(bytes: &[u8]) -> PomResult<Pom> {
    let xml = std::str::from_utf8(bytes)
        .map_err(|e| PomError::malformed(format!("POM is not valid UTF-8: {e}")))?;
    parse_pom(xml)
}

/// Parse a POM XML string into a `Pom` struct.
pub fn parse_pom(xml: &str) -> PomResult<Pom> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut builder = PomBuilder::default();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => builder.open(tag_name(e))?,
            Ok(Event::Empty(ref e)) => {
                builder.open(tag_name(e))?;
                builder.close();
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| PomError::malformed(format!("Failed to parse POM XML: {e}")))?;
                builder.text.push_str(&text);
            }
            Ok(Event::CData(e)) => {
                builder
                    .text
                    .push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::End(_)) => builder.close(),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PomError::malformed(format!("Failed to parse POM XML: {e}")));
            }
            _ => {}
        }
    }

    builder.finish()
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Accumulates a `Pom` while walking the element tree.
#[derive(Default)]
struct PomBuilder {
    pom: Pom,
    artifact_id: Option<String>,
    saw_root: bool,
    path: Vec<String>,
    text: String,
    dep: Option<PomDependency>,
    parent: Option<ParentRef>,
}

impl PomBuilder {
    fn open(&mut self, tag: String) -> PomResult<()> {
        if self.path.is_empty() {
            if tag != "project" || self.saw_root {
                return Err(PomError::malformed(format!(
                    "expected a single <project> root element, found <{tag}>"
                )));
            }
            self.saw_root = true;
        }
        self.path.push(tag);
        self.text.clear();

        let ctx = self.path.join(">");
        match ctx.as_str() {
            DEPENDENCY | MANAGED_DEPENDENCY => self.dep = Some(PomDependency::default()),
            PARENT => self.parent = Some(ParentRef::default()),
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self) {
        let ctx = self.path.join(">");
        let text = std::mem::take(&mut self.text).trim().to_string();
        let depth = self.path.len();

        // <project><properties><key>value</key></properties>
        if depth == 3 && self.path[1] == "properties" {
            self.pom.properties.insert(self.path[2].clone(), text.clone());
        }

        if depth == 2 {
            match self.path[1].as_str() {
                "groupId" => self.pom.group_id = Some(text.clone()),
                "artifactId" => self.artifact_id = Some(text.clone()),
                "version" => self.pom.version = Some(text.clone()),
                "packaging" => self.pom.packaging = Some(text.clone()),
                _ => {}
            }
        }

        let dep_field = ctx
            .strip_prefix(DEPENDENCY)
            .or_else(|| ctx.strip_prefix(MANAGED_DEPENDENCY))
            .and_then(|rest| rest.strip_prefix('>'));
        if let (Some(field), Some(dep)) = (dep_field, self.dep.as_mut()) {
            match field {
                "groupId" => dep.group_id = text.clone(),
                "artifactId" => dep.artifact_id = text.clone(),
                "version" => dep.version = Some(text.clone()),
                "scope" => dep.scope = Some(text.clone()),
                "classifier" => dep.classifier = Some(text.clone()),
                "type" => dep.type_ = Some(text.clone()),
                _ => {}
            }
        }

        if let (Some(field), Some(parent)) = (
            ctx.strip_prefix("project>parent>"),
            self.parent.as_mut(),
        ) {
            match field {
                "groupId" => parent.group_id = text.clone(),
                "artifactId" => parent.artifact_id = text.clone(),
                "version" => parent.version = text.clone(),
                "relativePath" => parent.relative_path = Some(text.clone()),
                _ => {}
            }
        }

        match ctx.as_str() {
            DEPENDENCY => self.pom.dependencies.extend(self.dep.take()),
            MANAGED_DEPENDENCY => self.pom.dependency_management.extend(self.dep.take()),
            PARENT => self.pom.parent = self.parent.take(),
            "project>modules>module" => self.pom.modules.push(text),
            _ => {}
        }

        self.path.pop();
    }

    fn finish(mut self) -> PomResult<Pom> {
        if !self.path.is_empty() {
            return Err(PomError::malformed(format!(
                "unexpected end of document inside <{}>",
                self.path.join(">")
            )));
        }
        if !self.saw_root {
            return Err(PomError::malformed("document has no <project> element"));
        }
        match self.artifact_id.take() {
            Some(id) if !id.is_empty() => self.pom.artifact_id = id,
            _ => return Err(PomError::malformed("project declares no artifactId")),
        }
        Ok(self.pom)
    }
}
