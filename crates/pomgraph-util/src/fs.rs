use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::{PomError, PomResult};

/// File name of a project manifest inside a project or module directory.
pub const MANIFEST_FILE: &str = "pom.xml";

/// Read a file, mapping "does not exist" to `Ok(None)`.
///
/// Any other I/O failure is returned as [`PomError::Read`].
pub fn read_if_exists(path: &Path) -> PomResult<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PomError::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Locate the manifest of a module declared as `module` under `base_dir`.
///
/// Both the module directory and its `pom.xml` are checked; a missing entry
/// surfaces the native filesystem error as [`PomError::Stat`].
pub fn module_manifest_path(base_dir: &Path, module: &str) -> PomResult<PathBuf> {
    let module_dir = base_dir.join(module);
    stat(&module_dir)?;
    let manifest = module_dir.join(MANIFEST_FILE);
    stat(&manifest)?;
    Ok(manifest)
}

fn stat(path: &Path) -> PomResult<()> {
    std::fs::metadata(path)
        .map(|_| ())
        .map_err(|source| PomError::Stat {
            path: path.to_path_buf(),
            source,
        })
}

/// Resolve a parent `relativePath` against the directory of the child manifest.
///
/// A path naming a directory resolves to the `pom.xml` inside it.
pub fn relative_manifest_path(child_manifest: &Path, relative: &str) -> PathBuf {
    let base = child_manifest.parent().unwrap_or_else(|| Path::new(""));
    let candidate = base.join(relative);
    if candidate.is_dir() {
        candidate.join(MANIFEST_FILE)
    } else {
        candidate
    }
}
