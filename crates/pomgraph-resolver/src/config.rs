use std::path::{Path, PathBuf};
use std::time::Duration;

use pomgraph_maven::local::LocalRepository;
use pomgraph_maven::locator::RepositoryLocator;
use pomgraph_maven::repository::RemoteRepository;
use pomgraph_util::errors::{PomError, PomResult};
use serde::{Deserialize, Serialize};

/// Resolution settings, loadable from a TOML file such as `pomgraph.toml`:
///
/// ```toml
/// local-repository = "/home/me/.m2/repository"
/// remote-repositories = ["https://repo.maven.apache.org/maven2"]
/// verify-dependencies = true
/// strict-properties = false
/// http-timeout-secs = 30
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolverConfig {
    /// Root of a local Maven repository; `None` disables local lookup.
    #[serde(default)]
    pub local_repository: Option<PathBuf>,

    /// Remote repository base URLs, tried in order; empty disables remote lookup.
    #[serde(default)]
    pub remote_repositories: Vec<String>,

    /// Check that every resolved dependency exists in a repository.
    #[serde(default = "default_verify")]
    pub verify_dependencies: bool,

    /// Fail on `${...}` placeholders that have no value.
    #[serde(default)]
    pub strict_properties: bool,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            local_repository: None,
            remote_repositories: Vec::new(),
            verify_dependencies: default_verify(),
            strict_properties: false,
            http_timeout_secs: default_http_timeout(),
        }
    }
}

fn default_verify() -> bool {
    true
}

fn default_http_timeout() -> u64 {
    30
}

impl ResolverConfig {
    /// Parse a configuration from TOML text.
    pub fn parse_toml(content: &str) -> PomResult<Self> {
        toml::from_str(content).map_err(|e| PomError::Config {
            message: format!("Failed to parse resolver config: {e}"),
        })
    }

    /// Load a configuration file.
    pub fn from_path(path: &Path) -> PomResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PomError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse_toml(&content)
    }

    /// Build the repository locator described by this configuration.
    pub fn locator(&self) -> PomResult<RepositoryLocator> {
        let local = self.local_repository.clone().map(LocalRepository::new);
        let remotes = self
            .remote_repositories
            .iter()
            .map(|url| RemoteRepository::new(url))
            .collect();
        RepositoryLocator::new(local, remotes, Duration::from_secs(self.http_timeout_secs))
    }
}
