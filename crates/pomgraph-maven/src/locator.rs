//! Repository locator: finds a POM by coordinate in the local repository,
//! then in each remote repository in declaration order.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use pomgraph_util::errors::{PomError, PomResult};
use reqwest::blocking::Client;

use crate::coordinate::Coordinate;
use crate::download;
use crate::local::LocalRepository;
use crate::pom::{self, Pom};
use crate::repository::RemoteRepository;

/// Where POMs are looked up, in priority order.
#[derive(Debug, Clone)]
pub struct RepositoryLocator {
    local: Option<LocalRepository>,
    remotes: Vec<RemoteRepository>,
    client: Option<Client>,
}

impl RepositoryLocator {
    /// Create a locator. The HTTP client is only built when remote
    /// repositories are configured.
    pub fn new(
        local: Option<LocalRepository>,
        remotes: Vec<RemoteRepository>,
        timeout: Duration,
    ) -> PomResult<Self> {
        let client = if remotes.is_empty() {
            None
        } else {
            Some(download::build_client(timeout)?)
        };
        Ok(Self {
            local,
            remotes,
            client,
        })
    }

    /// Whether any local or remote source is configured.
    pub fn has_sources(&self) -> bool {
        self.local.is_some() || !self.remotes.is_empty()
    }

    /// Fetch the raw POM bytes of a coordinate without caching.
    pub fn locate(&self, coordinate: &Coordinate) -> PomResult<Vec<u8>> {
        if let Some(local) = &self.local {
            if let Some(bytes) = local.read_pom(coordinate)? {
                tracing::debug!("Found {coordinate} in local repository {}", local.root().display());
                return Ok(bytes);
            }
        }

        if let Some(client) = &self.client {
            for repo in &self.remotes {
                let url = repo.pom_url(coordinate);
                if let Some(bytes) = download::fetch_bytes(client, &url) {
                    tracing::debug!("Fetched {coordinate} from {}", repo.url);
                    return Ok(bytes);
                }
            }
        }

        Err(coordinate.not_found())
    }

    /// Start a fetch session whose lookups are memoized by coordinate.
    pub fn session(&self) -> FetchSession<'_> {
        FetchSession {
            locator: self,
            cache: HashMap::new(),
            present: HashSet::new(),
        }
    }
}

/// Per-resolution cache of decoded POMs keyed by coordinate.
///
/// A session lives for one top-level parse, so each coordinate is fetched at
/// most once per parse.
#[derive(Debug)]
pub struct FetchSession<'a> {
    locator: &'a RepositoryLocator,
    cache: HashMap<Coordinate, Arc<Pom>>,
    present: HashSet<Coordinate>,
}

impl FetchSession<'_> {
    pub fn locator(&self) -> &RepositoryLocator {
        self.locator
    }

    /// Locate and decode the POM of a coordinate, reusing earlier results.
    pub fn fetch_pom(&mut self, coordinate: &Coordinate) -> PomResult<Arc<Pom>> {
        if let Some(pom) = self.cache.get(coordinate) {
            return Ok(Arc::clone(pom));
        }

        let bytes = self.locator.locate(coordinate)?;
        let pom = pom::parse_pom_bytes(&bytes).map_err(|e| match e {
            PomError::Malformed { message } => {
                PomError::malformed(format!("{coordinate}: {message}"))
            }
            other => other,
        })?;
        let pom = Arc::new(pom);
        self.cache.insert(coordinate.clone(), Arc::clone(&pom));
        Ok(pom)
    }

    /// Check that a coordinate exists in some repository without decoding it.
    pub fn ensure_exists(&mut self, coordinate: &Coordinate) -> PomResult<()> {
        if self.cache.contains_key(coordinate) || self.present.contains(coordinate) {
            return Ok(());
        }
        self.locator.locate(coordinate)?;
        self.present.insert(coordinate.clone());
        Ok(())
    }

    /// Number of distinct coordinates fetched so far.
    pub fn fetched(&self) -> usize {
        self.cache.len() + self.present.len()
    }
}
