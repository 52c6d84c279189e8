//! CLI argument definitions for pomgraph.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pomgraph_resolver::ResolverConfig;
use pomgraph_util::errors::PomResult;

#[derive(Parser, Debug)]
#[command(
    name = "pomgraph",
    version,
    about = "Print the libraries a Maven project declares",
    long_about = "pomgraph resolves a pom.xml into its effective dependency list: parent \
                  inheritance, property interpolation, dependency management imports and \
                  module aggregation, without building anything."
)]
pub struct Cli {
    /// Path to the project's pom.xml
    pub pom: PathBuf,

    /// Root of the local Maven repository
    #[arg(long, value_name = "DIR")]
    pub local_repository: Option<PathBuf>,

    /// Maven home; its `repository` directory is the local repository
    /// unless one is given explicitly
    #[arg(long, env = "MAVEN_HOME", value_name = "DIR")]
    pub maven_home: Option<PathBuf>,

    /// Remote repository base URL, tried in the order given
    #[arg(
        long = "remote-repository",
        env = "POMGRAPH_REMOTE_REPOSITORIES",
        value_name = "URL",
        value_delimiter = ','
    )]
    pub remote_repositories: Vec<String>,

    /// Resolver configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Do not check that resolved dependencies exist in a repository
    #[arg(long)]
    pub no_verify: bool,

    /// Fail on `${...}` placeholders without a value
    #[arg(long)]
    pub strict_properties: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Sort output by name, then version
    #[arg(long)]
    pub sort: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// One `name version` line per library
    Text,
    /// A JSON array of `{"name", "version"}` objects
    Json,
}

impl Cli {
    /// The configuration file, if any, with command-line flags applied on top.
    ///
    /// The local repository is taken from `--local-repository`, then the
    /// configuration file, then `<maven home>/repository`.
    pub fn resolver_config(&self) -> PomResult<ResolverConfig> {
        let mut config = match &self.config {
            Some(path) => ResolverConfig::from_path(path)?,
            None => ResolverConfig::default(),
        };
        if let Some(dir) = &self.local_repository {
            config.local_repository = Some(dir.clone());
        } else if config.local_repository.is_none() {
            config.local_repository = self.maven_home.as_ref().map(|home| home.join("repository"));
        }
        if !self.remote_repositories.is_empty() {
            config.remote_repositories = self.remote_repositories.clone();
        }
        if self.no_verify {
            config.verify_dependencies = false;
        }
        if self.strict_properties {
            config.strict_properties = true;
        }
        Ok(config)
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
