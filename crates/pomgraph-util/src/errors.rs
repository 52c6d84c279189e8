use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for manifest resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PomError {
    /// A coordinate is absent from every configured local and remote repository.
    #[error("{group_id}:{artifact_id}:{version} was not found in local/remote repositories")]
    #[diagnostic(help(
        "Check the local repository root and the remote repository URLs, or verify the coordinate"
    ))]
    NotFound {
        group_id: String,
        artifact_id: String,
        version: String,
    },

    /// A module directory or module manifest does not exist on disk.
    ///
    /// Rendered like a `stat` failure: `stat <path>: no such file or directory`.
    #[error("stat {}: {}", path.display(), stat_message(source))]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest could not be decoded or describes an impossible graph.
    #[error("malformed manifest: {message}")]
    Malformed { message: String },

    /// A local file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be set up.
    #[error("Network error: {message}")]
    Network { message: String },

    /// A `${...}` placeholder had no value while strict properties were enabled.
    #[error("unresolved property `{key}`")]
    #[diagnostic(help("Declare the property or disable strict property resolution"))]
    UnresolvedProperty { key: String },

    /// Invalid or unreadable resolver configuration.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Native-style description of a failed `stat`, without the `(os error N)` suffix.
fn stat_message(source: &std::io::Error) -> String {
    match source.kind() {
        std::io::ErrorKind::NotFound => "no such file or directory".to_string(),
        std::io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        _ => {
            let text = source.to_string();
            match text.find(" (os error ") {
                Some(end) => text[..end].to_lowercase(),
                None => text,
            }
        }
    }
}

impl PomError {
    /// Build a [`PomError::NotFound`] from coordinate parts.
    pub fn not_found(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self::NotFound {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
        }
    }

    /// Build a [`PomError::Malformed`] from anything printable.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// Convenience alias for results carrying a [`PomError`].
pub type PomResult<T> = Result<T, PomError>;
