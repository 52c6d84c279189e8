//! Maven repository layout and remote repository configuration.

use crate::coordinate::Coordinate;

/// Standard Maven layout path for a given coordinate.
///
/// `org.example:example-api:1.7.30` becomes `org/example/example-api/1.7.30`
pub fn coordinate_path(coordinate: &Coordinate) -> String {
    format!(
        "{}/{}/{}",
        coordinate.group_id.replace('.', "/"),
        coordinate.artifact_id,
        coordinate.version
    )
}

/// File name of the POM for a coordinate: `<artifactId>-<version>.pom`.
pub fn pom_filename(coordinate: &Coordinate) -> String {
    format!("{}-{}.pom", coordinate.artifact_id, coordinate.version)
}

/// A remote Maven repository reachable over HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    pub url: String,
}

impl RemoteRepository {
    /// Build a repository from a base URL; trailing slashes are ignored.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
        }
    }

    /// URL to the POM file for a given coordinate.
    pub fn pom_url(&self, coordinate: &Coordinate) -> String {
        format!(
            "{}/{}/{}",
            self.url,
            coordinate_path(coordinate),
            pom_filename(coordinate)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_path_replaces_dots() {
        let c = Coordinate::new("org.apache.commons", "commons-lang3", "3.14.0");
        assert_eq!(
            coordinate_path(&c),
            "org/apache/commons/commons-lang3/3.14.0"
        );
    }

    #[test]
    fn pom_url_format() {
        let repo = RemoteRepository::new("https://repo.maven.apache.org/maven2");
        let c = Coordinate::new("org.example", "example-api", "1.7.30");
        assert_eq!(
            repo.pom_url(&c),
            "https://repo.maven.apache.org/maven2/org/example/example-api/1.7.30/example-api-1.7.30.pom"
        );
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let repo = RemoteRepository::new("https://repo.example.com/maven/");
        assert_eq!(repo.url, "https://repo.example.com/maven");
    }
}
