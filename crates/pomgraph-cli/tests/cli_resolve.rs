use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn pomgraph_cmd() -> Command {
    let mut cmd = Command::cargo_bin("pomgraph").unwrap();
    cmd.env_remove("MAVEN_HOME")
        .env_remove("POMGRAPH_REMOTE_REPOSITORIES")
        .env_remove("RUST_LOG");
    cmd
}

const APP_POM: &str = r#"<project>
    <groupId>com.example</groupId>
    <artifactId>app</artifactId>
    <version>1.0.0</version>
    <dependencies>
        <dependency>
            <groupId>org.example</groupId>
            <artifactId>example-dependency</artifactId>
            <version>1.2.3</version>
        </dependency>
        <dependency>
            <groupId>org.example</groupId>
            <artifactId>example-api</artifactId>
            <version>1.7.30</version>
        </dependency>
    </dependencies>
</project>"#;

fn publish(repo: &Path, group: &str, artifact: &str, version: &str) {
    let dir = repo
        .join(group.replace('.', "/"))
        .join(artifact)
        .join(version);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(format!("{artifact}-{version}.pom")),
        format!(
            "<project><groupId>{group}</groupId><artifactId>{artifact}</artifactId><version>{version}</version></project>"
        ),
    )
    .unwrap();
}

/// A project directory plus a local repository holding its dependencies.
fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("pom.xml"), APP_POM).unwrap();
    let repo = tmp.path().join("repository");
    publish(&repo, "org.example", "example-api", "1.7.30");
    publish(&repo, "org.example", "example-dependency", "1.2.3");
    tmp
}

#[test]
fn test_text_output_in_declaration_order() {
    let tmp = project();
    pomgraph_cmd()
        .current_dir(tmp.path())
        .args(["pom.xml", "--local-repository", "repository"])
        .assert()
        .success()
        .stdout(
            "com.example:app 1.0.0\n\
             org.example:example-dependency 1.2.3\n\
             org.example:example-api 1.7.30\n",
        )
        .stderr(predicate::str::contains("Resolved"));
}

#[test]
fn test_sorted_output() {
    let tmp = project();
    pomgraph_cmd()
        .current_dir(tmp.path())
        .args(["pom.xml", "--local-repository", "repository", "--sort"])
        .assert()
        .success()
        .stdout(
            "com.example:app 1.0.0\n\
             org.example:example-api 1.7.30\n\
             org.example:example-dependency 1.2.3\n",
        );
}

#[test]
fn test_json_output() {
    let tmp = project();
    let output = pomgraph_cmd()
        .current_dir(tmp.path())
        .args(["pom.xml", "--local-repository", "repository", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["name"], "com.example:app");
    assert_eq!(entries[0]["version"], "1.0.0");
}

#[test]
fn test_maven_home_env_uses_its_repository_directory() {
    let tmp = project();
    pomgraph_cmd()
        .current_dir(tmp.path())
        .env("MAVEN_HOME", tmp.path())
        .arg("pom.xml")
        .assert()
        .success()
        .stdout(predicate::str::contains("org.example:example-api 1.7.30"));
}

#[test]
fn test_maven_home_pointing_at_repository_root_finds_nothing() {
    let tmp = project();
    pomgraph_cmd()
        .current_dir(tmp.path())
        .env("MAVEN_HOME", tmp.path().join("repository"))
        .arg("pom.xml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("was not found"));
}

#[test]
fn test_config_file_sets_local_repository() {
    let tmp = project();
    fs::write(
        tmp.path().join("pomgraph.toml"),
        "local-repository = \"repository\"\n",
    )
    .unwrap();
    pomgraph_cmd()
        .current_dir(tmp.path())
        .args(["pom.xml", "--config", "pomgraph.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.example:app 1.0.0"));
}

#[test]
fn test_missing_dependency_fails() {
    let tmp = project();
    fs::remove_dir_all(tmp.path().join("repository/org/example/example-api")).unwrap();
    pomgraph_cmd()
        .current_dir(tmp.path())
        .args(["pom.xml", "--local-repository", "repository"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("org.example:example-api:1.7.30")
                .and(predicate::str::contains("was not found")),
        );
}

#[test]
fn test_no_verify_skips_repository_checks() {
    let tmp = project();
    fs::remove_dir_all(tmp.path().join("repository")).unwrap();
    pomgraph_cmd()
        .current_dir(tmp.path())
        .args(["pom.xml", "--local-repository", "repository", "--no-verify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("org.example:example-api 1.7.30"));
}

#[test]
fn test_missing_manifest_fails() {
    let tmp = TempDir::new().unwrap();
    pomgraph_cmd()
        .current_dir(tmp.path())
        .arg("pom.xml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read pom.xml"));
}

#[test]
fn test_missing_config_file_fails() {
    let tmp = project();
    pomgraph_cmd()
        .current_dir(tmp.path())
        .args(["pom.xml", "--config", "absent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
