//! Maven repository protocol: coordinates, POM decoding, repository layout,
//! local repository access, HTTP download, and the repository locator.

pub mod coordinate;
pub mod download;
pub mod local;
pub mod locator;
pub mod pom;
pub mod repository;
