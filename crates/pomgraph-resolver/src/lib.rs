//! Effective POM resolution: property interpolation, parent inheritance,
//! dependency-management imports, soft/hard version precedence, and module
//! aggregation into a flat library list.

pub mod chain;
pub mod config;
pub mod cycle;
pub mod effective;
pub mod management;
pub mod properties;
pub mod resolver;
pub mod version;

pub use config::ResolverConfig;
pub use effective::{EffectiveManifest, Library};
pub use resolver::PomParser;
