//! Guard against manifests that reach themselves through parents or imports.

use pomgraph_maven::coordinate::Coordinate;
use pomgraph_util::errors::{PomError, PomResult};

/// Longest parent/import nesting accepted before giving up.
pub const MAX_DEPTH: usize = 64;

/// Coordinates currently being resolved, outermost first.
#[derive(Debug, Default)]
pub struct ResolutionStack {
    active: Vec<Coordinate>,
}

impl ResolutionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a coordinate. Fails if it is already being resolved or the
    /// nesting is too deep.
    pub fn enter(&mut self, coordinate: &Coordinate) -> PomResult<()> {
        if self.active.contains(coordinate) {
            let path: Vec<String> = self
                .active
                .iter()
                .skip_while(|c| *c != coordinate)
                .map(ToString::to_string)
                .collect();
            return Err(PomError::malformed(format!(
                "cyclic reference: {} -> {coordinate}",
                path.join(" -> ")
            )));
        }
        if self.active.len() >= MAX_DEPTH {
            return Err(PomError::malformed(format!(
                "reference chain deeper than {MAX_DEPTH} manifests at {coordinate}"
            )));
        }
        self.active.push(coordinate.clone());
        Ok(())
    }

    /// Leave the most recently entered coordinate.
    pub fn leave(&mut self) {
        self.active.pop();
    }

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.active.contains(coordinate)
    }
}
