//! Visited-type registry used to terminate recursion on cyclic type graphs.

use log::trace;
use std::collections::HashSet;

/// Immutable set of type identities already expanded along the current path
/// from the root to the current node.
///
/// Descending one level produces a new, independent registry via
/// [`VisitedTypes::with_visited`]; the receiver is never mutated. This keeps
/// sibling branches isolated: two sibling fields of the same element type are
/// each allowed to expand that type once independently.
#[derive(Debug, Clone, Default)]
pub struct VisitedTypes {
    visited: HashSet<String>,
}

impl VisitedTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether a type was already expanded in this branch. Identity is
    /// the qualified type name; generic parameters carry no separate identity.
    pub fn was_visited(&self, qualified_name: &str) -> bool {
        let visited = self.visited.contains(qualified_name);
        trace!(" - was visited? {} -> {}", qualified_name, visited);
        visited
    }

    /// Returns a new registry that additionally contains the given batch of
    /// types, leaving the receiver untouched.
    pub fn with_visited<I, S>(&self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut visited = self.visited.clone();
        visited.extend(types.into_iter().map(Into::into));
        Self { visited }
    }
}
