use std::collections::HashSet;

use crate::value::Identity;

/// Identities of the composites on the path from the root to the node
/// currently being serialized.
///
/// A composite is entered before its children are visited and exited once
/// they are done, so siblings that share a reference never see each other.
#[derive(Debug, Default)]
pub(crate) struct VisitedPath {
    on_path: HashSet<Identity>,
}

impl VisitedPath {
    pub(crate) fn contains(&self, id: Identity) -> bool {
        self.on_path.contains(&id)
    }

    /// Number of composites currently on the path.
    pub(crate) fn depth(&self) -> usize {
        self.on_path.len()
    }

    pub(crate) fn enter(&mut self, id: Identity) {
        let fresh = self.on_path.insert(id);
        debug_assert!(fresh, "entered a composite that is already on the path");
    }

    pub(crate) fn exit(&mut self, id: Identity) {
        let removed = self.on_path.remove(&id);
        debug_assert!(removed, "exited a composite that was never entered");
    }
}
