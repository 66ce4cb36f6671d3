//! Identity tracking for the active recursion path.

use crate::inspect::Identity;
use std::collections::HashSet;

/// Identities of the objects currently being rendered, root first.
///
/// Membership is by reference identity, never by value. An identity stays
/// in the set only while its subtree is being rendered; the renderer's
/// descent guard removes it on every exit path.
#[derive(Debug, Default)]
pub(crate) struct VisitedSet {
    active: HashSet<Identity>,
}

impl VisitedSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Marks `identity` as on the path. Returns `false` if it already was,
    /// which means a cycle.
    ///
    /// Zero-sized values are never tracked; the depth limit bounds them.
    pub(crate) fn enter(&mut self, identity: Identity) -> bool {
        identity.is_zero_sized() || self.active.insert(identity)
    }

    pub(crate) fn leave(&mut self, identity: &Identity) {
        self.active.remove(identity);
    }

    pub(crate) fn contains(&self, identity: &Identity) -> bool {
        self.active.contains(identity)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_detects_repeat() {
        let node = String::from("node");
        let mut visited = VisitedSet::new();

        assert!(visited.enter(Identity::of(&node)));
        assert!(!visited.enter(Identity::of(&node)));
        assert!(visited.contains(&Identity::of(&node)));

        visited.leave(&Identity::of(&node));
        assert!(visited.is_empty());
        assert!(visited.enter(Identity::of(&node)));
    }

    #[test]
    fn test_equal_values_are_distinct_identities() {
        let a = String::from("same");
        let b = String::from("same");
        let mut visited = VisitedSet::new();

        assert!(visited.enter(Identity::of(&a)));
        assert!(visited.enter(Identity::of(&b)));
    }

    #[test]
    fn test_zero_sized_values_are_not_tracked() {
        struct Unit;
        let first = Unit;
        let mut visited = VisitedSet::new();

        assert!(visited.enter(Identity::of(&first)));
        assert!(visited.enter(Identity::of(&first)));
        assert!(!visited.contains(&Identity::of(&first)));
        assert!(visited.is_empty());
    }
}
