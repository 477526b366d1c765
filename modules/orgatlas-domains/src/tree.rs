//! Bounded-depth traversal over the activity taxonomy.
//!
//! Pure functions over a borrowed snapshot of activity rows. The snapshot is
//! the complete `activities` table; the child adjacency is rebuilt from
//! parent links on every call, so the index can never go stale.

use std::collections::{HashMap, HashSet};

use orgatlas_common::Activity;

// ---------------------------------------------------------------------------
// ActivityTree
// ---------------------------------------------------------------------------

/// Id lookup plus child adjacency inverted from parent links.
///
/// Children of a node are kept in snapshot iteration order, so traversal
/// output is deterministic for a given snapshot but carries no other
/// sibling-order guarantee.
pub struct ActivityTree {
    ids: HashSet<i32>,
    children: HashMap<i32, Vec<i32>>,
}

impl ActivityTree {
    /// Build the index from a snapshot. O(n) in snapshot size.
    pub fn new(snapshot: &[Activity]) -> Self {
        let mut ids = HashSet::with_capacity(snapshot.len());
        let mut children: HashMap<i32, Vec<i32>> = HashMap::new();

        for activity in snapshot {
            ids.insert(activity.id);
            if let Some(parent_id) = activity.parent_id {
                children.entry(parent_id).or_default().push(activity.id);
            }
        }

        Self { ids, children }
    }

    /// Collect the ids of `root_id` and every descendant within `max_level`
    /// hierarchy levels, pre-order. The root itself counts as level 1, so
    /// `max_level = 1` yields `[root_id]` alone.
    ///
    /// An absent root yields an empty vec ("nothing matched", never an
    /// error). A parent cycle in a corrupted snapshot terminates early: the
    /// visited guard emits each node at most once.
    pub fn gather_descendant_ids(&self, root_id: i32, max_level: u32) -> Vec<i32> {
        let mut result = Vec::new();
        let mut visited = HashSet::new();
        self.walk(root_id, 1, max_level, &mut visited, &mut result);
        result
    }

    fn walk(
        &self,
        id: i32,
        level: u32,
        max_level: u32,
        visited: &mut HashSet<i32>,
        out: &mut Vec<i32>,
    ) {
        if level > max_level || !self.ids.contains(&id) || !visited.insert(id) {
            return;
        }
        out.push(id);
        if let Some(children) = self.children.get(&id) {
            for &child in children {
                self.walk(child, level + 1, max_level, visited, out);
            }
        }
    }
}

// ===========================================================================
// Unit tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: i32, parent_id: Option<i32>) -> Activity {
        Activity {
            id,
            name: format!("activity-{id}"),
            parent_id,
        }
    }

    /// Two roots, three levels each:
    /// 1 → (2 → 4, 3 → 5)   and   10 → (11 → 12)
    fn forest() -> Vec<Activity> {
        vec![
            activity(1, None),
            activity(2, Some(1)),
            activity(3, Some(1)),
            activity(4, Some(2)),
            activity(5, Some(3)),
            activity(10, None),
            activity(11, Some(10)),
            activity(12, Some(11)),
        ]
    }

    #[test]
    fn level_one_returns_only_root() {
        let snapshot = forest();
        let tree = ActivityTree::new(&snapshot);
        assert_eq!(tree.gather_descendant_ids(1, 1), vec![1]);
    }

    #[test]
    fn absent_root_returns_empty() {
        let snapshot = forest();
        let tree = ActivityTree::new(&snapshot);
        assert!(tree.gather_descendant_ids(999, 3).is_empty());
    }

    #[test]
    fn level_two_excludes_grandchildren() {
        let snapshot = forest();
        let tree = ActivityTree::new(&snapshot);
        let ids = tree.gather_descendant_ids(1, 2);
        assert!(ids.contains(&1));
        assert!(ids.contains(&2));
        assert!(ids.contains(&3));
        assert!(!ids.contains(&4), "grandchild leaked into level-2 gather");
        assert!(!ids.contains(&5), "grandchild leaked into level-2 gather");
    }

    #[test]
    fn level_three_includes_all_generations() {
        let snapshot = forest();
        let tree = ActivityTree::new(&snapshot);
        let ids = tree.gather_descendant_ids(1, 3);
        assert_eq!(ids, vec![1, 2, 4, 3, 5]);
    }

    #[test]
    fn traversal_is_preorder_in_snapshot_order() {
        let snapshot = forest();
        let tree = ActivityTree::new(&snapshot);
        assert_eq!(tree.gather_descendant_ids(10, 3), vec![10, 11, 12]);
    }

    #[test]
    fn result_grows_monotonically_with_level() {
        let snapshot = forest();
        let tree = ActivityTree::new(&snapshot);
        let mut previous: Vec<i32> = Vec::new();
        for level in 1..=5 {
            let current = tree.gather_descendant_ids(1, level);
            assert!(
                previous.iter().all(|id| current.contains(id)),
                "level {level} lost ids present at level {}",
                level - 1
            );
            assert!(current.len() >= previous.len());
            previous = current;
        }
        // Depth under root 1 is 3; deeper bounds change nothing.
        assert_eq!(previous, tree.gather_descendant_ids(1, 3));
    }

    #[test]
    fn other_root_is_never_gathered() {
        let snapshot = forest();
        let tree = ActivityTree::new(&snapshot);
        let ids = tree.gather_descendant_ids(1, 3);
        assert!(!ids.contains(&10));
        assert!(!ids.contains(&11));
    }

    #[test]
    fn subtree_root_gathers_its_branch_only() {
        let snapshot = forest();
        let tree = ActivityTree::new(&snapshot);
        assert_eq!(tree.gather_descendant_ids(2, 3), vec![2, 4]);
    }

    #[test]
    fn no_duplicates_in_result() {
        let snapshot = forest();
        let tree = ActivityTree::new(&snapshot);
        let ids = tree.gather_descendant_ids(1, 3);
        let unique: HashSet<i32> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn parent_cycle_terminates_and_emits_each_node_once() {
        // Corrupted data: 1 → 2 → 3 → 1. The forest invariant is violated;
        // the visited guard must still terminate the walk.
        let snapshot = vec![activity(1, Some(3)), activity(2, Some(1)), activity(3, Some(2))];
        let tree = ActivityTree::new(&snapshot);
        // A bound far beyond the cycle length would loop without the guard.
        let ids = tree.gather_descendant_ids(1, 50);
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn empty_snapshot_returns_empty() {
        let tree = ActivityTree::new(&[]);
        assert!(tree.gather_descendant_ids(1, 3).is_empty());
    }
}
