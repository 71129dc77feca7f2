//! Union-find over a growing domain of variables.
//!
//! Elements are arena indices handed out by [`UnionFind::add`]; the domain only
//! grows and classes are only ever merged.

use super::types::VariableId;

/// Disjoint-set structure used by the builder to track join-connected variables
pub trait UnionFind {
    /// Add a fresh singleton element and return its id
    fn add(&mut self) -> VariableId;

    /// Current representative of the class containing `id`
    ///
    /// # Panics
    ///
    /// Panics if `id` was not returned by [`UnionFind::add`] on this instance.
    fn find(&mut self, id: VariableId) -> VariableId;

    /// Merge the classes of `a` and `b`; returns `false` when they were already joined
    fn union(&mut self, a: VariableId, b: VariableId) -> bool;

    /// Number of elements
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of disjoint classes
    fn class_count(&self) -> usize;
}

/// Parent-pointer forest with path compression and union by rank
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArenaUnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
    classes: usize,
}

impl ArenaUnionFind {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UnionFind for ArenaUnionFind {
    fn add(&mut self) -> VariableId {
        let idx = self.parent.len();
        self.parent.push(idx);
        self.rank.push(0);
        self.classes += 1;
        VariableId(idx)
    }

    fn find(&mut self, id: VariableId) -> VariableId {
        let mut root = id.0;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut idx = id.0;
        while self.parent[idx] != root {
            let next = self.parent[idx];
            self.parent[idx] = root;
            idx = next;
        }

        VariableId(root)
    }

    fn union(&mut self, a: VariableId, b: VariableId) -> bool {
        let left_root = self.find(a).0;
        let right_root = self.find(b).0;
        if left_root == right_root {
            return false;
        }

        let left_rank = self.rank[left_root];
        let right_rank = self.rank[right_root];
        match left_rank.cmp(&right_rank) {
            std::cmp::Ordering::Less => {
                self.parent[left_root] = right_root;
            }
            std::cmp::Ordering::Greater => {
                self.parent[right_root] = left_root;
            }
            std::cmp::Ordering::Equal => {
                self.parent[right_root] = left_root;
                self.rank[left_root] = left_rank + 1;
            }
        }
        self.classes -= 1;
        true
    }

    fn len(&self) -> usize {
        self.parent.len()
    }

    fn class_count(&self) -> usize {
        self.classes
    }
}
