//! Union-find used to count connected components.
//!
//! Union by rank with path halving. Ties in rank are broken towards the lower
//! root id so the structure evolves deterministically for a given edge order.

pub(crate) struct UnionFind {
    parents: Vec<usize>,
    ranks: Vec<u8>,
    components: usize,
}

impl UnionFind {
    pub(crate) fn new(node_count: usize) -> Self {
        Self {
            parents: (0..node_count).collect(),
            ranks: vec![0; node_count],
            components: node_count,
        }
    }

    pub(crate) const fn components(&self) -> usize {
        self.components
    }

    /// Merges the sets holding `left` and `right`; returns whether they were disjoint.
    pub(crate) fn union(&mut self, left: usize, right: usize) -> bool {
        let left_root = self.find(left);
        let right_root = self.find(right);
        if left_root == right_root {
            return false;
        }

        let left_rank = self.ranks[left_root];
        let right_rank = self.ranks[right_root];
        let (parent, child) = choose_parent_child(left_root, right_root, left_rank, right_rank);
        self.parents[child] = parent;
        if left_rank == right_rank {
            self.ranks[parent] = self.ranks[parent].saturating_add(1);
        }
        self.components -= 1;
        true
    }

    pub(crate) fn find(&mut self, node: usize) -> usize {
        let mut current = node;
        loop {
            let parent = self.parents[current];
            if parent == current {
                return current;
            }
            let grandparent = self.parents[parent];
            self.parents[current] = grandparent;
            current = grandparent;
        }
    }
}

const fn ordered(first: usize, second: usize) -> (usize, usize) {
    if first <= second {
        (first, second)
    } else {
        (second, first)
    }
}

const fn choose_parent_child(
    left_root: usize,
    right_root: usize,
    left_rank: u8,
    right_rank: u8,
) -> (usize, usize) {
    if left_rank > right_rank {
        return (left_root, right_root);
    }
    if right_rank > left_rank {
        return (right_root, left_root);
    }
    ordered(left_root, right_root)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn isolated_nodes_are_their_own_components() {
        let union_find = UnionFind::new(4);
        assert_eq!(union_find.components(), 4);
    }

    #[rstest]
    fn unions_merge_components_once() {
        let mut union_find = UnionFind::new(5);
        assert!(union_find.union(0, 1));
        assert!(union_find.union(1, 2));
        assert!(!union_find.union(2, 0));
        assert!(union_find.union(3, 4));
        assert_eq!(union_find.components(), 2);
        assert_eq!(union_find.find(0), union_find.find(2));
        assert_ne!(union_find.find(0), union_find.find(3));
    }

    #[rstest]
    fn equal_ranks_prefer_lower_root() {
        let mut union_find = UnionFind::new(2);
        union_find.union(1, 0);
        assert_eq!(union_find.find(1), 0);
    }
}
