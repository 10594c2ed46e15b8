//! Disjoint-set forest over dense indices.
//!
//! Path compression plus union by rank keeps clustering cost near
//! linear over a window without recursive graph traversal.

pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl UnionFind {
    pub fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    pub fn find(&mut self, item: usize) -> usize {
        let mut root = item;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Compress the walked path.
        let mut current = item;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    pub fn union(&mut self, left: usize, right: usize) {
        let root_left = self.find(left);
        let root_right = self.find(right);
        if root_left == root_right {
            return;
        }
        match self.rank[root_left].cmp(&self.rank[root_right]) {
            std::cmp::Ordering::Less => self.parent[root_left] = root_right,
            std::cmp::Ordering::Greater => self.parent[root_right] = root_left,
            std::cmp::Ordering::Equal => {
                self.parent[root_right] = root_left;
                self.rank[root_left] += 1;
            }
        }
    }
}
