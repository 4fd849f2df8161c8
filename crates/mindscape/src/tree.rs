//! Parent/children structure derived from a flat node list.
//!
//! Nodes are addressed by their index in the input slice. The children adjacency keeps the input
//! order among siblings, and every traversal uses an explicit stack or queue so deep or skewed
//! mindmaps cannot exhaust the call stack. A `visited` mask makes traversals terminate on
//! malformed input (`parentId` cycles, self-parenting).

use crate::model::Node;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct MindmapTree<'a> {
    nodes: &'a [Node],
    index_of: FxHashMap<&'a str, usize>,
    children: Vec<Vec<usize>>,
    root: Option<usize>,
}

impl<'a> MindmapTree<'a> {
    /// O(n). The root is the first node with `depth == 0` or a missing/empty `parentId`.
    /// On duplicate ids the first occurrence owns the id.
    pub fn build(nodes: &'a [Node]) -> Self {
        let mut index_of: FxHashMap<&'a str, usize> = FxHashMap::default();
        index_of.reserve(nodes.len());
        for (i, n) in nodes.iter().enumerate() {
            index_of.entry(n.id.as_str()).or_insert(i);
        }

        let root = nodes.iter().position(Node::is_root_candidate);

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        for (i, n) in nodes.iter().enumerate() {
            if Some(i) == root {
                continue;
            }
            let Some(p) = n.parent().and_then(|p| index_of.get(p).copied()) else {
                continue;
            };
            if p != i {
                children[p].push(i);
            }
        }

        Self {
            nodes,
            index_of,
            children,
            root,
        }
    }

    pub fn nodes(&self) -> &'a [Node] {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<usize> {
        self.root
    }

    pub fn root_node(&self) -> Option<&'a Node> {
        self.root.map(|r| &self.nodes[r])
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_of.get(id).copied()
    }

    pub fn node(&self, idx: usize) -> &'a Node {
        &self.nodes[idx]
    }

    pub fn children(&self, idx: usize) -> &[usize] {
        &self.children[idx]
    }

    pub fn children_of(&self, id: &str) -> Vec<&'a Node> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        self.children[idx].iter().map(|&c| &self.nodes[c]).collect()
    }

    /// Pre-order indices of `idx` and all of its descendants.
    pub fn subtree(&self, idx: usize) -> Vec<usize> {
        let mut visited = vec![false; self.nodes.len()];
        let mut out = Vec::new();
        let mut stack = vec![idx];
        while let Some(i) = stack.pop() {
            if std::mem::replace(&mut visited[i], true) {
                continue;
            }
            out.push(i);
            // Reverse so the first child is visited first.
            stack.extend(self.children[i].iter().rev().copied());
        }
        out
    }

    /// The id itself plus every descendant id. Empty for unknown ids.
    pub fn subtree_ids(&self, id: &str) -> Vec<&'a str> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        self.subtree(idx)
            .into_iter()
            .map(|i| self.nodes[i].id.as_str())
            .collect()
    }

    /// Breadth-first `(index, level)` pairs starting at `start` (level 0).
    pub fn breadth_first(&self, start: usize) -> Vec<(usize, usize)> {
        let mut visited = vec![false; self.nodes.len()];
        let mut out = Vec::new();
        let mut queue: VecDeque<(usize, usize)> = VecDeque::from([(start, 0)]);
        visited[start] = true;
        while let Some((i, level)) = queue.pop_front() {
            out.push((i, level));
            for &c in &self.children[i] {
                if !std::mem::replace(&mut visited[c], true) {
                    queue.push_back((c, level + 1));
                }
            }
        }
        out
    }

    /// Post-order indices below `start`: every child appears before its parent.
    pub fn post_order(&self, start: usize) -> Vec<usize> {
        // Reversed pre-order: every node comes after all of its descendants.
        let mut pre = self.subtree(start);
        pre.reverse();
        pre
    }

    /// Mask of nodes reachable from the root.
    pub fn reachable(&self) -> Vec<bool> {
        let mut mask = vec![false; self.nodes.len()];
        if let Some(root) = self.root {
            for i in self.subtree(root) {
                mask[i] = true;
            }
        }
        mask
    }

    /// Unreachable nodes whose `parentId` is missing, empty or dangling, in input order.
    ///
    /// Their descendants are not listed; they hang off these nodes. Nodes that only sit in a
    /// `parentId` cycle are not orphans either.
    pub fn orphans(&self) -> Vec<usize> {
        let reachable = self.reachable();
        self.nodes
            .iter()
            .enumerate()
            .filter(|&(i, n)| {
                !reachable[i]
                    && n
                        .parent()
                        .and_then(|p| self.index_of(p))
                        .is_none_or(|p| p == i)
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Every unreachable node, orphans and their descendants included.
    pub fn unreachable(&self) -> Vec<usize> {
        self.reachable()
            .into_iter()
            .enumerate()
            .filter(|&(_, r)| !r)
            .map(|(i, _)| i)
            .collect()
    }

    /// Appends every orphan to the root's children. Returns how many were attached.
    pub fn attach_orphans_to_root(&mut self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let orphans = self.orphans();
        let count = orphans.len();
        self.children[root].extend(orphans);
        count
    }
}
