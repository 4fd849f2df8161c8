#![forbid(unsafe_code)]

//! Bulk-loaded 2-D R-tree for rectangle range queries.
//!
//! The tree is packed once with Sort-Tile-Recursive (STR) and is immutable afterwards: callers
//! that need a different item set build a new tree. This keeps the structure a flat arena of
//! nodes whose children are contiguous index ranges, and keeps every query iterative.

mod aabb;

pub use aabb::Aabb;

/// Default maximum number of children per node.
pub const DEFAULT_NODE_CAPACITY: usize = 9;

#[derive(Debug, Clone)]
struct Entry<T> {
    aabb: Aabb,
    data: T,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    aabb: Aabb,
    leaf: bool,
    // Every box below is finite, so `aabb` really encloses them all.
    finite: bool,
    // Leaves index into `entries`, inner nodes into `nodes`.
    start: usize,
    end: usize,
}

#[derive(Debug, Clone)]
pub struct RTree<T> {
    entries: Vec<Entry<T>>,
    nodes: Vec<Node>,
    root: Option<usize>,
    capacity: usize,
}

impl<T> Default for RTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RTree<T> {
    /// An empty tree; every query answers with nothing.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            nodes: Vec::new(),
            root: None,
            capacity: DEFAULT_NODE_CAPACITY,
        }
    }

    pub fn bulk_load(items: Vec<(Aabb, T)>) -> Self {
        Self::bulk_load_with_capacity(items, DEFAULT_NODE_CAPACITY)
    }

    /// Packs `items` with STR. `capacity` is clamped to at least 2.
    pub fn bulk_load_with_capacity(items: Vec<(Aabb, T)>, capacity: usize) -> Self {
        let capacity = capacity.max(2);
        let mut entries: Vec<Entry<T>> = items
            .into_iter()
            .map(|(aabb, data)| Entry { aabb, data })
            .collect();
        if entries.is_empty() {
            return Self {
                capacity,
                ..Self::new()
            };
        }

        str_order(&mut entries, capacity, |e| e.aabb);
        let mut level: Vec<Node> = entries
            .chunks(capacity)
            .enumerate()
            .map(|(i, chunk)| Node {
                aabb: union_all(chunk.iter().map(|e| &e.aabb)),
                leaf: true,
                finite: chunk.iter().all(|e| e.aabb.is_finite()),
                start: i * capacity,
                end: i * capacity + chunk.len(),
            })
            .collect();

        let mut nodes: Vec<Node> = Vec::new();
        while level.len() > 1 {
            str_order(&mut level, capacity, |n| n.aabb);
            let base = nodes.len();
            let parents: Vec<Node> = level
                .chunks(capacity)
                .enumerate()
                .map(|(i, chunk)| Node {
                    aabb: union_all(chunk.iter().map(|n| &n.aabb)),
                    leaf: false,
                    finite: chunk.iter().all(|n| n.finite),
                    start: base + i * capacity,
                    end: base + i * capacity + chunk.len(),
                })
                .collect();
            nodes.extend(level);
            level = parents;
        }

        let root = nodes.len();
        nodes.extend(level);

        Self {
            entries,
            nodes,
            root: Some(root),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bounding box of every item, or `None` for an empty tree.
    pub fn bounds(&self) -> Option<Aabb> {
        self.root.map(|r| self.nodes[r].aabb)
    }

    /// Number of node levels, leaves included. An empty tree has height 0.
    pub fn height(&self) -> usize {
        let Some(mut idx) = self.root else {
            return 0;
        };
        let mut h = 1;
        while !self.nodes[idx].leaf {
            idx = self.nodes[idx].start;
            h += 1;
        }
        h
    }

    /// All items in packing order.
    pub fn iter(&self) -> impl Iterator<Item = (&Aabb, &T)> + '_ {
        self.entries.iter().map(|e| (&e.aabb, &e.data))
    }

    /// Calls `visit` for every item whose box intersects `query`.
    pub fn search_with<'a>(&'a self, query: &Aabb, mut visit: impl FnMut(&'a Aabb, &'a T)) {
        let Some(root) = self.root else {
            return;
        };
        let mut stack: Vec<usize> = vec![root];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if !node.aabb.intersects(query) {
                continue;
            }
            if node.leaf {
                for e in &self.entries[node.start..node.end] {
                    if e.aabb.intersects(query) {
                        visit(&e.aabb, &e.data);
                    }
                }
            } else if node.finite && query.contains(&node.aabb) {
                self.collect_all(idx, &mut visit);
            } else {
                stack.extend(node.start..node.end);
            }
        }
    }

    pub fn search(&self, query: &Aabb) -> Vec<&T> {
        let mut out = Vec::new();
        self.search_with(query, |_, data| out.push(data));
        out
    }

    /// Whether any item intersects `query`; stops at the first hit.
    pub fn collides(&self, query: &Aabb) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        let mut stack: Vec<usize> = vec![root];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if !node.aabb.intersects(query) {
                continue;
            }
            if node.leaf {
                if self.entries[node.start..node.end]
                    .iter()
                    .any(|e| e.aabb.intersects(query))
                {
                    return true;
                }
            } else {
                stack.extend(node.start..node.end);
            }
        }
        false
    }

    // Every item below `idx` intersects the query; skip the per-node tests.
    fn collect_all<'a>(&'a self, idx: usize, visit: &mut impl FnMut(&'a Aabb, &'a T)) {
        let mut stack: Vec<usize> = vec![idx];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if node.leaf {
                for e in &self.entries[node.start..node.end] {
                    visit(&e.aabb, &e.data);
                }
            } else {
                stack.extend(node.start..node.end);
            }
        }
    }
}

impl<T> FromIterator<(Aabb, T)> for RTree<T> {
    fn from_iter<I: IntoIterator<Item = (Aabb, T)>>(iter: I) -> Self {
        Self::bulk_load(iter.into_iter().collect())
    }
}

fn union_all<'a>(boxes: impl Iterator<Item = &'a Aabb>) -> Aabb {
    boxes.fold(Aabb::EMPTY, |acc, b| acc.union(b))
}

/// Reorders `items` so that consecutive `capacity`-sized chunks form STR tiles: sort by centre
/// x, cut into `ceil(sqrt(leaf_count))` vertical slices, then sort each slice by centre y.
fn str_order<I>(items: &mut [I], capacity: usize, aabb: impl Fn(&I) -> Aabb) {
    let leaf_count = items.len().div_ceil(capacity);
    let slice_count = (leaf_count as f64).sqrt().ceil().max(1.0) as usize;
    let slice_len = slice_count * capacity;

    items.sort_by(|a, b| aabb(a).center().0.total_cmp(&aabb(b).center().0));
    for slice in items.chunks_mut(slice_len) {
        slice.sort_by(|a, b| aabb(a).center().1.total_cmp(&aabb(b).center().1));
    }
}
