use super::Bounds2;
use crate::config::{QUAD_TREE_MAX_DEPTH, QUAD_TREE_SPLIT_THRESHOLD};

/// Drives a [`QuadTree::iterate`] traversal.
pub trait QuadTreeIterator<T> {
    /// Whether the traversal should descend into a node covering `bounds`.
    fn intersect(&self, bounds: &Bounds2) -> bool;

    /// Receives every item stored in an entered node, together with the
    /// item's own bounds. Implementations re-test the item bounds themselves.
    fn iterate(&mut self, bounds: &Bounds2, item: T);
}

#[derive(Debug, Clone)]
struct Node<T> {
    bounds: Bounds2,
    depth: u8,
    items: Vec<(Bounds2, T)>,
    children: Option<[usize; 4]>,
}

impl<T> Node<T> {
    fn leaf(bounds: Bounds2, depth: u8) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }
}

/// Loose quad-tree keyed by item bounds.
///
/// An item lives in the deepest node whose bounds fully contain it. Items
/// straddling a split line, or lying outside the root, stay in the parent
/// (root), which every traversal enters.
#[derive(Debug, Clone)]
pub struct QuadTree<T> {
    nodes: Vec<Node<T>>,
    split_threshold: usize,
    max_depth: u8,
    len: usize,
}

impl<T: Copy + PartialEq> QuadTree<T> {
    pub fn new(bounds: Bounds2) -> Self {
        Self::with_limits(bounds, QUAD_TREE_SPLIT_THRESHOLD, QUAD_TREE_MAX_DEPTH)
    }

    pub fn with_limits(bounds: Bounds2, split_threshold: usize, max_depth: u8) -> Self {
        Self {
            nodes: vec![Node::leaf(bounds, 0)],
            split_threshold: split_threshold.max(1),
            max_depth,
            len: 0,
        }
    }

    pub fn bounds(&self) -> Bounds2 {
        self.nodes[0].bounds
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        let bounds = self.bounds();
        self.nodes.clear();
        self.nodes.push(Node::leaf(bounds, 0));
        self.len = 0;
    }

    pub fn insert(&mut self, item: T, bounds: Bounds2) {
        let index = self.deepest_container(&bounds);
        self.nodes[index].items.push((bounds, item));
        self.len += 1;
        self.split_if_full(index);
    }

    /// Removes `item`, which must have been inserted with `bounds`.
    pub fn remove(&mut self, item: T, bounds: Bounds2) -> bool {
        let mut index = 0;
        loop {
            let node = &mut self.nodes[index];
            if let Some(pos) = node.items.iter().position(|(_, stored)| *stored == item) {
                node.items.swap_remove(pos);
                self.len -= 1;
                return true;
            }
            let Some(children) = node.children else {
                return false;
            };
            match self.containing_child(children, &bounds) {
                Some(child) => index = child,
                None => return false,
            }
        }
    }

    /// Depth-first traversal. The root is always entered; children only when
    /// the iterator accepts their bounds.
    pub fn iterate<I: QuadTreeIterator<T>>(&self, iterator: &mut I) {
        let mut stack = vec![0usize];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            for (bounds, item) in &node.items {
                iterator.iterate(bounds, *item);
            }
            if let Some(children) = node.children {
                for child in children {
                    if iterator.intersect(&self.nodes[child].bounds) {
                        stack.push(child);
                    }
                }
            }
        }
    }

    /// Calls `visit` for every item whose bounds intersect `query`.
    pub fn visit_intersecting(&self, query: Bounds2, visit: impl FnMut(T)) {
        struct Visitor<F> {
            query: Bounds2,
            visit: F,
        }

        impl<T, F: FnMut(T)> QuadTreeIterator<T> for Visitor<F> {
            fn intersect(&self, bounds: &Bounds2) -> bool {
                bounds.intersects(&self.query)
            }

            fn iterate(&mut self, bounds: &Bounds2, item: T) {
                if bounds.intersects(&self.query) {
                    (self.visit)(item);
                }
            }
        }

        self.iterate(&mut Visitor { query, visit });
    }

    pub fn query(&self, query: Bounds2) -> Vec<T> {
        let mut out = Vec::new();
        self.visit_intersecting(query, |item| out.push(item));
        out
    }

    fn deepest_container(&self, bounds: &Bounds2) -> usize {
        let mut index = 0;
        while let Some(children) = self.nodes[index].children {
            match self.containing_child(children, bounds) {
                Some(child) => index = child,
                None => break,
            }
        }
        index
    }

    fn containing_child(&self, children: [usize; 4], bounds: &Bounds2) -> Option<usize> {
        children
            .into_iter()
            .find(|&child| self.nodes[child].bounds.contains(bounds))
    }

    fn split_if_full(&mut self, index: usize) {
        let node = &self.nodes[index];
        if node.children.is_some()
            || node.items.len() <= self.split_threshold
            || node.depth >= self.max_depth
        {
            return;
        }

        let depth = node.depth + 1;
        let first = self.nodes.len();
        for quadrant in node.bounds.quadrants() {
            self.nodes.push(Node::leaf(quadrant, depth));
        }
        let children = [first, first + 1, first + 2, first + 3];
        self.nodes[index].children = Some(children);

        let items = std::mem::take(&mut self.nodes[index].items);
        for (bounds, item) in items {
            let target = self.containing_child(children, &bounds).unwrap_or(index);
            self.nodes[target].items.push((bounds, item));
        }
        for child in children {
            self.split_if_full(child);
        }
    }
}
