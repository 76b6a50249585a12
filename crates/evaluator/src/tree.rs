use std::cmp::Ordering;

use crate::bounds::Bound;

/// Opaque reference to a node of a [`BoundTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(u32);

impl NodeHandle {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A leaf holding the index of one of the bounds the tree was built from.
    Leaf(usize),
    Internal(NodeHandle, NodeHandle),
}

#[derive(Debug, Clone)]
struct Node<B> {
    bound: B,
    kind: NodeKind,
}

/// A balanced binary bounding volume hierarchy over an array of boxes.
///
/// Nodes live in a flat arena and are addressed by [`NodeHandle`]. Every leaf
/// refers to exactly one input bound, and every internal node's bound is the
/// union of its two children. The tree is built once and never modified.
#[derive(Debug, Clone)]
pub struct BoundTree<B: Bound> {
    nodes: Vec<Node<B>>,
    root: Option<NodeHandle>,
    leaves: usize,
}

fn f32_cmp(a: &f32, b: &f32) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

impl<B: Bound> BoundTree<B> {
    /// Builds a tree where leaf `i` refers to `bounds[i]`.
    pub fn new(bounds: &[B]) -> Self {
        Self::from_indexed(bounds.iter().copied().enumerate().collect())
    }

    /// Builds a tree over `(index, bound)` pairs, for when only some of the
    /// bounds of an array take part.
    pub fn from_indexed(mut items: Vec<(usize, B)>) -> Self {
        let mut nodes = Vec::with_capacity(items.len().saturating_mul(2));
        let root = if items.is_empty() {
            None
        } else {
            Some(Self::build(&mut nodes, &mut items))
        };
        Self {
            nodes,
            root,
            leaves: items.len(),
        }
    }

    // Median split along the axis where the box centers are most spread out.
    // Recursion depth is bounded by log2 of the item count.
    fn build(nodes: &mut Vec<Node<B>>, items: &mut [(usize, B)]) -> NodeHandle {
        if let [(index, bound)] = items {
            return Self::push(
                nodes,
                Node {
                    bound: *bound,
                    kind: NodeKind::Leaf(*index),
                },
            );
        }

        let mut axis = 0;
        let mut widest = f32::NEG_INFINITY;
        for a in 0..B::AXES {
            let (lo, hi) = items.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), (_, b)| {
                let c = b.center(a);
                (lo.min(c), hi.max(c))
            });
            if hi - lo > widest {
                widest = hi - lo;
                axis = a;
            }
        }

        let mid = items.len() / 2;
        items.select_nth_unstable_by(mid, |a, b| f32_cmp(&a.1.center(axis), &b.1.center(axis)));
        let (left_items, right_items) = items.split_at_mut(mid);
        let left = Self::build(nodes, left_items);
        let right = Self::build(nodes, right_items);
        let bound = nodes[left.index()].bound.union(&nodes[right.index()].bound);
        Self::push(
            nodes,
            Node {
                bound,
                kind: NodeKind::Internal(left, right),
            },
        )
    }

    fn push(nodes: &mut Vec<Node<B>>, node: Node<B>) -> NodeHandle {
        nodes.push(node);
        NodeHandle((nodes.len() - 1) as u32)
    }

    /// The root node, or `None` if the tree was built from no bounds.
    pub fn root(&self) -> Option<NodeHandle> {
        self.root
    }

    pub fn bound(&self, node: NodeHandle) -> &B {
        &self.nodes[node.index()].bound
    }

    pub fn kind(&self, node: NodeHandle) -> NodeKind {
        self.nodes[node.index()].kind
    }

    /// Number of leaves, one per indexed bound.
    pub fn len(&self) -> usize {
        self.leaves
    }

    pub fn is_empty(&self) -> bool {
        self.leaves == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Length of the longest root to leaf path, counting both ends.
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut deepest = 0;
        let mut stack = vec![(root, 1)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let NodeKind::Internal(left, right) = self.kind(node) {
                stack.push((left, depth + 1));
                stack.push((right, depth + 1));
            }
        }
        deepest
    }
}
