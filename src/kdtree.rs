use crate::{squared_distance, squared_plane_distance, Color, ColorError};

// ====================
// PUBLIC STRUCTS
// ====================

/// A balanced k-d tree over a fixed set of colors.
///
/// Nodes live in one arena and refer to their children by position, so the
/// whole tree is freed at once and never contains cycles. The split axis
/// cycles through the color's dimensions with depth, starting at red.
#[derive(Clone, Debug)]
pub struct KdTree<P> {
    colors: Vec<P>,
    nodes: Vec<Node>,
    root: Option<NodeId>
}

/// The closest color found by [`KdTree::nearest`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Nearest<'a, P> {
    pub color: &'a P,

    /// Scaled squared distance, see [`squared_distance`].
    pub squared_distance: u32
}

impl<P: Color> KdTree<P> {
    pub fn build(colors: Vec<P>) -> Self {
        let mut tree = KdTree {
            nodes: Vec::with_capacity(colors.len()),
            colors,
            root: None
        };

        let mut order: Vec<usize> = (0..tree.colors.len()).collect();
        tree.root = tree.build_recursive(&mut order, 0);

        tree
    }

    /// Finds the color closest to `query`, or `None` if the tree is empty.
    ///
    /// Equidistant colors are resolved in favor of the first one reached while
    /// backtracking, not by position in the list given to [`KdTree::build`].
    ///
    /// # Panics
    ///
    /// Panics with [`ColorError::InvalidQuery`] if the tree is not empty and
    /// `query` has a different number of dimensions than its colors.
    pub fn nearest<Q: Color + ?Sized>(&self, query: &Q) -> Option<Nearest<'_, P>> {
        let root = self.root?;

        let expected = self.color(root).dimensions();
        let found = query.dimensions();
        if found != expected {
            panic!("{}", ColorError::InvalidQuery { expected, found });
        }

        let mut best = Best { node: None, squared_distance: u32::MAX };

        self.search(query, root, 0, &mut best);

        best.node.map(|node| Nearest {
            color: self.color(node),
            squared_distance: best.squared_distance
        })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        self.root.map_or(0, |root| self.subtree_height(root))
    }

    /// Colors in the order they were given to [`KdTree::build`].
    pub fn colors(&self) -> &[P] {
        &self.colors
    }

    fn build_recursive(&mut self, order: &mut [usize], axis: usize) -> Option<NodeId> {
        if order.is_empty() {
            return None;
        }

        // Stable, so equal values keep their relative order from the caller
        let colors = &self.colors;
        order.sort_by_key(|&position| colors[position].dimension(axis));

        let mid = order.len() / 2;
        let color = order[mid];
        let next_axis = (axis + 1) % self.colors[color].dimensions();

        let id = self.nodes.len();
        self.nodes.push(Node { color, left: None, right: None });

        let (left, rest) = order.split_at_mut(mid);
        let left = self.build_recursive(left, next_axis);
        let right = self.build_recursive(&mut rest[1..], next_axis);

        let node = &mut self.nodes[id];
        node.left = left;
        node.right = right;

        Some(id)
    }

    fn search<Q: Color + ?Sized>(&self, query: &Q, start: NodeId, mut axis: usize, best: &mut Best) {
        let dimensions = query.dimensions();
        let mut path = Vec::new();
        let mut current = Some(start);

        // Walk down to a leaf the way an insertion of the query would
        while let Some(id) = current {
            path.push((id, axis));
            let node = &self.nodes[id];
            current = if query.dimension(axis) < self.color(id).dimension(axis) {
                node.left
            } else {
                node.right
            };
            axis = (axis + 1) % dimensions;
        }

        while let Some((id, axis)) = path.pop() {
            let color = self.color(id);
            let distance = squared_distance(query, color);
            if distance < best.squared_distance {
                best.node = Some(id);
                best.squared_distance = distance;
            }

            /* Every color on the other side of the splitting plane is at least
               as far away as the plane itself. */
            let plane_value = color.dimension(axis);
            if squared_plane_distance(query, plane_value, axis) < best.squared_distance {
                let node = &self.nodes[id];
                let opposite = if query.dimension(axis) < plane_value {
                    node.right
                } else {
                    node.left
                };

                if let Some(next) = opposite {
                    self.search(query, next, (axis + 1) % dimensions, best);
                }
            }
        }
    }

    fn subtree_height(&self, id: NodeId) -> usize {
        let node = &self.nodes[id];
        let left = node.left.map_or(0, |left| self.subtree_height(left));
        let right = node.right.map_or(0, |right| self.subtree_height(right));

        1 + left.max(right)
    }

    fn color(&self, id: NodeId) -> &P {
        &self.colors[self.nodes[id].color]
    }
}

// ====================
// PRIVATE TYPE ALIASES
// ====================

type NodeId = usize;

// ====================
// PRIVATE STRUCTS
// ====================

#[derive(Copy, Clone, Debug)]
struct Node {
    color: usize,
    left: Option<NodeId>,
    right: Option<NodeId>
}

struct Best {
    node: Option<NodeId>,
    squared_distance: u32
}
