//! Arena-backed cell nodes and their neighbor links.

use std::rc::Rc;

use crate::borders::EdgeBorders;
use crate::text::ShapedText;
use crate::types::{CellData, Rect};

use super::DrawStatus;

/// Index of a node within its frame's [`CellGraph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which edges of a merged region a member cell sits on.
///
/// Interior edges contribute empty borders; a member's text and background
/// are painted only by the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeEdges {
    pub is_origin: bool,
    /// The cell's top edge lies inside the merge (not its first row).
    pub top_interior: bool,
    /// The cell's left edge lies inside the merge (not its first column).
    pub left_interior: bool,
    /// The cell's bottom edge lies inside the merge (not its last row).
    pub bottom_interior: bool,
    /// The cell's right edge lies inside the merge (not its last column).
    pub right_interior: bool,
}

/// Immutable-per-construction inputs of a rendered cell.
#[derive(Debug, Clone, Default)]
pub struct CellSourceData {
    /// Row index in logical data space.
    pub row: u32,
    /// Column index in logical data space.
    pub col: u32,
    /// Row index within the built fragment, counting only visible rows.
    pub view_row: u32,
    /// Column index within the built fragment, counting only visible columns.
    pub view_col: u32,
    /// Value, style and table membership as read from the data source.
    pub data: CellData,
    /// Merge membership, when the cell belongs to a merged region.
    pub merge: Option<MergeEdges>,
}

/// Derived, mutable render attributes of a cell.
///
/// Recomputed wholesale when the node is (re)built; individual fields are
/// patched in place during cache-validity checks.
#[derive(Debug, Clone, Default)]
pub struct RenderCell {
    /// Pixel geometry in sheet coordinates.
    pub rect: Rect,
    pub status: DrawStatus,
    /// Transient borders (selection/fill/move/pick), recomputed every frame.
    pub borders: EdgeBorders,
    /// Persistent user/table-derived borders.
    pub custom_borders: EdgeBorders,
    /// Laid-out text, shared with the text-layout cache.
    pub text: Option<Rc<ShapedText>>,

    /// Synthetic/empty cell occupied by the left neighbor's overflowing text.
    pub is_right_overflowing_invisible_cell: bool,
    /// Synthetic/empty cell occupied by the right neighbor's overflowing text.
    pub is_left_overflowing_invisible_cell: bool,
    /// How many right neighbors this cell's text bleeds into.
    pub subsumed_right_cell_count: u32,
    /// How many left neighbors this cell's text bleeds into.
    pub subsumed_left_cell_count: u32,

    // Overlay flags recorded at the last (re)build or patch, compared
    // against live predicates by the validity checker.
    pub selected: bool,
    pub picked: bool,
    pub header_highlighted: bool,
    pub active: bool,
    pub hovered: bool,
    pub group_hovered: bool,
    pub in_fill_region: bool,
    pub move_highlighted: bool,
    pub selected_count: u8,

    /// Frame stamp of the last successful validity check (generational
    /// cache reuse).
    pub last_validated_frame: u64,
}

impl RenderCell {
    /// Whether this cell is a synthetic overflow placeholder rather than a
    /// real data cell.
    pub fn is_overflow_placeholder(&self) -> bool {
        self.is_left_overflowing_invisible_cell || self.is_right_overflowing_invisible_cell
    }

    /// Whether this cell's text bleeds into neighbors (its text paint is
    /// deferred until the row's backgrounds settle).
    pub fn subsumes_neighbors(&self) -> bool {
        self.subsumed_left_cell_count > 0 || self.subsumed_right_cell_count > 0
    }
}

/// One rendered cell instance for the current frame.
#[derive(Debug, Clone, Default)]
pub struct CellNode {
    pub source: CellSourceData,
    pub cell: RenderCell,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub upper_sibling: Option<NodeId>,
    pub lower_sibling: Option<NodeId>,
}

/// Arena of cell nodes for one cached fragment.
///
/// Neighbor relationships are plain indices into the arena, so "neighbor of
/// neighbor" lookups are O(1) and the structure has no reference cycles.
#[derive(Debug, Default)]
pub struct CellGraph {
    nodes: Vec<CellNode>,
}

impl CellGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Insert a node, returning its arena index.
    pub fn alloc(&mut self, node: CellNode) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&CellNode> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut CellNode> {
        self.nodes.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId(u32::try_from(i).unwrap_or(u32::MAX)))
    }

    /// Link two nodes as horizontal siblings (`left` before `right`).
    pub fn link_horizontal(&mut self, left: NodeId, right: NodeId) {
        if let Some(node) = self.get_mut(left) {
            node.next_sibling = Some(right);
        }
        if let Some(node) = self.get_mut(right) {
            node.prev_sibling = Some(left);
        }
    }

    /// Link two nodes as vertical siblings (`upper` above `lower`).
    pub fn link_vertical(&mut self, upper: NodeId, lower: NodeId) {
        if let Some(node) = self.get_mut(upper) {
            node.lower_sibling = Some(lower);
        }
        if let Some(node) = self.get_mut(lower) {
            node.upper_sibling = Some(upper);
        }
    }

    /// The eight geometric neighbors of a node, composed from sibling links.
    ///
    /// Order: left, right, up, down, up-left, up-right, down-left,
    /// down-right. Absent links yield `None` entries.
    pub fn geometric_neighbors(&self, id: NodeId) -> [Option<NodeId>; 8] {
        let Some(node) = self.get(id) else {
            return [None; 8];
        };
        let left = node.prev_sibling;
        let right = node.next_sibling;
        let up = node.upper_sibling;
        let down = node.lower_sibling;
        let sibling = |of: Option<NodeId>, pick: fn(&CellNode) -> Option<NodeId>| {
            of.and_then(|nid| self.get(nid)).and_then(pick)
        };
        [
            left,
            right,
            up,
            down,
            sibling(up, |n| n.prev_sibling),
            sibling(up, |n| n.next_sibling),
            sibling(down, |n| n.prev_sibling),
            sibling(down, |n| n.next_sibling),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn node_at(row: u32, col: u32) -> CellNode {
        CellNode {
            source: CellSourceData {
                row,
                col,
                ..CellSourceData::default()
            },
            ..CellNode::default()
        }
    }

    #[test]
    fn linking_is_symmetric() {
        let mut graph = CellGraph::new();
        let a = graph.alloc(node_at(0, 0));
        let b = graph.alloc(node_at(0, 1));
        graph.link_horizontal(a, b);

        assert_eq!(graph.get(a).unwrap().next_sibling, Some(b));
        assert_eq!(graph.get(b).unwrap().prev_sibling, Some(a));
        assert_eq!(graph.get(a).unwrap().prev_sibling, None);
    }

    #[test]
    fn geometric_neighbors_compose_links() {
        // 3x3 grid of nodes
        let mut graph = CellGraph::new();
        let mut ids = Vec::new();
        for row in 0..3 {
            for col in 0..3 {
                ids.push(graph.alloc(node_at(row, col)));
            }
        }
        for row in 0..3usize {
            for col in 0..2usize {
                graph.link_horizontal(ids[row * 3 + col], ids[row * 3 + col + 1]);
            }
        }
        for row in 0..2usize {
            for col in 0..3usize {
                graph.link_vertical(ids[row * 3 + col], ids[(row + 1) * 3 + col]);
            }
        }

        let center = ids[4];
        let neighbors = graph.geometric_neighbors(center);
        assert_eq!(neighbors[0], Some(ids[3])); // left
        assert_eq!(neighbors[1], Some(ids[5])); // right
        assert_eq!(neighbors[2], Some(ids[1])); // up
        assert_eq!(neighbors[3], Some(ids[7])); // down
        assert_eq!(neighbors[4], Some(ids[0])); // up-left
        assert_eq!(neighbors[7], Some(ids[8])); // down-right
    }

    #[test]
    fn corner_has_missing_neighbors() {
        let mut graph = CellGraph::new();
        let a = graph.alloc(node_at(0, 0));
        let b = graph.alloc(node_at(0, 1));
        graph.link_horizontal(a, b);
        let neighbors = graph.geometric_neighbors(a);
        assert_eq!(neighbors[0], None);
        assert_eq!(neighbors[1], Some(b));
        assert_eq!(neighbors[2], None);
    }
}
