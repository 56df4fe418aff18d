//! Border compositing.
//!
//! Every edge of the grid is shared by up to two cells. This module decides,
//! per cell per edge, which side's border descriptor wins, derives the pixel
//! geometry for the edge, and computes the transient (selection/fill/move/
//! pick) border set whose changes drive cache invalidation.

use serde::Serialize;

use crate::graph::{CellGraph, NodeId};
use crate::overlay::OverlayState;
use crate::theme::{StyleRole, Theme};
use crate::types::{Border, BorderStyle, Rect};

/// One of a cell's four edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Left,
    Bottom,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Left, Edge::Bottom, Edge::Right];

    /// The sibling link that crosses this edge.
    pub fn sibling_of(self, graph: &CellGraph, id: NodeId) -> Option<NodeId> {
        let node = graph.get(id)?;
        match self {
            Edge::Top => node.upper_sibling,
            Edge::Left => node.prev_sibling,
            Edge::Bottom => node.lower_sibling,
            Edge::Right => node.next_sibling,
        }
    }

    /// The neighbor's edge facing this one.
    pub fn opposite(self) -> Edge {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Left => Edge::Right,
            Edge::Bottom => Edge::Top,
            Edge::Right => Edge::Left,
        }
    }

    /// Whether precedence flows from this side (top-left-first rule).
    pub fn owns_shared_edge(self) -> bool {
        matches!(self, Edge::Top | Edge::Left)
    }
}

/// Visual style of a resolved border, ordered by paint precedence.
///
/// Overlay styles (selection, fill, move, pick) sit above persistent line
/// styles; among line styles heavier lines shadow lighter ones when two
/// descriptors collapse onto one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeStyle {
    Selection,
    Fill,
    Move,
    Pick,
    Table,
    Thick,
    Double,
    Medium,
    Dashed,
    Dotted,
    Thin,
}

impl EdgeStyle {
    /// Paint precedence; higher wins when two styles collapse onto one edge.
    pub fn priority(self) -> u8 {
        match self {
            Self::Selection => 11,
            Self::Fill => 10,
            Self::Move => 9,
            Self::Pick => 8,
            Self::Thick => 7,
            Self::Double => 6,
            Self::Medium => 5,
            Self::Dashed => 4,
            Self::Dotted => 3,
            Self::Thin => 2,
            Self::Table => 1,
        }
    }

    /// Whether this is an overlay-derived (transient) style.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Selection | Self::Fill | Self::Move | Self::Pick)
    }

    /// Stroke width in logical pixels.
    pub fn width(self) -> f64 {
        match self {
            Self::Selection | Self::Fill | Self::Move | Self::Pick | Self::Medium => 2.0,
            Self::Thick | Self::Double => 3.0,
            Self::Table | Self::Dashed | Self::Dotted | Self::Thin => 1.0,
        }
    }

    fn from_line_style(style: BorderStyle) -> Option<Self> {
        match style {
            BorderStyle::None => None,
            BorderStyle::Thin | BorderStyle::Hair => Some(Self::Thin),
            BorderStyle::Medium => Some(Self::Medium),
            BorderStyle::Thick => Some(Self::Thick),
            BorderStyle::Dashed => Some(Self::Dashed),
            BorderStyle::Dotted => Some(Self::Dotted),
            BorderStyle::Double => Some(Self::Double),
        }
    }
}

/// Precedence class of a border descriptor's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BorderKind {
    /// Style-preview border (format picker hover).
    Preview,
    /// Automatic table framing.
    Table,
    /// Whole-column formatting.
    Column,
    /// Explicit user border.
    #[default]
    User,
}

/// A resolved border descriptor for one edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellBorder {
    pub style: EdgeStyle,
    /// Hidden borders suppress the edge entirely (they still participate in
    /// precedence so a hidden user border can blank a table frame).
    pub is_hidden: bool,
    pub color: String,
    pub kind: BorderKind,
}

impl CellBorder {
    pub fn user(style: EdgeStyle, color: impl Into<String>) -> Self {
        Self {
            style,
            is_hidden: false,
            color: color.into(),
            kind: BorderKind::User,
        }
    }

    pub fn table(color: impl Into<String>) -> Self {
        Self {
            style: EdgeStyle::Table,
            is_hidden: false,
            color: color.into(),
            kind: BorderKind::Table,
        }
    }

    fn from_style_border(border: &Border, kind: BorderKind) -> Option<Self> {
        let style = EdgeStyle::from_line_style(border.style)?;
        Some(Self {
            style,
            is_hidden: false,
            color: border.color.clone(),
            kind,
        })
    }
}

/// The four border slots of one cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeBorders {
    pub top: Option<CellBorder>,
    pub right: Option<CellBorder>,
    pub bottom: Option<CellBorder>,
    pub left: Option<CellBorder>,
}

impl EdgeBorders {
    pub fn get(&self, edge: Edge) -> Option<&CellBorder> {
        match edge {
            Edge::Top => self.top.as_ref(),
            Edge::Left => self.left.as_ref(),
            Edge::Bottom => self.bottom.as_ref(),
            Edge::Right => self.right.as_ref(),
        }
    }

    pub fn set(&mut self, edge: Edge, border: Option<CellBorder>) {
        match edge {
            Edge::Top => self.top = border,
            Edge::Left => self.left = border,
            Edge::Bottom => self.bottom = border,
            Edge::Right => self.right = border,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }

    /// Build the persistent border set from a style's border sides plus
    /// table framing.
    pub fn from_style(style: &crate::types::Style, table_framed: bool, theme: &Theme) -> Self {
        let mut borders = Self {
            top: style
                .border_top
                .as_ref()
                .and_then(|b| CellBorder::from_style_border(b, BorderKind::User)),
            right: style
                .border_right
                .as_ref()
                .and_then(|b| CellBorder::from_style_border(b, BorderKind::User)),
            bottom: style
                .border_bottom
                .as_ref()
                .and_then(|b| CellBorder::from_style_border(b, BorderKind::User)),
            left: style
                .border_left
                .as_ref()
                .and_then(|b| CellBorder::from_style_border(b, BorderKind::User)),
        };
        if table_framed {
            let frame = CellBorder::table(theme.color(StyleRole::TableBorder));
            for edge in Edge::ALL {
                if borders.get(edge).is_none() {
                    borders.set(edge, Some(frame.clone()));
                }
            }
        }
        borders
    }
}

/// Pixel geometry of one edge within a cell rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderSegment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// Derive the line segment an edge occupies on a cell's rectangle.
pub fn edge_segment(rect: &Rect, edge: Edge) -> BorderSegment {
    match edge {
        Edge::Top => BorderSegment {
            x1: rect.x,
            y1: rect.y,
            x2: rect.right(),
            y2: rect.y,
        },
        Edge::Left => BorderSegment {
            x1: rect.x,
            y1: rect.y,
            x2: rect.x,
            y2: rect.bottom(),
        },
        Edge::Bottom => BorderSegment {
            x1: rect.x,
            y1: rect.bottom(),
            x2: rect.right(),
            y2: rect.bottom(),
        },
        Edge::Right => BorderSegment {
            x1: rect.right(),
            y1: rect.y,
            x2: rect.right(),
            y2: rect.bottom(),
        },
    }
}

/// Whether an edge is internally subsumed: glued to an overflow neighbor, or
/// an interior edge of a merged region. Subsumed edges contribute nothing.
pub fn is_subsumed_edge(graph: &CellGraph, id: NodeId, edge: Edge) -> bool {
    let Some(node) = graph.get(id) else {
        return false;
    };

    // Overflow gluing: the seam between an overflowing cell and the empty
    // cells its text occupies carries no border.
    match edge {
        Edge::Right => {
            if node.cell.subsumed_right_cell_count > 0 || node.cell.is_left_overflowing_invisible_cell
            {
                return true;
            }
        }
        Edge::Left => {
            if node.cell.subsumed_left_cell_count > 0 || node.cell.is_right_overflowing_invisible_cell
            {
                return true;
            }
        }
        Edge::Top | Edge::Bottom => {}
    }

    // Merge interiors.
    if let Some(merge) = node.source.merge {
        let interior = match edge {
            Edge::Top => merge.top_interior,
            Edge::Left => merge.left_interior,
            Edge::Bottom => merge.bottom_interior,
            Edge::Right => merge.right_interior,
        };
        if interior {
            return true;
        }
    }
    false
}

/// Resolve the effective persistent border for one edge of one cell.
///
/// Precedence, in order:
/// 1. subsumed edges are empty;
/// 2. when both sides define a border and exactly one is table framing, the
///    non-table side wins;
/// 3. otherwise top/left edges take the cell's own descriptor, bottom/right
///    take the neighbor's facing top/left — so a shared edge is defined
///    exactly once, flowing top-left-first.
pub fn resolve_edge(graph: &CellGraph, id: NodeId, edge: Edge) -> Option<CellBorder> {
    if is_subsumed_edge(graph, id, edge) {
        return None;
    }

    let own = graph
        .get(id)
        .and_then(|node| node.cell.custom_borders.get(edge).cloned());
    let neighbor = edge.sibling_of(graph, id).and_then(|nid| {
        graph
            .get(nid)
            .and_then(|node| node.cell.custom_borders.get(edge.opposite()).cloned())
    });

    let resolved = match (own, neighbor) {
        (Some(own), Some(neighbor)) => {
            let own_is_table = own.kind == BorderKind::Table;
            let neighbor_is_table = neighbor.kind == BorderKind::Table;
            if own_is_table != neighbor_is_table {
                // Explicit borders beat automatic table framing.
                if own_is_table {
                    Some(neighbor)
                } else {
                    Some(own)
                }
            } else if edge.owns_shared_edge() {
                Some(own)
            } else {
                Some(neighbor)
            }
        }
        (Some(own), None) => Some(own),
        (None, Some(neighbor)) => Some(neighbor),
        (None, None) => None,
    };

    resolved.filter(|b| !b.is_hidden)
}

/// Compute the transient border set for a cell from the live overlay
/// predicates. A transient border sits on every edge where the overlay
/// region ends (the neighbor across the edge is outside the region).
pub fn transient_borders(
    row: u32,
    col: u32,
    overlay: &dyn OverlayState,
    theme: &Theme,
) -> EdgeBorders {
    let mut borders = EdgeBorders::default();

    let mut apply = |style: EdgeStyle, role: StyleRole, inside: &dyn Fn(u32, u32) -> bool| {
        if !inside(row, col) {
            return;
        }
        let color = theme.color(role);
        let top_outside = row == 0 || !inside(row - 1, col);
        let left_outside = col == 0 || !inside(row, col - 1);
        let bottom_outside = !inside(row + 1, col);
        let right_outside = !inside(row, col + 1);

        let edges = [
            (Edge::Top, top_outside),
            (Edge::Left, left_outside),
            (Edge::Bottom, bottom_outside),
            (Edge::Right, right_outside),
        ];
        for (edge, boundary) in edges {
            if !boundary {
                continue;
            }
            let replace = borders
                .get(edge)
                .map_or(true, |b| style.priority() > b.style.priority());
            if replace {
                borders.set(
                    edge,
                    Some(CellBorder {
                        style,
                        is_hidden: false,
                        color: color.to_string(),
                        kind: BorderKind::Preview,
                    }),
                );
            }
        }
    };

    // Lowest priority first; higher-priority overlays overwrite.
    apply(EdgeStyle::Pick, StyleRole::PickBorder, &|r, c| {
        overlay.is_picked(r, c)
    });
    apply(EdgeStyle::Move, StyleRole::MoveBorder, &|r, c| {
        overlay.is_move_highlighted(r, c)
    });
    apply(EdgeStyle::Fill, StyleRole::FillBorder, &|r, c| {
        overlay.in_fill_region(r, c)
    });
    apply(EdgeStyle::Selection, StyleRole::SelectionBorder, &|r, c| {
        overlay.is_selected(r, c)
    });

    borders
}

/// Recompute a node's transient borders and selection count, writing them in
/// place. Returns `true` when the border appearance actually changed — the
/// signal by which selection-boundary movement invalidates exactly the cells
/// whose edges moved.
pub fn recompute_transient(
    graph: &mut CellGraph,
    id: NodeId,
    overlay: &dyn OverlayState,
    theme: &Theme,
) -> bool {
    let Some(node) = graph.get(id) else {
        return false;
    };
    let row = node.source.row;
    let col = node.source.col;

    let fresh = transient_borders(row, col, overlay, theme);
    let count = overlay.selection_count(row, col);

    let Some(node) = graph.get_mut(id) else {
        return false;
    };
    let changed = node.cell.borders != fresh || node.cell.selected_count != count;
    node.cell.borders = fresh;
    node.cell.selected_count = count;
    changed
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use super::*;
    use crate::graph::{CellNode, CellSourceData};
    use crate::overlay::SelectionOverlay;
    use crate::types::Selection;

    fn graph_pair() -> (CellGraph, NodeId, NodeId) {
        let mut graph = CellGraph::new();
        let a = graph.alloc(CellNode {
            source: CellSourceData {
                row: 0,
                col: 0,
                ..CellSourceData::default()
            },
            ..CellNode::default()
        });
        let b = graph.alloc(CellNode {
            source: CellSourceData {
                row: 0,
                col: 1,
                ..CellSourceData::default()
            },
            ..CellNode::default()
        });
        graph.link_horizontal(a, b);
        (graph, a, b)
    }

    #[test]
    fn shared_edge_resolves_once_and_deterministically() {
        let (mut graph, a, b) = graph_pair();
        graph.get_mut(a).unwrap().cell.custom_borders.right =
            Some(CellBorder::user(EdgeStyle::Thick, "#111111"));
        graph.get_mut(b).unwrap().cell.custom_borders.left =
            Some(CellBorder::user(EdgeStyle::Thin, "#222222"));

        // A's right edge defers to B's left (the neighbor's own top/left
        // wins for bottom/right edges); B's left edge takes B's own.
        let from_a = resolve_edge(&graph, a, Edge::Right).unwrap();
        let from_b = resolve_edge(&graph, b, Edge::Left).unwrap();
        assert_eq!(from_a, from_b);
        assert_eq!(from_a.style, EdgeStyle::Thin);

        // Determinism: same input, same answer.
        assert_eq!(resolve_edge(&graph, a, Edge::Right).unwrap(), from_a);
    }

    #[test]
    fn explicit_border_beats_table_framing() {
        let (mut graph, a, b) = graph_pair();
        graph.get_mut(a).unwrap().cell.custom_borders.right =
            Some(CellBorder::user(EdgeStyle::Medium, "#333333"));
        graph.get_mut(b).unwrap().cell.custom_borders.left = Some(CellBorder::table("#AAAAAA"));

        let resolved = resolve_edge(&graph, a, Edge::Right).unwrap();
        assert_eq!(resolved.kind, BorderKind::User);
        assert_eq!(resolved.style, EdgeStyle::Medium);

        let from_b = resolve_edge(&graph, b, Edge::Left).unwrap();
        assert_eq!(from_b.kind, BorderKind::User);
    }

    #[test]
    fn one_sided_border_still_paints() {
        let (mut graph, a, _b) = graph_pair();
        graph.get_mut(a).unwrap().cell.custom_borders.right =
            Some(CellBorder::user(EdgeStyle::Dashed, "#444444"));
        let resolved = resolve_edge(&graph, a, Edge::Right).unwrap();
        assert_eq!(resolved.style, EdgeStyle::Dashed);
    }

    #[test]
    fn subsumed_overflow_edge_is_empty() {
        let (mut graph, a, b) = graph_pair();
        graph.get_mut(a).unwrap().cell.subsumed_right_cell_count = 1;
        graph.get_mut(b).unwrap().cell.is_right_overflowing_invisible_cell = true;
        graph.get_mut(a).unwrap().cell.custom_borders.right =
            Some(CellBorder::user(EdgeStyle::Thick, "#555555"));

        assert!(resolve_edge(&graph, a, Edge::Right).is_none());
        assert!(resolve_edge(&graph, b, Edge::Left).is_none());
    }

    #[test]
    fn merge_interior_edges_are_empty() {
        let (mut graph, a, _b) = graph_pair();
        graph.get_mut(a).unwrap().source.merge = Some(crate::graph::MergeEdges {
            is_origin: true,
            right_interior: true,
            ..Default::default()
        });
        graph.get_mut(a).unwrap().cell.custom_borders.right =
            Some(CellBorder::user(EdgeStyle::Thin, "#666666"));
        assert!(resolve_edge(&graph, a, Edge::Right).is_none());
    }

    #[test]
    fn hidden_border_suppresses_edge() {
        let (mut graph, a, _b) = graph_pair();
        graph.get_mut(a).unwrap().cell.custom_borders.right = Some(CellBorder {
            style: EdgeStyle::Thin,
            is_hidden: true,
            color: "#777777".to_string(),
            kind: BorderKind::User,
        });
        assert!(resolve_edge(&graph, a, Edge::Right).is_none());
    }

    #[test]
    fn transient_borders_mark_region_boundary() {
        let overlay = SelectionOverlay::select(Selection::cell_range(1, 1, 2, 2));
        let theme = Theme::default();

        // Corner cell of the selection: top and left are boundaries.
        let borders = transient_borders(1, 1, &overlay, &theme);
        assert!(borders.top.is_some());
        assert!(borders.left.is_some());
        assert!(borders.bottom.is_none());
        assert!(borders.right.is_none());

        // Interior-edge cell: only the outer edges carry borders.
        let borders = transient_borders(2, 2, &overlay, &theme);
        assert!(borders.bottom.is_some());
        assert!(borders.right.is_some());
        assert!(borders.top.is_none());

        // Outside the selection: nothing.
        let borders = transient_borders(5, 5, &overlay, &theme);
        assert!(borders.is_empty());
    }

    #[test]
    fn recompute_signals_change_exactly_once() {
        let (mut graph, a, _b) = graph_pair();
        let overlay = SelectionOverlay::select(Selection::cell(0, 0));
        let theme = Theme::default();

        assert!(recompute_transient(&mut graph, a, &overlay, &theme));
        // Second run with identical state: no change.
        assert!(!recompute_transient(&mut graph, a, &overlay, &theme));

        // Selection moved away: change again.
        let overlay = SelectionOverlay::select(Selection::cell(5, 5));
        assert!(recompute_transient(&mut graph, a, &overlay, &theme));
    }

    #[test]
    fn edge_segments_follow_rect() {
        let rect = Rect::new(10.0, 20.0, 64.0, 20.0);
        let top = edge_segment(&rect, Edge::Top);
        assert_eq!((top.x1, top.y1, top.x2, top.y2), (10.0, 20.0, 74.0, 20.0));
        let right = edge_segment(&rect, Edge::Right);
        assert_eq!(
            (right.x1, right.y1, right.x2, right.y2),
            (74.0, 20.0, 74.0, 40.0)
        );
    }
}
