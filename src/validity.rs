//! Cache-validity checking.
//!
//! Decides per cell, from the frame context and the cell's own recorded
//! state, whether the previously drawn cell can be reused. The predicate
//! list is exhaustive per dirty-flag category; when state is ambiguous the
//! checker errs toward invalidation (frozen-boundary cells are always
//! invalid), because a stale cache corrupts pixels while a false
//! invalidation only costs a repaint.

use crate::borders::transient_borders;
use crate::frame::FrameCache;
use crate::graph::{CellGraph, DrawStatus, NodeId};
use crate::overlay::OverlayState;
use crate::theme::Theme;

/// Outcome of a per-cell validity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Cache hit; pixels stay.
    Valid,
    /// Only the border appearance changed; pixels inside the cell stay.
    BordersOnly,
    /// Full repaint required.
    Invalid,
}

/// Why a cell was invalidated (logged at trace level).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    AlreadyPending,
    FrozenBoundary,
    SubsumedByPendingNeighbor,
    SelectionChanged,
    FillRegionChanged,
    MoveRegionChanged,
    UnderProp,
    BordersChanged,
    HoverChanged,
}

/// Full result of checking one cell.
pub struct CellCheck {
    pub verdict: Verdict,
    pub reason: Option<InvalidReason>,
}

/// Boolean form of the validity check: `true` when the cached cell cannot
/// be reused as-is.
pub fn is_invalid(
    graph: &mut CellGraph,
    id: NodeId,
    frame: &FrameCache<'_>,
    overlay: &dyn OverlayState,
    theme: &Theme,
) -> bool {
    check_cell(graph, id, frame, overlay, theme).verdict != Verdict::Valid
}

/// Run the validity predicate list for one cell.
///
/// Rule 8 (border recomputation) writes the fresh transient border set into
/// the node as a side effect — computing it twice would double the border
/// work for every cached cell.
pub fn check_cell(
    graph: &mut CellGraph,
    id: NodeId,
    frame: &FrameCache<'_>,
    overlay: &dyn OverlayState,
    theme: &Theme,
) -> CellCheck {
    let Some(node) = graph.get(id) else {
        return CellCheck {
            verdict: Verdict::Valid,
            reason: None,
        };
    };

    let row = node.source.row;
    let col = node.source.col;
    let cell = &node.cell;

    // 1. An earlier pass this frame already invalidated the cell.
    if cell.status == DrawStatus::PendingRedraw {
        return invalid(InvalidReason::AlreadyPending, row, col);
    }

    // 2. Frozen-boundary shadow: always invalid, dirty flags notwithstanding.
    if frame.straddles_frozen_boundary(&cell.rect, row, col) {
        return invalid(InvalidReason::FrozenBoundary, row, col);
    }

    // 3. Subsumed by a left neighbor that is itself being repainted; reusing
    //    this cell would leave stale overflow text fragments.
    if cell.is_right_overflowing_invisible_cell {
        if let Some(prev) = graph.get(id).and_then(|n| n.prev_sibling) {
            if let Some(neighbor) = graph.get(prev) {
                if neighbor.cell.status.needs_paint() {
                    return invalid(InvalidReason::SubsumedByPendingNeighbor, row, col);
                }
            }
        }
    }

    // 4. Selection category.
    if frame.flags.selection_dirty() {
        let selected = overlay.is_selected(row, col);
        let picked = overlay.is_picked(row, col);
        let header = overlay.is_header_highlighted(row, col);
        let active = overlay.is_active_cell(row, col);
        if selected != cell.selected
            || picked != cell.picked
            || header != cell.header_highlighted
            || active != cell.active
        {
            return invalid(InvalidReason::SelectionChanged, row, col);
        }
    }

    // 5. Fill overlay category.
    if frame.flags.fill_overlay_dirty() && overlay.in_fill_region(row, col) != cell.in_fill_region {
        return invalid(InvalidReason::FillRegionChanged, row, col);
    }

    // 6. Move overlay category.
    if frame.flags.move_overlay_dirty()
        && overlay.is_move_highlighted(row, col) != cell.move_highlighted
    {
        return invalid(InvalidReason::MoveRegionChanged, row, col);
    }

    // 7. Visible props (selection handles, preview anchors).
    if frame.is_under_prop(&cell.rect) {
        return invalid(InvalidReason::UnderProp, row, col);
    }

    // 9 (checked before 8 writes anything). Hover category. A change of
    // drag context flips the hover predicates the host reports, so the
    // comparison below covers drag starts/stops as well.
    if frame.flags.hover_dirty() {
        let hovered = overlay.is_hovered(row, col);
        let group_hovered = overlay.is_group_hovered(row, col);
        if hovered != cell.hovered || group_hovered != cell.group_hovered {
            return invalid(InvalidReason::HoverChanged, row, col);
        }
    }

    // 8. Border recomputation reports a change.
    let fresh = transient_borders(row, col, overlay, theme);
    let count = overlay.selection_count(row, col);
    let Some(node) = graph.get_mut(id) else {
        return CellCheck {
            verdict: Verdict::Valid,
            reason: None,
        };
    };
    let changed = node.cell.borders != fresh || node.cell.selected_count != count;
    node.cell.borders = fresh;
    node.cell.selected_count = count;
    if changed {
        log::trace!("cell ({row},{col}) invalid: borders changed");
        return CellCheck {
            verdict: Verdict::BordersOnly,
            reason: Some(InvalidReason::BordersChanged),
        };
    }

    CellCheck {
        verdict: Verdict::Valid,
        reason: None,
    }
}

fn invalid(reason: InvalidReason, row: u32, col: u32) -> CellCheck {
    log::trace!("cell ({row},{col}) invalid: {reason:?}");
    CellCheck {
        verdict: Verdict::Invalid,
        reason: Some(reason),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use super::*;
    use crate::frame::DirtyFlags;
    use crate::graph::{CellNode, CellSourceData, RenderCell};
    use crate::layout::{GridLayout, Viewport, DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT};
    use crate::overlay::{NoOverlay, SelectionOverlay};
    use crate::types::{Rect, Selection};
    use std::collections::{HashMap, HashSet};

    fn layout() -> GridLayout {
        GridLayout::new(
            99,
            99,
            &HashMap::new(),
            &HashMap::new(),
            &HashSet::new(),
            &HashSet::new(),
            &[],
            0,
            0,
        )
    }

    fn settled_node(row: u32, col: u32) -> CellNode {
        CellNode {
            source: CellSourceData {
                row,
                col,
                ..CellSourceData::default()
            },
            cell: RenderCell {
                rect: Rect::new(
                    col as f32 * DEFAULT_COL_WIDTH,
                    row as f32 * DEFAULT_ROW_HEIGHT,
                    DEFAULT_COL_WIDTH,
                    DEFAULT_ROW_HEIGHT,
                ),
                status: crate::graph::DrawStatus::SkipDrawn,
                ..RenderCell::default()
            },
            ..CellNode::default()
        }
    }

    #[test]
    fn clean_cell_is_valid_with_no_dirty_flags() {
        let layout = layout();
        let viewport = Viewport::new();
        let frame = FrameCache::build(2, DirtyFlags::default(), &layout, &viewport, &NoOverlay);
        let theme = Theme::default();

        let mut graph = CellGraph::default();
        let id = graph.alloc(settled_node(5, 5));
        assert!(!is_invalid(&mut graph, id, &frame, &NoOverlay, &theme));
    }

    #[test]
    fn selection_flag_with_no_predicate_change_stays_valid() {
        // The cell was recorded as selected, and still is: no invalidation
        // even with the selection flag set (no false positives).
        let layout = layout();
        let viewport = Viewport::new();
        let mut flags = DirtyFlags::default();
        flags.mark_selection();
        let overlay = SelectionOverlay::select(Selection::cell_range(0, 0, 9, 9));
        let frame = FrameCache::build(2, flags, &layout, &viewport, &overlay);
        let theme = Theme::default();

        let mut graph = CellGraph::default();
        let mut node = settled_node(5, 5);
        node.cell.selected = true;
        node.cell.selected_count = 1;
        node.cell.borders = transient_borders(5, 5, &overlay, &theme);
        // (5,5) is interior: active cell is (0,0), no border edges here.
        let id = graph.alloc(node);

        assert!(!is_invalid(&mut graph, id, &frame, &overlay, &theme));
    }

    #[test]
    fn selection_predicate_change_invalidates() {
        let layout = layout();
        let viewport = Viewport::new();
        let mut flags = DirtyFlags::default();
        flags.mark_selection();
        let overlay = SelectionOverlay::select(Selection::cell(5, 5));
        let frame = FrameCache::build(2, flags, &layout, &viewport, &overlay);
        let theme = Theme::default();

        let mut graph = CellGraph::default();
        let id = graph.alloc(settled_node(5, 5)); // recorded as unselected

        let check = check_cell(&mut graph, id, &frame, &overlay, &theme);
        assert_eq!(check.verdict, Verdict::Invalid);
        assert_eq!(check.reason, Some(InvalidReason::SelectionChanged));
    }

    #[test]
    fn selection_change_without_flag_is_ignored() {
        // Selection moved but the host never set the selection flag: rule 4
        // does not fire. (Border recomputation still catches edge cells;
        // this cell sits away from the boundary.)
        let layout = layout();
        let viewport = Viewport::new();
        let overlay = SelectionOverlay::select(Selection::cell(5, 5));
        let frame =
            FrameCache::build(2, DirtyFlags::default(), &layout, &viewport, &overlay);
        let theme = Theme::default();

        let mut graph = CellGraph::default();
        let mut node = settled_node(20, 20);
        node.cell.borders = transient_borders(20, 20, &overlay, &theme);
        let id = graph.alloc(node);

        assert!(!is_invalid(&mut graph, id, &frame, &overlay, &theme));
    }

    #[test]
    fn pending_redraw_is_already_invalid() {
        let layout = layout();
        let viewport = Viewport::new();
        let frame = FrameCache::build(2, DirtyFlags::default(), &layout, &viewport, &NoOverlay);
        let theme = Theme::default();

        let mut graph = CellGraph::default();
        let mut node = settled_node(1, 1);
        node.cell.status = crate::graph::DrawStatus::PendingRedraw;
        let id = graph.alloc(node);

        let check = check_cell(&mut graph, id, &frame, &NoOverlay, &theme);
        assert_eq!(check.reason, Some(InvalidReason::AlreadyPending));
    }

    #[test]
    fn prop_rect_overlap_invalidates() {
        let layout = layout();
        let viewport = Viewport::new();
        let mut overlay = SelectionOverlay::default();
        overlay.props.push(Rect::new(
            DEFAULT_COL_WIDTH * 5.0 + 60.0,
            DEFAULT_ROW_HEIGHT * 5.0 + 16.0,
            8.0,
            8.0,
        ));
        let frame =
            FrameCache::build(2, DirtyFlags::default(), &layout, &viewport, &overlay);
        let theme = Theme::default();

        let mut graph = CellGraph::default();
        let id = graph.alloc(settled_node(5, 5));

        let check = check_cell(&mut graph, id, &frame, &overlay, &theme);
        assert_eq!(check.reason, Some(InvalidReason::UnderProp));
    }

    #[test]
    fn border_change_yields_borders_only_verdict() {
        let layout = layout();
        let viewport = Viewport::new();
        // Selection sits right next to the cell; the cell's own transient
        // set is empty but the fresh set has a boundary edge... actually the
        // boundary belongs to the selected cell. Select the cell itself but
        // leave the selection dirty flag unset so rule 4 can't fire first.
        let overlay = SelectionOverlay {
            selections: vec![Selection::cell(5, 5)],
            active: None,
            ..SelectionOverlay::default()
        };
        let frame =
            FrameCache::build(2, DirtyFlags::default(), &layout, &viewport, &overlay);
        let theme = Theme::default();

        let mut graph = CellGraph::default();
        let id = graph.alloc(settled_node(5, 5));

        let check = check_cell(&mut graph, id, &frame, &overlay, &theme);
        assert_eq!(check.verdict, Verdict::BordersOnly);

        // Idempotent: the fresh set was patched in, so a second check passes.
        let check = check_cell(&mut graph, id, &frame, &overlay, &theme);
        assert_eq!(check.verdict, Verdict::Valid);
    }

    #[test]
    fn frozen_boundary_cell_always_invalid() {
        let layout = GridLayout::new(
            99,
            99,
            &HashMap::new(),
            &HashMap::new(),
            &HashSet::new(),
            &HashSet::new(),
            &[],
            2,
            0,
        );
        let mut viewport = Viewport::new();
        viewport.scroll_y = layout.frozen_rows_height();
        let frame = FrameCache::build(2, DirtyFlags::default(), &layout, &viewport, &NoOverlay);
        let theme = Theme::default();

        let mut graph = CellGraph::default();
        let id = graph.alloc(settled_node(2, 0)); // first row under the boundary

        let check = check_cell(&mut graph, id, &frame, &NoOverlay, &theme);
        assert_eq!(check.reason, Some(InvalidReason::FrozenBoundary));
    }
}
