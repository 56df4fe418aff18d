//! Overlay-state collaborator.
//!
//! Selection, fill and move *business logic* lives in the host. The engine
//! consumes only the resulting boolean predicates, so cache-validity checks
//! can compare a cell's recorded overlay flags against the live state.

use crate::types::{Rect, Selection};

/// Kind of drag interaction currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragContext {
    /// Dragging the fill handle.
    Fill,
    /// Dragging a selection to relocate it.
    Move,
    /// Resizing a row or column.
    Resize,
}

/// Boolean predicates describing the live overlay state.
///
/// Implementations must be cheap per call; the validity checker may query
/// several predicates per visible cell per frame.
pub trait OverlayState {
    /// Whether a cell lies inside any selection range.
    fn is_selected(&self, _row: u32, _col: u32) -> bool {
        false
    }

    /// Number of selection ranges covering a cell (multi-select shading).
    fn selection_count(&self, row: u32, col: u32) -> u8 {
        u8::from(self.is_selected(row, col))
    }

    /// Whether a cell is the format-picker ("pick") target.
    fn is_picked(&self, _row: u32, _col: u32) -> bool {
        false
    }

    /// Whether a cell lies in a fully selected row/column band
    /// (header-highlight tint).
    fn is_header_highlighted(&self, _row: u32, _col: u32) -> bool {
        false
    }

    /// Whether a cell is the active (focused) cell.
    fn is_active_cell(&self, _row: u32, _col: u32) -> bool {
        false
    }

    /// Whether a cell lies inside the fill-handle drag region.
    fn in_fill_region(&self, _row: u32, _col: u32) -> bool {
        false
    }

    /// Whether a cell lies inside the move-drag highlight region.
    fn is_move_highlighted(&self, _row: u32, _col: u32) -> bool {
        false
    }

    /// Whether the pointer hovers a cell.
    fn is_hovered(&self, _row: u32, _col: u32) -> bool {
        false
    }

    /// Whether a cell's outline group is hovered.
    fn is_group_hovered(&self, _row: u32, _col: u32) -> bool {
        false
    }

    /// The drag interaction in progress, when any.
    fn drag_context(&self) -> Option<DragContext> {
        None
    }

    /// Whether a row header is highlighted.
    fn is_row_header_highlighted(&self, row: u32) -> bool {
        self.is_header_highlighted(row, 0)
    }

    /// Whether a column header is highlighted.
    fn is_col_header_highlighted(&self, col: u32) -> bool {
        self.is_header_highlighted(0, col)
    }

    /// Pixel rects (sheet coordinates) of visible props this frame:
    /// selection handles, style-preview anchors. Cells under a prop are
    /// always repainted.
    fn prop_rects(&self) -> Vec<Rect> {
        Vec::new()
    }
}

/// Overlay state with nothing active. Useful for first paints and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOverlay;

impl OverlayState for NoOverlay {}

/// A concrete overlay built from host-side selection state.
///
/// Small hosts can use this directly; larger hosts implement
/// [`OverlayState`] against their own interaction model.
#[derive(Debug, Default, Clone)]
pub struct SelectionOverlay {
    pub selections: Vec<Selection>,
    /// Active (focused) cell.
    pub active: Option<(u32, u32)>,
    /// Hovered cell.
    pub hovered: Option<(u32, u32)>,
    /// Fill-handle drag region.
    pub fill_region: Option<Selection>,
    /// Move-drag highlight region.
    pub move_region: Option<Selection>,
    /// Format-picker target.
    pub picked: Option<Selection>,
    /// Drag interaction in progress.
    pub drag: Option<DragContext>,
    /// Visible prop rects (selection handles, preview anchors).
    pub props: Vec<Rect>,
}

impl SelectionOverlay {
    pub fn select(selection: Selection) -> Self {
        let active = Some((
            selection.start_row.min(selection.end_row),
            selection.start_col.min(selection.end_col),
        ));
        Self {
            selections: vec![selection],
            active,
            ..Self::default()
        }
    }
}

impl OverlayState for SelectionOverlay {
    fn is_selected(&self, row: u32, col: u32) -> bool {
        self.selections.iter().any(|s| s.contains(row, col))
    }

    fn selection_count(&self, row: u32, col: u32) -> u8 {
        let count = self
            .selections
            .iter()
            .filter(|s| s.contains(row, col))
            .count();
        u8::try_from(count).unwrap_or(u8::MAX)
    }

    fn is_picked(&self, row: u32, col: u32) -> bool {
        self.picked.as_ref().is_some_and(|s| s.contains(row, col))
    }

    fn is_header_highlighted(&self, row: u32, col: u32) -> bool {
        use crate::types::SelectionType;
        self.selections.iter().any(|s| match s.selection_type {
            SelectionType::RowRange => s.contains(row, 0),
            SelectionType::ColumnRange => s.contains(0, col),
            SelectionType::All => true,
            SelectionType::CellRange => false,
        })
    }

    fn is_active_cell(&self, row: u32, col: u32) -> bool {
        self.active == Some((row, col))
    }

    fn in_fill_region(&self, row: u32, col: u32) -> bool {
        self.fill_region
            .as_ref()
            .is_some_and(|s| s.contains(row, col))
    }

    fn is_move_highlighted(&self, row: u32, col: u32) -> bool {
        self.move_region
            .as_ref()
            .is_some_and(|s| s.contains(row, col))
    }

    fn is_hovered(&self, row: u32, col: u32) -> bool {
        self.hovered == Some((row, col))
    }

    fn drag_context(&self) -> Option<DragContext> {
        self.drag
    }

    fn is_row_header_highlighted(&self, row: u32) -> bool {
        use crate::types::SelectionType;
        self.selections.iter().any(|s| {
            matches!(
                s.selection_type,
                SelectionType::RowRange | SelectionType::All | SelectionType::CellRange
            ) && s.contains(row, s.start_col.min(s.end_col))
        })
    }

    fn is_col_header_highlighted(&self, col: u32) -> bool {
        use crate::types::SelectionType;
        self.selections.iter().any(|s| {
            matches!(
                s.selection_type,
                SelectionType::ColumnRange | SelectionType::All | SelectionType::CellRange
            ) && s.contains(s.start_row.min(s.end_row), col)
        })
    }

    fn prop_rects(&self) -> Vec<Rect> {
        self.props.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn selection_predicates() {
        let overlay = SelectionOverlay::select(Selection::cell_range(2, 2, 4, 4));
        assert!(overlay.is_selected(3, 3));
        assert!(!overlay.is_selected(5, 5));
        assert!(overlay.is_active_cell(2, 2));
        assert_eq!(overlay.selection_count(3, 3), 1);
    }

    #[test]
    fn overlapping_selections_stack() {
        let mut overlay = SelectionOverlay::select(Selection::cell_range(0, 0, 5, 5));
        overlay.selections.push(Selection::cell_range(3, 3, 8, 8));
        assert_eq!(overlay.selection_count(4, 4), 2);
        assert_eq!(overlay.selection_count(7, 7), 1);
    }

    #[test]
    fn row_band_highlights_header() {
        let overlay = SelectionOverlay::select(Selection::row_range(2, 3));
        assert!(overlay.is_header_highlighted(2, 7));
        assert!(!overlay.is_header_highlighted(4, 7));
        assert!(overlay.is_row_header_highlighted(3));
    }

    #[test]
    fn no_overlay_is_inert() {
        let overlay = NoOverlay;
        assert!(!overlay.is_selected(0, 0));
        assert_eq!(overlay.selection_count(0, 0), 0);
        assert!(overlay.prop_rects().is_empty());
    }
}
