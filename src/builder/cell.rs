//! Single-cell construction.

use crate::borders::EdgeBorders;
use crate::graph::{CellNode, CellSourceData, DrawStatus, MergeEdges, RenderCell};
use crate::types::{HAlign, TextWrap};

use super::GridBuilder;

/// Hard bound on how many neighbor columns an overflow scan may visit in
/// each direction.
pub const MAX_OVERFLOW_COLUMNS: u32 = 8;

/// Horizontal text inset within a cell, in logical pixels.
pub(crate) const CELL_H_PADDING: f32 = 3.0;

impl GridBuilder<'_> {
    /// Construct one cell node at (row, col).
    ///
    /// Non-origin cells of a merged region come out as `SkipNotDrawn` with
    /// no text; their border sets are still populated because neighboring
    /// real cells read them during edge resolution.
    pub(crate) fn build_cell(
        &mut self,
        row: u32,
        col: u32,
        view_row: u32,
        view_col: u32,
    ) -> CellNode {
        let cell_rect = self.layout.cell_rect(row, col);
        let data = self.source.cell(row, col);

        let merge = self.layout.merge_at(row, col).map(|info| MergeEdges {
            is_origin: info.is_origin,
            top_interior: info.is_interior_row(row),
            left_interior: info.is_interior_col(col),
            bottom_interior: !info.is_last_row(row),
            right_interior: !info.is_last_col(col),
        });

        let custom_borders =
            EdgeBorders::from_style(&data.style, data.table.is_some(), self.theme);

        let mut cell = RenderCell {
            rect: cell_rect.rect(),
            status: if cell_rect.skip {
                DrawStatus::SkipNotDrawn
            } else {
                DrawStatus::Pending
            },
            custom_borders,
            ..RenderCell::default()
        };

        if !cell_rect.skip {
            if let Some(value) = data.value.as_deref().filter(|v| !v.is_empty()) {
                let available = (cell.rect.width - CELL_H_PADDING * 2.0).max(0.0);
                cell.text = Some(self.shape_cached(value, available, &data.style));
            }
        }

        CellNode {
            source: CellSourceData {
                row,
                col,
                view_row,
                view_col,
                data,
                merge,
            },
            cell,
            prev_sibling: None,
            next_sibling: None,
            upper_sibling: None,
            lower_sibling: None,
        }
    }
}

/// Directions a cell's overflowing text may bleed, derived from its
/// horizontal alignment and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OverflowDirections {
    pub left: bool,
    pub right: bool,
}

/// Decide which directions a cell may overflow.
///
/// Rotated text only bleeds rightwards, and only when its alignment leaves
/// the right side usable; wrapped and clipped cells never bleed.
pub(crate) fn overflow_directions(
    wrap: TextWrap,
    align: HAlign,
    rotation: i32,
) -> OverflowDirections {
    if wrap != TextWrap::Overflow {
        return OverflowDirections {
            left: false,
            right: false,
        };
    }
    if rotation != 0 {
        let usable = matches!(align, HAlign::General | HAlign::Left);
        return OverflowDirections {
            left: false,
            right: usable,
        };
    }
    match align {
        HAlign::General | HAlign::Left | HAlign::Justify => OverflowDirections {
            left: false,
            right: true,
        },
        HAlign::Right => OverflowDirections {
            left: true,
            right: false,
        },
        HAlign::Center => OverflowDirections {
            left: true,
            right: true,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn wrap_never_overflows() {
        let dirs = overflow_directions(TextWrap::Wrap, HAlign::Left, 0);
        assert!(!dirs.left && !dirs.right);
        let dirs = overflow_directions(TextWrap::Clip, HAlign::Center, 0);
        assert!(!dirs.left && !dirs.right);
    }

    #[test]
    fn alignment_picks_direction() {
        let dirs = overflow_directions(TextWrap::Overflow, HAlign::Left, 0);
        assert!(dirs.right && !dirs.left);
        let dirs = overflow_directions(TextWrap::Overflow, HAlign::Right, 0);
        assert!(dirs.left && !dirs.right);
        let dirs = overflow_directions(TextWrap::Overflow, HAlign::Center, 0);
        assert!(dirs.left && dirs.right);
    }

    #[test]
    fn rotation_restricts_overflow() {
        let dirs = overflow_directions(TextWrap::Overflow, HAlign::Center, 45);
        assert!(!dirs.left && !dirs.right);
        let dirs = overflow_directions(TextWrap::Overflow, HAlign::Left, 45);
        assert!(dirs.right);
    }
}
