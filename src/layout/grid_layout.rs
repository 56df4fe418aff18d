//! Pre-computed layout data for the grid.
//!
//! Cell positions are computed once from the data source's row/column
//! geometry, enabling O(log n) lookups for cell positions and hit testing.

use std::collections::HashMap;

use crate::source::CellSource;
use crate::types::{CellRange, MergeRange, Rect};

/// Pre-computed layout data for the rendered grid
#[derive(Clone)]
pub struct GridLayout {
    /// Cumulative column positions (`col_positions[i]` = x of column i's left edge)
    pub col_positions: Vec<f32>,
    /// Cumulative row positions (`row_positions[i]` = y of row i's top edge)
    pub row_positions: Vec<f32>,
    /// Column widths (0 for hidden columns)
    pub col_widths: Vec<f32>,
    /// Row heights (0 for hidden rows)
    pub row_heights: Vec<f32>,
    /// Merge info lookup by (row, col)
    pub merges: HashMap<(u32, u32), MergeInfo>,
    /// Maximum row index
    pub max_row: u32,
    /// Maximum column index
    pub max_col: u32,
    /// Number of frozen rows (0 = no frozen rows)
    pub frozen_rows: u32,
    /// Number of frozen columns (0 = no frozen columns)
    pub frozen_cols: u32,
}

/// Information about a merged cell region
#[derive(Clone)]
pub struct MergeInfo {
    /// True if this cell is the top-left origin of the merge
    pub is_origin: bool,
    /// Row of the merge origin
    pub origin_row: u32,
    /// Column of the merge origin
    pub origin_col: u32,
    /// Number of rows in the merge
    pub row_span: u32,
    /// Number of columns in the merge
    pub col_span: u32,
}

impl MergeInfo {
    /// Whether `edge_row` is an interior row of the merge (not the first).
    pub fn is_interior_row(&self, row: u32) -> bool {
        row > self.origin_row
    }

    /// Whether `edge_col` is an interior column of the merge (not the first).
    pub fn is_interior_col(&self, col: u32) -> bool {
        col > self.origin_col
    }

    /// Whether a row is the last row of the merge.
    pub fn is_last_row(&self, row: u32) -> bool {
        row + 1 == self.origin_row + self.row_span
    }

    /// Whether a column is the last column of the merge.
    pub fn is_last_col(&self, col: u32) -> bool {
        col + 1 == self.origin_col + self.col_span
    }
}

/// Rectangle representing a cell's bounds
pub struct CellRect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    /// Width of the cell
    pub width: f32,
    /// Height of the cell
    pub height: f32,
    /// True if this cell should be skipped (part of merge but not origin)
    pub skip: bool,
}

impl CellRect {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Default column width in pixels
pub const DEFAULT_COL_WIDTH: f32 = 64.0;

/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: f32 = 20.0;

impl GridLayout {
    /// Create a layout from explicit geometry.
    ///
    /// # Arguments
    /// * `max_row` / `max_col` - Maximum indices in the grid
    /// * `col_widths_map` / `row_heights_map` - Overrides of the defaults
    /// * `hidden_cols` / `hidden_rows` - Hidden indices (zero extent)
    /// * `merge_ranges` - Merged regions (inclusive ends)
    /// * `frozen_rows` / `frozen_cols` - Pane freeze counts (0 = none)
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        max_row: u32,
        max_col: u32,
        col_widths_map: &HashMap<u32, f32>,
        row_heights_map: &HashMap<u32, f32>,
        hidden_cols: &std::collections::HashSet<u32>,
        hidden_rows: &std::collections::HashSet<u32>,
        merge_ranges: &[MergeRange],
        frozen_rows: u32,
        frozen_cols: u32,
    ) -> Self {
        // Pre-compute column positions
        let mut col_positions = Vec::with_capacity(max_col as usize + 2);
        let mut col_widths = Vec::with_capacity(max_col as usize + 1);
        let mut x: f32 = 0.0;

        for col in 0..=max_col {
            col_positions.push(x);
            let w = if hidden_cols.contains(&col) {
                0.0
            } else {
                col_widths_map
                    .get(&col)
                    .copied()
                    .unwrap_or(DEFAULT_COL_WIDTH)
            };
            col_widths.push(w);
            x += w;
        }
        col_positions.push(x); // Final edge

        // Pre-compute row positions
        let mut row_positions = Vec::with_capacity(max_row as usize + 2);
        let mut row_heights = Vec::with_capacity(max_row as usize + 1);
        let mut y: f32 = 0.0;

        for row in 0..=max_row {
            row_positions.push(y);
            let h = if hidden_rows.contains(&row) {
                0.0
            } else {
                row_heights_map
                    .get(&row)
                    .copied()
                    .unwrap_or(DEFAULT_ROW_HEIGHT)
            };
            row_heights.push(h);
            y += h;
        }
        row_positions.push(y); // Final edge

        // Build merge map
        let mut merges = HashMap::new();
        for range in merge_ranges {
            let row_span = range.end_row.saturating_sub(range.start_row) + 1;
            let col_span = range.end_col.saturating_sub(range.start_col) + 1;

            for r in range.start_row..=range.end_row {
                for c in range.start_col..=range.end_col {
                    let is_origin = r == range.start_row && c == range.start_col;
                    merges.insert(
                        (r, c),
                        MergeInfo {
                            is_origin,
                            origin_row: range.start_row,
                            origin_col: range.start_col,
                            row_span,
                            col_span,
                        },
                    );
                }
            }
        }

        GridLayout {
            col_positions,
            row_positions,
            col_widths,
            row_heights,
            merges,
            max_row,
            max_col,
            frozen_rows,
            frozen_cols,
        }
    }

    /// Build a layout by querying a data source for its geometry and merge
    /// metadata.
    pub fn from_source(source: &dyn CellSource, frozen_rows: u32, frozen_cols: u32) -> Self {
        let max_row = source.max_row();
        let max_col = source.max_col();

        let mut col_widths_map = HashMap::new();
        let mut hidden_cols = std::collections::HashSet::new();
        for col in 0..=max_col {
            if source.is_col_hidden(col) {
                hidden_cols.insert(col);
            } else {
                col_widths_map.insert(col, source.col_width(col));
            }
        }

        let mut row_heights_map = HashMap::new();
        let mut hidden_rows = std::collections::HashSet::new();
        for row in 0..=max_row {
            if source.is_row_hidden(row) {
                hidden_rows.insert(row);
            } else {
                row_heights_map.insert(row, source.row_height(row));
            }
        }

        Self::new(
            max_row,
            max_col,
            &col_widths_map,
            &row_heights_map,
            &hidden_cols,
            &hidden_rows,
            &source.merge_ranges(),
            frozen_rows,
            frozen_cols,
        )
    }

    /// Get cell bounds in sheet coordinates
    pub fn cell_rect(&self, row: u32, col: u32) -> CellRect {
        let x = self.col_positions.get(col as usize).copied().unwrap_or(0.0);
        let y = self.row_positions.get(row as usize).copied().unwrap_or(0.0);
        let mut w = self.col_widths.get(col as usize).copied().unwrap_or(0.0);
        let mut h = self.row_heights.get(row as usize).copied().unwrap_or(0.0);

        // Check for merge
        if let Some(merge) = self.merges.get(&(row, col)) {
            if !merge.is_origin {
                return CellRect {
                    x,
                    y,
                    width: w,
                    height: h,
                    skip: true,
                };
            }
            // Calculate merged size
            let end_col = col + merge.col_span;
            let end_row = row + merge.row_span;
            w = self
                .col_positions
                .get(end_col as usize)
                .copied()
                .unwrap_or(x)
                - x;
            h = self
                .row_positions
                .get(end_row as usize)
                .copied()
                .unwrap_or(y)
                - y;
        }

        CellRect {
            x,
            y,
            width: w,
            height: h,
            skip: false,
        }
    }

    /// Merge info at a cell, when the cell belongs to a merged region.
    pub fn merge_at(&self, row: u32, col: u32) -> Option<&MergeInfo> {
        self.merges.get(&(row, col))
    }

    /// Find row at y position (binary search)
    pub fn row_at_y(&self, y: f32) -> Option<u32> {
        if self.row_positions.is_empty() {
            return None;
        }
        match self
            .row_positions
            .binary_search_by(|pos| pos.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal))
        {
            Ok(i) => u32::try_from(i).ok(),
            Err(i) => u32::try_from(i.saturating_sub(1)).ok(),
        }
    }

    /// Find column at x position (binary search)
    pub fn col_at_x(&self, x: f32) -> Option<u32> {
        if self.col_positions.is_empty() {
            return None;
        }
        match self
            .col_positions
            .binary_search_by(|pos| pos.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal))
        {
            Ok(i) => u32::try_from(i).ok(),
            Err(i) => u32::try_from(i.saturating_sub(1)).ok(),
        }
    }

    /// Get total width of the grid
    pub fn total_width(&self) -> f32 {
        self.col_positions.last().copied().unwrap_or(0.0)
    }

    /// Get total height of the grid
    pub fn total_height(&self) -> f32 {
        self.row_positions.last().copied().unwrap_or(0.0)
    }

    /// Get column width at index
    pub fn col_width(&self, col: u32) -> f32 {
        self.col_widths
            .get(col as usize)
            .copied()
            .unwrap_or(DEFAULT_COL_WIDTH)
    }

    /// Get row height at index
    pub fn row_height(&self, row: u32) -> f32 {
        self.row_heights
            .get(row as usize)
            .copied()
            .unwrap_or(DEFAULT_ROW_HEIGHT)
    }

    /// Whether a row is hidden (zero extent).
    pub fn is_row_hidden(&self, row: u32) -> bool {
        self.row_heights
            .get(row as usize)
            .copied()
            .unwrap_or(0.0)
            <= 0.0
    }

    /// Whether a column is hidden (zero extent).
    pub fn is_col_hidden(&self, col: u32) -> bool {
        self.col_widths.get(col as usize).copied().unwrap_or(0.0) <= 0.0
    }

    /// Get the total height of frozen rows (returns 0 if no frozen rows)
    pub fn frozen_rows_height(&self) -> f32 {
        if self.frozen_rows == 0 {
            return 0.0;
        }
        self.row_positions
            .get(self.frozen_rows as usize)
            .copied()
            .unwrap_or(0.0)
    }

    /// Get the total width of frozen columns (returns 0 if no frozen columns)
    pub fn frozen_cols_width(&self) -> f32 {
        if self.frozen_cols == 0 {
            return 0.0;
        }
        self.col_positions
            .get(self.frozen_cols as usize)
            .copied()
            .unwrap_or(0.0)
    }

    /// Clamp a half-open cell range to this layout's extent.
    pub fn clamp_range(&self, range: CellRange) -> CellRange {
        range.clamped(self.max_row, self.max_col)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn plain_layout(max_row: u32, max_col: u32) -> GridLayout {
        GridLayout::new(
            max_row,
            max_col,
            &HashMap::new(),
            &HashMap::new(),
            &std::collections::HashSet::new(),
            &std::collections::HashSet::new(),
            &[],
            0,
            0,
        )
    }

    #[test]
    fn test_basic_layout() {
        let layout = plain_layout(10, 5);
        assert_eq!(layout.max_row, 10);
        assert_eq!(layout.max_col, 5);
        assert_eq!(layout.total_width(), DEFAULT_COL_WIDTH * 6.0);
        assert_eq!(layout.total_height(), DEFAULT_ROW_HEIGHT * 11.0);
    }

    #[test]
    fn test_cell_rect() {
        let layout = plain_layout(10, 5);

        let rect = layout.cell_rect(0, 0);
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 0.0);
        assert_eq!(rect.width, DEFAULT_COL_WIDTH);
        assert_eq!(rect.height, DEFAULT_ROW_HEIGHT);
        assert!(!rect.skip);

        let rect = layout.cell_rect(1, 2);
        assert_eq!(rect.x, DEFAULT_COL_WIDTH * 2.0);
        assert_eq!(rect.y, DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn test_merged_cells() {
        // Merge rows 0-1, cols 0-1
        let layout = GridLayout::new(
            10,
            5,
            &HashMap::new(),
            &HashMap::new(),
            &std::collections::HashSet::new(),
            &std::collections::HashSet::new(),
            &[MergeRange {
                start_row: 0,
                start_col: 0,
                end_row: 1,
                end_col: 1,
            }],
            0,
            0,
        );

        // Origin cell should have full merged dimensions
        let rect = layout.cell_rect(0, 0);
        assert!(!rect.skip);
        assert_eq!(rect.width, DEFAULT_COL_WIDTH * 2.0);
        assert_eq!(rect.height, DEFAULT_ROW_HEIGHT * 2.0);

        // Non-origin cells should be skipped
        assert!(layout.cell_rect(0, 1).skip);
        assert!(layout.cell_rect(1, 0).skip);
        assert!(layout.cell_rect(1, 1).skip);
    }

    #[test]
    fn test_hidden_rows_have_zero_extent() {
        let mut hidden_rows = std::collections::HashSet::new();
        hidden_rows.insert(1);
        let layout = GridLayout::new(
            5,
            5,
            &HashMap::new(),
            &HashMap::new(),
            &std::collections::HashSet::new(),
            &hidden_rows,
            &[],
            0,
            0,
        );
        assert!(layout.is_row_hidden(1));
        assert_eq!(layout.row_height(1), 0.0);
        // Row 2 sits directly below row 0
        assert_eq!(layout.cell_rect(2, 0).y, DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn test_row_at_y() {
        let layout = plain_layout(10, 5);
        assert_eq!(layout.row_at_y(0.0), Some(0));
        assert_eq!(layout.row_at_y(10.0), Some(0));
        assert_eq!(layout.row_at_y(DEFAULT_ROW_HEIGHT), Some(1));
        assert_eq!(layout.row_at_y(DEFAULT_ROW_HEIGHT * 2.5), Some(2));
    }

    #[test]
    fn test_col_at_x() {
        let layout = plain_layout(10, 5);
        assert_eq!(layout.col_at_x(0.0), Some(0));
        assert_eq!(layout.col_at_x(32.0), Some(0));
        assert_eq!(layout.col_at_x(DEFAULT_COL_WIDTH), Some(1));
        assert_eq!(layout.col_at_x(DEFAULT_COL_WIDTH * 2.5), Some(2));
    }

    #[test]
    fn test_frozen_extents() {
        let layout = GridLayout::new(
            10,
            10,
            &HashMap::new(),
            &HashMap::new(),
            &std::collections::HashSet::new(),
            &std::collections::HashSet::new(),
            &[],
            2,
            1,
        );
        assert_eq!(layout.frozen_rows_height(), DEFAULT_ROW_HEIGHT * 2.0);
        assert_eq!(layout.frozen_cols_width(), DEFAULT_COL_WIDTH);
    }

    #[test]
    fn test_clamp_range() {
        let layout = plain_layout(9, 9);
        let clamped = layout.clamp_range(CellRange::new(0, 0, 100, 100));
        assert_eq!(clamped.end_row, 10);
        assert_eq!(clamped.end_col, 10);
    }
}
