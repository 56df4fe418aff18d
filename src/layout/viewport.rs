//! Viewport state management for scrolling and zoom.

use super::GridLayout;

/// Viewport state - represents the visible area of the grid
#[derive(Clone)]
pub struct Viewport {
    /// Horizontal scroll position in sheet coordinates
    pub scroll_x: f32,
    /// Vertical scroll position in sheet coordinates
    pub scroll_y: f32,
    /// Viewport width in pixels
    pub width: f32,
    /// Viewport height in pixels
    pub height: f32,
    /// Zoom scale factor (1.0 = 100%)
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// Create a new viewport with default values
    pub fn new() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width: 800.0,
            height: 600.0,
            scale: 1.0,
        }
    }

    /// Get visible scrollable row range (inclusive) based on current scroll position.
    pub fn visible_rows(&self, layout: &GridLayout) -> (u32, u32) {
        self.visible_rows_in_height(layout, self.height)
    }

    /// Get visible scrollable column range (inclusive) based on current scroll position.
    pub fn visible_cols(&self, layout: &GridLayout) -> (u32, u32) {
        self.visible_cols_in_width(layout, self.width)
    }

    /// Get visible scrollable row range (inclusive) for a given viewport height.
    /// This allows callers to use a content height that excludes headers/scrollbars.
    pub fn visible_rows_in_height(&self, layout: &GridLayout, viewport_height: f32) -> (u32, u32) {
        let frozen_height = layout.frozen_rows_height();
        let scrollable_viewport_height = (viewport_height - frozen_height).max(0.0);

        let start = layout.row_at_y(self.scroll_y).unwrap_or(layout.max_row);
        let end = layout
            .row_at_y(self.scroll_y + scrollable_viewport_height / self.scale.max(0.01))
            .unwrap_or(layout.max_row);
        (start.min(layout.max_row), end.min(layout.max_row))
    }

    /// Get visible scrollable column range (inclusive) for a given viewport width.
    /// This allows callers to use a content width that excludes headers/scrollbars.
    pub fn visible_cols_in_width(&self, layout: &GridLayout, viewport_width: f32) -> (u32, u32) {
        let frozen_width = layout.frozen_cols_width();
        let scrollable_viewport_width = (viewport_width - frozen_width).max(0.0);

        let start = layout.col_at_x(self.scroll_x).unwrap_or(layout.max_col);
        let end = layout
            .col_at_x(self.scroll_x + scrollable_viewport_width / self.scale.max(0.01))
            .unwrap_or(layout.max_col);
        (start.min(layout.max_col), end.min(layout.max_col))
    }

    /// Convert sheet coordinates to screen coordinates
    pub fn to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.scroll_x) * self.scale,
            (y - self.scroll_y) * self.scale,
        )
    }

    /// Convert sheet coordinates to screen coordinates for a cell at (row, col),
    /// accounting for frozen panes.
    ///
    /// Frozen cells render at their natural layout position (no scroll).
    /// Non-frozen cells render at `frozen_size + (layout_pos - scroll_pos) * scale`,
    /// where scroll starts at the frozen boundary (minimum scroll).
    pub fn to_screen_frozen(
        &self,
        x: f32,
        y: f32,
        row: u32,
        col: u32,
        layout: &GridLayout,
    ) -> (f32, f32) {
        let frozen_width = layout.frozen_cols_width();
        let frozen_height = layout.frozen_rows_height();

        let screen_x = if col < layout.frozen_cols {
            x * self.scale
        } else {
            frozen_width * self.scale + (x - self.scroll_x) * self.scale
        };

        let screen_y = if row < layout.frozen_rows {
            y * self.scale
        } else {
            frozen_height * self.scale + (y - self.scroll_y) * self.scale
        };

        (screen_x, screen_y)
    }

    /// Convert screen coordinates to sheet coordinates
    pub fn to_sheet(&self, screen_x: f32, screen_y: f32) -> (f32, f32) {
        (
            screen_x / self.scale + self.scroll_x,
            screen_y / self.scale + self.scroll_y,
        )
    }

    /// Clamp scroll position to valid range.
    ///
    /// With frozen panes, scroll positions are relative to the frozen region.
    /// `scroll_x` starts at the frozen column boundary, `scroll_y` at the
    /// frozen row boundary.
    pub fn clamp_scroll(&mut self, layout: &GridLayout) {
        let frozen_width = layout.frozen_cols_width();
        let frozen_height = layout.frozen_rows_height();

        let min_x = frozen_width;
        let min_y = frozen_height;

        let scrollable_width = layout.total_width() - frozen_width;
        let scrollable_height = layout.total_height() - frozen_height;
        let viewport_content_width = self.width - frozen_width;
        let viewport_content_height = self.height - frozen_height;

        let max_x = frozen_width + (scrollable_width - viewport_content_width).max(0.0);
        let max_y = frozen_height + (scrollable_height - viewport_content_height).max(0.0);

        self.scroll_x = self.scroll_x.clamp(min_x, max_x);
        self.scroll_y = self.scroll_y.clamp(min_y, max_y);
    }

    /// Scroll by delta amounts
    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32, layout: &GridLayout) {
        self.scroll_x += delta_x;
        self.scroll_y += delta_y;
        self.clamp_scroll(layout);
    }

    /// Set absolute scroll position
    pub fn set_scroll(&mut self, x: f32, y: f32, layout: &GridLayout) {
        self.scroll_x = x;
        self.scroll_y = y;
        self.clamp_scroll(layout);
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
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
    use crate::layout::{DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT};
    use std::collections::{HashMap, HashSet};

    fn layout_with_frozen(rows: u32, cols: u32) -> GridLayout {
        GridLayout::new(
            99,
            99,
            &HashMap::new(),
            &HashMap::new(),
            &HashSet::new(),
            &HashSet::new(),
            &[],
            rows,
            cols,
        )
    }

    #[test]
    fn visible_rows_follow_scroll() {
        let layout = layout_with_frozen(0, 0);
        let mut viewport = Viewport::new();
        viewport.height = DEFAULT_ROW_HEIGHT * 10.0;

        let (start, end) = viewport.visible_rows(&layout);
        assert_eq!(start, 0);
        assert_eq!(end, 10);

        viewport.scroll_y = DEFAULT_ROW_HEIGHT * 3.0;
        let (start, _) = viewport.visible_rows(&layout);
        assert_eq!(start, 3);
    }

    #[test]
    fn scroll_clamps_to_content() {
        let layout = layout_with_frozen(0, 0);
        let mut viewport = Viewport::new();
        viewport.width = DEFAULT_COL_WIDTH * 10.0;
        viewport.height = DEFAULT_ROW_HEIGHT * 10.0;

        viewport.scroll_by(1e9, 1e9, &layout);
        assert!(viewport.scroll_x <= layout.total_width());
        assert!(viewport.scroll_y <= layout.total_height());

        viewport.scroll_by(-1e9, -1e9, &layout);
        assert_eq!(viewport.scroll_x, 0.0);
        assert_eq!(viewport.scroll_y, 0.0);
    }

    #[test]
    fn scroll_minimum_is_frozen_boundary() {
        let layout = layout_with_frozen(2, 1);
        let mut viewport = Viewport::new();
        viewport.scroll_by(-1e9, -1e9, &layout);
        assert_eq!(viewport.scroll_x, layout.frozen_cols_width());
        assert_eq!(viewport.scroll_y, layout.frozen_rows_height());
    }

    #[test]
    fn frozen_cells_ignore_scroll() {
        let layout = layout_with_frozen(1, 1);
        let mut viewport = Viewport::new();
        viewport.scroll_x = layout.frozen_cols_width() + DEFAULT_COL_WIDTH * 5.0;
        viewport.scroll_y = layout.frozen_rows_height() + DEFAULT_ROW_HEIGHT * 5.0;

        // Cell (0,0) is frozen both ways - fixed at its layout position
        let (sx, sy) = viewport.to_screen_frozen(0.0, 0.0, 0, 0, &layout);
        assert_eq!(sx, 0.0);
        assert_eq!(sy, 0.0);

        // A scrollable cell shifts by scroll
        let x = layout.col_positions[6];
        let y = layout.row_positions[6];
        let (sx, sy) = viewport.to_screen_frozen(x, y, 6, 6, &layout);
        assert_eq!(
            sx,
            layout.frozen_cols_width() + (x - viewport.scroll_x)
        );
        assert_eq!(
            sy,
            layout.frozen_rows_height() + (y - viewport.scroll_y)
        );
    }
}
