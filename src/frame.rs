//! Frame-scoped derived context.
//!
//! A [`FrameCache`] is constructed at the start of each frame and passed by
//! reference through the whole validity/build/paint chain; its lifetime is
//! exactly one frame. It snapshots the viewport, the frozen-pane boundary
//! pixels, the visible-prop rects and the dirty flags consumed this frame.

use serde::Serialize;

use crate::layout::GridLayout;
use crate::layout::Viewport;
use crate::overlay::OverlayState;
use crate::types::Rect;

/// Width of the shadow band painted under a frozen-pane boundary, in logical
/// pixels. Cells inside the band repaint every frame because the shadow
/// blend depends on scroll position.
pub const FREEZE_SHADOW_WIDTH: f32 = 8.0;

/// Categories of state that changed since the previous frame.
///
/// Flags accumulate between frames (write-only) and are read then cleared
/// exactly once per draw. `all` implies every other flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirtyFlags {
    pub all: bool,
    pub scroll: bool,
    pub selection: bool,
    pub hover: bool,
    pub fill_overlay: bool,
    pub move_overlay: bool,
}

impl DirtyFlags {
    pub fn mark_all(&mut self) {
        self.all = true;
    }

    pub fn mark_scroll(&mut self) {
        self.scroll = true;
    }

    pub fn mark_selection(&mut self) {
        self.selection = true;
    }

    pub fn mark_hover(&mut self) {
        self.hover = true;
    }

    pub fn mark_fill_overlay(&mut self) {
        self.fill_overlay = true;
    }

    pub fn mark_move_overlay(&mut self) {
        self.move_overlay = true;
    }

    /// Whether any category is dirty.
    pub fn any(&self) -> bool {
        self.all
            || self.scroll
            || self.selection
            || self.hover
            || self.fill_overlay
            || self.move_overlay
    }

    /// Read-then-clear: returns the accumulated flags and resets the store.
    pub fn take(&mut self) -> DirtyFlags {
        std::mem::take(self)
    }

    pub fn scroll_dirty(&self) -> bool {
        self.scroll || self.all
    }

    pub fn selection_dirty(&self) -> bool {
        self.selection || self.all
    }

    pub fn hover_dirty(&self) -> bool {
        self.hover || self.all
    }

    pub fn fill_overlay_dirty(&self) -> bool {
        self.fill_overlay || self.all
    }

    pub fn move_overlay_dirty(&self) -> bool {
        self.move_overlay || self.all
    }

    /// Whether any of the overlay categories that make border repaints
    /// visually necessary is dirty (gates neighbor promotion).
    pub fn overlay_dirty(&self) -> bool {
        self.selection_dirty() || self.fill_overlay_dirty() || self.move_overlay_dirty()
    }
}

/// Per-frame derived, read-only context.
pub struct FrameCache<'a> {
    /// Monotonic frame number (generational stamp).
    pub frame: u64,
    /// Dirty flags consumed for this frame.
    pub flags: DirtyFlags,
    pub layout: &'a GridLayout,
    pub viewport: Viewport,
    /// Bottom pixel of the frozen-row band in sheet coordinates (0 = none).
    pub last_frozen_row_px: f32,
    /// Right pixel of the frozen-column band in sheet coordinates (0 = none).
    pub last_frozen_col_px: f32,
    /// Visible prop rects (selection handles, style-preview anchors) in
    /// sheet coordinates, accumulated from the overlay.
    pub prop_rects: Vec<Rect>,
}

impl<'a> FrameCache<'a> {
    /// Snapshot the per-frame context. Called once at the top of a frame,
    /// after the dirty flags have been taken.
    pub fn build(
        frame: u64,
        flags: DirtyFlags,
        layout: &'a GridLayout,
        viewport: &Viewport,
        overlay: &dyn OverlayState,
    ) -> Self {
        Self {
            frame,
            flags,
            layout,
            viewport: viewport.clone(),
            last_frozen_row_px: layout.frozen_rows_height(),
            last_frozen_col_px: layout.frozen_cols_width(),
            prop_rects: overlay.prop_rects(),
        }
    }

    /// Linear-scan overlap test against the accumulated prop rects.
    ///
    /// Prop counts per frame are small (selection handles, a handful of
    /// preview anchors), so no spatial index is kept.
    pub fn is_under_prop(&self, rect: &Rect) -> bool {
        self.prop_rects.iter().any(|prop| prop.intersects(rect))
    }

    /// Shadow-region width test: whether a cell's area interacts with a
    /// frozen boundary's shadow band. Always treated as cache-invalid, since
    /// the blend under the shadow changes with every scroll position.
    pub fn straddles_frozen_boundary(&self, rect: &Rect, row: u32, col: u32) -> bool {
        let scale = self.viewport.scale;

        if self.last_frozen_row_px > 0.0 {
            let boundary = self.last_frozen_row_px * scale;
            let (_, screen_y) =
                self.viewport
                    .to_screen_frozen(rect.x, rect.y, row, col, self.layout);
            let screen_bottom = screen_y + rect.height * scale;
            if screen_y < boundary + FREEZE_SHADOW_WIDTH && screen_bottom > boundary {
                return true;
            }
        }

        if self.last_frozen_col_px > 0.0 {
            let boundary = self.last_frozen_col_px * scale;
            let (screen_x, _) =
                self.viewport
                    .to_screen_frozen(rect.x, rect.y, row, col, self.layout);
            let screen_right = screen_x + rect.width * scale;
            if screen_x < boundary + FREEZE_SHADOW_WIDTH && screen_right > boundary {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::layout::{DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT};
    use crate::overlay::NoOverlay;
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
    fn all_implies_every_category() {
        let mut flags = DirtyFlags::default();
        flags.mark_all();
        assert!(flags.scroll_dirty());
        assert!(flags.selection_dirty());
        assert!(flags.hover_dirty());
        assert!(flags.fill_overlay_dirty());
        assert!(flags.move_overlay_dirty());
    }

    #[test]
    fn take_clears_the_store() {
        let mut flags = DirtyFlags::default();
        flags.mark_selection();
        flags.mark_hover();

        let taken = flags.take();
        assert!(taken.selection_dirty());
        assert!(taken.hover_dirty());
        assert!(!flags.any());
    }

    #[test]
    fn overlay_dirty_gates_on_three_categories() {
        let mut flags = DirtyFlags::default();
        flags.mark_hover();
        assert!(!flags.overlay_dirty());
        flags.mark_fill_overlay();
        assert!(flags.overlay_dirty());
    }

    #[test]
    fn cell_under_frozen_row_shadow_is_flagged() {
        let layout = layout_with_frozen(2, 0);
        let mut viewport = Viewport::new();
        viewport.scroll_y = layout.frozen_rows_height();
        let frame = FrameCache::build(1, DirtyFlags::default(), &layout, &viewport, &NoOverlay);

        // First scrollable row sits directly under the boundary.
        let rect = Rect::new(
            0.0,
            layout.frozen_rows_height(),
            DEFAULT_COL_WIDTH,
            DEFAULT_ROW_HEIGHT,
        );
        assert!(frame.straddles_frozen_boundary(&rect, 2, 0));

        // A row far below the shadow band is unaffected.
        let far = Rect::new(
            0.0,
            layout.frozen_rows_height() + DEFAULT_ROW_HEIGHT * 10.0,
            DEFAULT_COL_WIDTH,
            DEFAULT_ROW_HEIGHT,
        );
        assert!(!frame.straddles_frozen_boundary(&far, 12, 0));

        // Frozen cells above the boundary do not re-blend.
        let frozen = Rect::new(0.0, 0.0, DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT);
        assert!(!frame.straddles_frozen_boundary(&frozen, 0, 0));
    }

    #[test]
    fn no_frozen_panes_no_shadow() {
        let layout = layout_with_frozen(0, 0);
        let viewport = Viewport::new();
        let frame = FrameCache::build(1, DirtyFlags::default(), &layout, &viewport, &NoOverlay);
        let rect = Rect::new(0.0, 0.0, DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT);
        assert!(!frame.straddles_frozen_boundary(&rect, 0, 0));
    }

    #[test]
    fn prop_rect_overlap_is_linear_scan() {
        let layout = layout_with_frozen(0, 0);
        let viewport = Viewport::new();
        let mut frame = FrameCache::build(1, DirtyFlags::default(), &layout, &viewport, &NoOverlay);
        frame.prop_rects.push(Rect::new(60.0, 15.0, 8.0, 8.0));

        let touching = Rect::new(0.0, 0.0, DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT);
        assert!(frame.is_under_prop(&touching));
        let clear = Rect::new(200.0, 200.0, DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT);
        assert!(!frame.is_under_prop(&clear));
    }
}
