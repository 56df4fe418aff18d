//! Common test utilities for gridview integration tests.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use gridview::engine::{FrameStats, GridConfig, GridRenderer};
use gridview::layout::{GridLayout, Viewport};
use gridview::overlay::OverlayState;
use gridview::paint::RecordingSurface;
use gridview::source::MemorySource;
use gridview::text::MonospaceShaper;

/// A complete headless rendering setup: in-memory source, layout, viewport
/// and a synchronous renderer painting into a recording surface.
pub struct TestWorld {
    pub source: MemorySource,
    pub layout: GridLayout,
    pub viewport: Viewport,
    pub renderer: GridRenderer,
    pub shaper: MonospaceShaper,
}

impl TestWorld {
    /// A grid with `max_row + 1` rows and `max_col + 1` columns, default
    /// geometry, no frozen panes.
    pub fn new(max_row: u32, max_col: u32) -> Self {
        Self::with_frozen(max_row, max_col, 0, 0)
    }

    pub fn with_frozen(max_row: u32, max_col: u32, frozen_rows: u32, frozen_cols: u32) -> Self {
        let source = MemorySource::new(max_row, max_col);
        let layout = GridLayout::from_source(&source, frozen_rows, frozen_cols);
        let mut viewport = Viewport::new();
        viewport.resize(800.0, 600.0);
        viewport.clamp_scroll(&layout);
        Self {
            source,
            layout,
            viewport,
            renderer: GridRenderer::new(GridConfig {
                synchronous: true,
                ..GridConfig::default()
            }),
            shaper: MonospaceShaper::default(),
        }
    }

    /// Recompute the layout after mutating the source's geometry, merges or
    /// hidden ranges.
    pub fn relayout(&mut self) {
        let frozen_rows = self.layout.frozen_rows;
        let frozen_cols = self.layout.frozen_cols;
        self.layout = GridLayout::from_source(&self.source, frozen_rows, frozen_cols);
        self.viewport.clamp_scroll(&self.layout);
    }

    /// Render one frame into a fresh recording surface.
    pub fn render(&mut self, overlay: &dyn OverlayState) -> (RecordingSurface, FrameStats) {
        let mut surface = RecordingSurface::new();
        let stats = self.renderer.render_frame(
            &mut surface,
            &self.source,
            &self.shaper,
            overlay,
            &self.layout,
            &self.viewport,
        );
        (surface, stats)
    }
}
