//! Frame orchestration.
//!
//! [`GridRenderer`] owns the cross-frame state (Persistent Draw Cache,
//! dirty flags, shaped-text cache) and runs the per-frame sequence:
//! build the Frame Cache, reuse or rebuild each region's fragment, fix up
//! neighbors of rebuilt cells, resolve borders, and paint — a single
//! non-preemptible pass with no suspension point.

use serde::Serialize;

use crate::cache::{
    DrawCache, Fragment, GridRegion, HeaderAxis, HeaderFragment, TextLayoutCache,
    TEXT_CACHE_CAPACITY,
};
use crate::borders::recompute_transient;
use crate::builder::GridBuilder;
use crate::frame::{DirtyFlags, FrameCache, FREEZE_SHADOW_WIDTH};
use crate::graph::{CellGraph, DrawStatus, NodeId};
use crate::layout::{GridLayout, Viewport};
use crate::overlay::OverlayState;
use crate::paint::{paint_fragment, PaintStats, PaintSurface, VisibleCell};
use crate::propagate::{propagate, resolve_requests};
use crate::source::CellSource;
use crate::text::TextShaper;
use crate::theme::{StyleRole, Theme};
use crate::types::{col_to_letter, CellRange, HeaderConfig, Rect, Style, TextWrap};
use crate::validity::{check_cell, Verdict};

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct GridConfig {
    pub headers: HeaderConfig,
    /// Capacity of the shaped-text LRU cache.
    pub text_cache_capacity: usize,
    /// Draw-synchronously mode: `should_render` is always true, so hosts
    /// (and tests) can render without scheduling frames.
    pub synchronous: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            headers: HeaderConfig::default(),
            text_cache_capacity: TEXT_CACHE_CAPACITY,
            synchronous: false,
        }
    }
}

/// Per-frame counters reported to the host.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStats {
    pub frame: u64,
    /// Fragments rebuilt from the data source this frame.
    pub built_fragments: u32,
    /// Fragments reused from the draw cache (validity-checked).
    pub reused_fragments: u32,
    /// Cells rebuilt in place after failing a validity check.
    pub rebuilt_cells: u32,
    pub paint: PaintStats,
    pub visible_cells: u32,
    pub headers_repainted: bool,
}

/// The incremental cell-grid renderer.
pub struct GridRenderer {
    config: GridConfig,
    theme: Theme,
    cache: DrawCache,
    flags: DirtyFlags,
    frame: u64,
    text_cache: TextLayoutCache,
    visible_cells: Vec<VisibleCell>,
    frame_pending: bool,
}

impl Default for GridRenderer {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl GridRenderer {
    pub fn new(config: GridConfig) -> Self {
        let text_cache = TextLayoutCache::new(config.text_cache_capacity);
        Self {
            config,
            theme: Theme::default(),
            cache: DrawCache::new(),
            flags: DirtyFlags::default(),
            frame: 0,
            text_cache,
            visible_cells: Vec::new(),
            frame_pending: false,
        }
    }

    pub fn with_theme(config: GridConfig, theme: Theme) -> Self {
        let mut renderer = Self::new(config);
        renderer.theme = theme;
        renderer
    }

    /// Accumulate dirty-flag marks between frames.
    pub fn dirty_flags_mut(&mut self) -> &mut DirtyFlags {
        &mut self.flags
    }

    /// Discard all cached fragments and mark everything dirty.
    pub fn invalidate_all(&mut self) {
        self.flags.mark_all();
        self.cache.clear();
        self.text_cache.clear();
    }

    /// Schedule a frame. Returns `true` if a frame was newly scheduled.
    pub fn request_frame(&mut self) -> bool {
        let newly = !self.frame_pending;
        self.frame_pending = true;
        newly
    }

    /// Cancel a pending frame request wholesale. A frame already in
    /// progress always runs to completion — there is no mid-frame abort.
    pub fn cancel_frame(&mut self) {
        self.frame_pending = false;
    }

    /// Whether the host should run `render_frame` now.
    pub fn should_render(&self) -> bool {
        self.frame_pending || self.config.synchronous
    }

    /// The current frame's flat visible-cells list (sheet coordinates).
    pub fn visible_cells(&self) -> &[VisibleCell] {
        &self.visible_cells
    }

    /// Drawing status of a cached cell after the last frame, when the cell
    /// is present in any cached region fragment.
    pub fn cell_status(&self, row: u32, col: u32) -> Option<DrawStatus> {
        for region in GridRegion::ALL {
            if let Some(fragment) = self.cache.fragment(region) {
                if let Some(id) = fragment.node_at(row, col) {
                    return fragment.graph.get(id).map(|node| node.cell.status);
                }
            }
        }
        None
    }

    /// Resolve a sheet-space point to the cell painted there, topmost
    /// region first.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(u32, u32)> {
        self.visible_cells
            .iter()
            .rev()
            .find(|cell| cell.rect.contains(x, y))
            .map(|cell| (cell.row, cell.col))
    }

    /// Render one frame.
    ///
    /// The entire validity → build → propagate → composite → paint sequence
    /// runs to completion inside this call; cross-frame state is only
    /// mutated here, never concurrently.
    #[allow(clippy::too_many_arguments)]
    pub fn render_frame(
        &mut self,
        surface: &mut dyn PaintSurface,
        source: &dyn CellSource,
        shaper: &dyn TextShaper,
        overlay: &dyn OverlayState,
        layout: &GridLayout,
        viewport: &Viewport,
    ) -> FrameStats {
        self.frame += 1;
        self.frame_pending = false;
        let flags = self.flags.take();
        let frame = FrameCache::build(self.frame, flags, layout, viewport, overlay);

        let mut stats = FrameStats {
            frame: self.frame,
            ..FrameStats::default()
        };

        // Scroll (or full) invalidation discards the cache wholesale: the
        // validity checker is bypassed and every region rebuilds.
        if frame.flags.scroll_dirty() {
            self.cache.clear();
        }

        // Reuse or rebuild each region's fragment. Validity checks for an
        // entire region complete before any repaint in that region.
        let mut fragments: Vec<(GridRegion, Fragment)> = Vec::with_capacity(4);
        for region in GridRegion::ALL {
            let range = region_range(region, layout, viewport);
            if range.is_empty() {
                continue;
            }

            let cached = self.cache.take(region);
            let fragment = match cached {
                Some(mut fragment) if fragment.range == range => {
                    stats.reused_fragments += 1;
                    stats.rebuilt_cells +=
                        self.revalidate_fragment(&mut fragment, &frame, source, shaper, overlay);
                    fragment
                }
                _ => {
                    stats.built_fragments += 1;
                    let mut builder = GridBuilder::new(
                        source,
                        shaper,
                        layout,
                        &self.theme,
                        &mut self.text_cache,
                    );
                    let mut fragment = builder.build_fragment(range);
                    self.record_fragment_overlay(&mut fragment.graph, overlay, self.frame);
                    fragment
                }
            };
            fragments.push((region, fragment));
        }

        // Paint order: body first, frozen bands above it, corner on top.
        self.visible_cells.clear();
        for region in [
            GridRegion::Body,
            GridRegion::FrozenCols,
            GridRegion::FrozenRows,
            GridRegion::FrozenCorner,
        ] {
            if let Some((_, fragment)) = fragments.iter_mut().find(|(r, _)| *r == region) {
                let paint =
                    paint_fragment(surface, fragment, &frame, &self.theme, &mut self.visible_cells);
                stats.paint.accumulate(paint);
            }
        }

        self.paint_freeze_shadows(surface, layout, viewport);

        if self.config.headers.visible {
            stats.headers_repainted =
                self.paint_headers(surface, shaper, overlay, layout, viewport);
        }

        for (region, fragment) in fragments {
            self.cache.store(region, fragment);
        }

        #[allow(clippy::cast_possible_truncation)]
        {
            stats.visible_cells = self.visible_cells.len() as u32;
        }
        log::debug!(
            "frame {}: built={} reused={} rebuilt_cells={} painted={} cached={} borders={}",
            stats.frame,
            stats.built_fragments,
            stats.reused_fragments,
            stats.rebuilt_cells,
            stats.paint.painted,
            stats.paint.cached,
            stats.paint.border_segments,
        );
        stats
    }

    /// Walk a cached fragment in row-major order, patching valid cells and
    /// rebuilding invalid ones in place. Returns the rebuilt-cell count.
    fn revalidate_fragment(
        &mut self,
        fragment: &mut Fragment,
        frame: &FrameCache<'_>,
        source: &dyn CellSource,
        shaper: &dyn TextShaper,
        overlay: &dyn OverlayState,
    ) -> u32 {
        let mut rebuilt: u32 = 0;
        let rows: Vec<Vec<NodeId>> = fragment.rows.clone();

        for row_ids in &rows {
            for &id in row_ids {
                let check = check_cell(&mut fragment.graph, id, frame, overlay, &self.theme);
                match check.verdict {
                    Verdict::Valid => {
                        if let Some(node) = fragment.graph.get_mut(id) {
                            if node.cell.status.is_settled()
                                && node.cell.status != DrawStatus::SkipNotDrawn
                            {
                                node.cell.status = DrawStatus::SkipCached;
                            }
                            node.cell.last_validated_frame = frame.frame;
                        }
                    }
                    Verdict::BordersOnly => {
                        if let Some(node) = fragment.graph.get_mut(id) {
                            if node.cell.status.accepts_promotion()
                                && node.cell.status != DrawStatus::SkipNotDrawn
                            {
                                node.cell.status = DrawStatus::PendingBorderRedraw;
                            }
                            node.cell.last_validated_frame = frame.frame;
                        }
                    }
                    Verdict::Invalid => {
                        let mut builder = GridBuilder::new(
                            source,
                            shaper,
                            frame.layout,
                            &self.theme,
                            &mut self.text_cache,
                        );
                        builder.rebuild_cell(fragment, id);
                        record_overlay_flags(&mut fragment.graph, id, overlay, frame.frame);
                        recompute_transient(&mut fragment.graph, id, overlay, &self.theme);
                        propagate(&mut fragment.graph, id, &frame.flags);
                        rebuilt += 1;
                    }
                }
            }
        }

        resolve_requests(&mut fragment.graph, &frame.flags);
        rebuilt
    }

    /// Record overlay predicates and transient borders on every node of a
    /// freshly built fragment, so the next frame's comparisons start from
    /// truth.
    fn record_fragment_overlay(
        &mut self,
        graph: &mut CellGraph,
        overlay: &dyn OverlayState,
        frame: u64,
    ) {
        let ids: Vec<NodeId> = graph.ids().collect();
        for id in ids {
            record_overlay_flags(graph, id, overlay, frame);
            recompute_transient(graph, id, overlay, &self.theme);
        }
    }

    /// Paint the shadow bands under frozen-pane boundaries.
    fn paint_freeze_shadows(
        &mut self,
        surface: &mut dyn PaintSurface,
        layout: &GridLayout,
        viewport: &Viewport,
    ) {
        let scale = viewport.scale;
        if layout.frozen_rows > 0 {
            let band = Rect::new(
                0.0,
                layout.frozen_rows_height() * scale,
                viewport.width,
                FREEZE_SHADOW_WIDTH,
            );
            surface.fill_rect(&band, self.theme.color(StyleRole::FreezeShadow));
        }
        if layout.frozen_cols > 0 {
            let band = Rect::new(
                layout.frozen_cols_width() * scale,
                0.0,
                FREEZE_SHADOW_WIDTH,
                viewport.height,
            );
            surface.fill_rect(&band, self.theme.color(StyleRole::FreezeShadow));
        }
    }

    /// Paint row/column header strips, reusing the cached strip when the
    /// covered indices and highlight state are unchanged. Returns whether
    /// anything repainted.
    fn paint_headers(
        &mut self,
        surface: &mut dyn PaintSurface,
        shaper: &dyn TextShaper,
        overlay: &dyn OverlayState,
        layout: &GridLayout,
        viewport: &Viewport,
    ) -> bool {
        let mut repainted = false;

        let row_indices = visible_indices(
            layout.frozen_rows,
            viewport.visible_rows(layout),
            |row| layout.is_row_hidden(row),
        );
        let row_highlights: Vec<bool> = row_indices
            .iter()
            .map(|&row| overlay.is_row_header_highlighted(row))
            .collect();

        let reuse = self
            .cache
            .row_headers
            .as_ref()
            .is_some_and(|cached| cached.matches(&row_indices, &row_highlights));
        if !reuse {
            self.paint_row_headers(surface, shaper, layout, viewport, &row_indices, &row_highlights);
            self.cache.row_headers = Some(HeaderFragment {
                axis: HeaderAxis::Rows,
                indices: row_indices,
                highlighted: row_highlights,
            });
            repainted = true;
        }

        let col_indices = visible_indices(
            layout.frozen_cols,
            viewport.visible_cols(layout),
            |col| layout.is_col_hidden(col),
        );
        let col_highlights: Vec<bool> = col_indices
            .iter()
            .map(|&col| overlay.is_col_header_highlighted(col))
            .collect();

        let reuse = self
            .cache
            .col_headers
            .as_ref()
            .is_some_and(|cached| cached.matches(&col_indices, &col_highlights));
        if !reuse {
            self.paint_col_headers(surface, shaper, layout, viewport, &col_indices, &col_highlights);
            self.cache.col_headers = Some(HeaderFragment {
                axis: HeaderAxis::Columns,
                indices: col_indices,
                highlighted: col_highlights,
            });
            repainted = true;
        }

        repainted
    }

    fn paint_row_headers(
        &self,
        surface: &mut dyn PaintSurface,
        shaper: &dyn TextShaper,
        layout: &GridLayout,
        viewport: &Viewport,
        indices: &[u32],
        highlights: &[bool],
    ) {
        let config = &self.config.headers;
        let scale = viewport.scale;
        let label_style = Style::default();

        for (&row, &highlighted) in indices.iter().zip(highlights.iter()) {
            let y = layout
                .row_positions
                .get(row as usize)
                .copied()
                .unwrap_or(0.0);
            let (_, sy) = viewport.to_screen_frozen(0.0, y, row, 0, layout);
            let rect = Rect::new(
                0.0,
                sy,
                config.row_header_width,
                layout.row_height(row) * scale,
            );
            let bg = if highlighted {
                &config.highlighted_bg_color
            } else {
                &config.background_color
            };
            surface.fill_rect(&rect, bg);

            let label = (row + 1).to_string();
            let shaped = shaper.shape(
                &label,
                config.row_header_width,
                TextWrap::Clip,
                &label_style,
                0,
            );
            if let Some(line) = shaped.lines.first() {
                let paint = crate::paint::TextPaint {
                    color: config.text_color.clone(),
                    font_size: 10.0,
                    bold: false,
                    italic: false,
                    underline: false,
                    strikethrough: false,
                    font_family: None,
                    rotation: 0,
                };
                let x = (config.row_header_width - line.width) / 2.0;
                let ty = rect.y + (rect.height - line.height) / 2.0;
                surface.draw_text_line(line, x.max(0.0), ty.max(rect.y), &paint);
            }
        }
    }

    fn paint_col_headers(
        &self,
        surface: &mut dyn PaintSurface,
        shaper: &dyn TextShaper,
        layout: &GridLayout,
        viewport: &Viewport,
        indices: &[u32],
        highlights: &[bool],
    ) {
        let config = &self.config.headers;
        let scale = viewport.scale;
        let label_style = Style::default();

        for (&col, &highlighted) in indices.iter().zip(highlights.iter()) {
            let x = layout
                .col_positions
                .get(col as usize)
                .copied()
                .unwrap_or(0.0);
            let (sx, _) = viewport.to_screen_frozen(x, 0.0, 0, col, layout);
            let rect = Rect::new(
                sx,
                0.0,
                layout.col_width(col) * scale,
                config.col_header_height,
            );
            let bg = if highlighted {
                &config.highlighted_bg_color
            } else {
                &config.background_color
            };
            surface.fill_rect(&rect, bg);

            let label = col_to_letter(col);
            let shaped = shaper.shape(
                &label,
                rect.width,
                TextWrap::Clip,
                &label_style,
                0,
            );
            if let Some(line) = shaped.lines.first() {
                let paint = crate::paint::TextPaint {
                    color: config.text_color.clone(),
                    font_size: 10.0,
                    bold: false,
                    italic: false,
                    underline: false,
                    strikethrough: false,
                    font_family: None,
                    rotation: 0,
                };
                let tx = rect.x + (rect.width - line.width) / 2.0;
                let ty = (config.col_header_height - line.height) / 2.0;
                surface.draw_text_line(line, tx.max(rect.x), ty.max(0.0), &paint);
            }
        }
    }
}

/// Record the live overlay predicates on one node.
fn record_overlay_flags(
    graph: &mut CellGraph,
    id: NodeId,
    overlay: &dyn OverlayState,
    frame: u64,
) {
    let Some(node) = graph.get(id) else {
        return;
    };
    let row = node.source.row;
    let col = node.source.col;

    let selected = overlay.is_selected(row, col);
    let picked = overlay.is_picked(row, col);
    let header_highlighted = overlay.is_header_highlighted(row, col);
    let active = overlay.is_active_cell(row, col);
    let hovered = overlay.is_hovered(row, col);
    let group_hovered = overlay.is_group_hovered(row, col);
    let in_fill_region = overlay.in_fill_region(row, col);
    let move_highlighted = overlay.is_move_highlighted(row, col);
    let selected_count = overlay.selection_count(row, col);

    if let Some(node) = graph.get_mut(id) {
        node.cell.selected = selected;
        node.cell.picked = picked;
        node.cell.header_highlighted = header_highlighted;
        node.cell.active = active;
        node.cell.hovered = hovered;
        node.cell.group_hovered = group_hovered;
        node.cell.in_fill_region = in_fill_region;
        node.cell.move_highlighted = move_highlighted;
        node.cell.selected_count = selected_count;
        node.cell.last_validated_frame = frame;
    }
}

/// The half-open index range a region covers this frame.
fn region_range(region: GridRegion, layout: &GridLayout, viewport: &Viewport) -> CellRange {
    let (first_row, last_row) = viewport.visible_rows(layout);
    let (first_col, last_col) = viewport.visible_cols(layout);
    let body_rows = (
        first_row.max(layout.frozen_rows),
        last_row.saturating_add(1),
    );
    let body_cols = (
        first_col.max(layout.frozen_cols),
        last_col.saturating_add(1),
    );

    let range = match region {
        GridRegion::Body => CellRange::new(body_rows.0, body_cols.0, body_rows.1, body_cols.1),
        GridRegion::FrozenRows => {
            CellRange::new(0, body_cols.0, layout.frozen_rows, body_cols.1)
        }
        GridRegion::FrozenCols => {
            CellRange::new(body_rows.0, 0, body_rows.1, layout.frozen_cols)
        }
        GridRegion::FrozenCorner => CellRange::new(0, 0, layout.frozen_rows, layout.frozen_cols),
    };
    layout.clamp_range(range)
}

/// Visible header indices: the frozen band then the visible scrollable
/// band, hidden indices skipped.
fn visible_indices(
    frozen: u32,
    visible: (u32, u32),
    is_hidden: impl Fn(u32) -> bool,
) -> Vec<u32> {
    let mut indices = Vec::new();
    for index in 0..frozen {
        if !is_hidden(index) {
            indices.push(index);
        }
    }
    let (start, end) = visible;
    for index in start.max(frozen)..=end {
        if !is_hidden(index) {
            indices.push(index);
        }
    }
    indices
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
    use crate::layout::DEFAULT_ROW_HEIGHT;
    use crate::overlay::NoOverlay;
    use crate::paint::RecordingSurface;
    use crate::source::MemorySource;
    use crate::text::MonospaceShaper;

    fn small_world() -> (MemorySource, GridLayout, Viewport) {
        let mut source = MemorySource::new(9, 9);
        source.set_value(0, 0, "alpha");
        source.set_value(5, 5, "omega");
        let layout = GridLayout::from_source(&source, 0, 0);
        let mut viewport = Viewport::new();
        viewport.resize(800.0, 600.0);
        (source, layout, viewport)
    }

    fn renderer() -> GridRenderer {
        GridRenderer::new(GridConfig {
            synchronous: true,
            ..GridConfig::default()
        })
    }

    #[test]
    fn frame_scheduling_is_coarse() {
        let mut renderer = GridRenderer::new(GridConfig::default());
        assert!(!renderer.should_render());
        assert!(renderer.request_frame());
        assert!(!renderer.request_frame()); // already pending
        assert!(renderer.should_render());
        renderer.cancel_frame();
        assert!(!renderer.should_render());
    }

    #[test]
    fn first_frame_builds_then_second_reuses() {
        let (source, layout, viewport) = small_world();
        let mut renderer = renderer();
        let shaper = MonospaceShaper::default();
        let mut surface = RecordingSurface::new();

        let stats =
            renderer.render_frame(&mut surface, &source, &shaper, &NoOverlay, &layout, &viewport);
        assert_eq!(stats.built_fragments, 1);
        assert_eq!(stats.reused_fragments, 0);
        assert!(stats.paint.painted > 0);

        let mut surface = RecordingSurface::new();
        let stats =
            renderer.render_frame(&mut surface, &source, &shaper, &NoOverlay, &layout, &viewport);
        assert_eq!(stats.built_fragments, 0);
        assert_eq!(stats.reused_fragments, 1);
        assert_eq!(stats.paint.painted, 0);
        assert_eq!(stats.rebuilt_cells, 0);
    }

    #[test]
    fn scroll_discards_the_cache_wholesale() {
        let (source, layout, mut viewport) = small_world();
        let mut renderer = renderer();
        let shaper = MonospaceShaper::default();
        let mut surface = RecordingSurface::new();

        renderer.render_frame(&mut surface, &source, &shaper, &NoOverlay, &layout, &viewport);

        viewport.scroll_y = DEFAULT_ROW_HEIGHT;
        renderer.dirty_flags_mut().mark_scroll();
        let mut surface = RecordingSurface::new();
        let stats =
            renderer.render_frame(&mut surface, &source, &shaper, &NoOverlay, &layout, &viewport);

        assert_eq!(stats.built_fragments, 1);
        assert_eq!(stats.reused_fragments, 0);
        // Validity checking was bypassed wholesale: nothing was cache-hit.
        assert_eq!(stats.paint.cached, 0);
    }

    #[test]
    fn hit_testing_resolves_cells() {
        let (source, layout, viewport) = small_world();
        let mut renderer = renderer();
        let shaper = MonospaceShaper::default();
        let mut surface = RecordingSurface::new();
        renderer.render_frame(&mut surface, &source, &shaper, &NoOverlay, &layout, &viewport);

        assert_eq!(renderer.cell_at(5.0, 5.0), Some((0, 0)));
        let rect = layout.cell_rect(3, 2);
        assert_eq!(
            renderer.cell_at(rect.x + 1.0, rect.y + 1.0),
            Some((3, 2))
        );
        assert_eq!(renderer.cell_at(-5.0, -5.0), None);
    }

    #[test]
    fn headers_repaint_only_on_highlight_change() {
        let (source, layout, viewport) = small_world();
        let mut renderer = renderer();
        let shaper = MonospaceShaper::default();
        let mut surface = RecordingSurface::new();

        let stats =
            renderer.render_frame(&mut surface, &source, &shaper, &NoOverlay, &layout, &viewport);
        assert!(stats.headers_repainted);

        let stats = renderer.render_frame(
            &mut RecordingSurface::new(),
            &source,
            &shaper,
            &NoOverlay,
            &layout,
            &viewport,
        );
        assert!(!stats.headers_repainted);

        use crate::overlay::SelectionOverlay;
        use crate::types::Selection;
        let overlay = SelectionOverlay::select(Selection::row_range(2, 2));
        renderer.dirty_flags_mut().mark_selection();
        let stats = renderer.render_frame(
            &mut RecordingSurface::new(),
            &source,
            &shaper,
            &overlay,
            &layout,
            &viewport,
        );
        assert!(stats.headers_repainted);
    }
}
