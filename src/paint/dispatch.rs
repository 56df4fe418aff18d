//! Frame draw dispatch.
//!
//! Walks finalized cell-graph fragments once per frame and paints in a fixed
//! layering order: row backgrounds, then that row's deferred (overflowing)
//! text, then custom borders, then transient overlay borders. The layering
//! guarantees overflowing text is never clipped by a neighbor's later
//! background, and overlay borders always sit atop custom ones.
//!
//! Cell rects are cached in sheet coordinates; the frozen-pane-aware screen
//! transform is applied here, at draw time.

use serde::Serialize;

use crate::borders::{edge_segment, resolve_edge, Edge, EdgeStyle};
use crate::cache::Fragment;
use crate::frame::FrameCache;
use crate::graph::{DrawStatus, NodeId};
use crate::theme::{StyleRole, Theme};
use crate::types::{HAlign, Rect, Style, VAlign};

use super::surface::{PaintSurface, TextPaint};

/// Horizontal text inset within a cell, in logical pixels. Matches the
/// builder's overflow math.
const TEXT_H_PADDING: f32 = 3.0;
/// Vertical text inset within a cell.
const TEXT_V_PADDING: f32 = 2.0;

/// A cell confirmed painted or cache-hit this frame, for pointer-to-cell
/// resolution, hover and hyperlink lookups. The rect is in sheet
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleCell {
    pub row: u32,
    pub col: u32,
    pub rect: Rect,
}

/// Paint counters for one fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintStats {
    /// Cells whose background/text painted this frame.
    pub painted: u32,
    /// Cells reused from cache with pixels untouched.
    pub cached: u32,
    /// Border segments stroked.
    pub border_segments: u32,
    /// Cells whose text paint was deferred behind the row's backgrounds.
    pub deferred_text: u32,
}

impl PaintStats {
    pub fn accumulate(&mut self, other: PaintStats) {
        self.painted += other.painted;
        self.cached += other.cached;
        self.border_segments += other.border_segments;
        self.deferred_text += other.deferred_text;
    }
}

/// Sheet-space rect of a node mapped to screen space through the
/// frozen-pane-aware viewport transform.
fn screen_rect(frame: &FrameCache<'_>, rect: &Rect, row: u32, col: u32) -> Rect {
    let scale = frame.viewport.scale;
    let (x, y) = frame
        .viewport
        .to_screen_frozen(rect.x, rect.y, row, col, frame.layout);
    Rect::new(x, y, rect.width * scale, rect.height * scale)
}

/// Paint one fragment and advance its cells' statuses.
///
/// Visible cells (painted or cache-hit, excluding merged non-origin cells
/// and overflow placeholders) are appended to `visible`.
pub fn paint_fragment(
    surface: &mut dyn PaintSurface,
    fragment: &mut Fragment,
    frame: &FrameCache<'_>,
    theme: &Theme,
    visible: &mut Vec<VisibleCell>,
) -> PaintStats {
    let mut stats = PaintStats::default();

    // Background + text, row by row. Deferred (overflowing) text paints
    // after the whole row's backgrounds are settled.
    let rows: Vec<Vec<NodeId>> = fragment.rows.clone();
    for row_ids in &rows {
        let mut deferred: Vec<(NodeId, bool)> = Vec::new();

        for &id in row_ids {
            let Some(node) = fragment.graph.get(id) else {
                continue;
            };
            let status = node.cell.status;
            let placeholder = node.cell.is_overflow_placeholder();

            if !placeholder && status != DrawStatus::SkipNotDrawn {
                visible.push(VisibleCell {
                    row: node.source.row,
                    col: node.source.col,
                    rect: node.cell.rect,
                });
            }

            match status {
                DrawStatus::Pending | DrawStatus::PendingRedraw => {
                    let was_redraw = status == DrawStatus::PendingRedraw;
                    paint_background(surface, fragment, id, frame, theme);
                    stats.painted += 1;

                    let Some(node) = fragment.graph.get_mut(id) else {
                        continue;
                    };
                    if node.cell.text.is_none() || placeholder {
                        node.cell.status = status.after_paint();
                    } else if node.cell.subsumes_neighbors() {
                        node.cell.status = DrawStatus::PendingTextDraw;
                        deferred.push((id, was_redraw));
                        stats.deferred_text += 1;
                    } else {
                        paint_text(surface, fragment, id, frame, theme, true);
                        if let Some(node) = fragment.graph.get_mut(id) {
                            node.cell.status = status.after_paint();
                        }
                    }
                }
                DrawStatus::PendingTextDraw => {
                    // Background already painted in an earlier pass.
                    deferred.push((id, false));
                    stats.deferred_text += 1;
                }
                DrawStatus::SkipCached | DrawStatus::SkipDrawn | DrawStatus::RequestRedrawn => {
                    stats.cached += 1;
                }
                DrawStatus::PendingBorderRedraw
                | DrawStatus::Drawn
                | DrawStatus::Redrawn
                | DrawStatus::SkipNotDrawn => {}
            }
        }

        // Deferred text: all backgrounds in this row are settled now, so
        // overflowing text can bleed across neighbors without being
        // overpainted.
        for (id, was_redraw) in deferred {
            paint_text(surface, fragment, id, frame, theme, false);
            if let Some(node) = fragment.graph.get_mut(id) {
                node.cell.status = if was_redraw {
                    DrawStatus::Redrawn
                } else {
                    DrawStatus::Drawn
                };
            }
        }
    }

    // Border pass: custom borders first, transient overlay borders second,
    // so overlay borders sit visually atop custom ones.
    let ids: Vec<NodeId> = fragment.graph.ids().collect();

    for &id in &ids {
        let Some(node) = fragment.graph.get(id) else {
            continue;
        };
        if !node.cell.status.needs_border_paint() {
            continue;
        }
        // A redraw repaints all four sides because the full repaint erased
        // neighbor-owned thick/double pixels; a first paint owns only its
        // top/left edges.
        let edges: &[Edge] = match node.cell.status {
            DrawStatus::Redrawn | DrawStatus::PendingBorderRedraw => &Edge::ALL,
            _ => &[Edge::Top, Edge::Left],
        };
        let rect = screen_rect(frame, &node.cell.rect, node.source.row, node.source.col);

        for &edge in edges {
            let segment = edge_segment(&rect, edge);
            if let Some(border) = resolve_edge(&fragment.graph, id, edge) {
                surface.stroke_border(&segment, border.style, &border.color);
                stats.border_segments += 1;
            } else if !crate::borders::is_subsumed_edge(&fragment.graph, id, edge) {
                // No descriptor on either side: default grid hairline.
                surface.stroke_border(&segment, EdgeStyle::Thin, theme.color(StyleRole::GridLine));
                stats.border_segments += 1;
            }
        }
    }

    for &id in &ids {
        let Some(node) = fragment.graph.get(id) else {
            continue;
        };
        if !node.cell.status.needs_border_paint() {
            continue;
        }
        let rect = screen_rect(frame, &node.cell.rect, node.source.row, node.source.col);
        let mut strokes: Vec<(Edge, EdgeStyle, String)> = Vec::new();
        for edge in Edge::ALL {
            if let Some(border) = node.cell.borders.get(edge) {
                if !border.is_hidden {
                    strokes.push((edge, border.style, border.color.clone()));
                }
            }
        }
        for (edge, style, color) in strokes {
            let segment = edge_segment(&rect, edge);
            surface.stroke_border(&segment, style, &color);
            stats.border_segments += 1;
        }

        if let Some(node) = fragment.graph.get_mut(id) {
            node.cell.status = match node.cell.status {
                DrawStatus::Drawn | DrawStatus::Redrawn | DrawStatus::PendingBorderRedraw => {
                    DrawStatus::SkipDrawn
                }
                other => other,
            };
        }
    }

    stats
}

/// Paint a cell's background plus overlay tints.
fn paint_background(
    surface: &mut dyn PaintSurface,
    fragment: &Fragment,
    id: NodeId,
    frame: &FrameCache<'_>,
    theme: &Theme,
) {
    let Some(node) = fragment.graph.get(id) else {
        return;
    };
    let rect = screen_rect(frame, &node.cell.rect, node.source.row, node.source.col);

    let bg = node
        .source
        .data
        .style
        .bg_color
        .clone()
        .unwrap_or_else(|| theme.color(StyleRole::CellBackground).to_string());
    surface.fill_rect(&rect, &bg);

    if node.cell.selected_count > 0 || node.cell.selected {
        surface.fill_rect(&rect, theme.color(StyleRole::SelectionFill));
    }
    if node.cell.hovered {
        surface.fill_rect(&rect, theme.color(StyleRole::HoverFill));
    }
}

/// Paint a cell's text lines. Clipped to the cell rect unless the text
/// legitimately bleeds into subsumed neighbors.
fn paint_text(
    surface: &mut dyn PaintSurface,
    fragment: &Fragment,
    id: NodeId,
    frame: &FrameCache<'_>,
    theme: &Theme,
    clip: bool,
) {
    let Some(node) = fragment.graph.get(id) else {
        return;
    };
    let Some(text) = node.cell.text.as_ref() else {
        return;
    };
    if text.lines.is_empty() {
        return;
    }
    let rect = screen_rect(frame, &node.cell.rect, node.source.row, node.source.col);
    let scale = frame.viewport.scale;
    let style = &node.source.data.style;
    let paint = text_paint(style, theme);

    let text_height = text.height * scale;
    let start_y = match style.align_v.unwrap_or(VAlign::Bottom) {
        VAlign::Top => rect.y + TEXT_V_PADDING * scale,
        VAlign::Center => rect.y + ((rect.height - text_height) / 2.0).max(0.0),
        VAlign::Bottom => rect.y + (rect.height - text_height - TEXT_V_PADDING * scale).max(0.0),
    };

    if clip {
        surface.push_clip(&rect);
    }
    let mut y = start_y;
    for line in &text.lines {
        let line_width = line.width * scale;
        let x = match style.h_align() {
            HAlign::General | HAlign::Left | HAlign::Justify => rect.x + TEXT_H_PADDING * scale,
            HAlign::Right => rect.right() - TEXT_H_PADDING * scale - line_width,
            HAlign::Center => rect.x + (rect.width - line_width) / 2.0,
        };
        surface.draw_text_line(line, x, y, &paint);
        y += line.height * scale;
    }
    if clip {
        surface.pop_clip();
    }
}

fn text_paint(style: &Style, theme: &Theme) -> TextPaint {
    TextPaint {
        color: style
            .font_color
            .clone()
            .unwrap_or_else(|| theme.color(StyleRole::CellText).to_string()),
        font_size: style.font_size.unwrap_or(11.0),
        bold: style.bold == Some(true),
        italic: style.italic == Some(true),
        underline: style.underline == Some(true),
        strikethrough: style.strikethrough == Some(true),
        font_family: style.font_family.clone(),
        rotation: style.rotation.unwrap_or(0),
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
    use crate::builder::GridBuilder;
    use crate::cache::{TextLayoutCache, TEXT_CACHE_CAPACITY};
    use crate::frame::DirtyFlags;
    use crate::layout::{GridLayout, Viewport};
    use crate::overlay::NoOverlay;
    use crate::paint::{PaintOp, RecordingSurface};
    use crate::source::MemorySource;
    use crate::text::MonospaceShaper;
    use crate::types::CellRange;

    fn build_small_fragment(source: &MemorySource) -> (Fragment, GridLayout, Theme) {
        let layout = GridLayout::from_source(source, 0, 0);
        let theme = Theme::default();
        let mut text_cache: TextLayoutCache = TextLayoutCache::new(TEXT_CACHE_CAPACITY);
        let shaper = MonospaceShaper::default();
        let mut builder = GridBuilder::new(source, &shaper, &layout, &theme, &mut text_cache);
        let fragment = builder.build_fragment(CellRange::new(0, 0, 3, 3));
        (fragment, layout, theme)
    }

    #[test]
    fn first_frame_paints_every_cell_once() {
        let mut source = MemorySource::new(2, 2);
        source.set_value(0, 0, "a");
        source.set_value(1, 1, "b");
        let (mut fragment, layout, theme) = build_small_fragment(&source);
        let viewport = Viewport::new();
        let frame = FrameCache::build(1, DirtyFlags::default(), &layout, &viewport, &NoOverlay);

        let mut surface = RecordingSurface::new();
        let mut visible = Vec::new();
        let stats = paint_fragment(&mut surface, &mut fragment, &frame, &theme, &mut visible);

        assert_eq!(stats.painted, 9);
        assert_eq!(stats.cached, 0);
        assert_eq!(visible.len(), 9);
        assert_eq!(surface.text_count(), 2);

        // Every cell ended Drawn -> SkipDrawn after the border pass.
        for id in fragment.graph.ids().collect::<Vec<_>>() {
            assert_eq!(
                fragment.graph.get(id).unwrap().cell.status,
                DrawStatus::SkipDrawn
            );
        }
    }

    #[test]
    fn cached_cells_paint_nothing() {
        let mut source = MemorySource::new(2, 2);
        source.set_value(0, 0, "a");
        let (mut fragment, layout, theme) = build_small_fragment(&source);
        let viewport = Viewport::new();
        let frame = FrameCache::build(1, DirtyFlags::default(), &layout, &viewport, &NoOverlay);

        let mut surface = RecordingSurface::new();
        let mut visible = Vec::new();
        paint_fragment(&mut surface, &mut fragment, &frame, &theme, &mut visible);

        // Second dispatch with everything settled: zero ops.
        let mut surface = RecordingSurface::new();
        let mut visible = Vec::new();
        let stats = paint_fragment(&mut surface, &mut fragment, &frame, &theme, &mut visible);
        assert_eq!(stats.painted, 0);
        assert_eq!(stats.cached, 9);
        assert!(surface.ops.is_empty());
        // Still hit-testable.
        assert_eq!(visible.len(), 9);
    }

    #[test]
    fn overflowing_text_defers_behind_row_backgrounds() {
        let mut source = MemorySource::new(1, 5);
        source.set_value(0, 0, "a very long overflowing value");
        let (mut fragment, layout, theme) = build_small_fragment(&source);
        let viewport = Viewport::new();
        let frame = FrameCache::build(1, DirtyFlags::default(), &layout, &viewport, &NoOverlay);

        let mut surface = RecordingSurface::new();
        let mut visible = Vec::new();
        let stats = paint_fragment(&mut surface, &mut fragment, &frame, &theme, &mut visible);
        assert_eq!(stats.deferred_text, 1);

        // The text op must come after every background fill of its own row
        // (row 0 rects have y == 0).
        let last_row0_fill = surface
            .ops
            .iter()
            .rposition(|op| matches!(op, PaintOp::FillRect { rect, .. } if rect.y == 0.0))
            .unwrap();
        let text_pos = surface
            .ops
            .iter()
            .position(|op| matches!(op, PaintOp::Text { .. }))
            .unwrap();
        assert!(text_pos > last_row0_fill);
    }

    #[test]
    fn custom_borders_stroke_before_transient() {
        use crate::borders::CellBorder;
        let mut source = MemorySource::new(1, 1);
        source.set_value(0, 0, "x");
        let (mut fragment, layout, theme) = build_small_fragment(&source);
        let viewport = Viewport::new();
        let frame = FrameCache::build(1, DirtyFlags::default(), &layout, &viewport, &NoOverlay);

        // Hand a cell both a custom border and a transient selection border.
        let id = fragment.node_at(0, 0).unwrap();
        let node = fragment.graph.get_mut(id).unwrap();
        node.cell.custom_borders.top = Some(CellBorder::user(EdgeStyle::Thick, "#000000"));
        node.cell.borders.top = Some(CellBorder {
            style: EdgeStyle::Selection,
            is_hidden: false,
            color: "#1A73E8".to_string(),
            kind: crate::borders::BorderKind::Preview,
        });

        let mut surface = RecordingSurface::new();
        let mut visible = Vec::new();
        paint_fragment(&mut surface, &mut fragment, &frame, &theme, &mut visible);

        let thick_pos = surface
            .ops
            .iter()
            .position(|op| {
                matches!(
                    op,
                    PaintOp::StrokeBorder {
                        style: EdgeStyle::Thick,
                        ..
                    }
                )
            })
            .unwrap();
        let selection_pos = surface
            .ops
            .iter()
            .position(|op| {
                matches!(
                    op,
                    PaintOp::StrokeBorder {
                        style: EdgeStyle::Selection,
                        ..
                    }
                )
            })
            .unwrap();
        assert!(thick_pos < selection_pos);
    }
}
