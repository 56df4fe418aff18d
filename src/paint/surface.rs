//! Paint surface abstraction for pluggable raster backends.
//!
//! The engine decides *what* to paint; a [`PaintSurface`] implementation
//! (Canvas 2D, wgpu, a test recorder) owns the pixels. There is exactly one
//! surface per grid and any cell's repaint may touch pixels a neighbor
//! painted earlier — the redraw propagator exists to repair that.

use crate::borders::{BorderSegment, EdgeStyle};
use crate::text::ShapedLine;
use crate::types::Rect;

/// Font and color attributes for one text line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPaint {
    pub color: String,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub font_family: Option<String>,
    /// Rotation in degrees around the line origin.
    pub rotation: i32,
}

/// Drawing operations the engine issues, in paint order.
///
/// Implementations must apply operations immediately and in order; the
/// engine relies on later fills legitimately covering earlier ones.
pub trait PaintSurface {
    /// Fill a rectangle with a CSS color.
    fn fill_rect(&mut self, rect: &Rect, color: &str);

    /// Stroke one border edge segment.
    fn stroke_border(&mut self, segment: &BorderSegment, style: EdgeStyle, color: &str);

    /// Draw one laid-out text line with its top-left at (x, y).
    fn draw_text_line(&mut self, line: &ShapedLine, x: f32, y: f32, paint: &TextPaint);

    /// Push a clip rectangle; subsequent operations are clipped to it.
    fn push_clip(&mut self, rect: &Rect);

    /// Pop the most recent clip rectangle.
    fn pop_clip(&mut self);
}
