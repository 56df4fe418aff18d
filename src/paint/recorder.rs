//! A recording surface for headless rendering and tests.

use crate::borders::{BorderSegment, EdgeStyle};
use crate::text::ShapedLine;
use crate::types::Rect;

use super::surface::{PaintSurface, TextPaint};

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    FillRect {
        rect: Rect,
        color: String,
    },
    StrokeBorder {
        segment: BorderSegment,
        style: EdgeStyle,
        width: f64,
        color: String,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        color: String,
    },
    PushClip(Rect),
    PopClip,
}

/// A [`PaintSurface`] that records operations instead of rasterizing.
///
/// Tests assert on the recorded op stream; byte-identical streams across
/// two no-op frames demonstrate idempotent caching.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<PaintOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Count of recorded background fills.
    pub fn fill_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PaintOp::FillRect { .. }))
            .count()
    }

    /// Count of recorded border strokes.
    pub fn border_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PaintOp::StrokeBorder { .. }))
            .count()
    }

    /// Count of recorded text lines.
    pub fn text_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PaintOp::Text { .. }))
            .count()
    }

    /// All fills covering a given rect (background history of one cell).
    pub fn fills_at(&self, rect: &Rect) -> Vec<&PaintOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, PaintOp::FillRect { rect: r, .. } if r == rect))
            .collect()
    }
}

impl PaintSurface for RecordingSurface {
    fn fill_rect(&mut self, rect: &Rect, color: &str) {
        self.ops.push(PaintOp::FillRect {
            rect: *rect,
            color: color.to_string(),
        });
    }

    fn stroke_border(&mut self, segment: &BorderSegment, style: EdgeStyle, color: &str) {
        self.ops.push(PaintOp::StrokeBorder {
            segment: *segment,
            style,
            width: style.width(),
            color: color.to_string(),
        });
    }

    fn draw_text_line(&mut self, line: &ShapedLine, x: f32, y: f32, paint: &TextPaint) {
        self.ops.push(PaintOp::Text {
            text: line.text.clone(),
            x,
            y,
            color: paint.color.clone(),
        });
    }

    fn push_clip(&mut self, rect: &Rect) {
        self.ops.push(PaintOp::PushClip(*rect));
    }

    fn pop_clip(&mut self) {
        self.ops.push(PaintOp::PopClip);
    }
}
