//! The text-shaping collaborator.
//!
//! Shaping and line wrapping are external: a [`TextShaper`] is a pure
//! function from (string, available width, wrap mode, style, rotation) to
//! laid-out lines. The engine only decides *when* a cached layout must be
//! thrown away, never how text is measured.

use serde::Serialize;

use crate::types::{Style, TextWrap};

/// One laid-out line of cell text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapedLine {
    pub text: String,
    /// Line advance width in pixels.
    pub width: f32,
    /// Line height in pixels.
    pub height: f32,
    /// Optional per-run style spans (byte offsets into `text`).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<StyleSpan>,
}

/// A styled run within a shaped line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSpan {
    pub start: usize,
    pub end: usize,
    pub bold: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Immutable shaped-text result for one cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapedText {
    pub lines: Vec<ShapedLine>,
    /// Widest line in pixels.
    pub width: f32,
    /// Total height in pixels.
    pub height: f32,
    /// Rotation in degrees carried through from the style.
    pub rotation: i32,
}

impl ShapedText {
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            width: 0.0,
            height: 0.0,
            rotation: 0,
        }
    }

    /// Whether the shaped text is wider than the given cell width.
    pub fn overflows(&self, cell_width: f32) -> bool {
        self.width > cell_width
    }
}

/// Pure text shaping function.
pub trait TextShaper {
    /// Lay out `text` within `available_width` pixels.
    ///
    /// `available_width` only constrains line breaking under
    /// [`TextWrap::Wrap`]; overflow and clip modes shape a single unbroken
    /// line and leave the clipping decision to the renderer.
    fn shape(
        &self,
        text: &str,
        available_width: f32,
        wrap: TextWrap,
        style: &Style,
        rotation: i32,
    ) -> ShapedText;
}

/// Deterministic fixed-advance shaper used by tests, benches and headless
/// hosts. Every character advances `char_width` pixels.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceShaper {
    pub char_width: f32,
    pub line_height: f32,
}

impl Default for MonospaceShaper {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            line_height: 14.0,
        }
    }
}

impl TextShaper for MonospaceShaper {
    fn shape(
        &self,
        text: &str,
        available_width: f32,
        wrap: TextWrap,
        style: &Style,
        rotation: i32,
    ) -> ShapedText {
        let char_width = if style.bold == Some(true) {
            self.char_width * 1.1
        } else {
            self.char_width
        };

        if text.is_empty() {
            return ShapedText::empty();
        }

        let lines: Vec<ShapedLine> = match wrap {
            TextWrap::Wrap => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let per_line = (available_width / char_width).floor().max(1.0) as usize;
                text.chars()
                    .collect::<Vec<_>>()
                    .chunks(per_line)
                    .map(|chunk| {
                        let line: String = chunk.iter().collect();
                        ShapedLine {
                            width: chunk.len() as f32 * char_width,
                            height: self.line_height,
                            text: line,
                            spans: Vec::new(),
                        }
                    })
                    .collect()
            }
            TextWrap::Overflow | TextWrap::Clip => vec![ShapedLine {
                width: text.chars().count() as f32 * char_width,
                height: self.line_height,
                text: text.to_string(),
                spans: Vec::new(),
            }],
        };

        let width = lines.iter().map(|l| l.width).fold(0.0, f32::max);
        let height = lines.iter().map(|l| l.height).sum();
        ShapedText {
            lines,
            width,
            height,
            rotation,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::cast_precision_loss
)]
mod tests {
    use super::*;

    #[test]
    fn overflow_mode_single_line() {
        let shaper = MonospaceShaper::default();
        let shaped = shaper.shape(
            "hello world",
            20.0,
            TextWrap::Overflow,
            &Style::default(),
            0,
        );
        assert_eq!(shaped.lines.len(), 1);
        assert!(shaped.overflows(20.0));
    }

    #[test]
    fn wrap_mode_breaks_lines() {
        let shaper = MonospaceShaper {
            char_width: 10.0,
            line_height: 14.0,
        };
        let shaped = shaper.shape("abcdefghij", 30.0, TextWrap::Wrap, &Style::default(), 0);
        // 3 chars per line -> 4 lines
        assert_eq!(shaped.lines.len(), 4);
        assert_eq!(shaped.lines[0].text, "abc");
        assert!(!shaped.overflows(30.0));
        assert_eq!(shaped.height, 14.0 * 4.0);
    }

    #[test]
    fn empty_text_shapes_empty() {
        let shaper = MonospaceShaper::default();
        let shaped = shaper.shape("", 100.0, TextWrap::Overflow, &Style::default(), 0);
        assert!(shaped.lines.is_empty());
        assert_eq!(shaped.width, 0.0);
    }
}
