use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Deref;
use std::sync::Arc;

/// Resolved cell style, as supplied by the data source.
///
/// Colors are CSS color strings (`#RRGGBB` or `rgba(...)`) resolved by the
/// host before they reach the engine.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    // Font
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,

    // Fill
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,

    // Persistent (user- or table-derived) borders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_top: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_right: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_left: Option<Border>,

    // Alignment and text layout inputs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_h: Option<HAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_v: Option<VAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<TextWrap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<u32>,
    /// Text rotation in degrees, -90..=90. Rotated cells never overflow into
    /// neighbors unless their horizontal alignment can use the space.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<i32>,
}

impl Style {
    /// Effective wrap mode (`Overflow` when unset, matching spreadsheet
    /// default behavior).
    pub fn wrap_mode(&self) -> TextWrap {
        self.wrap.unwrap_or(TextWrap::Overflow)
    }

    /// Effective horizontal alignment (`General` when unset).
    pub fn h_align(&self) -> HAlign {
        self.align_h.unwrap_or(HAlign::General)
    }
}

/// Shared, immutable style handle. Cells holding the same style share one
/// allocation.
#[derive(Debug, Clone)]
pub struct StyleRef(pub Arc<Style>);

impl StyleRef {
    pub fn new(style: Style) -> Self {
        Self(Arc::new(style))
    }
}

impl Default for StyleRef {
    fn default() -> Self {
        Self(Arc::new(Style::default()))
    }
}

impl Deref for StyleRef {
    type Target = Style;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for StyleRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Serialize for StyleRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StyleRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let style = Style::deserialize(deserializer)?;
        Ok(Self(Arc::new(style)))
    }
}

/// A persistent border side as stored on a style.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Border {
    pub style: BorderStyle,
    pub color: String,
}

/// Line styles for persistent borders.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
}

impl BorderStyle {
    /// Stroke width in logical pixels.
    pub fn width(&self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Thin | Self::Hair | Self::Dashed | Self::Dotted => 1.0,
            Self::Medium => 2.0,
            Self::Thick | Self::Double => 3.0,
        }
    }
}

/// Horizontal alignment.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HAlign {
    General,
    Left,
    Center,
    Right,
    Justify,
}

/// Vertical alignment.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// How cell text behaves when wider than its cell.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TextWrap {
    /// Bleed into neighboring empty cells (spreadsheet default).
    #[default]
    Overflow,
    /// Break into multiple lines within the cell width.
    Wrap,
    /// Clip at the cell edge.
    Clip,
}

/// A merged-cell range in logical indices (inclusive ends, as supplied by
/// data sources).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MergeRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl MergeRange {
    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.start_row && row <= self.end_row && col >= self.start_col && col <= self.end_col
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn wrap_defaults_to_overflow() {
        let style = Style::default();
        assert_eq!(style.wrap_mode(), TextWrap::Overflow);
    }

    #[test]
    fn style_ref_shares_allocation() {
        let a = StyleRef::new(Style {
            bold: Some(true),
            ..Style::default()
        });
        let b = a.clone();
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a.0, &b.0));
    }

    #[test]
    fn border_widths() {
        assert_eq!(BorderStyle::Thin.width(), 1.0);
        assert_eq!(BorderStyle::Medium.width(), 2.0);
        assert_eq!(BorderStyle::Thick.width(), 3.0);
        assert_eq!(BorderStyle::Double.width(), 3.0);
    }

    #[test]
    fn style_serializes_camel_case() {
        let style = Style {
            font_color: Some("#112233".to_string()),
            wrap: Some(TextWrap::Wrap),
            ..Style::default()
        };
        let json = serde_json::to_value(&style).unwrap();
        assert_eq!(json["fontColor"], "#112233");
        assert_eq!(json["wrap"], "wrap");
    }
}
