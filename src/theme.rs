//! Theme palette with tagged style roles.
//!
//! Overlay and chrome colors are resolved once when the theme loads, through
//! a role → color lookup table, never per cell per frame.

use crate::error::{GridError, Result};

/// Every color role the engine paints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleRole {
    /// Selection rectangle border.
    SelectionBorder,
    /// Selection interior tint.
    SelectionFill,
    /// Fill-handle drag region border.
    FillBorder,
    /// Move (drag-to-relocate) region border.
    MoveBorder,
    /// Format-picker preview border.
    PickBorder,
    /// Automatic table framing border.
    TableBorder,
    /// Default grid line between cells.
    GridLine,
    /// Active (focused) cell outline.
    ActiveOutline,
    /// Hovered-cell tint.
    HoverFill,
    /// Shadow band under a frozen-pane boundary.
    FreezeShadow,
    /// Default cell background.
    CellBackground,
    /// Default cell text.
    CellText,
}

impl StyleRole {
    const ALL: [StyleRole; 12] = [
        Self::SelectionBorder,
        Self::SelectionFill,
        Self::FillBorder,
        Self::MoveBorder,
        Self::PickBorder,
        Self::TableBorder,
        Self::GridLine,
        Self::ActiveOutline,
        Self::HoverFill,
        Self::FreezeShadow,
        Self::CellBackground,
        Self::CellText,
    ];

    fn index(self) -> usize {
        match self {
            Self::SelectionBorder => 0,
            Self::SelectionFill => 1,
            Self::FillBorder => 2,
            Self::MoveBorder => 3,
            Self::PickBorder => 4,
            Self::TableBorder => 5,
            Self::GridLine => 6,
            Self::ActiveOutline => 7,
            Self::HoverFill => 8,
            Self::FreezeShadow => 9,
            Self::CellBackground => 10,
            Self::CellText => 11,
        }
    }
}

/// Resolved theme palette. Construction validates every entry, so lookups
/// during a frame are infallible array reads.
#[derive(Debug, Clone)]
pub struct Theme {
    colors: Vec<String>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut colors = vec![String::new(); StyleRole::ALL.len()];
        for (role, color) in DEFAULT_PALETTE {
            if let Some(slot) = colors.get_mut(role.index()) {
                *slot = (*color).to_string();
            }
        }
        Self { colors }
    }
}

impl Theme {
    /// Build a theme from `(role, color)` overrides on top of the default
    /// palette.
    ///
    /// # Errors
    /// Returns an error if any color string is empty or not a recognizable
    /// CSS color form (`#RGB`, `#RRGGBB`, `#RRGGBBAA`, `rgb(...)`,
    /// `rgba(...)`).
    pub fn with_overrides(overrides: &[(StyleRole, &str)]) -> Result<Self> {
        let mut theme = Self::default();
        for (role, color) in overrides {
            if !is_css_color(color) {
                return Err(GridError::Theme(format!(
                    "invalid color {color:?} for role {role:?}"
                )));
            }
            if let Some(slot) = theme.colors.get_mut(role.index()) {
                *slot = (*color).to_string();
            }
        }
        Ok(theme)
    }

    /// Look up the color for a role.
    pub fn color(&self, role: StyleRole) -> &str {
        self.colors
            .get(role.index())
            .map_or(FALLBACK_COLOR, String::as_str)
    }
}

const FALLBACK_COLOR: &str = "#000000";

const DEFAULT_PALETTE: &[(StyleRole, &str)] = &[
    (StyleRole::SelectionBorder, "#1A73E8"),
    (StyleRole::SelectionFill, "rgba(26,115,232,0.10)"),
    (StyleRole::FillBorder, "#1A73E8"),
    (StyleRole::MoveBorder, "#34A853"),
    (StyleRole::PickBorder, "#F29900"),
    (StyleRole::TableBorder, "#B0B0B0"),
    (StyleRole::GridLine, "#E2E2E2"),
    (StyleRole::ActiveOutline, "#1A73E8"),
    (StyleRole::HoverFill, "rgba(0,0,0,0.04)"),
    (StyleRole::FreezeShadow, "rgba(0,0,0,0.18)"),
    (StyleRole::CellBackground, "#FFFFFF"),
    (StyleRole::CellText, "#1F1F1F"),
];

fn is_css_color(s: &str) -> bool {
    if let Some(hex) = s.strip_prefix('#') {
        return matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    (s.starts_with("rgb(") || s.starts_with("rgba(")) && s.ends_with(')')
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_covers_every_role() {
        let theme = Theme::default();
        for role in StyleRole::ALL {
            assert!(!theme.color(role).is_empty(), "missing color for {role:?}");
        }
    }

    #[test]
    fn overrides_replace_defaults() {
        let theme = Theme::with_overrides(&[(StyleRole::SelectionBorder, "#FF0000")]).unwrap();
        assert_eq!(theme.color(StyleRole::SelectionBorder), "#FF0000");
        assert_eq!(
            theme.color(StyleRole::MoveBorder),
            Theme::default().color(StyleRole::MoveBorder)
        );
    }

    #[test]
    fn invalid_color_rejected() {
        assert!(Theme::with_overrides(&[(StyleRole::GridLine, "blue-ish")]).is_err());
        assert!(Theme::with_overrides(&[(StyleRole::GridLine, "#12345")]).is_err());
    }
}
