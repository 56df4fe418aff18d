//! Per-cell drawing lifecycle for one frame.

use serde::Serialize;

/// Render lifecycle of a cell within the current frame.
///
/// Exactly one status holds at any time. `SkipNotDrawn` is sticky: once a
/// non-origin merged cell is marked, it never becomes paintable again this
/// frame, though its border descriptors are still recomputed for neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DrawStatus {
    /// Freshly built, nothing painted yet.
    #[default]
    Pending,
    /// Cache-invalidated; background, text and all four border sides repaint.
    PendingRedraw,
    /// Background painted; text deferred until all backgrounds in the row
    /// settle (overflowing text must not be clipped by a later background).
    PendingTextDraw,
    /// Only the border appearance changed; pixels inside the cell stay.
    PendingBorderRedraw,
    /// First paint completed.
    Drawn,
    /// Repaint after invalidation completed.
    Redrawn,
    /// Marked by a redrawn neighbor; promoted to `PendingRedraw` only when
    /// selection/fill/move overlays are what changed this frame.
    RequestRedrawn,
    /// Painted and border pass finished; nothing left to do.
    SkipDrawn,
    /// Cache hit; pixels untouched, still hit-testable.
    SkipCached,
    /// Non-origin cell of a merged region; never painted.
    SkipNotDrawn,
}

impl DrawStatus {
    /// Whether this status needs a background/text paint this frame.
    pub fn needs_paint(self) -> bool {
        matches!(
            self,
            Self::Pending | Self::PendingRedraw | Self::PendingTextDraw
        )
    }

    /// Whether this status needs the border pass this frame.
    pub fn needs_border_paint(self) -> bool {
        matches!(
            self,
            Self::Pending
                | Self::PendingRedraw
                | Self::PendingTextDraw
                | Self::PendingBorderRedraw
                | Self::Drawn
                | Self::Redrawn
        )
    }

    /// Whether the cell's pixels are settled (no repaint pending).
    pub fn is_settled(self) -> bool {
        matches!(self, Self::SkipDrawn | Self::SkipCached | Self::SkipNotDrawn)
    }

    /// Whether a neighbor-driven redraw request may touch this status.
    ///
    /// `SkipNotDrawn` never promotes; `PendingRedraw` is already stronger.
    pub fn accepts_promotion(self) -> bool {
        !matches!(self, Self::SkipNotDrawn | Self::PendingRedraw)
    }

    /// Status after a successful background/text paint.
    pub fn after_paint(self) -> Self {
        match self {
            Self::PendingRedraw => Self::Redrawn,
            _ => Self::Drawn,
        }
    }
}
