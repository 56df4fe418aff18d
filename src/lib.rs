//! gridview - incremental cell-grid rendering engine
//!
//! Renders a large, scrollable, cell-based grid onto a raster surface at
//! interactive frame rates, redrawing only what changed between frames:
//! - Per-cell drawing-status state machine and arena-backed cell graph
//! - Frame-scoped dirty flags and cache-validity checking
//! - Border-priority compositing across shared edges
//! - Text overflow into neighboring empty cells, merged cells, frozen panes
//!
//! The tabular data source, text shaping, overlay business logic and the
//! raster surface itself are collaborators behind traits; the engine owns
//! only the decisions about what to (re)draw.
//!
//! # Usage
//!
//! ```
//! use gridview::engine::{GridConfig, GridRenderer};
//! use gridview::layout::{GridLayout, Viewport};
//! use gridview::overlay::NoOverlay;
//! use gridview::paint::RecordingSurface;
//! use gridview::source::MemorySource;
//! use gridview::text::MonospaceShaper;
//!
//! let mut source = MemorySource::new(99, 25);
//! source.set_value(0, 0, "hello");
//! let layout = GridLayout::from_source(&source, 0, 0);
//! let viewport = Viewport::new();
//!
//! let mut renderer = GridRenderer::new(GridConfig {
//!     synchronous: true,
//!     ..GridConfig::default()
//! });
//! let mut surface = RecordingSurface::new();
//! let stats = renderer.render_frame(
//!     &mut surface,
//!     &source,
//!     &MonospaceShaper::default(),
//!     &NoOverlay,
//!     &layout,
//!     &viewport,
//! );
//! assert!(stats.paint.painted > 0);
//! ```

// Core engine modules
pub mod borders;
pub mod builder;
pub mod cache;
pub mod engine;
pub mod error;
pub mod frame;
pub mod graph;
pub mod propagate;
pub mod validity;

// Collaborator interfaces
pub mod overlay;
pub mod source;
pub mod text;

// Layout and painting
pub mod layout;
pub mod paint;
pub mod theme;
pub mod types;

// Re-export the main renderer types
pub use engine::{FrameStats, GridConfig, GridRenderer};
pub use frame::{DirtyFlags, FrameCache};
pub use graph::DrawStatus;

pub use types::*;

/// Get the library version
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
