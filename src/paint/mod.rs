//! Painting: the host surface abstraction and the frame draw dispatch.

mod dispatch;
mod recorder;
mod surface;

pub use dispatch::{paint_fragment, PaintStats, VisibleCell};
pub use recorder::{PaintOp, RecordingSurface};
pub use surface::{PaintSurface, TextPaint};
