//! The per-frame cell graph.
//!
//! Rendered cells live in an arena ([`CellGraph`]) and reference their four
//! neighbors through plain [`NodeId`] indices, never owning pointers. Each
//! node carries its drawing status for the current frame.

mod node;
mod status;

pub use node::{CellGraph, CellNode, CellSourceData, MergeEdges, NodeId, RenderCell};
pub use status::DrawStatus;
