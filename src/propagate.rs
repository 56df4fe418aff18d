//! Redraw propagation.
//!
//! A rebuilt cell's repaint may damage pixels a neighbor painted earlier
//! (overflowing text, thick/double borders crossing the shared edge). Given
//! one invalidated cell, this module marks the minimal set of dependent
//! neighbors for redraw. Both walks are idempotent and bounded by the
//! current frame's graph, so propagation terminates without recursion
//! limits.

use crate::frame::DirtyFlags;
use crate::graph::{CellGraph, DrawStatus, NodeId};

/// Mark the neighbors of a just-rebuilt cell.
///
/// Runs the two independent propagation rules; they are never crossed (a
/// cell reached by the border rule does not continue the overflow walk).
pub fn propagate(graph: &mut CellGraph, id: NodeId, flags: &DirtyFlags) {
    propagate_overflow(graph, id);
    propagate_borders(graph, id, flags);
}

/// Text-overflow chain: walk siblings glued to this cell by subsumption and
/// force them to repaint.
///
/// The walk is bounded by the subsumption counts recorded on the cell at
/// build time, never an open-ended scan.
pub fn propagate_overflow(graph: &mut CellGraph, id: NodeId) {
    let Some(node) = graph.get(id) else {
        return;
    };

    // Rightward: cells this cell's text bleeds into.
    let right_count = node.cell.subsumed_right_cell_count;
    let left_count = node.cell.subsumed_left_cell_count;

    // A subsumed placeholder being rebuilt drags its source cell along:
    // the source must repaint its text over the placeholder's fresh
    // background.
    let pulls_left = node.cell.is_right_overflowing_invisible_cell;
    let pulls_right = node.cell.is_left_overflowing_invisible_cell;

    walk_siblings(graph, id, Direction::Right, right_count, |cell| {
        cell.is_right_overflowing_invisible_cell
    });
    walk_siblings(graph, id, Direction::Left, left_count, |cell| {
        cell.is_left_overflowing_invisible_cell
    });

    if pulls_left {
        walk_source(graph, id, Direction::Left);
    }
    if pulls_right {
        walk_source(graph, id, Direction::Right);
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Left,
    Right,
}

fn next_in(graph: &CellGraph, id: NodeId, direction: Direction) -> Option<NodeId> {
    let node = graph.get(id)?;
    match direction {
        Direction::Left => node.prev_sibling,
        Direction::Right => node.next_sibling,
    }
}

/// Promote up to `count` subsumed siblings in one direction.
fn walk_siblings(
    graph: &mut CellGraph,
    from: NodeId,
    direction: Direction,
    count: u32,
    still_subsumed: impl Fn(&crate::graph::RenderCell) -> bool,
) {
    let mut current = from;
    for _ in 0..count {
        let Some(next) = next_in(graph, current, direction) else {
            break;
        };
        let Some(node) = graph.get_mut(next) else {
            break;
        };
        if !still_subsumed(&node.cell) {
            break;
        }
        if node.cell.status.accepts_promotion() {
            node.cell.status = DrawStatus::PendingRedraw;
        }
        current = next;
    }
}

/// Walk from a subsumed placeholder back to the overflowing source cell and
/// promote it. Bounded by the placeholder chain length.
fn walk_source(graph: &mut CellGraph, from: NodeId, direction: Direction) {
    let mut current = from;
    loop {
        let Some(next) = next_in(graph, current, direction) else {
            return;
        };
        let Some(node) = graph.get(next) else {
            return;
        };
        if node.cell.is_overflow_placeholder() {
            current = next;
            continue;
        }
        // First non-placeholder: the source cell, if it subsumes anything.
        let subsumes = node.cell.subsumes_neighbors();
        if subsumes {
            if let Some(node) = graph.get_mut(next) {
                if node.cell.status.accepts_promotion() {
                    node.cell.status = DrawStatus::PendingRedraw;
                }
            }
        }
        return;
    }
}

/// Border-adjacency chain: mark the 8 geometric neighbors as
/// `RequestRedrawn`, but only when selection/fill/move overlays are what
/// changed — border repainting is only visually necessary then.
pub fn propagate_borders(graph: &mut CellGraph, id: NodeId, flags: &DirtyFlags) {
    if !flags.overlay_dirty() {
        return;
    }
    for neighbor in graph.geometric_neighbors(id).into_iter().flatten() {
        let Some(node) = graph.get_mut(neighbor) else {
            continue;
        };
        // Only settled cells are candidates: anything pending repaints its
        // borders anyway, and merged non-origin cells never promote.
        if node.cell.status.is_settled() && node.cell.status != DrawStatus::SkipNotDrawn {
            node.cell.status = DrawStatus::RequestRedrawn;
        }
    }
}

/// Promote `RequestRedrawn` cells to `PendingRedraw`.
///
/// Only fires when the active dirty flags include selection, fill-overlay
/// or move-overlay; otherwise the request is left untouched to avoid
/// unnecessary work.
pub fn resolve_requests(graph: &mut CellGraph, flags: &DirtyFlags) {
    if !flags.overlay_dirty() {
        return;
    }
    let ids: Vec<NodeId> = graph.ids().collect();
    for id in ids {
        let Some(node) = graph.get_mut(id) else {
            continue;
        };
        if node.cell.status == DrawStatus::RequestRedrawn {
            node.cell.status = DrawStatus::PendingRedraw;
        }
    }
}
