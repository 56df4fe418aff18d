//! End-to-end frame rendering scenarios.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::TestWorld;
use gridview::graph::DrawStatus;
use gridview::overlay::{NoOverlay, SelectionOverlay};
use gridview::types::{MergeRange, Selection};

#[test]
fn ten_by_ten_first_frame_draws_every_cell() {
    let mut world = TestWorld::new(9, 9);
    world.source.set_value(0, 0, "a");
    world.source.set_value(9, 9, "z");

    let (_, stats) = world.render(&NoOverlay);

    assert_eq!(stats.paint.painted, 100);
    assert_eq!(stats.paint.cached, 0);
    for row in 0..10 {
        for col in 0..10 {
            assert_eq!(
                world.renderer.cell_status(row, col),
                Some(DrawStatus::SkipDrawn),
                "cell ({row},{col})"
            );
        }
    }
}

#[test]
fn merged_non_origin_cells_never_paint() {
    let mut world = TestWorld::new(9, 9);
    world.source.add_merge(MergeRange {
        start_row: 0,
        start_col: 0,
        end_row: 1,
        end_col: 1,
    });
    world.relayout();

    let (_, stats) = world.render(&NoOverlay);

    // Three of the four merge members are non-origin.
    assert_eq!(stats.paint.painted, 97);
    assert_eq!(
        world.renderer.cell_status(0, 0),
        Some(DrawStatus::SkipDrawn)
    );
    for (row, col) in [(0, 1), (1, 0), (1, 1)] {
        assert_eq!(
            world.renderer.cell_status(row, col),
            Some(DrawStatus::SkipNotDrawn),
            "merged member ({row},{col})"
        );
    }
}

#[test]
fn no_op_frames_are_idempotent() {
    let mut world = TestWorld::new(9, 9);
    world.source.set_value(3, 3, "steady");

    world.render(&NoOverlay);
    let (surface2, stats2) = world.render(&NoOverlay);
    let (surface3, stats3) = world.render(&NoOverlay);

    // With no state change and no dirty flags, nothing repaints and the
    // (empty) op streams are byte-identical across consecutive frames.
    assert_eq!(stats2.paint.painted, 0);
    assert_eq!(stats3.paint.painted, 0);
    assert!(surface2.ops.is_empty());
    assert_eq!(surface2.ops, surface3.ops);
    assert_eq!(
        world.renderer.cell_status(3, 3),
        Some(DrawStatus::SkipCached)
    );
}

#[test]
fn selecting_a_cell_invalidates_only_its_neighborhood() {
    let mut world = TestWorld::new(9, 9);
    world.render(&NoOverlay);

    let overlay = SelectionOverlay::select(Selection::cell(2, 2));
    world.renderer.dirty_flags_mut().mark_selection();
    let (_, stats) = world.render(&overlay);

    // The selected cell plus its 8 geometric neighbors repaint; everyone
    // else stays cache-hit.
    assert_eq!(stats.paint.painted, 9);
    assert_eq!(stats.paint.cached, 91);
    assert_eq!(
        world.renderer.cell_status(2, 2),
        Some(DrawStatus::SkipDrawn)
    );
    assert_eq!(
        world.renderer.cell_status(1, 1),
        Some(DrawStatus::SkipDrawn)
    );
    assert_eq!(
        world.renderer.cell_status(7, 7),
        Some(DrawStatus::SkipCached)
    );
}

#[test]
fn selection_without_dirty_flag_changes_nothing_far_away() {
    let mut world = TestWorld::new(9, 9);
    world.render(&NoOverlay);

    // Selection exists but the host forgot the flag: rule-level predicates
    // are not compared, only border recomputation runs. Cells away from the
    // selection boundary stay cached.
    let overlay = SelectionOverlay::select(Selection::cell(2, 2));
    let (_, stats) = world.render(&overlay);

    assert_eq!(
        world.renderer.cell_status(8, 8),
        Some(DrawStatus::SkipCached)
    );
    // Only the selected cell's borders changed.
    assert!(stats.paint.painted <= 1);
}

#[test]
fn hover_change_repaints_one_cell_without_neighbor_propagation() {
    let mut world = TestWorld::new(9, 9);
    world.render(&NoOverlay);

    let overlay = SelectionOverlay {
        hovered: Some((3, 3)),
        ..SelectionOverlay::default()
    };
    world.renderer.dirty_flags_mut().mark_hover();
    let (_, stats) = world.render(&overlay);

    // Hover is not one of the overlay categories that gates border
    // propagation, so exactly one cell repaints.
    assert_eq!(stats.paint.painted, 1);
    assert_eq!(stats.paint.cached, 99);
}

#[test]
fn scroll_discards_the_cache_wholesale() {
    let mut world = TestWorld::new(99, 9);
    world.render(&NoOverlay);

    world.viewport.scroll_y += 20.0; // one default row
    world.viewport.clamp_scroll(&world.layout);
    world.renderer.dirty_flags_mut().mark_scroll();
    let (_, stats) = world.render(&NoOverlay);

    // Validity checking is bypassed: every visible cell rebuilt, none
    // cache-hit.
    assert_eq!(stats.paint.cached, 0);
    assert!(stats.built_fragments >= 1);
    assert_eq!(stats.reused_fragments, 0);
    assert!(stats.paint.painted > 0);
}

#[test]
fn hit_testing_reflects_visible_cells() {
    let mut world = TestWorld::new(9, 9);
    world.source.set_value(4, 4, "target");
    let (_, stats) = world.render(&NoOverlay);

    assert_eq!(stats.visible_cells, 100);
    let rect = world.layout.cell_rect(4, 4);
    assert_eq!(
        world.renderer.cell_at(rect.x + 2.0, rect.y + 2.0),
        Some((4, 4))
    );
    assert_eq!(world.renderer.cell_at(-1.0, -1.0), None);
}

#[test]
fn deselecting_restores_cached_state_next_frame() {
    let mut world = TestWorld::new(9, 9);
    world.render(&NoOverlay);

    let overlay = SelectionOverlay::select(Selection::cell(2, 2));
    world.renderer.dirty_flags_mut().mark_selection();
    world.render(&overlay);

    world.renderer.dirty_flags_mut().mark_selection();
    let (_, stats) = world.render(&NoOverlay);
    // The previously selected neighborhood repaints once more to erase the
    // overlay, then the grid is stable again.
    assert_eq!(stats.paint.painted, 9);

    let (surface, stats) = world.render(&NoOverlay);
    assert_eq!(stats.paint.painted, 0);
    assert!(surface.ops.is_empty());
}
