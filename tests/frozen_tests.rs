//! Frozen-pane regions and boundary-shadow invalidation.
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
use gridview::overlay::NoOverlay;

#[test]
fn four_regions_build_with_frozen_rows_and_columns() {
    let mut world = TestWorld::with_frozen(49, 19, 2, 1);
    let (_, stats) = world.render(&NoOverlay);
    assert_eq!(stats.built_fragments, 4);
}

#[test]
fn only_two_regions_with_frozen_rows_alone() {
    let mut world = TestWorld::with_frozen(49, 19, 2, 0);
    let (_, stats) = world.render(&NoOverlay);
    // Body plus the frozen-rows band; the column band and corner are empty.
    assert_eq!(stats.built_fragments, 2);
}

#[test]
fn boundary_shadow_cells_repaint_every_frame() {
    let mut world = TestWorld::with_frozen(49, 9, 2, 0);
    world.render(&NoOverlay);

    // No dirty flags at all: only the cells under the freeze shadow band
    // rebuild, because their blend depends on scroll position.
    let (_, stats) = world.render(&NoOverlay);
    assert!(stats.paint.painted > 0);
    assert!(stats.paint.cached > 0);

    // The first scrollable row sits under the shadow; a row further down
    // stays cached.
    assert_eq!(
        world.renderer.cell_status(2, 0),
        Some(DrawStatus::SkipDrawn)
    );
    assert_eq!(
        world.renderer.cell_status(10, 0),
        Some(DrawStatus::SkipCached)
    );
}

#[test]
fn frozen_cells_stay_cached_across_noop_frames() {
    let mut world = TestWorld::with_frozen(49, 9, 2, 0);
    world.render(&NoOverlay);
    world.render(&NoOverlay);

    // Frozen cells sit above the boundary, not under the shadow.
    assert_eq!(
        world.renderer.cell_status(0, 0),
        Some(DrawStatus::SkipCached)
    );
    assert_eq!(
        world.renderer.cell_status(1, 3),
        Some(DrawStatus::SkipCached)
    );
}

#[test]
fn scrolled_frozen_world_keeps_frozen_band_fixed() {
    let mut world = TestWorld::with_frozen(99, 9, 2, 0);
    world.render(&NoOverlay);

    world.viewport.scroll_y += 100.0;
    world.viewport.clamp_scroll(&world.layout);
    world.renderer.dirty_flags_mut().mark_scroll();
    let (_, stats) = world.render(&NoOverlay);

    // Scroll rebuilds everything, including the frozen band.
    assert_eq!(stats.built_fragments, 2);
    assert_eq!(stats.paint.cached, 0);
    // Frozen rows are still present and painted.
    assert!(world.renderer.cell_status(0, 0).is_some());
    assert_eq!(
        world.renderer.cell_status(0, 0),
        Some(DrawStatus::SkipDrawn)
    );
}
