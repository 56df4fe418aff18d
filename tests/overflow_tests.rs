//! Text-overflow subsumption: splicing, bounds, and propagation.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::TestWorld;
use gridview::builder::{GridBuilder, MAX_OVERFLOW_COLUMNS};
use gridview::cache::TextLayoutCache;
use gridview::graph::DrawStatus;
use gridview::propagate::propagate_overflow;
use gridview::text::MonospaceShaper;
use gridview::theme::Theme;
use gridview::types::{CellRange, HAlign, Style, StyleRef};

// 26 chars * 7px = 182px against 64px columns: bleeds into exactly two
// empty neighbors (needs 124px, two columns provide 128px).
const TWO_COLUMN_TEXT: &str = "abcdefghijklmnopqrstuvwxyz";

fn build_fragment(world: &TestWorld, range: CellRange) -> gridview::cache::Fragment {
    let theme = Theme::default();
    let shaper = MonospaceShaper::default();
    let mut text_cache = TextLayoutCache::new(1024);
    let mut builder = GridBuilder::new(
        &world.source,
        &shaper,
        &world.layout,
        &theme,
        &mut text_cache,
    );
    builder.build_fragment(range)
}

#[test]
fn overflow_splices_synthetic_nodes_beyond_range_edge() {
    let mut world = TestWorld::new(0, 8);
    world.source.set_value(0, 3, TWO_COLUMN_TEXT);

    // Range ends after column 3; columns 4-5 are outside it.
    let fragment = build_fragment(&world, CellRange::new(0, 0, 1, 4));

    // 4 real nodes plus 2 spliced overflow nodes.
    assert_eq!(fragment.rows[0].len(), 6);

    let source = fragment.node_at(0, 3).unwrap();
    assert_eq!(
        fragment.graph.get(source).unwrap().cell.subsumed_right_cell_count,
        2
    );

    for col in [4, 5] {
        let id = fragment.node_at(0, col).expect("overflow node spliced");
        let node = fragment.graph.get(id).unwrap();
        assert!(
            node.cell.is_right_overflowing_invisible_cell,
            "column {col} should be an invisible overflow cell"
        );
    }

    // Spliced after column 3's node, chained in order.
    let col3 = fragment.graph.get(source).unwrap();
    let col4 = col3.next_sibling.unwrap();
    assert_eq!(fragment.graph.get(col4).unwrap().source.col, 4);
    let col5 = fragment.graph.get(col4).unwrap().next_sibling.unwrap();
    assert_eq!(fragment.graph.get(col5).unwrap().source.col, 5);
}

#[test]
fn overflow_marks_in_range_neighbors_in_place() {
    let mut world = TestWorld::new(0, 8);
    world.source.set_value(0, 3, TWO_COLUMN_TEXT);

    let fragment = build_fragment(&world, CellRange::new(0, 0, 1, 9));

    // All nodes are real; nothing was spliced.
    assert_eq!(fragment.rows[0].len(), 9);
    for col in [4, 5] {
        let id = fragment.node_at(0, col).unwrap();
        assert!(
            fragment
                .graph
                .get(id)
                .unwrap()
                .cell
                .is_right_overflowing_invisible_cell
        );
    }
    // Column 6 is beyond the needed width.
    let id = fragment.node_at(0, 6).unwrap();
    assert!(
        !fragment
            .graph
            .get(id)
            .unwrap()
            .cell
            .is_right_overflowing_invisible_cell
    );
}

#[test]
fn overflow_stops_at_first_non_empty_cell() {
    let mut world = TestWorld::new(0, 8);
    world.source.set_value(0, 3, TWO_COLUMN_TEXT);
    world.source.set_value(0, 5, "blocker");

    let fragment = build_fragment(&world, CellRange::new(0, 0, 1, 9));

    let source = fragment.node_at(0, 3).unwrap();
    assert_eq!(
        fragment.graph.get(source).unwrap().cell.subsumed_right_cell_count,
        1
    );
    let id = fragment.node_at(0, 5).unwrap();
    assert!(
        !fragment
            .graph
            .get(id)
            .unwrap()
            .cell
            .is_right_overflowing_invisible_cell
    );
}

#[test]
fn overflow_scan_is_bounded() {
    let mut world = TestWorld::new(0, 30);
    // 200 chars * 7px = 1400px: far more than MAX_OVERFLOW_COLUMNS columns.
    world.source.set_value(0, 0, &"x".repeat(200));

    let fragment = build_fragment(&world, CellRange::new(0, 0, 1, 31));

    let source = fragment.node_at(0, 0).unwrap();
    let count = fragment
        .graph
        .get(source)
        .unwrap()
        .cell
        .subsumed_right_cell_count;
    assert_eq!(count, MAX_OVERFLOW_COLUMNS);
}

#[test]
fn right_aligned_text_bleeds_left() {
    let mut world = TestWorld::new(0, 8);
    let style = StyleRef::new(Style {
        align_h: Some(HAlign::Right),
        ..Style::default()
    });
    world.source.set_value(0, 4, TWO_COLUMN_TEXT);
    world.source.set_style(0, 4, style);

    let fragment = build_fragment(&world, CellRange::new(0, 0, 1, 9));

    let source = fragment.node_at(0, 4).unwrap();
    let node = fragment.graph.get(source).unwrap();
    assert_eq!(node.cell.subsumed_left_cell_count, 2);
    assert_eq!(node.cell.subsumed_right_cell_count, 0);
    for col in [2, 3] {
        let id = fragment.node_at(0, col).unwrap();
        assert!(
            fragment
                .graph
                .get(id)
                .unwrap()
                .cell
                .is_left_overflowing_invisible_cell
        );
    }
}

#[test]
fn invalidation_propagates_to_at_most_k_neighbors() {
    let mut world = TestWorld::new(0, 8);
    world.source.set_value(0, 0, TWO_COLUMN_TEXT);

    let mut fragment = build_fragment(&world, CellRange::new(0, 0, 1, 9));
    let k = {
        let source = fragment.node_at(0, 0).unwrap();
        fragment
            .graph
            .get(source)
            .unwrap()
            .cell
            .subsumed_right_cell_count
    };
    assert!(k > 0);

    // Settle every cell, then invalidate the overflowing source.
    let ids: Vec<_> = fragment.graph.ids().collect();
    for id in ids {
        fragment.graph.get_mut(id).unwrap().cell.status = DrawStatus::SkipDrawn;
    }
    let source = fragment.node_at(0, 0).unwrap();
    propagate_overflow(&mut fragment.graph, source);

    let promoted = fragment
        .graph
        .ids()
        .filter(|&id| {
            id != source
                && fragment.graph.get(id).unwrap().cell.status == DrawStatus::PendingRedraw
        })
        .count();
    assert_eq!(u32::try_from(promoted).unwrap(), k);
}
