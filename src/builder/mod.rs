//! Cell/row/fragment construction.
//!
//! The builder turns a clamped index range plus a pixel cursor into linked
//! [`CellGraph`] fragments, splicing synthetic overflow nodes where text
//! bleeds into neighboring empty cells. It also refreshes individual
//! invalidated cells in place without touching the graph structure.

mod cell;
mod row;

pub use cell::MAX_OVERFLOW_COLUMNS;

use std::collections::HashMap;
use std::rc::Rc;

use crate::cache::{Fragment, TextKey, TextLayoutCache};
use crate::graph::{CellGraph, DrawStatus, NodeId};
use crate::layout::GridLayout;
use crate::source::CellSource;
use crate::text::{ShapedText, TextShaper};
use crate::theme::Theme;
use crate::types::{CellRange, Style};

/// Builds cell-graph fragments from the external collaborators.
pub struct GridBuilder<'a> {
    pub source: &'a dyn CellSource,
    pub shaper: &'a dyn TextShaper,
    pub layout: &'a GridLayout,
    pub theme: &'a Theme,
    pub text_cache: &'a mut TextLayoutCache,
}

impl<'a> GridBuilder<'a> {
    pub fn new(
        source: &'a dyn CellSource,
        shaper: &'a dyn TextShaper,
        layout: &'a GridLayout,
        theme: &'a Theme,
        text_cache: &'a mut TextLayoutCache,
    ) -> Self {
        Self {
            source,
            shaper,
            layout,
            theme,
            text_cache,
        }
    }

    /// Build one row-major fragment for a half-open index range.
    ///
    /// The range is clamped to the layout extent; a fully out-of-range
    /// request yields an empty fragment. Hidden rows and columns are
    /// skipped; view indices count only visible positions. Rows are linked
    /// vertically to the previous row's output as they are produced, so
    /// total construction cost is O(visible cells).
    pub fn build_fragment(&mut self, range: CellRange) -> Fragment {
        let range = self.layout.clamp_range(range);
        let mut graph = CellGraph::with_capacity(
            (range.row_count() as usize).saturating_mul(range.col_count() as usize),
        );
        let mut index: HashMap<(u32, u32), NodeId> = HashMap::new();
        let mut rows: Vec<Vec<NodeId>> = Vec::with_capacity(range.row_count() as usize);

        let mut view_row: u32 = 0;
        for data_row in range.start_row..range.end_row {
            if self.layout.is_row_hidden(data_row) {
                continue;
            }
            let row_ids = self.build_row(&mut graph, &mut index, data_row, view_row, &range);

            // Link vertically against the previous produced row, matching
            // real nodes by logical column.
            if view_row > 0 {
                for &id in &row_ids {
                    let Some((row, col)) = graph.get(id).map(|n| (n.source.row, n.source.col))
                    else {
                        continue;
                    };
                    let mut upper_row = row;
                    while upper_row > range.start_row {
                        upper_row -= 1;
                        if !self.layout.is_row_hidden(upper_row) {
                            break;
                        }
                    }
                    if let Some(&upper) = index.get(&(upper_row, col)) {
                        if upper != id {
                            graph.link_vertical(upper, id);
                        }
                    }
                }
            }

            rows.push(row_ids);
            view_row += 1;
        }

        log::trace!(
            "built fragment rows={} cols={} nodes={}",
            range.row_count(),
            range.col_count(),
            graph.len()
        );

        Fragment {
            graph,
            rows,
            range,
            index,
        }
    }

    /// Refresh one invalidated cell in place (`recreate_cached_cell`).
    ///
    /// The node's links, view indices and overflow relationships stay; its
    /// derived attributes (rect, text, custom borders) are recomputed
    /// wholesale and the status becomes `PendingRedraw` so the paint pass
    /// repaints all four border sides.
    pub fn rebuild_cell(&mut self, fragment: &mut Fragment, id: NodeId) {
        let Some(node) = fragment.graph.get(id) else {
            return;
        };
        let row = node.source.row;
        let col = node.source.col;
        let view_row = node.source.view_row;
        let view_col = node.source.view_col;
        let placeholder = node.cell.is_overflow_placeholder();
        let was_left = node.cell.is_left_overflowing_invisible_cell;
        let was_right = node.cell.is_right_overflowing_invisible_cell;
        let subsumed_left = node.cell.subsumed_left_cell_count;
        let subsumed_right = node.cell.subsumed_right_cell_count;

        let mut fresh = self.build_cell(row, col, view_row, view_col);
        if placeholder {
            fresh.cell.is_left_overflowing_invisible_cell = was_left;
            fresh.cell.is_right_overflowing_invisible_cell = was_right;
        }
        fresh.cell.subsumed_left_cell_count = subsumed_left;
        fresh.cell.subsumed_right_cell_count = subsumed_right;
        if fresh.cell.status != DrawStatus::SkipNotDrawn {
            fresh.cell.status = DrawStatus::PendingRedraw;
        }

        if let Some(node) = fragment.graph.get_mut(id) {
            fresh.prev_sibling = node.prev_sibling;
            fresh.next_sibling = node.next_sibling;
            fresh.upper_sibling = node.upper_sibling;
            fresh.lower_sibling = node.lower_sibling;
            *node = fresh;
        }
    }

    /// Shape text through the cross-frame layout cache.
    pub(crate) fn shape_cached(
        &mut self,
        text: &str,
        available_width: f32,
        style: &Style,
    ) -> Rc<ShapedText> {
        let rotation = style.rotation.unwrap_or(0);
        let key = TextKey::new(text, available_width, style, rotation);
        if let Some(hit) = self.text_cache.get(&key) {
            return Rc::clone(hit);
        }
        let shaped = Rc::new(
            self.shaper
                .shape(text, available_width, style.wrap_mode(), style, rotation),
        );
        self.text_cache.insert(key, Rc::clone(&shaped));
        shaped
    }
}
