//! Row assembly and overflow splicing.

use std::collections::HashMap;

use crate::graph::{CellGraph, NodeId};
use crate::types::CellRange;

use super::cell::{overflow_directions, CELL_H_PADDING, MAX_OVERFLOW_COLUMNS};
use super::GridBuilder;

impl GridBuilder<'_> {
    /// Build one row of linked nodes for the visible columns of `range`,
    /// then run the overflow pass to mark or splice subsumed neighbors.
    pub(crate) fn build_row(
        &mut self,
        graph: &mut CellGraph,
        index: &mut HashMap<(u32, u32), NodeId>,
        data_row: u32,
        view_row: u32,
        range: &CellRange,
    ) -> Vec<NodeId> {
        let mut row_ids: Vec<NodeId> = Vec::new();
        let mut view_col: u32 = 0;

        for col in range.start_col..range.end_col {
            if self.layout.is_col_hidden(col) {
                continue;
            }
            let node = self.build_cell(data_row, col, view_row, view_col);
            let id = graph.alloc(node);
            if let Some(&prev) = row_ids.last() {
                graph.link_horizontal(prev, id);
            }
            index.insert((data_row, col), id);
            row_ids.push(id);
            view_col += 1;
        }

        self.splice_overflow(graph, index, &mut row_ids, data_row, range);
        row_ids
    }

    /// Overflow pass: for every cell whose text is wider than its cell and
    /// whose wrap mode is "overflowing", occupy neighboring empty cells.
    ///
    /// In-range empty neighbors are marked invisible in place; neighbors
    /// beyond the range edge become synthetic nodes spliced before the
    /// first / after the last real node of the row. The scan visits at most
    /// [`MAX_OVERFLOW_COLUMNS`] columns per direction and stops at the
    /// first non-empty cell.
    fn splice_overflow(
        &mut self,
        graph: &mut CellGraph,
        index: &mut HashMap<(u32, u32), NodeId>,
        row_ids: &mut Vec<NodeId>,
        data_row: u32,
        range: &CellRange,
    ) {
        let real_ids: Vec<NodeId> = row_ids.clone();

        for id in real_ids {
            let Some(node) = graph.get(id) else {
                continue;
            };
            if node.cell.is_overflow_placeholder() {
                continue;
            }
            let Some(text) = node.cell.text.as_ref() else {
                continue;
            };
            let style = &node.source.data.style;
            let dirs = overflow_directions(
                style.wrap_mode(),
                style.h_align(),
                style.rotation.unwrap_or(0),
            );
            if !dirs.left && !dirs.right {
                continue;
            }

            let rect = node.cell.rect;
            let needed = text.width + CELL_H_PADDING * 2.0 - rect.width;
            if needed <= 0.0 {
                continue;
            }
            let col = node.source.col;
            let view_row = node.source.view_row;

            let (need_left, need_right) = if dirs.left && dirs.right {
                (needed / 2.0, needed / 2.0)
            } else if dirs.left {
                (needed, 0.0)
            } else {
                (0.0, needed)
            };

            if need_right > 0.0 {
                let count =
                    self.occupy_right(graph, index, row_ids, data_row, view_row, col, need_right, range);
                if let Some(node) = graph.get_mut(id) {
                    node.cell.subsumed_right_cell_count = count;
                }
            }
            if need_left > 0.0 {
                let count =
                    self.occupy_left(graph, index, row_ids, data_row, view_row, col, need_left, range);
                if let Some(node) = graph.get_mut(id) {
                    node.cell.subsumed_left_cell_count = count;
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn occupy_right(
        &mut self,
        graph: &mut CellGraph,
        index: &mut HashMap<(u32, u32), NodeId>,
        row_ids: &mut Vec<NodeId>,
        data_row: u32,
        view_row: u32,
        from_col: u32,
        mut remaining: f32,
        _range: &CellRange,
    ) -> u32 {
        let mut count: u32 = 0;
        let mut col = from_col;
        for _ in 0..MAX_OVERFLOW_COLUMNS {
            if remaining <= 0.0 || col >= self.layout.max_col {
                break;
            }
            col += 1;
            if self.layout.is_col_hidden(col) {
                continue;
            }
            if !self.source.is_empty(data_row, col) {
                break;
            }

            if let Some(&existing) = index.get(&(data_row, col)) {
                if let Some(node) = graph.get_mut(existing) {
                    node.cell.is_right_overflowing_invisible_cell = true;
                }
            } else {
                // Beyond the range's right edge: splice a synthetic node
                // after the last node of the row.
                let mut synthetic = self.build_cell(data_row, col, view_row, u32::MAX);
                synthetic.cell.is_right_overflowing_invisible_cell = true;
                let id = graph.alloc(synthetic);
                if let Some(&last) = row_ids.last() {
                    graph.link_horizontal(last, id);
                }
                index.insert((data_row, col), id);
                row_ids.push(id);
            }

            count += 1;
            remaining -= self.layout.col_width(col);
        }
        count
    }

    #[allow(clippy::too_many_arguments)]
    fn occupy_left(
        &mut self,
        graph: &mut CellGraph,
        index: &mut HashMap<(u32, u32), NodeId>,
        row_ids: &mut Vec<NodeId>,
        data_row: u32,
        view_row: u32,
        from_col: u32,
        mut remaining: f32,
        range: &CellRange,
    ) -> u32 {
        let mut count: u32 = 0;
        let mut col = from_col;
        for _ in 0..MAX_OVERFLOW_COLUMNS {
            if remaining <= 0.0 || col == 0 {
                break;
            }
            col -= 1;
            if self.layout.is_col_hidden(col) {
                continue;
            }
            if !self.source.is_empty(data_row, col) {
                break;
            }

            if let Some(&existing) = index.get(&(data_row, col)) {
                if let Some(node) = graph.get_mut(existing) {
                    node.cell.is_left_overflowing_invisible_cell = true;
                }
            } else if col < range.start_col {
                // Before the range's left edge: splice a synthetic node
                // before the first node of the row.
                let mut synthetic = self.build_cell(data_row, col, view_row, u32::MAX);
                synthetic.cell.is_left_overflowing_invisible_cell = true;
                let id = graph.alloc(synthetic);
                if let Some(&first) = row_ids.first() {
                    graph.link_horizontal(id, first);
                }
                index.insert((data_row, col), id);
                row_ids.insert(0, id);
            }

            count += 1;
            remaining -= self.layout.col_width(col);
        }
        count
    }
}
