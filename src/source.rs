//! The tabular data-source collaborator.
//!
//! The engine never owns cell data. It reads values, styles and geometry
//! through [`CellSource`] while building graph fragments, and decides on its
//! own only *when* to re-read.

use std::collections::{HashMap, HashSet};

use crate::types::{CellData, MergeRange, StyleRef, TableId};

/// Default geometry used when a source does not override a row or column.
pub const SOURCE_DEFAULT_COL_WIDTH: f32 = 64.0;
pub const SOURCE_DEFAULT_ROW_HEIGHT: f32 = 20.0;

/// Read-only per-cell access to the underlying tabular data.
///
/// All lookups are per (row, col) in logical data space; geometry is in
/// density-independent pixels.
pub trait CellSource {
    /// Formatted display value, or `None` for an empty cell.
    fn value(&self, row: u32, col: u32) -> Option<String>;

    /// Resolved style for a cell. The default style applies when `None`.
    fn style(&self, row: u32, col: u32) -> Option<StyleRef>;

    /// Table membership for automatic table framing borders.
    fn table_at(&self, _row: u32, _col: u32) -> Option<TableId> {
        None
    }

    /// All merged regions (inclusive ends).
    fn merge_ranges(&self) -> Vec<MergeRange> {
        Vec::new()
    }

    /// Column width in pixels.
    fn col_width(&self, _col: u32) -> f32 {
        SOURCE_DEFAULT_COL_WIDTH
    }

    /// Row height in pixels.
    fn row_height(&self, _row: u32) -> f32 {
        SOURCE_DEFAULT_ROW_HEIGHT
    }

    fn is_row_hidden(&self, _row: u32) -> bool {
        false
    }

    fn is_col_hidden(&self, _col: u32) -> bool {
        false
    }

    /// Maximum row index with content or geometry.
    fn max_row(&self) -> u32;

    /// Maximum column index with content or geometry.
    fn max_col(&self) -> u32;

    /// Whether a cell has no display content. Empty cells are candidates for
    /// neighbor text overflow.
    fn is_empty(&self, row: u32, col: u32) -> bool {
        self.value(row, col).map_or(true, |v| v.is_empty())
    }

    /// Assemble the full cell record the builder consumes.
    fn cell(&self, row: u32, col: u32) -> CellData {
        CellData {
            value: self.value(row, col),
            style: self.style(row, col).unwrap_or_default(),
            table: self.table_at(row, col),
        }
    }
}

/// A simple in-memory [`CellSource`], used by tests, benches and small hosts.
#[derive(Default)]
pub struct MemorySource {
    cells: HashMap<(u32, u32), (String, Option<StyleRef>)>,
    tables: Vec<(MergeRange, TableId)>,
    merges: Vec<MergeRange>,
    col_widths: HashMap<u32, f32>,
    row_heights: HashMap<u32, f32>,
    hidden_rows: HashSet<u32>,
    hidden_cols: HashSet<u32>,
    max_row: u32,
    max_col: u32,
}

impl MemorySource {
    pub fn new(max_row: u32, max_col: u32) -> Self {
        Self {
            max_row,
            max_col,
            ..Self::default()
        }
    }

    pub fn set_value(&mut self, row: u32, col: u32, value: impl Into<String>) -> &mut Self {
        let entry = self.cells.entry((row, col)).or_default();
        entry.0 = value.into();
        self.max_row = self.max_row.max(row);
        self.max_col = self.max_col.max(col);
        self
    }

    pub fn set_style(&mut self, row: u32, col: u32, style: StyleRef) -> &mut Self {
        let entry = self.cells.entry((row, col)).or_default();
        entry.1 = Some(style);
        self.max_row = self.max_row.max(row);
        self.max_col = self.max_col.max(col);
        self
    }

    pub fn add_merge(&mut self, merge: MergeRange) -> &mut Self {
        self.merges.push(merge);
        self
    }

    pub fn add_table(&mut self, region: MergeRange, id: TableId) -> &mut Self {
        self.tables.push((region, id));
        self
    }

    pub fn set_col_width(&mut self, col: u32, width: f32) -> &mut Self {
        self.col_widths.insert(col, width);
        self
    }

    pub fn set_row_height(&mut self, row: u32, height: f32) -> &mut Self {
        self.row_heights.insert(row, height);
        self
    }

    pub fn hide_row(&mut self, row: u32) -> &mut Self {
        self.hidden_rows.insert(row);
        self
    }

    pub fn hide_col(&mut self, col: u32) -> &mut Self {
        self.hidden_cols.insert(col);
        self
    }
}

impl CellSource for MemorySource {
    fn value(&self, row: u32, col: u32) -> Option<String> {
        self.cells
            .get(&(row, col))
            .map(|(v, _)| v.clone())
            .filter(|v| !v.is_empty())
    }

    fn style(&self, row: u32, col: u32) -> Option<StyleRef> {
        self.cells.get(&(row, col)).and_then(|(_, s)| s.clone())
    }

    fn table_at(&self, row: u32, col: u32) -> Option<TableId> {
        self.tables
            .iter()
            .find(|(region, _)| region.contains(row, col))
            .map(|(_, id)| *id)
    }

    fn merge_ranges(&self) -> Vec<MergeRange> {
        self.merges.clone()
    }

    fn col_width(&self, col: u32) -> f32 {
        self.col_widths
            .get(&col)
            .copied()
            .unwrap_or(SOURCE_DEFAULT_COL_WIDTH)
    }

    fn row_height(&self, row: u32) -> f32 {
        self.row_heights
            .get(&row)
            .copied()
            .unwrap_or(SOURCE_DEFAULT_ROW_HEIGHT)
    }

    fn is_row_hidden(&self, row: u32) -> bool {
        self.hidden_rows.contains(&row)
    }

    fn is_col_hidden(&self, col: u32) -> bool {
        self.hidden_cols.contains(&col)
    }

    fn max_row(&self) -> u32 {
        self.max_row
    }

    fn max_col(&self) -> u32 {
        self.max_col
    }
}
