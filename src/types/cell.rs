use serde::{Deserialize, Serialize};

use super::StyleRef;

/// One cell's source data, as handed to the engine by the data source.
///
/// The display string is already formatted; the engine never applies number
/// formats itself.
#[derive(Debug, Clone, Default)]
pub struct CellData {
    /// Formatted display value. `None` means the cell is empty (a neighbor's
    /// overflowing text may occupy its area).
    pub value: Option<String>,
    /// Resolved style for the cell.
    pub style: StyleRef,
    /// Table the cell belongs to, when any (drives automatic table framing
    /// borders).
    pub table: Option<TableId>,
}

impl CellData {
    /// Whether the cell has no display content. Empty cells are candidates
    /// for neighbor text overflow.
    pub fn is_empty(&self) -> bool {
        self.value.as_deref().map_or(true, str::is_empty)
    }
}

/// Identifier of a table region within the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableId(pub u32);

/// Convert a 0-based column index to spreadsheet column letters
/// (A, B, ..., Z, AA, AB, ...). Used for column header labels.
pub fn col_to_letter(col: u32) -> String {
    let mut result = String::new();
    let mut n = col + 1;
    while n > 0 {
        n -= 1;
        let c = char::from(b'A' + u8::try_from(n % 26).unwrap_or(0));
        result.insert(0, c);
        n /= 26;
    }
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn empty_cell_detection() {
        assert!(CellData::default().is_empty());
        let blank = CellData {
            value: Some(String::new()),
            ..CellData::default()
        };
        assert!(blank.is_empty());
        let filled = CellData {
            value: Some("x".to_string()),
            ..CellData::default()
        };
        assert!(!filled.is_empty());
    }

    #[test]
    fn column_letters() {
        assert_eq!(col_to_letter(0), "A");
        assert_eq!(col_to_letter(25), "Z");
        assert_eq!(col_to_letter(26), "AA");
        assert_eq!(col_to_letter(27), "AB");
        assert_eq!(col_to_letter(701), "ZZ");
        assert_eq!(col_to_letter(702), "AAA");
    }
}
