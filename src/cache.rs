//! Cross-frame caches.
//!
//! Two caches persist between frames: the [`DrawCache`] holding the last
//! rendered cell-graph fragments per grid region, and a bounded
//! [`LruCache`] reusing shaped text across rebuilds.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::rc::Rc;

use crate::graph::{CellGraph, NodeId};
use crate::text::ShapedText;
use crate::types::{CellRange, Style, TextWrap};

/// A simple LRU cache with a fixed capacity.
///
/// When the cache exceeds capacity, the oldest (least recently inserted)
/// entries are evicted. This is an insertion-order LRU — lookups do not
/// promote entries.
pub struct LruCache<K: Hash + Eq + Clone, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// Create a new cache with the given capacity.
    ///
    /// A capacity of 0 disables caching entirely.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    /// Look up a value by key. Returns `None` if not present or capacity is 0.
    pub fn get(&self, key: &K) -> Option<&V> {
        if self.capacity == 0 {
            return None;
        }
        self.entries.get(key)
    }

    /// Insert a key-value pair. If the key already exists, the value is NOT
    /// updated. Returns `true` if the entry was newly inserted.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key.clone(), value);
        self.order.push_back(key);
        self.enforce_cap();
        true
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Evict oldest entries until we're at or below capacity.
    fn enforce_cap(&mut self) {
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            } else {
                break;
            }
        }
    }
}

/// Cache key for shaped text. Pixel widths are quantized to tenths so the
/// key hashes; everything else that changes layout participates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextKey {
    text: String,
    width_tenths: u32,
    wrap: TextWrap,
    bold: bool,
    font_size_tenths: u32,
    rotation: i32,
}

impl TextKey {
    pub fn new(text: &str, available_width: f32, style: &Style, rotation: i32) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let width_tenths = (available_width.max(0.0) * 10.0) as u32;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let font_size_tenths = (style.font_size.unwrap_or(11.0).max(0.0) * 10.0) as u32;
        Self {
            text: text.to_string(),
            width_tenths,
            wrap: style.wrap_mode(),
            bold: style.bold == Some(true),
            font_size_tenths,
            rotation,
        }
    }
}

/// Bounded shaped-text cache shared by rebuilds across frames.
pub type TextLayoutCache = LruCache<TextKey, Rc<ShapedText>>;

/// Default capacity for the shaped-text cache.
pub const TEXT_CACHE_CAPACITY: usize = 4096;

/// The four pane regions a frame renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridRegion {
    /// Scrollable body.
    Body,
    /// Frozen rows band (scrolls horizontally only).
    FrozenRows,
    /// Frozen columns band (scrolls vertically only).
    FrozenCols,
    /// Top-left corner (never scrolls).
    FrozenCorner,
}

impl GridRegion {
    pub const ALL: [GridRegion; 4] = [
        GridRegion::Body,
        GridRegion::FrozenRows,
        GridRegion::FrozenCols,
        GridRegion::FrozenCorner,
    ];
}

/// One cached cell-graph fragment: the arena, its row-major node lists
/// (including spliced overflow nodes), and the range it covers.
pub struct Fragment {
    pub graph: CellGraph,
    /// Row-major node ids; each row includes synthetic overflow nodes
    /// spliced before the first / after the last real node.
    pub rows: Vec<Vec<NodeId>>,
    /// Half-open range of real cells covered.
    pub range: CellRange,
    /// Lookup from logical (row, col) to real nodes (overflow placeholders
    /// for out-of-range columns included).
    pub index: HashMap<(u32, u32), NodeId>,
}

impl Fragment {
    pub fn node_at(&self, row: u32, col: u32) -> Option<NodeId> {
        self.index.get(&(row, col)).copied()
    }
}

/// Which axis a header strip labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAxis {
    Rows,
    Columns,
}

/// Cached header strip: the indices it covers (frozen band plus visible
/// scrollable band) and the highlight state it was painted with. A mismatch
/// against the live highlight predicates invalidates the strip.
pub struct HeaderFragment {
    pub axis: HeaderAxis,
    /// Indices painted, in paint order.
    pub indices: Vec<u32>,
    /// Highlight state per painted index.
    pub highlighted: Vec<bool>,
}

impl HeaderFragment {
    /// Whether the cached strip still matches the live indices and
    /// highlight state.
    pub fn matches(&self, indices: &[u32], live: &[bool]) -> bool {
        self.indices.as_slice() == indices && self.highlighted.as_slice() == live
    }
}

/// Cross-frame storage of the last rendered fragments.
#[derive(Default)]
pub struct DrawCache {
    body: Option<Fragment>,
    frozen_rows: Option<Fragment>,
    frozen_cols: Option<Fragment>,
    frozen_corner: Option<Fragment>,
    pub row_headers: Option<HeaderFragment>,
    pub col_headers: Option<HeaderFragment>,
}

impl DrawCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, region: GridRegion) -> &mut Option<Fragment> {
        match region {
            GridRegion::Body => &mut self.body,
            GridRegion::FrozenRows => &mut self.frozen_rows,
            GridRegion::FrozenCols => &mut self.frozen_cols,
            GridRegion::FrozenCorner => &mut self.frozen_corner,
        }
    }

    pub fn fragment(&self, region: GridRegion) -> Option<&Fragment> {
        match region {
            GridRegion::Body => self.body.as_ref(),
            GridRegion::FrozenRows => self.frozen_rows.as_ref(),
            GridRegion::FrozenCols => self.frozen_cols.as_ref(),
            GridRegion::FrozenCorner => self.frozen_corner.as_ref(),
        }
    }

    /// Remove and return a region's fragment for this frame's reuse check.
    pub fn take(&mut self, region: GridRegion) -> Option<Fragment> {
        self.slot(region).take()
    }

    /// Store a region's finalized fragment for the next frame.
    pub fn store(&mut self, region: GridRegion, fragment: Fragment) {
        *self.slot(region) = Some(fragment);
    }

    /// Discard everything (wholesale rebuild, e.g. on scroll).
    pub fn clear(&mut self) {
        self.body = None;
        self.frozen_rows = None;
        self.frozen_cols = None;
        self.frozen_corner = None;
        self.row_headers = None;
        self.col_headers = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_insert_get() {
        let mut cache: LruCache<String, i32> = LruCache::new(3);
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);

        assert_eq!(cache.get(&"a".to_string()), Some(&1));
        assert_eq!(cache.get(&"b".to_string()), Some(&2));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_eviction() {
        let mut cache: LruCache<String, i32> = LruCache::new(2);
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        cache.insert("c".to_string(), 3);

        // "a" should be evicted
        assert_eq!(cache.get(&"a".to_string()), None);
        assert_eq!(cache.get(&"b".to_string()), Some(&2));
        assert_eq!(cache.get(&"c".to_string()), Some(&3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity() {
        let mut cache: LruCache<String, i32> = LruCache::new(0);
        assert!(!cache.insert("a".to_string(), 1));
        assert_eq!(cache.get(&"a".to_string()), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_duplicate_insert() {
        let mut cache: LruCache<String, i32> = LruCache::new(3);
        assert!(cache.insert("a".to_string(), 1));
        assert!(!cache.insert("a".to_string(), 2)); // should not update
        assert_eq!(cache.get(&"a".to_string()), Some(&1)); // original value
    }

    #[test]
    fn text_key_quantizes_width() {
        let style = Style::default();
        let a = TextKey::new("abc", 64.01, &style, 0);
        let b = TextKey::new("abc", 64.04, &style, 0);
        let c = TextKey::new("abc", 65.0, &style, 0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn text_key_differs_by_layout_inputs() {
        let plain = Style::default();
        let bold = Style {
            bold: Some(true),
            ..Style::default()
        };
        let a = TextKey::new("abc", 64.0, &plain, 0);
        let b = TextKey::new("abc", 64.0, &bold, 0);
        let c = TextKey::new("abc", 64.0, &plain, 45);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn draw_cache_take_then_store() {
        let mut cache = DrawCache::new();
        assert!(cache.take(GridRegion::Body).is_none());
        cache.store(
            GridRegion::Body,
            Fragment {
                graph: CellGraph::new(),
                rows: Vec::new(),
                range: CellRange::new(0, 0, 0, 0),
                index: HashMap::new(),
            },
        );
        assert!(cache.fragment(GridRegion::Body).is_some());
        assert!(cache.take(GridRegion::Body).is_some());
        assert!(cache.fragment(GridRegion::Body).is_none());
    }
}
