//! # Grid Layout
//!
//! Maps the zero-based index of a label within a run to its page, grid cell,
//! and physical position on the sheet.
//!
//! ## Placement
//!
//! ```text
//! labels_per_page = columns * rows
//! page = index / labels_per_page
//! row  = (index / columns) % rows
//! col  = index % columns
//!
//! label_top_left   = (offset_x + col * (label_width + label_margin),
//!                     offset_y + row * label_height)
//! content_top_left = label_top_left + (label_padding, label_padding)
//! ```
//!
//! Labels fill a page row by row, left to right. A page starts exactly when
//! `index % labels_per_page == 0`.

use crate::error::LabelError;
use crate::sheet::SheetConfig;

/// A point on the page, in inches from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset this point by `dx`, `dy`
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Where one label lands on the sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPosition {
    /// Zero-based page number
    pub page: usize,
    /// Grid row on the page, `0..rows`
    pub row: usize,
    /// Grid column on the page, `0..columns`
    pub col: usize,
    /// Top-left corner of the physical label
    pub label_top_left: Point,
    /// Top-left corner of the padded printable area
    pub content_top_left: Point,
}

/// Pure index → position mapping for one sheet geometry.
#[derive(Debug, Clone, Copy)]
pub struct GridLayout {
    config: SheetConfig,
}

impl GridLayout {
    /// Layout over an already validated sheet.
    ///
    /// [`GridLayout::position`] panics when `config` has no columns or rows;
    /// use [`GridLayout::try_new`] for geometry from outside the crate.
    pub fn new(config: SheetConfig) -> Self {
        Self { config }
    }

    /// Validate `config`, then build its layout.
    pub fn try_new(config: SheetConfig) -> Result<Self, LabelError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    #[inline]
    pub fn labels_per_page(&self) -> usize {
        self.config.labels_per_page()
    }

    /// Position of the label at `index` (offset from the start of the run).
    pub fn position(&self, index: usize) -> LabelPosition {
        let c = &self.config;
        let page = index / self.labels_per_page();
        let row = (index / c.columns) % c.rows;
        let col = index % c.columns;

        let label_top_left = Point::new(
            c.offset_x + col as f32 * c.column_pitch(),
            c.offset_y + row as f32 * c.label_height,
        );

        LabelPosition {
            page,
            row,
            col,
            label_top_left,
            content_top_left: label_top_left.offset(c.label_padding, c.label_padding),
        }
    }

    /// True when the label at `index` is the first one on its page.
    #[inline]
    pub fn is_page_start(&self, index: usize) -> bool {
        index % self.labels_per_page() == 0
    }

    /// Pages needed for `labels` labels
    pub fn page_count(&self, labels: usize) -> usize {
        labels.div_ceil(self.labels_per_page())
    }
}

// ============================================================================
// PAGINATION CURSOR
// ============================================================================

/// The next slot handed out by a [`PageCursor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Zero-based label index within the run
    pub index: usize,
    pub position: LabelPosition,
    /// The caller must open a new page before drawing this slot.
    pub starts_page: bool,
}

/// Explicit pagination state over a [`GridLayout`].
///
/// Tracks the current page and how many labels it holds instead of
/// recomputing page boundaries from the running index.
#[derive(Debug, Clone)]
pub struct PageCursor {
    layout: GridLayout,
    next_index: usize,
    current_page: Option<usize>,
    labels_on_current_page: usize,
}

impl PageCursor {
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            next_index: 0,
            current_page: None,
            labels_on_current_page: 0,
        }
    }

    /// Claim the next slot.
    pub fn advance(&mut self) -> Slot {
        let index = self.next_index;
        let starts_page = match self.current_page {
            None => true,
            Some(_) => self.labels_on_current_page == self.layout.labels_per_page(),
        };

        if starts_page {
            self.current_page = Some(self.current_page.map_or(0, |p| p + 1));
            self.labels_on_current_page = 0;
        }
        self.labels_on_current_page += 1;
        self.next_index += 1;

        Slot {
            index,
            position: self.layout.position(index),
            starts_page,
        }
    }

    /// Page holding the most recently claimed slot
    pub fn current_page(&self) -> Option<usize> {
        self.current_page
    }

    pub fn labels_on_current_page(&self) -> usize {
        self.labels_on_current_page
    }

    /// Number of slots claimed so far
    pub fn claimed(&self) -> usize {
        self.next_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter() -> GridLayout {
        GridLayout::new(SheetConfig::LETTER_3X10)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_index_math_matches_formula() {
        let layout = letter();
        for i in 0..500 {
            let p = layout.position(i);
            assert_eq!(p.page, i / 30, "page of {}", i);
            assert_eq!(p.row, (i / 3) % 10, "row of {}", i);
            assert_eq!(p.col, i % 3, "col of {}", i);
        }
    }

    #[test]
    fn test_first_label() {
        let p = letter().position(0);
        assert_eq!((p.page, p.row, p.col), (0, 0, 0));
        assert!(approx(p.label_top_left.x, 0.1875));
        assert!(approx(p.label_top_left.y, 0.5));
        assert!(approx(p.content_top_left.x, 0.3125));
        assert!(approx(p.content_top_left.y, 0.625));
    }

    #[test]
    fn test_last_label_on_page() {
        let p = letter().position(29);
        assert_eq!((p.page, p.row, p.col), (0, 9, 2));
        // 3/16 + 2 * (2 5/8 + 1/8)
        assert!(approx(p.label_top_left.x, 5.6875));
        assert!(approx(p.label_top_left.y, 9.5));
    }

    #[test]
    fn test_wraps_to_next_page() {
        let layout = letter();
        let p = layout.position(30);
        assert_eq!((p.page, p.row, p.col), (1, 0, 0));
        assert_eq!(p.label_top_left, layout.position(0).label_top_left);
    }

    #[test]
    fn test_page_start() {
        let layout = letter();
        let starts: Vec<usize> = (0..100).filter(|&i| layout.is_page_start(i)).collect();
        assert_eq!(starts, [0, 30, 60, 90]);
    }

    #[test]
    fn test_page_count() {
        let layout = letter();
        assert_eq!(layout.page_count(1), 1);
        assert_eq!(layout.page_count(30), 1);
        assert_eq!(layout.page_count(31), 2);
        assert_eq!(layout.page_count(60), 2);
        assert_eq!(layout.page_count(61), 3);
    }

    #[test]
    fn test_labels_stay_on_page() {
        let layout = letter();
        let c = SheetConfig::LETTER_3X10;
        for i in 0..30 {
            let p = layout.position(i);
            assert!(p.label_top_left.x + c.label_width <= c.page_width);
            assert!(p.label_top_left.y + c.label_height <= c.page_height);
        }
    }

    #[test]
    fn test_custom_geometry() {
        let config = SheetConfig {
            columns: 2,
            rows: 4,
            ..SheetConfig::LETTER_3X10
        };
        let layout = GridLayout::new(config);
        let p = layout.position(9);
        assert_eq!((p.page, p.row, p.col), (1, 0, 1));
    }

    #[test]
    fn test_try_new_rejects_empty_grid() {
        for (columns, rows) in [(0, 10), (3, 0)] {
            let config = SheetConfig {
                columns,
                rows,
                ..SheetConfig::LETTER_3X10
            };
            assert!(matches!(GridLayout::try_new(config), Err(LabelError::Config(_))));
        }
        assert!(GridLayout::try_new(SheetConfig::LETTER_3X10).is_ok());
    }

    #[test]
    fn test_cursor_agrees_with_modulo() {
        let layout = letter();
        let mut cursor = PageCursor::new(layout);
        for i in 0..95 {
            let slot = cursor.advance();
            assert_eq!(slot.index, i);
            assert_eq!(slot.starts_page, layout.is_page_start(i), "index {}", i);
            assert_eq!(slot.position, layout.position(i));
            assert_eq!(cursor.current_page(), Some(i / 30));
        }
        assert_eq!(cursor.claimed(), 95);
        assert_eq!(cursor.labels_on_current_page(), 5);
    }

    #[test]
    fn test_cursor_starts_empty() {
        let mut cursor = PageCursor::new(letter());
        assert_eq!(cursor.current_page(), None);
        let first = cursor.advance();
        assert!(first.starts_page);
        assert_eq!(first.position.page, 0);
    }
}
