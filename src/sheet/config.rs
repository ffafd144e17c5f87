//! # Sheet Configuration
//!
//! This module defines the physical geometry of an adhesive label sheet.
//!
//! ## Built-in Sheets
//!
//! | Sheet | Page | Grid | Label | Barcode box |
//! |-------|------|------|-------|-------------|
//! | LETTER_3X10 | 8.5 × 11 in | 3 × 10 | 2.625 × 1 in | 2.0 × 0.5 in |
//!
//! ## Usage
//!
//! ```
//! use labelsheet::sheet::SheetConfig;
//!
//! let config = SheetConfig::LETTER_3X10;
//! println!("{} labels per page, raster {:?} px",
//!          config.labels_per_page(),
//!          config.raster_size());
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::LabelError;

/// PDF user-space units per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Gap between the bottom of the barcode and the top of its text, in inches
pub const TEXT_GAP: f32 = 0.03;

/// Helvetica descender depth as a fraction of the font size (AFM: -207)
const HELVETICA_DESCENT: f32 = 0.207;

// Small tolerance: sheet dimensions are decimal fractions of an inch.
const EPSILON: f32 = 1e-4;

/// # Sheet Configuration
///
/// Defines the page and label geometry of a sheet of adhesive labels.
/// All lengths are in inches; the top-left corner of the page is the origin
/// and y grows downwards.
///
/// ## Label Geometry
///
/// ```text
/// offset_x
/// ├──┤
/// ┌──┬──────────────┬──┬──────────────┬──┬──────────────┐  ┬ offset_y
/// │  │ label (0,0)  │  │ label (0,1)  │  │ label (0,2)  │  ┴
/// │  │  ┌────────┐  │  │              │  │              │
/// │  │  │ ||||| │  │  │              │  │              │   label_height
/// │  │  └────────┘  │  │              │  │              │
/// │  ├──────────────┤  ├──────────────┤  ├──────────────┤
///       label_width  label_margin
/// ```
///
/// The barcode box only fixes the raster's pixel size (and therefore its
/// aspect ratio); on the page the raster is scaled to the label's printable
/// width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Page width
    pub page_width: f32,

    /// Page height
    pub page_height: f32,

    /// Width of one label
    pub label_width: f32,

    /// Height of one label (rows are stacked with no gap)
    pub label_height: f32,

    /// Horizontal gap between label columns
    pub label_margin: f32,

    /// Padding between the label edge and its content
    pub label_padding: f32,

    /// Left edge of the first label column
    pub offset_x: f32,

    /// Top edge of the first label row
    pub offset_y: f32,

    /// Label columns per page
    pub columns: usize,

    /// Label rows per page
    pub rows: usize,

    /// Width of the barcode raster box
    pub barcode_width: f32,

    /// Height of the barcode raster box
    pub barcode_height: f32,

    /// Raster pixels per inch of barcode box
    pub raster_dpi: f32,

    /// Font size of the human-readable serial, in points
    pub text_size: f32,
}

impl SheetConfig {
    /// # US Letter, 3 × 10 Address Labels
    ///
    /// 30 labels per page, 1" × 2⅝" each.
    ///
    /// ## Print Area
    ///
    /// ```text
    /// ├ 3/16" ┼── 2⅝" ──┼ 1/8" ┼── 2⅝" ──┼ 1/8" ┼── 2⅝" ──┼ 3/16" ┤
    /// ```
    pub const LETTER_3X10: Self = Self {
        page_width: 8.5,
        page_height: 11.0,
        label_width: 2.625,
        label_height: 1.0,
        label_margin: 0.125,
        label_padding: 0.125,
        offset_x: 0.1875,
        offset_y: 0.5,
        columns: 3,
        rows: 10,
        barcode_width: 2.0,
        barcode_height: 0.5,
        raster_dpi: 72.0,
        text_size: 7.0,
    };

    /// Load a sheet from a JSON file. Missing fields fall back to
    /// [`SheetConfig::LETTER_3X10`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LabelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| LabelError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the geometry describes a usable sheet.
    pub fn validate(&self) -> Result<(), LabelError> {
        let lengths = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("label_width", self.label_width),
            ("label_height", self.label_height),
            ("barcode_width", self.barcode_width),
            ("barcode_height", self.barcode_height),
            ("raster_dpi", self.raster_dpi),
            ("text_size", self.text_size),
        ];
        for (name, value) in lengths {
            if !(value.is_finite() && value > 0.0) {
                return Err(LabelError::Config(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        for (name, value) in [
            ("label_margin", self.label_margin),
            ("label_padding", self.label_padding),
            ("offset_x", self.offset_x),
            ("offset_y", self.offset_y),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LabelError::Config(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        if self.columns == 0 || self.rows == 0 {
            return Err(LabelError::Config(format!(
                "grid must have at least one column and row, got {}x{}",
                self.columns, self.rows
            )));
        }
        if self.columns.checked_mul(self.rows).is_none() {
            return Err(LabelError::Config(format!(
                "grid of {}x{} labels is too large",
                self.columns, self.rows
            )));
        }

        if self.printable_width() <= 0.0 {
            return Err(LabelError::Config(format!(
                "label_padding {} leaves no printable width in a {} wide label",
                self.label_padding, self.label_width
            )));
        }

        let (width, height) = self.raster_size();
        if width == 0 || height == 0 {
            return Err(LabelError::Config(format!(
                "barcode box rasterizes to {}x{} px",
                width, height
            )));
        }

        if self.barcode_placed_height() > self.printable_height() + EPSILON {
            return Err(LabelError::Config(format!(
                "barcode is {} in tall when scaled to the label, only {} in is printable",
                self.barcode_placed_height(),
                self.printable_height()
            )));
        }

        if self.grid_width() > self.page_width + EPSILON {
            return Err(LabelError::Config(format!(
                "{} columns need {} in but the page is {} in wide",
                self.columns,
                self.grid_width(),
                self.page_width
            )));
        }
        if self.grid_height() > self.page_height + EPSILON {
            return Err(LabelError::Config(format!(
                "{} rows need {} in but the page is {} in tall",
                self.rows,
                self.grid_height(),
                self.page_height
            )));
        }

        Ok(())
    }

    /// Check that the human-readable serial fits under the barcode.
    ///
    /// Only needed when text is drawn; call after [`SheetConfig::validate`].
    pub fn validate_text(&self) -> Result<(), LabelError> {
        let bottom = self.text_baseline() + HELVETICA_DESCENT * self.text_size / POINTS_PER_INCH;
        if bottom > self.printable_height() + EPSILON {
            return Err(LabelError::Config(format!(
                "{} pt text reaches {} in below the label padding, only {} in is printable",
                self.text_size,
                bottom,
                self.printable_height()
            )));
        }
        Ok(())
    }

    /// Labels that fit on one page
    ///
    /// Saturates for grids that [`SheetConfig::validate`] rejects.
    #[inline]
    pub fn labels_per_page(&self) -> usize {
        self.columns.saturating_mul(self.rows)
    }

    /// Width available for content inside one label
    #[inline]
    pub fn printable_width(&self) -> f32 {
        self.label_width - 2.0 * self.label_padding
    }

    /// Height available for content inside one label
    #[inline]
    pub fn printable_height(&self) -> f32 {
        self.label_height - 2.0 * self.label_padding
    }

    /// Height of the barcode once scaled to the printable width
    pub fn barcode_placed_height(&self) -> f32 {
        let (width, height) = self.raster_size();
        if width == 0 {
            return 0.0;
        }
        self.printable_width() * height as f32 / width as f32
    }

    /// Baseline of the human-readable serial, measured down from the top of
    /// the printable area. The full em size is treated as ascent.
    pub fn text_baseline(&self) -> f32 {
        self.barcode_placed_height() + TEXT_GAP + self.text_size / POINTS_PER_INCH
    }

    /// Distance between the left edges of adjacent columns
    #[inline]
    pub fn column_pitch(&self) -> f32 {
        self.label_width + self.label_margin
    }

    /// Right edge of the last column, measured from the page's left edge
    pub fn grid_width(&self) -> f32 {
        self.offset_x
            + self.columns as f32 * self.label_width
            + (self.columns.saturating_sub(1)) as f32 * self.label_margin
    }

    /// Bottom edge of the last row, measured from the page's top edge
    pub fn grid_height(&self) -> f32 {
        self.offset_y + self.rows as f32 * self.label_height
    }

    /// Pixel size of the barcode raster (width, height)
    ///
    /// ## Example
    ///
    /// ```
    /// use labelsheet::sheet::SheetConfig;
    ///
    /// assert_eq!(SheetConfig::LETTER_3X10.raster_size(), (144, 36));
    /// ```
    pub fn raster_size(&self) -> (u32, u32) {
        (
            (self.barcode_width * self.raster_dpi).round() as u32,
            (self.barcode_height * self.raster_dpi).round() as u32,
        )
    }

    /// Convert inches to PDF points
    #[inline]
    pub fn to_points(inches: f32) -> f32 {
        inches * POINTS_PER_INCH
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self::LETTER_3X10
    }
}
