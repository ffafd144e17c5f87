//! # Sheet Generation
//!
//! The generation loop: one serial at a time, encode → rasterize → place →
//! draw, opening a new page whenever the layout cursor crosses a page
//! boundary.
//!
//! ```
//! use labelsheet::generate::{GenerateOptions, generate};
//! use labelsheet::serial::SerialRange;
//! use labelsheet::sheet::SheetConfig;
//!
//! let range = SerialRange::new("A", 0, 30)?;
//! let doc = generate(&range, &SheetConfig::LETTER_3X10, &GenerateOptions::default())?;
//! assert_eq!(doc.page_count(), 2);
//! let pdf = doc.finalize()?;
//! # Ok::<(), labelsheet::LabelError>(())
//! ```

use crate::barcode::{self, ModuleFit};
use crate::document::{Document, PageId};
use crate::error::LabelError;
use crate::layout::{GridLayout, PageCursor, Point};
use crate::serial::SerialRange;
use crate::sheet::SheetConfig;

/// Switches for one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Outline every label on every page
    pub debug_grid: bool,
    /// Print the serial text under each barcode
    pub human_readable: bool,
    /// How modules are fitted to the raster width
    pub fit: ModuleFit,
    /// Decode every raster and fail on mismatch
    pub verify: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            debug_grid: false,
            human_readable: true,
            fit: ModuleFit::Stretch,
            verify: false,
        }
    }
}

/// Lay out every serial of `range` into a new document.
///
/// Any failure aborts the whole run; no partial document is returned.
pub fn generate(
    range: &SerialRange,
    config: &SheetConfig,
    options: &GenerateOptions,
) -> Result<Document, LabelError> {
    let layout = GridLayout::try_new(*config)?;
    if options.human_readable {
        config.validate_text()?;
    }

    let mut cursor = PageCursor::new(layout);
    let (raster_width, raster_height) = config.raster_size();

    let title = format!(
        "{}{} - {}{}",
        range.prefix(),
        range.start(),
        range.prefix(),
        range.end()
    );
    let mut doc = Document::new(*config).with_title(title);
    let mut page: Option<PageId> = None;

    tracing::info!(
        prefix = range.prefix(),
        start = range.start(),
        end = range.end(),
        labels = range.len(),
        fit = %options.fit,
        "generating label sheet"
    );

    for serial in range {
        let slot = cursor.advance();

        let current = match page {
            Some(id) if !slot.starts_page => id,
            _ => {
                let id = doc.new_page();
                tracing::debug!(page = id.index() + 1, first = %serial.text, "new page");
                if options.debug_grid {
                    doc.draw_debug_grid(id)?;
                }
                page = Some(id);
                id
            }
        };

        let symbol = barcode::encode(&serial.text)?;
        let image = barcode::rasterize_with(&symbol, raster_width, raster_height, options.fit)?;

        if options.verify {
            let decoded = barcode::decode(&image)?;
            if decoded != serial.text {
                return Err(LabelError::Decode(format!(
                    "raster for {:?} decodes as {:?}",
                    serial.text, decoded
                )));
            }
        }

        let placed = doc.draw_image(current, &serial.text, image, &slot.position)?;

        if options.human_readable {
            let baseline = placed.top_left.y + config.text_baseline();
            doc.draw_text(
                current,
                Point::new(placed.top_left.x, baseline),
                config.text_size,
                &serial.text,
            )?;
        }
    }

    tracing::info!(
        pages = doc.page_count(),
        images = doc.images().len(),
        "label sheet laid out"
    );

    Ok(doc)
}

/// Generate and serialize in one step.
pub fn generate_pdf(
    range: &SerialRange,
    config: &SheetConfig,
    options: &GenerateOptions,
) -> Result<Vec<u8>, LabelError> {
    generate(range, config, options)?.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Primitive;

    fn letter(start: i64, end: i64) -> Document {
        let range = SerialRange::new("A", start, end).unwrap();
        generate(&range, &SheetConfig::LETTER_3X10, &GenerateOptions::default()).unwrap()
    }

    fn texts(doc: &Document, page: usize) -> Vec<String> {
        doc.pages()[page]
            .primitives()
            .iter()
            .filter_map(|p| match p {
                Primitive::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_one_image_and_text_per_label() {
        let doc = letter(0, 29);
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.images().len(), 30);
        assert_eq!(doc.pages()[0].primitives().len(), 60);
        assert_eq!(texts(&doc, 0).first().map(String::as_str), Some("A0"));
        assert_eq!(texts(&doc, 0).last().map(String::as_str), Some("A29"));
    }

    #[test]
    fn test_text_sits_inside_label() {
        let doc = letter(0, 0);
        let config = SheetConfig::LETTER_3X10;
        let baseline = doc.pages()[0]
            .primitives()
            .iter()
            .find_map(|p| match p {
                Primitive::Text { origin, .. } => Some(origin.y),
                _ => None,
            })
            .unwrap();
        assert!(baseline < config.offset_y + config.label_height - config.label_padding);
    }

    #[test]
    fn test_oversized_text_aborts() {
        let range = SerialRange::new("A", 0, 3).unwrap();
        let config = SheetConfig {
            text_size: 14.0,
            ..SheetConfig::LETTER_3X10
        };
        let result = generate(&range, &config, &GenerateOptions::default());
        assert!(matches!(result, Err(LabelError::Config(_))));

        let options = GenerateOptions {
            human_readable: false,
            ..Default::default()
        };
        assert!(generate(&range, &config, &options).is_ok());
    }

    #[test]
    fn test_without_text() {
        let range = SerialRange::new("A", 0, 4).unwrap();
        let options = GenerateOptions {
            human_readable: false,
            ..Default::default()
        };
        let doc = generate(&range, &SheetConfig::LETTER_3X10, &options).unwrap();
        assert!(texts(&doc, 0).is_empty());
        assert_eq!(doc.pages()[0].primitives().len(), 5);
    }

    #[test]
    fn test_debug_grid_on_every_page() {
        let range = SerialRange::new("A", 0, 59).unwrap();
        let options = GenerateOptions {
            debug_grid: true,
            human_readable: false,
            ..Default::default()
        };
        let doc = generate(&range, &SheetConfig::LETTER_3X10, &options).unwrap();
        for page in doc.pages() {
            let lines = page
                .primitives()
                .iter()
                .filter(|p| matches!(p, Primitive::Line { .. }))
                .count();
            assert_eq!(lines, 17);
            // grid is drawn before any label
            assert!(matches!(page.primitives()[0], Primitive::Line { .. }));
        }
    }

    #[test]
    fn test_verify_passes_for_both_fits() {
        let range = SerialRange::new("SN", 95, 130).unwrap();
        for fit in [ModuleFit::Stretch, ModuleFit::Integer] {
            let options = GenerateOptions {
                verify: true,
                fit,
                ..Default::default()
            };
            assert!(generate(&range, &SheetConfig::LETTER_3X10, &options).is_ok());
        }
    }

    #[test]
    fn test_unencodable_prefix_aborts() {
        let range = SerialRange::new("\u{00e9}", 0, 3).unwrap();
        let result = generate(&range, &SheetConfig::LETTER_3X10, &GenerateOptions::default());
        assert!(matches!(result, Err(LabelError::Encoding(_))));
    }

    #[test]
    fn test_invalid_config_aborts() {
        let range = SerialRange::new("A", 0, 3).unwrap();
        let config = SheetConfig {
            rows: 0,
            ..SheetConfig::LETTER_3X10
        };
        let result = generate(&range, &config, &GenerateOptions::default());
        assert!(matches!(result, Err(LabelError::Config(_))));
    }
}
