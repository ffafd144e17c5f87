//! # Label Documents
//!
//! A [`Document`] collects drawing primitives page by page and serializes
//! them once, at the end of a run.
//!
//! ## Coordinates
//!
//! All primitives use sheet coordinates: inches from the top-left corner of
//! the page, y growing downwards. The PDF writer flips them into PDF user
//! space.
//!
//! ## Example
//!
//! ```
//! use labelsheet::barcode::{encode, rasterize};
//! use labelsheet::document::Document;
//! use labelsheet::layout::GridLayout;
//! use labelsheet::sheet::SheetConfig;
//!
//! let config = SheetConfig::LETTER_3X10;
//! let layout = GridLayout::new(config);
//! let mut doc = Document::new(config);
//!
//! let page = doc.new_page();
//! let image = rasterize(&encode("A0")?, 144, 36)?;
//! doc.draw_image(page, "A0", image, &layout.position(0))?;
//!
//! let pdf = doc.finalize()?;
//! assert!(pdf.starts_with(b"%PDF-"));
//! # Ok::<(), labelsheet::LabelError>(())
//! ```
//!
//! ## Modules
//!
//! - [`pdf`]: PDF serialization
//! - [`preview`]: PNG page previews

pub mod pdf;
pub mod preview;

use std::collections::HashMap;

use image::GrayImage;

use crate::error::LabelError;
use crate::layout::{LabelPosition, Point};
use crate::sheet::SheetConfig;

/// Handle to a page of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(usize);

impl PageId {
    /// Zero-based page number
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to an embedded image of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(usize);

impl ImageId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A drawing operation on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Hairline from `from` to `to`
    Line { from: Point, to: Point },
    /// Embedded image stretched over a box
    Image {
        image: ImageId,
        top_left: Point,
        width: f32,
        height: f32,
    },
    /// Single line of Helvetica text; `origin` is the left end of the baseline
    Text {
        origin: Point,
        size: f32,
        text: String,
    },
}

/// One page: primitives in drawing order.
#[derive(Debug, Clone, Default)]
pub struct Page {
    primitives: Vec<Primitive>,
}

impl Page {
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Images placed on this page, in drawing order
    pub fn images(&self) -> impl Iterator<Item = ImageId> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Image { image, .. } => Some(*image),
            _ => None,
        })
    }
}

/// An image registered with a document.
#[derive(Debug, Clone)]
pub struct ImageResource {
    /// Registration key (the serial the image encodes)
    pub key: String,
    pub image: GrayImage,
}

/// Where [`Document::draw_image`] put an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedImage {
    pub image: ImageId,
    pub top_left: Point,
    pub width: f32,
    pub height: f32,
}

impl PlacedImage {
    /// Bottom edge of the image box
    pub fn bottom(&self) -> f32 {
        self.top_left.y + self.height
    }
}

/// Append-only, multi-page label document.
#[derive(Debug, Clone)]
pub struct Document {
    config: SheetConfig,
    title: Option<String>,
    pages: Vec<Page>,
    images: Vec<ImageResource>,
    image_keys: HashMap<String, ImageId>,
}

impl Document {
    pub fn new(config: SheetConfig) -> Self {
        Self {
            config,
            title: None,
            pages: Vec::new(),
            images: Vec::new(),
            image_keys: HashMap::new(),
        }
    }

    /// Set the document title written to the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.get(id.0)
    }

    /// Handle for the page at a zero-based index
    pub fn page_id(&self, index: usize) -> Option<PageId> {
        (index < self.pages.len()).then_some(PageId(index))
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn images(&self) -> &[ImageResource] {
        &self.images
    }

    pub fn image(&self, id: ImageId) -> Option<&ImageResource> {
        self.images.get(id.0)
    }

    /// Append a blank page of the configured size.
    pub fn new_page(&mut self) -> PageId {
        self.pages.push(Page::default());
        PageId(self.pages.len() - 1)
    }

    /// Register `image` under `key`.
    ///
    /// Registration is idempotent: a key that is already registered keeps
    /// its first image and returns the same id.
    pub fn register_image(&mut self, key: &str, image: GrayImage) -> ImageId {
        if let Some(&id) = self.image_keys.get(key) {
            return id;
        }
        let id = ImageId(self.images.len());
        self.images.push(ImageResource {
            key: key.to_string(),
            image,
        });
        self.image_keys.insert(key.to_string(), id);
        id
    }

    /// Look up a registered image by key
    pub fn image_id(&self, key: &str) -> Option<ImageId> {
        self.image_keys.get(key).copied()
    }

    /// Place a registered image `width` wide with its aspect ratio preserved.
    pub fn place_image(
        &mut self,
        page: PageId,
        image: ImageId,
        top_left: Point,
        width: f32,
    ) -> Result<PlacedImage, LabelError> {
        let resource = self.image(image).ok_or_else(|| {
            LabelError::Serialization(format!("image {} is not registered", image.0))
        })?;
        let (px_width, px_height) = resource.image.dimensions();
        if px_width == 0 || px_height == 0 {
            return Err(LabelError::Render(format!(
                "image {:?} is empty",
                resource.key
            )));
        }
        let height = width * px_height as f32 / px_width as f32;

        self.page_mut(page)?.primitives.push(Primitive::Image {
            image,
            top_left,
            width,
            height,
        });

        Ok(PlacedImage {
            image,
            top_left,
            width,
            height,
        })
    }

    /// Register `image` under `key` and place it in the printable box of the
    /// label at `position`.
    pub fn draw_image(
        &mut self,
        page: PageId,
        key: &str,
        image: GrayImage,
        position: &LabelPosition,
    ) -> Result<PlacedImage, LabelError> {
        let id = self.register_image(key, image);
        let width = self.config.printable_width();
        self.place_image(page, id, position.content_top_left, width)
    }

    /// Draw a single line of text with its baseline starting at `origin`.
    pub fn draw_text(
        &mut self,
        page: PageId,
        origin: Point,
        size: f32,
        text: &str,
    ) -> Result<(), LabelError> {
        self.page_mut(page)?.primitives.push(Primitive::Text {
            origin,
            size,
            text: text.to_string(),
        });
        Ok(())
    }

    pub fn draw_line(&mut self, page: PageId, from: Point, to: Point) -> Result<(), LabelError> {
        self.page_mut(page)?.primitives.push(Primitive::Line { from, to });
        Ok(())
    }

    /// Outline the label grid for alignment checks.
    ///
    /// Vertical lines at both edges of every column span the page height;
    /// horizontal lines at every row boundary span the page width.
    pub fn draw_debug_grid(&mut self, page: PageId) -> Result<(), LabelError> {
        let c = self.config;

        for col in 0..c.columns {
            let left = c.offset_x + col as f32 * c.column_pitch();
            let right = left + c.label_width;
            for x in [left, right] {
                self.draw_line(page, Point::new(x, 0.0), Point::new(x, c.page_height))?;
            }
        }

        for row in 0..=c.rows {
            let y = c.offset_y + row as f32 * c.label_height;
            self.draw_line(page, Point::new(0.0, y), Point::new(c.page_width, y))?;
        }

        Ok(())
    }

    /// Check that the document can be serialized.
    ///
    /// Fails when there are no pages, a page is empty, or a registered image
    /// is never placed.
    pub fn validate(&self) -> Result<(), LabelError> {
        if self.pages.is_empty() {
            return Err(LabelError::Serialization("document has no pages".to_string()));
        }

        if let Some(i) = self.pages.iter().position(Page::is_empty) {
            return Err(LabelError::Serialization(format!("page {} has no content", i + 1)));
        }

        let mut placed = vec![false; self.images.len()];
        for page in &self.pages {
            for id in page.images() {
                if let Some(slot) = placed.get_mut(id.0) {
                    *slot = true;
                }
            }
        }
        if let Some(i) = placed.iter().position(|&p| !p) {
            return Err(LabelError::Serialization(format!(
                "image {:?} was registered but never placed",
                self.images[i].key
            )));
        }

        Ok(())
    }

    /// Serialize every page, in order, into PDF bytes.
    pub fn finalize(self) -> Result<Vec<u8>, LabelError> {
        self.validate()?;
        pdf::write(&self)
    }

    fn page_mut(&mut self, id: PageId) -> Result<&mut Page, LabelError> {
        let count = self.pages.len();
        self.pages.get_mut(id.0).ok_or_else(|| {
            LabelError::Serialization(format!(
                "page {} does not exist (document has {})",
                id.0 + 1,
                count
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::GridLayout;
    use image::Luma;

    fn letter() -> Document {
        Document::new(SheetConfig::LETTER_3X10)
    }

    fn bitmap() -> GrayImage {
        GrayImage::from_pixel(144, 36, Luma([0]))
    }

    #[test]
    fn test_new_page_appends() {
        let mut doc = letter();
        let a = doc.new_page();
        let b = doc.new_page();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_draw_image_fills_printable_width() {
        let mut doc = letter();
        let layout = GridLayout::new(*doc.config());
        let page = doc.new_page();
        let placed = doc.draw_image(page, "A0", bitmap(), &layout.position(4)).unwrap();

        assert!((placed.width - 2.375).abs() < 1e-6);
        assert!((placed.height - 2.375 / 4.0).abs() < 1e-6);
        assert_eq!(placed.top_left, layout.position(4).content_top_left);
        assert!(placed.bottom() < layout.position(4).label_top_left.y + 1.0);
    }

    #[test]
    fn test_registration_is_idempotent() {
        let mut doc = letter();
        let layout = GridLayout::new(*doc.config());
        let page = doc.new_page();
        let first = doc.draw_image(page, "A0", bitmap(), &layout.position(0)).unwrap();
        let second = doc.draw_image(page, "A0", bitmap(), &layout.position(1)).unwrap();
        assert_eq!(first.image, second.image);
        assert_eq!(doc.images().len(), 1);
        assert_eq!(doc.page(page).unwrap().images().count(), 2);
        assert_eq!(doc.image_id("A0"), Some(first.image));
    }

    #[test]
    fn test_debug_grid_lines() {
        let mut doc = letter();
        let page = doc.new_page();
        doc.draw_debug_grid(page).unwrap();
        let prims = doc.page(page).unwrap().primitives();
        // 2 edges per column, 11 row boundaries
        assert_eq!(prims.len(), 3 * 2 + 11);

        let first = &prims[0];
        assert_eq!(
            *first,
            Primitive::Line {
                from: Point::new(0.1875, 0.0),
                to: Point::new(0.1875, 11.0)
            }
        );
        let last = &prims[prims.len() - 1];
        assert_eq!(
            *last,
            Primitive::Line {
                from: Point::new(0.0, 10.5),
                to: Point::new(8.5, 10.5)
            }
        );
    }

    #[test]
    fn test_finalize_rejects_empty_document() {
        assert!(matches!(letter().finalize(), Err(LabelError::Serialization(_))));
    }

    #[test]
    fn test_finalize_rejects_empty_page() {
        let mut doc = letter();
        let page = doc.new_page();
        doc.draw_text(page, Point::new(1.0, 1.0), 7.0, "A0").unwrap();
        doc.new_page();
        assert!(matches!(doc.finalize(), Err(LabelError::Serialization(_))));
    }

    #[test]
    fn test_finalize_rejects_unplaced_image() {
        let mut doc = letter();
        let page = doc.new_page();
        doc.draw_debug_grid(page).unwrap();
        doc.register_image("orphan", bitmap());
        assert!(matches!(doc.finalize(), Err(LabelError::Serialization(_))));
    }

    #[test]
    fn test_unknown_page_rejected() {
        let mut doc = letter();
        let mut other = letter();
        other.new_page();
        let foreign = other.new_page();
        doc.new_page();
        assert!(doc.draw_line(foreign, Point::default(), Point::default()).is_err());
    }

    #[test]
    fn test_finalize_produces_pdf() {
        let mut doc = letter().with_title("A0-A0");
        let layout = GridLayout::new(*doc.config());
        let page = doc.new_page();
        doc.draw_image(page, "A0", bitmap(), &layout.position(0)).unwrap();
        let bytes = doc.finalize().unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
