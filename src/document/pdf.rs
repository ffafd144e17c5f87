//! PDF serialization.
//!
//! Writes one PDF page per [`Page`](super::Page), in order. Barcode rasters
//! become 8-bit DeviceGray image XObjects (Flate compressed, interpolation
//! off so bars stay sharp), text uses the standard Helvetica font, and lines
//! are hairlines.
//!
//! ```text
//! 1 Catalog ─▶ 2 Pages ─▶ page, page, ...
//! 3 Helvetica   4 Info   5.. images   then page + content pairs
//! ```

use std::collections::BTreeSet;
use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use super::{Document, Primitive};
use crate::error::LabelError;
use crate::layout::Point;
use crate::sheet::SheetConfig;

/// Stroke width of debug grid lines, in points
const LINE_WIDTH: f32 = 0.5;

const FONT_NAME: &[u8] = b"F1";

const PRODUCER: &str = concat!("labelsheet ", env!("CARGO_PKG_VERSION"));

/// Serialize `doc` into PDF bytes.
///
/// The document is expected to have passed [`Document::validate`].
pub fn write(doc: &Document) -> Result<Vec<u8>, LabelError> {
    let config = doc.config();
    let page_width = SheetConfig::to_points(config.page_width);
    let page_height = SheetConfig::to_points(config.page_height);

    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let pages_id = alloc.bump();
    let font_id = alloc.bump();
    let info_id = alloc.bump();

    let mut pdf = Pdf::new();

    pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

    {
        let mut info = pdf.document_info(info_id);
        info.producer(TextStr(PRODUCER));
        if let Some(title) = doc.title() {
            info.title(TextStr(title));
        }
    }

    let mut image_refs = Vec::with_capacity(doc.images().len());
    for resource in doc.images() {
        let (width, height) = resource.image.dimensions();
        let data = deflate(resource.image.as_raw())?;
        let image_id = alloc.bump();

        let mut xobj = pdf.image_xobject(image_id, &data);
        xobj.filter(Filter::FlateDecode);
        xobj.width(width as i32);
        xobj.height(height as i32);
        xobj.color_space().device_gray();
        xobj.bits_per_component(8);
        xobj.interpolate(false);
        drop(xobj);

        image_refs.push(image_id);
    }

    // Converts sheet inches (top-left origin) to PDF points (bottom-left).
    let to_pdf = |p: Point| -> (f32, f32) {
        (
            SheetConfig::to_points(p.x),
            page_height - SheetConfig::to_points(p.y),
        )
    };

    let mut page_ids = Vec::with_capacity(doc.page_count());
    for (page_index, page) in doc.pages().iter().enumerate() {
        let page_id = alloc.bump();
        let content_id = alloc.bump();
        page_ids.push(page_id);

        let mut content = Content::new();
        content.set_line_width(LINE_WIDTH);

        for primitive in page.primitives() {
            match primitive {
                Primitive::Line { from, to } => {
                    let (x1, y1) = to_pdf(*from);
                    let (x2, y2) = to_pdf(*to);
                    content.move_to(x1, y1);
                    content.line_to(x2, y2);
                    content.stroke();
                }
                Primitive::Image {
                    image,
                    top_left,
                    width,
                    height,
                } => {
                    if image_refs.get(image.index()).is_none() {
                        return Err(LabelError::Serialization(format!(
                            "page {} references unknown image {}",
                            page_index + 1,
                            image.index()
                        )));
                    }
                    let (x, top) = to_pdf(*top_left);
                    let w = SheetConfig::to_points(*width);
                    let h = SheetConfig::to_points(*height);
                    let name = image_name(image.index());
                    content.save_state();
                    content.transform([w, 0.0, 0.0, h, x, top - h]);
                    content.x_object(Name(name.as_bytes()));
                    content.restore_state();
                }
                Primitive::Text { origin, size, text } => {
                    let (x, y) = to_pdf(*origin);
                    content.begin_text();
                    content.set_font(Name(FONT_NAME), *size);
                    content.next_line(x, y);
                    content.show(Str(text.as_bytes()));
                    content.end_text();
                }
            }
        }

        let compressed = deflate(&content.finish())?;
        pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);

        let used: BTreeSet<usize> = page.images().map(|id| id.index()).collect();

        let mut pdf_page = pdf.page(page_id);
        pdf_page
            .media_box(Rect::new(0.0, 0.0, page_width, page_height))
            .parent(pages_id)
            .contents(content_id);
        let mut resources = pdf_page.resources();
        resources.fonts().pair(Name(FONT_NAME), font_id);
        if !used.is_empty() {
            let mut x_objects = resources.x_objects();
            for index in used {
                let name = image_name(index);
                x_objects.pair(Name(name.as_bytes()), image_refs[index]);
            }
        }
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    tracing::debug!(
        pages = page_ids.len(),
        images = image_refs.len(),
        "serialized PDF"
    );

    Ok(pdf.finish())
}

fn image_name(index: usize) -> String {
    format!("Im{}", index + 1)
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, LabelError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| LabelError::Serialization(format!("compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| LabelError::Serialization(format!("compression failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::GridLayout;
    use flate2::read::ZlibDecoder;
    use image::{GrayImage, Luma};
    use std::io::Read;

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    fn two_page_document() -> Document {
        let config = SheetConfig::LETTER_3X10;
        let layout = GridLayout::new(config);
        let mut doc = Document::new(config).with_title("test sheet");
        for (i, key) in ["A0", "A1"].iter().enumerate() {
            let page = doc.new_page();
            let image = GrayImage::from_pixel(144, 36, Luma([0]));
            doc.draw_image(page, key, image, &layout.position(i * 30)).unwrap();
        }
        doc
    }

    #[test]
    fn test_header_and_trailer() {
        let bytes = write(&two_page_document()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.ends_with(b"%%EOF\n") || bytes.ends_with(b"%%EOF"));
    }

    #[test]
    fn test_page_tree() {
        let bytes = write(&two_page_document()).unwrap();
        assert_eq!(count(&bytes, b"/Count 2"), 1);
        assert_eq!(count(&bytes, b"/Subtype /Image"), 2);
        assert_eq!(count(&bytes, b"/Helvetica"), 1);
    }

    #[test]
    fn test_shared_image_embedded_once() {
        let config = SheetConfig::LETTER_3X10;
        let layout = GridLayout::new(config);
        let mut doc = Document::new(config);
        let page = doc.new_page();
        for i in 0..3 {
            let image = GrayImage::from_pixel(144, 36, Luma([0]));
            doc.draw_image(page, "same", image, &layout.position(i)).unwrap();
        }
        let bytes = write(&doc).unwrap();
        assert_eq!(count(&bytes, b"/Subtype /Image"), 1);
    }

    #[test]
    fn test_deflate_round_trip() {
        let data = b"0 0 m 10 10 l S".repeat(20);
        let compressed = deflate(&data).unwrap();
        let mut decoder = ZlibDecoder::new(&compressed[..]);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
    }
}
