//! PNG page previews.
//!
//! Rasterizes the lines and barcode images of one page at a chosen
//! resolution, for checking alignment without a PDF viewer. Text primitives
//! are not rendered.

use std::path::Path;

use image::{GrayImage, Luma};

use super::{Document, PageId, Primitive};
use crate::error::LabelError;
use crate::layout::Point;

const BLACK: Luma<u8> = Luma([0]);
const WHITE: Luma<u8> = Luma([255]);

/// Render one page of `doc` at `dpi` pixels per inch.
pub fn render_page(doc: &Document, page: PageId, dpi: f32) -> Result<GrayImage, LabelError> {
    if !(dpi.is_finite() && dpi > 0.0) {
        return Err(LabelError::Render(format!("preview dpi must be positive, got {}", dpi)));
    }
    let page_data = doc.page(page).ok_or_else(|| {
        LabelError::Render(format!("page {} does not exist", page.index() + 1))
    })?;

    let config = doc.config();
    let width = (config.page_width * dpi).round() as u32;
    let height = (config.page_height * dpi).round() as u32;
    let mut canvas = GrayImage::from_pixel(width.max(1), height.max(1), WHITE);

    for primitive in page_data.primitives() {
        match primitive {
            Primitive::Line { from, to } => draw_line(&mut canvas, *from, *to, dpi),
            Primitive::Image {
                image,
                top_left,
                width,
                height,
            } => {
                let resource = doc.image(*image).ok_or_else(|| {
                    LabelError::Render(format!("unknown image {}", image.index()))
                })?;
                blit_scaled(&mut canvas, &resource.image, *top_left, *width, *height, dpi);
            }
            Primitive::Text { .. } => {}
        }
    }

    Ok(canvas)
}

/// Save a preview as PNG.
pub fn save_png(image: &GrayImage, path: &Path) -> Result<(), LabelError> {
    image
        .save(path)
        .map_err(|e| LabelError::Image(format!("Failed to save PNG: {}", e)))
}

fn draw_line(canvas: &mut GrayImage, from: Point, to: Point, dpi: f32) {
    let (x0, y0) = (from.x * dpi, from.y * dpi);
    let (x1, y1) = (to.x * dpi, to.y * dpi);
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as u32;

    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = (x0 + (x1 - x0) * t).round() as i64;
        let y = (y0 + (y1 - y0) * t).round() as i64;
        put(canvas, x, y);
    }
}

/// Nearest-neighbour scale `src` into the box at `top_left`.
fn blit_scaled(canvas: &mut GrayImage, src: &GrayImage, top_left: Point, width: f32, height: f32, dpi: f32) {
    let x0 = (top_left.x * dpi).round() as i64;
    let y0 = (top_left.y * dpi).round() as i64;
    let w = (width * dpi).round().max(1.0) as u32;
    let h = (height * dpi).round().max(1.0) as u32;
    let (src_w, src_h) = src.dimensions();
    if src_w == 0 || src_h == 0 {
        return;
    }

    for dy in 0..h {
        let sy = (dy as u64 * src_h as u64 / h as u64) as u32;
        for dx in 0..w {
            let sx = (dx as u64 * src_w as u64 / w as u64) as u32;
            if src.get_pixel(sx, sy).0[0] < 128 {
                put(canvas, x0 + dx as i64, y0 + dy as i64);
            }
        }
    }
}

fn put(canvas: &mut GrayImage, x: i64, y: i64) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, BLACK);
    }
}
