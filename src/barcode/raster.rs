//! Module runs → grayscale bitmap.
//!
//! Bars are black (0), spaces white (255). Every row of the bitmap is the
//! same; the symbol runs edge to edge horizontally unless [`ModuleFit::Integer`]
//! leaves margins.

use std::fmt;
use std::str::FromStr;

use image::{GrayImage, Luma};

use super::encode::BarcodeSymbol;
use crate::error::LabelError;

const BLACK: Luma<u8> = Luma([0]);
const WHITE: Luma<u8> = Luma([255]);

/// How modules are mapped onto pixel columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleFit {
    /// Column `x` shows module `x * modules / width`. The symbol always spans
    /// the full width; bar widths vary by up to one pixel. Requires
    /// `width >= modules`.
    #[default]
    Stretch,
    /// Every module is the same whole number of pixels, centered in the
    /// bitmap. Requires `width >= modules`.
    Integer,
}

impl FromStr for ModuleFit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stretch" => Ok(Self::Stretch),
            "integer" => Ok(Self::Integer),
            other => Err(format!(
                "unknown module fit '{}' (expected 'stretch' or 'integer')",
                other
            )),
        }
    }
}

impl fmt::Display for ModuleFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stretch => f.write_str("stretch"),
            Self::Integer => f.write_str("integer"),
        }
    }
}

/// Rasterize a symbol, stretching it uniformly to `width` × `height` pixels.
pub fn rasterize(symbol: &BarcodeSymbol, width: u32, height: u32) -> Result<GrayImage, LabelError> {
    rasterize_with(symbol, width, height, ModuleFit::Stretch)
}

/// Rasterize a symbol to `width` × `height` pixels.
///
/// Fails with [`LabelError::Render`] when either dimension is zero, or when
/// the symbol has more modules than `width` has pixels. Below one pixel per
/// module whole bars would be dropped and the raster would not scan.
pub fn rasterize_with(
    symbol: &BarcodeSymbol,
    width: u32,
    height: u32,
    fit: ModuleFit,
) -> Result<GrayImage, LabelError> {
    if width == 0 || height == 0 {
        return Err(LabelError::Render(format!(
            "cannot rasterize {:?} into {}x{} px",
            symbol.data(),
            width,
            height
        )));
    }

    let modules = symbol.modules();
    let count = modules.len() as u64;
    if count == 0 {
        return Err(LabelError::Render(format!("{:?} has no modules", symbol.data())));
    }

    if count > width as u64 {
        return Err(LabelError::Render(format!(
            "{:?} is {} modules wide, box is {} px wide",
            symbol.data(),
            count,
            width
        )));
    }

    let row: Vec<Luma<u8>> = match fit {
        ModuleFit::Stretch => (0..width as u64)
            .map(|x| {
                let module = (x * count / width as u64) as usize;
                if modules[module] { BLACK } else { WHITE }
            })
            .collect(),
        ModuleFit::Integer => {
            // count <= width, so every module gets at least one pixel
            let factor = width as u64 / count;
            let margin = (width as u64 - count * factor) / 2;
            (0..width as u64)
                .map(|x| {
                    if x < margin || x >= margin + count * factor {
                        return WHITE;
                    }
                    let module = ((x - margin) / factor) as usize;
                    if modules[module] { BLACK } else { WHITE }
                })
                .collect()
        }
    };

    Ok(GrayImage::from_fn(width, height, |x, _| row[x as usize]))
}
