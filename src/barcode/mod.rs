//! # Code 128 Barcodes
//!
//! Turns serial text into scannable bitmaps and back.
//!
//! ## Pipeline
//!
//! ```text
//! "A29" ──encode──▶ BarcodeSymbol ──rasterize──▶ GrayImage ──decode──▶ "A29"
//!                   (module runs)                (144 × 36 px)
//! ```
//!
//! ## Modules
//!
//! - [`encode`]: serial text → bar/space module runs (via `barcoders`)
//! - [`raster`]: module runs → bitmap of a requested pixel size
//! - [`decode`]: scanline decoder used to verify rendered bitmaps
//!
//! ## Example
//!
//! ```
//! use labelsheet::barcode::{decode, encode, rasterize};
//!
//! let symbol = encode("A29")?;
//! let image = rasterize(&symbol, 144, 36)?;
//! assert_eq!(decode(&image)?, "A29");
//! # Ok::<(), labelsheet::LabelError>(())
//! ```

pub mod decode;
pub mod encode;
pub mod raster;

pub use decode::decode;
pub use encode::{BarcodeSymbol, MAX_PAYLOAD_LEN, encode};
pub use raster::{ModuleFit, rasterize, rasterize_with};
