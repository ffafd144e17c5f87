//! # labelsheet - Serial Number Label Sheets
//!
//! labelsheet generates print-ready PDF sheets of Code 128 barcode labels for
//! a contiguous range of serial numbers, laid out for standard adhesive label
//! stock (3 × 10 labels on US Letter by default). It provides:
//!
//! - **Serials**: `prefix + number` for every number in a range
//! - **Barcodes**: Code 128 encoding, rasterization, and a verifying decoder
//! - **Layout**: index → page/row/column and physical position
//! - **Documents**: page assembly, PDF serialization, PNG previews
//!
//! ## Quick Start
//!
//! ```no_run
//! use labelsheet::{
//!     generate::{GenerateOptions, generate},
//!     serial::SerialRange,
//!     sheet::SheetConfig,
//! };
//!
//! // Serials A0 through A59: two full pages
//! let range = SerialRange::new("A", 0, 59)?;
//!
//! // Lay the labels out on letter stock
//! let doc = generate(&range, &SheetConfig::LETTER_3X10, &GenerateOptions::default())?;
//!
//! // Serialize and write
//! std::fs::write("out.pdf", doc.finalize()?)?;
//!
//! # Ok::<(), labelsheet::error::LabelError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`serial`] | Serial ranges and sequencing |
//! | [`barcode`] | Code 128 encode / rasterize / decode |
//! | [`layout`] | Grid placement and pagination |
//! | [`document`] | Pages, PDF output, previews |
//! | [`generate`] | The generation loop |
//! | [`sheet`] | Sheet geometry configurations |
//! | [`error`] | Error types |

pub mod barcode;
pub mod document;
pub mod error;
pub mod generate;
pub mod layout;
pub mod serial;
pub mod sheet;

// Re-exports for convenience
pub use error::LabelError;
pub use sheet::SheetConfig;
