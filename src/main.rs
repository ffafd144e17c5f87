//! # labelsheet CLI
//!
//! Command-line interface for generating serial number label sheets.
//!
//! ## Usage
//!
//! ```bash
//! # 30 labels A0..A29 on one letter page
//! labelsheet --prefix A --start 0 --end 29
//!
//! # Custom output path, outlined labels for alignment checks
//! labelsheet --prefix SN- --start 1000 --end 1299 --output sn.pdf --debug-grid
//!
//! # Alternate sheet geometry, verify every barcode, PNG of page 1
//! labelsheet --prefix X --end 99 --sheet avery.json --verify --preview page1.png
//! ```

use clap::Parser;
use std::path::PathBuf;

use labelsheet::{
    LabelError, SheetConfig,
    barcode::ModuleFit,
    document::preview,
    generate::{GenerateOptions, generate},
    serial::SerialRange,
};
use tracing_subscriber::EnvFilter;

/// labelsheet - Code 128 serial number label sheets
#[derive(Parser, Debug)]
#[command(name = "labelsheet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Prefix that will be prepended to the serial number
    #[arg(long, default_value = "")]
    prefix: String,

    /// Where to start the serial number sequence
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    start: i64,

    /// Where to end the serial number sequence (inclusive)
    #[arg(long, allow_negative_numbers = true)]
    end: Option<i64>,

    /// Output PDF file
    #[arg(long, short, value_name = "FILE", default_value = "out.pdf")]
    output: PathBuf,

    /// Sheet geometry JSON (defaults to 3 x 10 labels on US Letter)
    #[arg(long, value_name = "FILE")]
    sheet: Option<PathBuf>,

    /// Outline every label
    #[arg(long)]
    debug_grid: bool,

    /// Omit the human-readable serial under each barcode
    #[arg(long)]
    no_text: bool,

    /// Module fitting: stretch (fill the box) or integer (whole-pixel modules)
    #[arg(long, default_value = "stretch")]
    fit: ModuleFit,

    /// Decode every barcode after rendering and fail on mismatch
    #[arg(long)]
    verify: bool,

    /// Also save the first page as a PNG preview
    #[arg(long, value_name = "FILE")]
    preview: Option<PathBuf>,

    /// Preview resolution in pixels per inch
    #[arg(long, default_value = "150")]
    preview_dpi: f32,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), LabelError> {
    let cli = Cli::parse();

    if cli.prefix.is_empty() {
        tracing::warn!("No prefix has been specified. Only the serial number will be used.");
    }

    let end = cli.end.ok_or_else(|| {
        LabelError::InvalidRange("a valid end for the serial number must be specified (--end)".to_string())
    })?;
    let range = SerialRange::new(cli.prefix, cli.start, end)?;

    let config = match &cli.sheet {
        Some(path) => SheetConfig::from_json_file(path)?,
        None => SheetConfig::LETTER_3X10,
    };

    let options = GenerateOptions {
        debug_grid: cli.debug_grid,
        human_readable: !cli.no_text,
        fit: cli.fit,
        verify: cli.verify,
    };

    let doc = generate(&range, &config, &options)?;

    if let (Some(path), Some(page)) = (&cli.preview, doc.page_id(0)) {
        let png = preview::render_page(&doc, page, cli.preview_dpi)?;
        preview::save_png(&png, path)?;
        println!("Saved preview to {}", path.display());
    }

    let pages = doc.page_count();
    let bytes = doc.finalize()?;
    std::fs::write(&cli.output, &bytes)?;
    println!(
        "Wrote {} labels on {} page(s) to {} ({} bytes)",
        range.len(),
        pages,
        cli.output.display(),
        bytes.len()
    );

    Ok(())
}
