//! Scanline Code 128 decoder.
//!
//! Reads the middle row of a bitmap, converts the bar/space runs to module
//! edges, and decodes symbols with the standard Code 128 table, including
//! start codes A/B/C, code-set switches, SHIFT, and the mod-103 checksum.
//!
//! Module edges are recovered as `floor(offset * modules / width)`, which is
//! exact for bitmaps with at least one pixel per module.

use image::GrayImage;

use crate::error::LabelError;

/// Bar/space widths for symbol values 0..=105.
#[rustfmt::skip]
const PATTERNS: [[u8; 6]; 106] = [
    [2,1,2,2,2,2], [2,2,2,1,2,2], [2,2,2,2,2,1], [1,2,1,2,2,3], [1,2,1,3,2,2],
    [1,3,1,2,2,2], [1,2,2,2,1,3], [1,2,2,3,1,2], [1,3,2,2,1,2], [2,2,1,2,1,3],
    [2,2,1,3,1,2], [2,3,1,2,1,2], [1,1,2,2,3,2], [1,2,2,1,3,2], [1,2,2,2,3,1],
    [1,1,3,2,2,2], [1,2,3,1,2,2], [1,2,3,2,2,1], [2,2,3,2,1,1], [2,2,1,1,3,2],
    [2,2,1,2,3,1], [2,1,3,2,1,2], [2,2,3,1,1,2], [3,1,2,1,3,1], [3,1,1,2,2,2],
    [3,2,1,1,2,2], [3,2,1,2,2,1], [3,1,2,2,1,2], [3,2,2,1,1,2], [3,2,2,2,1,1],
    [2,1,2,1,2,3], [2,1,2,3,2,1], [2,3,2,1,2,1], [1,1,1,3,2,3], [1,3,1,1,2,3],
    [1,3,1,3,2,1], [1,1,2,3,1,3], [1,3,2,1,1,3], [1,3,2,3,1,1], [2,1,1,3,1,3],
    [2,3,1,1,1,3], [2,3,1,3,1,1], [1,1,2,1,3,3], [1,1,2,3,3,1], [1,3,2,1,3,1],
    [1,1,3,1,2,3], [1,1,3,3,2,1], [1,3,3,1,2,1], [3,1,3,1,2,1], [2,1,1,3,3,1],
    [2,3,1,1,3,1], [2,1,3,1,1,3], [2,1,3,3,1,1], [2,1,3,1,3,1], [3,1,1,1,2,3],
    [3,1,1,3,2,1], [3,3,1,1,2,1], [3,1,2,1,1,3], [3,1,2,3,1,1], [3,3,2,1,1,1],
    [3,1,4,1,1,1], [2,2,1,4,1,1], [4,3,1,1,1,1], [1,1,1,2,2,4], [1,1,1,4,2,2],
    [1,2,1,1,2,4], [1,2,1,4,2,1], [1,4,1,1,2,2], [1,4,1,2,2,1], [1,1,2,2,1,4],
    [1,1,2,4,1,2], [1,2,2,1,1,4], [1,2,2,4,1,1], [1,4,2,1,1,2], [1,4,2,2,1,1],
    [2,4,1,2,1,1], [2,2,1,1,1,4], [4,1,3,1,1,1], [2,4,1,1,1,2], [1,3,4,1,1,1],
    [1,1,1,2,4,2], [1,2,1,1,4,2], [1,2,1,2,4,1], [1,1,4,2,1,2], [1,2,4,1,1,2],
    [1,2,4,2,1,1], [4,1,1,2,1,2], [4,2,1,1,1,2], [4,2,1,2,1,1], [2,1,2,1,4,1],
    [2,1,4,1,2,1], [4,1,2,1,2,1], [1,1,1,1,4,3], [1,1,1,3,4,1], [1,3,1,1,4,1],
    [1,1,4,1,1,3], [1,1,4,3,1,1], [4,1,1,1,1,3], [4,1,1,3,1,1], [1,1,3,1,4,1],
    [1,1,4,1,3,1], [3,1,1,1,4,1], [4,1,1,1,3,1], [2,1,1,4,1,2], [2,1,1,2,1,4],
    [2,1,1,2,3,2],
];

const STOP: [u8; 7] = [2, 3, 3, 1, 1, 1, 2];

const START_A: u8 = 103;
const START_B: u8 = 104;
const START_C: u8 = 105;

// Code-set control values.
const SHIFT: u8 = 98;
const CODE_C: u8 = 99;
const CODE_B: u8 = 100;
const CODE_A: u8 = 101;
const FNC1: u8 = 102;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeSet {
    A,
    B,
    C,
}

/// Decode the Code 128 symbol in `image`.
///
/// Fails with [`LabelError::Decode`] when no symbol is found, a pattern is not
/// in the table, the stop pattern is missing, or the checksum does not match.
pub fn decode(image: &GrayImage) -> Result<String, LabelError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(LabelError::Decode("empty image".to_string()));
    }

    let y = height / 2;
    let dark: Vec<bool> = (0..width).map(|x| image.get_pixel(x, y).0[0] < 128).collect();

    let first = dark.iter().position(|&d| d);
    let last = dark.iter().rposition(|&d| d);
    let (Some(first), Some(last)) = (first, last) else {
        return Err(LabelError::Decode("no bars found".to_string()));
    };

    let runs = scan_runs(&dark[first..=last]);
    let values = symbol_values(&runs)?;
    interpret(&values)
}

/// Pixel run lengths, starting with a bar.
fn scan_runs(line: &[bool]) -> Vec<u32> {
    let mut runs = Vec::new();
    let mut current = true;
    let mut run = 0u32;
    for &d in line {
        if d == current {
            run += 1;
        } else {
            runs.push(run);
            current = d;
            run = 1;
        }
    }
    runs.push(run);
    runs
}

/// Convert pixel runs to symbol values (start, data..., checksum), checking
/// the stop pattern and checksum.
fn symbol_values(runs: &[u32]) -> Result<Vec<u8>, LabelError> {
    // start + checksum + stop is the shortest valid symbol
    if runs.len() < 2 * 6 + 7 || (runs.len() - 7) % 6 != 0 {
        return Err(LabelError::Decode(format!(
            "{} bar/space elements do not form a Code 128 symbol",
            runs.len()
        )));
    }

    let symbols = (runs.len() - 7) / 6;
    let modules = (symbols * 11 + 13) as f64;
    let pixels = runs.iter().sum::<u32>() as f64;

    let mut edges = Vec::with_capacity(runs.len() + 1);
    let mut offset = 0u32;
    edges.push(0u32);
    for &run in runs {
        offset += run;
        edges.push((offset as f64 * modules / pixels + 1e-6).floor() as u32);
    }

    let widths: Vec<u8> = edges
        .windows(2)
        .map(|w| w[1].saturating_sub(w[0]).min(u8::MAX as u32) as u8)
        .collect();
    if widths.contains(&0) {
        return Err(LabelError::Decode(
            "bars narrower than one module; raster too coarse".to_string(),
        ));
    }

    let mut values = Vec::with_capacity(symbols);
    for (i, chunk) in widths[..symbols * 6].chunks(6).enumerate() {
        let value = PATTERNS
            .iter()
            .position(|p| p[..] == *chunk)
            .ok_or_else(|| {
                LabelError::Decode(format!("unknown pattern {:?} at symbol {}", chunk, i))
            })?;
        values.push(value as u8);
    }

    if widths[symbols * 6..] != STOP {
        return Err(LabelError::Decode("missing stop pattern".to_string()));
    }

    if !matches!(values[0], START_A | START_B | START_C) {
        return Err(LabelError::Decode(format!(
            "symbol starts with value {}, not a start code",
            values[0]
        )));
    }

    let (checksum, body) = values.split_last().ok_or_else(|| {
        LabelError::Decode("symbol has no checksum".to_string())
    })?;
    let expected = body
        .iter()
        .enumerate()
        .map(|(i, &v)| i.max(1) as u32 * v as u32)
        .sum::<u32>()
        % 103;
    if expected != *checksum as u32 {
        return Err(LabelError::Decode(format!(
            "checksum mismatch: expected {}, found {}",
            expected, checksum
        )));
    }

    Ok(body.to_vec())
}

/// Turn start code + data values into text.
fn interpret(values: &[u8]) -> Result<String, LabelError> {
    let mut set = match values[0] {
        START_A => CodeSet::A,
        START_B => CodeSet::B,
        _ => CodeSet::C,
    };
    let mut shifted = false;
    let mut text = String::new();

    for &value in &values[1..] {
        let active = match (shifted, set) {
            (true, CodeSet::A) => CodeSet::B,
            (true, CodeSet::B) => CodeSet::A,
            (_, s) => s,
        };
        shifted = false;

        match active {
            CodeSet::C => match value {
                0..=99 => text.push_str(&format!("{:02}", value)),
                CODE_B => set = CodeSet::B,
                CODE_A => set = CodeSet::A,
                FNC1 => {}
                _ => return Err(invalid_value(value, active)),
            },
            CodeSet::A => match value {
                0..=63 => text.push((value + 32) as char),
                64..=95 => text.push((value - 64) as char),
                SHIFT => shifted = true,
                CODE_C => set = CodeSet::C,
                CODE_B => set = CodeSet::B,
                // FNC3, FNC2, FNC4, FNC1 carry no text
                96 | 97 | CODE_A | FNC1 => {}
                _ => return Err(invalid_value(value, active)),
            },
            CodeSet::B => match value {
                0..=95 => text.push((value + 32) as char),
                SHIFT => shifted = true,
                CODE_C => set = CodeSet::C,
                CODE_A => set = CodeSet::A,
                96 | 97 | CODE_B | FNC1 => {}
                _ => return Err(invalid_value(value, active)),
            },
        }
    }

    Ok(text)
}

fn invalid_value(value: u8, set: CodeSet) -> LabelError {
    LabelError::Decode(format!("value {} is not valid in code set {:?}", value, set))
}
