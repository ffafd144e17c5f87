//! Serial text → Code 128 module runs.
//!
//! Uses the barcoders crate for the symbology itself. Serials are encoded in
//! character set B, which covers every printable ASCII character, with runs
//! of digits packed in pairs into character set C wherever that makes the
//! symbol narrower.

use std::ops::Range;

use barcoders::sym::code128::Code128;

use crate::error::LabelError;

/// Longest serial accepted by [`encode`].
pub const MAX_PAYLOAD_LEN: usize = 48;

/// barcoders selects the Code 128 character set with a leading marker
/// character: Set A (À), Set B (Ɓ), Set C (Ć).
const CHARSET_B: char = '\u{0181}';
const CHARSET_C: char = '\u{0106}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Charset {
    B,
    C,
}

impl Charset {
    fn marker(self) -> char {
        match self {
            Self::B => CHARSET_B,
            Self::C => CHARSET_C,
        }
    }
}

/// An encoded Code 128 symbol.
///
/// Stored as run lengths in modules, alternating bar/space and starting with
/// a bar: start code, data, checksum, and stop pattern. No quiet zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeSymbol {
    data: String,
    elements: Vec<u8>,
}

impl BarcodeSymbol {
    /// The text this symbol encodes
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Bar/space run lengths, in modules
    pub fn elements(&self) -> &[u8] {
        &self.elements
    }

    /// Total width in modules
    pub fn module_count(&self) -> usize {
        self.elements.iter().map(|&w| w as usize).sum()
    }

    /// One entry per module: true = bar (black), false = space (white)
    pub fn modules(&self) -> Vec<bool> {
        let mut modules = Vec::with_capacity(self.module_count());
        for (i, &width) in self.elements.iter().enumerate() {
            let is_bar = i % 2 == 0;
            modules.extend(std::iter::repeat_n(is_bar, width as usize));
        }
        modules
    }
}

/// Encode a serial as a Code 128 symbol.
///
/// Fails with [`LabelError::Encoding`] for empty serials, serials longer than
/// [`MAX_PAYLOAD_LEN`], and characters outside printable ASCII.
pub fn encode(serial: &str) -> Result<BarcodeSymbol, LabelError> {
    if serial.is_empty() {
        return Err(LabelError::Encoding("cannot encode an empty serial".to_string()));
    }

    if serial.len() > MAX_PAYLOAD_LEN {
        return Err(LabelError::Encoding(format!(
            "serial {:?} is {} characters long (max {})",
            serial,
            serial.len(),
            MAX_PAYLOAD_LEN
        )));
    }

    if let Some(c) = serial.chars().find(|c| !(' '..='~').contains(c)) {
        return Err(LabelError::Encoding(format!(
            "serial {:?} contains {:?}, which Code 128 set B cannot encode",
            serial, c
        )));
    }

    let mut prefixed_data = String::with_capacity(serial.len() + 8);
    for (set, text) in segments(serial) {
        prefixed_data.push(set.marker());
        prefixed_data.push_str(text);
    }
    let barcode = Code128::new(&prefixed_data)
        .map_err(|e| LabelError::Encoding(format!("serial {:?}: {}", serial, e)))?;

    let elements = run_lengths(&barcode.encode());
    if elements.is_empty() {
        return Err(LabelError::Encoding(format!(
            "serial {:?} produced no bars",
            serial
        )));
    }

    Ok(BarcodeSymbol {
        data: serial.to_string(),
        elements,
    })
}

/// Split `serial` into character set runs.
///
/// A digit run goes to set C when pairing its digits saves more symbols than
/// the code-set switches around it cost: every side of the set C run that
/// borders set B text costs one switch symbol. An odd digit left over stays
/// in set B, on a side that already borders set B text.
fn segments(serial: &str) -> Vec<(Charset, &str)> {
    let bytes = serial.as_bytes();
    let mut ranges: Vec<(Charset, Range<usize>)> = Vec::new();

    let mut i = 0;
    while i < bytes.len() {
        let start = i;
        let digits = bytes[i].is_ascii_digit();
        while i < bytes.len() && bytes[i].is_ascii_digit() == digits {
            i += 1;
        }
        if !digits {
            push_range(&mut ranges, Charset::B, start..i);
            continue;
        }

        let at_start = start == 0;
        let at_end = i == bytes.len();
        let (lead, trail) = match ((i - start) % 2, at_start) {
            (0, _) => (0, 0),
            (_, true) => (0, 1),
            (_, false) => (1, 0),
        };
        let paired = i - start - lead - trail;
        let switches = usize::from(!at_start || lead > 0) + usize::from(!at_end || trail > 0);

        if paired > 2 * switches {
            push_range(&mut ranges, Charset::B, start..start + lead);
            push_range(&mut ranges, Charset::C, start + lead..i - trail);
            push_range(&mut ranges, Charset::B, i - trail..i);
        } else {
            push_range(&mut ranges, Charset::B, start..i);
        }
    }

    ranges
        .into_iter()
        .map(|(set, range)| (set, &serial[range]))
        .collect()
}

/// Append `range`, merging it into the previous run when the set matches.
fn push_range(ranges: &mut Vec<(Charset, Range<usize>)>, set: Charset, range: Range<usize>) {
    if range.is_empty() {
        return;
    }
    if let Some((last, previous)) = ranges.last_mut() {
        if *last == set {
            previous.end = range.end;
            return;
        }
    }
    ranges.push((set, range));
}

/// Collapse a 0/1 module vector into run lengths beginning with a bar.
fn run_lengths(modules: &[u8]) -> Vec<u8> {
    let first = modules.iter().position(|&m| m == 1);
    let last = modules.iter().rposition(|&m| m == 1);
    let (Some(first), Some(last)) = (first, last) else {
        return Vec::new();
    };

    let mut elements = Vec::new();
    let mut current = 1u8;
    let mut run = 0u8;
    for &module in &modules[first..=last] {
        if module == current {
            run += 1;
        } else {
            elements.push(run);
            current = module;
            run = 1;
        }
    }
    elements.push(run);
    elements
}
