//! # Serial Sequencer
//!
//! Produces the ordered, finite list of serial identifiers printed on a sheet:
//! `prefix + decimal(value)` for every value in `[start, end]`.
//!
//! ```
//! use labelsheet::serial::SerialRange;
//!
//! let range = SerialRange::new("A", 8, 10)?;
//! let texts: Vec<String> = range.iter().map(|s| s.text).collect();
//! assert_eq!(texts, ["A8", "A9", "A10"]);
//! # Ok::<(), labelsheet::LabelError>(())
//! ```

use crate::error::LabelError;

/// An inclusive, validated range of serial numbers sharing one prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialRange {
    prefix: String,
    start: i64,
    end: i64,
}

impl SerialRange {
    /// Validate and build a range.
    ///
    /// Fails with [`LabelError::InvalidRange`] when `end` is negative or
    /// `start > end`.
    pub fn new(prefix: impl Into<String>, start: i64, end: i64) -> Result<Self, LabelError> {
        if end < 0 {
            return Err(LabelError::InvalidRange(format!(
                "a valid end for the serial number must be specified (got {})",
                end
            )));
        }
        if start > end {
            return Err(LabelError::InvalidRange(format!(
                "the end of the serial number series ({}) must not be before the start ({})",
                end, start
            )));
        }
        if end.checked_sub(start).and_then(|d| d.checked_add(1)).is_none() {
            return Err(LabelError::InvalidRange(format!(
                "range {}..={} is too large",
                start, end
            )));
        }
        Ok(Self {
            prefix: prefix.into(),
            start,
            end,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of serials in the range (always at least one)
    pub fn len(&self) -> u64 {
        (self.end - self.start) as u64 + 1
    }

    /// Always false; a valid range holds at least one serial
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Serial text for a zero-based offset into the range
    pub fn text_at(&self, index: u64) -> Option<String> {
        if index >= self.len() {
            return None;
        }
        Some(format!("{}{}", self.prefix, self.start + index as i64))
    }

    /// Iterate over every serial in order
    pub fn iter(&self) -> Serials<'_> {
        Serials {
            range: self,
            next: 0,
        }
    }
}

impl<'a> IntoIterator for &'a SerialRange {
    type Item = Serial;
    type IntoIter = Serials<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One serial identifier of a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Serial {
    /// Zero-based offset within the range (`value - start`)
    pub index: u64,
    /// Numeric part
    pub value: i64,
    /// `prefix + value`, the text encoded into the barcode
    pub text: String,
}

/// Iterator over a [`SerialRange`].
#[derive(Debug, Clone)]
pub struct Serials<'a> {
    range: &'a SerialRange,
    next: u64,
}

impl Iterator for Serials<'_> {
    type Item = Serial;

    fn next(&mut self) -> Option<Serial> {
        let index = self.next;
        let text = self.range.text_at(index)?;
        self.next += 1;
        Some(Serial {
            index,
            value: self.range.start + index as i64,
            text,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.range.len().saturating_sub(self.next);
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_serial_text() {
        let range = SerialRange::new("A", 0, 29).unwrap();
        let serials: Vec<Serial> = range.iter().collect();
        assert_eq!(serials.len(), 30);
        assert_eq!(serials[0].text, "A0");
        assert_eq!(serials[29].text, "A29");
        for (i, s) in serials.iter().enumerate() {
            assert_eq!(s.index, i as u64);
            assert_eq!(s.text, format!("A{}", i));
        }
    }

    #[test]
    fn test_offset_start() {
        let range = SerialRange::new("SN-", 998, 1001).unwrap();
        let texts: Vec<String> = range.iter().map(|s| s.text).collect();
        assert_eq!(texts, ["SN-998", "SN-999", "SN-1000", "SN-1001"]);
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn test_no_zero_padding() {
        let range = SerialRange::new("", 7, 7).unwrap();
        assert_eq!(range.text_at(0).as_deref(), Some("7"));
        assert_eq!(range.text_at(1), None);
    }

    #[test]
    fn test_pairwise_distinct() {
        let range = SerialRange::new("X", 0, 999).unwrap();
        let unique: HashSet<String> = range.iter().map(|s| s.text).collect();
        assert_eq!(unique.len(), 1000);
    }

    #[test]
    fn test_single_serial() {
        let range = SerialRange::new("A", 5, 5).unwrap();
        let serials: Vec<Serial> = range.iter().collect();
        assert_eq!(serials.len(), 1);
        assert_eq!(serials[0].index, 0);
        assert_eq!(serials[0].value, 5);
    }

    #[test]
    fn test_negative_end_rejected() {
        assert!(matches!(
            SerialRange::new("A", 0, -1),
            Err(LabelError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_reversed_range_rejected() {
        assert!(matches!(
            SerialRange::new("A", 5, 3),
            Err(LabelError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_huge_range_rejected() {
        assert!(matches!(
            SerialRange::new("A", i64::MIN, i64::MAX),
            Err(LabelError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_exact_size_hint() {
        let range = SerialRange::new("A", 10, 19).unwrap();
        let mut iter = range.iter();
        assert_eq!(iter.size_hint(), (10, Some(10)));
        iter.next();
        assert_eq!(iter.size_hint(), (9, Some(9)));
    }
}
