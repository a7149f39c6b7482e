//! Boundary datagram wire layout.
//!
//! ```text
//! +----------------------------+---------------------------+
//! | label: 32 bytes, NUL-padded | data: one byte per cell  |
//! +----------------------------+---------------------------+
//! ```
//!
//! The data length is not transmitted; the receiver knows it from its
//! own grid dimensions and rejects anything shorter.

use crate::cell::Cell;
use crate::error::DataError;

/// Size of the sender label at the front of every datagram.
pub const LABEL_LEN: usize = 32;

/// One boundary row or column, tagged with the sending node's label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryDatagram {
    label: String,
    data: Vec<Cell>,
}

impl BoundaryDatagram {
    /// Labels longer than [`LABEL_LEN`] bytes are cut at the last char
    /// boundary that fits.
    pub fn new(label: &str, data: Vec<Cell>) -> Self {
        Self {
            label: truncate_label(label).to_string(),
            data,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn data(&self) -> &[Cell] {
        &self.data
    }

    /// Serialized size for a boundary of `data_len` cells.
    #[must_use]
    pub const fn encoded_len(data_len: usize) -> usize {
        LABEL_LEN + data_len
    }

    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; Self::encoded_len(self.data.len())];
        buf[..self.label.len()].copy_from_slice(self.label.as_bytes());
        buf[LABEL_LEN..].copy_from_slice(&self.data);
        buf
    }

    /// Decodes a datagram carrying exactly `expected_len` cells. Trailing
    /// bytes beyond that are ignored.
    pub fn decode(bytes: &[u8], expected_len: usize) -> Result<Self, DataError> {
        let expected = Self::encoded_len(expected_len);
        if bytes.len() < expected {
            return Err(DataError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }

        let raw_label = &bytes[..LABEL_LEN];
        let end = raw_label.iter().position(|&b| b == 0).unwrap_or(LABEL_LEN);
        let label = String::from_utf8_lossy(&raw_label[..end]).into_owned();

        Ok(Self {
            label,
            data: bytes[LABEL_LEN..expected].to_vec(),
        })
    }
}

fn truncate_label(label: &str) -> &str {
    if label.len() <= LABEL_LEN {
        return label;
    }
    let mut end = LABEL_LEN;
    while !label.is_char_boundary(end) {
        end -= 1;
    }
    &label[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_label_then_cells() {
        let dg = BoundaryDatagram::new("tile-a", vec![6, 0, 3]);
        let bytes = dg.encode();
        assert_eq!(bytes.len(), LABEL_LEN + 3);
        assert_eq!(&bytes[..6], b"tile-a");
        assert!(bytes[6..LABEL_LEN].iter().all(|&b| b == 0));
        assert_eq!(&bytes[LABEL_LEN..], &[6, 0, 3]);
    }

    #[test]
    fn test_decode_rejects_short_payload() {
        let bytes = BoundaryDatagram::new("a", vec![1; 10]).encode();
        let err = BoundaryDatagram::decode(&bytes[..bytes.len() - 1], 10).unwrap_err();
        assert_eq!(
            err,
            DataError::Truncated {
                expected: LABEL_LEN + 10,
                actual: LABEL_LEN + 9
            }
        );
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut bytes = BoundaryDatagram::new("a", vec![1, 2]).encode();
        bytes.extend_from_slice(&[9, 9, 9]);
        let dg = BoundaryDatagram::decode(&bytes, 2).unwrap();
        assert_eq!(dg.label(), "a");
        assert_eq!(dg.data(), &[1, 2]);
    }

    #[test]
    fn test_long_label_is_truncated_on_char_boundary() {
        let label = "é".repeat(20); // 40 bytes
        let dg = BoundaryDatagram::new(&label, vec![]);
        assert_eq!(dg.label().len(), 32);
        assert!(dg.encode().len() == LABEL_LEN);
    }
}
