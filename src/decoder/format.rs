//! Format information: error correction level and mask, stored twice
use super::bch;
use crate::models::{BitMatrix, ECLevel, MaskPattern};

/// Cells of the copy wrapped around the top-left finder; entry `i` holds bit `i`
const TOP_LEFT_CELLS: [(usize, usize); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

/// Cell of bit `i` in the copy split between the other two finders
fn split_cell(i: usize, size: usize) -> (usize, usize) {
    if i < 8 {
        (size - 1 - i, 8)
    } else {
        (8, size - 15 + i)
    }
}

/// Error correction level and mask read from the format words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// Error correction level
    pub ec_level: ECLevel,
    /// Data mask
    pub mask_pattern: MaskPattern,
}

impl FormatInfo {
    /// Decode the format words from a sampled symbol (either copy may be damaged)
    pub fn read(matrix: &BitMatrix) -> Option<Self> {
        let size = matrix.width();
        if size < 21 {
            return None;
        }
        let mut first = 0u16;
        let mut second = 0u16;
        for i in 0..15 {
            let (x, y) = TOP_LEFT_CELLS[i];
            first |= (matrix.get(x, y) as u16) << i;
            let (x, y) = split_cell(i, size);
            second |= (matrix.get(x, y) as u16) << i;
        }
        let (ec_level, mask_pattern) = bch::decode_format(&[first, second])?;
        Some(Self {
            ec_level,
            mask_pattern,
        })
    }

    /// Write both copies and the fixed dark module
    pub fn write(&self, matrix: &mut BitMatrix) {
        let size = matrix.width();
        let word = bch::format_code(self.ec_level, self.mask_pattern);
        for i in 0..15 {
            let bit = (word >> i) & 1 == 1;
            let (x, y) = TOP_LEFT_CELLS[i];
            matrix.set(x, y, bit);
            let (x, y) = split_cell(i, size);
            matrix.set(x, y, bit);
        }
        matrix.set(8, size - 8, true);
    }
}
