//! Version information blocks (versions 7-40)
use super::bch;
use crate::models::{BitMatrix, Version};

/// Bit `i * 3 + j` lives at (i, size - 11 + j) and at (size - 11 + j, i)
pub struct VersionInfo;

impl VersionInfo {
    /// Read both 6x3 blocks. `None` for symbols too small to carry them
    /// or when neither block is within the correction radius.
    pub fn read(matrix: &BitMatrix) -> Option<Version> {
        let size = matrix.width();
        if size < 45 {
            return None;
        }
        let mut bottom_left = 0u32;
        let mut top_right = 0u32;
        for i in 0..6 {
            for j in 0..3 {
                let bit = i * 3 + j;
                bottom_left |= (matrix.get(i, size - 11 + j) as u32) << bit;
                top_right |= (matrix.get(size - 11 + j, i) as u32) << bit;
            }
        }
        bch::decode_version(&[top_right, bottom_left])
    }

    /// Write both version blocks (versions 7 and up)
    pub fn write(version: Version, matrix: &mut BitMatrix) {
        if version.number() < 7 {
            return;
        }
        let size = matrix.width();
        let word = bch::version_code(version);
        for i in 0..6 {
            for j in 0..3 {
                let bit = (word >> (i * 3 + j)) & 1 == 1;
                matrix.set(i, size - 11 + j, bit);
                matrix.set(size - 11 + j, i, bit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        for n in [7u8, 12, 25, 40] {
            let version = Version::new(n).unwrap();
            let mut matrix = BitMatrix::square(version.size());
            VersionInfo::write(version, &mut matrix);
            assert_eq!(VersionInfo::read(&matrix), Some(version));
        }
    }

    #[test]
    fn test_small_symbols_have_none() {
        let mut matrix = BitMatrix::square(41);
        VersionInfo::write(Version::new(6).unwrap(), &mut matrix);
        assert_eq!(matrix.count_ones(), 0);
        assert_eq!(VersionInfo::read(&matrix), None);
    }

    #[test]
    fn test_one_damaged_block() {
        let version = Version::new(9).unwrap();
        let mut matrix = BitMatrix::square(version.size());
        VersionInfo::write(version, &mut matrix);
        for i in 0..6 {
            matrix.toggle(i, version.size() - 11);
        }
        assert_eq!(VersionInfo::read(&matrix), Some(version));
    }
}
