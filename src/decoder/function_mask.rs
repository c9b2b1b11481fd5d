use super::tables::alignment_pattern_positions;
use crate::models::{BitMatrix, Version};

/// Function module mask for a specific QR version.
/// true = function module (not data), false = data module.
pub struct FunctionMask {
    mask: BitMatrix,
    version: Version,
}

impl FunctionMask {
    /// Mark finder, separator, timing, alignment, format and version modules
    pub fn new(version: Version) -> Self {
        let size = version.size();
        let mut mask = BitMatrix::square(size);

        // Finders plus their one-module separators
        mask.fill_rect(0, 0, 8, 8, true);
        mask.fill_rect(size - 8, 0, 8, 8, true);
        mask.fill_rect(0, size - 8, 8, 8, true);

        // Timing patterns (row 6 and column 6)
        for i in 0..size {
            mask.set(6, i, true);
            mask.set(i, 6, true);
        }

        for (cx, cy) in alignment_centers(version) {
            mask.fill_rect(cx - 2, cy - 2, 5, 5, true);
        }

        // Format info areas; the dark module (8, size - 8) falls inside the second run
        for i in 0..9 {
            mask.set(8, i, true);
            mask.set(i, 8, true);
        }
        for i in 0..8 {
            mask.set(size - 1 - i, 8, true);
            mask.set(8, size - 1 - i, true);
        }

        if version.number() >= 7 {
            mask.fill_rect(size - 11, 0, 3, 6, true);
            mask.fill_rect(0, size - 11, 6, 3, true);
        }

        Self { mask, version }
    }

    /// Symbol width in modules
    pub fn size(&self) -> usize {
        self.mask.width()
    }

    /// Version the mask was built for
    pub fn version(&self) -> Version {
        self.version
    }

    /// True when (x, y) is not a data module
    #[inline]
    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    /// Modules left for codewords and remainder bits
    pub fn data_modules_count(&self) -> usize {
        self.size() * self.size() - self.mask.count_ones()
    }
}

/// Alignment pattern centers (x, y), excluding the three that would overlap finders
pub fn alignment_centers(version: Version) -> Vec<(usize, usize)> {
    let positions = alignment_pattern_positions(version);
    let last = positions.len().saturating_sub(1);
    let mut centers = Vec::new();
    for (i, &cy) in positions.iter().enumerate() {
        for (j, &cx) in positions.iter().enumerate() {
            let corner = (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
            if !corner {
                centers.push((cx, cy));
            }
        }
    }
    centers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::tables::raw_data_modules;

    #[test]
    fn test_data_module_counts_match_capacity() {
        for version in Version::all() {
            let func = FunctionMask::new(version);
            assert_eq!(
                func.data_modules_count(),
                raw_data_modules(version),
                "version {}",
                version.number()
            );
        }
    }

    #[test]
    fn test_alignment_centers() {
        assert!(alignment_centers(Version::MIN).is_empty());
        assert_eq!(alignment_centers(Version::new(2).unwrap()), vec![(18, 18)]);
        assert_eq!(alignment_centers(Version::new(7).unwrap()).len(), 6);
    }
}
