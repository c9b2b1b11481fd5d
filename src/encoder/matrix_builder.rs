//! Function pattern drawing for a fresh symbol
use crate::decoder::format::FormatInfo;
use crate::decoder::function_mask::alignment_centers;
use crate::decoder::version::VersionInfo;
use crate::models::{BitMatrix, ECLevel, MaskPattern, Version};

/// Draw finders, timing lines, alignment patterns and version blocks.
///
/// Format cells are left for [`write_format`] once the mask is known.
pub fn base_matrix(version: Version) -> BitMatrix {
    let size = version.size();
    let mut matrix = BitMatrix::square(size);

    for (x, y) in [(0, 0), (size - 7, 0), (0, size - 7)] {
        draw_finder(&mut matrix, x, y);
    }

    for i in 8..size - 8 {
        let dark = i % 2 == 0;
        matrix.set(i, 6, dark);
        matrix.set(6, i, dark);
    }

    for (cx, cy) in alignment_centers(version) {
        matrix.fill_rect(cx - 2, cy - 2, 5, 5, true);
        matrix.fill_rect(cx - 1, cy - 1, 3, 3, false);
        matrix.set(cx, cy, true);
    }

    VersionInfo::write(version, &mut matrix);
    matrix
}

fn draw_finder(matrix: &mut BitMatrix, left: usize, top: usize) {
    matrix.fill_rect(left, top, 7, 7, true);
    matrix.fill_rect(left + 1, top + 1, 5, 5, false);
    matrix.fill_rect(left + 2, top + 2, 3, 3, true);
}

/// Both format copies plus the dark module
pub fn write_format(matrix: &mut BitMatrix, ec_level: ECLevel, mask_pattern: MaskPattern) {
    FormatInfo {
        ec_level,
        mask_pattern,
    }
    .write(matrix);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::timing::timing_pattern_ok;

    #[test]
    fn test_base_matrix_version_one() {
        let m = base_matrix(Version::MIN);
        assert_eq!(m.width(), 21);
        // Finder rings and separators
        assert!(m.get(0, 0) && m.get(6, 6) && m.get(3, 3));
        assert!(!m.get(1, 1) && !m.get(7, 7) && !m.get(7, 0));
        assert!(m.get(14, 0) && m.get(0, 14));
        assert!(timing_pattern_ok(&m));
    }

    #[test]
    fn test_alignment_and_version_blocks() {
        let version = Version::new(7).unwrap();
        let m = base_matrix(version);
        // Alignment at (22, 22): dark center, light ring, dark ring
        assert!(m.get(22, 22) && !m.get(21, 22) && m.get(20, 22));
        assert_eq!(VersionInfo::read(&m), Some(version));
    }
}
