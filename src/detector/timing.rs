//! Timing pattern validation on a sampled grid

use crate::models::BitMatrix;

/// Fraction of timing modules that must alternate as expected
const MIN_TIMING_AGREEMENT: f32 = 0.6;

/// Check row 6 and column 6 between the finders: dark on even indices.
///
/// A wrong dimension guess samples the timing line out of phase and fails
/// this check quickly.
pub fn timing_pattern_ok(grid: &BitMatrix) -> bool {
    let size = grid.width();
    if size < 21 {
        return false;
    }
    let span = 8..size - 8;
    let total = span.len() as f32;
    let horizontal = span.clone().filter(|&i| grid.get(i, 6) == (i % 2 == 0)).count() as f32;
    let vertical = span.filter(|&i| grid.get(6, i) == (i % 2 == 0)).count() as f32;
    horizontal / total >= MIN_TIMING_AGREEMENT && vertical / total >= MIN_TIMING_AGREEMENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_pattern() {
        let mut grid = BitMatrix::square(25);
        for i in (8..17).step_by(2) {
            grid.set(i, 6, true);
            grid.set(6, i, true);
        }
        assert!(timing_pattern_ok(&grid));
        // One flipped module is tolerated
        grid.toggle(9, 6);
        assert!(timing_pattern_ok(&grid));
        assert!(!timing_pattern_ok(&BitMatrix::square(25)));
    }
}
