//! Run-length views of scan lines and width-pattern matching
use crate::models::BitMatrix;

/// Run lengths of one row, alternating light/dark and starting with light.
///
/// `runs[0]` is zero when the row starts dark, so bars always sit at odd
/// indices.
pub fn row_runs(matrix: &BitMatrix, y: usize, reversed: bool) -> Vec<usize> {
    let width = matrix.width();
    let pixel = |i: usize| {
        if reversed {
            matrix.get(width - 1 - i, y)
        } else {
            matrix.get(i, y)
        }
    };
    let mut runs = vec![0usize];
    let mut dark = false;
    for i in 0..width {
        let p = pixel(i);
        if p != dark {
            runs.push(0);
            dark = p;
        }
        if let Some(last) = runs.last_mut() {
            *last += 1;
        }
    }
    runs
}

/// Average deviation of `counters` from `pattern` relative to the total
/// width, or infinity if one element strays further than
/// `max_individual_variance` units
pub fn pattern_match_variance(counters: &[usize], pattern: &[u8], max_individual_variance: f32) -> f32 {
    let total: usize = counters.iter().sum();
    let pattern_length: usize = pattern.iter().take(counters.len()).map(|&p| p as usize).sum();
    if total < pattern_length || pattern_length == 0 {
        // Fewer than one pixel per module
        return f32::INFINITY;
    }
    let unit = total as f32 / pattern_length as f32;
    let max_individual = max_individual_variance * unit;

    let mut total_variance = 0.0;
    for (&counter, &p) in counters.iter().zip(pattern) {
        let variance = (counter as f32 - p as f32 * unit).abs();
        if variance > max_individual {
            return f32::INFINITY;
        }
        total_variance += variance;
    }
    total_variance / total as f32
}

/// Expand module widths (first element a bar) into dark/light modules
pub fn widths_to_modules(widths: &[u8], out: &mut Vec<bool>) {
    for (i, &w) in widths.iter().enumerate() {
        let dark = i % 2 == 0;
        out.extend(std::iter::repeat_n(dark, w as usize));
    }
}

/// Index of the best table entry below `max_average`
pub fn best_match<'a>(
    counters: &[usize],
    table: impl IntoIterator<Item = &'a [u8]>,
    max_average: f32,
    max_individual: f32,
) -> Option<usize> {
    let mut best: Option<(f32, usize)> = None;
    for (i, pattern) in table.into_iter().enumerate() {
        let variance = pattern_match_variance(counters, pattern, max_individual);
        if variance < max_average && best.is_none_or(|(v, _)| variance < v) {
            best = Some((variance, i));
        }
    }
    best.map(|(_, i)| i)
}

/// GS1 mod-10 check digit over ASCII digits (weights 3, 1 from the right)
pub fn mod10_check_digit(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| (d - b'0') as u32 * if i % 2 == 0 { 3 } else { 1 })
        .sum();
    b'0' + ((10 - sum % 10) % 10) as u8
}

/// Runs of a clean rendering at `unit` px per module with a 10-module quiet zone
#[cfg(test)]
pub(crate) fn runs_of(modules: &[bool], unit: usize) -> Vec<usize> {
    let mut runs = vec![10 * unit];
    let mut dark = false;
    for &m in modules {
        if m != dark {
            runs.push(0);
            dark = m;
        }
        if let Some(last) = runs.last_mut() {
            *last += unit;
        }
    }
    if dark {
        runs.push(10 * unit);
    } else if let Some(last) = runs.last_mut() {
        *last += 10 * unit;
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_runs() {
        let mut m = BitMatrix::new(10, 1);
        m.fill_rect(2, 0, 3, 1, true);
        m.set(7, 0, true);
        assert_eq!(row_runs(&m, 0, false), vec![2, 3, 2, 1, 2]);
        assert_eq!(row_runs(&m, 0, true), vec![2, 1, 2, 3, 2]);

        let mut m = BitMatrix::new(4, 1);
        m.set(0, 0, true);
        assert_eq!(row_runs(&m, 0, false), vec![0, 1, 3]);
    }

    #[test]
    fn test_pattern_match_variance() {
        assert_eq!(pattern_match_variance(&[2, 2, 4], &[1, 1, 2], 0.7), 0.0);
        assert!(pattern_match_variance(&[2, 2, 9], &[1, 1, 2], 0.7).is_infinite());
        assert!(pattern_match_variance(&[1, 1], &[2, 2], 0.7).is_infinite());
    }

    #[test]
    fn test_widths_to_modules() {
        let mut out = Vec::new();
        widths_to_modules(&[2, 1, 1], &mut out);
        assert_eq!(out, vec![true, true, false, true]);
    }

    #[test]
    fn test_mod10_check_digit() {
        assert_eq!(mod10_check_digit(b"400638133393"), b'1');
        assert_eq!(mod10_check_digit(b"03600029145"), b'2');
        assert_eq!(mod10_check_digit(b"9638507"), b'4');
    }
}
