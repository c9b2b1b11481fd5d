//! Alignment pattern search for QR versions 2+
//!
//! Alignment patterns are a single dark module inside a light ring inside a
//! dark ring, so a row through the middle reads light:dark:light in 1:1:1.

use crate::models::{BitMatrix, Point};

/// Modules around the estimated position that are searched
const SEARCH_ALLOWANCE: f32 = 4.0;

/// Find the alignment pattern nearest `estimate`
pub fn find_alignment_pattern(
    matrix: &BitMatrix,
    estimate: Point,
    module_size: f32,
) -> Option<Point> {
    if module_size < 1.0 {
        return None;
    }
    let reach = SEARCH_ALLOWANCE * module_size;
    let left = (estimate.x - reach).max(0.0) as usize;
    let right = ((estimate.x + reach) as usize).min(matrix.width().saturating_sub(1));
    let top = (estimate.y - reach).max(0.0) as usize;
    let bottom = ((estimate.y + reach) as usize).min(matrix.height().saturating_sub(1));
    if right <= left || bottom <= top || ((right - left) as f32) < module_size * 3.0 {
        return None;
    }

    let middle = (top + bottom) / 2;
    let rows = bottom - top + 1;
    let mut best: Option<(f32, Point)> = None;

    // Rows from the middle outward: middle, middle+1, middle-1, ...
    for k in 0..rows {
        let offset = (k as isize + 1) / 2;
        let y = if k % 2 == 0 {
            middle as isize + offset
        } else {
            middle as isize - offset
        };
        if y < top as isize || y > bottom as isize {
            continue;
        }
        for center in scan_row(matrix, y as usize, left, right, module_size) {
            let distance = center.distance_squared(&estimate);
            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, center));
            }
        }
        // A hit on the first few rows is as good as it gets
        if best.is_some() && k >= 2 {
            break;
        }
    }

    best.map(|(_, p)| p)
}

fn scan_row(
    matrix: &BitMatrix,
    y: usize,
    left: usize,
    right: usize,
    module_size: f32,
) -> Vec<Point> {
    let mut found = Vec::new();
    // Runs of [light, dark, light]
    let mut state = [0usize; 3];
    let mut current = 0usize;
    let mut x = left;

    // Skip a partial leading dark run
    while x <= right && matrix.get(x, y) {
        x += 1;
    }

    while x <= right {
        let dark = matrix.get(x, y);
        match (current, dark) {
            (0, false) | (1, true) | (2, false) => state[current] += 1,
            (0, true) => {
                current = 1;
                state[1] += 1;
            }
            (1, false) => {
                current = 2;
                state[2] += 1;
            }
            _ => {
                // Dark pixel closes a light:dark:light window
                if let Some(center) = check(matrix, &state, x, y, module_size) {
                    found.push(center);
                }
                state = [state[2], 1, 0];
                current = 1;
            }
        }
        x += 1;
    }
    if current == 2 {
        if let Some(center) = check(matrix, &state, x, y, module_size) {
            found.push(center);
        }
    }
    found
}

fn check(
    matrix: &BitMatrix,
    state: &[usize; 3],
    end: usize,
    y: usize,
    module_size: f32,
) -> Option<Point> {
    if !found_pattern_cross(state, module_size) {
        return None;
    }
    let center_x = end as f32 - state[2] as f32 - state[1] as f32 / 2.0;
    let total: usize = state.iter().sum();
    let center_y = cross_check_vertical(matrix, y, center_x as usize, 2 * state[1], total, module_size)?;
    Some(Point::new(center_x, center_y))
}

fn found_pattern_cross(state: &[usize; 3], module_size: f32) -> bool {
    let max_variance = module_size / 2.0;
    state
        .iter()
        .all(|&c| c > 0 && (module_size - c as f32).abs() < max_variance)
}

fn cross_check_vertical(
    matrix: &BitMatrix,
    start_y: usize,
    x: usize,
    max_count: usize,
    original_total: usize,
    module_size: f32,
) -> Option<f32> {
    let height = matrix.height();
    let mut state = [0usize; 3];

    let mut y = start_y as isize;
    while y >= 0 && matrix.get(x, y as usize) && state[1] <= max_count {
        state[1] += 1;
        y -= 1;
    }
    if y < 0 || state[1] > max_count {
        return None;
    }
    while y >= 0 && !matrix.get(x, y as usize) && state[0] <= max_count {
        state[0] += 1;
        y -= 1;
    }
    if state[0] > max_count {
        return None;
    }

    let mut y = start_y + 1;
    while y < height && matrix.get(x, y) && state[1] <= max_count {
        state[1] += 1;
        y += 1;
    }
    if y == height || state[1] > max_count {
        return None;
    }
    while y < height && !matrix.get(x, y) && state[2] <= max_count {
        state[2] += 1;
        y += 1;
    }
    if state[2] > max_count {
        return None;
    }

    let total: usize = state.iter().sum();
    if 5 * total.abs_diff(original_total) >= 2 * original_total {
        return None;
    }
    found_pattern_cross(&state, module_size)
        .then(|| y as f32 - state[2] as f32 - state[1] as f32 / 2.0)
}
