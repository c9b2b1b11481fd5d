//! Mask penalty scoring and selection
use rayon::prelude::*;

use super::matrix_builder::write_format;
use crate::decoder::function_mask::FunctionMask;
use crate::decoder::unmask::unmask;
use crate::models::{BitMatrix, ECLevel, MaskPattern};

const N1: u32 = 3;
const N2: u32 = 3;
const N3: u32 = 40;
const N4: u32 = 10;

/// Apply every mask in parallel and keep the lowest penalty (lowest index on ties)
pub fn choose_mask(
    unmasked: &BitMatrix,
    func: &FunctionMask,
    ec_level: ECLevel,
) -> (MaskPattern, BitMatrix) {
    let mut scored: Vec<(u32, MaskPattern, BitMatrix)> = MaskPattern::ALL
        .par_iter()
        .map(|&mask| {
            let mut candidate = unmasked.clone();
            unmask(&mut candidate, mask, func);
            write_format(&mut candidate, ec_level, mask);
            (penalty(&candidate), mask, candidate)
        })
        .collect();
    scored.sort_by_key(|(score, mask, _)| (*score, *mask));
    let (_, mask, matrix) = scored.swap_remove(0);
    (mask, matrix)
}

/// Total penalty of a finished symbol
pub fn penalty(m: &BitMatrix) -> u32 {
    run_penalty(m) + block_penalty(m) + finder_like_penalty(m) + balance_penalty(m)
}

/// Rows and columns: five or more same-colored modules in a line
fn run_penalty(m: &BitMatrix) -> u32 {
    let size = m.width();
    let mut score = 0;
    for horizontal in [true, false] {
        for a in 0..size {
            let mut run = 0u32;
            let mut color = false;
            for b in 0..size {
                let bit = if horizontal { m.get(b, a) } else { m.get(a, b) };
                if b > 0 && bit == color {
                    run += 1;
                } else {
                    if run >= 5 {
                        score += N1 + run - 5;
                    }
                    run = 1;
                    color = bit;
                }
            }
            if run >= 5 {
                score += N1 + run - 5;
            }
        }
    }
    score
}

fn block_penalty(m: &BitMatrix) -> u32 {
    let size = m.width();
    let mut score = 0;
    for y in 0..size - 1 {
        for x in 0..size - 1 {
            let c = m.get(x, y);
            if c == m.get(x + 1, y) && c == m.get(x, y + 1) && c == m.get(x + 1, y + 1) {
                score += N2;
            }
        }
    }
    score
}

/// 1:1:3:1:1 with four light modules on one side, fully inside the symbol
fn finder_like_penalty(m: &BitMatrix) -> u32 {
    const FORWARD: [bool; 11] = [
        true, false, true, true, true, false, true, false, false, false, false,
    ];
    const BACKWARD: [bool; 11] = [
        false, false, false, false, true, false, true, true, true, false, true,
    ];
    let size = m.width();
    let mut score = 0;
    for a in 0..size {
        for start in 0..size.saturating_sub(10) {
            for horizontal in [true, false] {
                let at = |k: usize| {
                    if horizontal {
                        m.get(start + k, a)
                    } else {
                        m.get(a, start + k)
                    }
                };
                if (0..11).all(|k| at(k) == FORWARD[k]) || (0..11).all(|k| at(k) == BACKWARD[k]) {
                    score += N3;
                }
            }
        }
    }
    score
}

/// Ten points per full 5% the dark share strays from half
fn balance_penalty(m: &BitMatrix) -> u32 {
    let total = (m.width() * m.height()) as u64;
    let dark = m.count_ones() as u64;
    let deviation = (dark * 20).abs_diff(total * 10) / total;
    N4 * deviation as u32
}
