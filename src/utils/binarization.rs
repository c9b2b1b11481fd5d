//! Block-adaptive binarization
//!
//! The frame is cut into 8x8 blocks. Each block gets a threshold from its
//! own mean when it has contrast, or from its neighbours when it is flat.
//! Those thresholds are smoothed over a 5x5 block window and then bilinearly
//! interpolated between block centers, so neighbouring blocks never produce
//! a visible seam.

use crate::models::{BitMatrix, LuminanceImage};

const BLOCK_SIZE: usize = 8;
/// Blocks whose spread is at most this are treated as flat.
const MIN_DYNAMIC_RANGE: u16 = 24;
const SMOOTHING_RADIUS: isize = 2;

/// Binarize a luminance frame. `true` = dark (foreground).
///
/// Zero-area input yields an empty matrix.
pub fn adaptive_binarize(image: &LuminanceImage) -> BitMatrix {
    adaptive_binarize_raw(image.data(), image.width(), image.height())
}

/// Binarize a raw row-major luminance buffer of `width * height` samples
pub fn adaptive_binarize_raw(gray: &[u8], width: usize, height: usize) -> BitMatrix {
    let mut binary = BitMatrix::new(width, height);
    if width == 0 || height == 0 || gray.len() < width * height {
        return binary;
    }

    let blocks_x = width.div_ceil(BLOCK_SIZE);
    let blocks_y = height.div_ceil(BLOCK_SIZE);
    let raw = block_thresholds(gray, width, height, blocks_x, blocks_y);
    let thresholds = smooth_thresholds(&raw, blocks_x, blocks_y);

    let columns: Vec<Knot> = (0..width).map(|x| Knot::locate(x, blocks_x)).collect();
    for y in 0..height {
        let row_knot = Knot::locate(y, blocks_y);
        let upper = &thresholds[row_knot.lo * blocks_x..(row_knot.lo + 1) * blocks_x];
        let lower = &thresholds[row_knot.hi * blocks_x..(row_knot.hi + 1) * blocks_x];
        let row = &gray[y * width..(y + 1) * width];
        for (x, col) in columns.iter().enumerate() {
            let top = lerp(upper[col.lo], upper[col.hi], col.t);
            let bottom = lerp(lower[col.lo], lower[col.hi], col.t);
            let threshold = top + (bottom - top) * row_knot.t;
            if (row[x] as f32) <= threshold {
                binary.set(x, y, true);
            }
        }
    }

    binary
}

/// Interpolation position of one pixel coordinate between two block centers
#[derive(Clone, Copy)]
struct Knot {
    lo: usize,
    hi: usize,
    t: f32,
}

impl Knot {
    fn locate(pixel: usize, blocks: usize) -> Self {
        let max = (blocks - 1) as f32;
        let pos = ((pixel as f32 + 0.5) / BLOCK_SIZE as f32 - 0.5).clamp(0.0, max);
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(blocks - 1);
        Self {
            lo,
            hi,
            t: pos - lo as f32,
        }
    }
}

#[inline]
fn lerp(a: u16, b: u16, t: f32) -> f32 {
    a as f32 + (b as f32 - a as f32) * t
}

fn block_thresholds(
    gray: &[u8],
    width: usize,
    height: usize,
    blocks_x: usize,
    blocks_y: usize,
) -> Vec<u16> {
    let mut thresholds = vec![0u16; blocks_x * blocks_y];

    for by in 0..blocks_y {
        let y0 = by * BLOCK_SIZE;
        let y1 = (y0 + BLOCK_SIZE).min(height);
        for bx in 0..blocks_x {
            let x0 = bx * BLOCK_SIZE;
            let x1 = (x0 + BLOCK_SIZE).min(width);

            let mut min = u16::MAX;
            let mut max = 0u16;
            let mut sum = 0u32;
            for y in y0..y1 {
                for &v in &gray[y * width + x0..y * width + x1] {
                    let v = v as u16;
                    min = min.min(v);
                    max = max.max(v);
                    sum += v as u32;
                }
            }
            let count = ((y1 - y0) * (x1 - x0)) as u32;

            let threshold = if max - min > MIN_DYNAMIC_RANGE {
                (sum / count) as u16
            } else {
                // Flat block: assume background unless the neighbours say
                // this is the inside of a large dark area.
                let mut t = min / 2;
                if bx > 0 && by > 0 {
                    let up = thresholds[(by - 1) * blocks_x + bx];
                    let left = thresholds[by * blocks_x + bx - 1];
                    let diag = thresholds[(by - 1) * blocks_x + bx - 1];
                    let neighbours = (up + 2 * left + diag) / 4;
                    if min < neighbours {
                        t = neighbours;
                    }
                }
                t
            };
            thresholds[by * blocks_x + bx] = threshold;
        }
    }

    thresholds
}

fn smooth_thresholds(raw: &[u16], blocks_x: usize, blocks_y: usize) -> Vec<u16> {
    let mut out = vec![0u16; raw.len()];
    for by in 0..blocks_y as isize {
        for bx in 0..blocks_x as isize {
            let mut sum = 0u32;
            let mut count = 0u32;
            for dy in -SMOOTHING_RADIUS..=SMOOTHING_RADIUS {
                let y = by + dy;
                if y < 0 || y >= blocks_y as isize {
                    continue;
                }
                for dx in -SMOOTHING_RADIUS..=SMOOTHING_RADIUS {
                    let x = bx + dx;
                    if x < 0 || x >= blocks_x as isize {
                        continue;
                    }
                    sum += raw[y as usize * blocks_x + x as usize] as u32;
                    count += 1;
                }
            }
            out[by as usize * blocks_x + bx as usize] = (sum / count.max(1)) as u16;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_area() {
        let binary = adaptive_binarize_raw(&[], 0, 0);
        assert!(binary.is_empty());
    }

    #[test]
    fn test_uniform_white_stays_white() {
        let gray = vec![230u8; 64 * 48];
        let binary = adaptive_binarize_raw(&gray, 64, 48);
        assert_eq!(binary.count_ones(), 0);
    }

    #[test]
    fn test_large_dark_square_is_solid() {
        // 80x80 dark square inside a white frame; its interior blocks are flat.
        let (w, h) = (160, 160);
        let mut gray = vec![240u8; w * h];
        for y in 40..120 {
            for x in 40..120 {
                gray[y * w + x] = 15;
            }
        }
        let binary = adaptive_binarize_raw(&gray, w, h);
        for y in 40..120 {
            for x in 40..120 {
                assert!(binary.get(x, y), "({x}, {y}) should be dark");
            }
        }
        assert!(!binary.get(10, 10));
        assert!(!binary.get(150, 150));
    }

    #[test]
    fn test_uneven_illumination() {
        // Vertical 4px bars while brightness ramps from dim to bright.
        let (w, h) = (128, 32);
        let mut gray = vec![0u8; w * h];
        for y in 0..h {
            for x in 0..w {
                let light = 90 + (x * 160 / w) as u8;
                gray[y * w + x] = if (x / 4) % 2 == 0 { light / 3 } else { light };
            }
        }
        let binary = adaptive_binarize_raw(&gray, w, h);
        for x in 0..w {
            assert_eq!(binary.get(x, 16), (x / 4) % 2 == 0, "column {x}");
        }
    }

    #[test]
    fn test_wrapper_matches_raw() {
        let gray: Vec<u8> = (0..40 * 24).map(|i| if i % 7 < 3 { 10 } else { 200 }).collect();
        let image = LuminanceImage::new(&gray, 40, 24).unwrap();
        assert_eq!(adaptive_binarize(&image), adaptive_binarize_raw(&gray, 40, 24));
    }
}
