//! Grid sampling through a perspective transform

use crate::models::{BitMatrix, Point};
use crate::utils::geometry::PerspectiveTransform;

/// Modules at or above this pixel size are read with a 3x3 majority vote
const MAJORITY_MIN_MODULE: f32 = 3.0;

/// Sample a `dimension` x `dimension` module grid.
///
/// Fails when the symbol corners land more than a module outside the frame.
pub fn extract_sample_grid(
    matrix: &BitMatrix,
    transform: &PerspectiveTransform,
    dimension: usize,
    module_size: f32,
) -> Option<BitMatrix> {
    let d = dimension as f32;
    let (w, h) = (matrix.width() as f32, matrix.height() as f32);
    for corner in [
        Point::new(0.5, 0.5),
        Point::new(d - 0.5, 0.5),
        Point::new(0.5, d - 0.5),
        Point::new(d - 0.5, d - 0.5),
    ] {
        let p = transform.transform(&corner);
        if p.x < -module_size || p.y < -module_size || p.x > w + module_size || p.y > h + module_size
        {
            return None;
        }
    }

    let offset = if module_size >= MAJORITY_MIN_MODULE {
        ((module_size / 4.0).round() as i32).max(1)
    } else {
        0
    };

    let mut grid = BitMatrix::square(dimension);
    for y in 0..dimension {
        for x in 0..dimension {
            let p = transform.transform(&Point::new(x as f32 + 0.5, y as f32 + 0.5));
            let (px, py) = (p.x.floor() as i32, p.y.floor() as i32);
            let dark = if offset == 0 {
                matrix.get_i(px, py)
            } else {
                let mut votes = 0;
                for dy in [-offset, 0, offset] {
                    for dx in [-offset, 0, offset] {
                        votes += matrix.get_i(px + dx, py + dy) as u32;
                    }
                }
                votes >= 5
            };
            if dark {
                grid.set(x, y, true);
            }
        }
    }
    Some(grid)
}
