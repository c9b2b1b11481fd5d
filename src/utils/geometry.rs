//! Projective transforms between grid (module) space and image space

use crate::models::Point;

/// 3x3 homography with a33 fixed to 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveTransform {
    a11: f64,
    a12: f64,
    a13: f64,
    a21: f64,
    a22: f64,
    a23: f64,
    a31: f64,
    a32: f64,
}

impl PerspectiveTransform {
    /// Transform mapping each `src[i]` onto `dst[i]`.
    ///
    /// `None` when the correspondence is degenerate (three collinear points).
    pub fn from_points(src: &[Point; 4], dst: &[Point; 4]) -> Option<Self> {
        // Direct linear transform: two equations per correspondence.
        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];

        for i in 0..4 {
            let (sx, sy) = (src[i].x as f64, src[i].y as f64);
            let (dx, dy) = (dst[i].x as f64, dst[i].y as f64);

            let row = i * 2;
            a[row] = [sx, sy, 1.0, 0.0, 0.0, 0.0, -dx * sx, -dx * sy];
            b[row] = dx;
            a[row + 1] = [0.0, 0.0, 0.0, sx, sy, 1.0, -dy * sx, -dy * sy];
            b[row + 1] = dy;
        }

        let s = solve_linear_system(a, b)?;
        let transform = Self {
            a11: s[0],
            a12: s[1],
            a13: s[2],
            a21: s[3],
            a22: s[4],
            a23: s[5],
            a31: s[6],
            a32: s[7],
        };
        transform.is_finite().then_some(transform)
    }

    /// Pure affine map from three correspondences (the fourth is implied)
    pub fn from_three(src: &[Point; 3], dst: &[Point; 3]) -> Option<Self> {
        let fourth = |p: &[Point; 3]| Point::new(p[1].x + p[2].x - p[0].x, p[1].y + p[2].y - p[0].y);
        Self::from_points(
            &[src[0], src[1], src[2], fourth(src)],
            &[dst[0], dst[1], dst[2], fourth(dst)],
        )
    }

    /// Map a point; points on the horizon line map to the origin
    pub fn transform(&self, p: &Point) -> Point {
        let (x, y) = (p.x as f64, p.y as f64);
        let denominator = self.a31 * x + self.a32 * y + 1.0;
        if denominator.abs() < 1e-12 {
            return Point::new(0.0, 0.0);
        }
        Point::new(
            ((self.a11 * x + self.a12 * y + self.a13) / denominator) as f32,
            ((self.a21 * x + self.a22 * y + self.a23) / denominator) as f32,
        )
    }

    fn is_finite(&self) -> bool {
        [
            self.a11, self.a12, self.a13, self.a21, self.a22, self.a23, self.a31, self.a32,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Gaussian elimination with partial pivoting
#[allow(clippy::needless_range_loop)]
fn solve_linear_system(mut a: [[f64; 8]; 8], mut b: [f64; 8]) -> Option<[f64; 8]> {
    let n = 8;

    for i in 0..n {
        let mut max_val = a[i][i].abs();
        let mut max_row = i;
        for k in (i + 1)..n {
            if a[k][i].abs() > max_val {
                max_val = a[k][i].abs();
                max_row = k;
            }
        }
        if max_val < 1e-12 {
            return None;
        }
        if max_row != i {
            a.swap(i, max_row);
            b.swap(i, max_row);
        }

        for k in (i + 1)..n {
            let factor = a[k][i] / a[i][i];
            b[k] -= factor * b[i];
            for j in i..n {
                a[k][j] -= factor * a[i][j];
            }
        }
    }

    let mut x = [0.0f64; 8];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[i][j] * x[j];
        }
        x[i] = sum / a[i][i];
    }

    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn test_perspective_transform() {
        let src = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        let dst = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(50.0, 50.0),
            Point::new(0.0, 50.0),
        ];

        let t = PerspectiveTransform::from_points(&src, &dst).unwrap();
        assert!(close(t.transform(&Point::new(50.0, 50.0)), Point::new(25.0, 25.0)));
    }

    #[test]
    fn test_corners_map_exactly() {
        let src = [
            Point::new(3.5, 3.5),
            Point::new(17.5, 3.5),
            Point::new(3.5, 17.5),
            Point::new(17.5, 17.5),
        ];
        let dst = [
            Point::new(120.0, 80.0),
            Point::new(410.0, 95.0),
            Point::new(105.0, 390.0),
            Point::new(440.0, 430.0),
        ];
        let t = PerspectiveTransform::from_points(&src, &dst).unwrap();
        for i in 0..4 {
            assert!(close(t.transform(&src[i]), dst[i]));
        }
    }

    #[test]
    fn test_affine_from_three() {
        let src = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 10.0)];
        let dst = [Point::new(5.0, 5.0), Point::new(25.0, 5.0), Point::new(5.0, 25.0)];
        let t = PerspectiveTransform::from_three(&src, &dst).unwrap();
        assert!(close(t.transform(&Point::new(10.0, 10.0)), Point::new(25.0, 25.0)));
    }

    #[test]
    fn test_degenerate_points() {
        let line = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(3.0, 3.0),
        ];
        assert!(PerspectiveTransform::from_points(&line, &line).is_none());
    }
}
