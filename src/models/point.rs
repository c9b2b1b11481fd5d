/// 2D point in image (pixel) or grid (module) space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance (no sqrt)
    pub fn distance_squared(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Translate point by (dx, dy)
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// z component of `(a - self) x (b - self)`.
    ///
    /// Positive when `b` lies clockwise of `a` around `self` in image
    /// coordinates (y grows downwards).
    pub fn cross(&self, a: &Point, b: &Point) -> f32 {
        (a.x - self.x) * (b.y - self.y) - (a.y - self.y) * (b.x - self.x)
    }

    /// Cosine of the angle at `self` between the rays to `a` and `b`
    pub fn cos_angle(&self, a: &Point, b: &Point) -> f32 {
        let (ax, ay) = (a.x - self.x, a.y - self.y);
        let (bx, by) = (b.x - self.x, b.y - self.y);
        let denom = (ax * ax + ay * ay).sqrt() * (bx * bx + by * by).sqrt();
        if denom <= f32::EPSILON {
            return 1.0;
        }
        (ax * bx + ay * by) / denom
    }
}
