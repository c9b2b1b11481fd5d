/// Row-aligned bit matrix (true = dark module / foreground pixel)
///
/// Every row starts on a fresh 32-bit word so that rows can be walked
/// without per-bit index arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    row_words: usize,
    words: Vec<u32>,
}

impl BitMatrix {
    /// Create an all-light matrix with the given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let row_words = width.div_ceil(32);
        Self {
            width,
            height,
            row_words,
            words: vec![0; row_words * height],
        }
    }

    /// Create a square matrix (QR symbols)
    pub fn square(dimension: usize) -> Self {
        Self::new(dimension, dimension)
    }

    /// Matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    /// True when the matrix has no cells
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bit at (x, y); anything outside the matrix reads as light
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let word = self.words[y * self.row_words + x / 32];
        (word >> (x % 32)) & 1 == 1
    }

    /// Signed variant of [`get`](Self::get) for geometry code that may step off the edge
    #[inline]
    pub fn get_i(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.get(x as usize, y as usize)
    }

    /// Set bit at (x, y); writes outside the matrix are ignored
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let word = &mut self.words[y * self.row_words + x / 32];
        if value {
            *word |= 1 << (x % 32);
        } else {
            *word &= !(1 << (x % 32));
        }
    }

    /// Flip bit at (x, y)
    #[inline]
    pub fn toggle(&mut self, x: usize, y: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.words[y * self.row_words + x / 32] ^= 1 << (x % 32);
    }

    /// Set every cell of the rectangle to `value` (clipped to the matrix)
    pub fn fill_rect(&mut self, left: usize, top: usize, width: usize, height: usize, value: bool) {
        let right = (left + width).min(self.width);
        let bottom = (top + height).min(self.height);
        for y in top..bottom {
            for x in left..right {
                self.set(x, y, value);
            }
        }
    }

    /// Clear all bits
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Copy of one row as booleans
    pub fn row(&self, y: usize) -> Vec<bool> {
        (0..self.width).map(|x| self.get(x, y)).collect()
    }

    /// Matrix mirrored across its main diagonal (rows become columns)
    pub fn transpose(&self) -> BitMatrix {
        let mut out = BitMatrix::new(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    out.set(y, x, true);
                }
            }
        }
        out
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
