//! Finder pattern detection using 1:1:3:1:1 ratio scanning with vertical,
//! horizontal and (optionally) diagonal cross-checks

use crate::models::{BitMatrix, Point};

/// Largest symbol the default row skip is tuned for (version 20)
const MAX_MODULES: usize = 97;
const MIN_SKIP: usize = 3;

/// Located finder pattern center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderPattern {
    /// Pattern center in pixels
    pub center: Point,
    /// Estimated module width in pixels
    pub module_size: f32,
    /// Number of scan lines that confirmed this pattern
    pub count: usize,
}

impl FinderPattern {
    /// Pattern seen on one scan line
    pub fn new(x: f32, y: f32, module_size: f32) -> Self {
        Self {
            center: Point::new(x, y),
            module_size,
            count: 1,
        }
    }

    fn about_equals(&self, module_size: f32, x: f32, y: f32) -> bool {
        if (y - self.center.y).abs() <= module_size && (x - self.center.x).abs() <= module_size {
            let diff = (module_size - self.module_size).abs();
            diff <= 1.0 || diff <= self.module_size
        } else {
            false
        }
    }

    /// Count-weighted average with a new observation
    fn combine(&self, x: f32, y: f32, module_size: f32) -> Self {
        let n = self.count as f32 + 1.0;
        Self {
            center: Point::new(
                (self.count as f32 * self.center.x + x) / n,
                (self.count as f32 * self.center.y + y) / n,
            ),
            module_size: (self.count as f32 * self.module_size + module_size) / n,
            count: self.count + 1,
        }
    }
}

/// Row scanner collecting finder candidates
pub struct FinderDetector<'a> {
    matrix: &'a BitMatrix,
    try_harder: bool,
    candidates: Vec<FinderPattern>,
}

impl<'a> FinderDetector<'a> {
    /// Scan `matrix` and return merged candidates, best confirmed first
    pub fn detect(matrix: &'a BitMatrix, try_harder: bool) -> Vec<FinderPattern> {
        let mut detector = Self {
            matrix,
            try_harder,
            candidates: Vec::new(),
        };
        let height = matrix.height();
        let skip = if try_harder {
            1
        } else {
            (3 * height / (4 * MAX_MODULES)).max(MIN_SKIP)
        };

        let mut y = skip - 1;
        while y < height {
            detector.scan_row(y);
            y += skip;
        }

        let mut found = detector.candidates;
        found.sort_by(|a, b| b.count.cmp(&a.count));
        found
    }

    fn scan_row(&mut self, y: usize) {
        let width = self.matrix.width();
        let mut state = [0usize; 5];
        let mut current = 0usize;

        for x in 0..width {
            let dark = self.matrix.get(x, y);
            if dark {
                // Dark pixel: states 0, 2 and 4 are dark
                if current & 1 == 1 {
                    current += 1;
                }
                state[current] += 1;
            } else if current & 1 == 0 {
                if current == 4 {
                    if found_pattern_cross(&state) && self.handle_possible_center(&state, y, x) {
                        state = [0; 5];
                        current = 0;
                        continue;
                    }
                    shift_two(&mut state);
                    current = 3;
                } else {
                    current += 1;
                    state[current] += 1;
                }
            } else {
                state[current] += 1;
            }
        }

        if found_pattern_cross(&state) {
            self.handle_possible_center(&state, y, width);
        }
    }

    /// Confirm a row hit with cross-checks and record it. `end` is the
    /// column just past the last dark run.
    fn handle_possible_center(&mut self, state: &[usize; 5], y: usize, end: usize) -> bool {
        let total: usize = state.iter().sum();
        let center_x = center_from_end(state, end);
        let Some(center_y) = self.cross_check_vertical(y, center_x as usize, state[2], total) else {
            return false;
        };
        let Some(center_x) =
            self.cross_check_horizontal(center_x as usize, center_y as usize, state[2], total)
        else {
            return false;
        };
        if self.try_harder && !self.cross_check_diagonal(center_x as usize, center_y as usize) {
            return false;
        }

        let module_size = total as f32 / 7.0;
        match self
            .candidates
            .iter()
            .position(|c| c.about_equals(module_size, center_x, center_y))
        {
            Some(index) => {
                self.candidates[index] =
                    self.candidates[index].combine(center_x, center_y, module_size);
            }
            None => self
                .candidates
                .push(FinderPattern::new(center_x, center_y, module_size)),
        }
        true
    }

    fn cross_check_vertical(
        &self,
        start_y: usize,
        x: usize,
        max_count: usize,
        original_total: usize,
    ) -> Option<f32> {
        let m = self.matrix;
        let height = m.height();
        let mut state = [0usize; 5];

        let mut y = start_y as isize;
        while y >= 0 && m.get(x, y as usize) {
            state[2] += 1;
            y -= 1;
        }
        if y < 0 {
            return None;
        }
        while y >= 0 && !m.get(x, y as usize) && state[1] <= max_count {
            state[1] += 1;
            y -= 1;
        }
        if y < 0 || state[1] > max_count {
            return None;
        }
        while y >= 0 && m.get(x, y as usize) && state[0] <= max_count {
            state[0] += 1;
            y -= 1;
        }
        if state[0] > max_count {
            return None;
        }

        let mut y = start_y + 1;
        while y < height && m.get(x, y) {
            state[2] += 1;
            y += 1;
        }
        if y == height {
            return None;
        }
        while y < height && !m.get(x, y) && state[3] < max_count {
            state[3] += 1;
            y += 1;
        }
        if y == height || state[3] >= max_count {
            return None;
        }
        while y < height && m.get(x, y) && state[4] < max_count {
            state[4] += 1;
            y += 1;
        }
        if state[4] >= max_count {
            return None;
        }

        let total: usize = state.iter().sum();
        // A vertical section far from the horizontal one is a false positive
        if 5 * total.abs_diff(original_total) >= 2 * original_total {
            return None;
        }
        found_pattern_cross(&state).then(|| center_from_end(&state, y))
    }

    fn cross_check_horizontal(
        &self,
        start_x: usize,
        y: usize,
        max_count: usize,
        original_total: usize,
    ) -> Option<f32> {
        let m = self.matrix;
        let width = m.width();
        let mut state = [0usize; 5];

        let mut x = start_x as isize;
        while x >= 0 && m.get(x as usize, y) {
            state[2] += 1;
            x -= 1;
        }
        if x < 0 {
            return None;
        }
        while x >= 0 && !m.get(x as usize, y) && state[1] <= max_count {
            state[1] += 1;
            x -= 1;
        }
        if x < 0 || state[1] > max_count {
            return None;
        }
        while x >= 0 && m.get(x as usize, y) && state[0] <= max_count {
            state[0] += 1;
            x -= 1;
        }
        if state[0] > max_count {
            return None;
        }

        let mut x = start_x + 1;
        while x < width && m.get(x, y) {
            state[2] += 1;
            x += 1;
        }
        if x == width {
            return None;
        }
        while x < width && !m.get(x, y) && state[3] < max_count {
            state[3] += 1;
            x += 1;
        }
        if x == width || state[3] >= max_count {
            return None;
        }
        while x < width && m.get(x, y) && state[4] < max_count {
            state[4] += 1;
            x += 1;
        }
        if state[4] >= max_count {
            return None;
        }

        let total: usize = state.iter().sum();
        if 5 * total.abs_diff(original_total) >= original_total {
            return None;
        }
        found_pattern_cross(&state).then(|| center_from_end(&state, x))
    }

    /// Walk the main diagonal through a candidate center
    fn cross_check_diagonal(&self, center_x: usize, center_y: usize) -> bool {
        let m = self.matrix;
        let mut state = [0usize; 5];

        let mut i = 0usize;
        while center_x >= i && center_y >= i && m.get(center_x - i, center_y - i) {
            state[2] += 1;
            i += 1;
        }
        if state[2] == 0 {
            return false;
        }
        while center_x >= i && center_y >= i && !m.get(center_x - i, center_y - i) {
            state[1] += 1;
            i += 1;
        }
        if state[1] == 0 {
            return false;
        }
        while center_x >= i && center_y >= i && m.get(center_x - i, center_y - i) {
            state[0] += 1;
            i += 1;
        }
        if state[0] == 0 {
            return false;
        }

        let (width, height) = (m.width(), m.height());
        let mut i = 1usize;
        while center_x + i < width && center_y + i < height && m.get(center_x + i, center_y + i) {
            state[2] += 1;
            i += 1;
        }
        while center_x + i < width && center_y + i < height && !m.get(center_x + i, center_y + i)
        {
            state[3] += 1;
            i += 1;
        }
        if state[3] == 0 {
            return false;
        }
        while center_x + i < width && center_y + i < height && m.get(center_x + i, center_y + i) {
            state[4] += 1;
            i += 1;
        }
        if state[4] == 0 {
            return false;
        }

        found_pattern_diagonal(&state)
    }
}

fn shift_two(state: &mut [usize; 5]) {
    state[0] = state[2];
    state[1] = state[3];
    state[2] = state[4];
    state[3] = 1;
    state[4] = 0;
}

fn center_from_end(state: &[usize; 5], end: usize) -> f32 {
    end as f32 - state[4] as f32 - state[3] as f32 - state[2] as f32 / 2.0
}

/// 1:1:3:1:1 within half a module per run
pub(crate) fn found_pattern_cross(state: &[usize; 5]) -> bool {
    ratio_matches(state, 2.0)
}

/// Diagonal runs are longer and noisier, so the tolerance is wider
fn found_pattern_diagonal(state: &[usize; 5]) -> bool {
    ratio_matches(state, 1.333)
}

fn ratio_matches(state: &[usize; 5], variance_divisor: f32) -> bool {
    if state.iter().any(|&c| c == 0) {
        return false;
    }
    let total: usize = state.iter().sum();
    if total < 7 {
        return false;
    }
    let module = total as f32 / 7.0;
    let max_variance = module / variance_divisor;
    (module - state[0] as f32).abs() < max_variance
        && (module - state[1] as f32).abs() < max_variance
        // The center run is three modules wide and gets three times the slack
        && (3.0 * module - state[2] as f32).abs() < 3.0 * max_variance
        && (module - state[3] as f32).abs() < max_variance
        && (module - state[4] as f32).abs() < max_variance
}
