//! Finder triple selection and grid-to-image transform construction

use log::trace;

use super::alignment::find_alignment_pattern;
use super::finder::FinderPattern;
use crate::models::{BitMatrix, Point, Version};
use crate::utils::geometry::PerspectiveTransform;

const MAX_SIZE_RATIO: f32 = 2.0;
const MAX_DISTORTION: f32 = 5.0;
const MAX_RIGHT_ANGLE_COS: f32 = 0.4;

/// Three finder patterns in symbol orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderTriple {
    /// Corner finder, opposite the missing one
    pub top_left: FinderPattern,
    /// Finder along the top edge
    pub top_right: FinderPattern,
    /// Finder along the left edge
    pub bottom_left: FinderPattern,
}

impl FinderTriple {
    /// Order three patterns: the corner nearest a right angle is top-left,
    /// and top-right is the one clockwise from bottom-left
    pub fn order(a: FinderPattern, b: FinderPattern, c: FinderPattern) -> Self {
        let patterns = [a, b, c];
        let mut corner = 0;
        let mut best_cos = f32::INFINITY;
        for i in 0..3 {
            let p = &patterns[i].center;
            let cos = p
                .cos_angle(&patterns[(i + 1) % 3].center, &patterns[(i + 2) % 3].center)
                .abs();
            if cos < best_cos {
                best_cos = cos;
                corner = i;
            }
        }
        let top_left = patterns[corner];
        let p1 = patterns[(corner + 1) % 3];
        let p2 = patterns[(corner + 2) % 3];
        let (top_right, bottom_left) = if top_left.center.cross(&p1.center, &p2.center) > 0.0 {
            (p1, p2)
        } else {
            (p2, p1)
        };
        Self {
            top_left,
            top_right,
            bottom_left,
        }
    }

    /// Mean module size of the three patterns
    pub fn module_size(&self) -> f32 {
        (self.top_left.module_size + self.top_right.module_size + self.bottom_left.module_size)
            / 3.0
    }

    /// Symbol width estimated from the finder spacing, snapped to `4v + 17`
    pub fn estimate_dimension(&self) -> Option<usize> {
        let module = self.module_size();
        if module <= 0.0 {
            return None;
        }
        let across = self.top_left.center.distance(&self.top_right.center) / module;
        let down = self.top_left.center.distance(&self.bottom_left.center) / module;
        let raw = (across + down) / 2.0 + 7.0;
        let version = ((raw - 17.0) / 4.0).round().clamp(1.0, 40.0) as u8;
        Version::new(version).map(|v| v.size())
    }
}

/// Plausible finder triples, most square-looking first
pub fn candidate_triples(patterns: &[FinderPattern], max_triples: usize) -> Vec<FinderTriple> {
    let mut scored = Vec::new();
    for i in 0..patterns.len() {
        for j in (i + 1)..patterns.len() {
            for k in (j + 1)..patterns.len() {
                if let Some(score) = triple_score(&patterns[i], &patterns[j], &patterns[k]) {
                    scored.push((score, i, j, k));
                }
            }
        }
    }
    scored.sort_by(|a, b| a.0.total_cmp(&b.0));
    scored.truncate(max_triples);
    scored
        .into_iter()
        .map(|(_, i, j, k)| FinderTriple::order(patterns[i], patterns[j], patterns[k]))
        .collect()
}

/// Lower is better; `None` when the three cannot be corners of one symbol
fn triple_score(a: &FinderPattern, b: &FinderPattern, c: &FinderPattern) -> Option<f32> {
    let sizes = [a.module_size, b.module_size, c.module_size];
    let min_size = sizes.iter().copied().fold(f32::INFINITY, f32::min);
    let max_size = sizes.iter().copied().fold(0.0, f32::max);
    if min_size <= 0.0 {
        return None;
    }
    let size_ratio = max_size / min_size;
    if size_ratio > MAX_SIZE_RATIO {
        return None;
    }

    let distances = [
        a.center.distance(&b.center),
        a.center.distance(&c.center),
        b.center.distance(&c.center),
    ];
    let min_d = distances.iter().copied().fold(f32::INFINITY, f32::min);
    let max_d = distances.iter().copied().fold(0.0, f32::max);
    let avg_module = (a.module_size + b.module_size + c.module_size) / 3.0;
    // Adjacent finders are at least 14 module centers apart in a version 1 symbol
    if min_d < avg_module * 7.0 {
        return None;
    }
    let distortion = max_d / min_d;
    if distortion > MAX_DISTORTION {
        return None;
    }

    let best_cos = [
        a.center.cos_angle(&b.center, &c.center),
        b.center.cos_angle(&a.center, &c.center),
        c.center.cos_angle(&a.center, &b.center),
    ]
    .iter()
    .map(|c| c.abs())
    .fold(f32::INFINITY, f32::min);
    if best_cos >= MAX_RIGHT_ANGLE_COS {
        return None;
    }

    Some(size_ratio * 2.0 + distortion + best_cos)
}

/// Map from module space (x right, y down, origin at the symbol corner)
/// into image pixels
pub fn grid_transform(
    matrix: &BitMatrix,
    triple: &FinderTriple,
    dimension: usize,
) -> Option<PerspectiveTransform> {
    let d = dimension as f32;
    let tl = triple.top_left.center;
    let tr = triple.top_right.center;
    let bl = triple.bottom_left.center;
    let grid_tl = Point::new(3.5, 3.5);
    let grid_tr = Point::new(d - 3.5, 3.5);
    let grid_bl = Point::new(3.5, d - 3.5);

    if dimension > Version::MIN.size() {
        // The bottom-right alignment pattern sits 3 modules in from the
        // virtual fourth finder center
        let module = triple.module_size();
        let correction = 1.0 - 3.0 / (d - 7.0);
        let corner = Point::new(tr.x + bl.x - tl.x, tr.y + bl.y - tl.y);
        let estimate = Point::new(
            tl.x + correction * (corner.x - tl.x),
            tl.y + correction * (corner.y - tl.y),
        );
        if let Some(alignment) = find_alignment_pattern(matrix, estimate, module) {
            trace!(
                "alignment at ({:.1}, {:.1}), estimated ({:.1}, {:.1})",
                alignment.x, alignment.y, estimate.x, estimate.y
            );
            let grid_align = Point::new(d - 6.5, d - 6.5);
            if let Some(t) = PerspectiveTransform::from_points(
                &[grid_tl, grid_tr, grid_bl, grid_align],
                &[tl, tr, bl, alignment],
            ) {
                return Some(t);
            }
        }
    }

    PerspectiveTransform::from_three(&[grid_tl, grid_tr, grid_bl], &[tl, tr, bl])
}
