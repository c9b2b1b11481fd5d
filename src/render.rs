//! Nearest-neighbour rasterization of module grids and bar sequences
use log::debug;

use crate::error::{CodecError, Result};
use crate::models::{BitMatrix, PixelRaster};

/// Smallest linear raster height
pub const MIN_LINEAR_HEIGHT: usize = 4;

/// Render a square module grid centered in a `width` x `height` raster with
/// `quiet_zone` blank modules on every side
pub fn render_matrix(modules: &BitMatrix, quiet_zone: usize, width: usize, height: usize) -> Result<PixelRaster> {
    let dimension = modules.width();
    let total = dimension + 2 * quiet_zone;
    let scale = width.min(height) / total;
    if scale == 0 {
        return Err(CodecError::invalid(format!(
            "{width}x{height} is too small for {total} modules"
        )));
    }
    let extent = dimension * scale;
    let left = (width - extent) / 2;
    let top = (height - extent) / 2;
    debug!("matrix {dimension} modules at {scale} px, origin ({left}, {top})");

    let mut raster = PixelRaster::blank(width, height)?;
    for y in 0..dimension {
        let mut x = 0;
        while x < dimension {
            if !modules.get(x, y) {
                x += 1;
                continue;
            }
            // Paint horizontal runs in one go
            let run_start = x;
            while x < dimension && modules.get(x, y) {
                x += 1;
            }
            raster.fill_dark(left + run_start * scale, top + y * scale, (x - run_start) * scale, scale);
        }
    }
    Ok(raster)
}

/// Render a bar sequence across the full height, leaving a top and bottom
/// margin of one module (at most a quarter of the height)
pub fn render_linear(modules: &[bool], quiet_zone: usize, width: usize, height: usize) -> Result<PixelRaster> {
    let total = modules.len() + 2 * quiet_zone;
    let scale = width / total;
    if scale == 0 || height < MIN_LINEAR_HEIGHT {
        return Err(CodecError::invalid(format!(
            "{width}x{height} is too small for {total} modules"
        )));
    }
    let margin = scale.min(height / 4);
    let bar_height = height - 2 * margin;
    let left = (width - modules.len() * scale) / 2;
    debug!("{} bar modules at {scale} px, margin {margin}", modules.len());

    let mut raster = PixelRaster::blank(width, height)?;
    let mut x = 0;
    while x < modules.len() {
        if !modules[x] {
            x += 1;
            continue;
        }
        let run_start = x;
        while x < modules.len() && modules[x] {
            x += 1;
        }
        raster.fill_dark(left + run_start * scale, margin, (x - run_start) * scale, bar_height);
    }
    Ok(raster)
}
