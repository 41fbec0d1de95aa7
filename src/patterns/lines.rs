//! Line screens: one ribbon per kernel row whose thickness follows the row's darkness.

use rayon::prelude::*;

use crate::accumulator::ColorAccumulator;
use crate::canvas::Shape;
use crate::grid::{KernelGrid, KernelIndex};
use crate::math::pi;

use super::{polygon_to_image, SineParams, MIN_HALF_THICKNESS};

/// Half-thickness of a line through a kernel of luminance `luminance` and opacity `alpha`
/// (both `0.0..=255.0`): up to half the kernel for opaque black, zero at or below the
/// minimum.
pub fn line_half_thickness(luminance: f64, alpha: f64, kernel_size: u32) -> f64 {
    let t = f64::from(kernel_size) / 2.0 * (1.0 - luminance / 255.0) * (alpha / 255.0);
    if t > MIN_HALF_THICKNESS {
        t
    } else {
        0.0
    }
}

fn cell_half_thickness(cell: &ColorAccumulator, kernel_size: u32) -> f64 {
    line_half_thickness(cell.luminance(), cell.alpha(), kernel_size)
}

fn per_row<F>(grid: &KernelGrid, f: F) -> Vec<Shape>
where
    F: Fn(usize) -> Vec<Shape> + Sync + Send,
{
    let rows: Vec<Vec<Shape>> = (0..grid.rows()).into_par_iter().map(f).collect();
    rows.into_iter().flatten().collect()
}

/// Straight lines through the kernel centers of each row, thickened per kernel.
pub fn straight(grid: &KernelGrid) -> Vec<Shape> {
    per_row(grid, |row| {
        let mut top = Vec::new();
        let mut bottom = Vec::new();
        for col in 0..grid.cols() {
            let k = KernelIndex::new(row, col);
            let cell = grid.cell(k);
            if cell.is_empty() {
                continue;
            }
            let t = cell_half_thickness(cell, grid.kernel_size());
            let (x, y) = grid.kernel_center(k);
            top.push((x, y - t));
            bottom.push((x, y + t));
        }
        let visible = top.iter().zip(&bottom).any(|(t, b)| b.1 > t.1);
        if top.len() < 2 || !visible {
            return vec![];
        }
        top.extend(bottom.into_iter().rev());
        polygon_to_image(grid, &top).into_iter().collect()
    })
}

/// Luminance and alpha at rotated `x` along `row`, blended linearly between the kernel `x`
/// falls in and its right neighbour. A side without data defers to the other; `None` if `x`
/// is outside the grid or neither side has data.
fn sample_row(grid: &KernelGrid, row: usize, x: f64) -> Option<(f64, f64)> {
    let exact = (x - grid.bounds().min_x) / f64::from(grid.kernel_size());
    let left = exact.floor();
    if left < 0.0 || left >= grid.cols() as f64 {
        return None;
    }
    let t = exact - left;
    let data = |col: usize| {
        grid.get(row as isize, col as isize)
            .filter(|cell| !cell.is_empty())
            .map(|cell| (cell.luminance(), cell.alpha()))
    };
    let left = left as usize;
    match (data(left), data(left + 1)) {
        (Some((l0, a0)), Some((l1, a1))) => Some((l0 * (1.0 - t) + l1 * t, a0 * (1.0 - t) + a1 * t)),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

/// Sine ribbons: each row's center line oscillates with the configured amplitude and frequency
/// and is sampled every pixel. A row breaks into separate ribbons wherever it has no data or
/// its thickness drops to zero.
pub fn sine(grid: &KernelGrid, params: &SineParams) -> Vec<Shape> {
    let size = f64::from(grid.kernel_size());
    let amplitude = params.amplitude * size / 2.0;
    let frequency = params.frequency * pi(2.0) / (6.0 * size);
    let bounds = *grid.bounds();
    let steps = bounds.width().floor() as usize;

    per_row(grid, |row| {
        let mut shapes = Vec::new();
        let (_, center_y) = grid.kernel_center(KernelIndex::new(row, 0));
        let mut top: Vec<(f64, f64)> = Vec::new();
        let mut bottom: Vec<(f64, f64)> = Vec::new();
        let mut flush = |top: &mut Vec<(f64, f64)>, bottom: &mut Vec<(f64, f64)>| {
            if top.len() >= 2 {
                let mut outline = std::mem::take(top);
                outline.extend(bottom.drain(..).rev());
                shapes.extend(polygon_to_image(grid, &outline));
            }
            top.clear();
            bottom.clear();
        };

        for i in 0..=steps {
            let x = bounds.min_x + i as f64;
            let t = match sample_row(grid, row, x) {
                Some((luminance, alpha)) => line_half_thickness(luminance, alpha, grid.kernel_size()),
                None => 0.0,
            };
            if t <= 0.0 {
                flush(&mut top, &mut bottom);
                continue;
            }
            let y = center_y + amplitude * (frequency * x).sin();
            top.push((x, y - t));
            bottom.push((x, y + t));
        }
        flush(&mut top, &mut bottom);
        shapes
    })
}
