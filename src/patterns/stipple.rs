use crate::accumulator::ColorAccumulator;
use crate::canvas::Shape;
use crate::error::HalftoneError;
use crate::grid::{KernelGrid, KernelIndex};
use crate::math::pi;
use crate::packing::{diameter_for_points, hex_best, lut_radius};
use crate::rand::Rng;

use super::{per_kernel, StippleParams, StippleSizing};

/// Stipple points: up to `density` equal circles per kernel, as many as the kernel's coverage
/// calls for, each on its own slot of a staggered packing and jittered a little.
///
/// Every random choice is drawn from generators seeded by the kernel's position and statistics,
/// so the output does not depend on evaluation order.
///
/// Fails if table sizing is asked for a density the table does not cover.
pub fn stipple(grid: &KernelGrid, params: &StippleParams) -> Result<Vec<Shape>, HalftoneError> {
    if params.density == 0 {
        return Ok(vec![]);
    }
    let size = f64::from(grid.kernel_size());
    let density = params.density as usize;
    let diameter = match params.sizing {
        StippleSizing::Solver => diameter_for_points(size, density),
        StippleSizing::Lookup => 2.0 * lut_radius(grid.kernel_size(), params.density)?,
    };
    let packing = hex_best(size, density);
    let slots = packing.slots(size);
    tracing::debug!(density, diameter, rows = packing.rows, cols = packing.cols, "stipple layout");

    Ok(per_kernel(grid, |k, acc| {
        let count = point_count(acc, params.density).min(slots.len());
        if count == 0 {
            return vec![];
        }
        let origin = grid.kernel_origin(k);
        let mut rng = kernel_rng(params.seed, k, origin, acc);
        let chosen = rng.shuffle(0..slots.len());
        let kernel_seed = rng.next_u64();

        chosen
            .into_iter()
            .take(count)
            .enumerate()
            .filter_map(|(i, slot)| {
                let mut point_rng = Rng::from_parts(&[kernel_seed, i as u64]);
                let angle = point_rng.uniform(0.0, pi(2.0));
                let distance = point_rng.rnd() * diameter / 4.0;
                let (sx, sy) = slots[slot];
                let p = (
                    origin.0 + sx + distance * angle.cos(),
                    origin.1 + sy + distance * angle.sin(),
                );
                grid.to_image(p).map(|center| Shape::Circle {
                    center,
                    radius: diameter / 2.0,
                })
            })
            .collect()
    }))
}

/// Points drawn in one kernel: `density` scaled by its coverage, rounded.
pub fn point_count(cell: &ColorAccumulator, density: u32) -> usize {
    (f64::from(density) * cell.coverage()).round() as usize
}

fn kernel_rng(seed: u64, k: KernelIndex, origin: (f64, f64), cell: &ColorAccumulator) -> Rng {
    let average = cell.average();
    Rng::from_parts(&[
        seed,
        k.row as u64,
        k.col as u64,
        origin.0.to_bits(),
        origin.1.to_bits(),
        u64::from(average.a),
        u64::from(average.luminance()),
    ])
}
