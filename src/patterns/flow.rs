use rayon::prelude::*;

use crate::canvas::Shape;
use crate::flow::{build_ribbon, generate, FlowParams};
use crate::grid::KernelGrid;

/// Flow-line ribbons, drawn in line order. Expects gradients to be present on `grid`.
pub fn ribbons(grid: &KernelGrid, params: &FlowParams) -> Vec<Shape> {
    let lines = generate(grid, params);
    let ribbons: Vec<Vec<Shape>> = lines
        .par_iter()
        .map(|line| {
            build_ribbon(line, grid, params)
                .map(|r| r.into_shapes())
                .unwrap_or_default()
        })
        .collect();
    let drawn = ribbons.iter().filter(|r| !r.is_empty()).count();
    tracing::debug!(lines = lines.len(), drawn, "flow ribbons");
    ribbons.into_iter().flatten().collect()
}
