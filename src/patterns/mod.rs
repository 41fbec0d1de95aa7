//! The pattern generators: each turns a kernel grid into foreground shapes over a background.

pub mod dots;
pub mod flow;
pub mod lines;
pub mod stipple;

use rayon::prelude::*;

use crate::accumulator::ColorAccumulator;
use crate::canvas::{Canvas, Shape};
use crate::color::Rgba;
use crate::error::HalftoneError;
use crate::flow::FlowParams;
use crate::grid::{KernelGrid, KernelIndex};
use crate::raster::Raster;

/// Shapes with a smaller radius (or half-side) than this are not drawn.
pub const MIN_SHAPE_RADIUS: f64 = 0.25;

/// Line and ribbon half-thicknesses at or below this are treated as zero.
pub const MIN_HALF_THICKNESS: f64 = 1.0 / 32.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgba,
    pub foreground: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            background: Rgba::WHITE,
            foreground: Rgba::BLACK,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SineParams {
    /// Multiplies the default amplitude of half a kernel.
    pub amplitude: f64,
    /// Multiplies the default frequency of one period per six kernels.
    pub frequency: f64,
}

impl Default for SineParams {
    fn default() -> Self {
        SineParams {
            amplitude: 1.0,
            frequency: 1.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StippleSizing {
    /// Search packings for the given density at render time.
    Solver,
    /// Use the tabulated circle-packing radii.
    Lookup,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StippleParams {
    /// Points in a fully dark, opaque kernel.
    pub density: u32,
    pub seed: u64,
    pub sizing: StippleSizing,
}

impl Default for StippleParams {
    fn default() -> Self {
        StippleParams {
            density: 85,
            seed: 123456789,
            sizing: StippleSizing::Solver,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Dots,
    Squares,
    Polygons { sides: u32 },
    Triangles,
    Lines,
    SineWaves(SineParams),
    Stippling(StippleParams),
    FlowLines(FlowParams),
}

impl Pattern {
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Dots => "Dots",
            Pattern::Squares => "Squares",
            Pattern::Polygons { .. } => "Polygons",
            Pattern::Triangles => "Triangles",
            Pattern::Lines => "Lines",
            Pattern::SineWaves(_) => "SineWaves",
            Pattern::Stippling(_) => "Stippling",
            Pattern::FlowLines(_) => "FlowLines",
        }
    }

    pub fn validate(&self) -> Result<(), HalftoneError> {
        match self {
            &Pattern::Polygons { sides } if sides < 3 => Err(HalftoneError::TooFewSides(sides)),
            Pattern::Stippling(p) => {
                if p.density > 100 {
                    return Err(HalftoneError::DensityOutOfRange(p.density));
                }
                if p.sizing == StippleSizing::Lookup && p.density == 0 {
                    return Err(HalftoneError::LookupDensityOutOfRange(p.density));
                }
                Ok(())
            }
            Pattern::FlowLines(p) => p.validate(),
            _ => Ok(()),
        }
    }

    /// The foreground shapes for `grid`, in image space and drawing order.
    ///
    /// Flow lines read the grid's gradient fields, which must already have been estimated.
    pub fn shapes(&self, grid: &KernelGrid) -> Result<Vec<Shape>, HalftoneError> {
        Ok(match self {
            Pattern::Dots => dots::dots(grid),
            Pattern::Squares => dots::squares(grid),
            &Pattern::Polygons { sides } => dots::polygons(grid, sides),
            Pattern::Triangles => dots::triangles(grid),
            Pattern::Lines => lines::straight(grid),
            Pattern::SineWaves(p) => lines::sine(grid, p),
            Pattern::Stippling(p) => stipple::stipple(grid, p)?,
            Pattern::FlowLines(p) => flow::ribbons(grid, p),
        })
    }
}

/// Paints `pattern` for `grid` over the palette background, at the size of the grid's source
/// image.
pub fn render(
    grid: &KernelGrid,
    palette: &Palette,
    pattern: &Pattern,
) -> Result<Raster, HalftoneError> {
    let shapes = pattern.shapes(grid)?;
    tracing::debug!(pattern = pattern.name(), shapes = shapes.len(), "painting");
    let (width, height) = grid.image_size();
    let mut canvas = Canvas::new(width, height, palette.background, palette.foreground);
    canvas.fill_all(&shapes);
    Ok(canvas.into_raster())
}

/// Runs `f` on every occupied kernel in parallel and concatenates the results in row-major
/// order.
pub(crate) fn per_kernel<F>(grid: &KernelGrid, f: F) -> Vec<Shape>
where
    F: Fn(KernelIndex, &ColorAccumulator) -> Vec<Shape> + Sync,
{
    let occupied: Vec<(KernelIndex, &ColorAccumulator)> = grid.occupied().collect();
    let shapes: Vec<Vec<Shape>> = occupied.into_par_iter().map(|(k, acc)| f(k, acc)).collect();
    shapes.into_iter().flatten().collect()
}

/// Maps a rotated-space polygon into image space; `None` if the grid rotation cannot be inverted.
pub(crate) fn polygon_to_image(grid: &KernelGrid, points: &[(f64, f64)]) -> Option<Shape> {
    points
        .iter()
        .map(|&p| grid.to_image(p))
        .collect::<Option<Vec<_>>>()
        .map(Shape::Polygon)
}
