//! Turning flow lines into filled ribbons: one Bézier curve per line, with a smoothed half-width
//! carried along the same curve.

use crate::accumulator::ColorAccumulator;
use crate::canvas::Shape;
use crate::grid::KernelGrid;
use crate::math::normalize;
use crate::patterns::MIN_HALF_THICKNESS;

use super::{FlowLine, FlowParams};

/// End caps smaller than this are not drawn.
pub const MIN_CAP_RADIUS: f64 = 0.25;

/// Ribbon half-thickness for one kernel, in pixels.
///
/// Darkness scales the width up to half the kernel; the gradient magnitude only matters where it
/// exceeds the darkness, so flat dark regions stay thick. Transparency thins the ribbon.
pub fn half_thickness(cell: &ColorAccumulator, kernel_size: u32) -> f64 {
    if cell.is_empty() {
        return 0.0;
    }
    let darkness = 1.0 - cell.luminance() / 255.0;
    let magnitude = cell.gradient_magnitude.max(darkness);
    let t = f64::from(kernel_size) / 2.0 * darkness * magnitude * (cell.alpha() / 255.0);
    if t > MIN_HALF_THICKNESS {
        t
    } else {
        0.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BezierPoint {
    /// Rotated-space position.
    pub position: (f64, f64),
    pub half_width: f64,
}

/// The control polygon of one flow line in rotated pixel space, with one smoothed half-width per
/// control point.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierControlSet {
    points: Vec<(f64, f64)>,
    half_widths: Vec<f64>,
}

impl BezierControlSet {
    /// Each half-width is the mean [`half_thickness`] of the occupied kernels within
    /// `smoothing_radius` positions along the line, or zero if there are none.
    pub fn from_line(line: &FlowLine, grid: &KernelGrid, smoothing_radius: usize) -> Self {
        let base: Vec<Option<f64>> = line
            .kernels()
            .map(|k| {
                grid.get(k.row as isize, k.col as isize)
                    .filter(|cell| !cell.is_empty())
                    .map(|cell| half_thickness(cell, grid.kernel_size()))
            })
            .collect();

        let half_widths = (0..base.len())
            .map(|i| {
                let lo = i.saturating_sub(smoothing_radius);
                let hi = usize::min(i + smoothing_radius, base.len() - 1);
                let (sum, count) = base[lo..=hi]
                    .iter()
                    .flatten()
                    .fold((0.0, 0u32), |(sum, count), w| (sum + w, count + 1));
                if count > 0 {
                    sum / f64::from(count)
                } else {
                    0.0
                }
            })
            .collect();

        BezierControlSet {
            points: line
                .positions()
                .iter()
                .map(|&p| grid.grid_to_rotated(p))
                .collect(),
            half_widths,
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn half_widths(&self) -> &[f64] {
        &self.half_widths
    }

    /// Evaluates the curve of degree `len - 1` through all control points at `resolution + 1`
    /// evenly spaced parameters, blending the half-widths with the same basis.
    pub fn sample(&self, resolution: usize) -> Vec<BezierPoint> {
        if self.points.is_empty() || resolution == 0 {
            return Vec::new();
        }
        let ln_binom = ln_binomials(self.points.len() - 1);
        (0..=resolution)
            .map(|step| {
                let t = step as f64 / resolution as f64;
                let weights = bernstein(&ln_binom, t);
                let mut p = BezierPoint {
                    position: (0.0, 0.0),
                    half_width: 0.0,
                };
                for ((w, &(x, y)), hw) in weights.iter().zip(&self.points).zip(&self.half_widths) {
                    p.position.0 += w * x;
                    p.position.1 += w * y;
                    p.half_width += w * hw;
                }
                p
            })
            .collect()
    }
}

/// `ln C(n, i)` for `i` in `0..=n`.
fn ln_binomials(n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n + 1];
    for i in 1..=n {
        out[i] = out[i - 1] + ((n - i + 1) as f64).ln() - (i as f64).ln();
    }
    out
}

/// Bernstein basis of degree `ln_binom.len() - 1` at `t`, evaluated in log space.
fn bernstein(ln_binom: &[f64], t: f64) -> Vec<f64> {
    let n = ln_binom.len() - 1;
    let mut out = vec![0.0; n + 1];
    if t <= 0.0 {
        out[0] = 1.0;
    } else if t >= 1.0 {
        out[n] = 1.0;
    } else {
        let (ln_t, ln_u) = (t.ln(), (1.0 - t).ln());
        for (i, w) in out.iter_mut().enumerate() {
            *w = (ln_binom[i] + (n - i) as f64 * ln_u + i as f64 * ln_t).exp();
        }
    }
    out
}

/// Offsets every sample by its half-width to both sides of the curve and joins the two edges
/// into one closed outline in image space: left edge forwards, right edge backwards.
///
/// Samples whose offsets cannot be mapped back to the image are dropped; `None` if fewer than
/// two remain.
pub fn ribbon_outline(samples: &[BezierPoint], grid: &KernelGrid) -> Option<Vec<(f64, f64)>> {
    let n = samples.len();
    if n < 2 {
        return None;
    }
    let mut left = Vec::with_capacity(n);
    let mut right = Vec::with_capacity(n);
    for (i, s) in samples.iter().enumerate() {
        let (x, y) = s.position;
        let towards = |p: (f64, f64), q: (f64, f64)| normalize((q.0 - p.0, q.1 - p.1));
        let tangent = if i == 0 {
            towards(s.position, samples[1].position)
        } else if i == n - 1 {
            towards(samples[n - 2].position, s.position)
        } else {
            let incoming = towards(samples[i - 1].position, s.position);
            let outgoing = towards(s.position, samples[i + 1].position);
            normalize((incoming.0 + outgoing.0, incoming.1 + outgoing.1))
        };
        let normal = (-tangent.1, tangent.0);
        let hw = s.half_width;
        let l = grid.to_image((x + normal.0 * hw, y + normal.1 * hw));
        let r = grid.to_image((x - normal.0 * hw, y - normal.1 * hw));
        if let (Some(l), Some(r)) = (l, r) {
            left.push(l);
            right.push(r);
        }
    }
    if left.len() < 2 {
        return None;
    }
    left.extend(right.into_iter().rev());
    Some(left)
}

/// The filled outline of one flow line plus round caps at its two ends, in image space.
#[derive(Debug, Clone, PartialEq)]
pub struct Ribbon {
    pub outline: Vec<(f64, f64)>,
    /// `(center, radius)` of each end cap that is large enough to draw.
    pub caps: Vec<((f64, f64), f64)>,
}

impl Ribbon {
    /// The ribbon body and its caps as separate shapes, so overlapping regions do not cancel
    /// under the fill rule.
    pub fn into_shapes(self) -> Vec<Shape> {
        std::iter::once(Shape::Polygon(self.outline))
            .chain(
                self.caps
                    .into_iter()
                    .map(|(center, radius)| Shape::Circle { center, radius }),
            )
            .collect()
    }
}

/// Builds the ribbon for `line`, or `None` if the line is too short, too thin everywhere, or
/// cannot be mapped back to the image.
pub fn build_ribbon(line: &FlowLine, grid: &KernelGrid, params: &FlowParams) -> Option<Ribbon> {
    if line.len() < params.min_line_length.max(2) {
        return None;
    }
    let samples =
        BezierControlSet::from_line(line, grid, params.smoothing_radius).sample(params.resolution);
    if samples.iter().all(|s| s.half_width <= MIN_HALF_THICKNESS) {
        return None;
    }
    let outline = ribbon_outline(&samples, grid)?;
    let caps = [samples.first(), samples.last()]
        .into_iter()
        .flatten()
        .filter(|s| s.half_width >= MIN_CAP_RADIUS)
        .filter_map(|s| grid.to_image(s.position).map(|c| (c, s.half_width)))
        .collect();
    Some(Ribbon { outline, caps })
}
