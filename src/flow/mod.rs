//! Flow lines: polylines through the kernel grid that follow the local gradient (or the
//! isophotes across it), merged greedily and rendered as variable-width Bézier ribbons.

pub mod bezier;
pub mod generator;
pub mod line;

pub use bezier::{build_ribbon, half_thickness, BezierControlSet, BezierPoint, Ribbon};
pub use generator::generate;
pub use line::FlowLine;

use crate::error::HalftoneError;
use crate::math::pi;

#[derive(Debug, Clone, PartialEq)]
pub struct FlowParams {
    /// Shortest step between consecutive kernels of a line, in kernels.
    pub min_step: f64,
    /// Longest step, taken by dark or high-contrast kernels.
    pub max_step: f64,
    /// Half-width smoothing window along a line, in positions on either side.
    pub smoothing_radius: usize,
    /// Lines with fewer positions are not drawn.
    pub min_line_length: usize,
    /// Follow the gradient itself instead of running along isophotes.
    pub follow_gradient: bool,
    /// Number of Bézier segments sampled per line.
    pub resolution: usize,
    /// Box blur radius applied to the gradient field, in kernels.
    pub blur_radius: usize,
    pub max_passes: usize,
    /// Largest direction change (radians) at which two lines may still be joined.
    pub max_merge_angle: f64,
}

impl Default for FlowParams {
    fn default() -> Self {
        FlowParams {
            min_step: 1.0,
            max_step: 5.0,
            smoothing_radius: 2,
            min_line_length: 2,
            follow_gradient: false,
            resolution: 50,
            blur_radius: 1,
            max_passes: 10,
            max_merge_angle: pi(1.0 / 3.0),
        }
    }
}

impl FlowParams {
    pub fn validate(&self) -> Result<(), HalftoneError> {
        let (min, max) = (self.min_step, self.max_step);
        if !(min > 0.0 && min.is_finite() && max.is_finite() && max >= min) {
            return Err(HalftoneError::InvalidStepRange { min, max });
        }
        if self.resolution == 0 {
            return Err(HalftoneError::ZeroResolution);
        }
        Ok(())
    }
}
