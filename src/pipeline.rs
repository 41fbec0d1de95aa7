//! One end-to-end rendering job: image in, halftoned image of the same size out.

use std::time::Instant;

use crate::border;
use crate::config::Settings;
use crate::error::HalftoneError;
use crate::gradient::estimate_gradients;
use crate::grid::KernelGrid;
use crate::patterns::{self, Pattern};
use crate::raster::Raster;

/// Renders `image` with `settings`.
///
/// With `expand_border` set, the image is padded by one kernel of replicated edge pixels before
/// sampling and the padding is cropped off again, so the output always matches the input size.
pub fn render(image: &Raster, settings: &Settings) -> Result<Raster, HalftoneError> {
    settings.validate()?;
    if image.width() == 0 || image.height() == 0 {
        return Err(HalftoneError::EmptyImage);
    }
    let border = if settings.expand_border {
        settings.kernel_size
    } else {
        0
    };

    let padded;
    let source = if border > 0 {
        padded = timed("expand border", || border::expand(image, border));
        &padded
    } else {
        image
    };

    let mut grid = timed("build grid", || {
        KernelGrid::build(source, settings.kernel_size, settings.angle)
    })?;
    if let Pattern::FlowLines(params) = &settings.pattern {
        timed("estimate gradients", || {
            estimate_gradients(&mut grid, params.blur_radius)
        });
    }
    let rendered = timed(settings.pattern.name(), || {
        patterns::render(&grid, &settings.palette, &settings.pattern)
    })?;

    if border > 0 {
        border::crop(&rendered, border)
    } else {
        Ok(rendered)
    }
}

fn timed<T>(label: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = f();
    tracing::debug!(elapsed = ?start.elapsed(), "{}", label);
    result
}
