use thiserror::Error;

/// Configuration and input problems, reported before any synthesis starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HalftoneError {
    #[error("kernel size must be at least 1 pixel")]
    ZeroKernelSize,
    #[error("polygons need at least 3 sides (got {0})")]
    TooFewSides(u32),
    #[error("stipple density must be within 0..=100 (got {0})")]
    DensityOutOfRange(u32),
    #[error("the stipple lookup table covers densities 1..=100 (got {0})")]
    LookupDensityOutOfRange(u32),
    #[error("flow step range is invalid: min {min}, max {max}")]
    InvalidStepRange { min: f64, max: f64 },
    #[error("bezier resolution must be at least 1")]
    ZeroResolution,
    #[error("pixel buffer holds {actual} bytes but a {width}x{height} RGBA image needs {expected}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("image has no pixels")]
    EmptyImage,
    #[error("invalid color {0:?}: expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),
    #[error("cannot crop {border}px from each side of a {width}x{height} image")]
    CropTooLarge { border: u32, width: u32, height: u32 },
}
