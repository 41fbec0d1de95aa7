use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::HalftoneError;
use crate::flow::FlowParams;
use crate::patterns::{Palette, Pattern, SineParams, StippleParams, StippleSizing};

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternKind {
    Dots,
    Squares,
    Polygons,
    Triangles,
    Lines,
    Sine,
    Stippling,
    FlowLines,
}

/// Everything that can be set from the command line or a JSON settings file. Fields missing
/// from a settings file take their defaults.
#[derive(Debug, Clone, PartialEq, clap::Args, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Edge length of one sampling kernel, in pixels.
    #[clap(long, default_value_t = 15)]
    pub kernel_size: u32,

    /// Screen angle in degrees.
    #[clap(long, default_value_t = 45.0, allow_negative_numbers = true)]
    pub angle: f64,

    #[clap(long, value_enum, default_value_t = PatternKind::Dots)]
    pub pattern: PatternKind,

    /// Background color, as `#rrggbb` or `#rrggbbaa`.
    #[clap(long, default_value_t = Rgba::WHITE)]
    pub background: Rgba,

    /// Foreground (ink) color, as `#rrggbb` or `#rrggbbaa`.
    #[clap(long, default_value_t = Rgba::BLACK)]
    pub foreground: Rgba,

    /// Number of polygon sides.
    #[clap(long, default_value_t = 4)]
    pub sides: u32,

    /// Stipple points in a fully dark kernel (0 to 100).
    #[clap(long, default_value_t = 85)]
    pub density: u32,

    /// Seed for stipple placement.
    #[clap(long, default_value_t = 123456789)]
    pub seed: u64,

    /// Size stipple points from the precomputed packing table instead of searching.
    #[clap(long)]
    pub stipple_lookup: bool,

    /// Shortest flow-line step, in kernels.
    #[clap(long, default_value_t = 1.0)]
    pub min_step: f64,

    /// Longest flow-line step, in kernels.
    #[clap(long, default_value_t = 5.0)]
    pub max_step: f64,

    /// Flow-line width smoothing window, in positions on either side.
    #[clap(long, default_value_t = 2)]
    pub smoothing_radius: usize,

    /// Flow lines with fewer kernels are dropped.
    #[clap(long, default_value_t = 2)]
    pub min_line_length: usize,

    /// Run flow lines along the gradient instead of along isophotes.
    #[clap(long)]
    pub follow_gradient: bool,

    #[clap(long, default_value_t = 50)]
    pub bezier_resolution: usize,

    /// Blur radius for the gradient field, in kernels.
    #[clap(long, default_value_t = 1)]
    pub gradient_blur: usize,

    /// Sine amplitude, as a multiple of half a kernel.
    #[clap(long, default_value_t = 1.0)]
    pub amplitude: f64,

    /// Sine frequency, as a multiple of one period per six kernels.
    #[clap(long, default_value_t = 1.0)]
    pub frequency: f64,

    /// Sample the image as is, without padding its edges by one kernel first.
    #[clap(long)]
    pub no_border: bool,
}

impl Default for Config {
    fn default() -> Self {
        let flow = FlowParams::default();
        let stipple = StippleParams::default();
        let sine = SineParams::default();
        Config {
            kernel_size: 15,
            angle: 45.0,
            pattern: PatternKind::Dots,
            background: Rgba::WHITE,
            foreground: Rgba::BLACK,
            sides: 4,
            density: stipple.density,
            seed: stipple.seed,
            stipple_lookup: false,
            min_step: flow.min_step,
            max_step: flow.max_step,
            smoothing_radius: flow.smoothing_radius,
            min_line_length: flow.min_line_length,
            follow_gradient: flow.follow_gradient,
            bezier_resolution: flow.resolution,
            gradient_blur: flow.blur_radius,
            amplitude: sine.amplitude,
            frequency: sine.frequency,
            no_border: false,
        }
    }
}

impl Config {
    /// The selected pattern with its parameters, and the rest of the settings, validated.
    pub fn settings(&self) -> Result<Settings, HalftoneError> {
        let pattern = match self.pattern {
            PatternKind::Dots => Pattern::Dots,
            PatternKind::Squares => Pattern::Squares,
            PatternKind::Polygons => Pattern::Polygons { sides: self.sides },
            PatternKind::Triangles => Pattern::Triangles,
            PatternKind::Lines => Pattern::Lines,
            PatternKind::Sine => Pattern::SineWaves(SineParams {
                amplitude: self.amplitude,
                frequency: self.frequency,
            }),
            PatternKind::Stippling => Pattern::Stippling(StippleParams {
                density: self.density,
                seed: self.seed,
                sizing: if self.stipple_lookup {
                    StippleSizing::Lookup
                } else {
                    StippleSizing::Solver
                },
            }),
            PatternKind::FlowLines => Pattern::FlowLines(FlowParams {
                min_step: self.min_step,
                max_step: self.max_step,
                smoothing_radius: self.smoothing_radius,
                min_line_length: self.min_line_length,
                follow_gradient: self.follow_gradient,
                resolution: self.bezier_resolution,
                blur_radius: self.gradient_blur,
                ..FlowParams::default()
            }),
        };
        let settings = Settings {
            kernel_size: self.kernel_size,
            angle: self.angle,
            palette: Palette {
                background: self.background,
                foreground: self.foreground,
            },
            pattern,
            expand_border: !self.no_border,
        };
        settings.validate()?;
        Ok(settings)
    }
}

/// One complete, immutable rendering job description.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub kernel_size: u32,
    /// Screen angle in degrees.
    pub angle: f64,
    pub palette: Palette,
    pub pattern: Pattern,
    /// Pad the image by one kernel of replicated edge pixels before sampling, and crop the
    /// padding off the result.
    pub expand_border: bool,
}

impl Settings {
    pub fn validate(&self) -> Result<(), HalftoneError> {
        if self.kernel_size == 0 {
            return Err(HalftoneError::ZeroKernelSize);
        }
        self.pattern.validate()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            kernel_size: 15,
            angle: 45.0,
            palette: Palette::default(),
            pattern: Pattern::Dots,
            expand_border: true,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[clap(flatten)]
        config: Config,
    }

    #[test]
    fn test_cli_defaults_match_default() {
        let cli = Cli::parse_from(["halftone"]);
        assert_eq!(cli.config, Config::default());
        assert_eq!(Config::default().settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "halftone",
            "--pattern",
            "flow-lines",
            "--angle",
            "-15",
            "--foreground",
            "#1e90ff",
            "--max-step",
            "8",
            "--follow-gradient",
        ]);
        let settings = cli.config.settings().unwrap();
        assert_eq!(settings.angle, -15.0);
        assert_eq!(settings.palette.foreground, Rgba::opaque(0x1e, 0x90, 0xff));
        match settings.pattern {
            Pattern::FlowLines(p) => {
                assert_eq!(p.max_step, 8.0);
                assert!(p.follow_gradient);
                assert_eq!(p.max_passes, 10);
            }
            other => panic!("unexpected pattern {:?}", other),
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r##"{"pattern": "stippling", "density": 30, "background": "#000000"}"##;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.kernel_size, 15);
        assert_eq!(config.background, Rgba::BLACK);
        let settings = config.settings().unwrap();
        assert_eq!(
            settings.pattern,
            Pattern::Stippling(StippleParams {
                density: 30,
                seed: 123456789,
                sizing: StippleSizing::Solver,
            })
        );
    }

    #[test]
    fn test_json_round_trip() {
        let config = Config {
            pattern: PatternKind::Sine,
            amplitude: 2.5,
            no_border: true,
            ..Config::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        assert!(text.contains("\"noBorder\":true"), "{}", text);
        let back: Config = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        const TEST_CASES: &[(&str, HalftoneError)] = &[
            (r#"{"kernelSize": 0}"#, HalftoneError::ZeroKernelSize),
            (
                r#"{"pattern": "polygons", "sides": 2}"#,
                HalftoneError::TooFewSides(2),
            ),
            (
                r#"{"pattern": "stippling", "density": 150}"#,
                HalftoneError::DensityOutOfRange(150),
            ),
            (
                r#"{"pattern": "flow-lines", "minStep": 4, "maxStep": 2}"#,
                HalftoneError::InvalidStepRange { min: 4.0, max: 2.0 },
            ),
        ];
        for (json, want) in TEST_CASES {
            let config: Config = serde_json::from_str(json).unwrap();
            match config.settings() {
                Err(got) if &got == want => {}
                other => panic!("{}: got {:?}, want {:?}", json, other, want),
            }
        }
    }
}
