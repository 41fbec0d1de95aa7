use crate::color::Rgba;

/// Running per-kernel color statistics, plus the kernel's gradient once estimated.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ColorAccumulator {
    sum_a: u64,
    sum_r: u64,
    sum_g: u64,
    sum_b: u64,
    count: u64,
    /// Direction of steepest luminance increase, in radians. Zero until
    /// [`estimate_gradients`][crate::gradient::estimate_gradients] runs.
    pub gradient_angle: f64,
    /// Gradient strength normalized to `0.0..=1.0` over the grid.
    pub gradient_magnitude: f64,
}

impl ColorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, c: Rgba) {
        self.sum_r += u64::from(c.r);
        self.sum_g += u64::from(c.g);
        self.sum_b += u64::from(c.b);
        self.sum_a += u64::from(c.a);
        self.count += 1;
    }

    /// Folds the color sums of `other` into `self`. Gradient fields are left untouched.
    pub fn merge(&mut self, other: &ColorAccumulator) {
        self.sum_r += other.sum_r;
        self.sum_g += other.sum_g;
        self.sum_b += other.sum_b;
        self.sum_a += other.sum_a;
        self.count += other.count;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Integer mean of every channel, alpha included; transparent black when empty.
    pub fn average(&self) -> Rgba {
        if self.count == 0 {
            return Rgba::TRANSPARENT;
        }
        let mean = |sum: u64| (sum / self.count) as u8;
        Rgba::new(
            mean(self.sum_r),
            mean(self.sum_g),
            mean(self.sum_b),
            mean(self.sum_a),
        )
    }

    /// BT.709 luminance of the average color in `0.0..=255.0`; zero when empty.
    pub fn luminance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        f64::from(self.average().luminance())
    }

    /// Average alpha in `0.0..=255.0`.
    pub fn alpha(&self) -> f64 {
        f64::from(self.average().a)
    }

    /// Inverted luminance in `0.0..=255.0`: 255 for black, 0 for white.
    pub fn gray(&self) -> f64 {
        255.0 - self.luminance()
    }

    /// How much of the kernel the foreground should cover, in `0.0..=1.0`: darkness scaled by
    /// opacity.
    pub fn coverage(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.gray() / 255.0) * (self.alpha() / 255.0)
    }
}
