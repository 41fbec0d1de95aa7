//! Sizing stipple points so that a given number of them fits into one square kernel.

use crate::error::HalftoneError;

/// Smallest point diameter [`diameter_for_points`] will return.
pub const MIN_DIAMETER: f64 = 0.25;

/// Smallest radius [`lut_radius`] will return.
pub const MIN_LUT_RADIUS: f64 = 0.5;

/// One staggered-row arrangement of equal circles in an `L`×`L` square: `rows` rows alternating
/// between `cols` and `cols - 1` circles, starting with a full row.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HexPacking {
    pub diameter: f64,
    pub rows: usize,
    pub cols: usize,
}

impl HexPacking {
    /// Number of circles this arrangement holds.
    pub fn capacity(&self) -> usize {
        capacity(self.rows, self.cols)
    }

    /// Circle centers of the arrangement inside a `size`×`size` square with its top-left corner
    /// at the origin, row by row. The layout is centered in the square.
    pub fn slots(&self, size: f64) -> Vec<(f64, f64)> {
        let d = self.diameter;
        let row_step = d * 3f64.sqrt() / 2.0;
        let width = self.cols as f64 * d;
        let height = d + self.rows.saturating_sub(1) as f64 * row_step;
        let x0 = (size - width) / 2.0;
        let y0 = (size - height) / 2.0;

        let mut out = Vec::with_capacity(self.capacity());
        for row in 0..self.rows {
            let y = y0 + d / 2.0 + row as f64 * row_step;
            let (count, inset) = if row % 2 == 0 {
                (self.cols, d / 2.0)
            } else {
                (self.cols.saturating_sub(1), d)
            };
            for col in 0..count {
                out.push((x0 + inset + col as f64 * d, y));
            }
        }
        out
    }
}

/// How many circles fit in `rows` staggered rows: `(rows + 1) / 2` full rows of `cols` and
/// `rows / 2` short rows of `cols - 1`.
pub fn capacity(rows: usize, cols: usize) -> usize {
    let full = (rows + 1) / 2;
    let short = rows / 2;
    full * cols + short * cols.saturating_sub(1)
}

/// Searches every row count `1..=n` for the staggered arrangement of `n` circles in an
/// `L`×`L` square with the largest diameter.
///
/// For each row count the column count is the smallest that holds `n` circles; the diameter is
/// then limited by both the horizontal fit (`L / cols`) and the vertical one
/// (`L / (1 + (rows - 1)·√3/2)`). Ties keep the fewer rows. `n == 0` yields an empty packing.
pub fn hex_best(size: f64, n: usize) -> HexPacking {
    if n == 0 {
        return HexPacking {
            diameter: 0.0,
            rows: 0,
            cols: 0,
        };
    }
    let mut best = HexPacking {
        diameter: 0.0,
        rows: 1,
        cols: 1,
    };
    for rows in 1..=n {
        let mut cols = 1;
        while capacity(rows, cols) < n {
            cols += 1;
        }
        let horizontal = size / cols as f64;
        let vertical = size / (1.0 + (rows - 1) as f64 * 3f64.sqrt() / 2.0);
        let diameter = horizontal.min(vertical);
        if diameter > best.diameter {
            best = HexPacking {
                diameter,
                rows,
                cols,
            };
        }
    }
    best
}

/// Diameter at which `n` circles would cover an `L`×`L` square at the hexagonal packing density
/// π/(2√3). Always at least the true optimum, so it is only useful as a cap.
pub fn area_diameter(size: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let density = std::f64::consts::PI / (2.0 * 3f64.sqrt());
    (density * 4.0 * size * size / (std::f64::consts::PI * n as f64)).sqrt()
}

/// A diameter that lets `n` points pack into an `L`×`L` kernel: the best staggered packing,
/// capped by the area bound and the kernel itself, and never below [`MIN_DIAMETER`].
/// Returns 0 for `n == 0`.
pub fn diameter_for_points(size: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    hex_best(size, n)
        .diameter
        .min(area_diameter(size, n))
        .min(size)
        .max(MIN_DIAMETER)
}

/// Best known radius of `n` equal circles packed in a circle, as a fraction of the container
/// radius, for `n` in `1..=100`. Tabulated from published circle-in-circle packing records.
const LUT: [f64; 100] = [
    1.000000000000,
    0.500000000000,
    0.464101615138,
    0.414213562373,
    0.370191908159,
    0.333333333333,
    0.333333333333,
    0.302593388349,
    0.276768653914,
    0.262258924190,
    0.254854701717,
    0.248163470572,
    0.236067977500,
    0.231030727971,
    0.221172539086,
    0.216664742924,
    0.208679665570,
    0.205604646760,
    0.205604646760,
    0.195224011019,
    0.190392146849,
    0.183833026582,
    0.180336009254,
    0.176939130596,
    0.173827661421,
    0.171580252187,
    0.169307931135,
    0.166252750039,
    0.162903649277,
    0.161349109065,
    0.158944541560,
    0.155533985423,
    0.154161517947,
    0.151264028247,
    0.149316776635,
    0.148219429761,
    0.147955904479,
    0.143639218073,
    0.141685521745,
    0.140373604203,
    0.137740812925,
    0.136113748716,
    0.134771891080,
    0.133368245886,
    0.132049594252,
    0.130715880038,
    0.129463747327,
    0.128348756543,
    0.126792996262,
    0.125825489530,
    0.124571676602,
    0.123690164592,
    0.122255623688,
    0.121892021857,
    0.121786324528,
    0.119281497082,
    0.118382637652,
    0.117308193128,
    0.116380564996,
    0.115657480133,
    0.115456141678,
    0.113253291983,
    0.112456192918,
    0.111582595826,
    0.110896743723,
    0.109935057298,
    0.109063482023,
    0.108345017704,
    0.107877643365,
    0.107001616606,
    0.106204499837,
    0.105553253159,
    0.104817999688,
    0.104283629835,
    0.103390915666,
    0.102779181947,
    0.102052146984,
    0.101443439719,
    0.100958464654,
    0.100319499416,
    0.099891475492,
    0.099494327805,
    0.098844919277,
    0.098526721390,
    0.098395063693,
    0.097099624005,
    0.096495211836,
    0.095855792772,
    0.095233634544,
    0.094822059587,
    0.094636278506,
    0.093592245755,
    0.093167534622,
    0.092781315284,
    0.092249177761,
    0.091884716483,
    0.091419459906,
    0.091079798229,
    0.090636019813,
    0.090235200288,
];

/// Table-driven stipple radius: the tabulated fraction for `density` points times the kernel's
/// half-diagonal, never below [`MIN_LUT_RADIUS`].
pub fn lut_radius(size: u32, density: u32) -> Result<f64, HalftoneError> {
    if size == 0 {
        return Err(HalftoneError::ZeroKernelSize);
    }
    if !(1..=100).contains(&density) {
        return Err(HalftoneError::LookupDensityOutOfRange(density));
    }
    let half_diagonal = 2f64.sqrt() * f64::from(size) / 2.0;
    Ok((LUT[density as usize - 1] * half_diagonal).max(MIN_LUT_RADIUS))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_capacity() {
        const TEST_CASES: &[(usize, usize, usize)] = &[
            (1, 1, 1),
            (1, 5, 5),
            (2, 1, 1),
            (2, 3, 5),
            (3, 2, 5),
            (4, 3, 10),
            (5, 5, 23),
        ];
        for &(rows, cols, want) in TEST_CASES {
            let got = capacity(rows, cols);
            if got != want {
                panic!("capacity({}, {}): got {}, want {}", rows, cols, got, want);
            }
        }
    }

    #[test]
    fn test_hex_best() {
        const TEST_CASES: &[(usize, f64, usize, usize)] = &[
            (1, 10.0, 1, 1),
            (2, 5.0, 1, 2),
            (3, 5.0, 2, 2),
            (4, 3.6602540378443864, 3, 2),
            (7, 3.3333333333333335, 3, 3),
            (10, 2.7792629762666365, 4, 3),
            (19, 2.0, 5, 5),
            (85, 1.1111111111111112, 10, 9),
            (100, 1.0, 11, 10),
        ];
        for &(n, diameter, rows, cols) in TEST_CASES {
            let got = hex_best(10.0, n);
            if (got.diameter - diameter).abs() > 1e-12 || (got.rows, got.cols) != (rows, cols) {
                panic!(
                    "hex_best(10, {}): got {:?}, want ({}, {}, {})",
                    n, got, diameter, rows, cols
                );
            }
        }
    }

    #[test]
    fn test_hex_best_is_sound() {
        for size in [1.0, 7.5, 15.0, 64.0] {
            for n in 1..=100 {
                let p = hex_best(size, n);
                assert!(p.diameter > 0.0, "L={} N={}", size, n);
                assert!(p.capacity() >= n, "L={} N={}: {:?}", size, n, p);
                assert_eq!(p.slots(size).len(), p.capacity());
            }
        }
        assert_eq!(hex_best(10.0, 0).capacity(), 0);
    }

    #[test]
    fn test_slots_stay_inside_kernel() {
        for n in [1, 2, 5, 12, 40, 85] {
            let size = 15.0;
            let p = hex_best(size, n);
            let r = p.diameter / 2.0;
            let slots = p.slots(size);
            for &(x, y) in &slots {
                assert!(x >= r - 1e-9 && x <= size - r + 1e-9, "n={} x={}", n, x);
                assert!(y >= r - 1e-9 && y <= size - r + 1e-9, "n={} y={}", n, y);
            }
            for (i, a) in slots.iter().enumerate() {
                for b in &slots[i + 1..] {
                    let dist = f64::hypot(a.0 - b.0, a.1 - b.1);
                    assert!(dist >= p.diameter - 1e-9, "n={}: {:?} {:?}", n, a, b);
                }
            }
        }
    }

    #[test]
    fn test_diameter_for_points() {
        assert_eq!(diameter_for_points(10.0, 0), 0.0);
        assert_eq!(diameter_for_points(10.0, 1), 10.0);
        assert_eq!(diameter_for_points(10.0, 2), 5.0);
        // Tiny kernels bottom out at the floor.
        assert_eq!(diameter_for_points(1.0, 100), MIN_DIAMETER);
        for n in 1..=100 {
            let d = diameter_for_points(15.0, n);
            assert!(d <= area_diameter(15.0, n) + 1e-12);
            assert!(d <= 15.0);
        }
    }

    #[test]
    fn test_lut_radius() {
        let r = lut_radius(10, 1).unwrap();
        assert!((r - 10.0 * 2f64.sqrt() / 2.0).abs() < 1e-12);
        let r = lut_radius(10, 2).unwrap();
        assert!((r - 2.5 * 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(lut_radius(1, 100).unwrap(), MIN_LUT_RADIUS);
        assert_eq!(
            lut_radius(10, 0),
            Err(HalftoneError::LookupDensityOutOfRange(0))
        );
        assert_eq!(
            lut_radius(10, 101),
            Err(HalftoneError::LookupDensityOutOfRange(101))
        );
        assert_eq!(lut_radius(0, 5), Err(HalftoneError::ZeroKernelSize));
    }

    #[test]
    fn test_lut_is_non_increasing() {
        for pair in LUT.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }
}
