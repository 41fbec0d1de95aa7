//! Per-kernel luminance gradients, used to steer flow lines.

use crate::grid::KernelGrid;

const SOBEL_X: [[f64; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: [[f64; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Fills in `gradient_angle` and `gradient_magnitude` on every kernel of `grid`.
///
/// A 3×3 Sobel operator runs over the kernel luminance field (kernels outside the grid, and
/// empty kernels, read as luminance 0). Magnitudes are normalized so the strongest kernel has
/// magnitude 1. With `blur_radius > 0` both fields are then averaged over the in-grid kernels of
/// the `(2r + 1)²` square around each kernel: magnitudes arithmetically, angles as
/// magnitude-weighted unit vectors.
pub fn estimate_gradients(grid: &mut KernelGrid, blur_radius: usize) {
    let (rows, cols) = (grid.rows(), grid.cols());
    if rows == 0 || cols == 0 {
        return;
    }
    let luminance: Vec<f64> = grid.indices().map(|k| grid.cell(k).luminance()).collect();
    let lum_at = |r: isize, c: isize| -> f64 {
        if r < 0 || c < 0 || r as usize >= rows || c as usize >= cols {
            return 0.0;
        }
        luminance[r as usize * cols + c as usize]
    };

    let mut angles = vec![0.0; rows * cols];
    let mut magnitudes = vec![0.0; rows * cols];
    let mut max_magnitude: f64 = 0.0;
    for k in grid.indices() {
        let (mut gx, mut gy) = (0.0, 0.0);
        for dy in 0..3 {
            for dx in 0..3 {
                let v = lum_at(k.row as isize + dy as isize - 1, k.col as isize + dx as isize - 1);
                gx += v * SOBEL_X[dy][dx];
                gy += v * SOBEL_Y[dy][dx];
            }
        }
        let i = k.row * cols + k.col;
        angles[i] = f64::atan2(gy, gx);
        magnitudes[i] = f64::hypot(gx, gy);
        max_magnitude = max_magnitude.max(magnitudes[i]);
    }
    if max_magnitude > 0.0 {
        magnitudes.iter_mut().for_each(|m| *m /= max_magnitude);
    }

    if blur_radius > 0 {
        (angles, magnitudes) = blur(&angles, &magnitudes, rows, cols, blur_radius);
    }

    for (acc, (angle, magnitude)) in grid
        .cells_mut()
        .iter_mut()
        .zip(angles.into_iter().zip(magnitudes))
    {
        acc.gradient_angle = angle;
        acc.gradient_magnitude = magnitude;
    }
    tracing::debug!(rows, cols, blur_radius, max_magnitude, "estimated gradients");
}

fn blur(
    angles: &[f64],
    magnitudes: &[f64],
    rows: usize,
    cols: usize,
    radius: usize,
) -> (Vec<f64>, Vec<f64>) {
    let mut out_angles = vec![0.0; rows * cols];
    let mut out_magnitudes = vec![0.0; rows * cols];
    for row in 0..rows {
        for col in 0..cols {
            let (mut sum_mag, mut sum_sin, mut sum_cos) = (0.0, 0.0, 0.0);
            let mut count = 0u32;
            let neighbours = |center: usize, len: usize| {
                center.saturating_sub(radius)..=usize::min(center + radius, len - 1)
            };
            for r in neighbours(row, rows) {
                for c in neighbours(col, cols) {
                    let (angle, mag) = (angles[r * cols + c], magnitudes[r * cols + c]);
                    sum_mag += mag;
                    sum_sin += angle.sin() * mag;
                    sum_cos += angle.cos() * mag;
                    count += 1;
                }
            }
            let i = row * cols + col;
            out_magnitudes[i] = sum_mag / f64::from(count);
            out_angles[i] = f64::atan2(sum_sin, sum_cos);
        }
    }
    (out_angles, out_magnitudes)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::Rgba;
    use crate::grid::KernelIndex;
    use crate::math::pi;
    use crate::raster::Raster;

    /// Horizontal ramp: kernel column `c` has gray level `step * c`.
    fn ramp(cols: u32, step: u8) -> KernelGrid {
        let mut image = Raster::filled(cols * 4, 20, Rgba::BLACK);
        for y in 0..20 {
            for x in 0..cols * 4 {
                let v = (x / 4) as u8 * step;
                image.put_pixel(x, y, Rgba::opaque(v, v, v));
            }
        }
        KernelGrid::build(&image, 4, 0.0).unwrap()
    }

    #[test]
    fn test_ramp_points_toward_brighter_columns() {
        let mut grid = ramp(8, 30);
        estimate_gradients(&mut grid, 0);
        // Interior kernels away from the zero-padded border see a pure +x gradient.
        for row in 1..grid.rows() - 1 {
            for col in 1..grid.cols() - 1 {
                let k = KernelIndex::new(row, col);
                assert_eq!(grid.cell(k).gradient_angle, 0.0, "{:?}", k);
                assert!(grid.cell(k).gradient_magnitude > 0.0);
            }
        }
    }

    #[test]
    fn test_magnitude_normalized() {
        let mut grid = ramp(6, 40);
        estimate_gradients(&mut grid, 0);
        let max = grid
            .indices()
            .map(|k| grid.cell(k).gradient_magnitude)
            .fold(0.0, f64::max);
        assert_eq!(max, 1.0);
        for k in grid.indices() {
            let m = grid.cell(k).gradient_magnitude;
            assert!((0.0..=1.0).contains(&m));
        }
    }

    #[test]
    fn test_blur_averages_directions_across_wraparound() {
        // Two equally strong directions at ±(π - 0.1) average to π, not 0.
        let angles = [pi(1.0) - 0.1, -pi(1.0) + 0.1];
        let magnitudes = [1.0, 1.0];
        let (a, m) = blur(&angles, &magnitudes, 1, 2, 1);
        for v in a {
            assert!((v.abs() - pi(1.0)).abs() < 1e-9, "{}", v);
        }
        assert_eq!(m, vec![1.0, 1.0]);
    }

    #[test]
    fn test_blur_window_is_square() {
        // Only the corners are strong.
        let magnitudes = [1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0];
        const TEST_CASES: &[(usize, usize, f64)] = &[
            (1, 4, 4.0 / 9.0),
            (1, 0, 1.0 / 4.0),
            (1, 1, 2.0 / 6.0),
            (2, 4, 4.0 / 9.0),
            (2, 0, 4.0 / 9.0),
        ];
        for &(radius, i, want) in TEST_CASES {
            let (_, m) = blur(&[0.0; 9], &magnitudes, 3, 3, radius);
            if m[i] != want {
                panic!("radius {}, cell {}: got {}, want {}", radius, i, m[i], want);
            }
        }

        // The far corner of a 5×5 window lies outside the radius-2 disc but still counts.
        let mut magnitudes = [0.0; 25];
        magnitudes[0] = 1.0;
        let (_, m) = blur(&[0.0; 25], &magnitudes, 5, 5, 2);
        assert_eq!(m[12], 1.0 / 25.0);
    }

    #[test]
    fn test_flat_image_has_no_interior_gradient() {
        let image = Raster::filled(40, 40, Rgba::opaque(90, 90, 90));
        let mut grid = KernelGrid::build(&image, 5, 0.0).unwrap();
        estimate_gradients(&mut grid, 0);
        let center = grid.cell(KernelIndex::new(4, 4));
        assert_eq!(center.gradient_magnitude, 0.0);
    }
}
