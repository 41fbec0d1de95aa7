//! One shape per kernel, centered on it and scaled by its coverage.

use crate::accumulator::ColorAccumulator;
use crate::canvas::Shape;
use crate::grid::{KernelGrid, KernelIndex};
use crate::math::pi;

use super::{per_kernel, polygon_to_image, MIN_SHAPE_RADIUS};

/// Dot radius for one kernel: its coverage times half the kernel diagonal.
pub fn dot_radius(cell: &ColorAccumulator, kernel_size: u32) -> f64 {
    cell.coverage() * f64::from(kernel_size) * 2f64.sqrt() / 2.0
}

pub fn dots(grid: &KernelGrid) -> Vec<Shape> {
    per_kernel(grid, |k, acc| {
        let radius = dot_radius(acc, grid.kernel_size());
        if radius < MIN_SHAPE_RADIUS {
            return vec![];
        }
        grid.to_image(grid.kernel_center(k))
            .map(|center| Shape::Circle { center, radius })
            .into_iter()
            .collect()
    })
}

/// Squares aligned with the rotated grid, reaching the full kernel at coverage 1.
pub fn squares(grid: &KernelGrid) -> Vec<Shape> {
    per_kernel(grid, |k, acc| {
        let half = acc.coverage() * f64::from(grid.kernel_size()) / 2.0;
        if half < MIN_SHAPE_RADIUS {
            return vec![];
        }
        let (cx, cy) = grid.kernel_center(k);
        let corners = [
            (cx - half, cy - half),
            (cx + half, cy - half),
            (cx + half, cy + half),
            (cx - half, cy + half),
        ];
        polygon_to_image(grid, &corners).into_iter().collect()
    })
}

/// Regular polygons with the dot radius as circumradius. The first vertex points at the
/// kernel's top-left corner, so every kernel's polygon has the same orientation.
pub fn polygons(grid: &KernelGrid, sides: u32) -> Vec<Shape> {
    per_kernel(grid, |k, acc| {
        let radius = dot_radius(acc, grid.kernel_size());
        if radius < MIN_SHAPE_RADIUS {
            return vec![];
        }
        let vertices = regular_polygon(grid.kernel_center(k), radius, sides, pi(-0.75));
        polygon_to_image(grid, &vertices).into_iter().collect()
    })
}

/// Triangles alternating between pointing up (even columns) and down (odd columns).
///
/// The side is `1.5 · L` at full coverage; the two base vertices are then pulled a quarter of
/// the way toward the apex.
pub fn triangles(grid: &KernelGrid) -> Vec<Shape> {
    per_kernel(grid, |k, acc| {
        let side = acc.coverage() * f64::from(grid.kernel_size()) * 1.5;
        let radius = side / 3f64.sqrt();
        if radius < MIN_SHAPE_RADIUS {
            return vec![];
        }
        let vertices = triangle(grid.kernel_center(k), radius, k);
        polygon_to_image(grid, &vertices).into_iter().collect()
    })
}

fn triangle(center: (f64, f64), radius: f64, k: KernelIndex) -> Vec<(f64, f64)> {
    let start = if k.col % 2 == 0 { pi(-0.5) } else { pi(0.5) };
    let mut vertices = regular_polygon(center, radius, 3, start);
    let apex = vertices[0];
    for v in &mut vertices[1..] {
        v.0 += 0.25 * (apex.0 - v.0);
        v.1 += 0.25 * (apex.1 - v.1);
    }
    vertices
}

fn regular_polygon(center: (f64, f64), radius: f64, sides: u32, start: f64) -> Vec<(f64, f64)> {
    (0..sides)
        .map(|i| {
            let angle = start + f64::from(i) * pi(2.0) / f64::from(sides);
            (
                center.0 + radius * angle.cos(),
                center.1 + radius * angle.sin(),
            )
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::Rgba;
    use crate::raster::Raster;

    fn black_grid() -> KernelGrid {
        KernelGrid::build(&Raster::filled(40, 40, Rgba::BLACK), 10, 0.0).unwrap()
    }

    fn assert_close(got: (f64, f64), want: (f64, f64)) {
        if (got.0 - want.0).abs() > 1e-9 || (got.1 - want.1).abs() > 1e-9 {
            panic!("got {:?}, want {:?}", got, want);
        }
    }

    #[test]
    fn test_black_dots_fill_kernel_diagonal() {
        let shapes = dots(&black_grid());
        assert_eq!(shapes.len(), 16);
        for (i, shape) in shapes.iter().enumerate() {
            let (row, col) = ((i / 4) as f64, (i % 4) as f64);
            match *shape {
                Shape::Circle { center, radius } => {
                    assert_close(center, (col * 10.0 + 5.0, row * 10.0 + 5.0));
                    assert!((radius - 10.0 * 2f64.sqrt() / 2.0).abs() < 1e-12);
                }
                _ => panic!("expected a circle, got {:?}", shape),
            }
        }
    }

    #[test]
    fn test_dot_radius_monotonic_in_darkness() {
        for alpha in [255, 128, 7] {
            let mut last = f64::INFINITY;
            for v in 0..=255u8 {
                let mut cell = ColorAccumulator::new();
                cell.add(Rgba::new(v, v, v, alpha));
                let r = dot_radius(&cell, 15);
                assert!(r <= last, "alpha {} gray {}: {} > {}", alpha, v, r, last);
                last = r;
            }
            assert_eq!(last, 0.0);
        }
    }

    #[test]
    fn test_white_draws_nothing() {
        let grid = KernelGrid::build(&Raster::filled(40, 40, Rgba::WHITE), 10, 20.0).unwrap();
        assert!(dots(&grid).is_empty());
        assert!(squares(&grid).is_empty());
        assert!(polygons(&grid, 6).is_empty());
        assert!(triangles(&grid).is_empty());
    }

    #[test]
    fn test_square_polygon_matches_kernel() {
        let shapes = polygons(&black_grid(), 4);
        let Shape::Polygon(points) = &shapes[0] else {
            panic!("expected a polygon");
        };
        let want = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        for (&got, want) in points.iter().zip(want) {
            assert_close(got, want);
        }

        let shapes = squares(&black_grid());
        assert_eq!(shapes.len(), 16);
        assert_eq!(
            shapes[5],
            Shape::Polygon(vec![(10.0, 10.0), (20.0, 10.0), (20.0, 20.0), (10.0, 20.0)])
        );
    }

    #[test]
    fn test_triangles_alternate() {
        let r = 2.0;
        let up = triangle((0.0, 0.0), r, KernelIndex::new(0, 0));
        let down = triangle((0.0, 0.0), r, KernelIndex::new(0, 1));
        assert_close(up[0], (0.0, -r));
        assert_close(down[0], (0.0, r));
        // Base vertices sit at y = r/2 before being pulled toward the apex.
        for v in &up[1..] {
            assert!((v.1 - (0.5 * r - 0.25 * 1.5 * r)).abs() < 1e-12);
        }
        for v in &down[1..] {
            assert!((v.1 + (0.5 * r - 0.25 * 1.5 * r)).abs() < 1e-12);
        }
    }
}
