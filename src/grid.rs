use rayon::prelude::*;

use crate::accumulator::ColorAccumulator;
use crate::color::Rgba;
use crate::error::HalftoneError;
use crate::math::Transform;
use crate::raster::Raster;

/// Axis-aligned bounding box of the rotated image, in rotated space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounds of the four corners of a `width` × `height` image under `rotation`.
    pub fn of_rotated_image(width: u32, height: u32, rotation: &Transform) -> Self {
        let mut b = Bounds {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for vx in [0.0, f64::from(width)] {
            for vy in [0.0, f64::from(height)] {
                let (x, y) = rotation.apply((vx, vy));
                b.min_x = b.min_x.min(x);
                b.max_x = b.max_x.max(x);
                b.min_y = b.min_y.min(y);
                b.max_y = b.max_y.max(y);
            }
        }
        b
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KernelIndex {
    pub row: usize,
    pub col: usize,
}

impl KernelIndex {
    pub fn new(row: usize, col: usize) -> Self {
        KernelIndex { row, col }
    }
}

/// The rotated grid of square kernels covering an image, with one [`ColorAccumulator`] per
/// kernel.
#[derive(Debug, Clone)]
pub struct KernelGrid {
    rows: usize,
    cols: usize,
    kernel_size: u32,
    image_width: u32,
    image_height: u32,
    bounds: Bounds,
    rotation: Transform,
    inverse: Option<Transform>,
    cells: Vec<ColorAccumulator>,
}

impl KernelGrid {
    /// Rotates the image bounds by `angle_degrees` about the image center, lays a grid of
    /// `kernel_size`-pixel kernels over the rotated bounding box, and accumulates every pixel
    /// into the kernel its rotated position falls in.
    ///
    /// Pixels whose rotated position lands just outside the grid (only possible on the far edges
    /// of the bounding box, through rounding) are dropped.
    pub fn build(
        image: &Raster,
        kernel_size: u32,
        angle_degrees: f64,
    ) -> Result<Self, HalftoneError> {
        if kernel_size == 0 {
            return Err(HalftoneError::ZeroKernelSize);
        }
        let (width, height) = (image.width(), image.height());
        let center = (f64::from(width) / 2.0, f64::from(height) / 2.0);
        let rotation = Transform::rotation_about(angle_degrees.to_radians(), center);
        let bounds = Bounds::of_rotated_image(width, height, &rotation);

        let size = f64::from(kernel_size);
        let rows = (bounds.height() / size).ceil() as usize;
        let cols = (bounds.width() / size).ceil() as usize;

        let mut grid = KernelGrid {
            rows,
            cols,
            kernel_size,
            image_width: width,
            image_height: height,
            bounds,
            rotation,
            inverse: rotation.inverse(),
            cells: Vec::new(),
        };

        // Each fold task owns a full grid, so split the rows into about one chunk per thread.
        let min_rows = (height as usize / rayon::current_num_threads().max(1)).max(1);
        let blank = || vec![ColorAccumulator::default(); rows * cols];
        grid.cells = (0..height)
            .into_par_iter()
            .with_min_len(min_rows)
            .fold(blank, |mut cells, y| {
                for (x, px) in image.row(y).chunks_exact(4).enumerate() {
                    let p = (x as f64, f64::from(y));
                    if let Some(k) = grid.kernel_at(grid.rotation.apply(p)) {
                        cells[k.row * cols + k.col].add(Rgba::new(px[0], px[1], px[2], px[3]));
                    }
                }
                cells
            })
            .reduce(blank, |mut a, b| {
                for (x, y) in a.iter_mut().zip(&b) {
                    x.merge(y);
                }
                a
            });

        tracing::debug!(rows, cols, kernel_size, angle_degrees, "built kernel grid");
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn kernel_size(&self) -> u32 {
        self.kernel_size
    }

    /// Dimensions of the source image this grid was built from.
    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Map from image space into rotated space.
    pub fn rotation(&self) -> &Transform {
        &self.rotation
    }

    /// # Panics
    ///
    /// Panics if `k` lies outside the grid.
    pub fn cell(&self, k: KernelIndex) -> &ColorAccumulator {
        assert!(self.contains(k), "kernel {:?} outside grid", k);
        &self.cells[k.row * self.cols + k.col]
    }

    pub fn get(&self, row: isize, col: isize) -> Option<&ColorAccumulator> {
        if row < 0 || col < 0 {
            return None;
        }
        let k = KernelIndex::new(row as usize, col as usize);
        self.contains(k).then(|| self.cell(k))
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [ColorAccumulator] {
        &mut self.cells
    }

    pub fn contains(&self, k: KernelIndex) -> bool {
        k.row < self.rows && k.col < self.cols
    }

    /// All kernels in row-major order.
    pub fn indices(&self) -> impl Iterator<Item = KernelIndex> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| KernelIndex::new(row, col)))
    }

    /// Row-major `(index, accumulator)` pairs for kernels that received at least one pixel.
    pub fn occupied(&self) -> impl Iterator<Item = (KernelIndex, &ColorAccumulator)> + '_ {
        self.indices()
            .map(|k| (k, self.cell(k)))
            .filter(|(_, acc)| !acc.is_empty())
    }

    pub fn total_count(&self) -> u64 {
        self.cells.iter().map(ColorAccumulator::count).sum()
    }

    /// The kernel containing the rotated-space point `(xr, yr)`, if any.
    pub fn kernel_at(&self, (xr, yr): (f64, f64)) -> Option<KernelIndex> {
        let size = f64::from(self.kernel_size);
        let row = ((yr - self.bounds.min_y) / size).floor();
        let col = ((xr - self.bounds.min_x) / size).floor();
        if row < 0.0 || col < 0.0 || row >= self.rows as f64 || col >= self.cols as f64 {
            return None;
        }
        Some(KernelIndex::new(row as usize, col as usize))
    }

    /// Top-left corner of kernel `k`, in rotated space.
    pub fn kernel_origin(&self, k: KernelIndex) -> (f64, f64) {
        let size = f64::from(self.kernel_size);
        (
            self.bounds.min_x + k.col as f64 * size,
            self.bounds.min_y + k.row as f64 * size,
        )
    }

    /// Center of kernel `k`, in rotated space.
    pub fn kernel_center(&self, k: KernelIndex) -> (f64, f64) {
        let half = f64::from(self.kernel_size) / 2.0;
        let (x, y) = self.kernel_origin(k);
        (x + half, y + half)
    }

    /// Converts fractional grid coordinates (`x` along columns, `y` along rows) to rotated space.
    pub fn grid_to_rotated(&self, (gx, gy): (f64, f64)) -> (f64, f64) {
        let size = f64::from(self.kernel_size);
        (
            self.bounds.min_x + gx * size,
            self.bounds.min_y + gy * size,
        )
    }

    /// Maps a rotated-space point back into image space; `None` if the rotation cannot be
    /// inverted.
    pub fn to_image(&self, p: (f64, f64)) -> Option<(f64, f64)> {
        self.inverse.as_ref().map(|inv| inv.apply(p))
    }
}
