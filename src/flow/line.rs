use crate::grid::KernelIndex;

/// A polyline through kernel centers, in fractional grid coordinates (`x` along columns, `y`
/// along rows), with the length-weighted average direction of the kernels it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLine {
    positions: Vec<(f64, f64)>,
    average_angle: f64,
}

impl FlowLine {
    /// A single-point line at the center of kernel `k`.
    pub fn seed(k: KernelIndex, angle: f64) -> Self {
        FlowLine {
            positions: vec![(k.col as f64 + 0.5, k.row as f64 + 0.5)],
            average_angle: angle,
        }
    }

    pub fn positions(&self) -> &[(f64, f64)] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn average_angle(&self) -> f64 {
        self.average_angle
    }

    pub fn start_kernel(&self) -> Option<KernelIndex> {
        self.positions.first().map(|&p| kernel_of(p))
    }

    pub fn end_kernel(&self) -> Option<KernelIndex> {
        self.positions.last().map(|&p| kernel_of(p))
    }

    /// The kernel of every position, in line order.
    pub fn kernels(&self) -> impl Iterator<Item = KernelIndex> + '_ {
        self.positions.iter().map(|&p| kernel_of(p))
    }

    /// Appends `other` after this line's end and re-weights the average direction by length.
    pub fn append(&mut self, other: FlowLine) {
        let (n, m) = (self.len() as f64, other.len() as f64);
        if n + m > 0.0 {
            self.average_angle = (self.average_angle * n + other.average_angle * m) / (n + m);
        }
        self.positions.extend(other.positions);
    }

    pub fn reverse(&mut self) {
        self.positions.reverse();
    }
}

fn kernel_of((x, y): (f64, f64)) -> KernelIndex {
    KernelIndex::new(y.floor() as usize, x.floor() as usize)
}
