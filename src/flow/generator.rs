use crate::accumulator::ColorAccumulator;
use crate::grid::{KernelGrid, KernelIndex};
use crate::math::{angle_difference, pi};

use super::{FlowLine, FlowParams};

/// Seeds one line per occupied kernel and merges lines end to end for up to
/// `params.max_passes` passes, stopping early after a pass without merges.
///
/// Lines are returned in seeding (row-major) order of their surviving owner, so the result
/// depends only on the grid and the parameters.
pub fn generate(grid: &KernelGrid, params: &FlowParams) -> Vec<FlowLine> {
    let mut field = FlowField::seed(grid, params);
    let seeded = field.lines.len();
    for pass in 0..params.max_passes {
        let merges = field.merge_pass();
        tracing::trace!(pass, merges, "flow merge pass");
        if merges == 0 {
            break;
        }
    }
    let lines: Vec<FlowLine> = field.lines.into_iter().flatten().collect();
    tracing::debug!(seeded, merged = lines.len(), "generated flow lines");
    lines
}

/// Arena of lines plus, per kernel, the index of the line currently covering it.
struct FlowField<'a> {
    grid: &'a KernelGrid,
    params: &'a FlowParams,
    lines: Vec<Option<FlowLine>>,
    owner: Vec<Option<usize>>,
}

impl<'a> FlowField<'a> {
    fn seed(grid: &'a KernelGrid, params: &'a FlowParams) -> Self {
        let mut lines = Vec::new();
        let mut owner = vec![None; grid.rows() * grid.cols()];
        for (k, acc) in grid.occupied() {
            owner[k.row * grid.cols() + k.col] = Some(lines.len());
            lines.push(Some(FlowLine::seed(k, target_angle(acc, params))));
        }
        FlowField {
            grid,
            params,
            lines,
            owner,
        }
    }

    fn owner_of(&self, k: KernelIndex) -> Option<usize> {
        self.owner[k.row * self.grid.cols() + k.col]
    }

    fn line(&self, id: usize) -> Option<&FlowLine> {
        self.lines[id].as_ref()
    }

    /// One row-major sweep over the grid, trying to extend every line from whichever of its
    /// endpoints is visited. Returns the number of merges performed.
    fn merge_pass(&mut self) -> usize {
        let grid = self.grid;
        let mut merges = 0;
        for k in grid.indices() {
            let id = match self.owner_of(k) {
                Some(id) => id,
                None => continue,
            };
            let (is_start, is_end) = match self.line(id) {
                Some(line) => (line.start_kernel() == Some(k), line.end_kernel() == Some(k)),
                None => continue,
            };
            let merged = if is_end {
                // A single-point line is both ends; it may also grow backwards.
                self.try_merge(k, id, true) || (is_start && self.try_merge(k, id, false))
            } else if is_start {
                self.try_merge(k, id, false)
            } else {
                false
            };
            if merged {
                merges += 1;
            }
        }
        merges
    }

    /// Steps from endpoint `k` of line `id` (forwards along the kernel direction from the end,
    /// backwards from the start) and joins the line found there if its endpoint is the kernel
    /// reached and the two kernel directions agree.
    fn try_merge(&mut self, k: KernelIndex, id: usize, forward: bool) -> bool {
        let angle = target_angle(self.grid.cell(k), self.params);
        let heading = if forward { angle } else { angle + pi(1.0) };
        let next = match self.next_kernel(k, heading) {
            Some(next) => next,
            None => return false,
        };
        let other = match self.owner_of(next) {
            Some(other) if other != id => other,
            _ => return false,
        };
        let next_angle = target_angle(self.grid.cell(next), self.params);
        // Compares kernel directions, not the heading, so backward steps can merge.
        if angle_difference(angle, next_angle) > self.params.max_merge_angle {
            return false;
        }
        let (other_start, other_end) = match self.line(other) {
            Some(line) => (line.start_kernel(), line.end_kernel()),
            None => return false,
        };

        match (forward, Some(next) == other_start, Some(next) == other_end) {
            (true, true, _) => self.absorb(id, other, false),
            (true, false, true) => self.absorb(id, other, true),
            (false, _, true) => self.absorb_into(other, id, false),
            (false, true, false) => self.absorb_into(other, id, true),
            _ => return false,
        }
        true
    }

    /// Appends line `gone` to line `keep` (reversing `gone` first if asked) and hands all of
    /// `gone`'s kernels to `keep`.
    fn absorb(&mut self, keep: usize, gone: usize, reverse: bool) {
        let mut tail = match self.lines[gone].take() {
            Some(line) => line,
            None => return,
        };
        if reverse {
            tail.reverse();
        }
        let cols = self.grid.cols();
        for k in tail.kernels() {
            self.owner[k.row * cols + k.col] = Some(keep);
        }
        if let Some(line) = self.lines[keep].as_mut() {
            line.append(tail);
        }
    }

    /// Appends line `gone` after line `keep`, reversing `keep` first if asked.
    fn absorb_into(&mut self, keep: usize, gone: usize, reverse_keep: bool) {
        if reverse_keep {
            if let Some(line) = self.lines[keep].as_mut() {
                line.reverse();
            }
        }
        self.absorb(keep, gone, false);
    }

    /// The kernel reached by stepping from `from` in direction `angle`.
    ///
    /// Step length grows from `min_step` to `max_step` with the larger of the kernel's gradient
    /// magnitude and its darkness. A step that rounds back onto `from` is replaced by a unit
    /// step; `None` if that still stays put or if the grid is left.
    fn next_kernel(&self, from: KernelIndex, angle: f64) -> Option<KernelIndex> {
        let cell = self.grid.cell(from);
        let darkness = 1.0 - cell.luminance() / 255.0;
        let mag = cell.gradient_magnitude.max(darkness);
        let (min, max) = (self.params.min_step, self.params.max_step);
        let step = (min + mag * (max - min)).max(min).min(max);

        let (row, col) = (from.row as f64, from.col as f64);
        let (sin, cos) = angle.sin_cos();
        let mut next = self.checked_kernel(row + sin * step, col + cos * step)?;
        if next == from {
            next = self.checked_kernel(row + sin.round(), col + cos.round())?;
            if next == from {
                return None;
            }
        }
        Some(next)
    }

    fn checked_kernel(&self, row: f64, col: f64) -> Option<KernelIndex> {
        let (row, col) = (row.round(), col.round());
        if row < 0.0 || col < 0.0 || row >= self.grid.rows() as f64 || col >= self.grid.cols() as f64
        {
            return None;
        }
        Some(KernelIndex::new(row as usize, col as usize))
    }
}

/// Direction a line through this kernel should run: along the gradient, or a quarter turn off
/// it to follow the isophote.
fn target_angle(cell: &ColorAccumulator, params: &FlowParams) -> f64 {
    if params.follow_gradient {
        cell.gradient_angle
    } else {
        cell.gradient_angle + pi(0.5)
    }
}
