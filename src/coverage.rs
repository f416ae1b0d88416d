//! Coverage accounting: how much dirt weight is still stuck to the object.
//!
//! A coarse grid over world space accumulates per-cell weight.  `total` is
//! fixed once spawning finishes and `dirty` only ever goes down afterwards,
//! so progress is monotonic no matter where loose particles fly.  Most of a
//! particle's weight is removed at its `Stuck → Loose/Fading` transition and
//! the remainder when the particle is finally released.

use bevy::prelude::*;

#[derive(Debug, Clone)]
pub struct CoverageMap {
    cols: usize,
    rows: usize,
    cell_size: f32,
    cells: Vec<f32>,
    total: f32,
    dirty: f32,
}

impl CoverageMap {
    /// Grid covering `world_w × world_h` with square cells of `cell_size`.
    ///
    /// Callers validate `cell_size` beforehand; the grid is at least 1×1.
    pub fn new(world_w: f32, world_h: f32, cell_size: f32) -> Self {
        let cols = ((world_w / cell_size).ceil() as usize).max(1);
        let rows = ((world_h / cell_size).ceil() as usize).max(1);
        Self {
            cols,
            rows,
            cell_size,
            cells: vec![0.0; cols * rows],
            total: 0.0,
            dirty: 0.0,
        }
    }

    /// Cell index for a world position, clamped to the border cells.
    fn index(&self, pos: Vec2) -> usize {
        let cx = ((pos.x / self.cell_size).floor().max(0.0) as usize).min(self.cols - 1);
        let cy = ((pos.y / self.cell_size).floor().max(0.0) as usize).min(self.rows - 1);
        cy * self.cols + cx
    }

    /// Add stuck weight at `pos`.  Raises both `total` and `dirty`.
    pub fn add_at(&mut self, pos: Vec2, weight: f32) {
        if weight <= 0.0 {
            return;
        }
        let i = self.index(pos);
        self.cells[i] += weight;
        self.total += weight;
        self.dirty += weight;
    }

    /// Remove up to `weight` from the cell at `pos`.
    ///
    /// The cell is clamped at zero and `dirty` drops by the amount actually
    /// removed, which is returned.
    pub fn remove_at(&mut self, pos: Vec2, weight: f32) -> f32 {
        if weight <= 0.0 {
            return 0.0;
        }
        let i = self.index(pos);
        let prev = self.cells[i];
        let next = (prev - weight).max(0.0);
        let removed = prev - next;
        self.cells[i] = next;
        self.dirty = (self.dirty - removed).max(0.0);
        removed
    }

    /// Fraction of the original weight cleaned, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.total > 0.0 {
            (1.0 - self.dirty / self.total).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn total(&self) -> f32 {
        self.total
    }

    pub fn dirty(&self) -> f32 {
        self.dirty
    }

    /// Weight currently held by the cell covering `pos`.
    pub fn weight_at(&self, pos: Vec2) -> f32 {
        self.cells[self.index(pos)]
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Zero every cell and both counters (level restart).
    pub fn reset(&mut self) {
        self.cells.fill(0.0);
        self.total = 0.0;
        self.dirty = 0.0;
    }
}
