//! Uniform-grid spatial hash for tool queries.
//!
//! Rebuilt from scratch every tick: loose particles may all have moved, so
//! incremental maintenance would cost more than a bulk reinsert.  Buckets are
//! cleared in place to keep their `Vec` capacity across frames.
//!
//! ## Cell Size Choice
//!
//! Cell size (`SPATIAL_CELL_SIZE` in `constants.rs`) should sit close to the
//! scrub radius.  With a 32-unit cell and a 28-unit brush a circle query
//! touches at most a 3×3 block.  The hose cone spans far more cells, but only
//! occupied buckets cost anything beyond a hash lookup.

use crate::constants::VECTOR_EPSILON;
use crate::pool::ParticleHandle;
use bevy::prelude::*;
use std::collections::HashMap;

/// One indexed particle: its handle plus the position it had at insert time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HashEntry {
    pub handle: ParticleHandle,
    pub pos: Vec2,
}

#[derive(Debug, Clone)]
pub struct SpatialHash {
    cell_size: f32,
    /// Map from cell coordinates to entries
    cells: HashMap<(i32, i32), Vec<HashEntry>>,
}

impl SpatialHash {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Compute grid cell coordinates for a position
    pub fn cell_of(&self, pos: Vec2) -> (i32, i32) {
        let x = (pos.x / self.cell_size).floor() as i32;
        let y = (pos.y / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Clear all grid data (call before each frame rebuild)
    pub fn clear(&mut self) {
        // Retain allocations but clear contents to avoid re-allocating Vec capacity
        for v in self.cells.values_mut() {
            v.clear();
        }
    }

    /// Insert a particle at a position. Call after clear() for bulk rebuild.
    pub fn insert(&mut self, handle: ParticleHandle, pos: Vec2) {
        let cell = self.cell_of(pos);
        self.cells
            .entry(cell)
            .or_default()
            .push(HashEntry { handle, pos });
    }

    /// Total entries across all buckets.
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(Vec::is_empty)
    }

    /// Visit every occupied bucket whose cell intersects the axis-aligned box
    /// `center ± reach`.
    fn for_each_candidate(&self, center: Vec2, reach: f32, mut f: impl FnMut(&HashEntry)) {
        let (min_x, min_y) = self.cell_of(center - Vec2::splat(reach));
        let (max_x, max_y) = self.cell_of(center + Vec2::splat(reach));
        for cy in min_y..=max_y {
            for cx in min_x..=max_x {
                if let Some(entries) = self.cells.get(&(cx, cy)) {
                    entries.iter().for_each(&mut f);
                }
            }
        }
    }

    /// Collect every entry within `radius` of `center` into `out`.
    ///
    /// `out` is cleared first so a single buffer can be reused every tick.
    pub fn query_circle(&self, center: Vec2, radius: f32, out: &mut Vec<HashEntry>) {
        out.clear();
        if radius < 0.0 {
            return;
        }
        let r2 = radius * radius;
        self.for_each_candidate(center, radius, |entry| {
            if entry.pos.distance_squared(center) <= r2 {
                out.push(*entry);
            }
        });
    }

    /// Collect every entry inside the sector at `apex` pointing along `dir`.
    ///
    /// An entry qualifies when it lies within `range` and the unit vector from
    /// `apex` to it has `dot(dir) >= cos(half_angle)`.  `dir` is normalised
    /// here; a zero direction yields no hits.  An entry sitting exactly on the
    /// apex is treated as lying on the axis.
    pub fn query_cone(
        &self,
        apex: Vec2,
        dir: Vec2,
        half_angle: f32,
        range: f32,
        out: &mut Vec<HashEntry>,
    ) {
        out.clear();
        let dir = dir.normalize_or_zero();
        if dir == Vec2::ZERO || range < 0.0 {
            return;
        }
        let cos_t = half_angle.cos();
        let range2 = range * range;
        self.for_each_candidate(apex, range, |entry| {
            let v = entry.pos - apex;
            let d2 = v.length_squared();
            if d2 > range2 {
                return;
            }
            let len = d2.sqrt();
            let dot = if len < VECTOR_EPSILON {
                1.0
            } else {
                v.dot(dir) / len
            };
            if dot >= cos_t {
                out.push(*entry);
            }
        });
    }
}

impl Default for SpatialHash {
    fn default() -> Self {
        Self::new(crate::constants::SPATIAL_CELL_SIZE)
    }
}
