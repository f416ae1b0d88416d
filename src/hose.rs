//! Hose tool: a pressure-washer spray, either a static cone or a stream path.
//!
//! Loosening uses `base_loosen_chance · stickiness`, independent of pointer
//! speed.  Only materials flagged `hose_effective` react at all.

use crate::constants::VECTOR_EPSILON;
use crate::coverage::CoverageMap;
use crate::interaction::{loosen_particle, InteractionContext, InteractionReport};
use crate::particle::{Particle, ParticleState};
use crate::pool::ParticleHandle;
use crate::spatial_hash::HashEntry;
use bevy::prelude::*;
use rand::Rng;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct HoseSystem {
    base_loosen_chance: f32,
    hits: Vec<HashEntry>,
    /// Union of per-sample hits in stream mode.
    affected: Vec<HashEntry>,
    seen: HashSet<ParticleHandle>,
}

impl HoseSystem {
    pub fn new(base_loosen_chance: f32) -> Self {
        Self {
            base_loosen_chance,
            hits: Vec::new(),
            affected: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Apply the loosening rule to a hose-effective particle.
    fn try_loosen<R: Rng + ?Sized>(
        &self,
        p: &mut Particle,
        origin: Vec2,
        coverage: &mut CoverageMap,
        rng: &mut R,
        report: &mut InteractionReport,
    ) {
        if !p.is_stuck() {
            return;
        }
        let chance = self.base_loosen_chance * p.kind.material().physics.stickiness;
        if rng.gen::<f32>() < chance {
            if let Some(removed) = loosen_particle(p, coverage, origin) {
                report.loosened += 1;
                report.weight_removed += removed;
            }
        }
    }

    /// Spray a cone from `nozzle` towards `aim` (both object-local).
    ///
    /// `half_angle_deg` is the angular half-width of the spray.  Loose
    /// particles in the cone are pushed along the aim direction.
    #[allow(clippy::too_many_arguments)]
    pub fn update_cone<R: Rng + ?Sized>(
        &mut self,
        ctx: &mut InteractionContext<'_>,
        nozzle: Vec2,
        aim: Vec2,
        half_angle_deg: f32,
        range: f32,
        force: f32,
        rng: &mut R,
    ) -> InteractionReport {
        let mut report = InteractionReport::default();
        let offset = aim - nozzle;
        let len = offset.length();
        if len < VECTOR_EPSILON {
            self.hits.clear();
            return report;
        }
        let dir = offset / len;

        ctx.hash
            .query_cone(nozzle, dir, half_angle_deg.to_radians(), range, &mut self.hits);
        report.hits = self.hits.len();

        let hits = std::mem::take(&mut self.hits);
        for entry in &hits {
            let Some(p) = ctx.pool.get_mut(entry.handle) else {
                continue;
            };
            let material = p.kind.material();
            if !material.tools.hose_effective {
                continue;
            }
            self.try_loosen(p, ctx.origin, ctx.coverage, rng, &mut report);
            if p.state == ParticleState::Loose {
                p.vel += dir * force * material.removal_ratio();
                report.pushed += 1;
            }
        }
        self.hits = hits;
        report
    }

    /// Spray along a sampled stream `path` (object-local, nozzle first).
    ///
    /// Every sample contributes a circle query of radius `width`; the union is
    /// deduplicated.  Each loose particle is pushed from its nearest sample
    /// towards the path's terminal point.
    pub fn update_stream<R: Rng + ?Sized>(
        &mut self,
        ctx: &mut InteractionContext<'_>,
        path: &[Vec2],
        width: f32,
        force: f32,
        rng: &mut R,
    ) -> InteractionReport {
        let mut report = InteractionReport::default();
        self.affected.clear();
        self.seen.clear();
        let Some(&terminal) = path.last() else {
            return report;
        };

        for &sample in path {
            ctx.hash.query_circle(sample, width, &mut self.hits);
            for entry in &self.hits {
                if self.seen.insert(entry.handle) {
                    self.affected.push(*entry);
                }
            }
        }
        report.hits = self.affected.len();

        // Direction used when the nearest sample is the terminal itself.
        let tail_dir = match path.len() {
            0 | 1 => Vec2::ZERO,
            n => (path[n - 1] - path[n - 2]).normalize_or_zero(),
        };

        let affected = std::mem::take(&mut self.affected);
        for entry in &affected {
            let Some(p) = ctx.pool.get_mut(entry.handle) else {
                continue;
            };
            let material = p.kind.material();
            if !material.tools.hose_effective {
                continue;
            }
            self.try_loosen(p, ctx.origin, ctx.coverage, rng, &mut report);
            if p.state != ParticleState::Loose {
                continue;
            }

            let nearest = path
                .iter()
                .copied()
                .min_by(|a, b| {
                    a.distance_squared(entry.pos)
                        .total_cmp(&b.distance_squared(entry.pos))
                })
                .unwrap_or(terminal);
            let to_end = terminal - nearest;
            let dir = if to_end.length() < VECTOR_EPSILON {
                tail_dir
            } else {
                to_end.normalize()
            };
            p.vel += dir * force * material.removal_ratio();
            report.pushed += 1;
        }
        self.affected = affected;
        report
    }
}

/// `samples` evenly spaced points from `start` to `end` inclusive.
pub fn straight_stream_path(start: Vec2, end: Vec2, samples: usize, out: &mut Vec<Vec2>) {
    out.clear();
    match samples {
        0 => {}
        1 => out.push(end),
        n => {
            for i in 0..n {
                out.push(start.lerp(end, i as f32 / (n - 1) as f32));
            }
        }
    }
}
