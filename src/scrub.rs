//! Scrub tool: a brush circle under the pointer.
//!
//! Faster strokes scrub harder.  Pointer speed is estimated from the previous
//! call, mapped to a `power` in `[0, 1]`, and used twice:
//!
//! - loosen chance: `loosen_chance · (0.3 + 0.7·power) · stickiness`
//! - outward kick:  `base_kick · (0.5 + 0.5·power) · removal_ratio`
//!
//! Stickiness gates how often a material lets go; removal force gates how
//! hard it flies once it has.

use crate::constants::{MAX_DT, MIN_DT, SCRUB_SPEED_NORMALIZER, VECTOR_EPSILON};
use crate::interaction::{loosen_particle, InteractionContext, InteractionReport};
use crate::particle::ParticleState;
use crate::spatial_hash::HashEntry;
use bevy::prelude::*;
use rand::Rng;

#[derive(Debug, Clone, Default)]
pub struct ScrubSystem {
    last_pos: Option<Vec2>,
    last_t: Option<f64>,
    /// Reused query buffer.
    hits: Vec<HashEntry>,
}

impl ScrubSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous pointer sample (e.g. after the pointer is lifted),
    /// so the next stroke does not register a jump as speed.
    pub fn reset_pointer(&mut self) {
        self.last_pos = None;
        self.last_t = None;
    }

    /// Pointer speed → power in `[0, 1]`, clamping the sample interval.
    fn power(&self, pos: Vec2, t: f64) -> f32 {
        let Some(last_pos) = self.last_pos else {
            return 0.0;
        };
        let dt = match self.last_t {
            Some(last_t) => ((t - last_t) as f32).clamp(MIN_DT, MAX_DT),
            None => MIN_DT,
        };
        let speed = (pos - last_pos).length() / dt;
        (speed / SCRUB_SPEED_NORMALIZER).clamp(0.0, 1.0)
    }

    /// Scrub a circle of `radius` around `pos` (object-local) at time `t` (s).
    #[allow(clippy::too_many_arguments)]
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        ctx: &mut InteractionContext<'_>,
        pos: Vec2,
        t: f64,
        radius: f32,
        loosen_chance: f32,
        base_kick: f32,
        rng: &mut R,
    ) -> InteractionReport {
        let power = self.power(pos, t);
        let kick_multiplier = 0.5 + power * 0.5;
        let mut report = InteractionReport::default();

        ctx.hash.query_circle(pos, radius, &mut self.hits);
        report.hits = self.hits.len();

        for entry in &self.hits {
            let Some(p) = ctx.pool.get_mut(entry.handle) else {
                continue;
            };
            let material = p.kind.material();
            if !material.tools.scrub_effective {
                continue;
            }

            if p.is_stuck() {
                let chance = scrub_loosen_chance(loosen_chance, power, material.physics.stickiness);
                if rng.gen::<f32>() < chance {
                    if let Some(removed) = loosen_particle(p, ctx.coverage, ctx.origin) {
                        report.loosened += 1;
                        report.weight_removed += removed;
                    }
                }
            }

            if p.state == ParticleState::Loose {
                let away = p.pos - pos;
                let len = away.length().max(VECTOR_EPSILON);
                p.vel += away / len * base_kick * kick_multiplier * material.removal_ratio();
                report.pushed += 1;
            }
        }

        self.last_pos = Some(pos);
        self.last_t = Some(t);
        report
    }
}

/// Per-contact probability that the brush frees a stuck particle.
pub fn scrub_loosen_chance(loosen_chance: f32, power: f32, stickiness: f32) -> f32 {
    loosen_chance * (0.3 + 0.7 * power) * stickiness
}
