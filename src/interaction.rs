//! Shared plumbing for the tool systems (scrub and hose).

use crate::constants::COVERAGE_REMOVAL_FRACTION;
use crate::coverage::CoverageMap;
use crate::particle::{Particle, ParticleState};
use crate::pool::ParticlePool;
use crate::spatial_hash::SpatialHash;
use bevy::prelude::*;

/// Borrowed simulation state a tool needs for one tick.
///
/// Query positions and particle positions are object-local; `origin` is the
/// object centre in world space, used to locate coverage cells.
pub struct InteractionContext<'a> {
    pub hash: &'a SpatialHash,
    pub pool: &'a mut ParticlePool,
    pub coverage: &'a mut CoverageMap,
    pub origin: Vec2,
}

/// What a tool did during one update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InteractionReport {
    /// Particles returned by the spatial query.
    pub hits: usize,
    /// Stuck particles freed this update.
    pub loosened: usize,
    /// Coverage weight removed this update.
    pub weight_removed: f32,
    /// Loose particles that received an impulse.
    pub pushed: usize,
}

/// Move a stuck particle into its removal state and take its weight off the
/// coverage map.
///
/// Fade-out materials start fading; everything else becomes loose.  Returns
/// the weight actually removed, or `None` if the particle was not stuck, in
/// which case nothing changes.
pub fn loosen_particle(particle: &mut Particle, coverage: &mut CoverageMap, origin: Vec2) -> Option<f32> {
    if !particle.is_stuck() {
        return None;
    }
    let material = particle.kind.material();
    particle.state = if material.removal.fade_out {
        ParticleState::Fading
    } else {
        ParticleState::Loose
    };
    particle.timer = 0.0;
    let removed = coverage.remove_at(
        origin + particle.home,
        particle.size * COVERAGE_REMOVAL_FRACTION,
    );
    Some(removed)
}

/// Take the rest of a freed particle's weight off the coverage map once it
/// has actually left the object (culled, expired or fully faded).
///
/// Loosening removes only [`COVERAGE_REMOVAL_FRACTION`] of the weight; this
/// clears the remainder so a fully cleaned object reaches progress 1.0.
/// Stuck particles are left alone.
pub fn settle_residue(particle: &Particle, coverage: &mut CoverageMap, origin: Vec2) -> f32 {
    if particle.is_stuck() {
        return 0.0;
    }
    coverage.remove_at(
        origin + particle.home,
        particle.size * (1.0 - COVERAGE_REMOVAL_FRACTION),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::DirtType;

    #[test]
    fn loosening_twice_removes_weight_once() {
        let origin = Vec2::new(100.0, 100.0);
        let mut cov = CoverageMap::new(200.0, 200.0, 16.0);
        let mut p = Particle::default();
        p.reset(Vec2::new(3.0, -4.0), 5.0, DirtType::Sand);
        cov.add_at(origin + p.pos, p.size);

        let removed = loosen_particle(&mut p, &mut cov, origin).unwrap();
        assert!((removed - 4.5).abs() < 1e-6);
        assert_eq!(p.state, ParticleState::Loose);
        let dirty_after_first = cov.dirty();

        assert!(loosen_particle(&mut p, &mut cov, origin).is_none());
        assert_eq!(cov.dirty(), dirty_after_first);
    }

    #[test]
    fn residue_completes_the_particle_weight() {
        let origin = Vec2::new(100.0, 100.0);
        let mut cov = CoverageMap::new(200.0, 200.0, 16.0);
        let mut p = Particle::default();
        p.reset(Vec2::ZERO, 4.0, DirtType::Sand);
        cov.add_at(origin, 4.0);

        assert_eq!(settle_residue(&p, &mut cov, origin), 0.0, "stuck: untouched");
        loosen_particle(&mut p, &mut cov, origin);
        // Particle flies off; its weight stays keyed to where it was stuck.
        p.pos = Vec2::new(500.0, -500.0);
        settle_residue(&p, &mut cov, origin);
        assert!(cov.dirty().abs() < 1e-6);
        assert!((cov.progress() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn fade_materials_start_fading() {
        let mut cov = CoverageMap::new(200.0, 200.0, 16.0);
        let mut p = Particle::default();
        p.reset(Vec2::ZERO, 4.0, DirtType::Grease);
        loosen_particle(&mut p, &mut cov, Vec2::splat(50.0));
        assert_eq!(p.state, ParticleState::Fading);
    }
}
