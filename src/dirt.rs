//! Dirt layers: spawning particles onto the object and tracking who is live.
//!
//! One [`DirtLayer`] exists per material, ordered by the catalog's
//! `layer_priority` (bottom layer first).  Layers hold handles only; the
//! [`ParticlePool`] owns the particles themselves.

use crate::constants::BASE_DENSITY_DIVISOR;
use crate::coverage::CoverageMap;
use crate::material::{DirtMaterial, DirtType};
use crate::object::ObjectBounds;
use crate::pool::{ParticleHandle, ParticlePool};
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

/// Live particles of a single material.
#[derive(Debug, Clone)]
pub struct DirtLayer {
    kind: DirtType,
    index: usize,
    particles: Vec<ParticleHandle>,
}

impl DirtLayer {
    pub fn new(kind: DirtType, index: usize) -> Self {
        Self {
            kind,
            index,
            particles: Vec::new(),
        }
    }

    pub fn kind(&self) -> DirtType {
        self.kind
    }

    pub fn material(&self) -> &'static DirtMaterial {
        self.kind.material()
    }

    pub fn particles(&self) -> &[ParticleHandle] {
        &self.particles
    }

    /// Spawn one cluster of `clump_size` particles around `anchor`.
    ///
    /// Members are fanned evenly by angle at a random distance up to the
    /// material's spread.  Stops early if the pool runs dry; the returned
    /// handles are the ones actually spawned.
    pub fn spawn_cluster<R: Rng + ?Sized>(
        &mut self,
        pool: &mut ParticlePool,
        anchor: Vec2,
        rng: &mut R,
        out: &mut Vec<ParticleHandle>,
    ) {
        out.clear();
        let material = self.material();
        let clump = material.physics.clump_size.max(1);
        let (min_size, max_size) = (material.visual.min_size, material.visual.max_size);

        for i in 0..clump {
            let Some(handle) = pool.acquire() else {
                break;
            };
            let angle = i as f32 / clump as f32 * TAU;
            let distance = rng.gen::<f32>() * material.physics.spread;
            let pos = anchor + Vec2::from_angle(angle) * distance;
            let size = min_size + rng.gen::<f32>() * (max_size - min_size);

            if let Some(particle) = pool.get_mut(handle) {
                particle.reset(pos, size, self.kind);
                particle.layer = self.index;
                particle.layer_slot = self.particles.len();
            }
            self.particles.push(handle);
            out.push(handle);
        }
    }

    /// Drop `handle` from this layer and release it to the pool.
    ///
    /// Returns `false` if the handle is stale or did not belong to this layer.
    /// Constant time: the particle remembers its slot, and the handle swapped
    /// into that slot is told its new one.
    pub fn remove_particle(&mut self, pool: &mut ParticlePool, handle: ParticleHandle) -> bool {
        let Some(slot) = pool.get(handle).map(|p| p.layer_slot) else {
            return false;
        };
        if self.particles.get(slot) != Some(&handle) {
            return false;
        }
        self.particles.swap_remove(slot);
        if let Some(&moved) = self.particles.get(slot) {
            if let Some(p) = pool.get_mut(moved) {
                p.layer_slot = slot;
            }
        }
        pool.release(handle);
        true
    }

    /// Release every particle in the layer.
    pub fn clear(&mut self, pool: &mut ParticlePool) {
        for handle in self.particles.drain(..) {
            pool.release(handle);
        }
    }
}

/// Per-material summary of a spawn pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerSpawnReport {
    pub kind: DirtType,
    pub requested_clusters: usize,
    pub particles: usize,
    pub weight: f32,
}

/// Owner of the dirt layers.
#[derive(Debug, Clone, Default)]
pub struct DirtSystem {
    layers: Vec<DirtLayer>,
    /// Reused buffer for freshly spawned cluster handles.
    cluster_buf: Vec<ParticleHandle>,
}

impl DirtSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate `bounds` with dirt.
    ///
    /// Existing layers are released and `coverage` is reset first.  Each
    /// particle's size is added to `coverage` at its world position.  When the
    /// pool is exhausted spawning stops early; that is not an error.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        bounds: &ObjectBounds,
        density_scale: f32,
        pool: &mut ParticlePool,
        coverage: &mut CoverageMap,
        rng: &mut R,
    ) -> Vec<LayerSpawnReport> {
        self.cleanup(pool);
        coverage.reset();

        let base_count = (bounds.area() / BASE_DENSITY_DIVISOR * density_scale.max(0.0)).floor();
        let mut reports = Vec::new();
        let mut exhausted = false;

        for (index, kind) in DirtType::by_priority().into_iter().enumerate() {
            let mut layer = DirtLayer::new(kind, index);
            let material = kind.material();
            let count = (base_count * material.spawn_weight).floor() as usize;
            let mut report = LayerSpawnReport {
                kind,
                requested_clusters: count,
                particles: 0,
                weight: 0.0,
            };

            for _ in 0..count {
                if exhausted {
                    break;
                }
                let anchor = Vec2::new(
                    (rng.gen::<f32>() - 0.5) * bounds.width,
                    (rng.gen::<f32>() - 0.5) * bounds.height,
                );
                layer.spawn_cluster(pool, anchor, rng, &mut self.cluster_buf);

                for &handle in &self.cluster_buf {
                    if let Some(p) = pool.get(handle) {
                        coverage.add_at(bounds.to_world(p.pos), p.size);
                        report.particles += 1;
                        report.weight += p.size;
                    }
                }
                if pool.is_exhausted() {
                    debug!(
                        "particle pool exhausted while spawning {}; stopping early",
                        kind.name()
                    );
                    exhausted = true;
                }
            }

            reports.push(report);
            self.layers.push(layer);
        }

        reports
    }

    pub fn layers(&self) -> &[DirtLayer] {
        &self.layers
    }

    /// Handles of every live particle, bottom layer first.
    pub fn particles(&self) -> impl Iterator<Item = ParticleHandle> + '_ {
        self.layers.iter().flat_map(|l| l.particles().iter().copied())
    }

    pub fn particle_count(&self) -> usize {
        self.layers.iter().map(|l| l.particles.len()).sum()
    }

    /// Remove a particle from its owning layer and release it to the pool.
    pub fn remove_particle(&mut self, pool: &mut ParticlePool, handle: ParticleHandle) -> bool {
        let Some(layer_index) = pool.get(handle).map(|p| p.layer) else {
            return false;
        };
        match self.layers.get_mut(layer_index) {
            Some(layer) => layer.remove_particle(pool, handle),
            None => false,
        }
    }

    /// Release every particle in every layer and drop the layers.
    pub fn cleanup(&mut self, pool: &mut ParticlePool) {
        for layer in &mut self.layers {
            layer.clear(pool);
        }
        self.layers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup(capacity: usize) -> (ParticlePool, CoverageMap, ObjectBounds, StdRng) {
        (
            ParticlePool::new(capacity).unwrap(),
            CoverageMap::new(1200.0, 800.0, 16.0),
            ObjectBounds::centered_in(1200.0, 800.0, 300.0, 200.0).unwrap(),
            StdRng::seed_from_u64(7),
        )
    }

    #[test]
    fn spawn_counts_follow_density_and_clump_size() {
        let (mut pool, mut cov, bounds, mut rng) = setup(8000);
        let mut dirt = DirtSystem::new();
        let reports = dirt.spawn(&bounds, 1.0, &mut pool, &mut cov, &mut rng);

        // 300 * 200 / 600 = 100 clusters per material.
        let kinds: Vec<_> = reports.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, DirtType::by_priority());
        for r in &reports {
            assert_eq!(r.requested_clusters, 100);
            assert_eq!(
                r.particles,
                100 * r.kind.material().physics.clump_size as usize
            );
        }
        assert_eq!(dirt.particle_count(), pool.live_count());
        assert_eq!(pool.live_count(), 100 * (3 + 8 + 1));
    }

    #[test]
    fn spawn_weight_equals_coverage_total() {
        let (mut pool, mut cov, bounds, mut rng) = setup(8000);
        let mut dirt = DirtSystem::new();
        dirt.spawn(&bounds, 1.0, &mut pool, &mut cov, &mut rng);

        let sum: f32 = dirt
            .particles()
            .map(|h| pool.get(h).unwrap().size)
            .sum();
        assert!((sum - cov.total()).abs() / sum < 1e-4);
        assert_eq!(cov.total(), cov.dirty());
    }

    #[test]
    fn particles_stay_within_object_plus_spread() {
        let (mut pool, mut cov, bounds, mut rng) = setup(8000);
        let mut dirt = DirtSystem::new();
        dirt.spawn(&bounds, 1.0, &mut pool, &mut cov, &mut rng);

        for layer in dirt.layers() {
            let spread = layer.material().physics.spread;
            for &h in layer.particles() {
                let p = pool.get(h).unwrap();
                assert_eq!(p.kind, layer.kind());
                assert!(p.pos.x.abs() <= bounds.width * 0.5 + spread + 1e-3);
                assert!(p.pos.y.abs() <= bounds.height * 0.5 + spread + 1e-3);
                let m = layer.material();
                assert!(p.size >= m.visual.min_size && p.size <= m.visual.max_size);
            }
        }
    }

    #[test]
    fn exhausted_pool_truncates_spawn_silently() {
        let (mut pool, mut cov, bounds, mut rng) = setup(250);
        let mut dirt = DirtSystem::new();
        let reports = dirt.spawn(&bounds, 1.0, &mut pool, &mut cov, &mut rng);

        assert_eq!(pool.live_count(), 250);
        assert_eq!(dirt.particle_count(), 250);
        let spawned: usize = reports.iter().map(|r| r.particles).sum();
        assert_eq!(spawned, 250);
    }

    #[test]
    fn respawn_releases_previous_layers_and_resets_coverage() {
        let (mut pool, mut cov, bounds, mut rng) = setup(8000);
        let mut dirt = DirtSystem::new();
        dirt.spawn(&bounds, 1.0, &mut pool, &mut cov, &mut rng);
        let first_live = pool.live_count();
        let first_total = cov.total();

        dirt.spawn(&bounds, 1.0, &mut pool, &mut cov, &mut rng);
        assert_eq!(pool.live_count(), first_live);
        assert_eq!(dirt.layers().len(), 3);
        // Same particle count, different random sizes: totals are of the same order.
        assert!(cov.total() < first_total * 1.5);
        assert_eq!(cov.progress(), 0.0);
    }

    #[test]
    fn remove_particle_releases_from_owning_layer() {
        let (mut pool, mut cov, bounds, mut rng) = setup(8000);
        let mut dirt = DirtSystem::new();
        dirt.spawn(&bounds, 1.0, &mut pool, &mut cov, &mut rng);

        let victim = dirt.layers()[1].particles()[0];
        let before = dirt.particle_count();
        assert!(dirt.remove_particle(&mut pool, victim));
        assert_eq!(dirt.particle_count(), before - 1);
        assert!(pool.get(victim).is_none());
        assert!(!dirt.remove_particle(&mut pool, victim));
    }

    #[test]
    fn layer_slots_stay_consistent_across_removals() {
        let (mut pool, _, _, mut rng) = setup(64);
        let mut layer = DirtLayer::new(DirtType::Sand, 0);
        let mut out = Vec::new();
        layer.spawn_cluster(&mut pool, Vec2::ZERO, &mut rng, &mut out);
        layer.spawn_cluster(&mut pool, Vec2::new(20.0, 0.0), &mut rng, &mut out);
        assert_eq!(layer.particles().len(), 6);

        // Middle removal pulls the last handle into the hole.
        let middle = layer.particles()[2];
        let last = layer.particles()[5];
        assert!(layer.remove_particle(&mut pool, middle));
        assert_eq!(layer.particles()[2], last);
        // The moved particle can itself be removed right away.
        assert!(layer.remove_particle(&mut pool, last));
        assert_eq!(layer.particles().len(), 4);
        for (slot, &h) in layer.particles().iter().enumerate() {
            assert_eq!(pool.get(h).unwrap().layer_slot, slot);
        }

        // Stale handles and handles owned by another layer are refused.
        assert!(!layer.remove_particle(&mut pool, middle));
        let mut other = DirtLayer::new(DirtType::Mud, 1);
        other.spawn_cluster(&mut pool, Vec2::ZERO, &mut rng, &mut out);
        let foreign = other.particles()[0];
        assert!(!layer.remove_particle(&mut pool, foreign));
        assert!(pool.is_live(foreign));
        assert_eq!(layer.particles().len(), 4);
    }

    #[test]
    fn cleanup_returns_everything_to_pool() {
        let (mut pool, mut cov, bounds, mut rng) = setup(8000);
        let mut dirt = DirtSystem::new();
        dirt.spawn(&bounds, 1.0, &mut pool, &mut cov, &mut rng);
        dirt.cleanup(&mut pool);
        assert_eq!(pool.live_count(), 0);
        assert!(dirt.layers().is_empty());
    }
}
