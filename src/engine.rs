//! The per-frame simulation step.
//!
//! [`Simulation`] owns every subsystem and advances them in a fixed order:
//!
//! 1. rebuild the spatial hash from live particles,
//! 2. run exactly one tool (scrub XOR hose) if the pointer is pressed,
//! 3. integrate physics for freed particles,
//! 4. release dead particles back to the pool,
//! 5. recompute progress and detect the completion edge.
//!
//! All positions crossing this API are in world space; the simulation works
//! in object-local space internally.

use crate::config::{CleaningConfig, HoseMode};
use crate::constants::{MAX_DT, MIN_DT};
use crate::coverage::CoverageMap;
use crate::dirt::{DirtSystem, LayerSpawnReport};
use crate::error::SimResult;
use crate::hose::{straight_stream_path, HoseSystem};
use crate::interaction::{settle_residue, InteractionContext, InteractionReport};
use crate::material::{DirtType, ParticleShape};
use crate::object::ObjectBounds;
use crate::particle::ParticleState;
use crate::physics::PhysicsSystem;
use crate::pool::{ParticleHandle, ParticlePool};
use crate::progress::{CompletionTracker, ProgressSystem};
use crate::scrub::ScrubSystem;
use crate::spatial_hash::SpatialHash;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Input sampled by the host once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickInput {
    /// Pointer position in world space.
    pub pointer: Vec2,
    pub pointer_pressed: bool,
    /// Wall-clock time in seconds, used for scrub speed estimation.
    pub time: f64,
}

/// Which tool ran during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTool {
    #[default]
    Idle,
    Scrub,
    Hose,
}

/// Outcome of one [`Simulation::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    pub progress: f32,
    /// Progress reached the completion threshold for the first time.
    pub completed_now: bool,
    /// Progress moved enough since the last notification to be worth
    /// reporting to the UI.
    pub progress_changed: bool,
    pub tool: ActiveTool,
    pub interaction: InteractionReport,
    /// Particles released back to the pool this tick.
    pub released: usize,
}

/// Drawing snapshot of one live particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    /// World-space position.
    pub pos: Vec2,
    pub size: f32,
    pub color: Color,
    pub alpha: f32,
    pub shape: ParticleShape,
    pub kind: DirtType,
    pub state: ParticleState,
}

/// Read-only debug snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimStats {
    pub live_particles: usize,
    pub progress: f32,
    pub using_hose: bool,
}

pub struct Simulation {
    config: CleaningConfig,
    bounds: ObjectBounds,
    /// Hose nozzle, world space.
    nozzle: Vec2,
    pool: ParticlePool,
    hash: SpatialHash,
    coverage: CoverageMap,
    dirt: DirtSystem,
    scrub: ScrubSystem,
    hose: HoseSystem,
    physics: PhysicsSystem,
    completion: CompletionTracker,
    using_hose: bool,
    destroyed: bool,
    rng: StdRng,
    /// Reused per-tick buffers.
    dead: Vec<ParticleHandle>,
    stream_path: Vec<Vec2>,
}

impl Simulation {
    /// Build a simulation and spawn the first level.
    pub fn new(config: CleaningConfig) -> SimResult<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Same as [`Simulation::new`] with a reproducible random stream.
    pub fn with_seed(config: CleaningConfig, seed: u64) -> SimResult<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut config: CleaningConfig, rng: StdRng) -> SimResult<Self> {
        config.validate()?;
        config.clamp_tool_reach();
        let (object_w, object_h) = config.object_dimensions();
        let bounds =
            ObjectBounds::centered_in(config.world_width, config.world_height, object_w, object_h)?;
        let nozzle = Vec2::new(
            config.world_width * 0.5,
            config.world_height - config.nozzle_bottom_offset,
        );

        let mut sim = Self {
            pool: ParticlePool::new(config.pool_capacity)?,
            hash: SpatialHash::new(config.spatial_cell_size),
            coverage: CoverageMap::new(
                config.world_width,
                config.world_height,
                config.coverage_cell_size,
            ),
            dirt: DirtSystem::new(),
            scrub: ScrubSystem::new(),
            hose: HoseSystem::new(config.tools.hose.loosen_chance),
            physics: PhysicsSystem::for_object(&bounds),
            completion: CompletionTracker::new(config.completion_threshold),
            using_hose: false,
            destroyed: false,
            rng,
            dead: Vec::new(),
            stream_path: Vec::new(),
            bounds,
            nozzle,
            config,
        };
        sim.spawn();
        Ok(sim)
    }

    fn spawn(&mut self) -> Vec<LayerSpawnReport> {
        let reports = self.dirt.spawn(
            &self.bounds,
            self.config.density_scale,
            &mut self.pool,
            &mut self.coverage,
            &mut self.rng,
        );
        for r in &reports {
            info!(
                "spawned {} {} particles in {} clusters (weight {:.1})",
                r.particles,
                r.kind.name(),
                r.requested_clusters,
                r.weight
            );
        }
        info!(
            "dirt ready: {} particles, total weight {:.1}",
            self.pool.live_count(),
            self.coverage.total()
        );
        reports
    }

    /// Advance the simulation by `dt` seconds (clamped to `[MIN_DT, MAX_DT]`).
    pub fn tick(&mut self, dt: f32, input: &TickInput) -> TickReport {
        let mut report = TickReport {
            progress: self.progress(),
            ..Default::default()
        };
        if self.destroyed {
            return report;
        }
        let dt = if dt.is_finite() { dt.clamp(MIN_DT, MAX_DT) } else { MIN_DT };

        // 1. Spatial hash
        self.hash.clear();
        let hash = &mut self.hash;
        self.pool.for_each(|handle, p| hash.insert(handle, p.pos));

        // 2. Exactly one tool
        if input.pointer_pressed {
            report.tool = if self.using_hose {
                ActiveTool::Hose
            } else {
                ActiveTool::Scrub
            };
            report.interaction = self.apply_tool(input);
        } else {
            self.scrub.reset_pointer();
        }

        // 3. Physics
        let physics = &self.physics;
        let dead = &mut self.dead;
        self.pool.for_each_mut(|handle, p| {
            physics.integrate(p, dt);
            if !p.alive {
                dead.push(handle);
            }
        });

        // 4. Cull
        let origin = self.bounds.center();
        for handle in self.dead.drain(..) {
            if let Some(p) = self.pool.get(handle) {
                settle_residue(p, &mut self.coverage, origin);
            }
            if self.dirt.remove_particle(&mut self.pool, handle) {
                report.released += 1;
            }
        }

        // 5. Progress
        report.progress = ProgressSystem::progress(&self.coverage);
        let edges = self.completion.observe(report.progress);
        report.completed_now = edges.completed_now;
        report.progress_changed = edges.changed;
        if edges.completed_now {
            info!(
                "object clean: progress {:.3} reached threshold {:.2}",
                report.progress,
                self.completion.threshold()
            );
        }
        report
    }

    fn apply_tool(&mut self, input: &TickInput) -> InteractionReport {
        let local_pointer = self.bounds.to_local(input.pointer);
        let mut ctx = InteractionContext {
            hash: &self.hash,
            pool: &mut self.pool,
            coverage: &mut self.coverage,
            origin: self.bounds.center(),
        };

        if !self.using_hose {
            let scrub = &self.config.tools.scrub;
            return self.scrub.update(
                &mut ctx,
                local_pointer,
                input.time,
                scrub.radius,
                scrub.loosen_chance,
                scrub.base_kick,
                &mut self.rng,
            );
        }

        let hose = &self.config.tools.hose;
        let local_nozzle = self.bounds.to_local(self.nozzle);
        match hose.mode {
            HoseMode::Cone => self.hose.update_cone(
                &mut ctx,
                local_nozzle,
                local_pointer,
                hose.angle_deg,
                hose.range,
                hose.force,
                &mut self.rng,
            ),
            HoseMode::Stream => {
                let reach = local_pointer - local_nozzle;
                let end = if reach.length() > hose.range {
                    local_nozzle + reach.normalize_or_zero() * hose.range
                } else {
                    local_pointer
                };
                straight_stream_path(local_nozzle, end, hose.stream_samples, &mut self.stream_path);
                self.hose.update_stream(
                    &mut ctx,
                    &self.stream_path,
                    hose.stream_width,
                    hose.force,
                    &mut self.rng,
                )
            }
        }
    }

    /// Live particles for drawing, in no particular order.
    pub fn particles(&self) -> impl Iterator<Item = ParticleView> + '_ {
        let bounds = self.bounds;
        self.pool.iter().map(move |(_, p)| ParticleView {
            pos: bounds.to_world(p.pos),
            size: p.size,
            color: p.color.with_alpha(p.alpha),
            alpha: p.alpha,
            shape: p.shape,
            kind: p.kind,
            state: p.state,
        })
    }

    pub fn progress(&self) -> f32 {
        ProgressSystem::progress(&self.coverage)
    }

    pub fn is_completed(&self) -> bool {
        self.completion.is_completed()
    }

    pub fn stats(&self) -> SimStats {
        SimStats {
            live_particles: self.pool.live_count(),
            progress: self.progress(),
            using_hose: self.using_hose,
        }
    }

    pub fn toggle_hose(&mut self, on: bool) {
        if on != self.using_hose {
            debug!("hose {}", if on { "on" } else { "off" });
        }
        self.using_hose = on;
    }

    pub fn using_hose(&self) -> bool {
        self.using_hose
    }

    /// Respawn the level: fresh dirt, zero progress, completion re-armed.
    pub fn reset_dirt(&mut self) {
        if self.destroyed {
            return;
        }
        info!("resetting dirt");
        self.spawn();
        self.completion.reset();
        self.scrub.reset_pointer();
    }

    /// Release every particle and stop advancing.  Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.dirt.cleanup(&mut self.pool);
        self.pool.release_all();
        self.hash.clear();
        self.destroyed = true;
        info!("simulation destroyed; particle pool drained");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn bounds(&self) -> &ObjectBounds {
        &self.bounds
    }

    /// Hose nozzle in world space.
    pub fn nozzle(&self) -> Vec2 {
        self.nozzle
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    pub fn coverage(&self) -> &CoverageMap {
        &self.coverage
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn dirt(&self) -> &DirtSystem {
        &self.dirt
    }
}
