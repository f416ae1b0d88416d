//! Centralised simulation and tool constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//!
//! ## Tuning guidance
//!
//! Each constant includes the tested range and the observable consequence of
//! changing it.  Runtime overrides go through `assets/cleaning.toml`
//! (see [`crate::config::CleaningConfig`]); these values remain the defaults.

// ── World Bounds ──────────────────────────────────────────────────────────────

/// Width of the playfield in world units (pixels on a 1:1 display).
pub const WORLD_WIDTH: f32 = 1200.0;

/// Height of the playfield in world units.
pub const WORLD_HEIGHT: f32 = 800.0;

/// Fraction of the world the cleaning object occupies along each axis.
///
/// At 0.25 the object is a quarter of the world wide and tall, centred.
pub const OBJECT_FRACTION: f32 = 0.25;

/// Distance from the bottom edge of the world at which the hose nozzle sits.
pub const NOZZLE_BOTTOM_OFFSET: f32 = 30.0;

// ── Particle Pool ─────────────────────────────────────────────────────────────

/// Maximum number of dirt particles alive at once.
///
/// Spawning silently stops when this is reached.  8000 comfortably covers
/// an object up to ~700×700 with the default catalog.
pub const POOL_CAPACITY: usize = 8000;

// ── Spatial Hash ──────────────────────────────────────────────────────────────

/// Cell size of the per-tick spatial hash (world units).
///
/// Keep close to the typical scrub radius so a circle query touches a 3×3
/// block of cells.  Much smaller values make hose cone queries visit
/// hundreds of empty cells.
pub const SPATIAL_CELL_SIZE: f32 = 32.0;

// ── Coverage Map ─────────────────────────────────────────────────────────────

/// Cell size of the coverage grid (world units).  Finer than the hash.
pub const COVERAGE_CELL_SIZE: f32 = 16.0;

/// Fraction of a particle's size removed from coverage when it is loosened.
///
/// Slightly below 1.0 so the last few specks never block completion and the
/// threshold is reachable without chasing every particle.
pub const COVERAGE_REMOVAL_FRACTION: f32 = 0.9;

/// Progress at which the level counts as clean.
pub const COMPLETION_THRESHOLD: f32 = 0.95;

/// Minimum progress delta before a progress notification is emitted.
pub const PROGRESS_NOTIFY_STEP: f32 = 0.01;

// ── Spawning ─────────────────────────────────────────────────────────────────

/// Object area (world units²) per spawn cluster before the material's
/// `spawn_weight` is applied.
///
/// Lower values → denser dirt.  At 600 a 300×200 object gets 100 clusters
/// per material.
pub const BASE_DENSITY_DIVISOR: f32 = 600.0;

// ── Timing ───────────────────────────────────────────────────────────────────

/// Lower clamp on the per-tick delta time (s).
pub const MIN_DT: f32 = 0.016;

/// Upper clamp on the per-tick delta time (s).
///
/// Prevents runaway velocities after a stalled frame (window minimised,
/// debugger break).
pub const MAX_DT: f32 = 0.05;

// ── Scrub Tool ───────────────────────────────────────────────────────────────

/// Radius of the scrub brush (world units).
pub const SCRUB_RADIUS: f32 = 28.0;

/// Base per-tick chance of loosening a stuck particle under the brush.
pub const SCRUB_LOOSEN_CHANCE: f32 = 0.35;

/// Base outward impulse applied to loose particles under the brush.
pub const SCRUB_BASE_KICK: f32 = 60.0;

/// Pointer speed (units/s) that maps to full scrub power.
///
/// Lower values make slow wiping as effective as fast wiping.
pub const SCRUB_SPEED_NORMALIZER: f32 = 800.0;

// ── Hose Tool ────────────────────────────────────────────────────────────────

/// Half-angle of the hose spray cone (degrees).
pub const HOSE_ANGLE_DEG: f32 = 15.0;

/// Reach of the hose spray (world units).
pub const HOSE_RANGE: f32 = 900.0;

/// Directional impulse applied to loose particles in the spray.
pub const HOSE_FORCE: f32 = 40.0;

/// Base per-tick chance the spray loosens a stuck particle (before
/// stickiness is applied).
pub const HOSE_LOOSEN_CHANCE: f32 = 0.4;

/// Number of sample points along the stream path in stream mode.
pub const HOSE_STREAM_SAMPLES: usize = 10;

/// Radius of the circle query at each stream sample.
pub const HOSE_STREAM_WIDTH: f32 = 20.0;

// ── Physics ──────────────────────────────────────────────────────────────────

/// Scale from velocity to per-second displacement.
///
/// Velocity impulses are tuned in "kick units"; this converts them to
/// on-screen motion.  Tested range 4.0–10.0.
pub const POSITION_SCALE: f32 = 8.0;

/// Loose particles are culled once they travel beyond this multiple of the
/// object's largest dimension from its centre.
pub const BOUNDS_MARGIN_FACTOR: f32 = 4.0;

/// Reference removal force that maps to an impulse ratio of 1.0.
///
/// A material with `removal_force = 50` is pushed exactly as hard as the
/// tool's base impulse; mud (80) flies 1.6× as far.
pub const REMOVAL_FORCE_REFERENCE: f32 = 50.0;

/// Smallest length treated as non-zero when normalising vectors.
pub const VECTOR_EPSILON: f32 = 1e-4;
