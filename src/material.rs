//! Static dirt material catalog.
//!
//! Every particle carries a [`DirtType`] tag; all behaviour that differs
//! between materials is looked up in this table instead of being dispatched
//! through per-material types.  The table is compiled in and read-only.
//!
//! | Material | Scrub | Hose | Removal  | Priority |
//! |----------|-------|------|----------|----------|
//! | Sand     | yes   | no   | fly away | 1        |
//! | Mud      | no    | yes  | fly away | 2        |
//! | Grease   | yes   | no   | fade out | 3        |

use crate::constants::REMOVAL_FORCE_REFERENCE;
use bevy::prelude::*;

/// Named dirt category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirtType {
    Sand,
    Mud,
    Grease,
}

impl DirtType {
    /// Every material in declaration order (not priority order).
    pub const ALL: [DirtType; 3] = [DirtType::Sand, DirtType::Mud, DirtType::Grease];

    /// Catalog entry for this material.
    pub fn material(self) -> &'static DirtMaterial {
        match self {
            DirtType::Sand => &SAND,
            DirtType::Mud => &MUD,
            DirtType::Grease => &GREASE,
        }
    }

    /// All materials sorted by `layer_priority` ascending (bottom layer first).
    pub fn by_priority() -> Vec<DirtType> {
        let mut types = Self::ALL.to_vec();
        types.sort_by_key(|t| t.material().layer_priority);
        types
    }

    pub fn name(self) -> &'static str {
        match self {
            DirtType::Sand => "sand",
            DirtType::Mud => "mud",
            DirtType::Grease => "grease",
        }
    }
}

/// Drawing hint passed through to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleShape {
    Circle,
    Square,
    Blob,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirtVisual {
    /// Packed `0xRRGGBB` colour.
    pub color: u32,
    pub alpha: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub shape: ParticleShape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirtPhysics {
    /// Downward acceleration (units/s²) while loose.
    pub gravity: f32,
    /// Per-tick velocity multiplier while loose.
    pub damping: f32,
    /// Divides displacement; heavier clumps travel less per impulse.
    pub mass: f32,
    /// Restitution hint; particles never collide so the integrator ignores it.
    pub bounce: f32,
    /// How firmly the material adheres, in `[0, 1]`.
    pub stickiness: f32,
    /// Particles spawned per cluster.
    pub clump_size: u32,
    /// Maximum distance of a cluster member from its anchor.
    pub spread: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtTools {
    pub scrub_effective: bool,
    pub hose_effective: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirtRemoval {
    /// Dissolve in place instead of flying off.
    pub fade_out: bool,
    /// Seconds to fade to zero alpha (fade-out materials).
    pub fade_time: f32,
    /// Seconds a flying particle lives before it is culled.
    pub fly_lifespan: f32,
    /// Impulse scale once loose, relative to [`REMOVAL_FORCE_REFERENCE`].
    pub removal_force: f32,
}

/// Full per-material parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirtMaterial {
    pub kind: DirtType,
    pub visual: DirtVisual,
    pub physics: DirtPhysics,
    pub tools: DirtTools,
    pub removal: DirtRemoval,
    /// Multiplier on the base cluster count at spawn.
    pub spawn_weight: f32,
    /// Paint and spawn order; higher is spawned later and drawn on top.
    pub layer_priority: u32,
}

impl DirtMaterial {
    /// Removal force as a multiplier on tool impulses.
    pub fn removal_ratio(&self) -> f32 {
        self.removal.removal_force / REMOVAL_FORCE_REFERENCE
    }

    /// Base colour with the given alpha.
    pub fn color_with_alpha(&self, alpha: f32) -> Color {
        let hex = self.visual.color;
        Color::srgba(
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
            alpha,
        )
    }
}

pub static SAND: DirtMaterial = DirtMaterial {
    kind: DirtType::Sand,
    visual: DirtVisual {
        color: 0xd2b48c,
        alpha: 0.8,
        min_size: 1.0,
        max_size: 3.0,
        shape: ParticleShape::Circle,
    },
    physics: DirtPhysics {
        gravity: 100.0,
        damping: 0.95,
        mass: 1.0,
        bounce: 0.3,
        stickiness: 0.3,
        clump_size: 3,
        spread: 8.0,
    },
    tools: DirtTools {
        scrub_effective: true,
        hose_effective: false,
    },
    removal: DirtRemoval {
        fade_out: false,
        fade_time: 0.0,
        fly_lifespan: 3.0,
        removal_force: 50.0,
    },
    spawn_weight: 1.0,
    layer_priority: 1,
};

pub static MUD: DirtMaterial = DirtMaterial {
    kind: DirtType::Mud,
    visual: DirtVisual {
        color: 0x8b4513,
        alpha: 0.9,
        min_size: 3.0,
        max_size: 7.0,
        shape: ParticleShape::Blob,
    },
    physics: DirtPhysics {
        gravity: 150.0,
        damping: 0.88,
        mass: 2.0,
        bounce: 0.1,
        stickiness: 0.7,
        clump_size: 8,
        spread: 12.0,
    },
    tools: DirtTools {
        scrub_effective: false,
        hose_effective: true,
    },
    removal: DirtRemoval {
        fade_out: false,
        fade_time: 0.0,
        fly_lifespan: 2.5,
        removal_force: 80.0,
    },
    spawn_weight: 1.0,
    layer_priority: 2,
};

pub static GREASE: DirtMaterial = DirtMaterial {
    kind: DirtType::Grease,
    visual: DirtVisual {
        color: 0x2f4f2f,
        alpha: 0.7,
        min_size: 2.0,
        max_size: 8.0,
        shape: ParticleShape::Square,
    },
    physics: DirtPhysics {
        gravity: 80.0,
        damping: 0.98,
        mass: 0.5,
        bounce: 0.05,
        stickiness: 0.5,
        clump_size: 1,
        spread: 15.0,
    },
    tools: DirtTools {
        scrub_effective: true,
        hose_effective: false,
    },
    removal: DirtRemoval {
        fade_out: true,
        fade_time: 0.8,
        fly_lifespan: 0.5,
        removal_force: 30.0,
    },
    spawn_weight: 1.0,
    layer_priority: 3,
};
