//! Dirt particle record and its removal state machine.

use crate::material::{DirtType, ParticleShape};
use bevy::prelude::*;

/// Where a particle is in its removal lifecycle.
///
/// Transitions only ever move forward: `Stuck → Loose` or `Stuck → Fading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParticleState {
    /// Adhered to the object; immobile and counted in coverage.
    #[default]
    Stuck,
    /// Knocked free; integrated by physics until culled.
    Loose,
    /// Dissolving in place; alpha ramps to zero over the material's fade time.
    Fading,
}

/// One dirt fragment, stored in object-local coordinates.
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    /// Where the particle was stuck; its coverage weight lives in this cell.
    pub home: Vec2,
    pub vel: Vec2,
    /// Diameter; also the particle's coverage weight.
    pub size: f32,
    pub kind: DirtType,
    pub color: Color,
    pub alpha: f32,
    pub shape: ParticleShape,
    /// Index of the owning dirt layer.
    pub layer: usize,
    /// Position of this particle's handle inside its layer.
    pub layer_slot: usize,
    pub state: ParticleState,
    /// Seconds spent fading, or flying for non-fade materials.
    pub timer: f32,
    pub alive: bool,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            home: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 2.0,
            kind: DirtType::Sand,
            color: Color::WHITE,
            alpha: 1.0,
            shape: ParticleShape::Circle,
            layer: 0,
            layer_slot: 0,
            state: ParticleState::Stuck,
            timer: 0.0,
            alive: false,
        }
    }
}

impl Particle {
    /// Reinitialise a recycled slot as a fresh stuck particle of `kind`.
    ///
    /// Visual attributes come from the material catalog.
    pub fn reset(&mut self, pos: Vec2, size: f32, kind: DirtType) {
        let material = kind.material();
        self.pos = pos;
        self.home = pos;
        self.vel = Vec2::ZERO;
        self.size = size;
        self.kind = kind;
        self.color = material.color_with_alpha(material.visual.alpha);
        self.alpha = material.visual.alpha;
        self.shape = material.visual.shape;
        self.layer = 0;
        self.layer_slot = 0;
        self.state = ParticleState::Stuck;
        self.timer = 0.0;
        self.alive = true;
    }

    #[inline]
    pub fn is_stuck(&self) -> bool {
        self.state == ParticleState::Stuck
    }
}
