//! Integration of freed particles.
//!
//! Stuck particles are never touched.  Fading particles dissolve in place;
//! loose particles fall, drift and are culled once they leave a generous
//! margin around the object or outlive their material's flight lifespan.
//! Particles are simulated in object-local space, so the margin is measured
//! against the object's footprint rather than the window.

use crate::constants::{BOUNDS_MARGIN_FACTOR, POSITION_SCALE};
use crate::object::ObjectBounds;
use crate::particle::{Particle, ParticleState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsSystem {
    /// Half-extent of the square beyond which loose particles are culled.
    max_distance: f32,
}

impl PhysicsSystem {
    pub fn new(object_width: f32, object_height: f32) -> Self {
        Self {
            max_distance: object_width.max(object_height) * BOUNDS_MARGIN_FACTOR,
        }
    }

    /// Physics sized to the object it runs on.
    pub fn for_object(bounds: &ObjectBounds) -> Self {
        Self {
            max_distance: bounds.max_extent() * BOUNDS_MARGIN_FACTOR,
        }
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Advance one particle by `dt` seconds.
    ///
    /// Clears `alive` when the particle should be removed; the caller is
    /// responsible for releasing it.
    pub fn integrate(&self, p: &mut Particle, dt: f32) {
        let material = p.kind.material();
        match p.state {
            ParticleState::Stuck => {}
            ParticleState::Fading => {
                p.timer += dt;
                let fade_time = material.removal.fade_time;
                if p.timer >= fade_time {
                    p.alive = false;
                    p.alpha = 0.0;
                } else {
                    p.alpha = material.visual.alpha * (1.0 - p.timer / fade_time);
                }
            }
            ParticleState::Loose => {
                let physics = &material.physics;
                p.vel *= physics.damping;
                p.vel.y += physics.gravity * dt;
                p.pos += p.vel * dt * POSITION_SCALE / physics.mass;

                if p.pos.x.abs() > self.max_distance || p.pos.y.abs() > self.max_distance {
                    p.alive = false;
                    return;
                }
                if !material.removal.fade_out {
                    p.timer += dt;
                    if p.timer > material.removal.fly_lifespan {
                        p.alive = false;
                    }
                }
            }
        }
    }
}
