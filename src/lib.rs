//! Dirt-cleaning particle simulation.
//!
//! An object is covered in layered dirt particles (sand, mud, grease).  The
//! player scrubs with the pointer or sprays with a hose; loosened particles
//! fly off or fade away, and a coverage map tracks how much of the object is
//! clean.  [`engine::Simulation`] runs one frame at a time and is usable
//! without Bevy's app loop; [`simulation::CleaningPlugin`] wires it into one.

pub mod config;
pub mod constants;
pub mod coverage;
pub mod dirt;
pub mod engine;
pub mod error;
pub mod hose;
pub mod interaction;
pub mod material;
pub mod object;
pub mod particle;
pub mod physics;
pub mod pool;
pub mod progress;
pub mod rendering;
pub mod scrub;
pub mod simulation;
pub mod spatial_hash;
