//! Fixed-capacity particle arena.
//!
//! The pool owns every [`Particle`] for the lifetime of the simulation.  Other
//! systems hold [`ParticleHandle`]s, which are plain `Copy` indices tagged with
//! a generation counter: once a slot is released its generation is bumped, so
//! a handle kept past its release resolves to `None` instead of aliasing the
//! slot's next occupant.
//!
//! `acquire` and `release` are O(1).  Live slots are tracked in a dense list
//! so iteration touches only acquired particles, never the whole capacity.

use crate::error::{SimError, SimResult};
use crate::particle::Particle;

const NOT_ACTIVE: u32 = u32::MAX;

/// Stable reference to a pooled particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleHandle {
    index: u32,
    generation: u32,
}

impl ParticleHandle {
    /// Slot index inside the pool.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    generations: Vec<u32>,
    /// Stack of free slot indices; lowest index on top.
    free: Vec<u32>,
    /// Dense list of acquired slot indices.
    active: Vec<u32>,
    /// Position of each slot in `active`, or `NOT_ACTIVE`.
    active_pos: Vec<u32>,
}

impl ParticlePool {
    /// Preallocate `capacity` particles.  The pool never grows.
    pub fn new(capacity: usize) -> SimResult<Self> {
        if capacity == 0 {
            return Err(SimError::ZeroCapacity);
        }
        Ok(Self {
            slots: vec![Particle::default(); capacity],
            generations: vec![0; capacity],
            free: (0..capacity as u32).rev().collect(),
            active: Vec::with_capacity(capacity),
            active_pos: vec![NOT_ACTIVE; capacity],
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of currently acquired particles.
    pub fn live_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.free.is_empty()
    }

    /// Take a free slot, or `None` when every slot is in use.
    ///
    /// The slot is marked alive but otherwise keeps its previous contents;
    /// callers are expected to [`Particle::reset`] it.
    pub fn acquire(&mut self) -> Option<ParticleHandle> {
        let index = self.free.pop()?;
        let i = index as usize;
        self.active_pos[i] = self.active.len() as u32;
        self.active.push(index);
        self.slots[i].alive = true;
        Some(ParticleHandle {
            index,
            generation: self.generations[i],
        })
    }

    /// Return a slot to the free list and mark it not-alive.
    ///
    /// Returns `false` (and does nothing) for stale or already-released
    /// handles.
    pub fn release(&mut self, handle: ParticleHandle) -> bool {
        if !self.is_live(handle) {
            return false;
        }
        let i = handle.index();
        self.slots[i].alive = false;
        self.generations[i] = self.generations[i].wrapping_add(1);

        let pos = self.active_pos[i] as usize;
        self.active.swap_remove(pos);
        if let Some(&moved) = self.active.get(pos) {
            self.active_pos[moved as usize] = pos as u32;
        }
        self.active_pos[i] = NOT_ACTIVE;
        self.free.push(handle.index);
        true
    }

    /// Release every acquired particle.
    pub fn release_all(&mut self) {
        while let Some(&index) = self.active.last() {
            let handle = ParticleHandle {
                index,
                generation: self.generations[index as usize],
            };
            self.release(handle);
        }
    }

    /// Whether `handle` refers to a currently acquired slot.
    pub fn is_live(&self, handle: ParticleHandle) -> bool {
        let i = handle.index();
        i < self.slots.len()
            && self.generations[i] == handle.generation
            && self.active_pos[i] != NOT_ACTIVE
    }

    pub fn get(&self, handle: ParticleHandle) -> Option<&Particle> {
        if self.is_live(handle) {
            Some(&self.slots[handle.index()])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle> {
        if self.is_live(handle) {
            Some(&mut self.slots[handle.index()])
        } else {
            None
        }
    }

    /// Handle of the slot at `active[pos]`.
    fn handle_at(&self, pos: usize) -> ParticleHandle {
        let index = self.active[pos];
        ParticleHandle {
            index,
            generation: self.generations[index as usize],
        }
    }

    /// Iterate acquired particles that are still flagged alive.
    pub fn iter(&self) -> impl Iterator<Item = (ParticleHandle, &Particle)> + '_ {
        (0..self.active.len())
            .map(move |pos| (self.handle_at(pos), &self.slots[self.active[pos] as usize]))
            .filter(|(_, p)| p.alive)
    }

    /// Visit every acquired particle that is still flagged alive.
    pub fn for_each(&self, mut f: impl FnMut(ParticleHandle, &Particle)) {
        for (handle, particle) in self.iter() {
            f(handle, particle);
        }
    }

    /// Mutable visit of every acquired, alive particle.
    ///
    /// The callback may clear `alive`; the slot stays acquired until
    /// [`ParticlePool::release`] is called for it.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(ParticleHandle, &mut Particle)) {
        for pos in 0..self.active.len() {
            let handle = self.handle_at(pos);
            let particle = &mut self.slots[handle.index()];
            if particle.alive {
                f(handle, particle);
            }
        }
    }
}
