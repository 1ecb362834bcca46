//! Particle effects: groups of emitters triggered and updated together.

use flare_common::{Coordinate, EmitterId, LineSegment};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::emitter::Emitter;

/// A named group of emitters sharing trigger and update fan-out.
///
/// Emitters own disjoint storage, so with [`set_parallel`](Self::set_parallel)
/// enabled `update` advances them concurrently on the rayon pool. Triggers
/// always run serially in emitter order.
#[derive(Debug, Default)]
pub struct ParticleEffect {
    name: String,
    emitters: Vec<Emitter>,
    parallel: bool,
}

impl ParticleEffect {
    /// Creates an empty effect.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        info!("Created particle effect '{}'", name);
        Self {
            name,
            emitters: Vec::new(),
            parallel: false,
        }
    }

    /// Creates an effect from existing emitters.
    #[must_use]
    pub fn with_emitters(name: impl Into<String>, emitters: Vec<Emitter>) -> Self {
        let mut effect = Self::new(name);
        effect.emitters = emitters;
        effect
    }

    /// Effect name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds an emitter.
    pub fn add_emitter(&mut self, emitter: Emitter) {
        debug!("Effect '{}' gained emitter {}", self.name, emitter.id());
        self.emitters.push(emitter);
    }

    /// Removes an emitter by ID.
    pub fn remove_emitter(&mut self, id: EmitterId) -> Option<Emitter> {
        let index = self.emitters.iter().position(|e| e.id() == id)?;
        Some(self.emitters.remove(index))
    }

    /// The emitters, in trigger order.
    #[must_use]
    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    /// Mutable access to the emitters.
    pub fn emitters_mut(&mut self) -> &mut [Emitter] {
        &mut self.emitters
    }

    /// Whether updates fan out across threads.
    #[must_use]
    pub const fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Enables or disables concurrent emitter updates.
    pub fn set_parallel(&mut self, parallel: bool) {
        if parallel != self.parallel {
            debug!("Effect '{}' parallel update: {}", self.name, parallel);
        }
        self.parallel = parallel;
    }

    /// Live particles across all emitters.
    #[must_use]
    pub fn active_particle_count(&self) -> usize {
        self.emitters.iter().map(Emitter::active_particle_count).sum()
    }

    /// Advances every emitter by `elapsed` seconds.
    pub fn update(&mut self, elapsed: f32) {
        if self.parallel {
            self.emitters
                .par_iter_mut()
                .for_each(|emitter| emitter.update(elapsed));
        } else {
            for emitter in &mut self.emitters {
                emitter.update(elapsed);
            }
        }
    }

    /// Triggers every emitter at `position`. Returns the total released.
    pub fn trigger(&mut self, position: Coordinate) -> usize {
        self.emitters
            .iter_mut()
            .map(|emitter| emitter.trigger(position))
            .sum()
    }

    /// Triggers every emitter along `line`. Returns the total released.
    pub fn trigger_line(&mut self, line: LineSegment) -> usize {
        self.emitters
            .iter_mut()
            .map(|emitter| emitter.trigger_line(line))
            .sum()
    }

    /// Clears every emitter.
    pub fn clear(&mut self) {
        for emitter in &mut self.emitters {
            emitter.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::EmitterBuilder;
    use crate::profile::Profile;
    use crate::release::ReleaseParameters;

    fn emitter(capacity: usize, quantity: u32, term: f32) -> Emitter {
        EmitterBuilder::new(capacity, term)
            .profile(Profile::point())
            .parameters(ReleaseParameters::default().with_quantity(quantity))
            .build()
            .expect("valid emitter")
    }

    #[test]
    fn test_empty_effect() {
        let mut effect = ParticleEffect::new("empty");
        assert_eq!(effect.trigger(Coordinate::ORIGIN), 0);
        effect.update(0.1);
        assert_eq!(effect.active_particle_count(), 0);
    }

    #[test]
    fn test_trigger_fans_out() {
        let mut effect =
            ParticleEffect::with_emitters("burst", vec![emitter(10, 3, 1.0), emitter(10, 4, 1.0)]);
        assert_eq!(effect.trigger(Coordinate::ORIGIN), 7);
        assert_eq!(effect.active_particle_count(), 7);

        let line = LineSegment::new(Coordinate::ORIGIN, Coordinate::new(5.0, 0.0));
        assert_eq!(effect.trigger_line(line), 7);
        assert_eq!(effect.active_particle_count(), 14);
    }

    #[test]
    fn test_update_fans_out() {
        let mut effect = ParticleEffect::new("fade");
        effect.add_emitter(emitter(10, 2, 1.0));
        effect.add_emitter(emitter(10, 2, 5.0));
        effect.trigger(Coordinate::ORIGIN);
        effect.update(2.0);

        assert_eq!(effect.emitters()[0].active_particle_count(), 0);
        assert_eq!(effect.emitters()[1].active_particle_count(), 2);
    }

    #[test]
    fn test_parallel_update_matches_serial() {
        let build = || {
            ParticleEffect::with_emitters(
                "pair",
                (0..4).map(|i| emitter(200, 50, 1.0 + i as f32)).collect(),
            )
        };
        let mut serial = build();
        let mut parallel = build();
        parallel.set_parallel(true);
        assert!(parallel.is_parallel());

        for _ in 0..90 {
            serial.trigger(Coordinate::ORIGIN);
            parallel.trigger(Coordinate::ORIGIN);
            serial.update(1.0 / 60.0);
            parallel.update(1.0 / 60.0);
        }

        assert_eq!(serial.active_particle_count(), parallel.active_particle_count());
        for (a, b) in serial.emitters().iter().zip(parallel.emitters()) {
            assert!(a.particles().eq(b.particles()));
        }
    }

    #[test]
    fn test_remove_emitter() {
        let first = emitter(10, 1, 1.0);
        let id = first.id();
        let mut effect = ParticleEffect::with_emitters("one", vec![first]);
        assert!(effect.remove_emitter(id).is_some());
        assert!(effect.remove_emitter(id).is_none());
        assert!(effect.emitters().is_empty());
    }
}
