//! Particle emitter.
//!
//! An emitter owns one [`ParticleBuffer`] and drives it: [`Emitter::trigger`]
//! releases a batch of particles seeded from the emission profile and the
//! release parameters, and [`Emitter::update`] advances the simulation
//! clock, reclaims expired particles, integrates age and position, then
//! runs the modifier pipeline over what is left.
//!
//! # Example
//!
//! ```
//! use flare_kernel::prelude::*;
//!
//! let mut emitter = EmitterBuilder::new(1000, 2.0)
//!     .profile(Profile::ring(10.0, true))
//!     .parameters(ReleaseParameters::default().with_quantity(50))
//!     .modifier(LinearGravityModifier::new(Axis::DOWN, 30.0), 60.0)
//!     .build()
//!     .expect("valid emitter");
//!
//! emitter.trigger(Coordinate::new(100.0, 100.0));
//! emitter.update(1.0 / 60.0);
//! assert_eq!(emitter.active_particle_count(), 50);
//! ```

use std::fmt;
use std::sync::Arc;

use flare_common::{
    BufferError, ConfigError, Coordinate, EmitterId, LineSegment, RandomSource, SeededRandom,
};
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::buffer::ParticleBuffer;
use crate::modifier::{ExecutionStrategy, Modifier, ModifierCollection};
use crate::particle::Particle;
use crate::profile::EmissionProfile;
use crate::release::ReleaseParameters;
use crate::render::RenderingOrder;

/// How often expired particles are reclaimed by default, in Hz.
pub const DEFAULT_RECLAIM_FREQUENCY: f32 = 60.0;

/// How expired particles are removed from the buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReclaimPolicy {
    /// Reclaim the contiguous run of expired particles at the head.
    ///
    /// Correct whenever particles expire in release order, which holds for
    /// a constant term.
    #[default]
    HeadPrefix,
    /// Remove every expired particle wherever it sits and compact the
    /// survivors towards the head.
    Compacting,
}

/// Owns a particle buffer and simulates it.
pub struct Emitter {
    id: EmitterId,
    name: String,
    buffer: ParticleBuffer,
    profile: Arc<dyn EmissionProfile>,
    modifiers: ModifierCollection,
    parameters: ReleaseParameters,
    rng: Box<dyn RandomSource>,
    term: f32,
    reclaim_interval: f32,
    reclaim_policy: ReclaimPolicy,
    rendering_order: RenderingOrder,
    texture_key: Option<String>,
    total_elapsed_time: f32,
    time_since_last_reclaim: f32,
}

impl Emitter {
    /// Creates an emitter with default parameters and no modifiers.
    pub fn new<P>(capacity: usize, term: f32, profile: P) -> Result<Self, ConfigError>
    where
        P: EmissionProfile + 'static,
    {
        EmitterBuilder::new(capacity, term).profile(profile).build()
    }

    /// Starts building an emitter.
    #[must_use]
    pub fn builder(capacity: usize, term: f32) -> EmitterBuilder {
        EmitterBuilder::new(capacity, term)
    }

    /// Unique ID of this emitter.
    #[must_use]
    pub const fn id(&self) -> EmitterId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of live particles.
    #[must_use]
    pub const fn active_particle_count(&self) -> usize {
        self.buffer.count()
    }

    /// Maximum number of live particles.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Particle lifetime in seconds.
    #[must_use]
    pub const fn term(&self) -> f32 {
        self.term
    }

    /// Simulation clock in seconds.
    #[must_use]
    pub const fn total_elapsed_time(&self) -> f32 {
        self.total_elapsed_time
    }

    /// Release parameters.
    #[must_use]
    pub const fn parameters(&self) -> &ReleaseParameters {
        &self.parameters
    }

    /// Replaces the release parameters.
    pub fn set_parameters(&mut self, parameters: ReleaseParameters) -> Result<(), ConfigError> {
        parameters.validate()?;
        self.parameters = parameters;
        Ok(())
    }

    /// Emission profile.
    #[must_use]
    pub fn profile(&self) -> &dyn EmissionProfile {
        self.profile.as_ref()
    }

    /// Modifier pipeline.
    #[must_use]
    pub const fn modifiers(&self) -> &ModifierCollection {
        &self.modifiers
    }

    /// Appends a modifier running at `frequency` Hz.
    pub fn add_modifier<M>(&mut self, modifier: M, frequency: f32) -> Result<(), ConfigError>
    where
        M: Modifier + 'static,
    {
        self.modifiers.add(modifier, frequency)
    }

    /// Changes how modifiers are executed.
    pub fn set_execution_strategy(&mut self, strategy: ExecutionStrategy) {
        self.modifiers.set_strategy(strategy);
    }

    /// How expired particles are reclaimed.
    #[must_use]
    pub const fn reclaim_policy(&self) -> ReclaimPolicy {
        self.reclaim_policy
    }

    /// Order particles are handed to renderers.
    #[must_use]
    pub const fn rendering_order(&self) -> RenderingOrder {
        self.rendering_order
    }

    /// Changes the rendering order.
    pub fn set_rendering_order(&mut self, order: RenderingOrder) {
        self.rendering_order = order;
    }

    /// Texture the renderer should draw particles with.
    #[must_use]
    pub fn texture_key(&self) -> Option<&str> {
        self.texture_key.as_deref()
    }

    /// Read-only access to the particle buffer.
    #[must_use]
    pub const fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    /// Live particles, oldest first.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.buffer.iter()
    }

    /// Copies the live range into `destination` in rendering order.
    pub fn copy_to(&self, destination: &mut [Particle]) -> Result<usize, BufferError> {
        self.rendering_order.copy(&self.buffer, destination)
    }

    /// Drops every live particle and restarts the modifier duty cycles.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.modifiers.reset();
    }

    /// Advances the simulation by `elapsed` seconds.
    pub fn update(&mut self, elapsed: f32) {
        self.total_elapsed_time += elapsed;
        if self.buffer.is_empty() {
            return;
        }

        self.time_since_last_reclaim += elapsed;
        if self.time_since_last_reclaim >= self.reclaim_interval {
            self.time_since_last_reclaim = 0.0;
            self.reclaim_expired();
            if self.buffer.is_empty() {
                return;
            }
        }

        let now = self.total_elapsed_time;
        let term = self.term;
        let mut particles = self.buffer.iterate();
        for p in particles.iter_mut() {
            p.age = (now - p.inception) / term;
            p.position[0] += p.velocity[0] * elapsed;
            p.position[1] += p.velocity[1] * elapsed;
        }

        self.modifiers.update(elapsed, now, term, &mut particles);
    }

    /// Removes expired particles according to the reclaim policy.
    ///
    /// Returns the number of particles removed. Runs automatically from
    /// [`update`](Self::update) at the reclaim frequency.
    pub fn reclaim_expired(&mut self) -> usize {
        let now = self.total_elapsed_time;
        let term = self.term;
        let expired = |p: &Particle| now - p.inception > term;

        let reclaimed = match self.reclaim_policy {
            ReclaimPolicy::HeadPrefix => {
                let n = self.buffer.iter().take_while(|p| expired(p)).count();
                self.buffer.reclaim(n);
                self.modifiers.particles_removed(|cursor| cursor.min(n));
                n
            }
            ReclaimPolicy::Compacting => {
                let removed: Vec<usize> = self
                    .buffer
                    .iter()
                    .enumerate()
                    .filter_map(|(i, p)| expired(p).then_some(i))
                    .collect();
                if removed.is_empty() {
                    return 0;
                }
                self.buffer.retain(|p| !expired(p));
                self.modifiers
                    .particles_removed(|cursor| removed.partition_point(|&i| i < cursor));
                removed.len()
            }
        };

        if reclaimed > 0 {
            trace!(
                emitter = %self.id,
                reclaimed,
                live = self.buffer.count(),
                "reclaimed expired particles"
            );
        }
        reclaimed
    }

    /// Releases a batch of particles at `position`.
    ///
    /// The batch size is sampled from the quantity range; fewer particles
    /// are released when the buffer is near capacity. Returns the number
    /// actually released.
    pub fn trigger(&mut self, position: Coordinate) -> usize {
        let quantity = self.sample_quantity();
        self.release_at(position, quantity)
    }

    /// Releases a batch of particles spread along `line`, one particle at
    /// a time, each at a uniformly sampled point on the segment.
    pub fn trigger_line(&mut self, line: LineSegment) -> usize {
        let quantity = self.sample_quantity();
        let mut released = 0;
        for _ in 0..quantity {
            let origin = line.point_at(self.rng.next_float());
            if self.release_at(origin, 1) == 0 {
                break;
            }
            released += 1;
        }
        released
    }

    fn sample_quantity(&mut self) -> usize {
        let quantity = self.parameters.quantity;
        self.rng.next_int_range(quantity.min, quantity.max) as usize
    }

    fn release_at(&mut self, origin: Coordinate, quantity: usize) -> usize {
        let now = self.total_elapsed_time;
        let parameters = &self.parameters;
        let profile = self.profile.as_ref();
        let rng = self.rng.as_mut();

        let mut span = self.buffer.release(quantity);
        for p in span.iter_mut() {
            let (offset, heading) = profile.offset_and_heading(rng);
            let velocity = heading.scale(rng.sample(parameters.speed));

            *p = Particle {
                inception: now,
                age: 0.0,
                position: [origin.x + offset.x, origin.y + offset.y],
                velocity: [velocity.x, velocity.y],
                colour: rng.sample_colour(&parameters.colour).to_array(),
                opacity: rng.sample(parameters.opacity),
                scale: rng.sample(parameters.scale),
                rotation: rng.sample(parameters.rotation),
                mass: rng.sample(parameters.mass),
            };
        }
        span.len()
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("buffer", &self.buffer)
            .field("profile", &self.profile)
            .field("modifiers", &self.modifiers.len())
            .field("term", &self.term)
            .field("total_elapsed_time", &self.total_elapsed_time)
            .finish_non_exhaustive()
    }
}

/// Validating builder for [`Emitter`].
pub struct EmitterBuilder {
    name: Option<String>,
    capacity: usize,
    term: f32,
    profile: Option<Arc<dyn EmissionProfile>>,
    parameters: ReleaseParameters,
    modifiers: Vec<(Box<dyn Modifier>, f32)>,
    rng: Option<Box<dyn RandomSource>>,
    seed: Option<i64>,
    reclaim_frequency: f32,
    reclaim_policy: ReclaimPolicy,
    execution: ExecutionStrategy,
    rendering_order: RenderingOrder,
    texture_key: Option<String>,
}

impl EmitterBuilder {
    /// Starts a builder for `capacity` particles living `term` seconds.
    #[must_use]
    pub fn new(capacity: usize, term: f32) -> Self {
        Self {
            name: None,
            capacity,
            term,
            profile: None,
            parameters: ReleaseParameters::default(),
            modifiers: Vec::new(),
            rng: None,
            seed: None,
            reclaim_frequency: DEFAULT_RECLAIM_FREQUENCY,
            reclaim_policy: ReclaimPolicy::default(),
            execution: ExecutionStrategy::default(),
            rendering_order: RenderingOrder::default(),
            texture_key: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the emission profile.
    #[must_use]
    pub fn profile<P>(self, profile: P) -> Self
    where
        P: EmissionProfile + 'static,
    {
        self.shared_profile(Arc::new(profile))
    }

    /// Sets an emission profile shared with other emitters.
    #[must_use]
    pub fn shared_profile(mut self, profile: Arc<dyn EmissionProfile>) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Sets the release parameters.
    #[must_use]
    pub fn parameters(mut self, parameters: ReleaseParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Appends a modifier running at `frequency` Hz.
    #[must_use]
    pub fn modifier<M>(self, modifier: M, frequency: f32) -> Self
    where
        M: Modifier + 'static,
    {
        self.boxed_modifier(Box::new(modifier), frequency)
    }

    /// Appends a boxed modifier running at `frequency` Hz.
    #[must_use]
    pub fn boxed_modifier(mut self, modifier: Box<dyn Modifier>, frequency: f32) -> Self {
        self.modifiers.push((modifier, frequency));
        self
    }

    /// Injects the random source. Takes precedence over [`seed`](Self::seed).
    #[must_use]
    pub fn random_source(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Seeds the default random source.
    #[must_use]
    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets how often expired particles are reclaimed, in Hz.
    #[must_use]
    pub fn reclaim_frequency(mut self, frequency: f32) -> Self {
        self.reclaim_frequency = frequency;
        self
    }

    /// Sets the reclaim policy.
    #[must_use]
    pub fn reclaim_policy(mut self, policy: ReclaimPolicy) -> Self {
        self.reclaim_policy = policy;
        self
    }

    /// Sets the modifier execution strategy.
    #[must_use]
    pub fn execution(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution = strategy;
        self
    }

    /// Sets the rendering order.
    #[must_use]
    pub fn rendering_order(mut self, order: RenderingOrder) -> Self {
        self.rendering_order = order;
        self
    }

    /// Sets the texture key.
    #[must_use]
    pub fn texture_key(mut self, key: impl Into<String>) -> Self {
        self.texture_key = Some(key.into());
        self
    }

    /// Validates the configuration and allocates the emitter.
    pub fn build(self) -> Result<Emitter, ConfigError> {
        let profile = self.profile.ok_or(ConfigError::MissingProfile)?;
        if !(self.term.is_finite() && self.term > 0.0) {
            return Err(ConfigError::NonPositiveTerm(self.term));
        }
        if !(self.reclaim_frequency.is_finite() && self.reclaim_frequency > 0.0) {
            return Err(ConfigError::NonPositiveReclaimFrequency(self.reclaim_frequency));
        }
        self.parameters.validate()?;

        let rng: Box<dyn RandomSource> = match (self.rng, self.seed) {
            (Some(rng), _) => rng,
            (None, Some(seed)) => Box::new(SeededRandom::new(seed)?),
            (None, None) => Box::new(SeededRandom::default()),
        };

        let mut modifiers = ModifierCollection::new();
        modifiers.set_strategy(self.execution);
        for (modifier, frequency) in self.modifiers {
            modifiers.add_boxed(modifier, frequency)?;
        }

        let buffer = ParticleBuffer::new(self.capacity)?;
        let id = EmitterId::new();
        let name = self.name.unwrap_or_else(|| id.to_string());

        info!(
            "Created emitter '{}' (capacity {}, term {}s, {} modifiers)",
            name,
            self.capacity,
            self.term,
            modifiers.len()
        );

        Ok(Emitter {
            id,
            name,
            buffer,
            profile,
            modifiers,
            parameters: self.parameters,
            rng,
            term: self.term,
            reclaim_interval: 1.0 / self.reclaim_frequency,
            reclaim_policy: self.reclaim_policy,
            rendering_order: self.rendering_order,
            texture_key: self.texture_key,
            total_elapsed_time: 0.0,
            time_since_last_reclaim: 0.0,
        })
    }
}
