//! Frequency scheduling for modifiers.
//!
//! Each modifier runs at its own nominal frequency, independent of the
//! frame rate. Instead of running the whole live range every `1/f`
//! seconds, a slot spreads one duty cycle across the frames that make up
//! the interval: a `cursor` walks the live range and every frame covers the
//! share of particles the elapsed time is worth. The modifier always sees
//! the nominal timestep `1/f`.
//!
//! ```text
//! frame:   1      2      3      4          (f = 15 Hz at 60 fps)
//! range: [0..25)[25..50)[50..75)[75..100)  then the cursor wraps to 0
//! ```
//!
//! Elapsed time is accumulated across the cycle, so a particle receives
//! exactly one application per cycle regardless of how the cycle is
//! sampled. When the live range is smaller than the number of frames in an
//! interval the cursor reaches the end early and waits for the interval to
//! run out. Owners that remove particles from the live range report it
//! through [`ModifierCollection::particles_removed`] so the cursor keeps
//! pointing at the first particle not yet visited.

use std::ops::Range;

use flare_common::ConfigError;
use tracing::debug;

use crate::buffer::ParticleSpan;
use crate::modifier::{ExecutionStrategy, Modifier, ModifierContext};

/// Frequency used when none is specified, in Hz.
pub const DEFAULT_FREQUENCY: f32 = 60.0;

/// Slack subtracted before rounding the due count up, so accumulated
/// float error does not schedule a particle early.
const ROUNDING_SLACK: f64 = 1e-4;

/// A modifier with its scheduling state.
#[derive(Debug)]
pub struct ModifierSlot {
    modifier: Box<dyn Modifier>,
    frequency: f32,
    /// Time accumulated in the current duty cycle
    accumulated: f64,
    /// Particles already updated in the current duty cycle
    cursor: usize,
}

impl ModifierSlot {
    /// Wraps a modifier running at `frequency` Hz.
    pub fn new(modifier: Box<dyn Modifier>, frequency: f32) -> Result<Self, ConfigError> {
        if !(frequency.is_finite() && frequency > 0.0) {
            return Err(ConfigError::NonPositiveFrequency(frequency));
        }
        Ok(Self {
            modifier,
            frequency,
            accumulated: 0.0,
            cursor: 0,
        })
    }

    /// The wrapped modifier.
    #[must_use]
    pub fn modifier(&self) -> &dyn Modifier {
        self.modifier.as_ref()
    }

    /// Nominal update frequency in Hz.
    #[must_use]
    pub const fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Nominal timestep in seconds.
    #[must_use]
    pub fn interval(&self) -> f32 {
        1.0 / self.frequency
    }

    /// Particles already updated in the current duty cycle.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Starts a fresh duty cycle.
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
        self.cursor = 0;
    }

    /// Advances the scheduler by `elapsed` seconds over `live` particles
    /// and returns the logical range due for an update this frame.
    ///
    /// Once the cursor reaches the end of the live range it holds there
    /// until a full interval has accumulated. At most one duty cycle
    /// completes per call, so frequencies above the frame rate are
    /// effectively capped at the frame rate.
    pub fn schedule(&mut self, elapsed: f32, live: usize) -> Range<usize> {
        if live == 0 {
            self.reset();
            return 0..0;
        }
        // shrinkage nobody reported: hold at the end of the live range
        self.cursor = self.cursor.min(live);

        let interval = f64::from(self.interval());
        self.accumulated += f64::from(elapsed);
        let progress = self.accumulated / interval;
        let start = self.cursor;

        if progress >= 1.0 - ROUNDING_SLACK {
            self.cursor = 0;
            self.accumulated = (self.accumulated - interval).clamp(0.0, interval);
            return start..live;
        }

        let due = (progress * live as f64 - ROUNDING_SLACK).ceil();
        let end = (due.max(0.0) as usize).min(live).max(start);
        self.cursor = end;
        start..end
    }

    /// Shifts the cursor after particles were removed from the live range.
    ///
    /// `removed_below` returns how many removed particles sat at logical
    /// indices below the given cursor. Particles not yet visited this cycle
    /// stay at or past the cursor, and visited ones stay below it.
    pub fn particles_removed<F>(&mut self, removed_below: F)
    where
        F: Fn(usize) -> usize,
    {
        let shift = removed_below(self.cursor).min(self.cursor);
        self.cursor -= shift;
    }
}

/// Ordered list of scheduled modifiers.
///
/// List order is execution order.
#[derive(Debug, Default)]
pub struct ModifierCollection {
    slots: Vec<ModifierSlot>,
    strategy: ExecutionStrategy,
}

impl ModifierCollection {
    /// Creates an empty collection using serial execution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a modifier running at `frequency` Hz.
    pub fn add<M>(&mut self, modifier: M, frequency: f32) -> Result<(), ConfigError>
    where
        M: Modifier + 'static,
    {
        self.add_boxed(Box::new(modifier), frequency)
    }

    /// Appends an already boxed modifier running at `frequency` Hz.
    pub fn add_boxed(
        &mut self,
        modifier: Box<dyn Modifier>,
        frequency: f32,
    ) -> Result<(), ConfigError> {
        debug!("Adding modifier '{}' at {} Hz", modifier.name(), frequency);
        self.slots.push(ModifierSlot::new(modifier, frequency)?);
        Ok(())
    }

    /// Number of modifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The modifiers in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Modifier> {
        self.slots.iter().map(ModifierSlot::modifier)
    }

    /// The scheduled slots in execution order.
    #[must_use]
    pub fn slots(&self) -> &[ModifierSlot] {
        &self.slots
    }

    /// Current execution strategy.
    #[must_use]
    pub const fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Changes the execution strategy.
    pub fn set_strategy(&mut self, strategy: ExecutionStrategy) {
        if strategy != self.strategy {
            debug!("Modifier execution strategy: {:?}", strategy);
        }
        self.strategy = strategy;
    }

    /// Restarts every duty cycle.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.reset();
        }
    }

    /// Shifts every duty cycle after particles were removed from the live
    /// range. See [`ModifierSlot::particles_removed`].
    pub fn particles_removed<F>(&mut self, removed_below: F)
    where
        F: Fn(usize) -> usize,
    {
        for slot in &mut self.slots {
            slot.particles_removed(&removed_below);
        }
    }

    /// Runs every modifier whose share of the live range is due.
    ///
    /// `elapsed` is the frame delta; each modifier is invoked with its own
    /// nominal timestep.
    pub fn update(
        &mut self,
        elapsed: f32,
        total_time: f32,
        term: f32,
        particles: &mut ParticleSpan<'_>,
    ) {
        let strategy = self.strategy;
        let live = particles.len();

        for slot in &mut self.slots {
            let due = slot.schedule(elapsed, live);
            if due.is_empty() {
                continue;
            }

            let ctx = ModifierContext::new(slot.interval(), total_time, term);
            let modifier = slot.modifier.as_ref();
            particles
                .subspan(due.start, due.len())
                .for_each_slice(|run| strategy.execute(modifier, &ctx, run));
        }
    }
}
