//! Fixed-capacity circular particle storage.
//!
//! This module provides the `ParticleBuffer` type which owns one contiguous
//! allocation of particle slots and tracks the live range as a
//! `(head, count)` pair over it. Particles are released at the tail and
//! reclaimed from the head, so neither operation moves particle data:
//!
//! ```text
//!            head              tail
//!             │                 │
//! ┌───┬───┬───▼───┬───┬───┬───┬─▼─┬───┐
//! │ . │ . │ 0 │ 1 │ 2 │ 3 │ 4 │ . │ . │   live = [head, head + count) mod N
//! └───┴───┴───────┴───┴───┴───┴───┴───┘
//! ```
//!
//! When the live range crosses the end of the allocation it is exposed as
//! two physical slices. [`ParticleSpan`] hides that split from callers and
//! the bulk copies perform at most two linear copies.

use std::fmt;

use flare_common::{BufferError, ConfigError};
use tracing::{debug, trace};

use crate::particle::Particle;

/// Circular store of particles with release/reclaim at opposite ends.
///
/// Live particles are always ordered oldest-first starting at `head`.
/// Slots outside the live range hold stale data and are never exposed.
pub struct ParticleBuffer {
    /// Backing storage; its length is the capacity
    slots: Vec<Particle>,
    /// Physical index of the oldest live particle
    head: usize,
    /// Number of live particles
    count: usize,
    /// Set once the storage has been released
    disposed: bool,
}

impl ParticleBuffer {
    /// Allocates a buffer with room for `capacity` particles.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        debug!(
            "Allocating particle buffer ({} slots, {} bytes)",
            capacity,
            capacity * Particle::SIZE
        );

        Ok(Self {
            slots: vec![Particle::default(); capacity],
            head: 0,
            count: 0,
            disposed: false,
        })
    }

    /// Number of slots. Zero once disposed.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live particles.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Number of particles that can still be released.
    #[must_use]
    pub fn available(&self) -> usize {
        self.capacity() - self.count
    }

    /// Physical index of the oldest live particle.
    #[must_use]
    pub const fn head(&self) -> usize {
        self.head
    }

    /// Physical index the next released particle will occupy.
    #[must_use]
    pub fn tail(&self) -> usize {
        match self.capacity() {
            0 => 0,
            capacity => (self.head + self.count) % capacity,
        }
    }

    /// Whether there are no live particles.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether every slot is live.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    /// Whether the storage has been released by [`dispose`](Self::dispose).
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Size of the backing storage in bytes.
    #[must_use]
    pub fn size_in_bytes(&self) -> usize {
        self.capacity() * Particle::SIZE
    }

    /// Releases up to `requested` particles at the tail.
    ///
    /// The number released is `min(requested, available())`; running out of
    /// headroom is not an error. The returned span covers exactly the new
    /// slots, which still hold stale data and must be initialized by the
    /// caller.
    pub fn release(&mut self, requested: usize) -> ParticleSpan<'_> {
        let released = requested.min(self.available());
        if released < requested {
            trace!(
                requested,
                released,
                capacity = self.capacity(),
                "particle release clamped by capacity"
            );
        }

        let start = self.count;
        self.count += released;
        self.span_mut(start, released)
    }

    /// Removes the `n` oldest live particles.
    ///
    /// Only the head index moves; reclaimed slots are not cleared. Asking
    /// for more than [`count`](Self::count) is a logic error: it asserts in
    /// debug builds and is clamped otherwise. Emptying the buffer leaves
    /// `head` where it was.
    pub fn reclaim(&mut self, n: usize) {
        debug_assert!(
            n <= self.count,
            "reclaim({n}) exceeds live count {}",
            self.count
        );
        let n = n.min(self.count);
        if n == self.count {
            self.count = 0;
            return;
        }

        self.head = (self.head + n) % self.capacity();
        self.count -= n;
    }

    /// Removes every live particle for which `keep` returns false.
    ///
    /// Survivors are moved towards the head so the live range stays
    /// contiguous and keeps its oldest-first order. Returns the number of
    /// particles removed. This is the compacting alternative to
    /// [`reclaim`](Self::reclaim) for particles that do not expire in
    /// release order.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Particle) -> bool,
    {
        let capacity = self.capacity();
        let mut write = 0;
        for read in 0..self.count {
            let from = (self.head + read) % capacity;
            if keep(&self.slots[from]) {
                if write != read {
                    let to = (self.head + write) % capacity;
                    self.slots[to] = self.slots[from];
                }
                write += 1;
            }
        }

        let removed = self.count - write;
        self.count = write;
        removed
    }

    /// Drops every live particle.
    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// Mutable traversal over the live range, oldest first.
    ///
    /// The span borrows the buffer, so the range cannot be released into or
    /// reclaimed while it is alive.
    pub fn iterate(&mut self) -> ParticleSpan<'_> {
        self.span_mut(0, self.count)
    }

    /// Read-only iterator over the live range, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Particle> {
        let (first, second) = self.as_slices();
        first.iter().chain(second.iter())
    }

    /// The live range as up to two physical slices, oldest first.
    #[must_use]
    pub fn as_slices(&self) -> (&[Particle], &[Particle]) {
        let (first, second) = self.physical_ranges(0, self.count);
        (&self.slots[first], &self.slots[second])
    }

    /// Copies the live range oldest-first into `destination`.
    ///
    /// Returns the number of particles written.
    pub fn copy_to(&self, destination: &mut [Particle]) -> Result<usize, BufferError> {
        self.check_destination(destination.len())?;
        let (first, second) = self.as_slices();
        destination[..first.len()].copy_from_slice(first);
        destination[first.len()..self.count].copy_from_slice(second);
        Ok(self.count)
    }

    /// Copies the live range newest-first into `destination`.
    ///
    /// Produces the exact reverse of [`copy_to`](Self::copy_to).
    pub fn copy_to_reversed(&self, destination: &mut [Particle]) -> Result<usize, BufferError> {
        let count = self.copy_to(destination)?;
        destination[..count].reverse();
        Ok(count)
    }

    /// Copies the raw bytes of the live range oldest-first into
    /// `destination`, for renderers that map particle memory directly.
    ///
    /// Returns the number of bytes written.
    pub fn copy_to_bytes(&self, destination: &mut [u8]) -> Result<usize, BufferError> {
        let required = self.count * Particle::SIZE;
        if destination.len() < required {
            return Err(BufferError::DestinationTooSmall {
                required: self.count,
                provided: destination.len() / Particle::SIZE,
            });
        }

        let (first, second) = self.as_slices();
        let first: &[u8] = bytemuck::cast_slice(first);
        let second: &[u8] = bytemuck::cast_slice(second);
        destination[..first.len()].copy_from_slice(first);
        destination[first.len()..required].copy_from_slice(second);
        Ok(required)
    }

    /// Frees the backing storage.
    ///
    /// Idempotent: the storage is released on the first call and later
    /// calls do nothing. A disposed buffer behaves as a buffer of capacity
    /// zero. Dropping the buffer frees the storage as well.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        debug!("Disposing particle buffer ({} slots)", self.capacity());
        self.slots = Vec::new();
        self.head = 0;
        self.count = 0;
        self.disposed = true;
    }

    fn check_destination(&self, provided: usize) -> Result<(), BufferError> {
        if provided < self.count {
            return Err(BufferError::DestinationTooSmall {
                required: self.count,
                provided,
            });
        }
        Ok(())
    }

    /// Physical index ranges covering `len` live particles starting at
    /// logical offset `start` from the head.
    fn physical_ranges(
        &self,
        start: usize,
        len: usize,
    ) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        let capacity = self.capacity();
        if len == 0 || capacity == 0 {
            return (0..0, 0..0);
        }

        let begin = (self.head + start) % capacity;
        let first_len = len.min(capacity - begin);
        (begin..begin + first_len, 0..len - first_len)
    }

    fn span_mut(&mut self, start: usize, len: usize) -> ParticleSpan<'_> {
        let (first, second) = self.physical_ranges(start, len);
        if second.is_empty() {
            return ParticleSpan::new(&mut self.slots[first], Default::default());
        }

        let (low, high) = self.slots.split_at_mut(first.start);
        ParticleSpan::new(high, &mut low[second])
    }
}

impl fmt::Debug for ParticleBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticleBuffer")
            .field("capacity", &self.capacity())
            .field("head", &self.head)
            .field("count", &self.count)
            .field("disposed", &self.disposed)
            .finish()
    }
}

/// A mutable view over a logically contiguous run of particles.
///
/// Physically the run may be split in two at the end of the ring buffer;
/// iteration always yields particles in logical (oldest-first) order. The
/// view is restartable: `iter_mut` can be called any number of times.
#[derive(Debug, Default)]
pub struct ParticleSpan<'a> {
    first: &'a mut [Particle],
    second: &'a mut [Particle],
}

impl<'a> ParticleSpan<'a> {
    /// Creates a span from two physical slices in logical order.
    #[must_use]
    pub fn new(first: &'a mut [Particle], second: &'a mut [Particle]) -> Self {
        Self { first, second }
    }

    /// Number of particles in the span.
    #[must_use]
    pub fn len(&self) -> usize {
        self.first.len() + self.second.len()
    }

    /// Whether the span is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the particles in logical order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Particle> {
        self.first.iter().chain(self.second.iter())
    }

    /// Mutably iterates the particles in logical order.
    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut Particle> {
        self.first.iter_mut().chain(self.second.iter_mut())
    }

    /// The particle at logical index `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        let split = self.first.len();
        if index < split {
            self.first.get_mut(index)
        } else {
            self.second.get_mut(index - split)
        }
    }

    /// The two physical halves, in logical order. The second is empty
    /// unless the span wraps.
    pub fn as_mut_slices(&mut self) -> (&mut [Particle], &mut [Particle]) {
        (&mut *self.first, &mut *self.second)
    }

    /// Narrows the view to `len` particles starting at logical `start`.
    ///
    /// Out-of-range requests are clamped to the span.
    pub fn subspan(&mut self, start: usize, len: usize) -> ParticleSpan<'_> {
        let start = start.min(self.len());
        let end = start.saturating_add(len).min(self.len());
        let split = self.first.len();

        if start >= split {
            return ParticleSpan::new(
                &mut self.second[start - split..end - split],
                Default::default(),
            );
        }
        if end <= split {
            return ParticleSpan::new(&mut self.first[start..end], Default::default());
        }
        ParticleSpan::new(&mut self.first[start..], &mut self.second[..end - split])
    }

    /// Calls `f` once per non-empty physical slice, in logical order.
    pub fn for_each_slice<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut [Particle]),
    {
        if !self.first.is_empty() {
            f(&mut *self.first);
        }
        if !self.second.is_empty() {
            f(&mut *self.second);
        }
    }
}
