//! Render boundary.
//!
//! Renderers read the live range after an emitter's update for the frame
//! has completed, either as raw [`Particle`] records (see
//! [`ParticleBuffer::copy_to`]) or packed into [`ParticleInstance`] vertices
//! ready for an instanced sprite draw.

use flare_common::{hsl_to_rgb, BufferError};
use serde::{Deserialize, Serialize};

use crate::buffer::ParticleBuffer;
use crate::particle::Particle;

/// Order in which particles are handed to the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderingOrder {
    /// Oldest first, so newer particles draw on top
    #[default]
    FrontToBack,
    /// Newest first, so older particles draw on top
    BackToFront,
}

impl RenderingOrder {
    /// Copies the live range of `buffer` into `destination` in this order.
    pub fn copy(
        self,
        buffer: &ParticleBuffer,
        destination: &mut [Particle],
    ) -> Result<usize, BufferError> {
        match self {
            Self::FrontToBack => buffer.copy_to(destination),
            Self::BackToFront => buffer.copy_to_reversed(destination),
        }
    }
}

/// GPU-friendly particle instance.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    /// Position (x, y)
    pub position: [f32; 2],
    /// Scale
    pub scale: f32,
    /// Rotation in radians
    pub rotation: f32,
    /// RGB colour with opacity as alpha
    pub colour: [f32; 4],
}

impl ParticleInstance {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Converts a particle, translating its HSL colour to RGB.
    #[must_use]
    pub fn from_particle(particle: &Particle) -> Self {
        let [r, g, b] = hsl_to_rgb(particle.colour);
        Self {
            position: particle.position,
            scale: particle.scale,
            rotation: particle.rotation,
            colour: [r, g, b, particle.opacity.clamp(0.0, 1.0)],
        }
    }
}

/// Packs the live range of `buffer` into `instances`, replacing its
/// contents. Reuses the vector's allocation across frames.
pub fn pack_instances(
    buffer: &ParticleBuffer,
    order: RenderingOrder,
    instances: &mut Vec<ParticleInstance>,
) {
    instances.clear();
    instances.reserve(buffer.count());
    match order {
        RenderingOrder::FrontToBack => {
            instances.extend(buffer.iter().map(ParticleInstance::from_particle));
        }
        RenderingOrder::BackToFront => {
            instances.extend(buffer.iter().rev().map(ParticleInstance::from_particle));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(ages: &[f32]) -> ParticleBuffer {
        let mut buffer = ParticleBuffer::new(ages.len()).expect("buffer");
        for (p, &age) in buffer.release(ages.len()).iter_mut().zip(ages) {
            p.age = age;
            p.position = [age, age];
            p.opacity = 1.0;
        }
        buffer
    }

    #[test]
    fn test_instance_size() {
        assert_eq!(ParticleInstance::SIZE, 32);
    }

    #[test]
    fn test_instance_converts_colour() {
        let particle = Particle {
            position: [3.0, 4.0],
            colour: [0.0, 1.0, 0.5],
            opacity: 0.25,
            scale: 2.0,
            rotation: 1.5,
            ..Default::default()
        };
        let instance = ParticleInstance::from_particle(&particle);
        assert_eq!(instance.position, [3.0, 4.0]);
        assert_eq!(instance.scale, 2.0);
        assert_eq!(instance.rotation, 1.5);
        assert!((instance.colour[0] - 1.0).abs() < 1e-5);
        assert!(instance.colour[1].abs() < 1e-5);
        assert!(instance.colour[2].abs() < 1e-5);
        assert_eq!(instance.colour[3], 0.25);
    }

    #[test]
    fn test_pack_respects_order() {
        let buffer = filled(&[0.1, 0.2, 0.3]);
        let mut instances = Vec::new();

        pack_instances(&buffer, RenderingOrder::FrontToBack, &mut instances);
        let xs: Vec<f32> = instances.iter().map(|i| i.position[0]).collect();
        assert_eq!(xs, vec![0.1, 0.2, 0.3]);

        pack_instances(&buffer, RenderingOrder::BackToFront, &mut instances);
        let xs: Vec<f32> = instances.iter().map(|i| i.position[0]).collect();
        assert_eq!(xs, vec![0.3, 0.2, 0.1]);
    }

    #[test]
    fn test_copy_in_order() {
        let buffer = filled(&[0.1, 0.2]);
        let mut out = [Particle::default(); 2];
        assert_eq!(RenderingOrder::BackToFront.copy(&buffer, &mut out), Ok(2));
        assert_eq!(out[0].age, 0.2);
        assert_eq!(out[1].age, 0.1);
    }
}
