//! Vela Particle Field
//!
//! An ambient, purely decorative simulation of drifting points:
//!
//! - **Field**: fixed particle set, coherent-noise velocity drift,
//!   multiplicative damping, cyclic wrap at the field edges
//! - **Rendering contract**: per-particle layered glow sprites for the host
//!   to paint; the field owns no drawing
//!
//! The field never interacts with other components; under reduced motion it
//! renders a static frame with a quarter of the particles.

pub mod field;
pub mod noise;
pub mod render;

pub use field::{FieldConfig, Particle, ParticleField};
pub use noise::ValueNoise2;
pub use render::{glow_sprites, GlowSprite};
