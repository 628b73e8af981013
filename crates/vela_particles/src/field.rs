//! The drifting particle field
//!
//! Each particle carries its own offset into a shared noise field; sampling
//! the field at the particle's position plus that offset yields a steering
//! angle, so neighbours drift along similar slow currents without ever
//! agreeing exactly. Velocity is damped multiplicatively each frame and
//! positions wrap cyclically at the field edges.

use serde::{Deserialize, Serialize};

use vela_core::{motion_policy, MotionPolicy, Size, Vec2};

use crate::noise::ValueNoise2;

const DEFAULT_SEED: u32 = 0x5645_4c41;

/// Tuning knobs for a field, shippable as data
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Particle count at full motion; reduced motion quarters it
    pub count: usize,
    /// Min/max particle radius in px
    pub size_range: (f32, f32),
    /// Min/max base alpha
    pub alpha_range: (f32, f32),
    /// Steering force magnitude in px/s^2
    pub drift: f32,
    /// Velocity retained per frame at 60fps
    pub damping: f32,
    /// Spatial frequency of the noise field (smaller = broader currents)
    pub noise_scale: f32,
    /// How fast the noise field itself evolves, in noise units per second
    pub noise_step: f32,
    /// Translucent layers per particle in the glow rendering
    pub glow_layers: usize,
    /// Number of palette entries `color_index` is drawn from
    pub palette_len: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: 60,
            size_range: (1.5, 4.0),
            alpha_range: (0.1, 0.4),
            drift: 18.0,
            damping: 0.98,
            noise_scale: 0.008,
            noise_step: 0.12,
            glow_layers: 3,
            palette_len: 4,
        }
    }
}

/// One drifting point
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub position: Vec2,
    /// px/s
    pub velocity: Vec2,
    pub size: f32,
    pub alpha: f32,
    /// This particle's offset into the shared noise field
    pub noise_offset: Vec2,
    /// Index into the host's palette, in `0..palette_len`
    pub color_index: usize,
}

/// Splitmix-style hash for deterministic particle seeding
fn hash_u32(mut x: u32) -> u32 {
    x = x.wrapping_add(0x9e37_79b9);
    x = (x ^ (x >> 16)).wrapping_mul(0x21f0_aaad);
    x = (x ^ (x >> 15)).wrapping_mul(0x735a_2d97);
    x ^ (x >> 15)
}

/// Hash-derived f32 in [0, 1)
fn hash_unit(seed: u32, index: u32, salt: u32) -> f32 {
    let h = hash_u32(seed ^ hash_u32(index) ^ salt.wrapping_mul(0x85eb_ca6b));
    (h >> 8) as f32 / (1u32 << 24) as f32
}

fn range_sample(range: (f32, f32), t: f32) -> f32 {
    range.0 + (range.1 - range.0) * t
}

/// A fixed set of independently drifting particles
///
/// The host calls [`step`](ParticleField::step) once per frame and reads
/// [`particles`](ParticleField::particles) (or the glow sprites) to paint.
/// Purely decorative; nothing else in the system observes it.
///
/// Under [`MotionPolicy::Reduced`] construction keeps a quarter of the
/// particles (at least one) and `step` does nothing, leaving a static frame.
pub struct ParticleField {
    size: Size,
    config: FieldConfig,
    particles: Vec<Particle>,
    noise: ValueNoise2,
    time: f32,
    policy: MotionPolicy,
}

impl ParticleField {
    /// Create a field under the process-wide motion policy
    pub fn new(size: Size, config: FieldConfig) -> Self {
        Self::with_policy(size, config, motion_policy())
    }

    /// Create a field with an explicit policy (tests, previews)
    pub fn with_policy(size: Size, config: FieldConfig, policy: MotionPolicy) -> Self {
        Self::with_seed(size, config, policy, DEFAULT_SEED)
    }

    /// Create a field with an explicit seed for reproducible layouts
    pub fn with_seed(size: Size, config: FieldConfig, policy: MotionPolicy, seed: u32) -> Self {
        let count = if policy.is_reduced() {
            (config.count / 4).max(1)
        } else {
            config.count
        };

        let particles = (0..count)
            .map(|i| {
                let i = i as u32;
                Particle {
                    position: Vec2::new(
                        hash_unit(seed, i, 1) * size.width,
                        hash_unit(seed, i, 2) * size.height,
                    ),
                    velocity: Vec2::ZERO,
                    size: range_sample(config.size_range, hash_unit(seed, i, 3)),
                    alpha: range_sample(config.alpha_range, hash_unit(seed, i, 4)),
                    noise_offset: Vec2::new(
                        hash_unit(seed, i, 5) * 1000.0,
                        hash_unit(seed, i, 6) * 1000.0,
                    ),
                    color_index: hash_u32(seed ^ hash_u32(i)) as usize
                        % config.palette_len.max(1),
                }
            })
            .collect();

        tracing::debug!(count, reduced = policy.is_reduced(), "particle field created");

        Self {
            size,
            config,
            particles,
            noise: ValueNoise2::new(seed),
            time: 0.0,
            policy,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn count(&self) -> usize {
        self.particles.len()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// A no-op under reduced motion.
    pub fn step(&mut self, dt: f32) {
        if self.policy.is_reduced() || dt <= 0.0 {
            return;
        }
        self.time += dt;

        // 0.98/frame at 60fps, scaled to the actual frame time
        let damping = self.config.damping.powf(dt * 60.0);
        let scale = self.config.noise_scale;
        let drift = self.config.drift;
        let t = self.time * self.config.noise_step;

        for p in &mut self.particles {
            let n = self.noise.sample(
                p.position.x * scale + p.noise_offset.x + t,
                p.position.y * scale + p.noise_offset.y,
            );
            let angle = n * std::f32::consts::TAU * 2.0;
            let steer = Vec2::new(angle.cos(), angle.sin()) * drift;

            p.velocity = (p.velocity + steer * dt) * damping;
            p.position += p.velocity * dt;
        }

        self.wrap_all();
    }

    /// Adopt a new field size, re-wrapping stragglers into bounds
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.wrap_all();
    }

    fn wrap_all(&mut self) {
        for p in &mut self.particles {
            p.position = wrap(p.position, self.size, p.size);
        }
    }
}

/// Cyclic wrap with a margin of one particle radius, so a particle slides
/// fully off one edge before reappearing at the other
fn wrap(position: Vec2, field: Size, margin: f32) -> Vec2 {
    let span_x = field.width + margin * 2.0;
    let span_y = field.height + margin * 2.0;
    Vec2::new(
        (position.x + margin).rem_euclid(span_x) - margin,
        (position.y + margin).rem_euclid(span_y) - margin,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_size() -> Size {
        Size::new(800.0, 600.0)
    }

    #[test]
    fn test_particles_spawn_inside_the_field() {
        let field = ParticleField::with_policy(field_size(), FieldConfig::default(), MotionPolicy::Full);
        assert_eq!(field.count(), 60);
        for p in field.particles() {
            assert!((0.0..=800.0).contains(&p.position.x));
            assert!((0.0..=600.0).contains(&p.position.y));
            assert!(p.size >= 1.5 && p.size <= 4.0);
            assert!(p.color_index < 4);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = ParticleField::with_seed(field_size(), FieldConfig::default(), MotionPolicy::Full, 9);
        let b = ParticleField::with_seed(field_size(), FieldConfig::default(), MotionPolicy::Full, 9);
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!(pa.position, pb.position);
            assert_eq!(pa.size, pb.size);
        }
    }

    #[test]
    fn test_step_moves_particles_smoothly() {
        let mut field =
            ParticleField::with_policy(field_size(), FieldConfig::default(), MotionPolicy::Full);
        let before: Vec<Vec2> = field.particles().iter().map(|p| p.position).collect();

        for _ in 0..30 {
            field.step(1.0 / 60.0);
        }

        let mut moved = 0;
        for (p, start) in field.particles().iter().zip(&before) {
            let travelled = (p.position - *start).length();
            if travelled > 0.0 {
                moved += 1;
            }
            // Slow ambient drift, not ballistic motion
            assert!(travelled < 50.0);
        }
        assert_eq!(moved, field.count());
    }

    #[test]
    fn test_positions_wrap_cyclically() {
        let mut config = FieldConfig::default();
        config.count = 1;
        let mut field = ParticleField::with_policy(field_size(), config, MotionPolicy::Full);

        let margin = field.particles[0].size;
        field.particles[0].position = Vec2::new(-margin - 1.0, 300.0);
        field.particles[0].velocity = Vec2::ZERO;
        field.step(1.0 / 60.0);

        let p = field.particles()[0];
        assert!(p.position.x > 700.0, "expected wrap to the right edge, got {:?}", p.position);
    }

    #[test]
    fn test_resize_rewraps() {
        let mut config = FieldConfig::default();
        config.count = 1;
        let mut field = ParticleField::with_policy(field_size(), config, MotionPolicy::Full);
        field.particles[0].position = Vec2::new(790.0, 590.0);

        field.resize(Size::new(400.0, 300.0));
        let p = field.particles()[0];
        let margin = p.size;
        assert!(p.position.x <= 400.0 + margin);
        assert!(p.position.y <= 300.0 + margin);
    }

    #[test]
    fn test_reduced_motion_is_a_static_quarter_field() {
        let field_full =
            ParticleField::with_policy(field_size(), FieldConfig::default(), MotionPolicy::Full);
        let mut field =
            ParticleField::with_policy(field_size(), FieldConfig::default(), MotionPolicy::Reduced);
        assert_eq!(field.count(), field_full.count() / 4);

        let before: Vec<Vec2> = field.particles().iter().map(|p| p.position).collect();
        field.step(1.0);
        for (p, start) in field.particles().iter().zip(&before) {
            assert_eq!(p.position, *start);
        }
    }

    #[test]
    fn test_reduced_motion_keeps_at_least_one_particle() {
        let mut config = FieldConfig::default();
        config.count = 2;
        let field = ParticleField::with_policy(field_size(), config, MotionPolicy::Reduced);
        assert_eq!(field.count(), 1);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: FieldConfig = serde_json::from_str(r#"{ "count": 120, "drift": 30.0 }"#).unwrap();
        assert_eq!(config.count, 120);
        assert_eq!(config.drift, 30.0);
        assert_eq!(config.damping, 0.98);
        assert_eq!(config.glow_layers, 3);
    }
}
