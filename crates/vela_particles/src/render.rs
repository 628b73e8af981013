//! Glow rendering contract
//!
//! The field produces geometry, the host paints it. Each particle becomes a
//! small stack of concentric translucent sprites; outer layers are larger
//! and fainter, which reads as a soft glow on any additive or alpha-blended
//! backend.

use smallvec::SmallVec;

use vela_core::Vec2;

use crate::field::Particle;

/// One translucent disc for the host to paint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowSprite {
    pub center: Vec2,
    pub radius: f32,
    pub alpha: f32,
    pub color_index: usize,
}

/// The layered sprite stack for one particle
///
/// Layer `i` has radius `size * (1 + 0.3 i)` and alpha `alpha / (1 + i)`.
/// Sprites are ordered outermost first so painting them in order composes
/// the glow correctly on plain alpha blending.
pub fn glow_sprites(particle: &Particle, layers: usize) -> SmallVec<[GlowSprite; 4]> {
    (0..layers.max(1))
        .rev()
        .map(|i| GlowSprite {
            center: particle.position,
            radius: particle.size * (1.0 + 0.3 * i as f32),
            alpha: particle.alpha / (i + 1) as f32,
            color_index: particle.color_index,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle() -> Particle {
        Particle {
            position: Vec2::new(100.0, 200.0),
            velocity: Vec2::ZERO,
            size: 4.0,
            alpha: 0.4,
            noise_offset: Vec2::ZERO,
            color_index: 2,
        }
    }

    #[test]
    fn test_outer_layers_are_larger_and_fainter() {
        let sprites = glow_sprites(&particle(), 3);
        assert_eq!(sprites.len(), 3);
        for pair in sprites.windows(2) {
            assert!(pair[0].radius > pair[1].radius);
            assert!(pair[0].alpha < pair[1].alpha);
        }
        // Innermost layer is the particle itself
        let core = sprites.last().unwrap();
        assert_eq!(core.radius, 4.0);
        assert_eq!(core.alpha, 0.4);
        assert_eq!(core.color_index, 2);
    }

    #[test]
    fn test_zero_layers_clamps_to_one() {
        let sprites = glow_sprites(&particle(), 0);
        assert_eq!(sprites.len(), 1);
        assert_eq!(sprites[0].radius, 4.0);
    }
}
