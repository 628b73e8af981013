//! Coherent 2D value noise
//!
//! Hash-based lattice noise with smooth interpolation. Nearby inputs give
//! nearby outputs, which is what keeps particle drift looking like slow
//! currents instead of white-noise jitter. Deterministic for a given seed.

/// Smooth-interpolated hash-lattice noise over 2D inputs
#[derive(Clone, Copy, Debug)]
pub struct ValueNoise2 {
    seed: u32,
}

impl ValueNoise2 {
    pub const fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Pseudo-random value in [0, 1) at an integer lattice point
    fn lattice(&self, xi: i32, yi: i32) -> f32 {
        let mut h = (xi as u32).wrapping_mul(0x9e37_79b9)
            ^ (yi as u32).wrapping_mul(0x85eb_ca6b)
            ^ self.seed.wrapping_mul(0xc2b2_ae35);
        h ^= h >> 15;
        h = h.wrapping_mul(0x2c1b_3c6d);
        h ^= h >> 12;
        h = h.wrapping_mul(0x297a_2d39);
        h ^= h >> 15;
        (h >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Smoothstep fade, zero first derivative at 0 and 1
    fn fade(t: f32) -> f32 {
        t * t * (3.0 - 2.0 * t)
    }

    /// Noise sample in [0, 1), continuous in both inputs
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let xi = x.floor() as i32;
        let yi = y.floor() as i32;
        let fx = Self::fade(x - xi as f32);
        let fy = Self::fade(y - yi as f32);

        let v00 = self.lattice(xi, yi);
        let v10 = self.lattice(xi + 1, yi);
        let v01 = self.lattice(xi, yi + 1);
        let v11 = self.lattice(xi + 1, yi + 1);

        let top = v00 + (v10 - v00) * fx;
        let bottom = v01 + (v11 - v01) * fx;
        top + (bottom - top) * fy
    }

    /// Noise sample remapped to [-1, 1)
    pub fn sample_signed(&self, x: f32, y: f32) -> f32 {
        self.sample(x, y) * 2.0 - 1.0
    }
}
