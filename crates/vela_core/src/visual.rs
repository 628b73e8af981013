//! Interpolated visual state
//!
//! The value bundle a timeline emits each frame and the host reads at paint
//! time. Vela mutates these numbers; the host turns them into transforms.

/// Per-element visual properties driven by animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualState {
    /// Opacity in [0, 1]
    pub opacity: f32,
    /// Horizontal translation offset (px)
    pub x: f32,
    /// Vertical translation offset (px)
    pub y: f32,
    /// Uniform scale factor
    pub scale: f32,
    /// Rotation (radians)
    pub rotation: f32,
}

impl VisualState {
    /// The resting state every reveal animation ends at: fully opaque,
    /// identity transform. Also the state applied immediately under the
    /// reduced-motion policy.
    pub fn resting() -> Self {
        Self {
            opacity: 1.0,
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    /// Check this is the resting state within floating tolerance
    pub fn is_resting(&self) -> bool {
        const EPS: f32 = 1e-4;
        (self.opacity - 1.0).abs() < EPS
            && self.x.abs() < EPS
            && self.y.abs() < EPS
            && (self.scale - 1.0).abs() < EPS
            && self.rotation.abs() < EPS
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::resting()
    }
}
