//! Easing functions
//!
//! The curve vocabulary the site actually uses: quadratic in/out for most
//! reveals, expo for hero text, back-out for playful scale pops, elastic for
//! accents. Every function maps [0, 1] onto [0, 1] with `f(0) = 0` and
//! `f(1) = 1`; inputs outside the unit interval are clamped first.

use serde::{Deserialize, Serialize};

/// An easing curve applied to tween progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Easing {
    /// Constant rate
    Linear,
    /// Quadratic acceleration from rest
    EaseIn,
    /// Quadratic deceleration into rest (the house "smooth")
    #[default]
    EaseOut,
    /// Quadratic in/out
    EaseInOut,
    /// Cubic deceleration, slightly snappier tail than `EaseOut`
    CubicOut,
    /// Exponential deceleration, near-instant start
    ExpoOut,
    /// Overshoots the target then settles back
    BackOut {
        /// Overshoot amount; 1.7 gives roughly a 10% overshoot
        overshoot: f32,
    },
    /// Decaying oscillation around the target
    ElasticOut,
}

impl Easing {
    /// The default back-out pop used by scale reveals
    pub fn back_out() -> Self {
        Easing::BackOut { overshoot: 1.70158 }
    }

    /// Apply the curve to a progress fraction, clamping input to [0, 1]
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
            Easing::CubicOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Easing::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f32.powf(-10.0 * t)
                }
            }
            Easing::BackOut { overshoot } => {
                let s = *overshoot;
                let u = t - 1.0;
                1.0 + (s + 1.0) * u * u * u + s * u * u
            }
            Easing::ElasticOut => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else {
                    const C: f32 = std::f32::consts::TAU / 3.0;
                    2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * C).sin() + 1.0
                }
            }
        }
    }
}
