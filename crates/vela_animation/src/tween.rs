//! Property tweens
//!
//! A [`Tween`] is one immutable interpolation step: a single visual property
//! moving from a start value to an end value over a duration, through an
//! easing curve, optionally after a delay. Timelines position tweens on a
//! shared time axis and sample them against the playhead.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;

/// A visual property a tween can drive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    Opacity,
    X,
    Y,
    Scale,
    Rotation,
}

impl Property {
    /// The value this property holds when nothing animates it
    pub fn resting_value(&self) -> f32 {
        match self {
            Property::Opacity | Property::Scale => 1.0,
            Property::X | Property::Y | Property::Rotation => 0.0,
        }
    }
}

/// An immutable interpolation step
///
/// Constructed once, never mutated afterwards. Sampling outside the tween's
/// active interval clamps to the endpoint values, so a tween is total over
/// the whole timeline axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    property: Property,
    from: f32,
    to: f32,
    duration_ms: f32,
    delay_ms: f32,
    /// `None` until set explicitly, so a timeline default can fill it in
    easing: Option<Easing>,
}

impl Tween {
    /// Create a tween with no delay and no explicit easing
    pub fn new(property: Property, from: f32, to: f32, duration_ms: f32) -> Self {
        Self {
            property,
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            delay_ms: 0.0,
            easing: None,
        }
    }

    /// Builder: delay before interpolation starts, in milliseconds
    pub fn delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms.max(0.0);
        self
    }

    /// Builder: easing curve
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Builder: easing to use only if none was set explicitly
    pub fn or_easing(mut self, fallback: Easing) -> Self {
        self.easing.get_or_insert(fallback);
        self
    }

    pub fn property(&self) -> Property {
        self.property
    }

    pub fn from_value(&self) -> f32 {
        self.from
    }

    pub fn to_value(&self) -> f32 {
        self.to
    }

    /// Delay plus duration: the local time at which the tween holds its end
    /// value
    pub fn end_ms(&self) -> f32 {
        self.delay_ms + self.duration_ms
    }

    /// Sample at a local time (milliseconds relative to the tween's position
    /// on its timeline)
    ///
    /// Before the delay elapses the start value holds; past the end the end
    /// value holds. A zero-duration tween snaps to its end value once the
    /// delay has elapsed.
    pub fn sample(&self, local_ms: f32) -> f32 {
        if local_ms <= self.delay_ms {
            return self.from;
        }
        if self.duration_ms <= f32::EPSILON || local_ms >= self.end_ms() {
            return self.to;
        }
        let progress = (local_ms - self.delay_ms) / self.duration_ms;
        let eased = self.easing.unwrap_or_default().apply(progress);
        self.from + (self.to - self.from) * eased
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_clamps_outside_interval() {
        let tween = Tween::new(Property::Opacity, 0.0, 1.0, 500.0);
        assert_eq!(tween.sample(-100.0), 0.0);
        assert_eq!(tween.sample(0.0), 0.0);
        assert_eq!(tween.sample(500.0), 1.0);
        assert_eq!(tween.sample(10_000.0), 1.0);
    }

    #[test]
    fn test_delay_holds_start_value() {
        let tween = Tween::new(Property::Y, 50.0, 0.0, 400.0).delay(100.0);
        assert_eq!(tween.sample(50.0), 50.0);
        assert_eq!(tween.sample(100.0), 50.0);
        assert_eq!(tween.end_ms(), 500.0);
        assert_eq!(tween.sample(500.0), 0.0);
    }

    #[test]
    fn test_linear_midpoint() {
        let tween = Tween::new(Property::X, -100.0, 0.0, 200.0).easing(Easing::Linear);
        assert!((tween.sample(100.0) - (-50.0)).abs() < 1e-4);
    }

    #[test]
    fn test_or_easing_only_fills_unset() {
        let unset = Tween::new(Property::X, 0.0, 100.0, 200.0).or_easing(Easing::Linear);
        assert!((unset.sample(100.0) - 50.0).abs() < 1e-4);

        // EaseIn at the midpoint is t^2 = 0.25
        let explicit = Tween::new(Property::X, 0.0, 100.0, 200.0)
            .easing(Easing::EaseIn)
            .or_easing(Easing::Linear);
        assert!((explicit.sample(100.0) - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_duration_snaps() {
        let tween = Tween::new(Property::Scale, 0.8, 1.0, 0.0).delay(100.0);
        assert_eq!(tween.sample(50.0), 0.8);
        assert_eq!(tween.sample(150.0), 1.0);
    }
}
