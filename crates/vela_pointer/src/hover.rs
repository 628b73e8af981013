//! Hover detection for interactive targets
//!
//! On every pointer move the host reports what the pointer is over, as an
//! [`ElementRole`]. The probe edge-detects enter/leave transitions across
//! interactive targets and drives a pop spring for the cursor dot scale.

use serde::{Deserialize, Serialize};

use vela_animation::{Spring, SpringConfig};
use vela_core::{motion_policy, MotionPolicy};

/// What kind of element the pointer is currently over
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementRole {
    Anchor,
    Button,
    Input,
    TextArea,
    /// Explicitly tagged as interactive by the host
    Tagged,
    /// Anything else (text, images, empty space)
    Other,
}

impl ElementRole {
    /// Does hovering this role count as hovering an interactive target?
    pub fn is_interactive(&self) -> bool {
        !matches!(self, ElementRole::Other)
    }
}

/// Edge transition across an interactive target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverEvent {
    Enter,
    Leave,
}

/// Dot scale while hovering an interactive target
const HOVER_SCALE: f32 = 1.5;

/// Edge-detects hover over interactive targets and animates a pop scale
///
/// `update` takes the role under the pointer (or `None` once the pointer
/// leaves the surface) and reports `Enter`/`Leave` only on transitions.
/// [`scale`](HoverProbe::scale) is the spring-animated dot scale, 1.0 at
/// rest, popping to 1.5x while hovering.
///
/// Under [`MotionPolicy::Reduced`] the spring is bypassed and the scale
/// snaps between the two values.
pub struct HoverProbe {
    hovering: bool,
    scale: Spring,
    policy: MotionPolicy,
}

impl HoverProbe {
    /// Create a probe under the process-wide motion policy
    pub fn new() -> Self {
        Self::with_policy(motion_policy())
    }

    /// Create a probe with an explicit policy (tests, previews)
    pub fn with_policy(policy: MotionPolicy) -> Self {
        Self {
            hovering: false,
            scale: Spring::new(SpringConfig::hover_pop(), 1.0),
            policy,
        }
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// The animated dot scale for rendering
    pub fn scale(&self) -> f32 {
        self.scale.value()
    }

    /// Report what the pointer is over; returns a transition if one occurred
    pub fn update(&mut self, over: Option<ElementRole>) -> Option<HoverEvent> {
        let hovering = over.is_some_and(|role| role.is_interactive());
        if hovering == self.hovering {
            return None;
        }
        self.hovering = hovering;

        let target = if hovering { HOVER_SCALE } else { 1.0 };
        if self.policy.is_reduced() {
            self.scale.set_immediate(target);
        } else {
            self.scale.set_target(target);
        }

        let event = if hovering {
            HoverEvent::Enter
        } else {
            HoverEvent::Leave
        };
        tracing::trace!(?event, ?over, "hover transition");
        Some(event)
    }

    /// Advance the pop spring by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        self.scale.step(dt);
    }
}

impl Default for HoverProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_predicate() {
        assert!(ElementRole::Anchor.is_interactive());
        assert!(ElementRole::Button.is_interactive());
        assert!(ElementRole::Input.is_interactive());
        assert!(ElementRole::TextArea.is_interactive());
        assert!(ElementRole::Tagged.is_interactive());
        assert!(!ElementRole::Other.is_interactive());
    }

    #[test]
    fn test_transitions_are_edge_triggered() {
        let mut probe = HoverProbe::with_policy(MotionPolicy::Full);

        assert_eq!(probe.update(Some(ElementRole::Button)), Some(HoverEvent::Enter));
        // Staying on the same or another interactive target: no new event
        assert_eq!(probe.update(Some(ElementRole::Button)), None);
        assert_eq!(probe.update(Some(ElementRole::Anchor)), None);

        assert_eq!(probe.update(Some(ElementRole::Other)), Some(HoverEvent::Leave));
        assert_eq!(probe.update(None), None);

        assert_eq!(probe.update(Some(ElementRole::Tagged)), Some(HoverEvent::Enter));
        assert_eq!(probe.update(None), Some(HoverEvent::Leave));
    }

    #[test]
    fn test_pop_spring_reaches_hover_scale() {
        let mut probe = HoverProbe::with_policy(MotionPolicy::Full);
        probe.update(Some(ElementRole::Button));

        for _ in 0..300 {
            probe.step(1.0 / 60.0);
        }
        assert!((probe.scale() - HOVER_SCALE).abs() < 1e-2);

        probe.update(None);
        for _ in 0..300 {
            probe.step(1.0 / 60.0);
        }
        assert!((probe.scale() - 1.0).abs() < 1e-2);
    }

    #[test]
    fn test_reduced_motion_snaps_the_scale() {
        let mut probe = HoverProbe::with_policy(MotionPolicy::Reduced);

        probe.update(Some(ElementRole::Anchor));
        assert_eq!(probe.scale(), HOVER_SCALE);

        probe.update(None);
        assert_eq!(probe.scale(), 1.0);
    }
}
