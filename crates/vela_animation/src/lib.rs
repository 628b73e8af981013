//! Vela Animation Engine
//!
//! Timeline-based property animation driven by a host frame loop.
//!
//! # Features
//!
//! - **Easing**: the site's easing vocabulary (quad, cubic, expo, back, elastic)
//! - **Tweens**: immutable per-property interpolation steps with delays
//! - **Timelines**: ordered tween sequences with repeat, yoyo, stagger,
//!   seek/reverse/pause and a clamped playhead
//! - **Springs**: RK4 spring physics for pointer-reactive effects
//! - **Presets**: the reveal recipes (fade/scale/slide) used across sections
//! - **Scheduler**: a slotmap arena of running timelines plus per-frame tick
//!   callbacks, all advanced with one sampled dt per frame

pub mod easing;
pub mod presets;
pub mod scheduler;
pub mod spring;
pub mod timeline;
pub mod tween;

pub use easing::Easing;
pub use presets::{durations, staggers, RevealPreset, Side};
pub use scheduler::{
    AnimatedTimeline, AnimationScheduler, SchedulerHandle, TickCallback, TickCallbackId,
    TickRegistration, TimelineId,
};
pub use spring::{Spring, SpringConfig};
pub use timeline::{Direction, PlayState, StaggerOrder, Timeline, TimelineEntryId};
pub use tween::{Property, Tween};
