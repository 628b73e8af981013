//! Vela Core
//!
//! Foundational primitives shared by the Vela animation crates:
//!
//! - **Geometry**: `Vec2`, `Rect`, `Size` in f32 document/viewport space
//! - **Host Abstraction**: element keys, bounding-box queries, viewport state
//! - **Motion Policy**: the process-wide reduced-motion flag
//! - **Visual State**: the interpolated property bundle hosts read at paint time
//!
//! The host rendering environment owns painting, layout and event plumbing;
//! Vela only consumes bounding boxes and frame ticks, and produces values.

pub mod element;
pub mod geometry;
pub mod motion;
pub mod visual;

pub use element::{ElementBounds, ElementKey, Viewport};
pub use geometry::{Rect, Size, Vec2};
pub use motion::{init_motion_policy, motion_policy, try_init_motion_policy, MotionPolicy};
pub use visual::VisualState;
