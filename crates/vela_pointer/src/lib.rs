//! Vela Pointer Followers
//!
//! Coordinate state for trailing cursor effects:
//!
//! - **Tracker**: the single writer for raw pointer samples, with one sample
//!   of history for velocity
//! - **Followers**: exponentially smoothed points that lag the pointer, one
//!   per visual layer (dot, ring, trail)
//! - **Hover probe**: interactive-target detection with edge-triggered
//!   enter/leave transitions driving a pop spring
//!
//! This crate owns coordinates and scalars only; the host paints whatever it
//! likes at the positions exposed here.

pub mod follower;
pub mod hover;

pub use follower::{speed_stretch, Follower, FollowerStack, PointerSample, PointerTracker};
pub use hover::{ElementRole, HoverEvent, HoverProbe};
