//! Vela Scroll-Linked Bindings
//!
//! Ties timelines to an element's position within the viewport:
//!
//! - **Trigger ranges**: "element top crosses 80% of the viewport" expressed
//!   as data, parseable from the `"top 80%"` shorthand
//! - **Viewport observer**: resolves ranges against live bounding boxes and
//!   answers where an element sits relative to its range
//! - **Binder**: owns one timeline per bound element and applies the replay
//!   rule (once / toggle / scrub) on every batched scroll evaluation
//!
//! The host forwards scroll/resize events and drives one `evaluate` per
//! frame; everything else, including teardown, flows through handles.

pub mod binder;
pub mod error;
pub mod observer;
pub mod range;

pub use binder::{BindingHandle, Replay, ScrollBinder};
pub use error::{BindError, Result};
pub use observer::{RangeStatus, ViewportObserver, Zone};
pub use range::{RangeSpec, TriggerEdge, TriggerPoint};
