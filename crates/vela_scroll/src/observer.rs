//! Viewport observation
//!
//! Holds the latest viewport sample and answers, for any element rectangle
//! and trigger range, where the element currently sits: before its window,
//! inside it (and how far through), or past it.

use vela_core::{Rect, Viewport};

use crate::range::RangeSpec;

/// Position of an element relative to its trigger window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    /// Scroll has not reached the window yet
    Before,
    Inside,
    /// Scroll has passed the window
    After,
}

/// Zone plus traversed fraction
///
/// `progress` is 0 at the window start, 1 at the end, clamped outside; a
/// scrub binding maps it straight onto timeline progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeStatus {
    pub zone: Zone,
    pub progress: f32,
}

/// Tracks the current viewport and evaluates trigger ranges against it
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewportObserver {
    viewport: Viewport,
}

impl ViewportObserver {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    /// Record the latest scroll/resize sample
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Where does `element` sit relative to `range` right now?
    ///
    /// Ranges that resolve to an empty or backwards window for this
    /// particular element (possible for mixed edge/fraction specs on short
    /// elements) degrade to a binary threshold at the start offset.
    pub fn status(&self, range: &RangeSpec, element: Rect) -> RangeStatus {
        let start = range.start.resolve(element, self.viewport.height);
        let end = range.end.resolve(element, self.viewport.height);
        let scroll = self.viewport.scroll_y;
        let span = end - start;

        if span <= f32::EPSILON {
            return if scroll < start {
                RangeStatus {
                    zone: Zone::Before,
                    progress: 0.0,
                }
            } else {
                RangeStatus {
                    zone: Zone::After,
                    progress: 1.0,
                }
            };
        }

        if scroll < start {
            RangeStatus {
                zone: Zone::Before,
                progress: 0.0,
            }
        } else if scroll > end {
            RangeStatus {
                zone: Zone::After,
                progress: 1.0,
            }
        } else {
            RangeStatus {
                zone: Zone::Inside,
                progress: (scroll - start) / span,
            }
        }
    }
}
