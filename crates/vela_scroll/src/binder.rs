//! Scroll-linked timeline bindings
//!
//! The binder owns one timeline per bound element and drives it from scroll
//! position. The host forwards viewport samples with [`ScrollBinder::set_viewport`]
//! and calls [`ScrollBinder::evaluate`] once per frame; evaluation is batched
//! behind a dirty flag so a burst of scroll events costs one pass.
//!
//! Three replay rules cover the reveal patterns:
//!
//! - [`Replay::Once`]: play the first time the element enters its window,
//!   then never again
//! - [`Replay::Toggle`]: play on entry, reverse back out when the element
//!   scrolls above its window again
//! - [`Replay::Scrub`]: the playhead mirrors window progress directly; the
//!   timeline never free-runs

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use vela_animation::scheduler::{AnimatedTimeline, SchedulerHandle};
use vela_animation::{PlayState, Timeline};
use vela_core::{motion_policy, ElementBounds, ElementKey, MotionPolicy, Viewport, VisualState};

use crate::error::Result;
use crate::observer::{ViewportObserver, Zone};
use crate::range::RangeSpec;

new_key_type! {
    /// Arena key for a scroll binding
    pub struct BindingId;
}

/// How a binding replays as the element crosses its trigger window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Replay {
    /// Play on first entry, then stay played
    Once,
    /// Play on entry, reverse when scrolling back above the window
    Toggle,
    /// Map window progress directly onto the playhead
    Scrub,
}

/// Opaque handle to a registered binding
///
/// Returned by [`ScrollBinder::bind`]; pass it back to query the element's
/// visual state or to unbind. Handles for removed bindings are harmless,
/// every operation on them is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BindingHandle(BindingId);

struct Binding {
    element: Box<dyn ElementBounds>,
    timeline: AnimatedTimeline,
    range: RangeSpec,
    replay: Replay,
    /// Last zone seen by `evaluate`, for edge detection
    zone: Zone,
    played_once: bool,
    /// Reduced motion: the timeline was snapped to its end at bind time and
    /// replay rules never touch it
    inert: bool,
}

/// Ties timelines to scroll position
///
/// Owns every binding's timeline; dropping the binder (or unbinding) cancels
/// them through [`AnimatedTimeline`]'s drop path, so no scheduler slot leaks.
pub struct ScrollBinder {
    scheduler: SchedulerHandle,
    bindings: SlotMap<BindingId, Binding>,
    by_element: FxHashMap<ElementKey, BindingId>,
    observer: ViewportObserver,
    dirty: bool,
    policy: MotionPolicy,
}

impl ScrollBinder {
    /// Create a binder under the process-wide motion policy
    pub fn new(scheduler: SchedulerHandle) -> Self {
        Self::with_policy(scheduler, motion_policy())
    }

    /// Create a binder with an explicit policy (tests, previews)
    pub fn with_policy(scheduler: SchedulerHandle, policy: MotionPolicy) -> Self {
        Self {
            scheduler,
            bindings: SlotMap::with_key(),
            by_element: FxHashMap::default(),
            observer: ViewportObserver::default(),
            dirty: false,
            policy,
        }
    }

    /// Bind an element to a timeline built by `build`
    ///
    /// Validates the range, registers the timeline with the scheduler and
    /// arms the replay rule. Binding a key that is already bound replaces the
    /// old binding, its timeline is cancelled.
    ///
    /// Under reduced motion the timeline is snapped to its final state
    /// immediately and never plays; `visual` reports the end state from the
    /// first frame on.
    pub fn bind<F>(
        &mut self,
        element: Box<dyn ElementBounds>,
        range: RangeSpec,
        replay: Replay,
        build: F,
    ) -> Result<BindingHandle>
    where
        F: FnOnce(&mut Timeline),
    {
        range.validate()?;

        let key = element.key();
        if let Some(old) = self.by_element.remove(&key) {
            tracing::debug!(?key, "rebinding element, replacing old binding");
            self.bindings.remove(old);
        }

        let mut timeline = Timeline::new();
        build(&mut timeline);

        let inert = self.policy.is_reduced();
        if inert {
            timeline.complete();
        }

        let animated = AnimatedTimeline::from_timeline(self.scheduler.clone(), timeline);
        if !inert && replay == Replay::Scrub {
            // Park the playhead: scrubbing drives it by seeking, the clock
            // must never advance it
            animated.play();
            animated.pause();
            animated.seek(0.0);
        }

        let id = self.bindings.insert(Binding {
            element,
            timeline: animated,
            range,
            replay,
            zone: Zone::Before,
            played_once: false,
            inert,
        });
        self.by_element.insert(key, id);
        self.dirty = true;

        tracing::debug!(?key, ?replay, "element bound");
        Ok(BindingHandle(id))
    }

    /// Record the latest scroll/resize sample and schedule an evaluation
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.observer.set_viewport(viewport);
        self.dirty = true;
    }

    /// Force the next `evaluate` to run even without a viewport change
    /// (layout shifted under a fixed scroll position)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Apply replay rules against the current viewport
    ///
    /// Call once per frame. Does nothing unless a viewport change or rebind
    /// marked the binder dirty. Elements whose bounds source reports `None`
    /// are skipped without state changes.
    pub fn evaluate(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        for (_, binding) in self.bindings.iter_mut() {
            if binding.inert {
                continue;
            }
            let Some(rect) = binding.element.bounds() else {
                continue;
            };
            let status = self.observer.status(&binding.range, rect);
            let prev = binding.zone;
            binding.zone = status.zone;

            match binding.replay {
                Replay::Once => {
                    if prev == Zone::Before && status.zone != Zone::Before && !binding.played_once {
                        binding.played_once = true;
                        binding.timeline.play();
                        tracing::debug!(key = ?binding.element.key(), "once binding played");
                    }
                }
                Replay::Toggle => {
                    if prev == Zone::Before && status.zone != Zone::Before {
                        binding.timeline.play();
                        tracing::debug!(key = ?binding.element.key(), "toggle binding played");
                    } else if prev != Zone::Before && status.zone == Zone::Before {
                        binding.timeline.reverse();
                        tracing::debug!(key = ?binding.element.key(), "toggle binding reversed");
                    }
                }
                Replay::Scrub => {
                    binding.timeline.seek(status.progress);
                }
            }
        }
    }

    /// Folded visual state for a binding, `None` if it was unbound
    pub fn visual(&self, handle: BindingHandle) -> Option<VisualState> {
        self.bindings.get(handle.0).and_then(|b| b.timeline.visual())
    }

    /// Play state of a binding's timeline, `None` if it was unbound
    pub fn state(&self, handle: BindingHandle) -> Option<PlayState> {
        self.bindings.get(handle.0).and_then(|b| b.timeline.state())
    }

    /// Timeline progress for a binding, 0.0 if it was unbound
    pub fn progress(&self, handle: BindingHandle) -> f32 {
        self.bindings
            .get(handle.0)
            .map(|b| b.timeline.progress())
            .unwrap_or(0.0)
    }

    /// Remove a binding and cancel its timeline
    ///
    /// Idempotent: unbinding an already-removed handle does nothing.
    pub fn unbind(&mut self, handle: BindingHandle) {
        if let Some(binding) = self.bindings.remove(handle.0) {
            self.by_element.remove(&binding.element.key());
            tracing::debug!(key = ?binding.element.key(), "element unbound");
            // binding.timeline drops here, cancelling its scheduler slot
        }
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }
}
