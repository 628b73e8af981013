//! Animation scheduler
//!
//! Owns every running timeline in a slotmap arena and advances them all with
//! one sampled dt per frame, so animations triggered in the same frame stay
//! visually synchronized. The host drives it: one `tick()` per display
//! refresh.
//!
//! Ownership follows handles, not closures:
//! - [`SchedulerHandle`] is a weak reference; every operation through it
//!   silently no-ops once the scheduler is gone.
//! - [`AnimatedTimeline`] owns one arena slot and releases it on `cancel()`
//!   or drop. Cancellation clears the slot, so nothing can mutate the
//!   timeline afterwards even if frames keep ticking.
//! - [`TickRegistration`] owns one per-frame callback the same way; the
//!   pointer follower and particle field hook into the frame loop through it
//!   and self-cancel on drop.

use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex, Weak};
use std::time::Instant;

use vela_core::VisualState;

use crate::timeline::{PlayState, Timeline};

new_key_type! {
    /// Handle to a registered timeline
    pub struct TimelineId;
    /// Handle to a registered per-frame callback
    pub struct TickCallbackId;
}

/// A per-frame callback, invoked with the frame's dt in milliseconds
///
/// Callbacks must not call back into the scheduler or drop a
/// [`TickRegistration`]; they run with the callback registry locked.
pub type TickCallback = Box<dyn FnMut(f32) + Send>;

struct SchedulerInner {
    timelines: SlotMap<TimelineId, Timeline>,
    last_frame: Instant,
}

/// The frame-driven animation scheduler
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    callbacks: Arc<Mutex<SlotMap<TickCallbackId, TickCallback>>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                timelines: SlotMap::with_key(),
                last_frame: Instant::now(),
            })),
            callbacks: Arc::new(Mutex::new(SlotMap::with_key())),
        }
    }

    /// Get a weak handle for components that register animations
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
            callbacks: Arc::downgrade(&self.callbacks),
        }
    }

    /// Advance using wall-clock elapsed time since the previous frame
    ///
    /// Returns true while anything is still animating.
    pub fn tick(&self) -> bool {
        let dt_ms = {
            let mut inner = self.inner.lock().unwrap();
            let now = Instant::now();
            let dt = (now - inner.last_frame).as_secs_f32() * 1000.0;
            inner.last_frame = now;
            dt
        };
        self.advance(dt_ms)
    }

    /// Advance by an explicit dt in milliseconds
    ///
    /// Every active timeline sees the same dt, then every tick callback runs
    /// with it. Deterministic; tests drive this directly.
    pub fn advance(&self, dt_ms: f32) -> bool {
        let active = {
            let mut inner = self.inner.lock().unwrap();
            for (_, timeline) in inner.timelines.iter_mut() {
                timeline.tick(dt_ms);
            }
            // Slots are only released by their owners (cancel/drop), never
            // here: a completed timeline must stay queryable and reversible.
            inner
                .timelines
                .iter()
                .any(|(_, t)| t.is_playing())
        };

        let mut callbacks = self.callbacks.lock().unwrap();
        for (_, callback) in callbacks.iter_mut() {
            callback(dt_ms);
        }

        active || !callbacks.is_empty()
    }

    /// Number of registered timelines
    pub fn timeline_count(&self) -> usize {
        self.inner.lock().unwrap().timelines.len()
    }

    /// Number of registered tick callbacks
    pub fn callback_count(&self) -> usize {
        self.callbacks.lock().unwrap().len()
    }

    /// Anything still playing
    pub fn has_active_animations(&self) -> bool {
        self.inner
            .lock()
            .unwrap()
            .timelines
            .iter()
            .any(|(_, t)| t.is_playing())
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the scheduler
///
/// Won't keep the scheduler alive; all operations no-op after it drops.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
    callbacks: Weak<Mutex<SlotMap<TickCallbackId, TickCallback>>>,
}

impl SchedulerHandle {
    /// Register a timeline and return its arena id
    pub fn register_timeline(&self, timeline: Timeline) -> Option<TimelineId> {
        self.inner.upgrade().map(|inner| {
            let mut guard = inner.lock().unwrap();
            // Reset the frame clock so a timeline created after an idle
            // period doesn't swallow a huge first dt
            guard.last_frame = Instant::now();
            guard.timelines.insert(timeline)
        })
    }

    /// Release a timeline's slot; safe on an already-released id
    pub fn remove_timeline(&self, id: TimelineId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().timelines.remove(id);
        }
    }

    /// Run a closure against a registered timeline
    ///
    /// Returns `None` if the scheduler is gone or the slot was released.
    pub fn with_timeline<F, R>(&self, id: TimelineId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Timeline) -> R,
    {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().timelines.get_mut(id).map(f))
    }

    /// Register a per-frame callback
    pub fn add_tick_callback(&self, callback: TickCallback) -> Option<TickCallbackId> {
        self.callbacks
            .upgrade()
            .map(|callbacks| callbacks.lock().unwrap().insert(callback))
    }

    /// Remove a per-frame callback; safe on an already-removed id
    pub fn remove_tick_callback(&self, id: TickCallbackId) {
        if let Some(callbacks) = self.callbacks.upgrade() {
            callbacks.lock().unwrap().remove(id);
        }
    }

    /// Register a callback wrapped in an owning registration
    pub fn tick_registration<F>(&self, callback: F) -> TickRegistration
    where
        F: FnMut(f32) + Send + 'static,
    {
        TickRegistration {
            handle: self.clone(),
            id: self.add_tick_callback(Box::new(callback)),
        }
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

/// Owning wrapper for a per-frame callback
///
/// The component that starts a frame loop owns its registration; dropping it
/// removes the callback, so no tick can fire after teardown.
pub struct TickRegistration {
    handle: SchedulerHandle,
    id: Option<TickCallbackId>,
}

impl TickRegistration {
    /// Remove the callback now; idempotent
    pub fn cancel(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.remove_tick_callback(id);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.id.is_none()
    }
}

impl Drop for TickRegistration {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// An owning wrapper around one registered timeline
///
/// Registers on creation and releases its arena slot on [`cancel`] or drop.
/// All control operations degrade to no-ops once the slot is gone.
///
/// [`cancel`]: AnimatedTimeline::cancel
pub struct AnimatedTimeline {
    handle: SchedulerHandle,
    id: Option<TimelineId>,
}

impl AnimatedTimeline {
    /// Register an empty timeline
    pub fn new(handle: SchedulerHandle) -> Self {
        Self::from_timeline(handle, Timeline::new())
    }

    /// Register a pre-built timeline
    pub fn from_timeline(handle: SchedulerHandle, timeline: Timeline) -> Self {
        let id = handle.register_timeline(timeline);
        Self { handle, id }
    }

    /// Run a closure against the underlying timeline (adding tweens,
    /// configuring repeat, querying)
    pub fn with<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Timeline) -> R,
    {
        self.id.and_then(|id| self.handle.with_timeline(id, f))
    }

    pub fn play(&self) {
        self.with(|t| t.play());
    }

    pub fn reverse(&self) {
        self.with(|t| t.reverse());
    }

    pub fn pause(&self) {
        self.with(|t| t.pause());
    }

    pub fn resume(&self) {
        self.with(|t| t.resume());
    }

    /// Seek to a progress fraction; out-of-range values clamp
    pub fn seek(&self, progress: f32) {
        self.with(|t| t.seek(progress));
    }

    pub fn is_playing(&self) -> bool {
        self.with(|t| t.is_playing()).unwrap_or(false)
    }

    pub fn state(&self) -> Option<PlayState> {
        self.with(|t| t.state())
    }

    pub fn progress(&self) -> f32 {
        self.with(|t| t.progress()).unwrap_or(0.0)
    }

    /// The folded visual state at the current playhead
    pub fn visual(&self) -> Option<VisualState> {
        self.with(|t| t.visual())
    }

    /// Halt and release the arena slot
    ///
    /// Idempotent: the second and later calls find the slot already gone and
    /// do nothing. After cancellation no scheduler tick can touch this
    /// timeline.
    pub fn cancel(&mut self) {
        if let Some(id) = self.id.take() {
            tracing::trace!(?id, "timeline cancelled");
            self.handle.remove_timeline(id);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.id.is_none()
    }
}

impl Drop for AnimatedTimeline {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::tween::{Property, Tween};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fade_timeline(duration_ms: f32) -> Timeline {
        let mut tl = Timeline::new();
        tl.add(
            0.0,
            Tween::new(Property::Opacity, 0.0, 1.0, duration_ms).easing(Easing::Linear),
        );
        tl
    }

    #[test]
    fn test_advance_drives_registered_timelines() {
        let scheduler = AnimationScheduler::new();
        let anim = AnimatedTimeline::from_timeline(scheduler.handle(), fade_timeline(1000.0));
        anim.play();

        assert!(scheduler.advance(250.0));
        assert!((anim.progress() - 0.25).abs() < 1e-4);

        scheduler.advance(1000.0);
        assert_eq!(anim.state(), Some(PlayState::Completed));
        assert!(!scheduler.has_active_animations());
    }

    #[test]
    fn test_shared_dt_keeps_timelines_in_sync() {
        let scheduler = AnimationScheduler::new();
        let a = AnimatedTimeline::from_timeline(scheduler.handle(), fade_timeline(800.0));
        let b = AnimatedTimeline::from_timeline(scheduler.handle(), fade_timeline(800.0));
        a.play();
        b.play();

        for _ in 0..10 {
            scheduler.advance(16.0);
            assert_eq!(a.progress(), b.progress());
        }
    }

    #[test]
    fn test_double_cancel_is_idempotent() {
        let scheduler = AnimationScheduler::new();
        let mut anim = AnimatedTimeline::from_timeline(scheduler.handle(), fade_timeline(500.0));
        anim.play();
        scheduler.advance(100.0);

        anim.cancel();
        anim.cancel();
        assert!(anim.is_cancelled());
        assert_eq!(scheduler.timeline_count(), 0);

        // Frames keep ticking; nothing observable mutates
        assert_eq!(anim.visual(), None);
        scheduler.advance(100.0);
        assert_eq!(anim.progress(), 0.0);
        assert_eq!(anim.state(), None);
    }

    #[test]
    fn test_drop_releases_slot() {
        let scheduler = AnimationScheduler::new();
        {
            let anim = AnimatedTimeline::from_timeline(scheduler.handle(), fade_timeline(500.0));
            anim.play();
            assert_eq!(scheduler.timeline_count(), 1);
        }
        assert_eq!(scheduler.timeline_count(), 0);
    }

    #[test]
    fn test_handle_outlives_scheduler_safely() {
        let handle = {
            let scheduler = AnimationScheduler::new();
            scheduler.handle()
        };
        assert!(!handle.is_alive());
        assert!(handle.register_timeline(Timeline::new()).is_none());

        // Wrapper built from a dead handle no-ops everywhere
        let mut anim = AnimatedTimeline::new(handle);
        anim.play();
        anim.seek(0.5);
        assert_eq!(anim.visual(), None);
        anim.cancel();
    }

    #[test]
    fn test_tick_registration_self_cancels_on_drop() {
        let scheduler = AnimationScheduler::new();
        let counter = Arc::new(AtomicU32::new(0));

        {
            let n = Arc::clone(&counter);
            let _reg = scheduler
                .handle()
                .tick_registration(move |_dt| {
                    n.fetch_add(1, Ordering::Relaxed);
                });
            scheduler.advance(16.0);
            scheduler.advance(16.0);
            assert_eq!(counter.load(Ordering::Relaxed), 2);
        }

        // Registration dropped: later frames must not fire the callback
        scheduler.advance(16.0);
        assert_eq!(counter.load(Ordering::Relaxed), 2);
        assert_eq!(scheduler.callback_count(), 0);
    }

    #[test]
    fn test_explicit_cancel_stops_callback() {
        let scheduler = AnimationScheduler::new();
        let counter = Arc::new(AtomicU32::new(0));

        let n = Arc::clone(&counter);
        let mut reg = scheduler.handle().tick_registration(move |_dt| {
            n.fetch_add(1, Ordering::Relaxed);
        });

        scheduler.advance(16.0);
        reg.cancel();
        reg.cancel();
        assert!(reg.is_cancelled());

        scheduler.advance(16.0);
        assert_eq!(counter.load(Ordering::Relaxed), 1);
    }
}
