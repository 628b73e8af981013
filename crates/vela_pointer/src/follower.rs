//! Pointer tracking and trailing followers
//!
//! The host's input path pushes raw samples into a [`PointerTracker`], the
//! single writer. One or more [`Follower`]s chase the tracked position with
//! per-frame exponential smoothing; stacking followers with different
//! smoothing factors produces the layered trail of a custom cursor (tight
//! dot, lagging ring).

use std::sync::{Arc, Mutex};

use smallvec::SmallVec;

use vela_animation::scheduler::{SchedulerHandle, TickRegistration};
use vela_core::{motion_policy, MotionPolicy, Vec2};

/// One raw pointer event
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub timestamp_ms: f64,
}

impl PointerSample {
    pub const fn new(x: f32, y: f32, timestamp_ms: f64) -> Self {
        Self { x, y, timestamp_ms }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Default)]
struct TrackerInner {
    current: Option<PointerSample>,
    previous: Option<PointerSample>,
}

/// Single-writer cell for the latest pointer position
///
/// Keeps exactly one sample of history, enough to derive velocity. Clones
/// share the same cell; the host input path should be the only caller of
/// [`push_sample`](PointerTracker::push_sample).
#[derive(Clone, Default)]
pub struct PointerTracker {
    inner: Arc<Mutex<TrackerInner>>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new sample, shifting the old one into history
    pub fn push_sample(&self, sample: PointerSample) {
        let mut inner = self.inner.lock().unwrap();
        inner.previous = inner.current;
        inner.current = Some(sample);
    }

    /// Latest pointer position, `None` before the first sample
    pub fn position(&self) -> Option<Vec2> {
        self.inner.lock().unwrap().current.map(|s| s.position())
    }

    /// Instantaneous velocity in px/s from the last two samples
    ///
    /// Zero until two samples exist or when they share a timestamp.
    pub fn velocity(&self) -> Vec2 {
        let inner = self.inner.lock().unwrap();
        match (inner.previous, inner.current) {
            (Some(prev), Some(cur)) => {
                let dt_s = ((cur.timestamp_ms - prev.timestamp_ms) / 1000.0) as f32;
                if dt_s <= 0.0 {
                    Vec2::ZERO
                } else {
                    (cur.position() - prev.position()) * (1.0 / dt_s)
                }
            }
            _ => Vec2::ZERO,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity().length()
    }
}

/// Stretch factor for a speed-scaled trail layer
///
/// 1.0 at rest, growing with pointer speed and capped at 1.5x so fast
/// flicks don't smear the trail into a streak.
pub fn speed_stretch(speed: f32) -> f32 {
    1.0 + (speed / 3000.0).min(0.5)
}

/// One exponentially smoothed point
///
/// Per frame the position closes a fixed fraction `k` of its distance to the
/// target, so the remaining gap shrinks geometrically with ratio `1 - k`.
#[derive(Clone, Copy, Debug)]
pub struct Follower {
    position: Vec2,
    k: f32,
}

impl Follower {
    /// `k` is clamped into (0, 1]; 1 means no lag at all
    pub fn new(k: f32, initial: Vec2) -> Self {
        Self {
            position: initial,
            k: k.clamp(f32::EPSILON, 1.0),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn k(&self) -> f32 {
        self.k
    }

    /// One frame of smoothing toward `target`
    pub fn step(&mut self, target: Vec2) {
        self.position += (target - self.position) * self.k;
    }

    pub fn snap_to(&mut self, target: Vec2) {
        self.position = target;
    }
}

type FollowerCell = Arc<Mutex<SmallVec<[Follower; 4]>>>;

/// A layered set of followers chasing one tracker
///
/// Owns its per-frame loop: [`attach`](FollowerStack::attach) registers a
/// scheduler tick callback, and dropping the stack (or the registration)
/// removes it, so no follower update can fire after teardown.
///
/// Under [`MotionPolicy::Reduced`] every follower snaps straight to the
/// pointer each frame instead of trailing it.
pub struct FollowerStack {
    tracker: PointerTracker,
    followers: FollowerCell,
    registration: Option<TickRegistration>,
    policy: MotionPolicy,
}

impl FollowerStack {
    /// Create a stack under the process-wide motion policy
    pub fn new(tracker: PointerTracker) -> Self {
        Self::with_policy(tracker, motion_policy())
    }

    /// Create a stack with an explicit policy (tests, previews)
    pub fn with_policy(tracker: PointerTracker, policy: MotionPolicy) -> Self {
        Self {
            tracker,
            followers: Arc::new(Mutex::new(SmallVec::new())),
            registration: None,
            policy,
        }
    }

    /// The house cursor: a tight dot and a lagging ring
    pub fn cursor(tracker: PointerTracker) -> Self {
        let mut stack = Self::new(tracker);
        stack.add_follower(0.35);
        stack.add_follower(0.12);
        stack
    }

    /// Add a follower layer; returns its index for position reads
    pub fn add_follower(&mut self, k: f32) -> usize {
        let mut followers = self.followers.lock().unwrap();
        let initial = self.tracker.position().unwrap_or(Vec2::ZERO);
        followers.push(Follower::new(k, initial));
        followers.len() - 1
    }

    pub fn follower_count(&self) -> usize {
        self.followers.lock().unwrap().len()
    }

    /// Current position of follower `index`, `None` if out of range
    pub fn position(&self, index: usize) -> Option<Vec2> {
        self.followers.lock().unwrap().get(index).map(|f| f.position())
    }

    /// Advance every follower one frame toward the tracked pointer
    ///
    /// Hosts driving their own frame loop call this directly; otherwise use
    /// [`attach`](FollowerStack::attach).
    pub fn step_frame(&self) {
        Self::step_cell(&self.tracker, &self.followers, self.policy);
    }

    fn step_cell(tracker: &PointerTracker, followers: &FollowerCell, policy: MotionPolicy) {
        let Some(target) = tracker.position() else {
            return;
        };
        let mut followers = followers.lock().unwrap();
        for follower in followers.iter_mut() {
            if policy.is_reduced() {
                follower.snap_to(target);
            } else {
                follower.step(target);
            }
        }
    }

    /// Register the per-frame loop with a scheduler
    ///
    /// Replaces any previous registration. The loop stops when this stack
    /// drops or [`detach`](FollowerStack::detach) is called.
    pub fn attach(&mut self, scheduler: &SchedulerHandle) {
        let tracker = self.tracker.clone();
        let followers = self.followers.clone();
        let policy = self.policy;
        self.registration = Some(scheduler.tick_registration(move |_dt_ms| {
            Self::step_cell(&tracker, &followers, policy);
        }));
        tracing::debug!(layers = self.follower_count(), "follower loop attached");
    }

    /// Stop the per-frame loop; idempotent
    pub fn detach(&mut self) {
        if let Some(mut registration) = self.registration.take() {
            registration.cancel();
            tracing::debug!("follower loop detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.registration.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_animation::scheduler::AnimationScheduler;

    fn sample(x: f32, y: f32, t_ms: f64) -> PointerSample {
        PointerSample::new(x, y, t_ms)
    }

    #[test]
    fn test_velocity_from_sample_pair() {
        let tracker = PointerTracker::new();
        tracker.push_sample(sample(0.0, 0.0, 0.0));
        tracker.push_sample(sample(30.0, 40.0, 100.0));

        let v = tracker.velocity();
        assert!((v.x - 300.0).abs() < 1e-3);
        assert!((v.y - 400.0).abs() < 1e-3);
        assert!((tracker.speed() - 500.0).abs() < 1e-2);
    }

    #[test]
    fn test_velocity_needs_two_samples() {
        let tracker = PointerTracker::new();
        assert_eq!(tracker.velocity(), Vec2::ZERO);
        tracker.push_sample(sample(10.0, 10.0, 0.0));
        assert_eq!(tracker.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_follower_converges_geometrically() {
        // k = 0.3: the gap shrinks by 0.7 per frame, until the per-frame
        // increment falls below f32 resolution at the target's magnitude and
        // the position stalls a few micro-pixels short
        let target = Vec2::new(100.0, 50.0);
        let mut follower = Follower::new(0.3, Vec2::ZERO);
        let eps = 1e-3;

        let mut prev_gap = (target - follower.position()).length();
        for _ in 0..60 {
            follower.step(target);
            let gap = (target - follower.position()).length();
            if prev_gap > eps {
                assert!(gap <= prev_gap * 0.7 + 1e-6);
            }
            prev_gap = gap;
        }
        assert!((target - follower.position()).length() < eps);
    }

    #[test]
    fn test_layered_followers_trail_at_different_rates() {
        let tracker = PointerTracker::new();
        tracker.push_sample(sample(100.0, 0.0, 0.0));
        let mut stack = FollowerStack::with_policy(tracker.clone(), MotionPolicy::Full);
        // Followers start at the current pointer position
        tracker.push_sample(sample(200.0, 0.0, 16.0));
        let dot = stack.add_follower(0.35);
        let ring = stack.add_follower(0.12);
        // Jump the pointer and run a few frames
        tracker.push_sample(sample(300.0, 0.0, 32.0));
        for _ in 0..5 {
            stack.step_frame();
        }

        let dot_gap = 300.0 - stack.position(dot).unwrap().x;
        let ring_gap = 300.0 - stack.position(ring).unwrap().x;
        assert!(dot_gap < ring_gap);
        assert!(ring_gap > 0.0);
    }

    #[test]
    fn test_reduced_motion_snaps_followers() {
        let tracker = PointerTracker::new();
        let mut stack = FollowerStack::with_policy(tracker.clone(), MotionPolicy::Reduced);
        stack.add_follower(0.1);

        tracker.push_sample(sample(500.0, 250.0, 0.0));
        stack.step_frame();
        assert_eq!(stack.position(0).unwrap(), Vec2::new(500.0, 250.0));
    }

    #[test]
    fn test_attached_loop_steps_on_scheduler_tick() {
        let scheduler = AnimationScheduler::new();
        let tracker = PointerTracker::new();
        tracker.push_sample(sample(0.0, 0.0, 0.0));
        let mut stack = FollowerStack::with_policy(tracker.clone(), MotionPolicy::Full);
        stack.add_follower(0.5);
        stack.attach(&scheduler.handle());

        tracker.push_sample(sample(100.0, 0.0, 16.0));
        scheduler.advance(16.0);
        assert!((stack.position(0).unwrap().x - 50.0).abs() < 1e-4);

        // Dropping the stack removes the callback
        drop(stack);
        assert_eq!(scheduler.callback_count(), 0);
    }

    #[test]
    fn test_detach_is_idempotent() {
        let scheduler = AnimationScheduler::new();
        let tracker = PointerTracker::new();
        let mut stack = FollowerStack::with_policy(tracker, MotionPolicy::Full);
        stack.attach(&scheduler.handle());
        assert_eq!(scheduler.callback_count(), 1);

        stack.detach();
        stack.detach();
        assert_eq!(scheduler.callback_count(), 0);
        assert!(!stack.is_attached());
    }

    #[test]
    fn test_speed_stretch_is_capped() {
        assert!((speed_stretch(0.0) - 1.0).abs() < 1e-6);
        assert!(speed_stretch(1500.0) > 1.0);
        assert!((speed_stretch(100_000.0) - 1.5).abs() < 1e-6);
    }
}
