//! Timelines
//!
//! A [`Timeline`] positions tweens on a shared millisecond axis and owns a
//! playhead, a direction and a play state. The playhead is always clamped to
//! `[0, total_duration]`; out-of-range seeks clamp rather than error.
//!
//! State machine:
//!
//! ```text
//! Idle --play--> Playing --pause--> Paused --resume--> Playing
//! Playing --(forward end, no repeat)--> Completed
//! Completed --reverse--> Playing (backwards)
//! Playing --(reverse past 0)--> Idle
//! ```
//!
//! `Completed` is sticky for `play`, `pause` and `seek` (they no-op there);
//! `reverse` is the one way back out, which is what lets a scroll binding
//! play a reveal backwards when its element leaves the trigger range.

use slotmap::{new_key_type, SlotMap};

use vela_core::VisualState;

use crate::easing::Easing;
use crate::tween::{Property, Tween};

new_key_type! {
    /// Handle to a tween positioned on a timeline
    pub struct TimelineEntryId;
}

/// Playback direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

/// Timeline play state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayState {
    /// Not started, or rewound back past the start
    #[default]
    Idle,
    Playing,
    Paused,
    /// Ran forward to the end with no repeats left
    Completed,
}

/// Ordering function for staggered tween batches
///
/// The stagger slot of item `i` decides its delay multiple. Layout inference
/// is host business, so grid shapes are declared explicitly here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StaggerOrder {
    /// Delay follows the enumeration order the host supplied
    Index,
    /// Re-order a column-major enumeration into first-to-last, row-major
    /// traversal of a `rows` x `cols` grid
    RowMajor { rows: usize, cols: usize },
}

impl StaggerOrder {
    /// Map an item index to its stagger slot
    pub fn slot(&self, i: usize) -> usize {
        match self {
            StaggerOrder::Index => i,
            StaggerOrder::RowMajor { rows, cols } => {
                let rows = (*rows).max(1);
                let row = i % rows;
                let col = i / rows;
                row * cols + col
            }
        }
    }
}

struct TimelineEntry {
    offset_ms: f32,
    tween: Tween,
}

/// An ordered sequence of positioned tweens with an owned playhead
pub struct Timeline {
    entries: SlotMap<TimelineEntryId, TimelineEntry>,
    /// Insertion order; later entries win when two tweens drive one property
    order: Vec<TimelineEntryId>,
    playhead_ms: f32,
    direction: Direction,
    state: PlayState,
    /// Extra cycles after the first pass; -1 repeats forever
    repeat: i32,
    cycles_done: i32,
    /// Reverse direction at each cycle boundary instead of wrapping
    yoyo: bool,
    /// Playback rate multiplier
    rate: f32,
    /// Filled into tweens added without an explicit easing
    default_easing: Easing,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            order: Vec::new(),
            playhead_ms: 0.0,
            direction: Direction::Forward,
            state: PlayState::Idle,
            repeat: 0,
            cycles_done: 0,
            yoyo: false,
            rate: 1.0,
            default_easing: Easing::default(),
        }
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Position a tween at `offset_ms` from the timeline start
    ///
    /// A tween added without an explicit easing picks up the timeline's
    /// default easing.
    pub fn add(&mut self, offset_ms: f32, tween: Tween) -> TimelineEntryId {
        let id = self.entries.insert(TimelineEntry {
            offset_ms: offset_ms.max(0.0),
            tween: tween.or_easing(self.default_easing),
        });
        self.order.push(id);
        id
    }

    /// Position `count` copies of a tween where the copy in stagger slot `s`
    /// starts `s * stagger_ms` later than the first
    pub fn add_staggered(
        &mut self,
        offset_ms: f32,
        tween: Tween,
        count: usize,
        stagger_ms: f32,
        order: StaggerOrder,
    ) -> Vec<TimelineEntryId> {
        (0..count)
            .map(|i| {
                let slot = order.slot(i) as f32;
                self.add(offset_ms + slot * stagger_ms, tween)
            })
            .collect()
    }

    /// Easing for tweens added from here on without an explicit curve
    pub fn set_default_easing(&mut self, easing: Easing) {
        self.default_easing = easing;
    }

    /// Extra cycles after the first pass (-1 = repeat forever)
    pub fn set_repeat(&mut self, repeat: i32) {
        self.repeat = repeat;
    }

    /// Auto-reverse at each cycle boundary instead of wrapping to the start
    pub fn set_yoyo(&mut self, yoyo: bool) {
        self.yoyo = yoyo;
    }

    /// Playback rate multiplier (1.0 = real time)
    pub fn set_rate(&mut self, rate: f32) {
        if rate > 0.0 {
            self.rate = rate;
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn total_duration_ms(&self) -> f32 {
        self.entries
            .values()
            .map(|e| e.offset_ms + e.tween.end_ms())
            .fold(0.0, f32::max)
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entry_ids(&self) -> Vec<TimelineEntryId> {
        self.order.clone()
    }

    pub fn playhead_ms(&self) -> f32 {
        self.playhead_ms
    }

    /// Playhead position as a fraction of total duration
    pub fn progress(&self) -> f32 {
        let total = self.total_duration_ms();
        if total <= f32::EPSILON {
            1.0
        } else {
            (self.playhead_ms / total).clamp(0.0, 1.0)
        }
    }

    /// Sample one entry at the current playhead
    pub fn value(&self, id: TimelineEntryId) -> Option<f32> {
        self.entries
            .get(id)
            .map(|e| e.tween.sample(self.playhead_ms - e.offset_ms))
    }

    /// Fold every entry into the visual state at the current playhead
    ///
    /// Properties no tween drives hold their resting values; when several
    /// tweens drive the same property, the one added last wins.
    pub fn visual(&self) -> VisualState {
        let mut state = VisualState::resting();
        for id in &self.order {
            let Some(entry) = self.entries.get(*id) else {
                continue;
            };
            let value = entry.tween.sample(self.playhead_ms - entry.offset_ms);
            match entry.tween.property() {
                Property::Opacity => state.opacity = value,
                Property::X => state.x = value,
                Property::Y => state.y = value,
                Property::Scale => state.scale = value,
                Property::Rotation => state.rotation = value,
            }
        }
        state
    }

    // =========================================================================
    // Playback control
    // =========================================================================

    /// Start or resume forward playback; no-op once completed
    pub fn play(&mut self) {
        if self.state == PlayState::Completed {
            return;
        }
        self.direction = Direction::Forward;
        self.state = PlayState::Playing;
    }

    /// Play backwards from the current playhead
    ///
    /// This is the one control that revives a `Completed` timeline: the
    /// playhead sits at the end, so a reverse run has the full duration to
    /// cover. Reaching the start lands in `Idle`, ready to replay.
    pub fn reverse(&mut self) {
        self.direction = Direction::Reverse;
        self.state = PlayState::Playing;
    }

    /// Freeze the playhead; no-op unless playing
    pub fn pause(&mut self) {
        if self.state == PlayState::Playing {
            self.state = PlayState::Paused;
        }
    }

    /// Continue from a pause
    pub fn resume(&mut self) {
        if self.state == PlayState::Paused {
            self.state = PlayState::Playing;
        }
    }

    /// Place the playhead at a progress fraction, clamped to [0, 1]
    ///
    /// No-op once completed. Does not change the play state: a paused
    /// timeline stays paused, which is exactly what scroll scrubbing needs.
    pub fn seek(&mut self, progress: f32) {
        if self.state == PlayState::Completed {
            return;
        }
        self.playhead_ms = progress.clamp(0.0, 1.0) * self.total_duration_ms();
    }

    /// Rewind to the start and drop to `Idle`
    pub fn stop(&mut self) {
        self.playhead_ms = 0.0;
        self.direction = Direction::Forward;
        self.state = PlayState::Idle;
        self.cycles_done = 0;
    }

    /// Snap to the final frame and mark completed
    pub fn complete(&mut self) {
        self.playhead_ms = self.total_duration_ms();
        self.direction = Direction::Forward;
        self.state = PlayState::Completed;
    }

    fn cycles_remaining(&self) -> bool {
        self.repeat < 0 || self.cycles_done < self.repeat
    }

    /// Advance the playhead by elapsed time; a no-op unless playing
    pub fn tick(&mut self, dt_ms: f32) {
        if self.state != PlayState::Playing || dt_ms <= 0.0 {
            return;
        }

        let total = self.total_duration_ms();
        if total <= f32::EPSILON {
            // Nothing to animate; forward playback completes immediately
            self.state = match self.direction {
                Direction::Forward => PlayState::Completed,
                Direction::Reverse => PlayState::Idle,
            };
            return;
        }

        let step = dt_ms * self.rate;
        match self.direction {
            Direction::Forward => {
                self.playhead_ms += step;
                if self.playhead_ms >= total {
                    if self.cycles_remaining() {
                        self.cycles_done += 1;
                        let over = self.playhead_ms - total;
                        if self.yoyo {
                            self.direction = Direction::Reverse;
                            self.playhead_ms = (total - over).clamp(0.0, total);
                        } else {
                            self.playhead_ms = over.clamp(0.0, total);
                        }
                    } else {
                        self.playhead_ms = total;
                        self.state = PlayState::Completed;
                    }
                }
            }
            Direction::Reverse => {
                self.playhead_ms -= step;
                if self.playhead_ms <= 0.0 {
                    if self.yoyo && self.cycles_remaining() {
                        self.cycles_done += 1;
                        self.playhead_ms = (-self.playhead_ms).clamp(0.0, total);
                        self.direction = Direction::Forward;
                    } else {
                        self.playhead_ms = 0.0;
                        self.direction = Direction::Forward;
                        self.state = PlayState::Idle;
                    }
                }
            }
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;

    fn fade(duration_ms: f32) -> Tween {
        Tween::new(Property::Opacity, 0.0, 1.0, duration_ms).easing(Easing::Linear)
    }

    #[test]
    fn test_playhead_stays_clamped() {
        let mut tl = Timeline::new();
        tl.add(0.0, fade(1000.0));

        tl.seek(2.5);
        assert_eq!(tl.playhead_ms(), 1000.0);
        tl.seek(-1.0);
        assert_eq!(tl.playhead_ms(), 0.0);
    }

    #[test]
    fn test_seek_out_of_range_matches_clamped_seek() {
        let mut a = Timeline::new();
        a.add(0.0, fade(800.0));
        let mut b = Timeline::new();
        b.add(0.0, fade(800.0));

        a.seek(7.0);
        b.seek(1.0);
        assert_eq!(a.playhead_ms(), b.playhead_ms());
        assert_eq!(a.visual(), b.visual());
    }

    #[test]
    fn test_default_easing_fills_unset_tweens() {
        let mut tl = Timeline::new();
        tl.set_default_easing(Easing::Linear);
        let plain = tl.add(0.0, Tween::new(Property::Opacity, 0.0, 1.0, 200.0));
        let eased = tl.add(0.0, Tween::new(Property::X, 0.0, 100.0, 200.0).easing(Easing::EaseIn));

        tl.seek(0.5);
        // Unset tween follows the timeline default; explicit easing wins
        assert!((tl.value(plain).unwrap() - 0.5).abs() < 1e-4);
        assert!((tl.value(eased).unwrap() - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_forward_play_completes() {
        let mut tl = Timeline::new();
        tl.add(0.0, fade(1000.0));

        tl.play();
        assert_eq!(tl.state(), PlayState::Playing);

        tl.tick(500.0);
        assert!((tl.progress() - 0.5).abs() < 1e-4);

        tl.tick(600.0);
        assert_eq!(tl.state(), PlayState::Completed);
        assert_eq!(tl.progress(), 1.0);
    }

    #[test]
    fn test_completed_ignores_play_pause_seek() {
        let mut tl = Timeline::new();
        tl.add(0.0, fade(100.0));
        tl.play();
        tl.tick(200.0);
        assert_eq!(tl.state(), PlayState::Completed);

        tl.play();
        assert_eq!(tl.state(), PlayState::Completed);
        tl.pause();
        assert_eq!(tl.state(), PlayState::Completed);
        tl.seek(0.0);
        assert_eq!(tl.playhead_ms(), 100.0);
    }

    #[test]
    fn test_reverse_revives_completed() {
        let mut tl = Timeline::new();
        tl.add(0.0, fade(100.0));
        tl.play();
        tl.tick(200.0);
        assert_eq!(tl.state(), PlayState::Completed);

        tl.reverse();
        assert_eq!(tl.state(), PlayState::Playing);
        assert_eq!(tl.direction(), Direction::Reverse);

        tl.tick(200.0);
        assert_eq!(tl.state(), PlayState::Idle);
        assert_eq!(tl.playhead_ms(), 0.0);

        // Ready to replay forward
        tl.play();
        tl.tick(50.0);
        assert_eq!(tl.state(), PlayState::Playing);
    }

    #[test]
    fn test_repeat_wraps() {
        let mut tl = Timeline::new();
        tl.add(0.0, fade(100.0));
        tl.set_repeat(1);
        tl.play();

        tl.tick(150.0);
        // Wrapped into the second cycle
        assert_eq!(tl.state(), PlayState::Playing);
        assert!((tl.playhead_ms() - 50.0).abs() < 1e-4);

        tl.tick(100.0);
        assert_eq!(tl.state(), PlayState::Completed);
    }

    #[test]
    fn test_yoyo_reverses_at_boundary() {
        let mut tl = Timeline::new();
        tl.add(0.0, fade(100.0));
        tl.set_repeat(-1);
        tl.set_yoyo(true);
        tl.play();

        tl.tick(150.0);
        assert_eq!(tl.direction(), Direction::Reverse);
        assert!((tl.playhead_ms() - 50.0).abs() < 1e-4);

        tl.tick(100.0);
        assert_eq!(tl.direction(), Direction::Forward);
        assert_eq!(tl.state(), PlayState::Playing);
    }

    #[test]
    fn test_visual_folds_last_added_wins() {
        let mut tl = Timeline::new();
        tl.add(0.0, Tween::new(Property::Y, 50.0, 0.0, 100.0).easing(Easing::Linear));
        tl.add(
            0.0,
            Tween::new(Property::Opacity, 0.0, 1.0, 100.0).easing(Easing::Linear),
        );
        // Overrides the first Y tween
        tl.add(0.0, Tween::new(Property::Y, 20.0, 0.0, 100.0).easing(Easing::Linear));

        let v = tl.visual();
        assert_eq!(v.y, 20.0);
        assert_eq!(v.opacity, 0.0);
        // Untouched properties rest
        assert_eq!(v.scale, 1.0);
        assert_eq!(v.rotation, 0.0);
    }

    #[test]
    fn test_stagger_index_order() {
        let mut tl = Timeline::new();
        let ids = tl.add_staggered(0.0, fade(100.0), 3, 50.0, StaggerOrder::Index);
        assert_eq!(ids.len(), 3);
        // Item 2 hasn't started until 100ms in
        tl.seek(0.0);
        tl.playhead_ms = 60.0;
        assert!(tl.value(ids[0]).unwrap() > 0.0);
        assert!(tl.value(ids[1]).unwrap() > 0.0);
        assert_eq!(tl.value(ids[2]).unwrap(), 0.0);
        // Total spans the last item's end
        assert_eq!(tl.total_duration_ms(), 200.0);
    }

    #[test]
    fn test_stagger_row_major_grid() {
        // A 2x3 grid enumerated column-major: item order is
        // (r0,c0) (r1,c0) (r0,c1) (r1,c1) (r0,c2) (r1,c2).
        // Row-major slots: 0, 3, 1, 4, 2, 5.
        let order = StaggerOrder::RowMajor { rows: 2, cols: 3 };
        let slots: Vec<usize> = (0..6).map(|i| order.slot(i)).collect();
        assert_eq!(slots, vec![0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_empty_timeline_completes_immediately() {
        let mut tl = Timeline::new();
        tl.play();
        tl.tick(16.0);
        assert_eq!(tl.state(), PlayState::Completed);
        assert_eq!(tl.progress(), 1.0);
    }
}
