//! Reveal presets
//!
//! The small animation vocabulary the sections share: fade in, fade up,
//! scale in, slide in from a side. Presets are just tween recipes with the
//! house durations and easings; sections apply them to a timeline, usually
//! staggered across child items.

use smallvec::SmallVec;

use crate::easing::Easing;
use crate::timeline::{StaggerOrder, Timeline, TimelineEntryId};
use crate::tween::{Property, Tween};

/// House durations, in milliseconds
pub mod durations {
    pub const FAST: f32 = 300.0;
    pub const MEDIUM: f32 = 600.0;
    pub const SLOW: f32 = 1200.0;
    pub const VERY_SLOW: f32 = 2000.0;
}

/// House stagger offsets, in milliseconds
pub mod staggers {
    pub const TIGHT: f32 = 50.0;
    pub const NORMAL: f32 = 100.0;
    pub const RELAXED: f32 = 200.0;
    pub const LOOSE: f32 = 300.0;
}

/// Horizontal entry side for slide reveals
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A named reveal recipe
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RevealPreset {
    /// Opacity 0 -> 1
    FadeIn,
    /// Opacity 0 -> 1 while rising 50px into place
    FadeUp,
    /// Opacity 0 -> 1 while scaling 0.8 -> 1 with a back-out pop
    ScaleIn,
    /// Opacity 0 -> 1 while sliding 100px in from a side
    SlideIn(Side),
}

impl RevealPreset {
    /// The tweens this preset is made of, at the given duration
    pub fn tweens(&self, duration_ms: f32) -> SmallVec<[Tween; 2]> {
        let fade = Tween::new(Property::Opacity, 0.0, 1.0, duration_ms).easing(Easing::EaseOut);
        match self {
            RevealPreset::FadeIn => SmallVec::from_slice(&[fade]),
            RevealPreset::FadeUp => SmallVec::from_slice(&[
                fade,
                Tween::new(Property::Y, 50.0, 0.0, duration_ms).easing(Easing::EaseOut),
            ]),
            RevealPreset::ScaleIn => SmallVec::from_slice(&[
                fade,
                Tween::new(Property::Scale, 0.8, 1.0, duration_ms).easing(Easing::back_out()),
            ]),
            RevealPreset::SlideIn(side) => {
                let from_x = match side {
                    Side::Left => -100.0,
                    Side::Right => 100.0,
                };
                SmallVec::from_slice(&[
                    fade,
                    Tween::new(Property::X, from_x, 0.0, duration_ms).easing(Easing::EaseOut),
                ])
            }
        }
    }

    /// Apply at the timeline start with the medium house duration
    pub fn apply(&self, timeline: &mut Timeline) -> SmallVec<[TimelineEntryId; 2]> {
        self.apply_at(timeline, 0.0, durations::MEDIUM)
    }

    /// Apply at an offset with an explicit duration
    pub fn apply_at(
        &self,
        timeline: &mut Timeline,
        offset_ms: f32,
        duration_ms: f32,
    ) -> SmallVec<[TimelineEntryId; 2]> {
        self.tweens(duration_ms)
            .into_iter()
            .map(|tween| timeline.add(offset_ms, tween))
            .collect()
    }

    /// Apply one copy per item, staggered
    ///
    /// Every copy shares the preset's tweens; copy `i` starts at
    /// `order.slot(i) * stagger_ms`.
    pub fn apply_staggered(
        &self,
        timeline: &mut Timeline,
        count: usize,
        stagger_ms: f32,
        order: StaggerOrder,
    ) -> Vec<TimelineEntryId> {
        let mut ids = Vec::with_capacity(count * 2);
        for tween in self.tweens(durations::MEDIUM) {
            ids.extend(timeline.add_staggered(0.0, tween, count, stagger_ms, order));
        }
        ids
    }
}
