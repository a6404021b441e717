//! Wall-clock time of day.
//!
//! The forest follows the player's local hour, bucketed into four categories.
//! The hour is polled on a coarse repeating timer rather than pushed: the
//! buckets are hour-aligned, so sampling more often than once a minute is
//! wasted work. Consumers either read [`TimeOfDay`] (and use Bevy change
//! detection) or listen for [`TimeOfDayChanged`].

use std::fmt;
use std::time::Duration;

use bevy::prelude::*;
use chrono::{Local, Timelike};
use serde::{Deserialize, Serialize};

use crate::config::CLOCK_POLL_SECS;

// =============================================================================
// Category
// =============================================================================

/// One of the four day phases. Together they partition the 24-hour day.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeCategory {
    /// 05:00 - 10:59
    Morning,
    /// 11:00 - 16:59
    #[default]
    Day,
    /// 17:00 - 19:59
    Evening,
    /// 20:00 - 04:59
    Night,
}

impl TimeCategory {
    pub const ALL: [TimeCategory; 4] = [
        TimeCategory::Morning,
        TimeCategory::Day,
        TimeCategory::Evening,
        TimeCategory::Night,
    ];

    /// Map a wall-clock hour to its category. Hours past 23 wrap.
    pub fn from_hour(hour: u32) -> Self {
        match hour % 24 {
            5..=10 => TimeCategory::Morning,
            11..=16 => TimeCategory::Day,
            17..=19 => TimeCategory::Evening,
            _ => TimeCategory::Night,
        }
    }

    /// Upper-case name, as used in the conversation context tag.
    pub fn label(self) -> &'static str {
        match self {
            TimeCategory::Morning => "MORNING",
            TimeCategory::Day => "DAY",
            TimeCategory::Evening => "EVENING",
            TimeCategory::Night => "NIGHT",
        }
    }
}

impl fmt::Display for TimeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category for the current local wall-clock hour.
pub fn category_now() -> TimeCategory {
    TimeCategory::from_hour(Local::now().hour())
}

// =============================================================================
// Hour sources
// =============================================================================

/// Where the clock reads the current hour from.
pub trait HourSource: Send + Sync + 'static {
    fn current_hour(&self) -> u32;
}

/// The local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalHour;

impl HourSource for LocalHour {
    fn current_hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// A pinned hour, for tests and the `FOREST_HOUR` override.
#[derive(Debug, Clone, Copy)]
pub struct FixedHour(pub u32);

impl HourSource for FixedHour {
    fn current_hour(&self) -> u32 {
        self.0 % 24
    }
}

// =============================================================================
// Resources & events
// =============================================================================

/// The active time-of-day category. Only written when the category changes,
/// so `Res<TimeOfDay>::is_changed()` means "rebuild".
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub category: TimeCategory,
}

/// Sent whenever a poll observes a different category than the last one.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDayChanged {
    pub previous: TimeCategory,
    pub current: TimeCategory,
}

/// Polling state for the time-of-day clock.
#[derive(Resource)]
pub struct TimeOfDayClock {
    poll: Timer,
    source: Box<dyn HourSource>,
}

impl Default for TimeOfDayClock {
    fn default() -> Self {
        Self::new(LocalHour)
    }
}

impl TimeOfDayClock {
    pub fn new(source: impl HourSource) -> Self {
        Self {
            poll: Timer::from_seconds(CLOCK_POLL_SECS, TimerMode::Repeating),
            source: Box::new(source),
        }
    }

    pub fn with_fixed_hour(hour: u32) -> Self {
        Self::new(FixedHour(hour))
    }

    /// Replace the hour source. Takes effect at the next poll.
    pub fn set_source(&mut self, source: impl HourSource) {
        self.source = Box::new(source);
    }

    /// Read the source right now.
    pub fn sample(&self) -> TimeCategory {
        TimeCategory::from_hour(self.source.current_hour())
    }

    /// Advance the poll timer. Returns a fresh sample for every poll that
    /// came due during `delta` (at most one; a long stall yields one sample).
    pub fn tick(&mut self, delta: Duration) -> Option<TimeCategory> {
        self.poll.tick(delta);
        if self.poll.times_finished_this_tick() > 0 {
            Some(self.sample())
        } else {
            None
        }
    }
}

/// Store `sampled` if it differs from the current category and announce it.
fn apply_sample(
    sampled: TimeCategory,
    time_of_day: &mut ResMut<TimeOfDay>,
    changed: &mut EventWriter<TimeOfDayChanged>,
) {
    if time_of_day.category == sampled {
        return;
    }
    let previous = time_of_day.category;
    time_of_day.category = sampled;
    info!("Time of day: {} -> {}", previous, sampled);
    changed.send(TimeOfDayChanged {
        previous,
        current: sampled,
    });
}

// =============================================================================
// Systems
// =============================================================================

/// Take the first reading before anything renders.
fn sample_time_of_day_on_startup(
    clock: Res<TimeOfDayClock>,
    mut time_of_day: ResMut<TimeOfDay>,
    mut changed: EventWriter<TimeOfDayChanged>,
) {
    apply_sample(clock.sample(), &mut time_of_day, &mut changed);
}

fn poll_time_of_day(
    time: Res<Time>,
    mut clock: ResMut<TimeOfDayClock>,
    mut time_of_day: ResMut<TimeOfDay>,
    mut changed: EventWriter<TimeOfDayChanged>,
) {
    if let Some(sampled) = clock.tick(time.delta()) {
        apply_sample(sampled, &mut time_of_day, &mut changed);
    }
}

// =============================================================================
// Plugin
// =============================================================================

pub struct TimeOfDayPlugin;

impl Plugin for TimeOfDayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TimeOfDay>()
            .init_resource::<TimeOfDayClock>()
            .add_event::<TimeOfDayChanged>()
            .add_systems(Startup, sample_time_of_day_on_startup)
            .add_systems(Update, poll_time_of_day);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_hour_maps_to_one_category() {
        let mut counts = [0usize; 4];
        for hour in 0..24 {
            let idx = TimeCategory::ALL
                .iter()
                .position(|c| *c == TimeCategory::from_hour(hour))
                .unwrap();
            counts[idx] += 1;
        }
        // Morning 6h, Day 6h, Evening 3h, Night 9h: no gaps, no overlaps.
        assert_eq!(counts, [6, 6, 3, 9]);
        assert_eq!(counts.iter().sum::<usize>(), 24);
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(TimeCategory::from_hour(4), TimeCategory::Night);
        assert_eq!(TimeCategory::from_hour(5), TimeCategory::Morning);
        assert_eq!(TimeCategory::from_hour(10), TimeCategory::Morning);
        assert_eq!(TimeCategory::from_hour(11), TimeCategory::Day);
        assert_eq!(TimeCategory::from_hour(16), TimeCategory::Day);
        assert_eq!(TimeCategory::from_hour(17), TimeCategory::Evening);
        assert_eq!(TimeCategory::from_hour(19), TimeCategory::Evening);
        assert_eq!(TimeCategory::from_hour(20), TimeCategory::Night);
        assert_eq!(TimeCategory::from_hour(0), TimeCategory::Night);
        assert_eq!(TimeCategory::from_hour(23), TimeCategory::Night);
    }

    #[test]
    fn test_hour_wraps_past_midnight() {
        assert_eq!(TimeCategory::from_hour(29), TimeCategory::Morning);
        assert_eq!(FixedHour(35).current_hour(), 11);
    }

    #[test]
    fn test_labels_are_upper_case() {
        assert_eq!(TimeCategory::Morning.to_string(), "MORNING");
        assert_eq!(TimeCategory::Day.to_string(), "DAY");
        assert_eq!(TimeCategory::Evening.to_string(), "EVENING");
        assert_eq!(TimeCategory::Night.to_string(), "NIGHT");
    }

    #[test]
    fn test_clock_polls_once_per_minute() {
        let mut clock = TimeOfDayClock::with_fixed_hour(12);
        assert_eq!(clock.tick(Duration::from_secs(59)), None);
        assert_eq!(clock.tick(Duration::from_secs(1)), Some(TimeCategory::Day));
        assert_eq!(clock.tick(Duration::from_secs(30)), None);
    }

    #[test]
    fn test_clock_picks_up_new_source_at_next_poll() {
        let mut clock = TimeOfDayClock::with_fixed_hour(8);
        assert_eq!(clock.sample(), TimeCategory::Morning);
        clock.set_source(FixedHour(22));
        assert_eq!(
            clock.tick(Duration::from_secs(60)),
            Some(TimeCategory::Night)
        );
    }

    #[test]
    fn test_category_now_is_a_valid_category() {
        assert!(TimeCategory::ALL.contains(&category_now()));
    }
}
