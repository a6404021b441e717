//! # TestForest: headless harness for the forest simulation
//!
//! Wraps `bevy::app::App` + `SimulationPlugin` with `MinimalPlugins`, a pinned
//! clock hour and a deterministic audio engine, so integration tests can
//! drive time forward and assert on resources.

use std::time::Duration;

use bevy::app::App;
use bevy::ecs::event::Events;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ambient_audio::{AmbientAudioEngine, FlakyHost};
use crate::ambient_settings::AmbientSoundSettings;
use crate::time_of_day::{FixedHour, TimeCategory, TimeOfDay, TimeOfDayChanged, TimeOfDayClock};
use crate::SimulationPlugin;

/// Wall time per `tick`.
pub const TICK: Duration = Duration::from_millis(100);

/// Sample rate of the harness audio host. Low, to keep rendering cheap.
pub const TEST_SAMPLE_RATE: u32 = 8_000;

pub struct TestForest {
    app: App,
    changes: Vec<TimeOfDayChanged>,
}

impl Default for TestForest {
    fn default() -> Self {
        Self::new()
    }
}

impl TestForest {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// A forest at midday with a working audio host.
    pub fn new() -> Self {
        Self::build(12, 0)
    }

    /// A forest with the clock pinned to `hour`.
    pub fn at_hour(hour: u32) -> Self {
        Self::build(hour, 0)
    }

    /// A forest whose audio host refuses the first `failures` opens.
    pub fn with_flaky_audio(failures: u32) -> Self {
        Self::build(12, failures)
    }

    fn build(hour: u32, audio_failures: u32) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(TICK));

        // Inserted BEFORE SimulationPlugin so its init_resource calls keep these.
        app.insert_resource(TimeOfDayClock::with_fixed_hour(hour));
        app.insert_resource(AmbientAudioEngine::new(
            FlakyHost {
                failures: audio_failures,
                sample_rate: TEST_SAMPLE_RATE,
            },
            ChaCha8Rng::seed_from_u64(1),
        ));
        app.add_plugins(SimulationPlugin);

        let mut forest = Self {
            app,
            changes: Vec::new(),
        };
        // Run one update so Startup systems execute.
        forest.update();
        forest
    }

    // -----------------------------------------------------------------------
    // Driving time
    // -----------------------------------------------------------------------

    fn update(&mut self) {
        self.app.update();
        let drained: Vec<TimeOfDayChanged> = self
            .app
            .world_mut()
            .resource_mut::<Events<TimeOfDayChanged>>()
            .drain()
            .collect();
        self.changes.extend(drained);
    }

    /// Run `n` frames of [`TICK`] each.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.update();
        }
    }

    /// Run whole seconds of frames.
    pub fn tick_secs(&mut self, secs: u32) {
        self.tick(secs * 10);
    }

    /// Render `secs` of audio, advancing the graph clock.
    pub fn render_audio(&mut self, secs: f32) -> Vec<f32> {
        let mut buf = vec![0.0; (secs * TEST_SAMPLE_RATE as f32) as usize];
        self.engine().render(&mut buf);
        buf
    }

    // -----------------------------------------------------------------------
    // Setup & access
    // -----------------------------------------------------------------------

    /// Move the wall clock. Picked up at the next poll.
    pub fn set_hour(&mut self, hour: u32) {
        self.app
            .world_mut()
            .resource_mut::<TimeOfDayClock>()
            .set_source(FixedHour(hour));
    }

    pub fn category(&self) -> TimeCategory {
        self.app.world().resource::<TimeOfDay>().category
    }

    /// Every category change observed so far.
    pub fn changes(&self) -> &[TimeOfDayChanged] {
        &self.changes
    }

    pub fn set_sound(&mut self, enabled: bool, volume: f32) {
        let mut settings = self
            .app
            .world_mut()
            .resource_mut::<AmbientSoundSettings>();
        settings.enabled = enabled;
        settings.set_volume(volume);
    }

    pub fn toggle_sound(&mut self) {
        self.app
            .world_mut()
            .resource_mut::<AmbientSoundSettings>()
            .toggle();
    }

    pub fn engine(&self) -> &AmbientAudioEngine {
        self.app.world().resource::<AmbientAudioEngine>()
    }

    pub fn send_exit(&mut self) {
        self.app.world_mut().send_event(AppExit::Success);
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
