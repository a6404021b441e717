//! Lifecycle owner for the ambient soundscape.
//!
//! The graph is built lazily on the first successful enable and then only
//! suspended and resumed. Layer triggers tick on the main schedule; the audio
//! thread pulls samples through the shared graph handle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bevy::prelude::*;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::forest_rng::ForestRng;

use super::dsp::pink_noise_buffer;
use super::graph::SynthGraph;
use super::host::{AmbientAudioError, AudioHost, OutputLink, StreamHost};
use super::layers::{roll_chime, roll_creature, roll_gust, DueTriggers, LayerTriggers};
use super::voice::Voice;

/// Graph handle shared with the audio output thread.
pub type SharedGraph = Arc<Mutex<SynthGraph>>;

/// Lock the graph, recovering from a poisoned lock: a panic on the audio
/// thread leaves the graph in a usable (if glitchy) state.
pub fn lock_graph(graph: &Mutex<SynthGraph>) -> MutexGuard<'_, SynthGraph> {
    graph.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Running totals of trigger activity since construction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LayerStats {
    pub gusts: u32,
    pub chime_rolls: u32,
    pub chimes_played: u32,
    pub creature_rolls: u32,
    pub creatures_played: u32,
}

#[derive(Resource)]
pub struct AmbientAudioEngine {
    host: Box<dyn AudioHost>,
    rng: Box<dyn RngCore + Send + Sync>,
    graph: Option<SharedGraph>,
    triggers: LayerTriggers,
    enabled: bool,
    volume: f32,
    torn_down: bool,
    constructions: u32,
    stats: LayerStats,
}

/// Opens through the world's [`OutputLink`] and draws triggers from a fork of
/// [`ForestRng`] when there is one.
impl FromWorld for AmbientAudioEngine {
    fn from_world(world: &mut World) -> Self {
        let link = (*world.get_resource_or_insert_with(OutputLink::default)).clone();
        let rng = match world.get_resource_mut::<ForestRng>() {
            Some(mut forest_rng) => forest_rng.fork(),
            None => ChaCha8Rng::seed_from_u64(7),
        };
        Self::new(StreamHost::new(link), rng)
    }
}

impl AmbientAudioEngine {
    pub fn new(host: impl AudioHost, rng: impl RngCore + Send + Sync + 'static) -> Self {
        Self {
            host: Box::new(host),
            rng: Box::new(rng),
            graph: None,
            triggers: LayerTriggers::default(),
            enabled: false,
            volume: 0.0,
            torn_down: false,
            constructions: 0,
            stats: LayerStats::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_constructed(&self) -> bool {
        self.graph.is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// How many times a graph has been built. Never exceeds 1.
    pub fn constructions(&self) -> u32 {
        self.constructions
    }

    pub fn stats(&self) -> LayerStats {
        self.stats
    }

    /// Handle for the output thread, once the graph exists.
    pub fn shared_graph(&self) -> Option<SharedGraph> {
        self.graph.clone()
    }

    /// The level the master gain is heading for.
    pub fn target_level(&self) -> f32 {
        if self.enabled && self.graph.is_some() && !self.torn_down {
            self.volume
        } else {
            0.0
        }
    }

    /// Current master gain, if the graph exists.
    pub fn master_level(&self) -> Option<f32> {
        self.graph.as_ref().map(|g| lock_graph(g).master_level())
    }

    /// Apply the user's sound settings. The first enable builds the graph;
    /// if the host refuses, the engine stays silent and the error is
    /// returned so the caller can log it. The next enable tries again.
    pub fn apply(&mut self, enabled: bool, volume: f32) -> Result<(), AmbientAudioError> {
        self.enabled = enabled;
        self.volume = volume.clamp(0.0, 1.0);
        if self.torn_down {
            return Ok(());
        }

        if enabled && self.graph.is_none() {
            self.construct()?;
        }

        let Some(graph) = &self.graph else {
            return Ok(());
        };
        let mut g = lock_graph(graph);
        if enabled {
            g.resume();
            g.ramp_master(self.volume);
        } else if !g.is_suspended() {
            g.fade_out_and_suspend();
        }
        Ok(())
    }

    fn construct(&mut self) -> Result<(), AmbientAudioError> {
        let sample_rate = self.host.open()?;
        let noise = pink_noise_buffer(&mut self.rng, sample_rate);
        // Start silent; `apply` ramps the master up from here.
        let graph = SynthGraph::new(sample_rate, noise, 0.0);
        self.graph = Some(Arc::new(Mutex::new(graph)));
        self.triggers = LayerTriggers::default();
        self.constructions += 1;
        info!("Ambient soundscape started at {} Hz", sample_rate);
        Ok(())
    }

    /// Advance the layer triggers and schedule whatever came due. New voices
    /// are only added while the graph is producing sound.
    pub fn tick(&mut self, delta: Duration) -> DueTriggers {
        if self.torn_down {
            return DueTriggers::default();
        }
        let Some(graph) = self.graph.clone() else {
            return DueTriggers::default();
        };

        let due = self.triggers.tick(delta);
        if due.is_empty() {
            return due;
        }

        let mut g = lock_graph(&graph);
        let audible = !g.is_suspended();

        for _ in 0..due.gusts {
            let (cutoff, gain) = roll_gust(&mut self.rng);
            self.stats.gusts += 1;
            g.schedule_gust(cutoff, gain);
        }

        for _ in 0..due.chimes {
            self.stats.chime_rolls += 1;
            if let Some(note) = roll_chime(&mut self.rng) {
                if audible {
                    let at = g.now();
                    g.add_voice(Voice::chime(note, at));
                    self.stats.chimes_played += 1;
                }
            }
        }

        for _ in 0..due.creatures {
            self.stats.creature_rolls += 1;
            if let Some(call) = roll_creature(&mut self.rng) {
                if audible {
                    let at = g.now();
                    g.add_voice(Voice::creature(call, at));
                    self.stats.creatures_played += 1;
                }
            }
        }

        due
    }

    /// Pull samples directly, for headless rendering and benches. Returns
    /// false (and leaves `out` untouched) when there is no graph yet.
    pub fn render(&self, out: &mut [f32]) -> bool {
        match &self.graph {
            Some(graph) => {
                lock_graph(graph).render(out);
                true
            }
            None => false,
        }
    }

    /// Cancel every layer trigger and silence the output. Safe to call more
    /// than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Some(graph) = &self.graph {
            lock_graph(graph).suspend();
        }
        info!("Ambient soundscape torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambient_audio::host::FlakyHost;
    use crate::ambient_audio::layers::AmbientLayer;
    use rand::rngs::mock::StepRng;

    const SR: u32 = 8_000;

    fn host() -> FlakyHost {
        FlakyHost {
            failures: 0,
            sample_rate: SR,
        }
    }

    fn engine() -> AmbientAudioEngine {
        AmbientAudioEngine::new(host(), ChaCha8Rng::seed_from_u64(1))
    }

    /// Advance triggers and render the matching amount of audio.
    fn run(engine: &mut AmbientAudioEngine, secs: f64) {
        let steps = (secs * 10.0).round() as usize;
        let mut buf = vec![0.0; SR as usize / 10];
        for _ in 0..steps {
            engine.tick(Duration::from_millis(100));
            engine.render(&mut buf);
        }
    }

    #[test]
    fn test_nothing_built_until_enabled() {
        let mut e = engine();
        e.apply(false, 0.5).unwrap();
        assert!(!e.is_constructed());
        assert_eq!(e.tick(Duration::from_secs(10)), DueTriggers::default());
        assert_eq!(e.target_level(), 0.0);
        assert!(!e.render(&mut [0.0; 16]));
    }

    #[test]
    fn test_graph_constructed_once_across_toggles() {
        let mut e = engine();
        for _ in 0..5 {
            e.apply(true, 0.5).unwrap();
            run(&mut e, 0.5);
            e.apply(false, 0.5).unwrap();
            run(&mut e, 0.5);
        }
        assert_eq!(e.constructions(), 1);
    }

    #[test]
    fn test_target_follows_settings_and_master_never_overshoots() {
        let mut e = engine();
        e.apply(true, 0.5).unwrap();
        assert_eq!(e.target_level(), 0.5);
        for _ in 0..30 {
            run(&mut e, 0.1);
            assert!(e.master_level().unwrap() <= 0.5 + 1e-6);
        }
        assert!((e.master_level().unwrap() - 0.5).abs() < 0.01);

        e.apply(false, 0.5).unwrap();
        assert_eq!(e.target_level(), 0.0);
        run(&mut e, 3.0);
        assert!(e.master_level().unwrap() < 0.01);

        e.apply(true, 0.5).unwrap();
        assert_eq!(e.target_level(), 0.5);
        for _ in 0..30 {
            run(&mut e, 0.1);
            assert!(e.master_level().unwrap() <= 0.5 + 1e-6);
        }
        assert!((e.master_level().unwrap() - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_volume_change_while_enabled_ramps() {
        let mut e = engine();
        e.apply(true, 0.8).unwrap();
        run(&mut e, 3.0);
        e.apply(true, 0.2).unwrap();
        let before = e.master_level().unwrap();
        run(&mut e, 0.2);
        let after = e.master_level().unwrap();
        assert!(after < before && after > 0.2);
        run(&mut e, 3.0);
        assert!((e.master_level().unwrap() - 0.2).abs() < 0.01);
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut e = engine();
        e.apply(true, 3.0).unwrap();
        assert_eq!(e.volume(), 1.0);
    }

    #[test]
    fn test_host_failure_is_quiet_and_later_enable_succeeds() {
        let mut e = AmbientAudioEngine::new(
            FlakyHost {
                failures: 1,
                sample_rate: SR,
            },
            ChaCha8Rng::seed_from_u64(1),
        );
        assert!(e.apply(true, 0.5).is_err());
        assert!(!e.is_constructed());
        assert_eq!(e.target_level(), 0.0);
        // No retry on its own.
        run(&mut e, 10.0);
        assert!(!e.is_constructed());

        e.apply(false, 0.5).unwrap();
        e.apply(true, 0.5).unwrap();
        assert!(e.is_constructed());
        assert_eq!(e.constructions(), 1);
    }

    #[test]
    fn test_chime_trigger_fires_ten_times_in_35_seconds() {
        let mut e = engine();
        e.apply(true, 0.5).unwrap();
        run(&mut e, 35.0);
        assert_eq!(e.stats().chime_rolls, 10);
        assert_eq!(e.stats().gusts, 8);
        assert_eq!(e.stats().creature_rolls, 7);
    }

    #[test]
    fn test_low_rolls_schedule_no_voices() {
        let mut e = AmbientAudioEngine::new(host(), StepRng::new(0, 0));
        e.apply(true, 0.5).unwrap();
        run(&mut e, 35.0);
        assert_eq!(e.stats().chime_rolls, 10);
        assert_eq!(e.stats().chimes_played, 0);
        assert_eq!(e.stats().creatures_played, 0);
    }

    #[test]
    fn test_high_rolls_schedule_every_time_and_voices_expire() {
        let mut e = AmbientAudioEngine::new(host(), StepRng::new(u64::MAX, 0));
        e.apply(true, 0.5).unwrap();
        run(&mut e, 3.5);
        assert_eq!(e.stats().chimes_played, 1);
        let graph = e.shared_graph().unwrap();
        assert_eq!(lock_graph(&graph).active_voices(AmbientLayer::Chimes), 1);

        // Stop the triggers and let the note ring out.
        e.teardown();
        lock_graph(&graph).resume();
        let mut buf = vec![0.0; SR as usize * 5];
        e.render(&mut buf);
        assert_eq!(lock_graph(&graph).active_voices(AmbientLayer::Chimes), 0);
    }

    #[test]
    fn test_no_new_voices_while_suspended() {
        let mut e = AmbientAudioEngine::new(host(), StepRng::new(u64::MAX, 0));
        e.apply(true, 0.5).unwrap();
        e.apply(false, 0.5).unwrap();
        run(&mut e, 10.0);
        // The fade takes 2.5 s; everything after lands on a suspended graph.
        assert!(e.stats().chimes_played <= 1);
        assert_eq!(e.stats().chime_rolls, 2);
    }

    #[test]
    fn test_teardown_is_idempotent_and_stops_triggers() {
        let mut e = engine();
        e.apply(true, 0.5).unwrap();
        e.teardown();
        e.teardown();
        assert!(e.is_torn_down());
        assert_eq!(e.tick(Duration::from_secs(30)), DueTriggers::default());
        assert_eq!(e.target_level(), 0.0);
        e.apply(true, 0.5).unwrap();
        assert_eq!(e.constructions(), 1);
    }

    #[test]
    fn test_world_engine_waits_for_output_link() {
        let mut world = World::new();
        let mut e = AmbientAudioEngine::from_world(&mut world);
        assert!(matches!(
            e.apply(true, 0.5),
            Err(AmbientAudioError::HostUnavailable(_))
        ));
        assert!(!e.is_constructed());

        world.resource::<OutputLink>().connect();
        e.apply(true, 0.5).unwrap();
        assert!(e.is_constructed());
        assert_eq!(e.constructions(), 1);
    }

    #[test]
    fn test_world_engine_forks_forest_rng() {
        let mut world = World::new();
        world.insert_resource(ForestRng::from_seed_u64(9));
        let _ = AmbientAudioEngine::from_world(&mut world);
        let mut untouched = ForestRng::from_seed_u64(9);
        assert_ne!(
            world.resource_mut::<ForestRng>().0.next_u64(),
            untouched.0.next_u64()
        );
    }
}
