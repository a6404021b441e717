//! Feeds the ambient synth graph into Bevy's audio output.
//!
//! The graph is exposed as a custom audio asset whose decoder is an endless
//! mono stream. Samples are rendered a block at a time under the graph lock,
//! so the mixer thread and the game-thread trigger scheduling only contend
//! once per block.

use bevy::audio::{AddAudioSource, AudioPlugin, Decodable, Source};
use bevy::prelude::*;

use simulation::ambient_audio::{lock_graph, AmbientAudioEngine, OutputLink, SharedGraph};

/// Samples rendered per graph lock.
const STREAM_BLOCK: usize = 1024;

#[derive(Asset, TypePath)]
pub struct AmbientStream {
    graph: SharedGraph,
    sample_rate: u32,
}

impl AmbientStream {
    pub fn new(graph: SharedGraph) -> Self {
        let sample_rate = lock_graph(&graph).sample_rate();
        Self { graph, sample_rate }
    }
}

pub struct AmbientStreamDecoder {
    graph: SharedGraph,
    sample_rate: u32,
    block: Vec<f32>,
    cursor: usize,
}

impl AmbientStreamDecoder {
    fn new(graph: SharedGraph, sample_rate: u32) -> Self {
        Self {
            graph,
            sample_rate,
            block: vec![0.0; STREAM_BLOCK],
            // Forces a render on the first pull.
            cursor: STREAM_BLOCK,
        }
    }
}

impl Iterator for AmbientStreamDecoder {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.block.len() {
            lock_graph(&self.graph).render(&mut self.block);
            self.cursor = 0;
        }
        let sample = self.block[self.cursor];
        self.cursor += 1;
        Some(sample)
    }
}

impl Source for AmbientStreamDecoder {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<std::time::Duration> {
        None
    }
}

impl Decodable for AmbientStream {
    type DecoderItem = f32;
    type Decoder = AmbientStreamDecoder;

    fn decoder(&self) -> Self::Decoder {
        AmbientStreamDecoder::new(self.graph.clone(), self.sample_rate)
    }
}

/// Start playback the first time the engine has a graph. The graph lives for
/// the rest of the session, so one player is enough. The stream never ends,
/// so it plays once: looping would buffer every sample for a replay that
/// never comes.
fn attach_ambient_output(
    mut commands: Commands,
    engine: Res<AmbientAudioEngine>,
    mut streams: ResMut<Assets<AmbientStream>>,
    mut attached: Local<bool>,
) {
    if *attached {
        return;
    }
    let Some(graph) = engine.shared_graph() else {
        return;
    };
    let handle = streams.add(AmbientStream::new(graph));
    commands.spawn((
        AudioPlayer(handle),
        PlaybackSettings::ONCE,
        Name::new("Ambient soundscape"),
    ));
    *attached = true;
    info!("Ambient soundscape attached to audio output");
}

pub struct AmbientOutputPlugin;

impl Plugin for AmbientOutputPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<AudioPlugin>() {
            warn!("AudioPlugin missing, ambient soundscape will not be heard");
            return;
        }
        app.world_mut()
            .get_resource_or_insert_with(OutputLink::default)
            .connect();
        app.add_audio_source::<AmbientStream>()
            .add_systems(Update, attach_ambient_output);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use simulation::ambient_audio::dsp::pink_noise_buffer;
    use simulation::ambient_audio::{StreamHost, SynthGraph};
    use simulation::ambient_settings::AmbientSoundSettings;
    use simulation::SimulationPlugin;

    use super::*;
    use bevy::audio::PlaybackMode;

    const SR: u32 = 8_000;

    fn shared(master: f32) -> SharedGraph {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let noise = pink_noise_buffer(&mut rng, SR);
        Arc::new(Mutex::new(SynthGraph::new(SR, noise, master)))
    }

    #[test]
    fn test_decoder_reports_endless_mono_stream() {
        let stream = AmbientStream::new(shared(0.3));
        let decoder = stream.decoder();
        assert_eq!(decoder.channels(), 1);
        assert_eq!(decoder.sample_rate(), SR);
        assert_eq!(decoder.total_duration(), None);
        assert_eq!(decoder.current_frame_len(), None);
    }

    #[test]
    fn test_decoder_pulls_whole_blocks_from_graph() {
        let graph = shared(0.3);
        let stream = AmbientStream::new(graph.clone());
        let samples: Vec<f32> = stream.decoder().take(STREAM_BLOCK + 1).collect();
        assert_eq!(samples.len(), STREAM_BLOCK + 1);
        assert!(samples.iter().any(|s| s.abs() > 1e-4));

        let now = lock_graph(&graph).now();
        let expected = (2 * STREAM_BLOCK) as f64 / SR as f64;
        assert!((now - expected).abs() < 1e-9);
    }

    #[test]
    fn test_suspended_graph_streams_silence() {
        let graph = shared(0.3);
        lock_graph(&graph).suspend();
        let stream = AmbientStream::new(graph);
        assert!(stream.decoder().take(4000).all(|s| s == 0.0));
    }

    #[test]
    fn test_silent_master_streams_silence() {
        let stream = AmbientStream::new(shared(0.0));
        assert!(stream.decoder().take(2000).all(|s| s.abs() < 1e-6));
    }

    #[test]
    fn test_plugin_without_audio_plugin_is_inert() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(AmbientOutputPlugin);
        app.update();
        assert!(app.world().get_resource::<Assets<AmbientStream>>().is_none());
        assert!(app
            .world()
            .get_resource::<OutputLink>()
            .map_or(true, |link| !link.is_connected()));
    }

    #[test]
    fn test_enable_without_output_stays_silent_then_retries() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins((SimulationPlugin, AmbientOutputPlugin));
        app.update();

        app.world_mut()
            .resource_mut::<AmbientSoundSettings>()
            .enabled = true;
        app.update();
        let engine = app.world().resource::<AmbientAudioEngine>();
        assert!(!engine.is_constructed());
        assert_eq!(engine.constructions(), 0);

        // An output shows up later; the next enable builds the graph.
        app.world().resource::<OutputLink>().connect();
        app.world_mut()
            .resource_mut::<AmbientSoundSettings>()
            .enabled = false;
        app.update();
        app.world_mut()
            .resource_mut::<AmbientSoundSettings>()
            .enabled = true;
        app.update();
        let engine = app.world().resource::<AmbientAudioEngine>();
        assert!(engine.is_constructed());
        assert_eq!(engine.constructions(), 1);
    }

    fn output_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<Assets<AmbientStream>>();
        app.insert_resource(AmbientAudioEngine::new(
            StreamHost::connected(SR),
            ChaCha8Rng::seed_from_u64(1),
        ));
        app.add_systems(Update, attach_ambient_output);
        app
    }

    #[test]
    fn test_no_player_before_first_enable() {
        let mut app = output_app();
        app.update();
        let mut players = app.world_mut().query::<&AudioPlayer<AmbientStream>>();
        assert_eq!(players.iter(app.world()).count(), 0);
    }

    #[test]
    fn test_single_player_plays_stream_once() {
        let mut app = output_app();
        app.world_mut()
            .resource_mut::<AmbientAudioEngine>()
            .apply(true, 0.5)
            .unwrap();
        app.update();
        app.update();

        let mut players = app
            .world_mut()
            .query::<(&AudioPlayer<AmbientStream>, &PlaybackSettings)>();
        let spawned: Vec<_> = players.iter(app.world()).collect();
        assert_eq!(spawned.len(), 1);
        let (_, settings) = spawned[0];
        assert!(matches!(settings.mode, PlaybackMode::Once));
    }
}
