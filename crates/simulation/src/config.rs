/// Physical pixels per logical scene pixel.
pub const PIXEL_SCALE: u32 = 4;

/// Trees generated per scene activation.
pub const TREE_COUNT: usize = 30;

/// Fireflies drawn when the active palette enables them.
pub const FIREFLY_COUNT: usize = 15;

/// Scene time added per rendered frame. This is a fixed logical step, so
/// animation speed follows the display refresh rate.
pub const SCENE_TIME_STEP: f32 = 0.02;

/// Maximum horizontal foliage displacement in logical pixels.
pub const SWAY_AMPLITUDE: f32 = 2.0;

/// Seconds between wall-clock samples of the time-of-day clock.
pub const CLOCK_POLL_SECS: f32 = 60.0;

/// Fraction of the viewport width where the sun or moon is drawn.
pub const CELESTIAL_X_FRACTION: f32 = 0.8;

/// Tree baselines are scattered within this many pixels above the bottom edge
/// (and up to `TREE_BASELINE_OVERHANG` below it).
pub const TREE_BASELINE_SPREAD: f32 = 50.0;
pub const TREE_BASELINE_OVERHANG: f32 = 10.0;

pub const TREE_MIN_HEIGHT: f32 = 40.0;
pub const TREE_HEIGHT_SPREAD: f32 = 60.0;

/// Sample rate the synth graph renders at unless the host reports another.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Master volume of a bare `AmbientSoundSettings`, matching the sound
/// component's own default.
pub const DEFAULT_VOLUME: f32 = 0.3;

/// Master volume the app hands the soundscape at launch.
pub const APP_VOLUME: f32 = 0.8;
