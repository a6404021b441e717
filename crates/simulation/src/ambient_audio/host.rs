//! Output host negotiation.
//!
//! The graph is built only after the host agrees to open an output stream and
//! tells us its sample rate. Hosts that can refuse (no device, blocked
//! autoplay) report it through [`AmbientAudioError`] and the engine stays
//! silent until the user asks again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bevy::prelude::*;

use crate::config::DEFAULT_SAMPLE_RATE;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmbientAudioError {
    #[error("audio output unavailable: {0}")]
    HostUnavailable(String),
}

pub trait AudioHost: Send + Sync + 'static {
    /// Open the output. Returns the sample rate the graph must render at.
    fn open(&mut self) -> Result<u32, AmbientAudioError>;
}

/// Raised once something will pull samples out of the graph. The resource and
/// every [`StreamHost`] built from it share one flag.
#[derive(Resource, Debug, Clone, Default)]
pub struct OutputLink(Arc<AtomicBool>);

impl OutputLink {
    pub fn connect(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_connected(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Host backed by Bevy's audio output: rodio pulls samples from the graph
/// through a decodable asset. Opening fails until the output side has
/// raised the shared [`OutputLink`].
#[derive(Debug, Clone)]
pub struct StreamHost {
    pub sample_rate: u32,
    link: OutputLink,
}

impl StreamHost {
    pub fn new(link: OutputLink) -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            link,
        }
    }

    /// A host whose output is already attached. For headless rendering,
    /// where the caller pulls samples itself.
    pub fn connected(sample_rate: u32) -> Self {
        let link = OutputLink::default();
        link.connect();
        Self { sample_rate, link }
    }
}

impl AudioHost for StreamHost {
    fn open(&mut self) -> Result<u32, AmbientAudioError> {
        if !self.link.is_connected() {
            return Err(AmbientAudioError::HostUnavailable(
                "no audio output attached".into(),
            ));
        }
        Ok(self.sample_rate)
    }
}

/// A host that refuses the first `failures` attempts, then opens. Used to
/// exercise the retry-on-next-enable path.
#[derive(Debug, Clone, Copy)]
pub struct FlakyHost {
    pub failures: u32,
    pub sample_rate: u32,
}

impl AudioHost for FlakyHost {
    fn open(&mut self) -> Result<u32, AmbientAudioError> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(AmbientAudioError::HostUnavailable(
                "output device refused to start".into(),
            ));
        }
        Ok(self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_host_needs_attached_output() {
        let link = OutputLink::default();
        let mut host = StreamHost::new(link.clone());
        assert!(matches!(
            host.open(),
            Err(AmbientAudioError::HostUnavailable(_))
        ));

        link.connect();
        assert_eq!(host.open(), Ok(44_100));
    }

    #[test]
    fn test_connected_host_opens_at_its_rate() {
        assert_eq!(StreamHost::connected(8_000).open(), Ok(8_000));
    }

    #[test]
    fn test_flaky_host_recovers() {
        let mut host = FlakyHost {
            failures: 2,
            sample_rate: 8_000,
        };
        assert!(host.open().is_err());
        assert!(host.open().is_err());
        assert_eq!(host.open(), Ok(8_000));
    }

    #[test]
    fn test_error_message() {
        let err = AmbientAudioError::HostUnavailable("no device".into());
        assert_eq!(err.to_string(), "audio output unavailable: no device");
    }
}
