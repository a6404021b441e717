//! Startup options read from the environment.
//!
//! | variable | effect |
//! |---|---|
//! | `GEMINI_API_KEY` / `API_KEY` | talk to Gemini instead of the offline persona |
//! | `FOREST_HOUR` | pin the clock to an hour (0-23) |
//! | `FOREST_SCREENSHOT` | save one screenshot to this path, then exit |
//! | `FOREST_SEED` | fixed seed for trees and sound triggers |

use std::path::PathBuf;

use bevy::prelude::*;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub api_key: Option<String>,
    pub hour: Option<u32>,
    pub screenshot: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl LaunchOptions {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY"));

        let hour = non_empty("FOREST_HOUR").and_then(|raw| match raw.trim().parse::<u32>() {
            Ok(hour) if hour < 24 => Some(hour),
            _ => {
                warn!("Ignoring FOREST_HOUR={raw:?}: expected an hour between 0 and 23");
                None
            }
        });

        let seed = non_empty("FOREST_SEED").and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                warn!("Ignoring FOREST_SEED={raw:?}: expected an unsigned integer");
                None
            }
        });

        Self {
            api_key,
            hour,
            screenshot: non_empty("FOREST_SCREENSHOT").map(PathBuf::from),
            seed,
        }
    }
}
