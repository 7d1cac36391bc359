use std::env;

use serde::{Deserialize, Serialize};

fn default_deck_size() -> usize {
    10
}

fn default_match_threshold() -> f64 {
    0.7
}

fn default_match_delay_ms() -> u64 {
    1000
}

fn default_auto_continue() -> bool {
    true
}

/// Per-round tuning shared by every drill mode
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RoundConfig {
    /// Words per round
    #[serde(default = "default_deck_size")]
    pub deck_size: usize,
    /// Minimum accuracy fraction to accept an attempt
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,
    /// Pause before the UI resets after a failed attempt
    #[serde(default = "default_match_delay_ms")]
    pub match_delay_ms: u64,
    /// Start a fresh round as soon as one completes
    #[serde(default = "default_auto_continue")]
    pub auto_continue: bool,
}

impl RoundConfig {
    pub fn new() -> Self {
        let defaults = Self::default();

        let deck_size = env::var("TANGO_DECK_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.deck_size);

        let match_threshold = env::var("TANGO_MATCH_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.match_threshold);

        let match_delay_ms = env::var("TANGO_MATCH_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.match_delay_ms);

        Self {
            deck_size,
            match_threshold,
            match_delay_ms,
            ..defaults
        }
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            deck_size: default_deck_size(),
            match_threshold: default_match_threshold(),
            match_delay_ms: default_match_delay_ms(),
            auto_continue: default_auto_continue(),
        }
    }
}
