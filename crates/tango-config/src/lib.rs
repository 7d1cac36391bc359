use std::env;

use serde::{Deserialize, Serialize};

use self::log::LogConfig;
use self::round::RoundConfig;
use self::storage::StorageConfig;

pub mod log;
pub mod round;
pub mod storage;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("deck size must be at least 1")]
    EmptyDeck,

    #[error("match threshold must be in (0, 1], got {0}")]
    ThresholdOutOfRange(f64),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub round: RoundConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,

    /// Word list loaded when none is given on the command line
    pub word_list: Option<String>,
}

impl Config {
    /// Defaults overlaid with `TANGO_*` environment variables
    pub fn new() -> Self {
        let word_list = env::var("TANGO_WORD_LIST").ok();

        Config {
            round: RoundConfig::new(),
            storage: StorageConfig::new(),
            log: LogConfig::default(),

            word_list,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round.deck_size == 0 {
            return Err(ConfigError::EmptyDeck);
        }

        let threshold = self.round.match_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::ThresholdOutOfRange(threshold));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_observed_constants() {
        let config = Config::default();
        assert_eq!(config.round.deck_size, 10);
        assert_eq!(config.round.match_threshold, 0.7);
        assert_eq!(config.round.match_delay_ms, 1000);
        assert!(config.round.auto_continue);
        assert_eq!(config.log.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"round": {"deck_size": 8}}"#).unwrap();
        assert_eq!(config.round.deck_size, 8);
        assert_eq!(config.round.match_threshold, 0.7);
        assert!(config.word_list.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.round.deck_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::EmptyDeck));

        let mut config = Config::default();
        config.round.match_threshold = 1.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ThresholdOutOfRange(1.5))
        );
    }
}
