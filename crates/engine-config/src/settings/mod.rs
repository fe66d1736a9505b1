use crate::settings::{env::EnvManager, error::SettingsError};
use model::execution::params::{FailurePolicy, Prefix};
use std::{path::PathBuf, time::Duration};
use tracing::{debug, warn};

pub mod env;
pub mod error;

pub const ENV_FFMPEG: &str = "FILEKIT_FFMPEG";
pub const ENV_POLL_INTERVAL_MS: &str = "FILEKIT_POLL_INTERVAL_MS";
pub const ENV_STOP_ON_ERROR: &str = "FILEKIT_STOP_ON_ERROR";
pub const ENV_PREFIX: &str = "FILEKIT_PREFIX";

pub const DEFAULT_FFMPEG: &str = "ffmpeg";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
const POLL_INTERVAL_RANGE_MS: (u64, u64) = (10, 5_000);

/// Runtime settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Transcoder executable, looked up on `PATH` when not absolute.
    pub ffmpeg_path: PathBuf,
    /// How often the progress reporter polls for new events.
    pub poll_interval: Duration,
    pub policy: FailurePolicy,
    pub default_prefix: Prefix,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            ffmpeg_path: PathBuf::from(DEFAULT_FFMPEG),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            policy: FailurePolicy::Continue,
            default_prefix: Prefix::default(),
        }
    }
}

impl Settings {
    /// Resolves settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_manager(&EnvManager::new())
    }

    pub fn from_manager(env: &EnvManager) -> Result<Self, SettingsError> {
        let mut settings = Settings::default();

        if let Some(path) = env.get(ENV_FFMPEG) {
            settings.ffmpeg_path = PathBuf::from(path);
        }

        if let Some(raw) = env.get(ENV_POLL_INTERVAL_MS) {
            let ms = parse_u64(ENV_POLL_INTERVAL_MS, &raw)?;
            let (min, max) = POLL_INTERVAL_RANGE_MS;
            if !(min..=max).contains(&ms) {
                return Err(SettingsError::OutOfRange {
                    key: ENV_POLL_INTERVAL_MS.to_string(),
                    value: ms,
                    min,
                    max,
                });
            }
            settings.poll_interval = Duration::from_millis(ms);
        }

        if let Some(raw) = env.get(ENV_STOP_ON_ERROR)
            && parse_bool(ENV_STOP_ON_ERROR, &raw)?
        {
            settings.policy = FailurePolicy::StopOnError;
        }

        if let Some(raw) = env.get(ENV_PREFIX) {
            settings.default_prefix = match Prefix::parse(&raw) {
                Some(prefix) => prefix,
                None => {
                    warn!(value = %raw, "{ENV_PREFIX} is not a 3-digit prefix, using {}", Prefix::DEFAULT);
                    Prefix::default()
                }
            };
        }

        debug!(?settings, "Resolved settings");
        Ok(settings)
    }
}

fn parse_u64(key: &str, raw: &str) -> Result<u64, SettingsError> {
    raw.parse::<u64>().map_err(|_| SettingsError::InvalidNumber {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, SettingsError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SettingsError::InvalidBool {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_environment() {
        let settings = Settings::from_manager(&EnvManager::default()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.poll_interval, Duration::from_millis(100));
        assert_eq!(settings.ffmpeg_path, PathBuf::from("ffmpeg"));
    }

    #[test]
    fn reads_overrides() {
        let env = EnvManager::from_pairs([
            (ENV_FFMPEG, "/opt/homebrew/bin/ffmpeg"),
            (ENV_POLL_INTERVAL_MS, "250"),
            (ENV_STOP_ON_ERROR, "yes"),
            (ENV_PREFIX, "123"),
        ]);
        let settings = Settings::from_manager(&env).unwrap();

        assert_eq!(settings.ffmpeg_path, PathBuf::from("/opt/homebrew/bin/ffmpeg"));
        assert_eq!(settings.poll_interval, Duration::from_millis(250));
        assert_eq!(settings.policy, FailurePolicy::StopOnError);
        assert_eq!(settings.default_prefix.as_str(), "123");
    }

    #[test]
    fn invalid_prefix_falls_back() {
        let env = EnvManager::from_pairs([(ENV_PREFIX, "12")]);
        let settings = Settings::from_manager(&env).unwrap();
        assert_eq!(settings.default_prefix.as_str(), "000");
    }

    #[test]
    fn rejects_malformed_numbers_and_bools() {
        let env = EnvManager::from_pairs([(ENV_POLL_INTERVAL_MS, "fast")]);
        assert!(matches!(
            Settings::from_manager(&env),
            Err(SettingsError::InvalidNumber { .. })
        ));

        let env = EnvManager::from_pairs([(ENV_POLL_INTERVAL_MS, "1")]);
        assert!(matches!(
            Settings::from_manager(&env),
            Err(SettingsError::OutOfRange { value: 1, .. })
        ));

        let env = EnvManager::from_pairs([(ENV_STOP_ON_ERROR, "maybe")]);
        assert!(matches!(
            Settings::from_manager(&env),
            Err(SettingsError::InvalidBool { .. })
        ));
    }
}
