//! Session configuration.
//!
//! A [`Config`] is built once, from the command line or from the options
//! form, and is read-only for the life of a session.  Changing it means
//! starting a new session.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use reqwest::Url;

use crate::error::ConfigError;

pub const DEFAULT_SOURCE: &str = "https://buildhub2.stage.mozaws.net/";
pub const DEFAULT_FREQUENCY: u64 = 10;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "freshoffthebuild", version, about = "What's most recently built, fresh off the build")]
pub struct Cli {
    /// Base URL of the Buildhub instance to poll.
    #[arg(short = 's', long, env = "FRESHOFFTHEBUILD_SOURCE", default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// How many units to wait between checks.
    #[arg(short = 'f', long, env = "FRESHOFFTHEBUILD_FREQUENCY", default_value_t = DEFAULT_FREQUENCY)]
    pub frequency: u64,

    /// Unit of the frequency.
    #[arg(short = 'u', long, env = "FRESHOFFTHEBUILD_UNIT", value_enum, default_value_t = FrequencyUnit::Minutes)]
    pub unit: FrequencyUnit,

    /// Where the last fetched result is remembered between runs.
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Directory for log files.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FrequencyUnit {
    Seconds,
    Minutes,
    Hours,
}

impl FrequencyUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            FrequencyUnit::Seconds => "seconds",
            FrequencyUnit::Minutes => "minutes",
            FrequencyUnit::Hours => "hours",
        }
    }

    /// The unit after this one, wrapping around.
    pub fn next(self) -> Self {
        match self {
            FrequencyUnit::Seconds => FrequencyUnit::Minutes,
            FrequencyUnit::Minutes => FrequencyUnit::Hours,
            FrequencyUnit::Hours => FrequencyUnit::Seconds,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            FrequencyUnit::Seconds => FrequencyUnit::Hours,
            FrequencyUnit::Minutes => FrequencyUnit::Seconds,
            FrequencyUnit::Hours => FrequencyUnit::Minutes,
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Longest poll cycle accepted: one year.
pub const MAX_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

/// Length of one poll cycle in seconds, or `None` if it does not fit a `u64`.
pub fn compute_seconds(frequency: u64, unit: FrequencyUnit) -> Option<u64> {
    match unit {
        FrequencyUnit::Seconds => Some(frequency),
        FrequencyUnit::Minutes => frequency.checked_mul(60),
        FrequencyUnit::Hours => frequency.checked_mul(60 * 60),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: Url,
    pub frequency: u64,
    pub unit: FrequencyUnit,
}

impl Config {
    /// Validate and build a configuration.
    ///
    /// A malformed `source` is an error, never silently replaced by the
    /// default.  The cycle length must be between one second and
    /// [`MAX_INTERVAL_SECS`].
    pub fn new(source: &str, frequency: u64, unit: FrequencyUnit) -> Result<Self, ConfigError> {
        let source =
            Url::parse(source.trim()).map_err(|e| ConfigError::InvalidSource(e.to_string()))?;
        if source.cannot_be_a_base() {
            return Err(ConfigError::InvalidSource(format!(
                "{source} cannot be used as a base URL"
            )));
        }
        match compute_seconds(frequency, unit) {
            Some(1..=MAX_INTERVAL_SECS) => {}
            _ => return Err(ConfigError::InvalidFrequency(frequency.to_string())),
        }
        Ok(Self {
            source,
            frequency,
            unit,
        })
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Self::new(&cli.source, cli.frequency, cli.unit)
    }

    pub fn seconds(&self) -> u64 {
        compute_seconds(self.frequency, self.unit)
            .map_or(MAX_INTERVAL_SECS, |secs| secs.min(MAX_INTERVAL_SECS))
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.seconds())
    }

    /// The search endpoint, resolved against the source the way a browser
    /// resolves an absolute path.
    pub fn search_url(&self) -> Url {
        let mut url = self.source.clone();
        url.set_path("/api/search");
        url.set_query(None);
        url.set_fragment(None);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn compute_seconds_scales_by_unit() {
        for frequency in [1, 7, 10, 90] {
            assert_eq!(compute_seconds(frequency, FrequencyUnit::Seconds), Some(frequency));
            assert_eq!(compute_seconds(frequency, FrequencyUnit::Minutes), Some(frequency * 60));
            assert_eq!(compute_seconds(frequency, FrequencyUnit::Hours), Some(frequency * 3600));
        }
    }

    #[test]
    fn compute_seconds_reports_overflow() {
        assert_eq!(compute_seconds(u64::MAX, FrequencyUnit::Seconds), Some(u64::MAX));
        assert_eq!(compute_seconds(u64::MAX / 59, FrequencyUnit::Minutes), None);
        assert_eq!(compute_seconds(u64::MAX / 60, FrequencyUnit::Hours), None);
    }

    #[test]
    fn default_config_polls_every_ten_minutes() {
        let cli = Cli::parse_from(["freshoffthebuild"]);
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(config.source.as_str(), DEFAULT_SOURCE);
        assert_eq!(config.interval(), Duration::from_secs(600));
    }

    #[test]
    fn cli_flags_override_defaults() {
        let cli = Cli::parse_from([
            "freshoffthebuild",
            "-s",
            "http://localhost:8000",
            "-f",
            "2",
            "-u",
            "hours",
        ]);
        let config = Config::from_cli(&cli).unwrap();
        assert_eq!(config.source.as_str(), "http://localhost:8000/");
        assert_eq!(config.frequency, 2);
        assert_eq!(config.unit, FrequencyUnit::Hours);
        assert_eq!(config.seconds(), 7200);
    }

    #[test]
    fn unknown_unit_is_rejected_by_the_parser() {
        let result = Cli::try_parse_from(["freshoffthebuild", "-u", "fortnights"]);
        assert!(result.is_err());
    }

    #[test]
    fn malformed_source_is_fatal() {
        let err = Config::new("not a url", 10, FrequencyUnit::Minutes).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSource(_)));
    }

    #[test]
    fn non_base_source_is_rejected() {
        let err = Config::new("mailto:someone@example.com", 10, FrequencyUnit::Minutes).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSource(_)));
    }

    #[test]
    fn zero_frequency_is_rejected() {
        let err = Config::new(DEFAULT_SOURCE, 0, FrequencyUnit::Seconds).unwrap_err();
        assert_eq!(err, ConfigError::InvalidFrequency("0".into()));
    }

    #[test]
    fn oversized_frequency_is_rejected_in_every_unit() {
        for (frequency, unit) in [
            (u64::MAX, FrequencyUnit::Seconds),
            (u64::MAX, FrequencyUnit::Minutes),
            (u64::MAX / 60, FrequencyUnit::Hours),
            (MAX_INTERVAL_SECS + 1, FrequencyUnit::Seconds),
            (MAX_INTERVAL_SECS / 3600 + 1, FrequencyUnit::Hours),
        ] {
            let err = Config::new(DEFAULT_SOURCE, frequency, unit).unwrap_err();
            assert_eq!(err, ConfigError::InvalidFrequency(frequency.to_string()));
        }
    }

    #[test]
    fn one_year_is_the_longest_cycle() {
        let config = Config::new(DEFAULT_SOURCE, MAX_INTERVAL_SECS / 3600, FrequencyUnit::Hours).unwrap();
        assert_eq!(config.interval(), Duration::from_secs(MAX_INTERVAL_SECS));
        // Far enough in the future to still be representable.
        assert!(Instant::now().checked_add(config.interval()).is_some());
    }

    #[test]
    fn search_url_replaces_source_path() {
        let config = Config::new("https://example.com/some/page?x=1", 1, FrequencyUnit::Seconds).unwrap();
        assert_eq!(config.search_url().as_str(), "https://example.com/api/search");
    }

    #[test]
    fn unit_cycles_in_both_directions() {
        for unit in [FrequencyUnit::Seconds, FrequencyUnit::Minutes, FrequencyUnit::Hours] {
            assert_eq!(unit.next().previous(), unit);
        }
        assert_eq!(FrequencyUnit::Hours.next(), FrequencyUnit::Seconds);
    }
}
