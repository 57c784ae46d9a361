//! Configuration loaded from environment variables.
//!
//! Everything here has a sensible default so the aggregators work out of
//! the box; the environment only needs to override what differs per
//! deployment (mostly the user's timezone).

use std::env;
use std::time::Duration;

use chrono::Weekday;
use chrono_tz::Tz;

use crate::logging::LogFormat;
use crate::services::activity_level::{ActivityWeights, DEFAULT_WINDOW_DAYS};
use crate::services::feed::{FeedConfig, DEFAULT_PAGE_SIZE};
use crate::time_utils::parse_timezone;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Reference timezone for day normalisation
    pub timezone: Tz,
    /// First day of a comparison week
    pub week_start: Weekday,
    /// Items requested per feed page
    pub page_size: usize,
    /// Optional upper bound on a single page fetch
    pub fetch_timeout: Option<Duration>,
    /// Trailing window shown by the activity heatmap
    pub heatmap_days: usize,
    /// Activity weight of one logged meal
    pub meal_weight: u32,
    /// Activity weight of one workout session
    pub workout_weight: u32,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            week_start: Weekday::Sun,
            page_size: DEFAULT_PAGE_SIZE,
            fetch_timeout: None,
            heatmap_days: DEFAULT_WINDOW_DAYS,
            meal_weight: 1,
            workout_weight: 2,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// [`Config::default`] for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();
        let config = Self {
            timezone: parse_var("FITLOG_TIMEZONE", defaults.timezone, |v| {
                parse_timezone(v).ok()
            })?,
            week_start: parse_var("FITLOG_WEEK_START", defaults.week_start, |v| {
                v.parse::<Weekday>().ok()
            })?,
            page_size: parse_var("FITLOG_PAGE_SIZE", defaults.page_size, |v| {
                v.parse::<usize>().ok().filter(|n| *n > 0)
            })?,
            fetch_timeout: match env::var("FITLOG_FETCH_TIMEOUT_SECS") {
                Ok(raw) => Some(Duration::from_secs(raw.trim().parse().map_err(|_| {
                    ConfigError::Invalid {
                        var: "FITLOG_FETCH_TIMEOUT_SECS",
                        value: raw.clone(),
                    }
                })?)),
                Err(_) => defaults.fetch_timeout,
            },
            heatmap_days: parse_var("FITLOG_HEATMAP_DAYS", defaults.heatmap_days, |v| {
                v.parse::<usize>().ok().filter(|n| *n > 0)
            })?,
            meal_weight: parse_var("FITLOG_MEAL_WEIGHT", defaults.meal_weight, parse_weight)?,
            workout_weight: parse_var(
                "FITLOG_WORKOUT_WEIGHT",
                defaults.workout_weight,
                parse_weight,
            )?,
            log_format: parse_var("FITLOG_LOG_FORMAT", defaults.log_format, |v| {
                v.parse::<LogFormat>().ok()
            })?,
        };

        tracing::info!(
            timezone = %config.timezone,
            week_start = %config.week_start,
            page_size = config.page_size,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Settings for a [`PaginatedFeed`](crate::services::PaginatedFeed).
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            page_size: self.page_size,
            fetch_timeout: self.fetch_timeout,
        }
    }

    /// Weights applied when turning logs into heatmap activity.
    pub fn activity_weights(&self) -> ActivityWeights {
        ActivityWeights {
            meal: self.meal_weight,
            workout: self.workout_weight,
        }
    }
}

/// Read `var`, returning `default` when unset and an error when set to
/// something `parse` rejects.
fn parse_var<T>(
    var: &'static str,
    default: T,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(raw) => parse(raw.trim()).ok_or(ConfigError::Invalid { var, value: raw }),
        Err(_) => Ok(default),
    }
}

fn parse_weight(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|w| *w >= 1)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}
