//! calfeed configuration.
//!
//! Layers, lowest first: built-in defaults, an optional `calfeed.toml`,
//! then `CALFEED_*` environment variables for scalar keys. The loaded value is
//! never mutated by the pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use chrono_tz::Tz;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::aggregate::CalendarSettings;
use crate::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_FUTURE_DAYS, DEFAULT_OUTPUT_PATH, DEFAULT_PAST_DAYS,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::date_range::DateRange;
use crate::error::{FeedError, FeedResult};
use crate::fetch::FetchSettings;
use crate::source::{FeedSource, builtin_sources};

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_past_days() -> i64 {
    DEFAULT_PAST_DAYS
}

fn default_future_days() -> i64 {
    DEFAULT_FUTURE_DAYS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregatorConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default = "default_past_days")]
    pub past_days: i64,

    #[serde(default = "default_future_days")]
    pub future_days: i64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// IANA zone used for floating times and all-day dates.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "builtin_sources")]
    pub sources: Vec<FeedSource>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        AggregatorConfig {
            output: default_output(),
            past_days: default_past_days(),
            future_days: default_future_days(),
            timeout_secs: default_timeout_secs(),
            timezone: default_timezone(),
            user_agent: default_user_agent(),
            sources: builtin_sources(),
        }
    }
}

impl AggregatorConfig {
    /// Load configuration.
    ///
    /// With an explicit `path` the file must exist. Without one,
    /// `calfeed.toml` in the working directory is used if present.
    pub fn load(path: Option<&Path>) -> FeedResult<Self> {
        let file = match path {
            Some(path) => File::from(path.to_path_buf()).required(true),
            None => File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false),
        };

        Self::build(
            Config::builder()
                .add_source(file)
                .add_source(Environment::with_prefix("CALFEED").try_parsing(true)),
        )
    }

    /// Parse configuration from TOML text, without consulting the environment.
    pub fn from_toml_str(content: &str) -> FeedResult<Self> {
        Self::build(Config::builder().add_source(File::from_str(content, FileFormat::Toml)))
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> FeedResult<Self> {
        let config: AggregatorConfig = builder
            .build()
            .map_err(|e| FeedError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| FeedError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FeedResult<()> {
        if self.past_days < 0 || self.future_days < 0 {
            return Err(FeedError::Config(
                "past_days and future_days must not be negative".into(),
            ));
        }
        DateRange::around(Utc::now(), self.past_days, self.future_days)?;

        if self.timeout_secs == 0 {
            return Err(FeedError::Config("timeout_secs must be at least 1".into()));
        }

        self.tz()?;

        for source in &self.sources {
            source.validate()?;
        }

        Ok(())
    }

    fn tz(&self) -> FeedResult<Tz> {
        self.timezone
            .parse()
            .map_err(|_| FeedError::Config(format!("Unknown timezone '{}'", self.timezone)))
    }

    /// Output path with `~` expanded.
    pub fn output_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.output.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn calendar_settings(&self) -> FeedResult<CalendarSettings> {
        Ok(CalendarSettings {
            past_days: self.past_days,
            future_days: self.future_days,
            timezone: self.tz()?,
        })
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}
