//! Embedding configuration.
//!
//! `EmbedConfig` controls the knobs of a [`WindowedBrowserHost`](crate::host::WindowedBrowserHost):
//! which platform formulas to use, how long the re-attach debounce waits, forced scale
//! overrides for environments where the windowing toolkit and the application both
//! apply HiDPI scaling, and the input synthesis constants.
//!
//! `EmbedConfig` provides defaults via [`Default`] and a fluent
//! [`EmbedConfig::builder()`] for customization with validation.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use gosub_embed::config::EmbedConfig;
//! let cfg = EmbedConfig::default();
//! assert_eq!(cfg.debounce_delay.as_millis(), 100);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use gosub_embed::config::EmbedConfig;
//! use gosub_embed::platform::PlatformFamily;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = EmbedConfig::builder()
//!     .platform(PlatformFamily::Linux)
//!     .forced_scale(2.0)
//!     .axis_scale_divisor(2.0)
//!     .build()?;
//! # Ok(()) }
//! ```
//!
//! # Environment
//!
//! [`EmbedConfig::with_env_overrides`] reads `GOSUB_EMBED_FORCE_SCALE` and
//! `GOSUB_EMBED_AXIS_DIVISOR`. Both depend on the DPI mode the surrounding application
//! runs in, which is why they are not hard coded per platform.

use crate::platform::PlatformFamily;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ENV_FORCE_SCALE: &str = "GOSUB_EMBED_FORCE_SCALE";
pub const ENV_AXIS_DIVISOR: &str = "GOSUB_EMBED_AXIS_DIVISOR";

/// Log level for the embedding layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Platform family whose formulas are used. `None` detects from the build target.
    pub platform: Option<PlatformFamily>,
    /// Delay of the re-attach / re-assert timer.
    #[serde(with = "duration_ms")]
    pub debounce_delay: Duration,
    /// Global device scale that overrides whatever the container reports.
    pub forced_scale: Option<f64>,
    /// Divisor applied to one axis of the browser rectangle on the Linux family.
    pub axis_scale_divisor: f64,
    /// Number of slots in the click counter (buttons are mapped modulo this).
    pub click_slots: usize,
    /// Multi-click interval used when the toolkit does not report one.
    #[serde(with = "duration_ms")]
    pub default_multi_click_interval: Duration,
    /// Units per wheel notch in synthesized scroll events.
    pub wheel_scroll_units: u32,
    pub log_level: LogLevel,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            platform: None,
            debounce_delay: Duration::from_millis(100),
            forced_scale: None,
            axis_scale_divisor: 1.0,
            click_slots: 5,
            default_multi_click_interval: Duration::from_millis(500),
            wheel_scroll_units: 3,
            log_level: LogLevel::default(),
        }
    }
}

impl EmbedConfig {
    pub fn builder() -> EmbedConfigBuilder {
        EmbedConfigBuilder::default()
    }

    /// Parse a JSON document and validate the result. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<EmbedConfig, ConfigError> {
        let cfg: EmbedConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        validate(&cfg)?;
        Ok(cfg)
    }

    /// Apply the DPI related environment variables on top of this config.
    pub fn with_env_overrides(self) -> Result<EmbedConfig, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<EmbedConfig, ConfigError> {
        if let Some(raw) = lookup(ENV_FORCE_SCALE) {
            let scale = parse_f64(ENV_FORCE_SCALE, &raw)?;
            self.forced_scale = Some(scale);
        }
        if let Some(raw) = lookup(ENV_AXIS_DIVISOR) {
            self.axis_scale_divisor = parse_f64(ENV_AXIS_DIVISOR, &raw)?;
        }
        validate(&self)?;
        Ok(self)
    }

    /// Check a config that was put together by hand.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self)
    }

    /// Install the crate's `env_logger` backend at [`EmbedConfig::log_level`].
    pub fn init_logging(&self) {
        crate::logging::init(self.log_level);
    }

    /// The platform family in effect for this config.
    pub fn platform_family(&self) -> PlatformFamily {
        self.platform.unwrap_or_else(PlatformFamily::current)
    }
}

fn parse_f64(key: &'static str, raw: &str) -> Result<f64, ConfigError> {
    raw.trim().parse::<f64>().map_err(|_| ConfigError::InvalidEnv {
        key,
        value: raw.to_string(),
    })
}

/// Builder for [`EmbedConfig`].
#[derive(Debug, Clone, Default)]
pub struct EmbedConfigBuilder {
    inner: EmbedConfig,
}

impl EmbedConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut EmbedConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn platform(self, family: PlatformFamily) -> Self { self.map(|c| c.platform = Some(family)) }
    pub fn debounce_delay(self, delay: Duration) -> Self { self.map(|c| c.debounce_delay = delay) }
    pub fn forced_scale(self, scale: f64) -> Self { self.map(|c| c.forced_scale = Some(scale)) }
    pub fn axis_scale_divisor(self, divisor: f64) -> Self { self.map(|c| c.axis_scale_divisor = divisor) }
    pub fn click_slots(self, n: usize) -> Self { self.map(|c| c.click_slots = n) }
    pub fn default_multi_click_interval(self, interval: Duration) -> Self { self.map(|c| c.default_multi_click_interval = interval) }
    pub fn wheel_scroll_units(self, units: u32) -> Self { self.map(|c| c.wheel_scroll_units = units) }
    pub fn log_level(self, level: LogLevel) -> Self { self.map(|c| c.log_level = level) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut EmbedConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<EmbedConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("forced_scale {0} must be a positive number")]
    InvalidForcedScale(f64),
    #[error("axis_scale_divisor {0} must be a positive number")]
    InvalidAxisDivisor(f64),
    #[error("click_slots must be at least 1")]
    ZeroClickSlots,
    #[error("debounce_delay must be non-zero")]
    ZeroDebounce,
    #[error("cannot parse {key}={value:?} as a number")]
    InvalidEnv { key: &'static str, value: String },
    #[error("cannot parse config: {0}")]
    Parse(String),
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn validate(c: &EmbedConfig) -> Result<(), ConfigError> {
    if let Some(scale) = c.forced_scale {
        if !positive(scale) {
            return Err(ConfigError::InvalidForcedScale(scale));
        }
    }
    if !positive(c.axis_scale_divisor) {
        return Err(ConfigError::InvalidAxisDivisor(c.axis_scale_divisor));
    }
    if c.click_slots == 0 {
        return Err(ConfigError::ZeroClickSlots);
    }
    if c.debounce_delay.is_zero() {
        return Err(ConfigError::ZeroDebounce);
    }
    Ok(())
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
