//! Run configuration.
//!
//! # Two types
//!
//! - [`RunSettings`] is the input shape: every field optional, deserialized
//!   from a JSON config file or filled from CLI flags.  Layers are combined
//!   with [`RunSettings::merge`]; later layers win field by field.
//! - [`RunConfig`] is the validated, immutable result handed to the engine.
//!   The only way to obtain one is [`RunSettings::build`] (or the equivalent
//!   `TryFrom`), so an invalid configuration never reaches an emitter.
//!
//! Missing fields fall back to the generator defaults:
//! 1 KiB–10 KiB truncated-normal sizes, 10 msgs/s Poisson arrivals, 10 % of
//! participants emitting, for 60 s.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, GlError, GlResult};

pub const DEFAULT_MIN_MSG_SIZE: usize = 1024;
pub const DEFAULT_MAX_MSG_SIZE: usize = 10_240;
pub const DEFAULT_MSG_RATE: f64 = 10.0;
pub const DEFAULT_EMITTERS_FRACTION: f64 = 0.1;
pub const DEFAULT_SIMULATION_TIME: Duration = Duration::from_secs(60);

/// Longest accepted run: one year.  Keeps `origin + simulation_time`
/// representable on every platform's monotonic clock.
pub const MAX_SIMULATION_TIME: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Range-to-stddev ratio of the truncated-normal size sampler.
///
/// `stddev = (max - min) / DEFAULT_STDDEV_DIVISOR` puts the range bounds 2.5
/// standard deviations from the mean.
pub const DEFAULT_STDDEV_DIVISOR: f64 = 5.0;

// ── Distribution enums ────────────────────────────────────────────────────────

/// Law governing each message's payload length.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeDistribution {
    /// Every integer in `[min, max]` equally likely.
    Uniform,
    /// Normal around the range midpoint, truncated to `[min, max]`.
    #[default]
    #[serde(alias = "tnormal", alias = "gaussian")]
    TruncatedNormal,
}

impl FromStr for SizeDistribution {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uniform" => Ok(Self::Uniform),
            "tnormal" | "truncated-normal" | "truncated_normal" | "gaussian" => {
                Ok(Self::TruncatedNormal)
            }
            _ => Err(ConfigError::UnknownDistribution { kind: "size", name: s.to_owned() }),
        }
    }
}

impl fmt::Display for SizeDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uniform         => "uniform",
            Self::TruncatedNormal => "truncated-normal",
        })
    }
}

/// Law governing the gap between consecutive sends of one emitter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrivalDistribution {
    /// Exponential inter-arrival times (a Poisson process).
    #[default]
    Poisson,
    /// Fixed spacing of `1 / msg_rate`.
    #[serde(alias = "constant")]
    Regular,
}

impl FromStr for ArrivalDistribution {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "poisson" | "exponential" => Ok(Self::Poisson),
            "regular" | "constant" => Ok(Self::Regular),
            _ => Err(ConfigError::UnknownDistribution { kind: "arrival", name: s.to_owned() }),
        }
    }
}

impl fmt::Display for ArrivalDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Poisson => "poisson",
            Self::Regular => "regular",
        })
    }
}

// ── RunSettings ───────────────────────────────────────────────────────────────

/// Unvalidated configuration layer.
///
/// Deserializes from JSON with every field optional; unknown fields are
/// rejected so a typo in a config file fails loudly instead of silently
/// falling back to a default.
///
/// ```json
/// {
///   "min_msg_size": 512,
///   "max_msg_size": 2048,
///   "size_distribution": "uniform",
///   "msg_rate": 5,
///   "arrival_distribution": "poisson",
///   "emitters_fraction": 0.5,
///   "simulation_time": "2m",
///   "seed": 7
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSettings {
    pub min_msg_size:         Option<usize>,
    pub max_msg_size:         Option<usize>,
    pub size_distribution:    Option<SizeDistribution>,
    pub stddev_divisor:       Option<f64>,
    pub msg_rate:             Option<f64>,
    pub arrival_distribution: Option<ArrivalDistribution>,
    pub emitters_fraction:    Option<f64>,
    #[serde(with = "humantime_serde")]
    pub simulation_time:      Option<Duration>,
    pub seed:                 Option<u64>,
    pub record_messages:      Option<bool>,
}

impl RunSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay `other` on top of `self`: every field set in `other` wins.
    pub fn merge(self, other: RunSettings) -> RunSettings {
        RunSettings {
            min_msg_size:         other.min_msg_size.or(self.min_msg_size),
            max_msg_size:         other.max_msg_size.or(self.max_msg_size),
            size_distribution:    other.size_distribution.or(self.size_distribution),
            stddev_divisor:       other.stddev_divisor.or(self.stddev_divisor),
            msg_rate:             other.msg_rate.or(self.msg_rate),
            arrival_distribution: other.arrival_distribution.or(self.arrival_distribution),
            emitters_fraction:    other.emitters_fraction.or(self.emitters_fraction),
            simulation_time:      other.simulation_time.or(self.simulation_time),
            seed:                 other.seed.or(self.seed),
            record_messages:      other.record_messages.or(self.record_messages),
        }
    }

    pub fn msg_sizes(mut self, min: usize, max: usize) -> Self {
        self.min_msg_size = Some(min);
        self.max_msg_size = Some(max);
        self
    }

    pub fn size_distribution(mut self, dist: SizeDistribution) -> Self {
        self.size_distribution = Some(dist);
        self
    }

    pub fn stddev_divisor(mut self, divisor: f64) -> Self {
        self.stddev_divisor = Some(divisor);
        self
    }

    pub fn msg_rate(mut self, rate: f64) -> Self {
        self.msg_rate = Some(rate);
        self
    }

    pub fn arrival_distribution(mut self, dist: ArrivalDistribution) -> Self {
        self.arrival_distribution = Some(dist);
        self
    }

    pub fn emitters_fraction(mut self, fraction: f64) -> Self {
        self.emitters_fraction = Some(fraction);
        self
    }

    pub fn simulation_time(mut self, duration: Duration) -> Self {
        self.simulation_time = Some(duration);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn record_messages(mut self, record: bool) -> Self {
        self.record_messages = Some(record);
        self
    }

    /// Fill defaults and validate every field.
    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let min_msg_size = self.min_msg_size.unwrap_or(DEFAULT_MIN_MSG_SIZE);
        let max_msg_size = self.max_msg_size.unwrap_or(DEFAULT_MAX_MSG_SIZE);
        if min_msg_size == 0 || max_msg_size == 0 {
            return Err(ConfigError::ZeroMessageSize { min: min_msg_size, max: max_msg_size });
        }
        if min_msg_size > max_msg_size {
            return Err(ConfigError::SizeRangeInverted { min: min_msg_size, max: max_msg_size });
        }

        let stddev_divisor = self.stddev_divisor.unwrap_or(DEFAULT_STDDEV_DIVISOR);
        if !(stddev_divisor.is_finite() && stddev_divisor > 0.0) {
            return Err(ConfigError::InvalidStddevDivisor(stddev_divisor));
        }

        let msg_rate = self.msg_rate.unwrap_or(DEFAULT_MSG_RATE);
        if !(msg_rate.is_finite() && msg_rate > 0.0) {
            return Err(ConfigError::InvalidRate(msg_rate));
        }

        let emitters_fraction = self.emitters_fraction.unwrap_or(DEFAULT_EMITTERS_FRACTION);
        if !(emitters_fraction > 0.0 && emitters_fraction <= 1.0) {
            return Err(ConfigError::InvalidEmittersFraction(emitters_fraction));
        }

        let simulation_time = self.simulation_time.unwrap_or(DEFAULT_SIMULATION_TIME);
        if simulation_time.is_zero() {
            return Err(ConfigError::ZeroSimulationTime);
        }
        if simulation_time > MAX_SIMULATION_TIME {
            return Err(ConfigError::SimulationTimeTooLong {
                got: simulation_time,
                max: MAX_SIMULATION_TIME,
            });
        }

        Ok(RunConfig {
            min_msg_size,
            max_msg_size,
            size_distribution:    self.size_distribution.unwrap_or_default(),
            stddev_divisor,
            msg_rate,
            arrival_distribution: self.arrival_distribution.unwrap_or_default(),
            emitters_fraction,
            simulation_time,
            seed:                 self.seed.unwrap_or(0),
            record_messages:      self.record_messages.unwrap_or(true),
        })
    }

    /// Parse a JSON settings layer.  Unknown fields are rejected.
    pub fn from_json_str(text: &str) -> GlResult<Self> {
        serde_json::from_str(text).map_err(|e| GlError::Parse(e.to_string()))
    }

    /// Read a JSON settings layer from `path`.
    pub fn from_json_file(path: &Path) -> GlResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text).map_err(|e| match e {
            GlError::Parse(msg) => GlError::Parse(format!("{}: {msg}", path.display())),
            other => other,
        })
    }
}

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// Validated, immutable run configuration.
///
/// Shared read-only by every emitter (behind an `Arc`).  Fields are private so
/// the invariants checked in [`RunSettings::build`] cannot be broken after
/// construction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunConfig {
    min_msg_size:         usize,
    max_msg_size:         usize,
    size_distribution:    SizeDistribution,
    stddev_divisor:       f64,
    msg_rate:             f64,
    arrival_distribution: ArrivalDistribution,
    emitters_fraction:    f64,
    #[serde(with = "humantime_serde")]
    simulation_time:      Duration,
    seed:                 u64,
    record_messages:      bool,
}

impl RunConfig {
    /// Start from an empty settings layer; finish with `.build()`.
    pub fn builder() -> RunSettings {
        RunSettings::new()
    }

    #[inline]
    pub fn min_msg_size(&self) -> usize {
        self.min_msg_size
    }

    #[inline]
    pub fn max_msg_size(&self) -> usize {
        self.max_msg_size
    }

    #[inline]
    pub fn size_distribution(&self) -> SizeDistribution {
        self.size_distribution
    }

    #[inline]
    pub fn stddev_divisor(&self) -> f64 {
        self.stddev_divisor
    }

    /// Target messages per second, per emitter.
    #[inline]
    pub fn msg_rate(&self) -> f64 {
        self.msg_rate
    }

    #[inline]
    pub fn arrival_distribution(&self) -> ArrivalDistribution {
        self.arrival_distribution
    }

    #[inline]
    pub fn emitters_fraction(&self) -> f64 {
        self.emitters_fraction
    }

    #[inline]
    pub fn simulation_time(&self) -> Duration {
        self.simulation_time
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn record_messages(&self) -> bool {
        self.record_messages
    }

    /// Back to a fully populated settings layer, e.g. to tweak one field.
    pub fn to_settings(&self) -> RunSettings {
        RunSettings {
            min_msg_size:         Some(self.min_msg_size),
            max_msg_size:         Some(self.max_msg_size),
            size_distribution:    Some(self.size_distribution),
            stddev_divisor:       Some(self.stddev_divisor),
            msg_rate:             Some(self.msg_rate),
            arrival_distribution: Some(self.arrival_distribution),
            emitters_fraction:    Some(self.emitters_fraction),
            simulation_time:      Some(self.simulation_time),
            seed:                 Some(self.seed),
            record_messages:      Some(self.record_messages),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            min_msg_size:         DEFAULT_MIN_MSG_SIZE,
            max_msg_size:         DEFAULT_MAX_MSG_SIZE,
            size_distribution:    SizeDistribution::default(),
            stddev_divisor:       DEFAULT_STDDEV_DIVISOR,
            msg_rate:             DEFAULT_MSG_RATE,
            arrival_distribution: ArrivalDistribution::default(),
            emitters_fraction:    DEFAULT_EMITTERS_FRACTION,
            simulation_time:      DEFAULT_SIMULATION_TIME,
            seed:                 0,
            record_messages:      true,
        }
    }
}

impl TryFrom<RunSettings> for RunConfig {
    type Error = ConfigError;

    fn try_from(settings: RunSettings) -> Result<Self, Self::Error> {
        settings.build()
    }
}

impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sizes {}..={} B ({}), {} msg/s ({}), {:.0}% emitters, {:.3}s, seed {}",
            self.min_msg_size,
            self.max_msg_size,
            self.size_distribution,
            self.msg_rate,
            self.arrival_distribution,
            self.emitters_fraction * 100.0,
            self.simulation_time.as_secs_f64(),
            self.seed,
        )
    }
}
