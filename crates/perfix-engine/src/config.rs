//! Profiler configuration, validation, and error types.
//!
//! [`ProfilerConfig`] carries the cadences and thresholds the controller
//! runs with. [`validate()`](ProfilerConfig::validate) checks them once at
//! context construction; nothing on the per-tick path re-validates.

use std::error::Error;
use std::fmt;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`ProfilerConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A cadence in seconds is NaN, infinite, zero, or negative.
    InvalidInterval {
        /// Name of the offending field.
        field: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// A spike threshold is NaN, infinite, zero, or negative.
    InvalidThreshold {
        /// Name of the offending field.
        field: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// The severe threshold sits below the warn threshold.
    ThresholdOrder {
        /// Configured warn threshold (ms).
        warn_ms: f64,
        /// Configured severe threshold (ms).
        severe_ms: f64,
    },
    /// The spike window holds no samples.
    EmptySpikeWindow,
    /// The spawn minimum gap is zero, which would never throttle.
    ZeroSpawnGap,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInterval { field, value } => {
                write!(f, "{field} must be finite and positive, got {value}")
            }
            Self::InvalidThreshold { field, value } => {
                write!(f, "{field} must be finite and positive, got {value}")
            }
            Self::ThresholdOrder { warn_ms, severe_ms } => write!(
                f,
                "severe_threshold_ms ({severe_ms}) is below warn_threshold_ms ({warn_ms})"
            ),
            Self::EmptySpikeWindow => write!(f, "spike_window_len must be at least 1"),
            Self::ZeroSpawnGap => write!(f, "spawn_min_gap must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

// ── ProfilerConfig ─────────────────────────────────────────────────

/// Cadences and thresholds for a [`ProfilerContext`](crate::ProfilerContext).
#[derive(Clone, Debug, PartialEq)]
pub struct ProfilerConfig {
    /// Simulated seconds between settings refreshes. Default: 0.25.
    pub settings_refresh_secs: f64,
    /// Simulated seconds between reports. Default: 0.5.
    pub report_interval_secs: f64,
    /// Wall frame durations kept for trend detection. Default: 60.
    pub spike_window_len: usize,
    /// A frame longer than this (ms) is a visible hitch. Default: 20.0.
    pub warn_threshold_ms: f64,
    /// A frame longer than this (ms) drops below ~30 fps. Default: 33.33.
    pub severe_threshold_ms: f64,
    /// Minimum ticks between two runs of an interval-gated call. Default: 2.
    pub spawn_min_gap: u64,
    /// Draw calls attributed to an active shader layer. Default: 5.
    pub shader_draw_call_cost: u32,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            settings_refresh_secs: 0.25,
            report_interval_secs: 0.5,
            spike_window_len: 60,
            warn_threshold_ms: 20.0,
            severe_threshold_ms: 33.33,
            spawn_min_gap: 2,
            shader_draw_call_cost: 5,
        }
    }
}

impl ProfilerConfig {
    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive(self.settings_refresh_secs).map_err(|value| {
            ConfigError::InvalidInterval {
                field: "settings_refresh_secs",
                value,
            }
        })?;
        check_positive(self.report_interval_secs).map_err(|value| {
            ConfigError::InvalidInterval {
                field: "report_interval_secs",
                value,
            }
        })?;
        if self.spike_window_len == 0 {
            return Err(ConfigError::EmptySpikeWindow);
        }
        check_positive(self.warn_threshold_ms).map_err(|value| {
            ConfigError::InvalidThreshold {
                field: "warn_threshold_ms",
                value,
            }
        })?;
        check_positive(self.severe_threshold_ms).map_err(|value| {
            ConfigError::InvalidThreshold {
                field: "severe_threshold_ms",
                value,
            }
        })?;
        if self.severe_threshold_ms < self.warn_threshold_ms {
            return Err(ConfigError::ThresholdOrder {
                warn_ms: self.warn_threshold_ms,
                severe_ms: self.severe_threshold_ms,
            });
        }
        if self.spawn_min_gap == 0 {
            return Err(ConfigError::ZeroSpawnGap);
        }
        Ok(())
    }
}

fn check_positive(v: f64) -> Result<(), f64> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(v)
    }
}
