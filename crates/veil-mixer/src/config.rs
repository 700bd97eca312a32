//! Mixer configuration.
//!
//! Defaults match the engine's privacy parameters. Override via environment
//! variables or explicit construction.

use chrono::TimeDelta;
use veil_core::Amount;

/// Largest accepted `min_aging_hours` (one year).
pub const MAX_MIN_AGING_HOURS: u64 = 24 * 365;

/// Largest accepted `avg_delay_hours` (thirty days).
pub const MAX_AVG_DELAY_HOURS: f64 = 24.0 * 30.0;

/// Largest accepted `jitter_minutes` (one day).
pub const MAX_JITTER_MINUTES: u64 = 24 * 60;

/// Tunables for splitting and scheduling.
#[derive(Debug, Clone, PartialEq)]
pub struct MixerConfig {
    /// Minimum delay before the first fragment may be released, in hours.
    pub min_aging_hours: u64,
    /// Mean of the exponential inter-arrival delay, in hours.
    pub avg_delay_hours: f64,
    /// Half-width of the symmetric release jitter, in minutes.
    pub jitter_minutes: u64,
    /// Totals below this are returned as a single fragment.
    pub min_fragmentable: Amount,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            min_aging_hours: 24,
            avg_delay_hours: 4.0,
            jitter_minutes: 30,
            min_fragmentable: Amount::from_units(1_000),
        }
    }
}

impl MixerConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables (unset, unparseable, or out-of-range values keep the
    /// default):
    /// - `VEIL_MIN_AGING_HOURS` (default: 24, at most [`MAX_MIN_AGING_HOURS`])
    /// - `VEIL_AVG_DELAY_HOURS` (default: 4, positive, at most [`MAX_AVG_DELAY_HOURS`])
    /// - `VEIL_JITTER_MINUTES` (default: 30, at most [`MAX_JITTER_MINUTES`])
    /// - `VEIL_MIN_FRAGMENTABLE` (default: 0.1)
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |var: &str| lookup(var).map(|s| s.trim().to_string());
        Self {
            min_aging_hours: parse("VEIL_MIN_AGING_HOURS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|h| *h <= MAX_MIN_AGING_HOURS)
                .unwrap_or(defaults.min_aging_hours),
            avg_delay_hours: parse("VEIL_AVG_DELAY_HOURS")
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|h| h.is_finite() && *h > 0.0 && *h <= MAX_AVG_DELAY_HOURS)
                .unwrap_or(defaults.avg_delay_hours),
            jitter_minutes: parse("VEIL_JITTER_MINUTES")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|m| *m <= MAX_JITTER_MINUTES)
                .unwrap_or(defaults.jitter_minutes),
            min_fragmentable: parse("VEIL_MIN_FRAGMENTABLE")
                .and_then(|s| Amount::parse(&s).ok())
                .unwrap_or(defaults.min_fragmentable),
        }
    }

    /// Minimum aging as a duration, or `None` if it does not fit a
    /// [`TimeDelta`].
    pub fn min_aging(&self) -> Option<TimeDelta> {
        i64::try_from(self.min_aging_hours)
            .ok()
            .and_then(TimeDelta::try_hours)
    }

    /// Mean inter-arrival delay in seconds. Negative or NaN means zero.
    pub fn avg_delay_secs(&self) -> f64 {
        if self.avg_delay_hours.is_nan() {
            return 0.0;
        }
        self.avg_delay_hours.max(0.0) * 3600.0
    }

    /// Jitter half-width in seconds.
    pub fn jitter_secs(&self) -> f64 {
        self.jitter_minutes as f64 * 60.0
    }
}
