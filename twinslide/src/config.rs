//! Slider configuration.
//!
//! [`SliderConfig`] is an immutable value: the controller replaces it as a
//! whole whenever the host reconfigures, then re-confines the current values
//! against it. Untyped sources (files, a sync channel) go through
//! [`RawSliderConfig`] and [`SliderConfig::from_raw`], which is where malformed
//! input is rejected.

use std::time::Duration;

use derive_setters::Setters;
use thiserror::Error;

use crate::{
    callback::LabelFormatter,
    confine::{StepSize, ValueConfiner},
    geometry::ValueRange,
    key_repeat::RepeatDelays,
};

/// What happens when a knob is moved past the other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "kebab-case")
)]
pub enum CrossoverPolicy {
    /// Allow `low > high` and report it with a warning.
    #[default]
    Report,
    /// Stop the moving knob at the stationary knob's value.
    Clamp,
}

/// Complete configuration of a range slider.
///
/// ```
/// use twinslide::config::SliderConfig;
///
/// let config = SliderConfig::default()
///     .range_min(-50.0)
///     .range_max(50.0)
///     .step_size(5.0)
///     .label_count(4)
///     .label_suffix(" dB");
/// assert_eq!(config.range().total(), 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Setters)]
pub struct SliderConfig {
    /// Lower bound of the range.
    pub range_min: f64,
    /// Upper bound of the range.
    pub range_max: f64,
    /// Requested step. Normalized by [`SliderConfig::step`].
    pub step_size: f64,
    /// Number of tick intervals; `0` hides the ticks.
    pub tick_count: usize,
    /// Number of label intervals; `0` hides the labels.
    pub label_count: usize,
    /// Whether the slider reacts to input.
    pub enabled: bool,
    /// Renders normally but ignores input.
    pub read_only: bool,
    /// Asks the host to synchronize commits at once instead of batching.
    pub immediate: bool,
    /// Reports every intermediate drag position to the host.
    pub super_immediate: bool,
    /// Text appended to every label.
    #[setters(into)]
    pub label_suffix: String,
    /// Produces label text.
    #[setters(skip)]
    pub label_formatter: LabelFormatter,
    /// Handling of `low > high`.
    pub crossover_policy: CrossoverPolicy,
    /// Held-key repeat timing.
    pub key_repeat: RepeatDelays,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            range_min: 0.0,
            range_max: 100.0,
            step_size: 10.0,
            tick_count: 0,
            label_count: 0,
            enabled: true,
            read_only: false,
            immediate: false,
            super_immediate: false,
            label_suffix: String::new(),
            label_formatter: LabelFormatter::default(),
            crossover_policy: CrossoverPolicy::default(),
            key_repeat: RepeatDelays::default(),
        }
    }
}

impl SliderConfig {
    /// Sets the label formatter.
    pub fn label_formatter<F>(mut self, format: F) -> Self
    where
        F: Fn(f64, &str) -> String + Send + Sync + 'static,
    {
        self.label_formatter = LabelFormatter::new(format);
        self
    }

    /// Sets the label formatter from an existing shared handle.
    pub fn label_formatter_shared(mut self, formatter: LabelFormatter) -> Self {
        self.label_formatter = formatter;
        self
    }

    /// The configured range.
    pub fn range(&self) -> ValueRange {
        ValueRange::new(self.range_min, self.range_max)
    }

    /// The normalized step.
    pub fn step(&self) -> StepSize {
        StepSize::new(self.step_size)
    }

    /// A confiner for the configured range and step.
    pub fn confiner(&self) -> ValueConfiner {
        ValueConfiner::new(self.range(), self.step())
    }

    /// Whether pointer and keyboard input should be handled.
    pub fn accepts_input(&self) -> bool {
        self.enabled && !self.read_only
    }

    /// Number of steps a modified (ctrl) arrow key moves: a tenth of the
    /// steps in the range, at least one.
    pub fn coarse_multiplier(&self) -> u32 {
        let steps = self.range().total() / self.step().get() / 10.0;
        // Float to int casts saturate, so huge ranges cannot overflow.
        (steps.floor() as u32).max(1)
    }

    /// Builds a configuration from untyped input, starting from defaults.
    pub fn from_raw(raw: RawSliderConfig) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(min) = raw.range_min {
            config.range_min = finite_bound("range-min", min)?;
        }
        if let Some(max) = raw.range_max {
            config.range_max = finite_bound("range-max", max)?;
        }
        if let Some(step) = raw.step_size {
            config.step_size = step;
        }
        if let Some(count) = raw.tick_count {
            config.tick_count =
                usize::try_from(count).map_err(|_| ConfigError::NegativeTickCount(count))?;
        }
        if let Some(count) = raw.label_count {
            config.label_count =
                usize::try_from(count).map_err(|_| ConfigError::NegativeLabelCount(count))?;
        }
        if let Some(enabled) = raw.enabled {
            config.enabled = enabled;
        }
        if let Some(read_only) = raw.read_only {
            config.read_only = read_only;
        }
        if let Some(immediate) = raw.immediate {
            config.immediate = immediate;
        }
        if let Some(super_immediate) = raw.super_immediate {
            config.super_immediate = super_immediate;
        }
        if let Some(suffix) = raw.label_suffix {
            config.label_suffix = suffix;
        }
        if let Some(policy) = raw.crossover_policy {
            config.crossover_policy = policy;
        }
        if let Some(ms) = raw.initial_delay_ms {
            config.key_repeat.initial = Duration::from_millis(ms);
        }
        if let Some(ms) = raw.repeat_delay_ms {
            config.key_repeat.repeat = Duration::from_millis(ms);
        }
        Ok(config)
    }
}

fn finite_bound(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFiniteBound { name, value })
    }
}

/// Untyped configuration as it arrives from a file or a sync channel.
///
/// Every field is optional; missing fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "kebab-case")
)]
pub struct RawSliderConfig {
    /// See [`SliderConfig::range_min`]. Must be finite.
    pub range_min: Option<f64>,
    /// See [`SliderConfig::range_max`]. Must be finite.
    pub range_max: Option<f64>,
    /// See [`SliderConfig::step_size`].
    pub step_size: Option<f64>,
    /// See [`SliderConfig::tick_count`]. Must not be negative.
    pub tick_count: Option<i64>,
    /// See [`SliderConfig::label_count`]. Must not be negative.
    pub label_count: Option<i64>,
    /// See [`SliderConfig::enabled`].
    pub enabled: Option<bool>,
    /// See [`SliderConfig::read_only`].
    pub read_only: Option<bool>,
    /// See [`SliderConfig::immediate`].
    pub immediate: Option<bool>,
    /// See [`SliderConfig::super_immediate`].
    pub super_immediate: Option<bool>,
    /// See [`SliderConfig::label_suffix`].
    pub label_suffix: Option<String>,
    /// See [`SliderConfig::crossover_policy`].
    pub crossover_policy: Option<CrossoverPolicy>,
    /// Initial key repeat delay in milliseconds.
    pub initial_delay_ms: Option<u64>,
    /// Key repeat interval in milliseconds.
    pub repeat_delay_ms: Option<u64>,
}

/// Malformed configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A negative number of tick intervals.
    #[error("tick count must not be negative, got {0}")]
    NegativeTickCount(i64),
    /// A negative number of label intervals.
    #[error("label count must not be negative, got {0}")]
    NegativeLabelCount(i64),
    /// An infinite or `NaN` range bound.
    #[error("{name} must be finite, got {value}")]
    NonFiniteBound {
        /// Key of the offending bound.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Configuration and values owned by the host, applied without a commit.
#[derive(Debug, Clone, PartialEq)]
pub struct HostState {
    /// Configuration to apply.
    pub config: SliderConfig,
    /// Host-side low value, confined on arrival.
    pub low: f64,
    /// Host-side high value, confined on arrival.
    pub high: f64,
}
