//! # Scheduler configuration.
//!
//! Provides [`Config`], the full set of knobs for one [`Scheduler`](crate::Scheduler),
//! and [`Options`], the edge/ceiling subset taken by [`Scheduler::new`](crate::Scheduler::new).
//!
//! ## Sentinel values
//! - `max_wait = 0s` → no deadline (treated as `None` by [`Config::deadline`])
//! - `bus_capacity = 0` → clamped to 1
//!
//! ## Presets
//! - [`Config::debounce`] → trailing edge only
//! - [`Config::throttle`] → leading edge only, `max_wait = min_interval`,
//!   quiet period of [`THROTTLE_QUIET_PERIOD`]

use std::time::Duration;

use tokio::time::Instant;

use crate::error::ConfigError;

/// Quiet period used by the throttle preset.
///
/// Far longer than any realistic burst, so a throttled burst is always
/// resolved by its deadline rather than by going quiet.
pub const THROTTLE_QUIET_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Where the action runs when a burst fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActionMode {
    /// Run the action directly on the monitoring task.
    #[default]
    Inline,
    /// Run the action on tokio's blocking pool and await its completion.
    ///
    /// Use for slow or blocking actions so they do not stall runtime workers.
    Blocking,
}

/// Edge and ceiling options.
///
/// `max_wait = None` (or `Some(Duration::ZERO)`) means a burst is only resolved
/// by going quiet, by [`flush`](crate::Scheduler::flush) or by
/// [`cancel`](crate::Scheduler::cancel).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    /// Fire on the first invoke of a burst.
    pub leading: bool,
    /// Fire once the quiet period elapses.
    pub trailing: bool,
    /// Hard ceiling on how long one burst may be extended.
    pub max_wait: Option<Duration>,
}

impl Default for Options {
    /// Trailing edge only, no ceiling.
    fn default() -> Self {
        Self {
            leading: false,
            trailing: true,
            max_wait: None,
        }
    }
}

/// Configuration for a single scheduler.
///
/// ## Field semantics
/// - `quiet_period`: inactivity required before a trailing fire (`0s` = next tick)
/// - `leading` / `trailing`: which edges fire
/// - `max_wait`: per-burst ceiling (`0s` = none)
/// - `action_mode`: run the action inline or on the blocking pool
/// - `bus_capacity`: event bus ring buffer size (min 1)
///
/// All fields are public; prefer the accessors over checking sentinels by hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Required inactivity since the last invoke before a trailing fire.
    pub quiet_period: Duration,

    /// Fire on the first invoke of a burst.
    pub leading: bool,

    /// Fire once the quiet period elapses.
    ///
    /// With `leading` also set, the trailing fire only happens if the burst
    /// saw at least one invoke after the one that started it.
    pub trailing: bool,

    /// Ceiling on how long one burst may be extended, measured from burst start.
    ///
    /// - `Duration::ZERO` = no ceiling
    /// - `> 0` = the burst is released after this long, without firing
    pub max_wait: Duration,

    /// Where the action runs.
    pub action_mode: ActionMode,

    /// Capacity of the event bus broadcast channel.
    ///
    /// Receivers lagging by more than this many events observe `Lagged`.
    pub bus_capacity: usize,
}

impl Config {
    /// Trailing-only debounce with the given quiet period.
    pub fn debounce(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            ..Self::default()
        }
    }

    /// Fires on the first invoke of each `min_interval` window.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use debouncer::Config;
    ///
    /// let cfg = Config::throttle(Duration::from_millis(250));
    /// assert!(cfg.leading && !cfg.trailing);
    /// assert_eq!(cfg.deadline(), Some(Duration::from_millis(250)));
    /// ```
    pub fn throttle(min_interval: Duration) -> Self {
        Self {
            quiet_period: THROTTLE_QUIET_PERIOD,
            leading: true,
            trailing: false,
            max_wait: min_interval,
            ..Self::default()
        }
    }

    /// Builds a config from a quiet period and [`Options`].
    pub fn with_options(quiet_period: Duration, options: Options) -> Self {
        Self {
            quiet_period,
            leading: options.leading,
            trailing: options.trailing,
            max_wait: options.max_wait.unwrap_or(Duration::ZERO),
            ..Self::default()
        }
    }

    /// Returns the edge/ceiling subset of this config.
    pub fn options(&self) -> Options {
        Options {
            leading: self.leading,
            trailing: self.trailing,
            max_wait: self.deadline(),
        }
    }

    /// Returns the per-burst ceiling as an `Option`.
    ///
    /// - `None` → no ceiling
    /// - `Some(d)` → burst released `d` after it started
    #[inline]
    pub fn deadline(&self) -> Option<Duration> {
        if self.max_wait == Duration::ZERO {
            None
        } else {
            Some(self.max_wait)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Checks that every duration can be scheduled from now.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let now = Instant::now();
        if now.checked_add(self.quiet_period).is_none() {
            return Err(ConfigError::QuietPeriodTooLong {
                period: self.quiet_period,
            });
        }
        if let Some(max_wait) = self.deadline()
            && now.checked_add(max_wait).is_none()
        {
            return Err(ConfigError::MaxWaitTooLong { max_wait });
        }
        Ok(())
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `quiet_period = 0s`
    /// - `leading = false`, `trailing = true`
    /// - `max_wait = 0s` (no ceiling)
    /// - `action_mode = Inline`
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            quiet_period: Duration::ZERO,
            leading: false,
            trailing: true,
            max_wait: Duration::ZERO,
            action_mode: ActionMode::Inline,
            bus_capacity: 256,
        }
    }
}

/// Converts signed seconds into a [`Duration`], rejecting negative, NaN,
/// infinite and overflowing values.
pub(crate) fn duration_from_secs(field: &'static str, secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidSeconds { field, secs })
}
