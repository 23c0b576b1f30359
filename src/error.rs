//! Error types used by the scheduler.
//!
//! This module defines two enums:
//!
//! - [`ConfigError`]: a configuration was rejected at construction time.
//! - [`ActionError`]: the user action failed inside a monitoring task.
//!
//! Both provide `as_label` for logs/metrics. Nothing on the `invoke`/`flush`/`cancel`
//! path returns an error: those operations are total once a scheduler exists.

use std::time::Duration;
use thiserror::Error;

use crate::events::Edge;

/// # Errors produced while building a scheduler.
///
/// Construction fails fast instead of handing an unusable duration to the timer.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The quiet period is too large to be scheduled from the current instant.
    #[error("quiet period {period:?} cannot be scheduled")]
    QuietPeriodTooLong {
        /// The rejected quiet period.
        period: Duration,
    },

    /// The max wait ceiling is too large to be scheduled from the current instant.
    #[error("max wait {max_wait:?} cannot be scheduled")]
    MaxWaitTooLong {
        /// The rejected ceiling.
        max_wait: Duration,
    },

    /// A duration given as signed seconds was negative, not finite, or out of range.
    #[error("{field} must be a finite, non-negative number of seconds (got {secs})")]
    InvalidSeconds {
        /// Name of the configuration field.
        field: &'static str,
        /// The rejected value.
        secs: f64,
    },

    /// No tokio runtime is available to host monitoring tasks.
    #[error("no tokio runtime available; build inside a runtime or pass a handle")]
    NoRuntime,
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use debouncer::ConfigError;
    ///
    /// assert_eq!(ConfigError::NoRuntime.as_label(), "config_no_runtime");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::QuietPeriodTooLong { .. } => "config_quiet_period_too_long",
            ConfigError::MaxWaitTooLong { .. } => "config_max_wait_too_long",
            ConfigError::InvalidSeconds { .. } => "config_invalid_seconds",
            ConfigError::NoRuntime => "config_no_runtime",
        }
    }
}

/// # Errors produced by a single action execution.
///
/// The monitoring task never propagates these to callers; it publishes them as
/// [`EventKind::ActionFailed`](crate::EventKind::ActionFailed) and releases its guard.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The action panicked; the panic was caught at the task boundary.
    #[error("action panicked on {edge} edge: {message}")]
    Panicked {
        /// Edge that was firing.
        edge: Edge,
        /// Panic payload, if it was a string.
        message: String,
    },

    /// The blocking worker running the action was cancelled before finishing.
    #[error("action aborted on {edge} edge")]
    Aborted {
        /// Edge that was firing.
        edge: Edge,
    },
}

impl ActionError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ActionError::Panicked { .. } => "action_panicked",
            ActionError::Aborted { .. } => "action_aborted",
        }
    }

    /// Edge on which the failing execution ran.
    pub fn edge(&self) -> Edge {
        match self {
            ActionError::Panicked { edge, .. } | ActionError::Aborted { edge } => *edge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        let err = ConfigError::QuietPeriodTooLong {
            period: Duration::MAX,
        };
        assert_eq!(err.as_label(), "config_quiet_period_too_long");

        let err = ActionError::Aborted {
            edge: Edge::Trailing,
        };
        assert_eq!(err.as_label(), "action_aborted");
        assert_eq!(err.edge(), Edge::Trailing);
    }

    #[test]
    fn test_display_mentions_field() {
        let err = ConfigError::InvalidSeconds {
            field: "quiet_period",
            secs: -1.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("quiet_period"));
        assert!(msg.contains("-1.5"));
    }

    #[test]
    fn test_panicked_display() {
        let err = ActionError::Panicked {
            edge: Edge::Leading,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "action panicked on leading edge: boom");
    }
}
