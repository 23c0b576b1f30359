use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::config::{ActionMode, Config, Options, duration_from_secs};
use crate::error::ConfigError;
use crate::events::Bus;
use crate::subscribers::{Subscribe, SubscriberSet};

use super::Scheduler;

/// Builder for [`Scheduler`] with fluent API.
#[derive(Clone)]
pub struct SchedulerBuilder {
    name: Cow<'static, str>,
    config: Config,
    runtime: Option<Handle>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerBuilder {
    /// Creates a builder for a trailing-only scheduler with a zero quiet period.
    pub fn new() -> Self {
        Self {
            name: Cow::Borrowed("scheduler"),
            config: Config::default(),
            runtime: None,
            subscribers: Vec::new(),
        }
    }

    /// Name reported in every event this scheduler publishes.
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.config.quiet_period = quiet_period;
        self
    }

    pub fn with_leading(mut self, leading: bool) -> Self {
        self.config.leading = leading;
        self
    }

    pub fn with_trailing(mut self, trailing: bool) -> Self {
        self.config.trailing = trailing;
        self
    }

    /// Sets the per-burst ceiling (`Duration::ZERO` clears it).
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.config.max_wait = max_wait;
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.config.leading = options.leading;
        self.config.trailing = options.trailing;
        self.config.max_wait = options.max_wait.unwrap_or(Duration::ZERO);
        self
    }

    pub fn with_action_mode(mut self, mode: ActionMode) -> Self {
        self.config.action_mode = mode;
        self
    }

    pub fn with_bus_capacity(mut self, capacity: usize) -> Self {
        self.config.bus_capacity = capacity;
        self
    }

    /// Runtime that hosts monitoring tasks and subscriber workers.
    ///
    /// Without it, `build` uses the runtime it is called from.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Sets the quiet period from signed seconds, rejecting negative or non-finite input.
    ///
    /// # Example
    /// ```
    /// use debouncer::Scheduler;
    ///
    /// let err = Scheduler::builder().try_quiet_period_secs(-0.5).err().unwrap();
    /// assert_eq!(err.as_label(), "config_invalid_seconds");
    /// ```
    pub fn try_quiet_period_secs(self, secs: f64) -> Result<Self, ConfigError> {
        let quiet_period = duration_from_secs("quiet_period", secs)?;
        Ok(self.with_quiet_period(quiet_period))
    }

    /// Sets the per-burst ceiling from signed seconds (`0.0` clears it).
    pub fn try_max_wait_secs(self, secs: f64) -> Result<Self, ConfigError> {
        let max_wait = duration_from_secs("max_wait", secs)?;
        Ok(self.with_max_wait(max_wait))
    }

    /// Validates the configuration and builds the scheduler around `action`.
    ///
    /// Fails with [`ConfigError::NoRuntime`] when called outside a tokio runtime
    /// without [`with_runtime`](Self::with_runtime).
    pub fn build<F>(self, action: F) -> Result<Scheduler, ConfigError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.config.validate()?;
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| ConfigError::NoRuntime)?,
        };

        let bus = Bus::new(self.config.bus_capacity_clamped());
        if !self.subscribers.is_empty() {
            let set = SubscriberSet::spawn_on(&runtime, self.subscribers);
            runtime.spawn(set.listen(bus.subscribe()));
        }

        Ok(Scheduler::from_parts(
            self.name,
            self.config,
            Arc::new(action),
            bus,
            runtime,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_outside_runtime_fails() {
        let err = SchedulerBuilder::new().build(|| {}).err().unwrap();
        assert_eq!(err, ConfigError::NoRuntime);
    }

    #[test]
    fn test_build_with_explicit_runtime() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let scheduler = SchedulerBuilder::new()
            .with_name("explicit")
            .with_runtime(rt.handle().clone())
            .build(|| {})
            .unwrap();
        assert_eq!(scheduler.name(), "explicit");
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn test_invalid_durations_rejected() {
        let err = SchedulerBuilder::new()
            .with_quiet_period(Duration::MAX)
            .build(|| {})
            .err()
            .unwrap();
        assert_eq!(err.as_label(), "config_quiet_period_too_long");

        let err = SchedulerBuilder::new()
            .try_max_wait_secs(f64::NAN)
            .err()
            .unwrap();
        assert_eq!(err.as_label(), "config_invalid_seconds");
    }

    #[tokio::test]
    async fn test_options_map_onto_config() {
        let scheduler = SchedulerBuilder::new()
            .try_quiet_period_secs(0.25)
            .unwrap()
            .with_options(Options {
                leading: true,
                trailing: true,
                max_wait: Some(Duration::from_millis(50)),
            })
            .build(|| {})
            .unwrap();

        let cfg = scheduler.config();
        assert_eq!(cfg.quiet_period, Duration::from_millis(250));
        assert!(cfg.leading && cfg.trailing);
        assert_eq!(cfg.deadline(), Some(Duration::from_millis(50)));
    }
}
