//! # Scheduler: debounce and throttle over one mechanism.
//!
//! A [`Scheduler`] decides when a caller-supplied action runs in response to a
//! stream of [`invoke`](Scheduler::invoke) calls.
//!
//! ## Architecture
//! ```text
//! invoke() ──► rearm QuietClock ──► lock Burst {running, pending, rollover}
//!                                     ├─ running, open   → pending += 1
//!                                     ├─ running, closed → rollover (next burst)
//!                                     └─ !running        → running = true, pending = 0
//!                                                          └─► spawn monitor::run(RunGuard)
//!
//! monitor::run:
//!   loop {
//!     leading? ─► fire
//!     select { cancel | quiet elapsed | max_wait } ─► maybe fire trailing
//!     rollover? ─► next burst : break
//!   }
//!   running = false
//! ```
//!
//! ## Rules
//! - At most **one** monitoring task per scheduler (single-flight).
//! - `pending` is reset **exactly** when a burst is started.
//! - A burst is closed once its outcome is decided or its `max_wait` window
//!   ends; later invokes belong to the next burst, never to a finished one.
//! - After `cancel()` the action **never starts again**.
//! - `invoke()`, `flush()` and `cancel()` never block and never fail.
//! - Dropping the scheduler cancels it.

mod action;
mod builder;
mod clock;
mod monitor;
mod policy;


use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::{Config, Options};
use crate::error::ConfigError;
use crate::events::{Bus, Edge, Event, EventKind};

use action::{ActionCell, ActionFn};
use clock::QuietClock;
use monitor::RunGuard;
use policy::EdgePolicy;

pub use builder::SchedulerBuilder;

/// Single-flight state. Guarded together so that acquiring the flag and
/// resetting the counter are one step.
#[derive(Debug)]
struct Burst {
    running: bool,
    pending: u64,
    /// Start of the running burst; its `max_wait` window counts from here.
    started: Instant,
    /// Set once the monitoring task stopped waiting on the running burst.
    resolved: bool,
    /// First invoke (and its followers) after the running burst closed.
    rollover: Option<Rollover>,
}

#[derive(Debug, Clone, Copy)]
struct Rollover {
    at: Instant,
    pending: u64,
}

impl Burst {
    fn new() -> Self {
        Self {
            running: false,
            pending: 0,
            started: Instant::now(),
            resolved: false,
            rollover: None,
        }
    }

    /// Takes the single-flight flag for a burst beginning at `at`.
    fn begin(&mut self, at: Instant) {
        self.running = true;
        self.pending = 0;
        self.started = at;
        self.resolved = false;
        self.rollover = None;
    }

    fn release(&mut self) {
        self.running = false;
        self.resolved = false;
        self.rollover = None;
    }

    /// True when the running burst can no longer take an invoke made at `now`:
    /// its outcome is decided, or its `max_wait` window is over even though
    /// the monitoring task has not observed that yet.
    fn closed(&self, max_wait: Option<Duration>, now: Instant) -> bool {
        self.resolved
            || max_wait
                .and_then(|max_wait| self.started.checked_add(max_wait))
                .is_some_and(|end| now >= end)
    }

    /// Counts an invoke that found a burst running.
    fn absorb(&mut self, max_wait: Option<Duration>, now: Instant) {
        let closed = self.closed(max_wait, now);
        match self.rollover.as_mut() {
            Some(next) => next.pending += 1,
            None if closed => {
                self.rollover = Some(Rollover { at: now, pending: 0 });
            }
            None => self.pending += 1,
        }
    }
}

/// State shared between the scheduler handle and its monitoring task.
struct Inner {
    name: Arc<str>,
    config: Config,
    policy: EdgePolicy,
    action: ActionCell,
    burst: Mutex<Burst>,
    clock: QuietClock,
    cancelled: AtomicBool,
    token: CancellationToken,
    bus: Bus,
    runtime: Handle,
}

impl Inner {
    fn event(&self, kind: EventKind) -> Event {
        Event::new(kind).with_scheduler(Arc::clone(&self.name))
    }

    fn publish(&self, ev: Event) {
        self.bus.publish(ev);
    }

    /// Runs the action for `edge` unless the scheduler was cancelled.
    async fn fire(&self, edge: Edge, started: Instant) {
        if self.cancelled.load(Ordering::Acquire) {
            return;
        }

        match self.action.run(edge).await {
            Ok(()) => {
                let ev = match edge {
                    Edge::Leading => self.event(EventKind::LeadingFired).with_edge(edge),
                    Edge::Trailing => self
                        .event(EventKind::TrailingFired)
                        .with_edge(edge)
                        .with_pending(self.burst.lock().pending)
                        .with_elapsed(started.elapsed()),
                };
                self.publish(ev);
            }
            Err(err) => {
                self.publish(
                    self.event(EventKind::ActionFailed)
                        .with_edge(edge)
                        .with_error(err.to_string()),
                );
            }
        }
    }
}

/// Debouncer/throttler for one action.
///
/// Methods take `&self`; share a scheduler across threads with `Arc<Scheduler>`.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
/// use debouncer::Scheduler;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), debouncer::ConfigError> {
///     let saves = Arc::new(AtomicUsize::new(0));
///     let counter = saves.clone();
///
///     let autosave = Scheduler::debounce(
///         move || { counter.fetch_add(1, Ordering::SeqCst); },
///         Duration::from_millis(20),
///     )?;
///
///     for _ in 0..5 {
///         autosave.invoke();
///     }
///     tokio::time::sleep(Duration::from_millis(100)).await;
///     assert_eq!(saves.load(Ordering::SeqCst), 1);
///     Ok(())
/// }
/// ```
pub struct Scheduler {
    inner: Arc<Inner>,
}

impl Scheduler {
    /// Creates a scheduler with the given quiet period and edge options.
    pub fn new<F>(action: F, quiet_period: Duration, options: Options) -> Result<Self, ConfigError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::builder()
            .with_config(Config::with_options(quiet_period, options))
            .build(action)
    }

    /// Trailing-only scheduler: runs once the invokes stop for `quiet_period`.
    pub fn debounce<F>(action: F, quiet_period: Duration) -> Result<Self, ConfigError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::builder()
            .with_config(Config::debounce(quiet_period))
            .build(action)
    }

    /// Runs on the first invoke of each `min_interval` window.
    pub fn throttle<F>(action: F, min_interval: Duration) -> Result<Self, ConfigError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::builder()
            .with_config(Config::throttle(min_interval))
            .build(action)
    }

    /// Creates a builder with fluent API.
    pub fn builder() -> SchedulerBuilder {
        SchedulerBuilder::new()
    }

    pub(crate) fn from_parts(
        name: Cow<'static, str>,
        config: Config,
        action: ActionFn,
        bus: Bus,
        runtime: Handle,
    ) -> Self {
        let inner = Inner {
            name: Arc::from(&*name),
            policy: EdgePolicy::new(config.leading, config.trailing),
            action: ActionCell::new(action, config.action_mode),
            burst: Mutex::new(Burst::new()),
            clock: QuietClock::new(config.quiet_period),
            cancelled: AtomicBool::new(false),
            token: CancellationToken::new(),
            bus,
            runtime,
            config,
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Records a trigger.
    ///
    /// Rearms the quiet period and counts the call; starts a monitoring task if
    /// none is running. A call that arrives after the running burst has closed
    /// (its `max_wait` window is over, or its trailing action is already under
    /// way) opens the next burst, which the same task runs once the current one
    /// is done. After [`cancel`](Self::cancel) the call only rearms.
    pub fn invoke(&self) {
        let inner = &self.inner;
        inner.clock.rearm();
        if inner.cancelled.load(Ordering::Acquire) {
            return;
        }

        let now = Instant::now();
        let start = {
            let mut burst = inner.burst.lock();
            if burst.running {
                burst.absorb(inner.config.deadline(), now);
                false
            } else {
                burst.begin(now);
                true
            }
        };

        if start {
            let guard = RunGuard::new(Arc::clone(inner));
            inner.runtime.spawn(monitor::run(guard));
        }
    }

    /// Resolves the running burst now, as if its quiet period had elapsed.
    ///
    /// No effect when no burst is running or after cancellation.
    pub fn flush(&self) {
        let inner = &self.inner;
        if inner.cancelled.load(Ordering::Acquire) {
            return;
        }

        let burst = inner.burst.lock();
        if !burst.running {
            return;
        }
        inner.clock.fire_now();
        drop(burst);
        inner.publish(inner.event(EventKind::Flushed));
    }

    /// Permanently disables the scheduler.
    ///
    /// Swaps the action for a no-op and signals the running burst to exit
    /// without waiting for it. Idempotent.
    pub fn cancel(&self) {
        let inner = &self.inner;
        if inner.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        inner.clock.stop();
        inner.action.disarm();
        inner.token.cancel();
        inner.publish(inner.event(EventKind::SchedulerCancelled));
    }

    /// Name reported in events.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// True while a monitoring task holds the single-flight flag.
    pub fn is_running(&self) -> bool {
        self.inner.burst.lock().running
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Receives every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.bus.subscribe()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("name", &self.inner.name)
            .field("config", &self.inner.config)
            .field("running", &self.is_running())
            .field("cancelled", &self.is_cancelled())
            .field("receivers", &self.inner.bus.receiver_count())
            .finish()
    }
}
