//! # debouncer
//!
//! **debouncer** regulates how often a caller-supplied action runs in response
//! to a stream of trigger events.
//!
//! Debounce (run once the triggers go quiet) and throttle (run at most once per
//! interval) are two configurations of one [`Scheduler`]: a rearmable quiet
//! period, an optional max-wait ceiling, and leading/trailing edge policy, safe
//! under concurrent invocation from any number of threads.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   thread A ─┐
//!   thread B ─┼─ invoke() ──► ┌──────────────────────────────────────────┐
//!   thread C ─┘               │ Scheduler                                │
//!        flush() ───────────► │ - QuietClock (rearmable due instant)     │
//!       cancel() ───────────► │ - Burst {running, pending} (one lock)    │
//!                             │ - CancellationToken + cancelled flag     │
//!                             │ - ActionCell (RwLock, no-op on cancel)   │
//!                             └──────────────┬───────────────────────────┘
//!                                            │ spawn (at most one)
//!                                            ▼
//!                             ┌──────────────────────────────────────────┐
//!                             │ monitoring task                          │
//!                             │  leading? fire                           │
//!                             │  select { cancel | quiet | max_wait }    │
//!                             │  quiet → policy → fire trailing          │
//!                             │  drop RunGuard → running = false         │
//!                             └──────────────┬───────────────────────────┘
//!                                            │ publish
//!                                            ▼
//!                     Bus (broadcast) ──► SubscriberSet ──► Subscribe::on_event
//! ```
//!
//! ### Edge policy
//! ```text
//! leading  trailing  max_wait   behaviour
//! ───────  ────────  ────────   ─────────────────────────────────────────────
//! false    true      none       debounce: fire once, quiet_period after last invoke
//! true     false     M          throttle: fire on first invoke of each M window
//! true     true      any        fire at start; fire again only if the burst grew
//! any      any       M          after M the burst is released without firing
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                        |
//! |-------------------|----------------------------------------------------------|-------------------------------------------|
//! | **Scheduling**    | Debounce, throttle, leading/trailing, max wait, flush    | [`Scheduler`], [`SchedulerBuilder`]       |
//! | **Configuration** | Plain config struct with presets and validation          | [`Config`], [`Options`], [`ActionMode`]   |
//! | **Errors**        | Typed construction and action errors                     | [`ConfigError`], [`ActionError`]          |
//! | **Events**        | Lifecycle events on a broadcast bus                      | [`Event`], [`EventKind`], [`Edge`]        |
//! | **Subscriber API**| Hook into events (logging, metrics)                      | [`Subscribe`], [`SubscriberSet`]          |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::time::Duration;
//! use debouncer::{Options, Scheduler};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runs = Arc::new(AtomicUsize::new(0));
//!     let counter = runs.clone();
//!
//!     let refresh = Scheduler::new(
//!         move || { counter.fetch_add(1, Ordering::SeqCst); },
//!         Duration::from_millis(20),
//!         Options { leading: true, trailing: true, max_wait: None },
//!     )?;
//!
//!     // a burst of two: leading fire now, trailing fire once quiet
//!     refresh.invoke();
//!     refresh.invoke();
//!     tokio::time::sleep(Duration::from_millis(100)).await;
//!     assert_eq!(runs.load(Ordering::SeqCst), 2);
//!
//!     refresh.cancel();
//!     Ok(())
//! }
//! ```
mod config;
mod error;
mod events;
mod scheduler;
mod subscribers;

// ---- Public re-exports ----

pub use config::{ActionMode, Config, Options, THROTTLE_QUIET_PERIOD};
pub use error::{ActionError, ConfigError};
pub use events::{Bus, Edge, Event, EventKind};
pub use scheduler::{Scheduler, SchedulerBuilder};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
