//! # Monitoring task: resolves bursts.
//!
//! Spawned by the `invoke()` that finds no burst running. Holds a [`RunGuard`]
//! for its whole lifetime; the guard releases the single-flight flag when it
//! is dropped, which covers panics and the runtime dropping the task unpolled.
//!
//! Invokes that land after a burst closed are queued as a rollover. The task
//! runs that next burst itself instead of exiting, so no invoke is lost and
//! a throttle window starts exactly at the first invoke past the previous one.
//!
//! ## Flow
//! ```text
//! loop {
//!   publish BurstStarted
//!   if leading ─► fire(Leading)
//!   select (biased) {
//!     cancelled       ─► BurstCancelled
//!     quiet elapsed   ─► fires_trailing(pending) ? fire(Trailing) : TrailingSkipped
//!     deadline        ─► DeadlineReached (never fires)
//!   }
//!   RunGuard::advance ─► rollover ? next burst : running = false
//! }
//! ```

use std::future;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::select;
use tokio::time::{self, Instant};

use crate::events::{Edge, EventKind};

use super::Inner;
use super::clock::instant_after;

/// Holds the single-flight flag; releases it on drop.
pub(super) struct RunGuard {
    inner: Arc<Inner>,
    held: bool,
}

impl RunGuard {
    /// Wraps a scheduler whose `running` flag the caller has just set.
    pub(super) fn new(inner: Arc<Inner>) -> Self {
        Self { inner, held: true }
    }

    /// Moves on from a finished burst.
    ///
    /// Returns the start of the rolled-over burst, keeping the flag, or
    /// releases the flag when nothing arrived after the burst closed.
    fn advance(&mut self) -> Option<Instant> {
        let mut burst = self.inner.burst.lock();
        let rollover = burst.rollover.take();
        match rollover {
            Some(next) if !self.inner.cancelled.load(Ordering::Acquire) => {
                burst.begin(next.at);
                burst.pending = next.pending;
                Some(next.at)
            }
            _ => {
                burst.release();
                self.held = false;
                None
            }
        }
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if self.held {
            self.inner.burst.lock().release();
        }
    }
}

/// How a burst ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Cancelled,
    Quiet,
    Deadline,
}

/// Runs bursts until one ends with nothing rolled over.
pub(super) async fn run(mut guard: RunGuard) {
    let inner = Arc::clone(&guard.inner);
    let mut started = inner.burst.lock().started;

    loop {
        resolve(&inner, started).await;
        match guard.advance() {
            Some(next) => started = next,
            None => break,
        }
    }
}

/// Runs one burst to its outcome.
async fn resolve(inner: &Inner, started: Instant) {
    inner.publish(inner.event(EventKind::BurstStarted));

    if inner.policy.fires_leading() {
        inner.fire(Edge::Leading, started).await;
    }

    let outcome = select! {
        biased;
        _ = inner.token.cancelled() => Outcome::Cancelled,
        _ = inner.clock.elapsed() => Outcome::Quiet,
        _ = deadline(started, inner.config.deadline()) => Outcome::Deadline,
    };

    // From here on an invoke belongs to the next burst.
    let pending = {
        let mut burst = inner.burst.lock();
        burst.resolved = true;
        burst.pending
    };

    match outcome {
        Outcome::Cancelled => {
            inner.publish(inner.event(EventKind::BurstCancelled));
        }
        Outcome::Quiet => {
            if inner.policy.fires_trailing(pending) {
                inner.fire(Edge::Trailing, started).await;
            } else {
                inner.publish(inner.event(EventKind::TrailingSkipped).with_pending(pending));
            }
        }
        Outcome::Deadline => {
            inner.publish(
                inner
                    .event(EventKind::DeadlineReached)
                    .with_pending(pending)
                    .with_elapsed(started.elapsed()),
            );
        }
    }
}

/// Sleeps until `max_wait` after `started`, or forever without a ceiling.
async fn deadline(started: Instant, max_wait: Option<Duration>) {
    match max_wait {
        Some(max_wait) => {
            let at = started
                .checked_add(max_wait)
                .unwrap_or_else(|| instant_after(max_wait));
            time::sleep_until(at).await;
        }
        None => future::pending::<()>().await,
    }
}
