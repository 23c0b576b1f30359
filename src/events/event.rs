//! # Lifecycle events emitted by schedulers.
//!
//! The [`EventKind`] enum classifies what happened inside a scheduler:
//! - **Burst events**: a monitoring task started, fired an edge, or was released
//! - **Control events**: flush and cancel requests
//! - **Failure events**: the action panicked or was aborted
//!
//! The [`Event`] struct carries metadata such as timestamps, scheduler name,
//! the edge that fired and the pending invoke count.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use debouncer::{Edge, Event, EventKind};
//!
//! let ev = Event::new(EventKind::TrailingFired)
//!     .with_scheduler("search")
//!     .with_edge(Edge::Trailing)
//!     .with_pending(3);
//!
//! assert_eq!(ev.kind, EventKind::TrailingFired);
//! assert_eq!(ev.scheduler.as_deref(), Some("search"));
//! assert_eq!(ev.pending, Some(3));
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Edge of a burst on which the action runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Start of the burst.
    Leading,
    /// After the burst went quiet.
    Trailing,
}

impl Edge {
    /// Returns the edge name as a static string.
    pub fn as_str(self) -> &'static str {
        match self {
            Edge::Leading => "leading",
            Edge::Trailing => "trailing",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of scheduler events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Burst lifecycle ===
    /// A monitoring task started a new burst.
    ///
    /// Sets:
    /// - `scheduler`: scheduler name
    BurstStarted,

    /// The action ran on the leading edge.
    ///
    /// Sets:
    /// - `scheduler`: scheduler name
    /// - `edge`: `Leading`
    LeadingFired,

    /// The action ran on the trailing edge.
    ///
    /// Sets:
    /// - `scheduler`: scheduler name
    /// - `edge`: `Trailing`
    /// - `pending`: invokes seen after the burst started
    /// - `elapsed_ms`: burst duration so far
    TrailingFired,

    /// The quiet period elapsed but the firing policy suppressed the trailing edge.
    ///
    /// Emitted for leading-only bursts and for lone leading+trailing invokes.
    ///
    /// Sets:
    /// - `scheduler`: scheduler name
    /// - `pending`: invokes seen after the burst started
    TrailingSkipped,

    /// The max wait ceiling released the burst without firing.
    ///
    /// Sets:
    /// - `scheduler`: scheduler name
    /// - `pending`: invokes seen after the burst started
    /// - `elapsed_ms`: burst duration
    DeadlineReached,

    /// The monitoring task observed cancellation and exited.
    ///
    /// Sets:
    /// - `scheduler`: scheduler name
    BurstCancelled,

    // === Control ===
    /// `flush()` forced an active burst to resolve.
    ///
    /// Sets:
    /// - `scheduler`: scheduler name
    Flushed,

    /// `cancel()` was called for the first time.
    ///
    /// Sets:
    /// - `scheduler`: scheduler name
    SchedulerCancelled,

    // === Failures ===
    /// The action panicked or its blocking worker was aborted.
    ///
    /// Sets:
    /// - `scheduler`: scheduler name
    /// - `edge`: edge that was firing
    /// - `error`: failure message
    ActionFailed,
}

impl EventKind {
    /// Returns a short stable label (kebab-case) for logs.
    pub fn as_label(self) -> &'static str {
        match self {
            EventKind::BurstStarted => "burst-started",
            EventKind::LeadingFired => "leading-fired",
            EventKind::TrailingFired => "trailing-fired",
            EventKind::TrailingSkipped => "trailing-skipped",
            EventKind::DeadlineReached => "deadline-reached",
            EventKind::BurstCancelled => "burst-cancelled",
            EventKind::Flushed => "flushed",
            EventKind::SchedulerCancelled => "scheduler-cancelled",
            EventKind::ActionFailed => "action-failed",
        }
    }
}

/// Scheduler event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the emitting scheduler.
    pub scheduler: Option<Arc<str>>,
    /// Edge involved, for firing and failure events.
    pub edge: Option<Edge>,
    /// Invokes seen after the burst started.
    pub pending: Option<u64>,
    /// Burst duration in milliseconds (compact).
    pub elapsed_ms: Option<u32>,
    /// Failure message.
    pub error: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            scheduler: None,
            edge: None,
            pending: None,
            elapsed_ms: None,
            error: None,
        }
    }

    /// Attaches the scheduler name.
    #[inline]
    pub fn with_scheduler(mut self, name: impl Into<Arc<str>>) -> Self {
        self.scheduler = Some(name.into());
        self
    }

    /// Attaches the edge.
    #[inline]
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edge = Some(edge);
        self
    }

    /// Attaches the pending invoke count.
    #[inline]
    pub fn with_pending(mut self, pending: u64) -> Self {
        self.pending = Some(pending);
        self
    }

    /// Attaches the burst duration (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.elapsed_ms = Some(ms);
        self
    }

    /// Attaches a failure message.
    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// True for events that mean the action ran.
    #[inline]
    pub fn is_fire(&self) -> bool {
        matches!(self.kind, EventKind::LeadingFired | EventKind::TrailingFired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::BurstStarted);
        let b = Event::new(EventKind::BurstStarted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_elapsed_saturates() {
        let ev = Event::new(EventKind::DeadlineReached).with_elapsed(Duration::MAX);
        assert_eq!(ev.elapsed_ms, Some(u32::MAX));
    }

    #[test]
    fn test_is_fire() {
        assert!(Event::new(EventKind::LeadingFired).is_fire());
        assert!(Event::new(EventKind::TrailingFired).is_fire());
        assert!(!Event::new(EventKind::TrailingSkipped).is_fire());
    }
}
