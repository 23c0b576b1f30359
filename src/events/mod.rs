//! Scheduler events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`], [`Edge`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Scheduler::flush`, `Scheduler::cancel`, the monitoring task.
//! - **Consumers**: the subscriber listener (fans out to `SubscriberSet`) and any
//!   receiver obtained from `Scheduler::subscribe`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Edge, Event, EventKind};
