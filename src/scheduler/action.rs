//! # Swappable action cell.
//!
//! [`ActionCell`] owns the user action behind a read/write lock. `cancel()`
//! publishes a no-op in its place, so a monitoring task either runs the
//! user action or the no-op, never anything in between.
//!
//! Execution catches panics at this boundary and turns them into
//! [`ActionError`]; callers decide how to report them.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::task;

use crate::config::ActionMode;
use crate::error::ActionError;
use crate::events::Edge;
use crate::subscribers::panic_message;

/// Shared, type-erased user action.
pub(crate) type ActionFn = Arc<dyn Fn() + Send + Sync + 'static>;

pub(crate) struct ActionCell {
    action: RwLock<ActionFn>,
    mode: ActionMode,
}

impl ActionCell {
    pub(crate) fn new(action: ActionFn, mode: ActionMode) -> Self {
        Self {
            action: RwLock::new(action),
            mode,
        }
    }

    /// Replaces the action with a no-op.
    pub(crate) fn disarm(&self) {
        *self.action.write() = Arc::new(|| {});
    }

    /// Runs the current action once.
    pub(crate) async fn run(&self, edge: Edge) -> Result<(), ActionError> {
        let action = Arc::clone(&self.action.read());

        match self.mode {
            ActionMode::Inline => {
                catch_unwind(AssertUnwindSafe(|| action())).map_err(|payload| {
                    ActionError::Panicked {
                        edge,
                        message: panic_message(payload.as_ref()),
                    }
                })
            }
            ActionMode::Blocking => match task::spawn_blocking(move || action()).await {
                Ok(()) => Ok(()),
                Err(err) if err.is_panic() => Err(ActionError::Panicked {
                    edge,
                    message: panic_message(err.into_panic().as_ref()),
                }),
                Err(_) => Err(ActionError::Aborted { edge }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>) -> ActionFn {
        let counter = Arc::clone(counter);
        Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn boom() {
        panic!("boom");
    }

    #[tokio::test]
    async fn test_inline_runs_action() {
        let counter = Arc::new(AtomicUsize::new(0));
        let cell = ActionCell::new(counting(&counter), ActionMode::Inline);
        cell.run(Edge::Leading).await.unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disarm_swaps_in_noop() {
        let counter = Arc::new(AtomicUsize::new(0));
        let cell = ActionCell::new(counting(&counter), ActionMode::Inline);
        cell.disarm();
        cell.run(Edge::Trailing).await.unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_inline_panic_is_caught() {
        let cell = ActionCell::new(Arc::new(boom), ActionMode::Inline);
        let err = cell.run(Edge::Trailing).await.unwrap_err();
        assert_eq!(
            err,
            ActionError::Panicked {
                edge: Edge::Trailing,
                message: "boom".into(),
            }
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_mode_runs_on_pool() {
        let counter = Arc::new(AtomicUsize::new(0));
        let cell = ActionCell::new(counting(&counter), ActionMode::Blocking);
        cell.run(Edge::Leading).await.unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        let cell = ActionCell::new(Arc::new(boom), ActionMode::Blocking);
        let err = cell.run(Edge::Leading).await.unwrap_err();
        assert_eq!(err.as_label(), "action_panicked");
    }
}
