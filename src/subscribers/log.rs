//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos; implement [`Subscribe`] for real logging.
//!
//! ## Example output
//! ```text
//! [burst-started] scheduler=search
//! [leading-fired] scheduler=search
//! [trailing-skipped] scheduler=search pending=0
//! [deadline-reached] scheduler=search pending=4 elapsed=250ms
//! [action-failed] scheduler=search edge=trailing err="action panicked on trailing edge: boom"
//! [scheduler-cancelled] scheduler=search
//! ```

use std::fmt::Write as _;

use async_trait::async_trait;

use crate::events::Event;
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Renders one event as a single log line.
    pub fn format(e: &Event) -> String {
        let mut line = format!(
            "[{}] scheduler={}",
            e.kind.as_label(),
            e.scheduler.as_deref().unwrap_or("unnamed")
        );
        if let Some(edge) = e.edge {
            let _ = write!(line, " edge={edge}");
        }
        if let Some(pending) = e.pending {
            let _ = write!(line, " pending={pending}");
        }
        if let Some(ms) = e.elapsed_ms {
            let _ = write!(line, " elapsed={ms}ms");
        }
        if let Some(err) = &e.error {
            let _ = write!(line, " err={err:?}");
        }
        line
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        println!("{}", Self::format(e));
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Edge, EventKind};
    use std::time::Duration;

    #[test]
    fn test_format_includes_set_fields_only() {
        let ev = Event::new(EventKind::DeadlineReached)
            .with_scheduler("search")
            .with_pending(4)
            .with_elapsed(Duration::from_millis(250));
        assert_eq!(
            LogWriter::format(&ev),
            "[deadline-reached] scheduler=search pending=4 elapsed=250ms"
        );
    }

    #[test]
    fn test_format_failure() {
        let ev = Event::new(EventKind::ActionFailed)
            .with_edge(Edge::Leading)
            .with_error("boom");
        assert_eq!(
            LogWriter::format(&ev),
            "[action-failed] scheduler=unnamed edge=leading err=\"boom\""
        );
    }
}
