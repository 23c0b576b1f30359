//! # Rearmable quiet-period clock.
//!
//! [`QuietClock`] holds a single due instant. `invoke()` pushes it forward,
//! `flush()` pulls it to now, `cancel()` clears it. The monitoring task waits
//! on [`QuietClock::elapsed`], which re-reads the due instant every time it
//! wakes, so it always observes the latest rearm.
//!
//! ## Rules
//! - Rearming later never wakes the waiter; it just finds a later due instant
//!   when its sleep ends.
//! - Pulling earlier (`fire_now`) and clearing (`stop`) wake the waiter.
//! - A cleared clock never elapses.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::{self, Instant};

/// Fallback horizon for periods that overflow `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

pub(crate) struct QuietClock {
    period: Duration,
    due: Mutex<Option<Instant>>,
    notify: Notify,
}

impl QuietClock {
    /// Creates a clock pre-armed to `period` from now.
    pub(crate) fn new(period: Duration) -> Self {
        Self {
            period,
            due: Mutex::new(Some(instant_after(period))),
            notify: Notify::new(),
        }
    }

    /// Moves the due instant to `period` from now.
    pub(crate) fn rearm(&self) {
        *self.due.lock() = Some(instant_after(self.period));
    }

    /// Makes the clock due immediately.
    pub(crate) fn fire_now(&self) {
        *self.due.lock() = Some(Instant::now());
        self.notify.notify_one();
    }

    /// Clears the clock; it will not elapse until rearmed.
    pub(crate) fn stop(&self) {
        *self.due.lock() = None;
        self.notify.notify_one();
    }

    /// Resolves once the due instant has passed.
    pub(crate) async fn elapsed(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let due = *self.due.lock();
            match due {
                Some(at) if at <= Instant::now() => return,
                Some(at) => {
                    tokio::select! {
                        _ = time::sleep_until(at) => {}
                        _ = &mut notified => {}
                    }
                }
                None => notified.await,
            }
        }
    }
}

/// `now + d`, saturating to a far-future instant instead of panicking.
pub(crate) fn instant_after(d: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(d).unwrap_or_else(|| now + FAR_FUTURE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_elapses_after_period() {
        let clock = QuietClock::new(Duration::from_millis(10));
        clock.rearm();
        let start = Instant::now();
        clock.elapsed().await;
        assert_eq!(start.elapsed(), Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_extends_wait() {
        let clock = Arc::new(QuietClock::new(Duration::from_millis(10)));
        clock.rearm();
        let start = Instant::now();

        let waiter = tokio::spawn({
            let clock = clock.clone();
            async move { clock.elapsed().await }
        });

        time::sleep(Duration::from_millis(6)).await;
        clock.rearm();
        waiter.await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(16));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_now_wakes_waiter() {
        let clock = Arc::new(QuietClock::new(Duration::from_secs(60)));
        clock.rearm();
        let start = Instant::now();

        let waiter = tokio::spawn({
            let clock = clock.clone();
            async move { clock.elapsed().await }
        });

        time::sleep(Duration::from_millis(1)).await;
        clock.fire_now();
        waiter.await.unwrap();
        assert!(start.elapsed() < Duration::from_millis(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_clock_never_elapses() {
        let clock = QuietClock::new(Duration::from_millis(1));
        clock.stop();
        let res = time::timeout(Duration::from_secs(5), clock.elapsed()).await;
        assert!(res.is_err());
    }

    #[test]
    fn test_instant_after_saturates() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        rt.block_on(async {
            let at = instant_after(Duration::MAX);
            assert!(at > Instant::now());
        });
    }
}
