//! # Example: throttle_threads
//!
//! Several OS threads hammer one throttled scheduler; the action runs at most
//! once per 100ms window no matter how many threads call `invoke()`.
//!
//! ## Run
//! ```bash
//! cargo run --example throttle_threads
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use debouncer::{EventKind, Scheduler};

fn main() -> anyhow::Result<()> {
    println!("=== throttle_threads example ===\n");

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()?;

    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let started = Instant::now();

    let throttle = Arc::new(
        Scheduler::builder()
            .with_name("metrics-flush")
            .with_config(debouncer::Config::throttle(Duration::from_millis(100)))
            .with_runtime(rt.handle().clone())
            .build(move || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                println!("[flush #{n}] at {:?}", started.elapsed());
            })?,
    );
    let mut events = throttle.subscribe();

    let workers: Vec<_> = (0..4)
        .map(|id| {
            let throttle = Arc::clone(&throttle);
            thread::spawn(move || {
                for _ in 0..50 {
                    throttle.invoke();
                    thread::sleep(Duration::from_millis(10));
                }
                println!("[worker {id}] done");
            })
        })
        .collect();
    for w in workers {
        let _ = w.join();
    }

    throttle.cancel();
    let mut deadlines = 0;
    while let Ok(ev) = events.try_recv() {
        if ev.kind == EventKind::DeadlineReached {
            deadlines += 1;
        }
    }
    println!(
        "\nruns={} windows_released={} elapsed={:?}",
        runs.load(Ordering::SeqCst),
        deadlines,
        started.elapsed()
    );
    Ok(())
}
