//! # Example: search_box
//!
//! Debounces a burst of keystrokes so the search only runs once the user
//! stops typing, and prints every scheduler event through [`LogWriter`].
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► build Scheduler (quiet 150ms, trailing) with LogWriter
//!   ├─► type "tokio" one key every 40ms  ─► one burst, rearmed per key
//!   ├─► pause 300ms                       ─► trailing fire: search("tokio")
//!   ├─► type "rs" then flush()            ─► immediate trailing fire
//!   └─► cancel()
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example search_box --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use debouncer::{LogWriter, Scheduler, Subscribe};
use parking_lot::Mutex;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== search_box example ===\n");

    let query = Arc::new(Mutex::new(String::new()));
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];

    let search = {
        let query = Arc::clone(&query);
        Scheduler::builder()
            .with_name("search")
            .with_quiet_period(Duration::from_millis(150))
            .with_subscribers(subs)
            .build(move || println!("[search] query={:?}", query.lock()))?
    };

    for ch in "tokio".chars() {
        query.lock().push(ch);
        search.invoke();
        tokio::time::sleep(Duration::from_millis(40)).await;
    }
    tokio::time::sleep(Duration::from_millis(300)).await;

    query.lock().push_str("-rs");
    search.invoke();
    search.flush();
    tokio::time::sleep(Duration::from_millis(50)).await;

    search.cancel();
    tokio::time::sleep(Duration::from_millis(10)).await;
    Ok(())
}
