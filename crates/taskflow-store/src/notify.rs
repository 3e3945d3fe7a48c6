//! Change notification shared by both adapters.
//!
//! Writers bump a version counter on a `watch` channel after each committed
//! write. [`watch_collection`] turns that into the port's live stream: one
//! snapshot on subscribe, then one snapshot per observed version change.
//! Bursts of writes may coalesce into a single snapshot; the latest state is
//! never missed.

use std::sync::Arc;

use taskflow_core::{TaskStore, TaskStream};
use tokio::sync::watch;

/// Version counter bumped after every committed write.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: Arc<watch::Sender<u64>>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }
}

impl ChangeNotifier {
    /// Record a committed write.
    pub fn notify(&self) {
        self.tx.send_modify(|version| *version = version.wrapping_add(1));
    }

    /// Current version.
    pub fn version(&self) -> u64 {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

/// Build the live collection stream for `store`.
pub fn watch_collection<S>(store: S, notifier: &ChangeNotifier) -> TaskStream
where
    S: TaskStore + 'static,
{
    let mut rx = notifier.subscribe();
    Box::pin(async_stream::stream! {
        loop {
            yield store.select_all().await;
            if rx.changed().await.is_err() {
                break;
            }
        }
    })
}
