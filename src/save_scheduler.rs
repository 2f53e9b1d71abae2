//! Debounced persistence scheduling.
//!
//! Rapid edits (e.g. keystroke-level content updates) must coalesce into a
//! single persisted write once the edits go quiet. [`SaveScheduler`] holds
//! at most one pending deferred write: scheduling a new one cancels and
//! discards the previous, and the write fires only after the idle window
//! elapses without interruption.

use std::sync::{Arc, Mutex};

use log::{debug, trace, warn};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

/// The deferred write action. Shared between the scheduler and its timer
/// task so either side can claim it exactly once.
type PendingWrite = Arc<Mutex<Option<Box<dyn FnOnce() + Send>>>>;

/// A cancellable single-slot timer for deferred writes.
pub struct SaveScheduler {
    /// Idle window that must elapse before a scheduled write fires
    delay: Duration,

    /// Handle to the pending timer task, if any
    task: Option<JoinHandle<()>>,

    /// The write waiting to fire, if any
    slot: Option<PendingWrite>,
}

impl SaveScheduler {
    /// Creates a scheduler with the given idle window.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            task: None,
            slot: None,
        }
    }

    /// Schedules `write` to run after the idle window.
    ///
    /// Any previously pending write is cancelled and discarded, not
    /// performed: only the final edit in a burst reaches storage.
    ///
    /// Requires an active tokio runtime.
    pub fn schedule<F>(&mut self, write: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();

        let slot: PendingWrite = Arc::new(Mutex::new(Some(Box::new(write))));
        let task_slot = Arc::clone(&slot);
        let delay = self.delay;

        trace!("Scheduling deferred write in {:?}", delay);
        self.task = Some(tokio::spawn(async move {
            sleep(delay).await;
            let write = match task_slot.lock() {
                Ok(mut guard) => guard.take(),
                Err(e) => {
                    warn!("Deferred write slot poisoned: {}", e);
                    None
                }
            };
            if let Some(write) = write {
                debug!("Idle window elapsed, performing deferred write");
                write();
            }
        }));
        self.slot = Some(slot);
    }

    /// Cancels the pending write, if any, without performing it.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if let Some(slot) = self.slot.take() {
            if let Ok(mut guard) = slot.lock() {
                if guard.take().is_some() {
                    trace!("Discarded pending deferred write");
                }
            }
        }
    }

    /// Performs the pending write immediately, if any.
    ///
    /// Used at shutdown so an in-flight debounce window cannot lose the
    /// final edit.
    pub fn flush(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        let write = self
            .slot
            .take()
            .and_then(|slot| slot.lock().ok().and_then(|mut guard| guard.take()));
        if let Some(write) = write {
            debug!("Flushing pending deferred write");
            write();
        }
    }

    /// Whether a write is still waiting to fire.
    pub fn has_pending(&self) -> bool {
        self.slot
            .as_ref()
            .is_some_and(|slot| slot.lock().is_ok_and(|guard| guard.is_some()))
    }
}

impl Drop for SaveScheduler {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn burst_of_edits_produces_exactly_one_write() {
        let writes = Arc::new(AtomicUsize::new(0));
        let mut scheduler = SaveScheduler::new(Duration::from_millis(800));

        for _ in 0..5 {
            let writes = Arc::clone(&writes);
            scheduler.schedule(move || {
                writes.fetch_add(1, Ordering::SeqCst);
            });
            // Each edit arrives well inside the idle window.
            sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(writes.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(900)).await;
        assert_eq!(writes.load(Ordering::SeqCst), 1);
        assert!(!scheduler.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_the_pending_write() {
        let writes = Arc::new(AtomicUsize::new(0));
        let mut scheduler = SaveScheduler::new(Duration::from_millis(800));

        let counter = Arc::clone(&writes);
        scheduler.schedule(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        scheduler.cancel();

        sleep(Duration::from_secs(5)).await;
        assert_eq!(writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_runs_the_pending_write_immediately() {
        let writes = Arc::new(AtomicUsize::new(0));
        let mut scheduler = SaveScheduler::new(Duration::from_secs(60));

        let counter = Arc::clone(&writes);
        scheduler.schedule(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        scheduler.flush();
        assert_eq!(writes.load(Ordering::SeqCst), 1);

        // Nothing left to fire later.
        sleep(Duration::from_secs(120)).await;
        assert_eq!(writes.load(Ordering::SeqCst), 1);
    }
}
