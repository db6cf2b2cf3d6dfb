//! Keyed one-shot timers with cancellation.
//!
//! Timers never run user code. When one elapses it reports an [`Expiry`] on
//! the scheduler's channel, and the owning worker decides what to do with it
//! inside its own loop. That keeps every state mutation on the worker task.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Notification that the timer armed for `key` elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expiry<K> {
    pub key: K,
    seq: u64,
}

/// One armed timer: its task and the sequence its expiry will carry.
#[derive(Debug)]
struct TaskHandle {
    abort: AbortHandle,
    seq: u64,
}

impl TaskHandle {
    fn cancel(&self) {
        self.abort.abort();
    }
}

pub struct Scheduler<K> {
    timers: HashMap<K, TaskHandle>,
    expired_tx: mpsc::UnboundedSender<Expiry<K>>,
    next_seq: u64,
}

impl<K> Scheduler<K>
where
    K: Clone + Eq + Hash + Send + 'static,
{
    /// Creates a scheduler and the receiver its expiries are reported on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Expiry<K>>) {
        let (expired_tx, expired_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            timers: HashMap::new(),
            expired_tx,
            next_seq: 0,
        };
        (scheduler, expired_rx)
    }

    /// Arms a timer for `key` that fires once after `delay`.
    ///
    /// Returns `false` if `key` already has an armed timer; the existing one
    /// is left untouched.
    pub fn schedule(&mut self, key: K, delay: Duration) -> bool {
        if self.timers.contains_key(&key) {
            return false;
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        let deadline = tokio::time::Instant::now() + delay;
        let tx = self.expired_tx.clone();
        let expiry = Expiry {
            key: key.clone(),
            seq,
        };
        let task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // Receiver gone means the owner shut down.
            let _ = tx.send(expiry);
        });

        self.timers.insert(
            key,
            TaskHandle {
                abort: task.abort_handle(),
                seq,
            },
        );
        true
    }

    /// Consumes an expiry. Returns `true` only if it belongs to the timer
    /// currently armed for its key, which is then disarmed.
    ///
    /// Expiries of timers that were cancelled after elapsing (and possibly
    /// re-armed since) are rejected.
    pub fn complete(&mut self, expiry: &Expiry<K>) -> bool {
        match self.timers.get(&expiry.key) {
            Some(handle) if handle.seq == expiry.seq => {
                self.timers.remove(&expiry.key);
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self, key: &K) -> bool {
        match self.timers.remove(key) {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancels every armed timer. Returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.timers.len();
        for (_, handle) in self.timers.drain() {
            handle.cancel();
        }
        count
    }

    /// Number of armed timers.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }
}

impl<K> Drop for Scheduler<K> {
    fn drop(&mut self) {
        for handle in self.timers.values() {
            handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Instant, timeout};

    const DELAY: Duration = Duration::from_millis(5000);

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay_and_not_before() {
        let (mut scheduler, mut expired) = Scheduler::<u32>::new();
        let start = Instant::now();
        assert!(scheduler.schedule(5, DELAY));

        let early = timeout(DELAY - Duration::from_millis(1), expired.recv()).await;
        assert!(early.is_err());

        let expiry = expired.recv().await.unwrap();
        assert!(start.elapsed() >= DELAY);
        assert_eq!(expiry.key, 5);
        assert!(scheduler.complete(&expiry));
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn refuses_second_timer_for_same_key() {
        let (mut scheduler, _expired) = Scheduler::<u32>::new();
        assert!(scheduler.schedule(1, DELAY));
        assert!(!scheduler.schedule(1, DELAY));
        assert!(scheduler.schedule(2, DELAY));
        assert_eq!(scheduler.pending(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_reports() {
        let (mut scheduler, mut expired) = Scheduler::<u32>::new();
        assert!(scheduler.schedule(1, DELAY));
        assert!(scheduler.cancel(&1));
        assert!(!scheduler.cancel(&1));

        assert!(timeout(DELAY * 2, expired.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_expiry_is_rejected_after_rearm() {
        let (mut scheduler, mut expired) = Scheduler::<u32>::new();
        assert!(scheduler.schedule(1, DELAY));
        let stale = expired.recv().await.unwrap();

        // Cancelled after elapsing, then armed again before the stale expiry
        // was consumed.
        scheduler.cancel(&1);
        assert!(scheduler.schedule(1, DELAY));

        assert!(!scheduler.complete(&stale));
        assert_eq!(scheduler.pending(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_disarms_everything() {
        let (mut scheduler, mut expired) = Scheduler::<u32>::new();
        assert!(scheduler.schedule(1, DELAY));
        assert!(scheduler.schedule(2, DELAY));

        assert_eq!(scheduler.cancel_all(), 2);
        assert_eq!(scheduler.pending(), 0);
        assert!(timeout(DELAY * 2, expired.recv()).await.is_err());
    }
}
