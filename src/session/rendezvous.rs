//! Signal rendezvous map
//!
//! Pairs a signal name with a queue of one-shot waiters. Any number of
//! waiters may be registered per name; firing a signal resolves and
//! clears all of them. A signal that is never fired leaves its waiters
//! pending indefinitely.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::oneshot;

/// Registry mapping a signal name to the waiters parked on it.
///
/// This is the one shared mutable structure touched from both the
/// intake side and the session side, so the map sits behind a mutex.
#[derive(Debug, Default)]
pub struct Rendezvous {
    waiters: Mutex<HashMap<String, Vec<oneshot::Sender<()>>>>,
}

impl Rendezvous {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a waiter for the next occurrence of `name`.
    ///
    /// The returned receiver resolves when [`signal`](Self::signal) fires
    /// for the same name.
    pub fn next_signal(&self, name: &str) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        let mut waiters = self.waiters.lock().unwrap();
        waiters.entry(name.to_string()).or_default().push(tx);
        rx
    }

    /// Fire `name`: resolve and clear every waiter registered for it.
    ///
    /// Returns the number of waiters woken. Unknown names are a no-op.
    pub fn signal(&self, name: &str) -> usize {
        let Some(parked) = self.waiters.lock().unwrap().remove(name) else {
            return 0;
        };
        let mut woken = 0;
        for tx in parked {
            if tx.send(()).is_ok() {
                woken += 1;
            }
        }
        log::debug!("Signal {} woke {} waiter(s)", name, woken);
        woken
    }

    /// Number of waiters currently parked on `name`
    pub fn pending(&self, name: &str) -> usize {
        self.waiters
            .lock()
            .unwrap()
            .get(name)
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signal_wakes_every_waiter_for_the_name() {
        let rendezvous = Rendezvous::new();

        let a = rendezvous.next_signal("ready");
        let b = rendezvous.next_signal("ready");
        let mut other = rendezvous.next_signal("other");
        assert_eq!(rendezvous.pending("ready"), 2);

        assert_eq!(rendezvous.signal("ready"), 2);
        a.await.unwrap();
        b.await.unwrap();

        // Waiters on other names are untouched
        assert_eq!(rendezvous.pending("other"), 1);
        assert!(other.try_recv().is_err());
    }

    #[test]
    fn test_signal_without_waiters_is_noop() {
        let rendezvous = Rendezvous::new();
        assert_eq!(rendezvous.signal("nobody-home"), 0);
    }

    #[test]
    fn test_signal_clears_the_queue() {
        let rendezvous = Rendezvous::new();
        let _rx = rendezvous.next_signal("once");

        assert_eq!(rendezvous.signal("once"), 1);
        assert_eq!(rendezvous.pending("once"), 0);
        assert_eq!(rendezvous.signal("once"), 0);
    }

    #[tokio::test]
    async fn test_unfired_signal_leaves_waiter_pending() {
        let rendezvous = Rendezvous::new();
        let mut rx = rendezvous.next_signal("never");

        // Still parked: nothing has fired
        assert!(rx.try_recv().is_err());
        assert_eq!(rendezvous.pending("never"), 1);
    }

    #[test]
    fn test_dropped_waiter_does_not_count_as_woken() {
        let rendezvous = Rendezvous::new();
        let rx = rendezvous.next_signal("ready");
        drop(rx);
        let _live = rendezvous.next_signal("ready");

        assert_eq!(rendezvous.signal("ready"), 1);
    }
}
