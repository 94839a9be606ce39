// src/crawl/frontier.rs
// =============================================================================
// The shared work queue for the crawl, plus the set of URLs already visited.
//
// Frontier:
// - A FIFO queue of URLs waiting to be crawled (duplicates allowed)
// - A count of items that workers are processing right now ("in flight")
// - A closed flag that tells idle workers to stop
//
// The crawl is finished ("drained") when the queue is empty AND nothing is in
// flight. Checking only the queue is not enough: a worker halfway through a
// page may still add new links.
//
// VisitedSet:
// - Every URL a worker has claimed for crawling
// - claim() is a single atomic "check and insert", so two workers can never
//   both win the same URL
//
// Rust concepts:
// - Interior mutability: Mutex lets shared (&self) methods change the queue
// - RAII guards: InFlight marks the item done when it is dropped
// - tokio::sync::Notify: async wake-ups without busy waiting
// =============================================================================

use std::collections::VecDeque;

use dashmap::DashSet;
use parking_lot::Mutex;
use tokio::sync::Notify;

// Everything protected by the frontier's lock
#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<String>,
    in_flight: usize,
    closed: bool,
}

/// Concurrent FIFO of URLs waiting to be crawled.
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<QueueState>,
    // Wakes workers waiting in dequeue()
    work_ready: Notify,
    // Wakes the coordinator waiting in wait_drained()
    drained: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a URL. No duplicate check; those are filtered at visit time.
    pub fn enqueue(&self, url: impl Into<String>) {
        self.state.lock().pending.push_back(url.into());
        self.work_ready.notify_one();
    }

    // Waits for the next URL
    //
    // Returns:
    //   Some(InFlight) - a URL to crawl, already counted as in flight
    //   None           - the frontier was closed and there is nothing left
    //
    // Taking the URL off the queue and counting it as in flight happen under
    // one lock, so the coordinator never sees an empty queue with zero
    // in-flight items while a worker is holding a URL.
    pub async fn dequeue(&self) -> Option<InFlight<'_>> {
        loop {
            let notified = self.work_ready.notified();
            tokio::pin!(notified);
            // Register before looking at the queue so a close() or enqueue()
            // that happens after our check still wakes us.
            notified.as_mut().enable();

            {
                let mut state = self.state.lock();
                if let Some(url) = state.pending.pop_front() {
                    state.in_flight += 1;
                    let more_waiting = !state.pending.is_empty();
                    drop(state);

                    // notify_one() only stores one permit, pass it along
                    if more_waiting {
                        self.work_ready.notify_one();
                    }
                    return Some(InFlight {
                        frontier: self,
                        url,
                    });
                }
                if state.closed {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Marks one in-flight item as finished.
    ///
    /// Called by [`InFlight`] when it is dropped.
    pub fn mark_done(&self) {
        let drained = {
            let mut state = self.state.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
            state.in_flight == 0 && state.pending.is_empty()
        };

        if drained {
            self.drained.notify_waiters();
        }
    }

    /// True when the queue is empty and no worker is mid-item.
    pub fn is_drained(&self) -> bool {
        let state = self.state.lock();
        state.in_flight == 0 && state.pending.is_empty()
    }

    /// Resolves once the frontier is drained.
    pub async fn wait_drained(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_drained() {
                return;
            }
            notified.await;
        }
    }

    /// Stops the frontier: every current and future dequeue() returns None
    /// once the queue is empty.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.work_ready.notify_waiters();
    }

    /// Number of URLs waiting in the queue (duplicates included).
    pub fn len(&self) -> usize {
        self.state.lock().pending.len()
    }
}

/// A URL taken from the frontier. Dropping it calls [`Frontier::mark_done`].
#[derive(Debug)]
pub struct InFlight<'a> {
    frontier: &'a Frontier,
    url: String,
}

impl InFlight<'_> {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.frontier.mark_done();
    }
}

/// URLs that a worker has already claimed in this run. Only ever grows.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    // Atomically checks and claims a URL
    //
    // Returns: true if this call added the URL (the caller may crawl it),
    //          false if some worker claimed it before
    pub fn claim(&self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a parking_lot::Mutex and not tokio::sync::Mutex?
//    - We never .await while holding the lock
//    - A plain (blocking) mutex is fine for tiny critical sections like these
//    - The guard is dropped before every .await in this file
//
// 2. What is Notify?
//    - A way for one task to wake others up
//    - notify_one() wakes one waiter (or saves a permit for the next one)
//    - notify_waiters() wakes everyone currently waiting
//
// 3. What is enable() for?
//    - It registers the Notified future before we check the state
//    - Without it, a wake-up between "check" and "await" could be lost
//
// 4. What is a Drop guard?
//    - Drop::drop runs automatically when a value goes out of scope
//    - Even if the worker returns early (or panics), the item is marked done
//    - That keeps the in-flight count honest, so the crawl always ends
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_fifo_order() {
        let frontier = Frontier::new();
        frontier.enqueue("https://a.com/1");
        frontier.enqueue("https://a.com/2");

        let first = frontier.dequeue().await.unwrap();
        assert_eq!(first.url(), "https://a.com/1");
        let second = frontier.dequeue().await.unwrap();
        assert_eq!(second.url(), "https://a.com/2");
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let frontier = Frontier::new();
        frontier.enqueue("https://a.com/");
        frontier.enqueue("https://a.com/");
        assert_eq!(frontier.len(), 2);
    }

    #[tokio::test]
    async fn test_not_drained_while_in_flight() {
        let frontier = Frontier::new();
        frontier.enqueue("https://a.com/");
        assert!(!frontier.is_drained());

        let item = frontier.dequeue().await.unwrap();
        // Queue is empty but a worker still holds an item
        assert_eq!(frontier.len(), 0);
        assert!(!frontier.is_drained());

        drop(item);
        assert!(frontier.is_drained());
    }

    #[tokio::test]
    async fn test_child_enqueue_before_done_keeps_crawl_alive() {
        let frontier = Frontier::new();
        frontier.enqueue("https://a.com/");

        let item = frontier.dequeue().await.unwrap();
        frontier.enqueue("https://a.com/child");
        drop(item);

        assert!(!frontier.is_drained());
        let child = frontier.dequeue().await.unwrap();
        drop(child);
        assert!(frontier.is_drained());
    }

    #[tokio::test]
    async fn test_close_wakes_waiting_worker() {
        let frontier = Arc::new(Frontier::new());
        let waiter = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.dequeue().await.is_none() })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        frontier.close();

        let got_none = tokio::time::timeout(Duration::from_secs(2), waiter)
            .await
            .expect("worker was not woken")
            .unwrap();
        assert!(got_none);
    }

    #[tokio::test]
    async fn test_enqueue_wakes_waiting_worker() {
        let frontier = Arc::new(Frontier::new());
        let waiter = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.dequeue().await.map(|item| item.url().to_string()) })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        frontier.enqueue("https://a.com/late");

        let url = tokio::time::timeout(Duration::from_secs(2), waiter)
            .await
            .expect("worker was not woken")
            .unwrap();
        assert_eq!(url.as_deref(), Some("https://a.com/late"));
    }

    #[tokio::test]
    async fn test_wait_drained_fires_after_last_item() {
        let frontier = Arc::new(Frontier::new());
        frontier.enqueue("https://a.com/");

        let coordinator = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move { frontier.wait_drained().await })
        };

        let item = frontier.dequeue().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!coordinator.is_finished());
        drop(item);

        tokio::time::timeout(Duration::from_secs(2), coordinator)
            .await
            .expect("drain was not detected")
            .unwrap();
    }

    #[test]
    fn test_visited_claim_is_once() {
        let visited = VisitedSet::new();
        assert!(!visited.contains("https://a.com/"));
        assert!(visited.claim("https://a.com/"));
        assert!(!visited.claim("https://a.com/"));
        assert!(visited.contains("https://a.com/"));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_visited_claim_under_contention() {
        let visited = Arc::new(VisitedSet::new());
        let winners: usize = (0..8)
            .map(|_| {
                let visited = Arc::clone(&visited);
                std::thread::spawn(move || visited.claim("https://a.com/") as usize)
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| h.join().unwrap())
            .sum();
        assert_eq!(winners, 1);
    }
}
