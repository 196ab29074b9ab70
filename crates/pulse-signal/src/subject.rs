//! Subject - multicast cell with replay-last-value semantics

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Multicast cell holding the last published value plus a subscriber set
///
/// The upstream computation publishes once; the value is fanned out to every
/// subscriber as a clone. A subscriber arriving after stream start receives
/// the most recent value immediately rather than waiting for the next change.
///
/// Handles are cheap to clone and share one underlying cell.
pub struct Subject<T> {
    inner: Arc<Mutex<SubjectInner<T>>>,
}

struct SubjectInner<T> {
    last: T,
    subscribers: Vec<mpsc::UnboundedSender<T>>,
    closed: bool,
}

impl<T: Clone> Subject<T> {
    /// Create a subject seeded with an initial value
    ///
    /// The seed is what late-free subscribers replay before the first
    /// publish; signal sources seed their documented default here.
    pub fn new(initial: T) -> Self {
        Subject {
            inner: Arc::new(Mutex::new(SubjectInner {
                last: initial,
                subscribers: Vec::new(),
                closed: false,
            })),
        }
    }

    /// Publish a value to all current subscribers and store it as the
    /// replay value
    ///
    /// Subscribers whose receiver was dropped are pruned. After `close`
    /// this is a no-op. The whole read-modify-fanout happens under one
    /// lock, so no subscriber observes a torn snapshot.
    pub fn publish(&self, value: T) {
        let mut inner = self.inner.lock();
        if inner.closed {
            return;
        }
        inner.last = value.clone();
        inner.subscribers.retain(|tx| tx.send(value.clone()).is_ok());
    }

    /// Subscribe, immediately replaying the last value
    pub fn subscribe(&self) -> Subscription<T> {
        let mut inner = self.inner.lock();
        let (tx, rx) = mpsc::unbounded_channel();
        // Replay before registering: the new subscriber sees the current
        // value ahead of any emission that follows.
        let _ = tx.send(inner.last.clone());
        if !inner.closed {
            inner.subscribers.push(tx);
        }
        Subscription { rx }
    }

    /// Snapshot of the last published (or seeded) value
    pub fn latest(&self) -> T {
        self.inner.lock().last.clone()
    }

    /// Close the subject: drop every subscriber and ignore further publishes
    ///
    /// Pending subscriptions observe end of stream once drained; no further
    /// values reach any subscriber.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.closed = true;
        inner.subscribers.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Subject {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// One subscriber's view of a subject
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// Next emission; `None` once the subject is closed and drained
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Already-queued emission, if any, without waiting
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}
