//! In-process query source.

use crate::error::SubscriptionError;
use crate::types::ChangeBatch;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use super::types::{EventCallback, QueryEvent, QuerySource, Registration};

/// A [`QuerySource`] fed by hand, fanning each pushed event out to every
/// registered listener. Stands in for a remote query in tests, demos, and
/// local pipelines; delivery happens synchronously on the pushing thread,
/// which satisfies the one-event-at-a-time contract as long as pushes are
/// not interleaved from multiple threads.
pub struct LocalQuery {
    listeners: Arc<Mutex<Vec<Listener>>>,
    next_id: AtomicU64,
}

struct Listener {
    id: u64,
    callback: EventCallback,
}

impl LocalQuery {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(1),
        })
    }

    /// Deliver a change batch to every listener.
    pub fn push_batch(&self, batch: ChangeBatch) {
        self.push(QueryEvent::Batch(batch));
    }

    /// Deliver a source error to every listener.
    pub fn push_error(&self, error: SubscriptionError) {
        self.push(QueryEvent::Error(error));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    fn push(&self, event: QueryEvent) {
        // Snapshot the callbacks so delivery happens outside the listener
        // lock; an unsubscribe racing a push is resolved by the
        // subscriber's own staleness check.
        let callbacks: Vec<EventCallback> = self
            .listeners
            .lock()
            .iter()
            .map(|listener| Arc::clone(&listener.callback))
            .collect();

        for callback in callbacks {
            callback(event.clone());
        }
    }
}

impl QuerySource for LocalQuery {
    fn subscribe(&self, on_event: EventCallback) -> Box<dyn Registration> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().push(Listener {
            id,
            callback: on_event,
        });

        Box::new(LocalRegistration {
            listeners: Arc::downgrade(&self.listeners),
            id,
        })
    }
}

struct LocalRegistration {
    listeners: Weak<Mutex<Vec<Listener>>>,
    id: u64,
}

impl Registration for LocalRegistration {
    fn unsubscribe(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().retain(|listener| listener.id != self.id);
        }
        // Later calls are no-ops.
        self.listeners = Weak::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChangeRecord, Document};
    use serde_json::json;

    fn counting_callback() -> (EventCallback, Arc<AtomicU64>) {
        let count = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&count);
        let callback: EventCallback = Arc::new(move |_event| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (callback, count)
    }

    #[test]
    fn test_fan_out_to_all_listeners() {
        let query = LocalQuery::new();
        let (cb1, count1) = counting_callback();
        let (cb2, count2) = counting_callback();
        let _reg1 = query.subscribe(cb1);
        let _reg2 = query.subscribe(cb2);

        query.push_batch(ChangeBatch::new(vec![ChangeRecord::added(
            Document::new("a", json!({})),
            0,
        )]));

        assert_eq!(count1.load(Ordering::SeqCst), 1);
        assert_eq!(count2.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let query = LocalQuery::new();
        let (callback, count) = counting_callback();
        let mut registration = query.subscribe(callback);
        assert_eq!(query.listener_count(), 1);

        registration.unsubscribe();
        assert_eq!(query.listener_count(), 0);

        query.push_error(SubscriptionError::backend("boom"));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let query = LocalQuery::new();
        let (callback, _count) = counting_callback();
        let mut registration = query.subscribe(callback);

        registration.unsubscribe();
        registration.unsubscribe();
        assert_eq!(query.listener_count(), 0);
    }
}
