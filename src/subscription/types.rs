//! Query source boundary types.

use crate::error::SubscriptionError;
use crate::types::ChangeBatch;
use std::sync::Arc;

/// One delivery from the query source. Exactly one of a batch or an error
/// per event, by construction.
#[derive(Clone, Debug)]
pub enum QueryEvent {
    /// An atomic, ordered set of change records.
    Batch(ChangeBatch),

    /// A transient or terminal source failure. The source may keep
    /// delivering batches afterwards or may require re-subscription; both
    /// are tolerated.
    Error(SubscriptionError),
}

/// Callback a subscriber hands to the source. The source may invoke it
/// from its own thread; the subscriber serializes processing internally.
pub type EventCallback = Arc<dyn Fn(QueryEvent) + Send + Sync>;

/// A live query that delivers incremental change batches.
pub trait QuerySource: Send + Sync {
    /// Register a listener. Delivery to `on_event` is one event at a time;
    /// indices in each batch assume all prior batches have been applied.
    fn subscribe(&self, on_event: EventCallback) -> Box<dyn Registration>;
}

/// Handle for an active registration with a query source. Releasing it
/// stops delivery.
pub trait Registration: Send {
    /// Release the registration. Idempotent.
    fn unsubscribe(&mut self);
}
