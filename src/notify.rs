//! Notification sink consumed by the list-rendering layer.
//!
//! The reconciliation engine reports every mutation as a granular event so
//! a renderer can animate or redraw only what changed, never rebuilding the
//! whole list. Consumers implement [`ChangeNotifier`]; every method has a
//! no-op default so a sink overrides only what it cares about.

use crate::error::SubscriptionError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Granular list mutation events, in the order a renderer should apply
/// them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListEvent {
    /// A document was inserted at `index`.
    Inserted { index: usize },

    /// The document at `index` was replaced in place.
    Changed { index: usize },

    /// The document at `from` was removed and reinserted at `to`.
    Moved { from: usize, to: usize },

    /// The document at `index` was removed.
    Removed { index: usize },

    /// The whole list was discarded (stop or query replacement).
    Reset,

    /// A batch (or a reset) finished; aggregate state such as
    /// empty-vs-nonempty may now be read.
    DataChanged,
}

/// Sink for list mutation events.
///
/// `on_data_changed` fires exactly once per processed batch, after all
/// per-record events, and once after `on_reset`. `on_error` fires once per
/// source-reported error; the cache and the displayed list are unchanged
/// when it does.
#[allow(unused_variables)]
pub trait ChangeNotifier: Send {
    fn on_inserted(&mut self, index: usize) {}
    fn on_changed(&mut self, index: usize) {}
    fn on_moved(&mut self, from: usize, to: usize) {}
    fn on_removed(&mut self, index: usize) {}
    fn on_reset(&mut self) {}
    fn on_data_changed(&mut self) {}
    fn on_error(&mut self, error: &SubscriptionError) {}
}

/// A notifier that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNotifier;

impl ChangeNotifier for NullNotifier {}

/// Buffers events (and errors) for later inspection. Useful in tests and
/// for debugging a reconciliation stream.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    events: Arc<parking_lot::Mutex<Vec<ListEvent>>>,
    errors: Arc<parking_lot::Mutex<Vec<SubscriptionError>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A second handle onto the same buffers, for inspecting from outside
    /// the owning list.
    pub fn handle(&self) -> Self {
        self.clone()
    }

    /// Drain and return all buffered events.
    pub fn take_events(&self) -> Vec<ListEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Drain and return all buffered errors.
    pub fn take_errors(&self) -> Vec<SubscriptionError> {
        std::mem::take(&mut *self.errors.lock())
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }
}

impl ChangeNotifier for RecordingNotifier {
    fn on_inserted(&mut self, index: usize) {
        self.events.lock().push(ListEvent::Inserted { index });
    }

    fn on_changed(&mut self, index: usize) {
        self.events.lock().push(ListEvent::Changed { index });
    }

    fn on_moved(&mut self, from: usize, to: usize) {
        self.events.lock().push(ListEvent::Moved { from, to });
    }

    fn on_removed(&mut self, index: usize) {
        self.events.lock().push(ListEvent::Removed { index });
    }

    fn on_reset(&mut self) {
        self.events.lock().push(ListEvent::Reset);
    }

    fn on_data_changed(&mut self) {
        self.events.lock().push(ListEvent::DataChanged);
    }

    fn on_error(&mut self, error: &SubscriptionError) {
        self.errors.lock().push(error.clone());
    }
}

/// Forwards events over a bounded channel to a consumer on another thread
/// (typically the render loop). Events are dropped with a warning if the
/// consumer falls behind; a renderer that missed events should re-read the
/// list through the read accessors.
pub struct ChannelNotifier {
    sender: crossbeam_channel::Sender<ListEvent>,
    errors: crossbeam_channel::Sender<SubscriptionError>,
}

impl ChannelNotifier {
    /// Default buffer before events are dropped.
    pub const DEFAULT_BUFFER: usize = 1000;

    /// Create a notifier plus the receiving ends for events and errors.
    pub fn bounded(
        buffer: usize,
    ) -> (
        Self,
        crossbeam_channel::Receiver<ListEvent>,
        crossbeam_channel::Receiver<SubscriptionError>,
    ) {
        let (sender, receiver) = crossbeam_channel::bounded(buffer);
        let (errors, error_receiver) = crossbeam_channel::bounded(buffer);
        (Self { sender, errors }, receiver, error_receiver)
    }

    fn send(&self, event: ListEvent) {
        if let Err(crossbeam_channel::TrySendError::Full(event)) = self.sender.try_send(event) {
            warn!(?event, "notification buffer full, dropping event");
        }
    }
}

impl ChangeNotifier for ChannelNotifier {
    fn on_inserted(&mut self, index: usize) {
        self.send(ListEvent::Inserted { index });
    }

    fn on_changed(&mut self, index: usize) {
        self.send(ListEvent::Changed { index });
    }

    fn on_moved(&mut self, from: usize, to: usize) {
        self.send(ListEvent::Moved { from, to });
    }

    fn on_removed(&mut self, index: usize) {
        self.send(ListEvent::Removed { index });
    }

    fn on_reset(&mut self) {
        self.send(ListEvent::Reset);
    }

    fn on_data_changed(&mut self) {
        self.send(ListEvent::DataChanged);
    }

    fn on_error(&mut self, error: &SubscriptionError) {
        if let Err(crossbeam_channel::TrySendError::Full(error)) =
            self.errors.try_send(error.clone())
        {
            warn!(%error, "error buffer full, dropping error");
        }
    }
}
