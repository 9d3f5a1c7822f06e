//! Subscription lifecycle for a live query.

use crate::cache::OrderedCache;
use crate::error::{Result, SyncError};
use crate::notify::ChangeNotifier;
use crate::reconcile;
use crate::types::{Document, ListConfig};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::types::{EventCallback, QueryEvent, QuerySource, Registration};

/// An ordered list of documents kept in sync with a live query.
///
/// Holds at most one active registration with a [`QuerySource`] at a time.
/// Incoming change batches are reconciled into the internal cache and
/// reported to the injected [`ChangeNotifier`]; the cache itself is never
/// handed out — reads go through [`item_count`](Self::item_count) and
/// [`item_at`](Self::item_at), so no other component can alias the backing
/// sequence.
///
/// The source may deliver from its own thread. A single lock over the
/// cache and notifier serializes batch application against `stop` and
/// `set_query`, and a generation stamp taken at registration time drops
/// any delivery that arrives after its registration was released.
pub struct LiveList {
    shared: Arc<Shared>,
    query: Option<Arc<dyn QuerySource>>,
    registration: Option<Box<dyn Registration>>,
}

struct Shared {
    state: Mutex<ListState>,
}

struct ListState {
    cache: OrderedCache,
    notifier: Box<dyn ChangeNotifier>,
    /// Bumped on every start and stop. Deliveries stamped with an older
    /// generation come from a released registration and are dropped.
    generation: u64,
    listening: bool,
}

impl LiveList {
    /// Create an idle list with no query configured.
    pub fn new(notifier: impl ChangeNotifier + 'static) -> Self {
        Self::with_config(ListConfig::default(), notifier)
    }

    /// Create an idle list sized for the given configuration.
    pub fn with_config(config: ListConfig, notifier: impl ChangeNotifier + 'static) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(ListState {
                    cache: OrderedCache::with_capacity(config.window_limit),
                    notifier: Box::new(notifier),
                    generation: 0,
                    listening: false,
                }),
            }),
            query: None,
            registration: None,
        }
    }

    /// Create an idle list with a query already configured.
    pub fn with_query(
        query: Arc<dyn QuerySource>,
        notifier: impl ChangeNotifier + 'static,
    ) -> Self {
        let mut list = Self::new(notifier);
        list.query = Some(query);
        list
    }

    // --- Lifecycle ---

    /// Register with the configured query and begin receiving batches.
    ///
    /// Idempotent while listening. Returns
    /// [`SyncError::NoQueryConfigured`] if no query has been set; callers
    /// that treat that as benign may ignore the error.
    pub fn start(&mut self) -> Result<()> {
        if self.registration.is_some() {
            debug!("start: already listening");
            return Ok(());
        }

        let query = match &self.query {
            Some(query) => Arc::clone(query),
            None => {
                warn!("start: no query configured");
                return Err(SyncError::NoQueryConfigured);
            }
        };

        let generation = {
            let mut state = self.shared.state.lock();
            state.generation += 1;
            state.listening = true;
            state.generation
        };

        let shared = Arc::clone(&self.shared);
        let on_event: EventCallback = Arc::new(move |event| shared.deliver(generation, event));

        self.registration = Some(query.subscribe(on_event));
        Ok(())
    }

    /// Release the registration and discard the cached results.
    ///
    /// Idempotent and safe to call at any time, including while a batch is
    /// being delivered on another thread. Emits `on_reset` followed by
    /// `on_data_changed` only if the list was listening or held documents;
    /// no further notifications are delivered for the released
    /// registration.
    pub fn stop(&mut self) {
        let was_listening = self.registration.is_some();
        if let Some(mut registration) = self.registration.take() {
            registration.unsubscribe();
        }

        let mut state = self.shared.state.lock();
        // Invalidates any delivery still in flight from the old
        // registration.
        state.generation += 1;
        state.listening = false;

        if was_listening || !state.cache.is_empty() {
            state.cache.clear();
            state.notifier.on_reset();
            state.notifier.on_data_changed();
        }
    }

    /// Replace the query: stop, assign, start.
    ///
    /// Always a full reset. Results of different queries are not
    /// order-compatible, so no diff is attempted against the old cache.
    pub fn set_query(&mut self, query: Arc<dyn QuerySource>) -> Result<()> {
        self.stop();
        self.query = Some(query);
        self.start()
    }

    /// Whether a registration is currently active.
    pub fn is_listening(&self) -> bool {
        self.registration.is_some()
    }

    // --- Read accessors ---

    pub fn item_count(&self) -> usize {
        self.shared.state.lock().cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.state.lock().cache.is_empty()
    }

    /// The document at `index` in the server's current order.
    pub fn item_at(&self, index: usize) -> Result<Document> {
        let state = self.shared.state.lock();
        state
            .cache
            .get(index)
            .cloned()
            .ok_or(SyncError::IndexOutOfBounds {
                index,
                len: state.cache.len(),
            })
    }
}

impl Drop for LiveList {
    fn drop(&mut self) {
        // Quiet teardown: release the registration without reset events
        // (the notifier's consumer is going away with us).
        if let Some(mut registration) = self.registration.take() {
            registration.unsubscribe();
        }

        // A source that retains the callback past unsubscribe must still
        // find the registration stale, exactly as after stop().
        let mut state = self.shared.state.lock();
        state.generation += 1;
        state.listening = false;
    }
}

impl Shared {
    fn deliver(&self, generation: u64, event: QueryEvent) {
        let mut state = self.state.lock();
        if !state.listening || state.generation != generation {
            debug!("dropping delivery from released registration");
            return;
        }

        match event {
            QueryEvent::Batch(batch) => {
                let ListState {
                    cache, notifier, ..
                } = &mut *state;
                if let Err(err) = reconcile::apply_batch(cache, &batch, notifier.as_mut()) {
                    // Contract violation by the source; failing fast beats
                    // silently rendering a corrupted order.
                    error!(%err, "query source sent an inconsistent batch");
                    panic!("{err}");
                }
            }
            QueryEvent::Error(err) => {
                error!(%err, "listen error");
                state.notifier.on_error(&err);
            }
        }
    }
}
