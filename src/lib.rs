//! # livelist
//!
//! A client-side ordered cache kept in sync with a live remote query.
//!
//! The query source delivers incremental, ordered change batches
//! (documents added, modified, or removed, each with an old and new
//! position). Reconciliation applies each batch with the minimum set of
//! mutations and reports exactly the granular insert/replace/move/remove
//! events a list renderer needs to animate or redraw only what changed.
//!
//! ## Core Concepts
//!
//! - **Documents**: Stable identity plus an opaque JSON payload
//! - **Change batches**: One atomic, ordered set of positional change
//!   records per server round-trip
//! - **Reconciliation**: Records applied strictly in batch order, each
//!   record's indices interpreted against the cache as already mutated by
//!   its predecessors
//! - **Subscription**: At most one live registration with a query source;
//!   stop and query replacement always reset the list
//!
//! ## Example
//!
//! ```ignore
//! use livelist::{LiveList, RecordingNotifier};
//!
//! let notifier = RecordingNotifier::new();
//! let events = notifier.handle();
//! let mut list = LiveList::with_query(query, notifier);
//!
//! list.start()?;
//! // ... the source delivers batches; render from the read accessors:
//! for i in 0..list.item_count() {
//!     println!("{}", list.item_at(i)?.id);
//! }
//! list.stop();
//! ```

pub mod cache;
pub mod error;
pub mod notify;
pub mod reconcile;
pub mod subscription;
pub mod types;

// Re-exports
pub use cache::OrderedCache;
pub use error::{Result, SubscriptionError, SubscriptionErrorKind, SyncError};
pub use notify::{ChangeNotifier, ChannelNotifier, ListEvent, NullNotifier, RecordingNotifier};
pub use reconcile::{apply_batch, apply_change};
pub use subscription::{
    EventCallback, LiveList, LocalQuery, QueryEvent, QuerySource, Registration,
};
pub use types::{ChangeBatch, ChangeRecord, Document, DocumentId, ListConfig};
