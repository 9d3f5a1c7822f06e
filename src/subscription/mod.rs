//! Live query subscription.
//!
//! A [`LiveList`] holds at most one registration with a [`QuerySource`].
//! While listening, each incoming change batch is reconciled into the
//! internal cache and reported through the injected notifier; source
//! errors are logged and forwarded without touching the cache.
//!
//! # Example
//!
//! ```
//! use livelist::{ChangeBatch, ChangeRecord, Document, LiveList, LocalQuery, NullNotifier};
//! use serde_json::json;
//!
//! let query = LocalQuery::new();
//! let mut list = LiveList::with_query(query.clone(), NullNotifier);
//! list.start()?;
//!
//! query.push_batch(ChangeBatch::new(vec![ChangeRecord::added(
//!     Document::new("doc-1", json!({ "name": "Burger Hut" })),
//!     0,
//! )]));
//!
//! assert_eq!(list.item_count(), 1);
//! list.stop();
//! # Ok::<(), livelist::SyncError>(())
//! ```

mod local;
mod manager;
mod types;

pub use local::LocalQuery;
pub use manager::LiveList;
pub use types::{EventCallback, QueryEvent, QuerySource, Registration};
