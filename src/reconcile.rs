//! Change batch reconciliation.
//!
//! Applies one ordered batch of positional change records to an
//! [`OrderedCache`], emitting the granular events a renderer needs. The
//! source numbers indices against the cache as it stands after the prior
//! records of the same batch, so records are applied strictly one at a
//! time, mutating before the next record's indices are interpreted.

use crate::cache::OrderedCache;
use crate::error::{Result, SyncError};
use crate::notify::ChangeNotifier;
use crate::types::{ChangeBatch, ChangeRecord, Document};

/// Apply a change batch to the cache, driving the notifier.
///
/// Emits one per-record event per change, then `on_data_changed` once.
/// Processing is not transactional: an index inconsistent with current
/// bounds returns [`SyncError::MalformedBatch`] with the cache left as it
/// was after the last fully applied record and no `on_data_changed`
/// emitted. A single record never half-applies; both indices of a move are
/// validated before either mutation.
pub fn apply_batch(
    cache: &mut OrderedCache,
    batch: &ChangeBatch,
    notifier: &mut dyn ChangeNotifier,
) -> Result<()> {
    for change in batch.changes() {
        apply_change(cache, change, notifier)?;
    }
    notifier.on_data_changed();
    Ok(())
}

/// Apply a single change record.
pub fn apply_change(
    cache: &mut OrderedCache,
    change: &ChangeRecord,
    notifier: &mut dyn ChangeNotifier,
) -> Result<()> {
    match change {
        ChangeRecord::Added {
            document,
            new_index,
        } => {
            // Insertion at len appends.
            if *new_index > cache.len() {
                return Err(malformed("added", document, *new_index, cache.len()));
            }
            cache.insert(*new_index, document.clone());
            notifier.on_inserted(*new_index);
        }

        ChangeRecord::Modified {
            document,
            old_index,
            new_index,
        } if old_index == new_index => {
            // Content-only update; position unchanged.
            if *old_index >= cache.len() {
                return Err(malformed("modified", document, *old_index, cache.len()));
            }
            cache.replace(*old_index, document.clone());
            notifier.on_changed(*old_index);
        }

        ChangeRecord::Modified {
            document,
            old_index,
            new_index,
        } => {
            // The source computes new_index against the sequence with the
            // old entry already removed. Validate both indices first so a
            // bad new_index cannot leave the record half-applied.
            if *old_index >= cache.len() {
                return Err(malformed("modified", document, *old_index, cache.len()));
            }
            if *new_index >= cache.len() {
                return Err(malformed("modified", document, *new_index, cache.len() - 1));
            }
            cache.remove(*old_index);
            cache.insert(*new_index, document.clone());
            notifier.on_moved(*old_index, *new_index);
        }

        ChangeRecord::Removed {
            document,
            old_index,
        } => {
            if *old_index >= cache.len() {
                return Err(malformed("removed", document, *old_index, cache.len()));
            }
            cache.remove(*old_index);
            notifier.on_removed(*old_index);
        }
    }

    Ok(())
}

fn malformed(kind: &str, document: &Document, index: usize, len: usize) -> SyncError {
    SyncError::MalformedBatch(format!(
        "{} record for document {} has index {} out of bounds (len {})",
        kind, document.id, index, len
    ))
}
