//! Property test: reconciliation agrees with a plain reference list.
//!
//! Valid change records are generated against a reference `Vec` driven by
//! the same indexing rule the source uses (each record numbered against
//! the sequence as mutated by its predecessors, a move's new index
//! computed after removal). Applying the same records through the engine
//! must yield the identical order, batch boundaries notwithstanding.

use livelist::{
    apply_batch, ChangeBatch, ChangeRecord, Document, NullNotifier, OrderedCache,
};
use proptest::prelude::*;
use serde_json::json;

/// Abstract op: concrete kind and indices are derived from the reference
/// list's current length, so every generated record is valid.
#[derive(Clone, Debug)]
struct OpSeed {
    kind: u8,
    a: usize,
    b: usize,
}

fn op_seeds() -> impl Strategy<Value = Vec<OpSeed>> {
    prop::collection::vec(
        (any::<u8>(), any::<usize>(), any::<usize>()).prop_map(|(kind, a, b)| OpSeed { kind, a, b }),
        0..200,
    )
}

/// Materialize seeds into valid records, mutating the reference list along
/// the way.
fn materialize(seeds: Vec<OpSeed>, reference: &mut Vec<Document>) -> Vec<ChangeRecord> {
    let mut next_id = 0u64;
    let mut records = Vec::with_capacity(seeds.len());

    for seed in seeds {
        let len = reference.len();
        let kind = if len == 0 { 0 } else { seed.kind % 3 };

        let record = match kind {
            0 => {
                let new_index = seed.a % (len + 1);
                next_id += 1;
                let document = Document::new(format!("d{next_id}"), json!({ "v": next_id }));
                reference.insert(new_index, document.clone());
                ChangeRecord::added(document, new_index)
            }
            1 => {
                let old_index = seed.a % len;
                // Valid positions after removal are 0..len-1 inclusive.
                let new_index = seed.b % len;
                let mut document = reference[old_index].clone();
                document.payload["v"] = json!(document.payload["v"].as_u64().unwrap_or(0) + 1);
                if old_index == new_index {
                    reference[old_index] = document.clone();
                } else {
                    reference.remove(old_index);
                    reference.insert(new_index, document.clone());
                }
                ChangeRecord::modified(document, old_index, new_index)
            }
            _ => {
                let old_index = seed.a % len;
                let document = reference.remove(old_index);
                ChangeRecord::removed(document, old_index)
            }
        };

        records.push(record);
    }

    records
}

proptest! {
    #[test]
    fn engine_order_matches_reference(seeds in op_seeds(), batch_size in 1usize..6) {
        let mut reference = Vec::new();
        let records = materialize(seeds, &mut reference);

        let mut cache = OrderedCache::new();
        let mut notifier = NullNotifier;
        for chunk in records.chunks(batch_size) {
            apply_batch(&mut cache, &ChangeBatch::new(chunk.to_vec()), &mut notifier)
                .expect("generated records are valid by construction");
        }

        let engine_ids: Vec<&str> = cache.iter().map(|d| d.id.as_str()).collect();
        let reference_ids: Vec<&str> = reference.iter().map(|d| d.id.as_str()).collect();
        prop_assert_eq!(engine_ids, reference_ids);

        // Identities stay unique throughout.
        let mut sorted: Vec<&str> = cache.iter().map(|d| d.id.as_str()).collect();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), cache.len());
    }
}
