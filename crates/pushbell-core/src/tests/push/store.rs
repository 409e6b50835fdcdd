use crate::{push::PushStore, tests::support::note};

/// WHAT: First insertion of an id reports new, the second does not
/// WHY: Only first-time arrivals may trigger a notification
#[test]
fn given_unseen_id_when_inserted_twice_then_only_first_is_new() {
    // Given: An empty store
    let mut store = PushStore::new();

    // When: The same id is inserted twice
    let first = store.insert_or_update("a", note("a", 10.0));
    let second = store.insert_or_update("a", note("a", 10.0));

    // Then: Only the first call is new
    assert!(first);
    assert!(!second);
    assert_eq!(store.len(), 1);
}

/// WHAT: Re-insertion overwrites the stored record
/// WHY: Updates from the stream must replace stale copies
#[test]
fn given_known_id_when_updated_then_record_is_overwritten() {
    // Given: A store holding an active push
    let mut store = PushStore::new();
    store.insert_or_update("a", note("a", 10.0));

    // When: The push is updated to inactive
    let mut updated = note("a", 10.0);
    updated.active = false;
    updated.modified = 30.0;
    let is_new = store.insert_or_update("a", updated.clone());

    // Then: The update is not new but is stored
    assert!(!is_new);
    assert_eq!(store.get("a"), Some(&updated));
}

/// WHAT: Distinct ids are all new
/// WHY: The collection is keyed by id only
#[test]
fn given_distinct_ids_when_inserted_then_each_is_new() {
    // Given: An empty store
    let mut store = PushStore::new();

    // When: Three different ids are inserted
    let results: Vec<bool> = ["a", "b", "c"]
        .iter()
        .map(|id| store.insert_or_update(*id, note(id, 1.0)))
        .collect();

    // Then: All are new
    assert_eq!(results, vec![true, true, true]);
    assert!(!store.is_empty());
}
