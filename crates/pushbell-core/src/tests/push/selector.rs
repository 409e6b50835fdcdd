use crate::{
    push::{PushRecord, PushStore, select_recent},
    tests::support::note,
};

fn ids(pushes: &[PushRecord]) -> Vec<&str> {
    pushes.iter().map(|p| p.id.as_str()).collect()
}

/// WHAT: Selection keeps the newest `limit` active pushes in ascending order
/// WHY: Cold start replays the most recent pushes, oldest first
#[test]
fn given_more_pushes_than_limit_when_selecting_then_newest_tail_survives() {
    // Given: Five active pushes inserted out of order
    let pushes = vec![
        note("c", 30.0),
        note("a", 10.0),
        note("e", 50.0),
        note("b", 20.0),
        note("d", 40.0),
    ];

    // When: Selecting with limit 3
    let selected = select_recent(&pushes, 3);

    // Then: The three most recently created remain, ascending
    assert_eq!(ids(&selected), vec!["c", "d", "e"]);
}

/// WHAT: Inactive pushes are never selected
/// WHY: Dismissed or deleted pushes must not be replayed
#[test]
fn given_inactive_pushes_when_selecting_then_they_are_filtered() {
    // Given: A mix of active and inactive pushes
    let mut inactive = note("b", 20.0);
    inactive.active = false;
    let pushes = vec![note("a", 10.0), inactive, note("c", 30.0)];

    // When: Selecting without a limit
    let selected = select_recent(&pushes, 0);

    // Then: Only active pushes remain
    assert_eq!(ids(&selected), vec!["a", "c"]);
}

/// WHAT: Equal creation times keep their input order
/// WHY: The sort must be stable
#[test]
fn given_equal_timestamps_when_selecting_then_input_order_is_kept() {
    // Given: Three pushes with the same creation time
    let pushes = vec![note("x", 5.0), note("y", 5.0), note("z", 5.0)];

    // When: Selecting
    let selected = select_recent(&pushes, 0);

    // Then: Order is unchanged
    assert_eq!(ids(&selected), vec!["x", "y", "z"]);
}

/// WHAT: Empty input selects nothing
/// WHY: Startup before any push has loaded must be a no-op
#[test]
fn given_empty_store_when_selecting_then_empty() {
    // Given: An empty store
    let store = PushStore::new();

    // When: Selecting recent pushes
    let selected = store.select_recent(10);

    // Then: Nothing is returned
    assert!(selected.is_empty());
}

/// WHAT: Selection never exceeds the limit
/// WHY: A cold start must not flood the desktop
#[test]
fn given_many_pushes_when_selecting_then_result_bounded_by_limit() {
    // Given: A store with twenty active pushes
    let mut store = PushStore::new();
    for i in 0..20 {
        let id = format!("p{i:02}");
        store.insert_or_update(id.clone(), note(&id, f64::from(i)));
    }

    // When: Selecting with limit 10
    let selected = store.select_recent(10);

    // Then: Exactly the ten newest are returned, ascending
    assert_eq!(selected.len(), 10);
    assert_eq!(selected.first().map(|p| p.id.as_str()), Some("p10"));
    assert_eq!(selected.last().map(|p| p.id.as_str()), Some("p19"));
}
