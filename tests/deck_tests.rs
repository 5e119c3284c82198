use chrono::NaiveDate;
use std::cell::Cell;
use study_pacer::{
    ApplyOutcome, DeckConfigStore, DeckNode, DeckRecord, LimitUpdate, MemoryDeckStore,
    PersistenceError, apply_limit_with_confirmation, compute_duration_from_rate,
    compute_rate_from_duration, flatten_tree,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_decks() -> Vec<DeckRecord> {
    vec![
        DeckRecord::new(1, "Spanish", 20),
        DeckRecord::new(2, "verbs", 10).with_parent(1),
        DeckRecord::new(3, "Nouns", 15).with_parent(1),
        DeckRecord::new(4, "biology", 5),
        DeckRecord::new(5, "Irregular", 8).with_parent(2),
    ]
}

#[test]
fn build_tree_orders_siblings_case_insensitively() {
    let tree = DeckNode::build_tree(&sample_decks());
    let roots: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(roots, vec!["biology", "Spanish"]);
    let spanish = &tree[1];
    let children: Vec<&str> = spanish.children.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(children, vec!["Nouns", "verbs"]);
}

#[test]
fn flatten_tree_walks_parents_before_children() {
    let entries = flatten_tree(&DeckNode::build_tree(&sample_decks()));
    let labels: Vec<String> = entries.iter().map(|e| e.label()).collect();
    assert_eq!(
        labels,
        vec![
            "biology".to_string(),
            "Spanish".to_string(),
            "    Nouns".to_string(),
            "    verbs".to_string(),
            "        Irregular".to_string(),
        ]
    );
    assert_eq!(entries[4].depth, 2);
    assert_eq!(entries[4].id, 5);
}

#[test]
fn unknown_parent_and_cycles_become_roots() {
    let records = vec![
        DeckRecord::new(1, "Orphan", 1).with_parent(99),
        DeckRecord::new(2, "A", 1).with_parent(3),
        DeckRecord::new(3, "B", 1).with_parent(2),
    ];
    let entries = flatten_tree(&DeckNode::build_tree(&records));
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].name, "Orphan");
    assert_eq!(entries[0].depth, 0);
    assert_eq!((entries[1].name.as_str(), entries[1].depth), ("A", 0));
    assert_eq!((entries[2].name.as_str(), entries[2].depth), ("B", 1));
}

#[test]
fn limit_update_only_from_derived_rate() {
    let rate_plan = compute_rate_from_duration(1000, d(2024, 1, 1), 30, true, false).unwrap();
    assert_eq!(
        LimitUpdate::from_result(&rate_plan, 7),
        Some(LimitUpdate {
            deck_id: 7,
            new_limit: 34
        })
    );

    let date_plan = compute_duration_from_rate(1000, d(2024, 1, 1), 30, true, false).unwrap();
    assert_eq!(LimitUpdate::from_result(&date_plan, 7), None);
}

#[test]
fn declined_confirmation_leaves_deck_untouched() {
    let store = MemoryDeckStore::new(sample_decks()).unwrap();
    let asked = Cell::new(false);
    let update = LimitUpdate {
        deck_id: 3,
        new_limit: 42,
    };
    let outcome = apply_limit_with_confirmation(&store, update, |deck, limit| {
        asked.set(true);
        assert_eq!(deck.name, "Nouns");
        assert_eq!(limit, 42);
        false
    })
    .unwrap();
    assert!(asked.get());
    assert_eq!(outcome, ApplyOutcome::Declined);
    assert_eq!(store.find_deck(3).unwrap().unwrap().new_per_day, 15);
}

#[test]
fn confirmed_update_is_written() {
    let store = MemoryDeckStore::new(sample_decks()).unwrap();
    let update = LimitUpdate {
        deck_id: 3,
        new_limit: 42,
    };
    let outcome = apply_limit_with_confirmation(&store, update, |_, _| true).unwrap();
    assert_eq!(
        outcome,
        ApplyOutcome::Applied {
            previous: 15,
            current: 42
        }
    );
    assert_eq!(store.find_deck(3).unwrap().unwrap().new_per_day, 42);
}

#[test]
fn unknown_deck_is_reported_without_prompting() {
    let store = MemoryDeckStore::new(sample_decks()).unwrap();
    let update = LimitUpdate {
        deck_id: 404,
        new_limit: 1,
    };
    let err = apply_limit_with_confirmation(&store, update, |_, _| {
        panic!("should not prompt for a missing deck")
    })
    .unwrap_err();
    assert!(matches!(err, PersistenceError::DeckNotFound(404)));
}

#[test]
fn zero_limit_is_rejected() {
    let store = MemoryDeckStore::new(sample_decks()).unwrap();
    let update = LimitUpdate {
        deck_id: 1,
        new_limit: 0,
    };
    let err = apply_limit_with_confirmation(&store, update, |_, _| true).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
    assert_eq!(store.find_deck(1).unwrap().unwrap().new_per_day, 20);
}

#[test]
fn memory_store_rejects_duplicate_ids() {
    let decks = vec![DeckRecord::new(1, "A", 1), DeckRecord::new(1, "B", 1)];
    assert!(matches!(
        MemoryDeckStore::new(decks),
        Err(PersistenceError::InvalidData(_))
    ));
}
