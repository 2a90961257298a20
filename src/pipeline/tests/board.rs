use std::collections::{HashMap, HashSet};

use super::common::*;
use crate::ats::{STATUS_ACTIVE, STATUS_REJECTED};
use crate::pipeline::{reconcile, BoardStore, REJECTED_BUCKET, UNKNOWN_BUCKET};

fn build_store(applications: &[crate::ats::Application]) -> BoardStore {
    let catalog = catalog();
    let mut store = BoardStore::new(&catalog);
    let summaries = reconcile(applications);
    store.rebuild(&summaries, &catalog, &HashMap::new());
    store
}

#[test]
fn rejection_newer_than_active_wins_placement() {
    let store = build_store(&[
        application(
            "app-active",
            "42",
            ROLE,
            STATUS_ACTIVE,
            Some(("stage-phone", "Phone Screen")),
            1,
        ),
        application("app-rejected", "42", ROLE, STATUS_REJECTED, None, 5),
    ]);

    assert_eq!(bucket_candidates(store.bucket(REJECTED_BUCKET)), vec!["42"]);
    assert!(store.bucket("Phone Screen").is_empty());
}

#[test]
fn active_newer_than_rejection_wins_placement() {
    let store = build_store(&[
        application("app-rejected", "42", ROLE, STATUS_REJECTED, None, 1),
        application(
            "app-active",
            "42",
            ROLE,
            STATUS_ACTIVE,
            Some(("stage-onsite", "Onsite")),
            5,
        ),
    ]);

    assert_eq!(bucket_candidates(store.bucket("Onsite")), vec!["42"]);
    assert!(store.bucket(REJECTED_BUCKET).is_empty());
}

#[test]
fn absent_stage_falls_back_to_unknown_not_dropped() {
    let store = build_store(&[application("app-1", "42", ROLE, STATUS_ACTIVE, None, 1)]);

    assert_eq!(bucket_candidates(store.bucket(UNKNOWN_BUCKET)), vec!["42"]);
}

#[test]
fn unrecognized_stage_name_falls_back_to_unknown() {
    let store = build_store(&[application(
        "app-1",
        "42",
        ROLE,
        STATUS_ACTIVE,
        Some(("stage-ghost", "Background Check")),
        1,
    )]);

    assert_eq!(bucket_candidates(store.bucket(UNKNOWN_BUCKET)), vec!["42"]);
    assert!(store.bucket("Background Check").is_empty());
}

#[test]
fn each_candidate_appears_in_exactly_one_bucket() {
    let store = build_store(&[
        application(
            "app-a",
            "42",
            ROLE,
            STATUS_ACTIVE,
            Some(("stage-phone", "Phone Screen")),
            1,
        ),
        application(
            "app-b",
            "42",
            ROLE,
            STATUS_ACTIVE,
            Some(("stage-onsite", "Onsite")),
            4,
        ),
        application("app-c", "42", ROLE, STATUS_REJECTED, None, 2),
    ]);

    let appearances: usize = store
        .bucket_names()
        .map(|name| {
            store
                .bucket(name)
                .iter()
                .filter(|card| card.candidate_id.0 == "42")
                .count()
        })
        .sum();
    assert_eq!(appearances, 1);
    // Newest record is the Onsite active one.
    assert_eq!(store.bucket_of(&candidate_id("42")), Some("Onsite"));
}

#[test]
fn rebuild_is_idempotent_across_input_orderings() {
    let applications = vec![
        application(
            "app-42",
            "42",
            ROLE,
            STATUS_ACTIVE,
            Some(("stage-phone", "Phone Screen")),
            3,
        ),
        application(
            "app-7",
            "7",
            ROLE,
            STATUS_ACTIVE,
            Some(("stage-onsite", "Onsite")),
            2,
        ),
        application("app-9", "9", ROLE, STATUS_REJECTED, None, 4),
    ];
    let mut reversed = applications.clone();
    reversed.reverse();

    let forward = build_store(&applications);
    let backward = build_store(&reversed);

    for name in forward.bucket_names() {
        let lhs: HashSet<&str> = bucket_candidates(forward.bucket(name)).into_iter().collect();
        let rhs: HashSet<&str> = bucket_candidates(backward.bucket(name)).into_iter().collect();
        assert_eq!(lhs, rhs, "bucket {name} differs between orderings");
    }
}

#[test]
fn absent_bucket_reads_as_empty_column() {
    let store = BoardStore::new(&catalog());
    assert!(store.bucket("Never Heard Of It").is_empty());
}

#[test]
fn move_card_relocates_and_creates_target_bucket() {
    let mut store = build_store(&[application(
        "app-42",
        "42",
        ROLE,
        STATUS_ACTIVE,
        Some(("stage-phone", "Phone Screen")),
        1,
    )]);

    store.move_card(&candidate_id("42"), "Phone Screen", "Onsite");

    assert!(store.bucket("Phone Screen").is_empty());
    assert_eq!(bucket_candidates(store.bucket("Onsite")), vec!["42"]);
    assert_eq!(store.bucket_of(&candidate_id("42")), Some("Onsite"));
}

#[test]
fn move_card_is_noop_when_card_absent_from_source() {
    let mut store = build_store(&[application(
        "app-42",
        "42",
        ROLE,
        STATUS_ACTIVE,
        Some(("stage-phone", "Phone Screen")),
        1,
    )]);

    // Wrong source bucket: the race-tolerant contract is to do nothing.
    store.move_card(&candidate_id("42"), "Onsite", "Offer");

    assert_eq!(bucket_candidates(store.bucket("Phone Screen")), vec!["42"]);
    assert!(store.bucket("Offer").is_empty());
}

#[test]
fn rebuild_bumps_generation_and_replaces_contents() {
    let catalog = catalog();
    let mut store = BoardStore::new(&catalog);
    assert_eq!(store.generation(), 0);

    let first = reconcile(&[application(
        "app-42",
        "42",
        ROLE,
        STATUS_ACTIVE,
        Some(("stage-phone", "Phone Screen")),
        1,
    )]);
    store.rebuild(&first, &catalog, &HashMap::new());
    assert_eq!(store.generation(), 1);
    assert_eq!(bucket_candidates(store.bucket("Phone Screen")), vec!["42"]);

    let second = reconcile(&[application(
        "app-7",
        "7",
        ROLE,
        STATUS_ACTIVE,
        Some(("stage-onsite", "Onsite")),
        1,
    )]);
    store.rebuild(&second, &catalog, &HashMap::new());
    assert_eq!(store.generation(), 2);
    assert!(store.bucket("Phone Screen").is_empty());
    assert_eq!(bucket_candidates(store.bucket("Onsite")), vec!["7"]);
}

#[test]
fn missing_display_name_gets_placeholder() {
    let store = build_store(&[application(
        "app-42",
        "42",
        ROLE,
        STATUS_ACTIVE,
        Some(("stage-phone", "Phone Screen")),
        1,
    )]);

    let card = store.card(&candidate_id("42")).expect("card placed");
    assert_eq!(card.display_name, "Candidate 42");
}
