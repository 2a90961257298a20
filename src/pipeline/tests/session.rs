use std::sync::Arc;

use super::common::*;
use crate::ats::{FixtureAts, RoleId};
use crate::pipeline::{BoardError, BoardSession, REJECTED_BUCKET};

#[tokio::test]
async fn open_builds_catalog_and_initial_board() {
    let session = open_board(Arc::new(board_fixture())).await;

    let snapshot = session.snapshot();
    let names: Vec<&str> = snapshot
        .columns
        .iter()
        .map(|column| column.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["Applied", "Phone Screen", "Onsite", "Offer", REJECTED_BUCKET]
    );

    assert_eq!(bucket_candidates(&session.bucket("Phone Screen")), vec!["42"]);
    assert_eq!(bucket_candidates(&session.bucket("Onsite")), vec!["7"]);
    assert_eq!(bucket_candidates(&session.bucket(REJECTED_BUCKET)), vec!["9"]);
}

#[tokio::test]
async fn cards_carry_remote_display_names() {
    let session = open_board(Arc::new(board_fixture())).await;

    let cards = session.bucket("Phone Screen");
    assert_eq!(cards[0].display_name, "Jordan Smith");
}

#[tokio::test]
async fn failed_candidate_detail_degrades_to_placeholder() {
    let fixture = board_fixture();
    fixture.mark_candidate_unreachable(candidate_id("42"));
    let session = open_board(Arc::new(fixture)).await;

    // The card is retained, not dropped, and the rest of the batch is intact.
    let cards = session.bucket("Phone Screen");
    assert_eq!(bucket_candidates(&cards), vec!["42"]);
    assert_eq!(cards[0].display_name, "Candidate 42");
    assert_eq!(session.bucket("Onsite")[0].display_name, "Casey Wu");
}

#[tokio::test]
async fn refresh_rebuilds_wholesale_and_bumps_generation() {
    let fixture = Arc::new(board_fixture());
    let session = open_board(fixture.clone()).await;
    let generation = session.generation();

    session.refresh().await.expect("refresh succeeds");

    assert_eq!(session.generation(), generation + 1);
    assert_eq!(bucket_candidates(&session.bucket("Phone Screen")), vec!["42"]);
}

#[tokio::test]
async fn open_fails_loudly_on_unknown_role() {
    let result = BoardSession::open(
        Arc::new(FixtureAts::default()),
        RoleId("role-missing".to_string()),
    )
    .await;

    assert!(matches!(result, Err(BoardError::Remote(_))));
}
