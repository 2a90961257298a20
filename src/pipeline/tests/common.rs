use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::ats::{
    Application, ApplicationId, CandidateId, CandidateProfile, FixtureAts, FixtureSeed,
    RoleDescriptor, RoleId, RoleStages, Stage, StageId, StageRef, STATUS_ACTIVE, STATUS_REJECTED,
};
use crate::pipeline::{BoardSession, StageCatalog};

pub(super) const ROLE: &str = "role-1";

pub(super) fn ts(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, day, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn stage(id: &str, name: &str) -> Stage {
    Stage {
        id: StageId(id.to_string()),
        name: name.to_string(),
    }
}

pub(super) fn pipeline_stages() -> Vec<Stage> {
    vec![
        stage("stage-applied", "Applied"),
        stage("stage-phone", "Phone Screen"),
        stage("stage-onsite", "Onsite"),
        stage("stage-offer", "Offer"),
    ]
}

pub(super) fn catalog() -> StageCatalog {
    StageCatalog::from_stages(pipeline_stages()).expect("catalog builds")
}

pub(super) fn application(
    id: &str,
    candidate: &str,
    role: &str,
    status: &str,
    stage: Option<(&str, &str)>,
    day: u32,
) -> Application {
    Application {
        id: ApplicationId(id.to_string()),
        candidate_id: CandidateId(candidate.to_string()),
        role_id: RoleId(role.to_string()),
        status: status.to_string(),
        current_stage: stage.map(|(stage_id, name)| StageRef {
            id: StageId(stage_id.to_string()),
            name: name.to_string(),
        }),
        applied_at: ts(day),
        last_activity_at: None,
    }
}

pub(super) fn candidate(id: &str, first: &str, last: &str) -> CandidateProfile {
    CandidateProfile {
        id: CandidateId(id.to_string()),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: None,
        company: None,
        title: None,
    }
}

pub(super) fn role(id: &str, name: &str) -> RoleDescriptor {
    RoleDescriptor {
        id: RoleId(id.to_string()),
        name: name.to_string(),
        company: Some("Initech".to_string()),
        status: "open".to_string(),
    }
}

/// Board fixture: candidate 42 in Phone Screen, 7 in Onsite, and 9 whose
/// rejection postdates an earlier active record.
pub(super) fn board_fixture() -> FixtureAts {
    FixtureAts::from_seed(FixtureSeed {
        roles: vec![role(ROLE, "Staff Engineer")],
        stages: vec![RoleStages {
            role_id: RoleId(ROLE.to_string()),
            stages: pipeline_stages(),
        }],
        candidates: vec![
            candidate("42", "Jordan", "Smith"),
            candidate("7", "Casey", "Wu"),
            candidate("9", "Riley", "Fox"),
        ],
        applications: vec![
            application(
                "app-42",
                "42",
                ROLE,
                STATUS_ACTIVE,
                Some(("stage-phone", "Phone Screen")),
                10,
            ),
            application(
                "app-7",
                "7",
                ROLE,
                STATUS_ACTIVE,
                Some(("stage-onsite", "Onsite")),
                8,
            ),
            application(
                "app-9-old",
                "9",
                ROLE,
                STATUS_ACTIVE,
                Some(("stage-applied", "Applied")),
                2,
            ),
            application("app-9-new", "9", ROLE, STATUS_REJECTED, None, 12),
        ],
    })
}

pub(super) async fn open_board(fixture: Arc<FixtureAts>) -> BoardSession<FixtureAts> {
    BoardSession::open(fixture, RoleId(ROLE.to_string()))
        .await
        .expect("board session opens")
}

pub(super) fn candidate_id(raw: &str) -> CandidateId {
    CandidateId(raw.to_string())
}

pub(super) fn bucket_candidates(cards: &[crate::pipeline::BoardCard]) -> Vec<&str> {
    cards.iter().map(|card| card.candidate_id.0.as_str()).collect()
}
