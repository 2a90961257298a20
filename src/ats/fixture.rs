//! In-memory stand-in for the remote applicant tracking service.
//!
//! Backs the demo server, the `board snapshot` CLI command, and the test
//! suite. Supports failure injection (move failures, unreachable candidate
//! details) and a gate that holds stage moves in flight so overlap handling
//! can be exercised deterministically.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

use super::{
    Application, ApplicationId, AtsClient, AtsError, CandidateId, CandidateProfile,
    ResumeAttachment, RoleDescriptor, RoleId, Stage, StageId, StageRef, STATUS_ACTIVE,
    STATUS_REJECTED,
};

/// Pipeline definition for one role inside a [`FixtureSeed`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleStages {
    pub role_id: RoleId,
    pub stages: Vec<Stage>,
}

/// Serializable snapshot of remote state used to hydrate a [`FixtureAts`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureSeed {
    #[serde(default)]
    pub roles: Vec<RoleDescriptor>,
    #[serde(default)]
    pub stages: Vec<RoleStages>,
    #[serde(default)]
    pub candidates: Vec<CandidateProfile>,
    #[serde(default)]
    pub applications: Vec<Application>,
}

/// One recorded call to the remote move operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub application_id: ApplicationId,
    pub from: StageId,
    pub to: StageId,
}

#[derive(Default)]
struct Inner {
    roles: HashMap<RoleId, RoleDescriptor>,
    stages: HashMap<RoleId, Vec<Stage>>,
    candidates: HashMap<CandidateId, CandidateProfile>,
    applications: Vec<Application>,
    moves: Vec<MoveRecord>,
    fail_moves: bool,
    unreachable_candidates: HashSet<CandidateId>,
    submission_sequence: u64,
}

/// In-memory [`AtsClient`] implementation.
#[derive(Default)]
pub struct FixtureAts {
    inner: Mutex<Inner>,
    move_gate: Mutex<Option<Arc<Notify>>>,
}

impl FixtureAts {
    pub fn from_seed(seed: FixtureSeed) -> Self {
        let fixture = Self::default();
        {
            let mut inner = fixture.lock_inner();
            for role in seed.roles {
                inner.roles.insert(role.id.clone(), role);
            }
            for entry in seed.stages {
                inner.stages.insert(entry.role_id, entry.stages);
            }
            for candidate in seed.candidates {
                inner.candidates.insert(candidate.id.clone(), candidate);
            }
            inner.applications = seed.applications;
        }
        fixture
    }

    /// Demo data set: one engineering role with a four-stage pipeline and a
    /// handful of candidates exercising every placement rule.
    pub fn sample() -> Self {
        let role_id = RoleId("role-swe".to_string());
        let stage = |suffix: &str, name: &str| Stage {
            id: StageId(format!("stage-{suffix}")),
            name: name.to_string(),
        };

        let base = Utc::now() - chrono::Duration::days(30);
        let application = |suffix: &str, candidate: &str, status: &str, stage_suffix: Option<(&str, &str)>, day: i64| {
            Application {
                id: ApplicationId(format!("app-{suffix}")),
                candidate_id: CandidateId(candidate.to_string()),
                role_id: role_id.clone(),
                status: status.to_string(),
                current_stage: stage_suffix.map(|(s, name)| StageRef {
                    id: StageId(format!("stage-{s}")),
                    name: name.to_string(),
                }),
                applied_at: base + chrono::Duration::days(day),
                last_activity_at: None,
            }
        };

        let candidate = |id: &str, first: &str, last: &str| CandidateProfile {
            id: CandidateId(id.to_string()),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: Some(format!("{}@example.com", first.to_ascii_lowercase())),
            company: None,
            title: None,
        };

        Self::from_seed(FixtureSeed {
            roles: vec![RoleDescriptor {
                id: role_id.clone(),
                name: "Software Engineer".to_string(),
                company: Some("Airbnb".to_string()),
                status: "open".to_string(),
            }],
            stages: vec![RoleStages {
                role_id: role_id.clone(),
                stages: vec![
                    stage("applied", "Applied"),
                    stage("phone", "Phone Screen"),
                    stage("onsite", "Onsite"),
                    stage("offer", "Offer"),
                ],
            }],
            candidates: vec![
                candidate("cand-alice", "Alice", "Johnson"),
                candidate("cand-marcus", "Marcus", "Reed"),
                candidate("cand-priya", "Priya", "Natarajan"),
                candidate("cand-devon", "Devon", "Blake"),
            ],
            applications: vec![
                application("alice-1", "cand-alice", STATUS_ACTIVE, Some(("onsite", "Onsite")), 12),
                application("marcus-1", "cand-marcus", STATUS_ACTIVE, Some(("phone", "Phone Screen")), 9),
                // Priya's rejection postdates her earlier active record, so she
                // lands in the Rejected column.
                application("priya-1", "cand-priya", STATUS_ACTIVE, Some(("applied", "Applied")), 2),
                application("priya-2", "cand-priya", STATUS_REJECTED, None, 20),
                // Devon's record carries no current stage at all.
                application("devon-1", "cand-devon", STATUS_ACTIVE, None, 6),
            ],
        })
    }

    /// Force subsequent `move_application_stage` calls to fail.
    pub fn fail_moves(&self, fail: bool) {
        self.lock_inner().fail_moves = fail;
    }

    /// Make `get_candidate` fail for one candidate, simulating a partial
    /// detail outage during board listing.
    pub fn mark_candidate_unreachable(&self, candidate_id: CandidateId) {
        self.lock_inner().unreachable_candidates.insert(candidate_id);
    }

    /// Hold every stage move in flight until the returned handle is notified
    /// (one `notify_one` releases one move).
    pub fn hold_moves(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self
            .move_gate
            .lock()
            .expect("move gate mutex poisoned") = Some(gate.clone());
        gate
    }

    /// Calls recorded against the remote move operation, in dispatch order.
    pub fn recorded_moves(&self) -> Vec<MoveRecord> {
        self.lock_inner().moves.clone()
    }

    /// Every role the fixture knows about, in arbitrary order.
    pub fn role_ids(&self) -> Vec<RoleId> {
        self.lock_inner().roles.keys().cloned().collect()
    }

    pub fn application(&self, id: &ApplicationId) -> Option<Application> {
        self.lock_inner()
            .applications
            .iter()
            .find(|application| &application.id == id)
            .cloned()
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("fixture mutex poisoned")
    }

    fn gate(&self) -> Option<Arc<Notify>> {
        self.move_gate
            .lock()
            .expect("move gate mutex poisoned")
            .clone()
    }
}

impl AtsClient for FixtureAts {
    async fn list_applications(&self, role_id: &RoleId) -> Result<Vec<Application>, AtsError> {
        let inner = self.lock_inner();
        Ok(inner
            .applications
            .iter()
            .filter(|application| &application.role_id == role_id)
            .cloned()
            .collect())
    }

    async fn list_candidate_applications(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<Application>, AtsError> {
        let inner = self.lock_inner();
        Ok(inner
            .applications
            .iter()
            .filter(|application| &application.candidate_id == candidate_id)
            .cloned()
            .collect())
    }

    async fn get_candidate(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<CandidateProfile, AtsError> {
        let inner = self.lock_inner();
        if inner.unreachable_candidates.contains(candidate_id) {
            return Err(AtsError::Unavailable(format!(
                "candidate {candidate_id} detail fetch timed out"
            )));
        }
        inner
            .candidates
            .get(candidate_id)
            .cloned()
            .ok_or_else(|| AtsError::NotFound(format!("candidate {candidate_id}")))
    }

    async fn get_role(&self, role_id: &RoleId) -> Result<RoleDescriptor, AtsError> {
        self.lock_inner()
            .roles
            .get(role_id)
            .cloned()
            .ok_or_else(|| AtsError::NotFound(format!("role {role_id}")))
    }

    async fn list_stages(&self, role_id: &RoleId) -> Result<Vec<Stage>, AtsError> {
        self.lock_inner()
            .stages
            .get(role_id)
            .cloned()
            .ok_or_else(|| AtsError::NotFound(format!("stages for role {role_id}")))
    }

    async fn move_application_stage(
        &self,
        application_id: &ApplicationId,
        from: &StageId,
        to: &StageId,
    ) -> Result<Application, AtsError> {
        if let Some(gate) = self.gate() {
            gate.notified().await;
        }

        let mut inner = self.lock_inner();
        if inner.fail_moves {
            return Err(AtsError::Unavailable(
                "move endpoint returned 503".to_string(),
            ));
        }

        inner.moves.push(MoveRecord {
            application_id: application_id.clone(),
            from: from.clone(),
            to: to.clone(),
        });

        let role_id = inner
            .applications
            .iter()
            .find(|application| &application.id == application_id)
            .map(|application| application.role_id.clone())
            .ok_or_else(|| AtsError::NotFound(format!("application {application_id}")))?;
        let target = inner
            .stages
            .get(&role_id)
            .and_then(|stages| stages.iter().find(|stage| &stage.id == to))
            .cloned()
            .ok_or_else(|| AtsError::NotFound(format!("stage {to}")))?;

        let now = Utc::now();
        let updated = inner
            .applications
            .iter_mut()
            .find(|application| &application.id == application_id)
            .map(|application| {
                application.current_stage = Some(StageRef {
                    id: target.id.clone(),
                    name: target.name.clone(),
                });
                application.last_activity_at = Some(now);
                application.clone()
            })
            .ok_or_else(|| AtsError::NotFound(format!("application {application_id}")))?;
        Ok(updated)
    }

    async fn submit_application(
        &self,
        role_id: &RoleId,
        candidate_id: &CandidateId,
        _resume: Option<ResumeAttachment>,
    ) -> Result<Application, AtsError> {
        let mut inner = self.lock_inner();
        if !inner.roles.contains_key(role_id) {
            return Err(AtsError::NotFound(format!("role {role_id}")));
        }

        inner.submission_sequence += 1;
        let first_stage = inner
            .stages
            .get(role_id)
            .and_then(|stages| stages.first())
            .map(|stage| StageRef {
                id: stage.id.clone(),
                name: stage.name.clone(),
            });
        let application = Application {
            id: ApplicationId(format!("app-submitted-{:04}", inner.submission_sequence)),
            candidate_id: candidate_id.clone(),
            role_id: role_id.clone(),
            status: STATUS_ACTIVE.to_string(),
            current_stage: first_stage,
            applied_at: Utc::now(),
            last_activity_at: None,
        };
        inner.applications.push(application.clone());
        Ok(application)
    }
}
