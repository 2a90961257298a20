//! Contract with the remote applicant tracking service.
//!
//! Everything here describes the transport boundary only: the record shapes
//! the remote system returns and the [`AtsClient`] trait the board core calls
//! through. The real HTTP transport and its authentication wrapper live
//! outside this crate; tests and the demo server use [`FixtureAts`].

mod fixture;

pub use fixture::{FixtureAts, FixtureSeed, RoleStages};

use std::fmt;
use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier for one submitted application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier for a candidate in the remote system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Identifier for a role (job) in the remote system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(pub String);

/// Identifier for a pipeline stage; unique across the remote system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StageId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Application status with dedicated semantics on the board.
pub const STATUS_ACTIVE: &str = "active";
/// Treated like `active` when deciding apply eligibility.
pub const STATUS_IN_PROGRESS: &str = "in_progress";
/// The only status that influences bucket placement.
pub const STATUS_REJECTED: &str = "rejected";

/// The stage an application currently sits in, as reported remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRef {
    pub id: StageId,
    pub name: String,
}

/// One submission of one candidate against one role.
///
/// Status values are open-ended strings owned by the remote system; the board
/// core gives special meaning only to `rejected` (placement) and to
/// `active`/`in_progress` (eligibility).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub candidate_id: CandidateId,
    pub role_id: RoleId,
    pub status: String,
    pub current_stage: Option<StageRef>,
    pub applied_at: DateTime<Utc>,
    pub last_activity_at: Option<DateTime<Utc>>,
}

impl Application {
    /// Timestamp used for recency comparisons: last activity when the remote
    /// system reports one, submission time otherwise.
    pub fn recency(&self) -> DateTime<Utc> {
        self.last_activity_at.unwrap_or(self.applied_at)
    }

    pub fn is_rejected(&self) -> bool {
        self.status == STATUS_REJECTED
    }
}

/// A named, ordered step in one role's pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub name: String,
}

/// Candidate detail used to label board cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: CandidateId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl CandidateProfile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Role (job) detail shown on dashboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDescriptor {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    pub status: String,
}

/// Resume payload forwarded verbatim to the remote submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Failure reported by the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum AtsError {
    #[error("applicant tracking service unavailable: {0}")]
    Unavailable(String),
    #[error("remote record not found: {0}")]
    NotFound(String),
}

/// Async boundary to the remote applicant tracking service.
///
/// The stage-move operation is NOT idempotent remotely: a retried call after
/// a timeout may double-move an application, so callers must not retry.
pub trait AtsClient: Send + Sync {
    fn list_applications(
        &self,
        role_id: &RoleId,
    ) -> impl Future<Output = Result<Vec<Application>, AtsError>> + Send;

    fn list_candidate_applications(
        &self,
        candidate_id: &CandidateId,
    ) -> impl Future<Output = Result<Vec<Application>, AtsError>> + Send;

    fn get_candidate(
        &self,
        candidate_id: &CandidateId,
    ) -> impl Future<Output = Result<CandidateProfile, AtsError>> + Send;

    fn get_role(
        &self,
        role_id: &RoleId,
    ) -> impl Future<Output = Result<RoleDescriptor, AtsError>> + Send;

    fn list_stages(
        &self,
        role_id: &RoleId,
    ) -> impl Future<Output = Result<Vec<Stage>, AtsError>> + Send;

    fn move_application_stage(
        &self,
        application_id: &ApplicationId,
        from: &StageId,
        to: &StageId,
    ) -> impl Future<Output = Result<Application, AtsError>> + Send;

    fn submit_application(
        &self,
        role_id: &RoleId,
        candidate_id: &CandidateId,
        resume: Option<ResumeAttachment>,
    ) -> impl Future<Output = Result<Application, AtsError>> + Send;
}
