//! Application pipeline reconciliation, board state, and stage transitions.

pub mod board;
pub mod catalog;
pub mod eligibility;
pub mod reconcile;
pub mod router;
pub mod session;
pub mod transition;

#[cfg(test)]
mod tests;

pub use board::{BoardCard, BoardStore, REJECTED_BUCKET, UNKNOWN_BUCKET};
pub use catalog::StageCatalog;
pub use eligibility::{eligible_roles, ApplyAction, RoleEligibility};
pub use reconcile::{reconcile, reconcile_by_role, CandidateSummary};
pub use router::{board_router, BoardService};
pub use session::{eligibility_view, BoardColumn, BoardSession, BoardSnapshot};
pub use transition::TransitionCoordinator;

use crate::ats::{AtsError, CandidateId};

/// Failures surfaced by board construction and stage transitions.
///
/// `CandidateNotTracked` and `UnknownStage` signal local-state inconsistency
/// bugs and abort the enclosing operation; they are never silently defaulted.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Remote(#[from] AtsError),
    #[error("candidate {0} has no card on this board")]
    CandidateNotTracked(CandidateId),
    #[error("stage '{0}' is not part of this pipeline")]
    UnknownStage(String),
    #[error("duplicate stage '{0}' in pipeline definition")]
    DuplicateStage(String),
    #[error("a stage move for candidate {0} is already in flight")]
    MoveInFlight(CandidateId),
}
