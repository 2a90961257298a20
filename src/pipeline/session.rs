use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{info, warn};

use crate::ats::{AtsClient, CandidateId, RoleId};

use super::board::{BoardCard, BoardStore};
use super::catalog::StageCatalog;
use super::eligibility::{eligible_roles, RoleEligibility};
use super::reconcile::{reconcile, reconcile_by_role};
use super::transition::TransitionCoordinator;
use super::BoardError;

/// One recruiter's live view of a role's pipeline: the stage catalog, the
/// board store, and the transition coordinator that mutates it.
///
/// The board has no persistence of its own; it is rebuilt wholesale from
/// remote records on [`BoardSession::refresh`] and discarded with the
/// session.
pub struct BoardSession<C> {
    client: Arc<C>,
    role_id: RoleId,
    catalog: Arc<StageCatalog>,
    store: Arc<Mutex<BoardStore>>,
    coordinator: TransitionCoordinator<C>,
}

/// Serializable bucket-by-bucket view of the board.
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub role_id: RoleId,
    pub generation: u64,
    pub columns: Vec<BoardColumn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardColumn {
    pub name: String,
    pub cards: Vec<BoardCard>,
}

impl<C: AtsClient> BoardSession<C> {
    /// Fetch the role's stage list, build the immutable catalog, and load the
    /// initial board.
    pub async fn open(client: Arc<C>, role_id: RoleId) -> Result<Self, BoardError> {
        let stages = client.list_stages(&role_id).await?;
        let catalog = Arc::new(StageCatalog::from_stages(stages)?);
        let store = Arc::new(Mutex::new(BoardStore::new(&catalog)));
        let coordinator =
            TransitionCoordinator::new(client.clone(), catalog.clone(), store.clone());

        let session = Self {
            client,
            role_id,
            catalog,
            store,
            coordinator,
        };
        session.refresh().await?;
        info!(role = %session.role_id, stages = session.catalog.len(), "board session opened");
        Ok(session)
    }

    /// Rebuild the board wholesale from fresh remote records (view load and
    /// window-refocus refetch). Bumps the board generation, so a stage move
    /// that was in flight across this call discards its optimistic patch.
    ///
    /// A single candidate's failed detail fetch degrades that card to a
    /// placeholder display name; it never drops the card or fails the
    /// listing.
    pub async fn refresh(&self) -> Result<(), BoardError> {
        let applications = self.client.list_applications(&self.role_id).await?;
        let summaries = reconcile(&applications);

        let mut display_names = HashMap::with_capacity(summaries.len());
        for (candidate_id, _) in &summaries {
            match self.client.get_candidate(candidate_id).await {
                Ok(profile) => {
                    display_names.insert(candidate_id.clone(), profile.display_name());
                }
                Err(err) => {
                    warn!(
                        candidate = %candidate_id,
                        error = %err,
                        "candidate detail unavailable; rendering placeholder name"
                    );
                }
            }
        }

        let mut store = self.store.lock().expect("board store mutex poisoned");
        store.rebuild(&summaries, &self.catalog, &display_names);
        Ok(())
    }

    pub fn bucket(&self, name: &str) -> Vec<BoardCard> {
        self.store
            .lock()
            .expect("board store mutex poisoned")
            .bucket(name)
            .to_vec()
    }

    pub fn bucket_of(&self, candidate_id: &CandidateId) -> Option<String> {
        self.store
            .lock()
            .expect("board store mutex poisoned")
            .bucket_of(candidate_id)
            .map(str::to_string)
    }

    pub fn generation(&self) -> u64 {
        self.store
            .lock()
            .expect("board store mutex poisoned")
            .generation()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let store = self.store.lock().expect("board store mutex poisoned");
        let columns = store
            .bucket_names()
            .map(|name| BoardColumn {
                name: name.to_string(),
                cards: store.bucket(name).to_vec(),
            })
            .collect();
        BoardSnapshot {
            role_id: self.role_id.clone(),
            generation: store.generation(),
            columns,
        }
    }

    pub async fn request_move(
        &self,
        candidate_id: &CandidateId,
        to_stage_name: &str,
    ) -> Result<(), BoardError> {
        self.coordinator.request_move(candidate_id, to_stage_name).await
    }

    pub fn role_id(&self) -> &RoleId {
        &self.role_id
    }
}

/// Candidate-facing view: which of the offered roles may this candidate
/// submit a (re)application to, recomputed from a fresh application list.
pub async fn eligibility_view<C: AtsClient>(
    client: &C,
    candidate_id: &CandidateId,
    offered_roles: &[RoleId],
) -> Result<Vec<RoleEligibility>, BoardError> {
    let applications = client.list_candidate_applications(candidate_id).await?;
    let summaries = reconcile_by_role(&applications);

    let mut roles = Vec::with_capacity(offered_roles.len());
    for role_id in offered_roles {
        roles.push(client.get_role(role_id).await?);
    }

    Ok(eligible_roles(&summaries, roles))
}
