use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::ats::{AtsClient, CandidateId};

use super::board::BoardStore;
use super::catalog::StageCatalog;
use super::BoardError;

/// Executes a candidate's stage move against the remote service while keeping
/// the in-memory board consistent.
///
/// At most one transition per candidate may be in flight: an overlapping
/// request is rejected with [`BoardError::MoveInFlight`] rather than queued.
/// Moves for different candidates may run concurrently.
pub struct TransitionCoordinator<C> {
    client: Arc<C>,
    catalog: Arc<StageCatalog>,
    store: Arc<Mutex<BoardStore>>,
    in_flight: Mutex<HashSet<CandidateId>>,
}

impl<C: AtsClient> TransitionCoordinator<C> {
    pub fn new(client: Arc<C>, catalog: Arc<StageCatalog>, store: Arc<Mutex<BoardStore>>) -> Self {
        Self {
            client,
            catalog,
            store,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Move a candidate to `to_stage_name`, mirroring the change remotely
    /// first. On remote failure the board is left untouched so the UI never
    /// shows a candidate as moved when the remote call did not land.
    pub async fn request_move(
        &self,
        candidate_id: &CandidateId,
        to_stage_name: &str,
    ) -> Result<(), BoardError> {
        let (application_id, from_bucket, generation) = {
            let store = self.store.lock().expect("board store mutex poisoned");
            let card = store
                .card(candidate_id)
                .ok_or_else(|| BoardError::CandidateNotTracked(candidate_id.clone()))?;
            let bucket = store
                .bucket_of(candidate_id)
                .ok_or_else(|| BoardError::CandidateNotTracked(candidate_id.clone()))?;
            (card.application_id.clone(), bucket.to_string(), store.generation())
        };

        // Both lookups must hit the catalog; candidates in the synthetic
        // Rejected/Unknown columns have no remote stage to move from.
        let from_stage_id = self.catalog.id_for(&from_bucket)?.clone();
        let to_stage_id = self.catalog.id_for(to_stage_name)?.clone();

        self.begin(candidate_id)?;
        let result = self
            .client
            .move_application_stage(&application_id, &from_stage_id, &to_stage_id)
            .await;
        self.finish(candidate_id);

        match result {
            Ok(_) => {
                let mut store = self.store.lock().expect("board store mutex poisoned");
                if store.generation() != generation {
                    // A full refetch rebuilt the board while this move was in
                    // flight; the fresh reconciliation wins.
                    debug!(
                        candidate = %candidate_id,
                        to_stage = to_stage_name,
                        "board superseded during move; skipping optimistic patch"
                    );
                    return Ok(());
                }
                // Re-resolve the bucket rather than trusting the pre-await
                // value; the card may only be patched from wherever it sits
                // now.
                if let Some(current) = store.bucket_of(candidate_id).map(str::to_string) {
                    store.move_card(candidate_id, &current, to_stage_name);
                }
                debug!(candidate = %candidate_id, from = %from_bucket, to = to_stage_name, "stage move applied");
                Ok(())
            }
            Err(err) => {
                warn!(
                    candidate = %candidate_id,
                    still_in = %from_bucket,
                    error = %err,
                    "stage move failed; board left unchanged"
                );
                Err(err.into())
            }
        }
    }

    fn begin(&self, candidate_id: &CandidateId) -> Result<(), BoardError> {
        let mut in_flight = self.in_flight.lock().expect("in-flight mutex poisoned");
        if !in_flight.insert(candidate_id.clone()) {
            return Err(BoardError::MoveInFlight(candidate_id.clone()));
        }
        Ok(())
    }

    fn finish(&self, candidate_id: &CandidateId) {
        self.in_flight
            .lock()
            .expect("in-flight mutex poisoned")
            .remove(candidate_id);
    }
}
