use std::collections::HashMap;

use serde::Serialize;

use crate::ats::{ApplicationId, CandidateId};

use super::catalog::StageCatalog;
use super::reconcile::CandidateSummary;

/// Synthetic bucket for candidates whose freshest record is a rejection.
pub const REJECTED_BUCKET: &str = "Rejected";
/// Fallback bucket for applications with an absent or unrecognized stage;
/// such records are never silently dropped.
pub const UNKNOWN_BUCKET: &str = "Unknown";

/// One candidate card on the recruiter board. Lives in exactly one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardCard {
    pub candidate_id: CandidateId,
    pub application_id: ApplicationId,
    pub display_name: String,
}

/// In-memory board state: stage-named buckets of candidate cards, the single
/// source of truth the recruiter view renders.
///
/// Rebuilt wholesale on every fetch and patched incrementally on successful
/// transitions. A monotone generation stamp lets a move that was in flight
/// across a rebuild detect that its board has been superseded.
#[derive(Debug, Default)]
pub struct BoardStore {
    buckets: HashMap<String, Vec<BoardCard>>,
    bucket_order: Vec<String>,
    bucket_by_candidate: HashMap<CandidateId, String>,
    generation: u64,
}

impl BoardStore {
    /// Empty board with one column per catalog stage plus the synthetic
    /// Rejected column, in pipeline order.
    pub fn new(catalog: &StageCatalog) -> Self {
        let mut store = Self::default();
        for name in catalog.stage_names() {
            store.ensure_bucket(name);
        }
        store.ensure_bucket(REJECTED_BUCKET);
        store
    }

    /// Replace all bucket contents from freshly reconciled summaries and bump
    /// the generation stamp.
    ///
    /// Placement: a rejection at least as recent as the active record wins
    /// the Rejected column; otherwise the active record's stage name, or
    /// Unknown when that stage is absent or not in the catalog.
    pub fn rebuild(
        &mut self,
        summaries: &[(CandidateId, CandidateSummary)],
        catalog: &StageCatalog,
        display_names: &HashMap<CandidateId, String>,
    ) {
        self.generation += 1;
        for cards in self.buckets.values_mut() {
            cards.clear();
        }
        self.bucket_by_candidate.clear();

        for (candidate_id, summary) in summaries {
            let Some(application) = summary.latest() else {
                continue;
            };

            let bucket = if application.is_rejected() {
                REJECTED_BUCKET.to_string()
            } else {
                match &application.current_stage {
                    Some(stage) if catalog.contains_name(&stage.name) => stage.name.clone(),
                    _ => UNKNOWN_BUCKET.to_string(),
                }
            };

            let display_name = display_names
                .get(candidate_id)
                .cloned()
                .unwrap_or_else(|| placeholder_display_name(candidate_id));

            self.place(
                &bucket,
                BoardCard {
                    candidate_id: candidate_id.clone(),
                    application_id: application.id.clone(),
                    display_name,
                },
            );
        }
    }

    /// Cards in a bucket; an absent bucket is an empty column, never an error.
    pub fn bucket(&self, name: &str) -> &[BoardCard] {
        self.buckets.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The bucket a candidate's card currently sits in, if any.
    pub fn bucket_of(&self, candidate_id: &CandidateId) -> Option<&str> {
        self.bucket_by_candidate
            .get(candidate_id)
            .map(String::as_str)
    }

    pub fn card(&self, candidate_id: &CandidateId) -> Option<&BoardCard> {
        let bucket = self.bucket_of(candidate_id)?;
        self.bucket(bucket)
            .iter()
            .find(|card| &card.candidate_id == candidate_id)
    }

    /// Remove the candidate's card from `from` and append it to `to`,
    /// creating `to` if absent. A no-op when the card is not in `from`,
    /// which tolerates a concurrent rebuild having already relocated it.
    pub fn move_card(&mut self, candidate_id: &CandidateId, from: &str, to: &str) {
        let Some(cards) = self.buckets.get_mut(from) else {
            return;
        };
        let Some(position) = cards
            .iter()
            .position(|card| &card.candidate_id == candidate_id)
        else {
            return;
        };

        let card = cards.remove(position);
        self.place(to, card);
    }

    /// Bucket names in column order: pipeline stages, then Rejected, then any
    /// on-demand buckets such as Unknown.
    pub fn bucket_names(&self) -> impl Iterator<Item = &str> {
        self.bucket_order.iter().map(String::as_str)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn place(&mut self, bucket: &str, card: BoardCard) {
        self.bucket_by_candidate
            .insert(card.candidate_id.clone(), bucket.to_string());
        self.ensure_bucket(bucket).push(card);
    }

    fn ensure_bucket(&mut self, name: &str) -> &mut Vec<BoardCard> {
        if !self.buckets.contains_key(name) {
            self.bucket_order.push(name.to_string());
        }
        self.buckets.entry(name.to_string()).or_default()
    }
}

/// Display name used when a candidate's detail fetch failed during listing.
pub(crate) fn placeholder_display_name(candidate_id: &CandidateId) -> String {
    format!("Candidate {candidate_id}")
}
