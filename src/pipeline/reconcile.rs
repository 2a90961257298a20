use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::ats::{Application, CandidateId, RoleId};

/// Canonical current-state view of one candidate's possibly redundant
/// application records: the freshest record in each status partition.
///
/// Only `rejected` is split out because it alone determines bucket
/// placement; the "active" partition may mix `active`, `hired`, and other
/// non-rejected statuses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSummary {
    pub most_recent_active: Option<Application>,
    pub most_recent_rejected: Option<Application>,
}

impl CandidateSummary {
    fn absorb(&mut self, application: &Application) {
        let slot = if application.is_rejected() {
            &mut self.most_recent_rejected
        } else {
            &mut self.most_recent_active
        };
        // Strict comparison keeps the record encountered first on a timestamp
        // tie, so the result is deterministic for any stable input ordering.
        let fresher = match slot {
            Some(held) => application.recency() > held.recency(),
            None => true,
        };
        if fresher {
            *slot = Some(application.clone());
        }
    }

    /// The record that decides placement and eligibility. Rejection wins a
    /// recency tie against the active partition.
    pub fn latest(&self) -> Option<&Application> {
        match (&self.most_recent_active, &self.most_recent_rejected) {
            (Some(active), Some(rejected)) => {
                if rejected.recency() >= active.recency() {
                    Some(rejected)
                } else {
                    Some(active)
                }
            }
            (Some(active), None) => Some(active),
            (None, rejected) => rejected.as_ref(),
        }
    }
}

/// Collapse a raw application list into one summary per candidate.
///
/// Pure function of its input: no network, no mutable state. Candidates are
/// emitted in first-encountered input order.
pub fn reconcile(applications: &[Application]) -> Vec<(CandidateId, CandidateSummary)> {
    let mut order = Vec::new();
    let mut summaries: HashMap<CandidateId, CandidateSummary> = HashMap::new();

    for application in applications {
        match summaries.entry(application.candidate_id.clone()) {
            Entry::Vacant(slot) => {
                order.push(application.candidate_id.clone());
                slot.insert(CandidateSummary::default()).absorb(application);
            }
            Entry::Occupied(mut slot) => slot.get_mut().absorb(application),
        }
    }

    order
        .into_iter()
        .map(|candidate_id| {
            let summary = summaries.remove(&candidate_id).unwrap_or_default();
            (candidate_id, summary)
        })
        .collect()
}

/// Summarize one candidate's applications per role, for the candidate-facing
/// eligibility view.
pub fn reconcile_by_role(applications: &[Application]) -> HashMap<RoleId, CandidateSummary> {
    let mut summaries: HashMap<RoleId, CandidateSummary> = HashMap::new();
    for application in applications {
        summaries
            .entry(application.role_id.clone())
            .or_default()
            .absorb(application);
    }
    summaries
}
