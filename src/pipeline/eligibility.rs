use std::collections::HashMap;

use serde::Serialize;

use crate::ats::{RoleDescriptor, RoleId, STATUS_ACTIVE, STATUS_IN_PROGRESS};

use super::reconcile::CandidateSummary;

/// Call-to-action offered for a role on the candidate dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyAction {
    Apply,
    Reapply,
}

/// One role the candidate may submit an application to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleEligibility {
    pub role: RoleDescriptor,
    pub action: ApplyAction,
    pub rejection_notice: bool,
}

/// Decide which of the offered roles a candidate may (re)apply to.
///
/// A role with a live application (`active` or `in_progress`) is omitted. A
/// role with no history is offered as Apply. Any prior settled application
/// makes it Reapply, with a rejection notice only when the freshest record
/// is a rejection.
pub fn eligible_roles(
    summaries: &HashMap<RoleId, CandidateSummary>,
    offered: Vec<RoleDescriptor>,
) -> Vec<RoleEligibility> {
    offered
        .into_iter()
        .filter_map(|role| {
            let latest = summaries
                .get(&role.id)
                .and_then(|summary| summary.latest());
            match latest {
                None => Some(RoleEligibility {
                    role,
                    action: ApplyAction::Apply,
                    rejection_notice: false,
                }),
                Some(application)
                    if application.status == STATUS_ACTIVE
                        || application.status == STATUS_IN_PROGRESS =>
                {
                    None
                }
                Some(application) => {
                    let rejection_notice = application.is_rejected();
                    Some(RoleEligibility {
                        role,
                        action: ApplyAction::Reapply,
                        rejection_notice,
                    })
                }
            }
        })
        .collect()
}
