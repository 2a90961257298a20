use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::ats::{AtsClient, AtsError, CandidateId, RoleId};

use super::session::{eligibility_view, BoardSession};
use super::BoardError;

/// Shared state for the HTTP surface: one lazily opened board session per
/// role, plus the role list shown on the candidate dashboard.
pub struct BoardService<C> {
    client: Arc<C>,
    offered_roles: Vec<RoleId>,
    sessions: tokio::sync::Mutex<HashMap<RoleId, Arc<BoardSession<C>>>>,
}

impl<C: AtsClient> BoardService<C> {
    pub fn new(client: Arc<C>, offered_roles: Vec<RoleId>) -> Self {
        Self {
            client,
            offered_roles,
            sessions: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    pub async fn session(&self, role_id: &RoleId) -> Result<Arc<BoardSession<C>>, BoardError> {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get(role_id) {
            return Ok(session.clone());
        }
        let session = Arc::new(BoardSession::open(self.client.clone(), role_id.clone()).await?);
        sessions.insert(role_id.clone(), session.clone());
        Ok(session)
    }

    pub async fn eligible_roles(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<super::RoleEligibility>, BoardError> {
        eligibility_view(self.client.as_ref(), candidate_id, &self.offered_roles).await
    }
}

/// Router builder exposing the recruiter board and the candidate
/// eligibility view.
pub fn board_router<C: AtsClient + 'static>(service: Arc<BoardService<C>>) -> Router {
    Router::new()
        .route("/api/v1/roles/:role_id/board", get(board_handler::<C>))
        .route(
            "/api/v1/roles/:role_id/board/moves",
            post(move_handler::<C>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/eligible-roles",
            get(eligibility_handler::<C>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
struct MoveRequest {
    candidate_id: String,
    to_stage: String,
}

async fn board_handler<C: AtsClient + 'static>(
    State(service): State<Arc<BoardService<C>>>,
    Path(role_id): Path<String>,
) -> Response {
    let role_id = RoleId(role_id);
    let session = match service.session(&role_id).await {
        Ok(session) => session,
        Err(err) => return error_response(&err),
    };
    // Every fetch rebuilds the board wholesale from remote records.
    if let Err(err) = session.refresh().await {
        return error_response(&err);
    }
    (StatusCode::OK, axum::Json(session.snapshot())).into_response()
}

async fn move_handler<C: AtsClient + 'static>(
    State(service): State<Arc<BoardService<C>>>,
    Path(role_id): Path<String>,
    axum::Json(request): axum::Json<MoveRequest>,
) -> Response {
    let role_id = RoleId(role_id);
    let candidate_id = CandidateId(request.candidate_id);

    let session = match service.session(&role_id).await {
        Ok(session) => session,
        Err(err) => return error_response(&err),
    };

    let original_bucket = session.bucket_of(&candidate_id);
    match session.request_move(&candidate_id, &request.to_stage).await {
        Ok(()) => {
            let payload = json!({
                "candidate_id": candidate_id.0,
                "bucket": request.to_stage,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err @ BoardError::Remote(_)) => {
            // The candidate must not appear moved: report where they still sit.
            let payload = json!({
                "error": err.to_string(),
                "still_in": original_bucket,
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(&err),
    }
}

async fn eligibility_handler<C: AtsClient + 'static>(
    State(service): State<Arc<BoardService<C>>>,
    Path(candidate_id): Path<String>,
) -> Response {
    let candidate_id = CandidateId(candidate_id);
    match service.eligible_roles(&candidate_id).await {
        Ok(roles) => (StatusCode::OK, axum::Json(roles)).into_response(),
        Err(err) => error_response(&err),
    }
}

fn error_response(err: &BoardError) -> Response {
    let status = match err {
        BoardError::CandidateNotTracked(_) => StatusCode::NOT_FOUND,
        BoardError::UnknownStage(_) | BoardError::DuplicateStage(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        BoardError::MoveInFlight(_) => StatusCode::CONFLICT,
        BoardError::Remote(AtsError::NotFound(_)) => StatusCode::NOT_FOUND,
        BoardError::Remote(AtsError::Unavailable(_)) => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
