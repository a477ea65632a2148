//! Answer endpoints

use axum::{extract::State, Json};

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// POST /api/answers
pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>> {
    state.with_session(|session| {
        let submission = match request {
            SubmitAnswerRequest::Choice { letters } => {
                session.submit_choice(&SubmitAnswerRequest::letters(&letters))?
            }
            SubmitAnswerRequest::SelfAssessment { outcome } => {
                session.submit_self_assessment(outcome)?
            }
        };

        tracing::debug!(
            number = submission.number,
            outcome = ?submission.outcome,
            "answer recorded"
        );

        Ok(Json(SubmitAnswerResponse {
            submission,
            stats: session.stats(),
        }))
    })
}

/// GET /api/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    state.with_session(|session| Ok(Json(StatsResponse::from_session(session))))
}

/// DELETE /api/answers
pub async fn reset(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    state.with_session(|session| {
        session.reset_progress()?;
        Ok(Json(StatsResponse::from_session(session)))
    })
}
