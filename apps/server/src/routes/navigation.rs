//! Navigation endpoints

use axum::{extract::State, Json};

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// POST /api/navigation/next
pub async fn next(State(state): State<AppState>) -> Result<Json<NavigationResponse>> {
    state.with_session(|session| {
        let moved = session.next(&mut rand::thread_rng())?.is_some();
        Ok(Json(NavigationResponse {
            moved,
            current: QuestionResponse::current(session),
        }))
    })
}

/// POST /api/navigation/prev
pub async fn prev(State(state): State<AppState>) -> Result<Json<NavigationResponse>> {
    state.with_session(|session| {
        let moved = session.prev()?.is_some();
        Ok(Json(NavigationResponse {
            moved,
            current: QuestionResponse::current(session),
        }))
    })
}

/// POST /api/navigation/jump
pub async fn jump(
    State(state): State<AppState>,
    Json(request): Json<JumpRequest>,
) -> Result<Json<NavigationResponse>> {
    state.with_session(|session| {
        session.jump_to(request.number)?;
        tracing::debug!(number = request.number, "jumped to question");
        Ok(Json(NavigationResponse {
            moved: true,
            current: QuestionResponse::current(session),
        }))
    })
}

/// POST /api/navigation/select
///
/// Moves to any index, ignoring filters, as clicking an answer card does.
pub async fn select(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<NavigationResponse>> {
    state.with_session(|session| {
        session.select(request.index)?;
        Ok(Json(NavigationResponse {
            moved: true,
            current: QuestionResponse::current(session),
        }))
    })
}
