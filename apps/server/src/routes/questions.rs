//! Question endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// GET /api/questions/current
pub async fn current(State(state): State<AppState>) -> Result<Json<QuestionResponse>> {
    state.with_session(|session| Ok(Json(QuestionResponse::current(session))))
}

/// GET /api/questions/:number
///
/// Looks a question up by number without moving to it or applying filters.
pub async fn by_number(
    State(state): State<AppState>,
    Path(number): Path<u32>,
) -> Result<Json<QuestionResponse>> {
    state.with_session(|session| {
        session
            .bank()
            .index_of(number)
            .and_then(|index| QuestionResponse::at(session, index))
            .map(Json)
            .ok_or_else(|| ApiError::NotFound(format!("question {}", number)))
    })
}

/// GET /api/questions/valid
pub async fn valid(State(state): State<AppState>) -> Result<Json<ValidQuestionsResponse>> {
    state.with_session(|session| {
        let indices = session.valid_indices();
        let numbers = indices
            .iter()
            .filter_map(|&i| session.bank().get(i))
            .map(|q| q.number)
            .collect();
        let range = session
            .config()
            .range_enabled
            .then(|| session.range_window());

        Ok(Json(ValidQuestionsResponse {
            indices,
            numbers,
            range,
        }))
    })
}
