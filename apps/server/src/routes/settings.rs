//! Settings endpoints
//!
//! These work with or without a loaded bank; without one they read and
//! write the persisted settings record directly.

use axum::{extract::State, Json};
use quiz_core::storage;

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// GET /api/settings/filter
pub async fn get_filter(State(state): State<AppState>) -> Result<Json<FilterResponse>> {
    let guard = state.lock_session()?;
    let response = match guard.as_ref() {
        Some(session) => FilterResponse::from_session(session),
        None => FilterResponse::without_bank(storage::load_filter_config(state.store.as_ref())),
    };
    Ok(Json(response))
}

/// PUT /api/settings/filter
pub async fn update_filter(
    State(state): State<AppState>,
    Json(request): Json<UpdateFilterRequest>,
) -> Result<Json<FilterResponse>> {
    let mut guard = state.lock_session()?;
    let response = match guard.as_mut() {
        Some(session) => {
            let mut config = session.config().clone();
            request.apply(&mut config);
            session.set_filter_config(config)?;
            FilterResponse::from_session(session)
        }
        None => {
            let mut config = storage::load_filter_config(state.store.as_ref());
            request.apply(&mut config);
            storage::save_filter_config(state.store.as_ref(), &config)?;
            FilterResponse::without_bank(config)
        }
    };
    Ok(Json(response))
}

/// DELETE /api/settings/range
pub async fn reset_range(State(state): State<AppState>) -> Result<Json<FilterResponse>> {
    let mut guard = state.lock_session()?;
    let response = match guard.as_mut() {
        Some(session) => {
            session.reset_range()?;
            FilterResponse::from_session(session)
        }
        None => {
            let mut config = storage::load_filter_config(state.store.as_ref());
            config.reset_range();
            storage::save_filter_config(state.store.as_ref(), &config)?;
            FilterResponse::without_bank(config)
        }
    };
    Ok(Json(response))
}
