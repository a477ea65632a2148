//! Question bank endpoints

use axum::{extract::State, Json};
use quiz_core::QuestionBank;

use crate::error::Result;
use crate::models::*;
use crate::services;
use crate::AppState;

/// GET /api/bank
pub async fn summary(State(state): State<AppState>) -> Result<Json<BankSummary>> {
    state.with_session(|session| Ok(Json(BankSummary::from_session(session))))
}

/// POST /api/bank
pub async fn load(
    State(state): State<AppState>,
    Json(request): Json<LoadBankRequest>,
) -> Result<Json<BankSummary>> {
    let bank = QuestionBank::from_documents(request.documents.as_slice())?;
    tracing::info!(
        documents = request.documents.len(),
        questions = bank.len(),
        "question bank replaced"
    );
    Ok(Json(state.install_bank(bank)?))
}

/// POST /api/bank/reload
pub async fn reload(State(state): State<AppState>) -> Result<Json<BankSummary>> {
    let bank = services::bank::load_from_files(&state.config.bank_paths).await?;
    Ok(Json(state.install_bank(bank)?))
}
