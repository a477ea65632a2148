//! Loading question banks from disk.

use std::path::{Path, PathBuf};

use quiz_core::QuestionBank;

use crate::error::{ApiError, Result};

/// Read every file in order, then merge and parse them into one bank.
pub async fn load_from_files(paths: &[PathBuf]) -> Result<QuestionBank> {
    if paths.is_empty() {
        return Err(ApiError::BadRequest("no bank files configured".to_string()));
    }

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        documents.push(read_document(path).await?);
    }

    let bank = QuestionBank::from_documents(&documents)?;
    tracing::info!(
        files = paths.len(),
        questions = bank.len(),
        "loaded question bank"
    );
    Ok(bank)
}

async fn read_document(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "failed to read bank file");
        ApiError::Internal(format!("failed to read {}: {}", path.display(), e))
    })
}
