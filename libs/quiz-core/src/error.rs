//! Error types for quiz-core.

use crate::types::{FilterReason, QuestionKind};
use thiserror::Error;

/// Errors building a question bank from parsed questions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BankError {
    #[error("could not load question bank: no questions found")]
    Empty,

    #[error("duplicate question number {number}")]
    DuplicateNumber { number: u32 },
}

/// Errors resolving a jump target.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JumpError {
    #[error("question {number} not found")]
    NotFound { number: u32 },

    #[error("question {number} is {reason}")]
    FilteredOut { number: u32, reason: FilterReason },
}

/// Errors from a key-value storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from quiz session commands.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Jump(#[from] JumpError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("question {number} has already been answered")]
    AlreadyAnswered { number: u32 },

    #[error("no option selected")]
    EmptySelection,

    #[error("question {number} takes a single option")]
    MultipleSelection { number: u32 },

    #[error("question {number} is a {kind} question")]
    WrongKind { number: u32, kind: QuestionKind },

    #[error("index {index} is out of range for {len} questions")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type alias using SessionError.
pub type Result<T> = std::result::Result<T, SessionError>;
