//! Core quiz library shared by the HTTP server and any other front end.
//!
//! Provides:
//! - Markdown parser for bilingual question banks
//! - Answer state with key-value persistence
//! - Filter and navigation engine (reading range, importance, kinds, random jump)
//! - `QuizSession`, tying the pieces together for one user

pub mod answers;
pub mod bank;
pub mod error;
pub mod navigation;
pub mod parser;
pub mod session;
pub mod storage;
pub mod types;

pub use answers::{AnswerState, AnswerStore};
pub use bank::QuestionBank;
pub use error::{BankError, JumpError, Result, SessionError, StoreError};
pub use navigation::FilterEngine;
pub use parser::{merge_documents, parse};
pub use session::{QuizSession, Submission};
pub use storage::{KeyValueStore, MemoryStore, SettingsRecord};
pub use types::{
    AnswerStats, FilterConfig, FilterReason, Outcome, Progress, Question, QuestionKind,
    QuestionOption, RangeWindow,
};
