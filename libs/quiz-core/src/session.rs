//! Quiz session: the bank, filters, answers and position for one user.

use crate::answers::{AnswerState, AnswerStore};
use crate::bank::QuestionBank;
use crate::error::{Result, SessionError};
use crate::navigation::FilterEngine;
use crate::storage::{self, KeyValueStore, CURRENT_INDEX_KEY};
use crate::types::{AnswerStats, FilterConfig, Outcome, Progress, Question, QuestionKind, RangeWindow};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Result of submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub number: u32,
    pub outcome: Outcome,
    /// Correct letters (`"AB"`), empty for short-answer questions.
    pub correct_answer: String,
    /// Whether the caller should auto-advance: only after a correct answer
    /// with somewhere left to go.
    pub can_advance: bool,
}

/// One active quiz session. Every mutation is persisted before returning.
pub struct QuizSession {
    engine: FilterEngine,
    answers: AnswerStore,
    store: Arc<dyn KeyValueStore>,
    current_index: usize,
}

impl QuizSession {
    /// Open a session over `bank`, restoring answers, settings and position.
    pub fn open(bank: QuestionBank, store: Arc<dyn KeyValueStore>) -> Self {
        let config = storage::load_filter_config(store.as_ref());
        let answers = AnswerStore::load(store.clone());
        let current_index = storage::load_current_index(store.as_ref())
            .filter(|&i| i < bank.len())
            .unwrap_or(0);

        tracing::info!(
            questions = bank.len(),
            answered = answers.stats().total_answered,
            current_index,
            "opened quiz session"
        );

        Self {
            engine: FilterEngine::new(bank, config),
            answers,
            store,
            current_index,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        self.engine.bank()
    }

    pub fn engine(&self) -> &FilterEngine {
        &self.engine
    }

    pub fn config(&self) -> &FilterConfig {
        self.engine.config()
    }

    pub fn answers(&self) -> &AnswerState {
        self.answers.state()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.bank().questions()[self.current_index]
    }

    pub fn valid_indices(&self) -> Vec<usize> {
        self.engine.valid_indices()
    }

    pub fn range_window(&self) -> RangeWindow {
        self.engine.range_window()
    }

    pub fn stats(&self) -> AnswerStats {
        self.answers.stats()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            answered: self.answers.stats().total_answered,
            total: self.bank().len(),
        }
    }

    /// Move to any index, regardless of filters.
    pub fn select(&mut self, index: usize) -> Result<usize> {
        let len = self.bank().len();
        if index >= len {
            return Err(SessionError::IndexOutOfRange { index, len });
        }
        self.move_to(index)?;
        Ok(index)
    }

    /// Advance; `None` when there is nowhere to go.
    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Option<usize>> {
        let target = self
            .engine
            .next(self.current_index, self.answers.state(), rng);
        if let Some(index) = target {
            self.move_to(index)?;
        }
        Ok(target)
    }

    /// Step back; `None` when there is nowhere to go.
    pub fn prev(&mut self) -> Result<Option<usize>> {
        let target = self.engine.prev(self.current_index);
        if let Some(index) = target {
            self.move_to(index)?;
        }
        Ok(target)
    }

    /// Jump to a question number allowed by the active filters.
    pub fn jump_to(&mut self, number: u32) -> Result<usize> {
        let index = self.engine.jump_to(number)?;
        self.move_to(index)?;
        Ok(index)
    }

    /// Grade a letter selection for the current choice question.
    ///
    /// Single-choice questions accept exactly one letter.
    pub fn submit_choice(&mut self, letters: &BTreeSet<char>) -> Result<Submission> {
        let question = self.current_question();
        let number = question.number;
        if !question.kind.is_choice() {
            return Err(SessionError::WrongKind {
                number,
                kind: question.kind,
            });
        }
        self.ensure_unanswered(number)?;

        if letters.is_empty() {
            return Err(SessionError::EmptySelection);
        }
        if question.kind == QuestionKind::SingleChoice && letters.len() > 1 {
            return Err(SessionError::MultipleSelection { number });
        }

        let outcome = question
            .grade(letters)
            .ok_or(SessionError::WrongKind { number, kind: question.kind })?;
        self.record(number, outcome)
    }

    /// Record the user's own verdict on the current short-answer question.
    pub fn submit_self_assessment(&mut self, outcome: Outcome) -> Result<Submission> {
        let question = self.current_question();
        let number = question.number;
        if question.kind != QuestionKind::ShortAnswer {
            return Err(SessionError::WrongKind {
                number,
                kind: question.kind,
            });
        }
        self.ensure_unanswered(number)?;
        self.record(number, outcome)
    }

    /// Clear every answer and return to the first question.
    pub fn reset_progress(&mut self) -> Result<()> {
        self.answers.reset()?;
        self.current_index = 0;
        self.store.remove(CURRENT_INDEX_KEY)?;
        tracing::info!("progress reset");
        Ok(())
    }

    pub fn set_filter_config(&mut self, config: FilterConfig) -> Result<()> {
        self.update_filters(|engine| engine.set_config(config))
    }

    pub fn set_range_enabled(&mut self, enabled: bool) -> Result<()> {
        self.update_filters(|engine| engine.set_range_enabled(enabled))
    }

    pub fn set_range(&mut self, start: u32, end: Option<u32>) -> Result<()> {
        self.update_filters(|engine| engine.set_range(start, end))
    }

    pub fn reset_range(&mut self) -> Result<()> {
        self.update_filters(FilterEngine::reset_range)
    }

    pub fn set_important_only(&mut self, important_only: bool) -> Result<()> {
        self.update_filters(|engine| engine.set_important_only(important_only))
    }

    pub fn set_kind_enabled(&mut self, kind: QuestionKind, enabled: bool) -> Result<()> {
        self.update_filters(|engine| engine.set_kind_enabled(kind, enabled))
    }

    pub fn set_random_jump(&mut self, enabled: bool) -> Result<()> {
        self.update_filters(|engine| engine.set_random_jump(enabled))
    }

    fn update_filters(&mut self, apply: impl FnOnce(&mut FilterEngine)) -> Result<()> {
        apply(&mut self.engine);
        storage::save_filter_config(self.store.as_ref(), self.engine.config())?;
        tracing::debug!(config = ?self.engine.config(), "filters updated");
        Ok(())
    }

    fn ensure_unanswered(&self, number: u32) -> Result<()> {
        if self.answers.is_answered(number) {
            return Err(SessionError::AlreadyAnswered { number });
        }
        Ok(())
    }

    fn record(&mut self, number: u32, outcome: Outcome) -> Result<Submission> {
        self.answers.record(number, outcome)?;
        storage::save_current_index(self.store.as_ref(), self.current_index)?;

        let question = self.current_question();
        let can_advance = outcome.is_correct()
            && self
                .engine
                .has_next(self.current_index, self.answers.state());

        Ok(Submission {
            number,
            outcome,
            correct_answer: question.correct_answer_string(),
            can_advance,
        })
    }

    fn move_to(&mut self, index: usize) -> Result<()> {
        self.current_index = index;
        storage::save_current_index(self.store.as_ref(), index)?;
        Ok(())
    }
}
