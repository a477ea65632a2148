//! API request and response types

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

// Re-export shared types from quiz-core
pub use quiz_core::{
    AnswerStats, FilterConfig, Outcome, Progress, Question, QuestionKind, RangeWindow, Submission,
};

use quiz_core::QuizSession;

// === Bank ===

/// Request body for POST /api/bank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadBankRequest {
    /// Markdown documents, merged in the given order.
    pub documents: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSummary {
    pub questions: usize,
    pub first_number: u32,
    pub last_number: u32,
    pub current_index: usize,
}

impl BankSummary {
    pub fn from_session(session: &QuizSession) -> Self {
        let bank = session.bank();
        Self {
            questions: bank.len(),
            first_number: bank.first_number(),
            last_number: bank.last_number(),
            current_index: session.current_index(),
        }
    }
}

// === Questions ===

/// A question together with the user's position and answer for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub index: usize,
    pub total: usize,
    pub question: Question,
    pub outcome: Option<Outcome>,
    /// Whether the question passes the active filters.
    pub valid: bool,
}

impl QuestionResponse {
    pub fn at(session: &QuizSession, index: usize) -> Option<Self> {
        let question = session.bank().get(index)?.clone();
        Some(Self {
            index,
            total: session.bank().len(),
            outcome: session.answers().get(question.number),
            valid: session.engine().check_index(index).is_ok(),
            question,
        })
    }

    pub fn current(session: &QuizSession) -> Self {
        let index = session.current_index();
        Self {
            index,
            total: session.bank().len(),
            question: session.current_question().clone(),
            outcome: session.answers().get(session.current_question().number),
            valid: session.engine().check_index(index).is_ok(),
        }
    }
}

/// Response for GET /api/questions/valid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidQuestionsResponse {
    pub indices: Vec<usize>,
    pub numbers: Vec<u32>,
    /// Resolved reading range, present only while the range filter is on.
    pub range: Option<RangeWindow>,
}

// === Navigation ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JumpRequest {
    pub number: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectRequest {
    pub index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResponse {
    /// False when there was nowhere to go; `current` is then unchanged.
    pub moved: bool,
    pub current: QuestionResponse,
}

// === Answers ===

/// Request body for POST /api/answers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmitAnswerRequest {
    /// Selected option letters, e.g. `"AC"`.
    Choice { letters: String },
    /// Self-assessment for a short-answer question.
    SelfAssessment { outcome: Outcome },
}

impl SubmitAnswerRequest {
    /// Letters A to F in the selection, case-insensitive; anything else is ignored.
    pub fn letters(raw: &str) -> BTreeSet<char> {
        raw.chars()
            .map(|c| c.to_ascii_uppercase())
            .filter(|c| ('A'..='F').contains(c))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswerResponse {
    #[serde(flatten)]
    pub submission: Submission,
    pub stats: AnswerStats,
}

/// Response for GET /api/stats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: AnswerStats,
    pub accuracy: f64,
    pub progress: Progress,
    pub progress_percent: f64,
}

impl StatsResponse {
    pub fn from_session(session: &QuizSession) -> Self {
        let stats = session.stats();
        let progress = session.progress();
        Self {
            accuracy: stats.accuracy(),
            progress_percent: progress.percent(),
            stats,
            progress,
        }
    }
}

// === Settings ===

/// Request body for PUT /api/settings/filter. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFilterRequest {
    pub range_enabled: Option<bool>,
    pub range_start: Option<u32>,
    /// `null` clears the end bound (read to the last question).
    #[serde(default, deserialize_with = "explicit_null")]
    pub range_end: Option<Option<u32>>,
    pub important_only: Option<bool>,
    pub enabled_kinds: Option<BTreeSet<QuestionKind>>,
    pub random_jump_enabled: Option<bool>,
}

impl UpdateFilterRequest {
    pub fn apply(self, config: &mut FilterConfig) {
        if let Some(enabled) = self.range_enabled {
            config.range_enabled = enabled;
        }
        if let Some(start) = self.range_start {
            config.range_start = start.max(1);
        }
        if let Some(end) = self.range_end {
            config.range_end = end;
        }
        if let Some(important_only) = self.important_only {
            config.important_only = important_only;
        }
        if let Some(kinds) = self.enabled_kinds {
            config.enabled_kinds = kinds;
        }
        if let Some(enabled) = self.random_jump_enabled {
            config.random_jump_enabled = enabled;
        }
    }
}

/// Distinguish a field set to `null` from a missing one.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Response for the filter settings routes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterResponse {
    #[serde(flatten)]
    pub config: FilterConfig,
    /// Resolved range and valid count, present once a bank is loaded.
    pub range: Option<RangeWindow>,
    pub valid_count: Option<usize>,
}

impl FilterResponse {
    pub fn from_session(session: &QuizSession) -> Self {
        Self {
            config: session.config().clone(),
            range: session
                .config()
                .range_enabled
                .then(|| session.range_window()),
            valid_count: Some(session.valid_indices().len()),
        }
    }

    pub fn without_bank(config: FilterConfig) -> Self {
        Self {
            config,
            range: None,
            valid_count: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_normalised() {
        let letters = SubmitAnswerRequest::letters("c, a ,x");
        assert_eq!(letters, ['A', 'C'].into_iter().collect());
    }

    #[test]
    fn test_submit_request_variants() {
        let choice: SubmitAnswerRequest = serde_json::from_str(r#"{"letters":"AB"}"#).unwrap();
        assert!(matches!(choice, SubmitAnswerRequest::Choice { .. }));

        let assessed: SubmitAnswerRequest =
            serde_json::from_str(r#"{"outcome":"wrong"}"#).unwrap();
        assert!(matches!(
            assessed,
            SubmitAnswerRequest::SelfAssessment {
                outcome: Outcome::Wrong
            }
        ));
    }

    #[test]
    fn test_partial_filter_update() {
        let mut config = FilterConfig {
            range_end: Some(30),
            ..FilterConfig::default()
        };

        let request: UpdateFilterRequest =
            serde_json::from_str(r#"{"range_enabled":true,"range_start":0}"#).unwrap();
        request.apply(&mut config);
        assert!(config.range_enabled);
        assert_eq!(config.range_start, 1);
        assert_eq!(config.range_end, Some(30));

        let request: UpdateFilterRequest = serde_json::from_str(r#"{"range_end":null}"#).unwrap();
        request.apply(&mut config);
        assert_eq!(config.range_end, None);
        assert!(config.range_enabled);
    }
}
