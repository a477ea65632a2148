//! Filter and navigation engine.
//!
//! Every navigation decision is derived from [`FilterEngine::valid_indices`]:
//! the indices inside the reading-range window that also pass the
//! importance and kind filters, in bank order. Next, previous, random and
//! jump targets are all computed from that list, so filters compose without
//! special cases.

use crate::answers::AnswerState;
use crate::bank::QuestionBank;
use crate::error::JumpError;
use crate::types::{FilterConfig, FilterReason, QuestionKind, RangeWindow};
use rand::seq::SliceRandom;
use rand::Rng;

/// Computes selectable question indices under the active filters.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    bank: QuestionBank,
    config: FilterConfig,
}

impl FilterEngine {
    pub fn new(bank: QuestionBank, config: FilterConfig) -> Self {
        Self { bank, config }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Resolve the reading range to an index window.
    ///
    /// An empty or inverted range falls back to the whole bank rather than
    /// leaving nothing to navigate.
    pub fn range_window(&self) -> RangeWindow {
        let questions = self.bank.questions();
        let len = questions.len();
        let full = RangeWindow {
            start_index: 0,
            end_index: len - 1,
            start_number: self.bank.first_number(),
            end_number: self.bank.last_number(),
            fell_back: false,
        };

        if !self.config.range_enabled {
            return full;
        }

        let fallback = RangeWindow {
            fell_back: true,
            ..full
        };

        let range_start = self.config.range_start;
        let effective_end = self.config.range_end.unwrap_or_else(|| self.bank.last_number());
        if range_start > effective_end {
            return fallback;
        }

        let Some(start_index) = questions.iter().position(|q| q.number >= range_start) else {
            return fallback;
        };
        let end_exclusive = questions
            .iter()
            .position(|q| q.number > effective_end)
            .unwrap_or(len);
        if end_exclusive == 0 || start_index > end_exclusive - 1 {
            return fallback;
        }

        let end_index = end_exclusive - 1;
        RangeWindow {
            start_index,
            end_index,
            start_number: questions[start_index].number,
            end_number: questions[end_index].number,
            fell_back: false,
        }
    }

    /// Indices that survive every active filter, ascending.
    pub fn valid_indices(&self) -> Vec<usize> {
        let window = self.range_window();
        (window.start_index..=window.end_index)
            .filter(|&i| self.passes_question_filters(i))
            .collect()
    }

    fn passes_question_filters(&self, index: usize) -> bool {
        self.question_filter_reason(index).is_none()
    }

    fn question_filter_reason(&self, index: usize) -> Option<FilterReason> {
        let question = self.bank.get(index)?;
        if self.config.important_only && !question.is_important {
            return Some(FilterReason::Importance);
        }
        if !self.config.is_kind_enabled(question.kind) {
            return Some(FilterReason::Kind {
                kind: question.kind,
            });
        }
        None
    }

    /// Which filter, checked in order range, importance, kind, excludes `index`.
    pub fn check_index(&self, index: usize) -> Result<(), FilterReason> {
        let window = self.range_window();
        if !window.contains(index) {
            return Err(FilterReason::Range {
                start: window.start_number,
                end: window.end_number,
            });
        }
        match self.question_filter_reason(index) {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }

    /// Next index to show, or `None` to stay put.
    ///
    /// Random-jump mode replaces sequential advance entirely.
    pub fn next<R: Rng + ?Sized>(
        &self,
        current: usize,
        answers: &AnswerState,
        rng: &mut R,
    ) -> Option<usize> {
        let valid = self.valid_indices();
        if valid.is_empty() {
            return None;
        }
        if self.config.random_jump_enabled {
            return self.random_next(answers, rng);
        }

        match valid.binary_search(&current) {
            Err(_) => Some(valid[0]),
            Ok(pos) if pos + 1 < valid.len() => Some(valid[pos + 1]),
            Ok(_) => None,
        }
    }

    /// Previous index to show, or `None` to stay put.
    pub fn prev(&self, current: usize) -> Option<usize> {
        let valid = self.valid_indices();
        let last = *valid.last()?;

        match valid.binary_search(&current) {
            Err(_) => Some(last),
            Ok(0) => None,
            Ok(pos) => Some(valid[pos - 1]),
        }
    }

    /// Valid indices whose question has no recorded answer.
    pub fn random_candidates(&self, answers: &AnswerState) -> Vec<usize> {
        self.valid_indices()
            .into_iter()
            .filter(|&i| {
                self.bank
                    .get(i)
                    .is_some_and(|q| !answers.is_answered(q.number))
            })
            .collect()
    }

    /// Uniform pick among unanswered valid questions; `None` once all are answered.
    pub fn random_next<R: Rng + ?Sized>(&self, answers: &AnswerState, rng: &mut R) -> Option<usize> {
        self.random_candidates(answers).choose(rng).copied()
    }

    /// Whether `next` would move anywhere from `current`.
    pub fn has_next(&self, current: usize, answers: &AnswerState) -> bool {
        if self.config.random_jump_enabled {
            return !self.random_candidates(answers).is_empty();
        }
        let valid = self.valid_indices();
        match valid.binary_search(&current) {
            Err(_) => !valid.is_empty(),
            Ok(pos) => pos + 1 < valid.len(),
        }
    }

    /// Resolve a question number to its index if every active filter allows it.
    pub fn jump_to(&self, number: u32) -> Result<usize, JumpError> {
        let index = self
            .bank
            .index_of(number)
            .ok_or(JumpError::NotFound { number })?;
        self.check_index(index)
            .map_err(|reason| JumpError::FilteredOut { number, reason })?;
        Ok(index)
    }

    pub fn set_config(&mut self, config: FilterConfig) {
        self.config = config;
    }

    pub fn set_range_enabled(&mut self, enabled: bool) {
        self.config.range_enabled = enabled;
    }

    /// Set the reading range bounds. A start of 0 is treated as 1.
    pub fn set_range(&mut self, start: u32, end: Option<u32>) {
        self.config.range_start = start.max(1);
        self.config.range_end = end;
    }

    pub fn reset_range(&mut self) {
        self.config.reset_range();
    }

    pub fn set_important_only(&mut self, important_only: bool) {
        self.config.important_only = important_only;
    }

    pub fn set_kind_enabled(&mut self, kind: QuestionKind, enabled: bool) {
        if enabled {
            self.config.enabled_kinds.insert(kind);
        } else {
            self.config.enabled_kinds.remove(&kind);
        }
    }

    pub fn set_random_jump(&mut self, enabled: bool) {
        self.config.random_jump_enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Outcome, Question, QuestionOption};
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(number: u32, kind: QuestionKind, is_important: bool) -> Question {
        let options = if kind.is_choice() {
            vec![QuestionOption::new('A', "a"), QuestionOption::new('B', "b")]
        } else {
            vec![]
        };
        Question {
            number,
            kind,
            is_important,
            prompt_english: format!("Question {number}"),
            prompt_chinese: String::new(),
            images: vec![],
            options,
            correct_answer: ['A'].into_iter().collect(),
            reference_answer: None,
            explanation: None,
        }
    }

    fn engine(numbers: impl IntoIterator<Item = u32>) -> FilterEngine {
        let questions = numbers
            .into_iter()
            .map(|n| question(n, QuestionKind::SingleChoice, false))
            .collect();
        FilterEngine::new(QuestionBank::new(questions).unwrap(), FilterConfig::default())
    }

    /// Numbers 1..=6: even numbers important, 3 and 6 short answer.
    fn mixed_engine() -> FilterEngine {
        let questions = (1..=6)
            .map(|n| {
                let kind = if n % 3 == 0 {
                    QuestionKind::ShortAnswer
                } else if n % 2 == 0 {
                    QuestionKind::MultipleChoice
                } else {
                    QuestionKind::SingleChoice
                };
                question(n, kind, n % 2 == 0)
            })
            .collect();
        FilterEngine::new(QuestionBank::new(questions).unwrap(), FilterConfig::default())
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn no_filters_selects_everything() {
        let engine = engine(1..=5);
        assert_eq!(engine.valid_indices(), vec![0, 1, 2, 3, 4]);
        assert!(!engine.range_window().fell_back);
    }

    #[test]
    fn range_window_resolves_numbers_to_indices() {
        let mut engine = engine([2, 4, 6, 8, 10]);
        engine.set_range_enabled(true);
        engine.set_range(3, Some(8));

        let window = engine.range_window();
        assert_eq!((window.start_index, window.end_index), (1, 3));
        assert_eq!((window.start_number, window.end_number), (4, 8));
        assert_eq!(window.count(), 3);
        assert_eq!(engine.valid_indices(), vec![1, 2, 3]);
    }

    #[test]
    fn open_ended_range_runs_to_last_question() {
        let mut engine = engine(1..=10);
        engine.set_range_enabled(true);
        engine.set_range(8, None);
        assert_eq!(engine.valid_indices(), vec![7, 8, 9]);
    }

    #[test]
    fn inverted_range_falls_back_to_full_bank() {
        let mut engine = engine(1..=20);
        engine.set_range_enabled(true);
        engine.set_range(50, Some(10));

        assert_eq!(engine.valid_indices(), (0..20usize).collect::<Vec<_>>());
        assert!(engine.range_window().fell_back);
    }

    #[test]
    fn range_in_gap_falls_back_to_full_bank() {
        let mut engine = engine([1, 5, 9]);
        engine.set_range_enabled(true);
        engine.set_range(2, Some(4));
        assert_eq!(engine.valid_indices(), vec![0, 1, 2]);
    }

    #[test]
    fn disabled_range_ignores_bounds() {
        let mut engine = engine(1..=5);
        engine.set_range(2, Some(3));
        assert_eq!(engine.valid_indices().len(), 5);
    }

    #[test]
    fn important_only_is_subset() {
        let mut engine = mixed_engine();
        engine.set_range_enabled(true);
        engine.set_range(2, Some(5));
        engine.set_kind_enabled(QuestionKind::ShortAnswer, false);

        let all = engine.valid_indices();
        engine.set_important_only(true);
        let important = engine.valid_indices();

        assert!(important.iter().all(|i| all.contains(i)));
        assert_eq!(important, vec![1, 3]);
    }

    #[test]
    fn kind_filter_excludes_disabled_kinds() {
        let mut engine = mixed_engine();
        engine.set_kind_enabled(QuestionKind::SingleChoice, false);
        engine.set_kind_enabled(QuestionKind::MultipleChoice, false);
        assert_eq!(engine.valid_indices(), vec![2, 5]);

        engine.set_kind_enabled(QuestionKind::ShortAnswer, false);
        assert!(engine.valid_indices().is_empty());
        assert_eq!(engine.next(0, &AnswerState::new(), &mut rng()), None);
        assert_eq!(engine.prev(0), None);
    }

    #[test]
    fn next_then_prev_returns_to_start() {
        let mut engine = mixed_engine();
        engine.set_important_only(true);
        let valid = engine.valid_indices();
        let answers = AnswerState::new();

        for &i in &valid[..valid.len() - 1] {
            let next = engine.next(i, &answers, &mut rng()).unwrap();
            assert_eq!(engine.prev(next), Some(i));
        }
    }

    #[test]
    fn next_and_prev_stop_at_edges() {
        let engine = engine(1..=3);
        let answers = AnswerState::new();
        assert_eq!(engine.next(2, &answers, &mut rng()), None);
        assert_eq!(engine.prev(0), None);
        assert_eq!(engine.next(0, &answers, &mut rng()), Some(1));
    }

    #[test]
    fn outside_current_goes_to_window_edges() {
        let mut engine = engine(1..=10);
        engine.set_range_enabled(true);
        engine.set_range(4, Some(6));
        let answers = AnswerState::new();

        assert_eq!(engine.next(0, &answers, &mut rng()), Some(3));
        assert_eq!(engine.prev(9), Some(5));
    }

    #[test]
    fn random_next_picks_unanswered_valid_questions() {
        let mut engine = engine(1..=6);
        engine.set_random_jump(true);
        let answers: AnswerState = [(1, Outcome::Correct), (3, Outcome::Wrong)].into_iter().collect();

        let candidates = engine.random_candidates(&answers);
        assert_eq!(candidates, vec![1, 3, 4, 5]);

        let mut rng = rng();
        for _ in 0..20 {
            let picked = engine.next(0, &answers, &mut rng).unwrap();
            assert!(candidates.contains(&picked));
        }
    }

    #[test]
    fn random_next_stops_when_everything_answered() {
        let mut engine = engine(1..=3);
        engine.set_random_jump(true);
        let answers: AnswerState = (1..=3).map(|n| (n, Outcome::Correct)).collect();

        assert_eq!(engine.random_next(&answers, &mut rng()), None);
        assert_eq!(engine.next(0, &answers, &mut rng()), None);
        assert!(!engine.has_next(0, &answers));
    }

    #[test]
    fn random_candidates_respect_range() {
        let mut engine = engine(1..=10);
        engine.set_random_jump(true);
        engine.set_range_enabled(true);
        engine.set_range(9, Some(10));
        let answers: AnswerState = [(9, Outcome::Correct)].into_iter().collect();
        assert_eq!(engine.random_candidates(&answers), vec![9]);
    }

    #[test]
    fn jump_to_distinguishes_missing_and_filtered() {
        let mut engine = engine(1..=3);
        engine.set_range_enabled(true);
        engine.set_range(2, Some(3));

        assert_eq!(
            engine.jump_to(1),
            Err(JumpError::FilteredOut {
                number: 1,
                reason: FilterReason::Range { start: 2, end: 3 },
            })
        );
        assert_eq!(engine.jump_to(99), Err(JumpError::NotFound { number: 99 }));
        assert_eq!(engine.jump_to(2), Ok(1));
    }

    #[test]
    fn jump_to_reports_importance_then_kind() {
        let mut engine = mixed_engine();
        engine.set_important_only(true);
        engine.set_kind_enabled(QuestionKind::MultipleChoice, false);

        assert_eq!(
            engine.jump_to(1),
            Err(JumpError::FilteredOut {
                number: 1,
                reason: FilterReason::Importance,
            })
        );
        assert_eq!(
            engine.jump_to(2),
            Err(JumpError::FilteredOut {
                number: 2,
                reason: FilterReason::Kind {
                    kind: QuestionKind::MultipleChoice,
                },
            })
        );
        assert_eq!(engine.jump_to(6), Ok(5));
    }

    #[test]
    fn has_next_in_sequential_mode() {
        let engine = engine(1..=3);
        let answers = AnswerState::new();
        assert!(engine.has_next(1, &answers));
        assert!(!engine.has_next(2, &answers));
    }

    #[test]
    fn has_next_agrees_with_next_outside_valid_set() {
        let mut engine = engine(1..=4);
        engine.set_range_enabled(true);
        engine.set_range(1, Some(2));
        let answers = AnswerState::new();

        assert!(engine.has_next(2, &answers));
        assert_eq!(engine.next(2, &answers, &mut rng()), Some(0));
        assert!(!engine.has_next(1, &answers));
        assert_eq!(engine.next(1, &answers, &mut rng()), None);
    }

    #[test]
    fn reset_range_restores_defaults() {
        let mut engine = engine(1..=3);
        engine.set_range_enabled(true);
        engine.set_range(0, Some(2));
        assert_eq!(engine.config().range_start, 1);

        engine.reset_range();
        assert!(!engine.config().range_enabled);
        assert_eq!(engine.config().range_end, None);
    }
}
