//! Core types for the quiz runner.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Question kind, taken from the header label of a question block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    SingleChoice,
    MultipleChoice,
    ShortAnswer,
}

impl QuestionKind {
    /// All kinds, in header-vocabulary order.
    pub const ALL: [QuestionKind; 3] = [
        Self::SingleChoice,
        Self::MultipleChoice,
        Self::ShortAnswer,
    ];

    /// Label used in question headers.
    pub fn label(self) -> &'static str {
        match self {
            Self::SingleChoice => "單選題",
            Self::MultipleChoice => "多選題",
            Self::ShortAnswer => "簡答題",
        }
    }

    /// Parse from a header label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "單選題" => Some(Self::SingleChoice),
            "多選題" => Some(Self::MultipleChoice),
            "簡答題" => Some(Self::ShortAnswer),
            _ => None,
        }
    }

    /// Whether answers are picked from lettered options.
    pub fn is_choice(self) -> bool {
        !matches!(self, Self::ShortAnswer)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SingleChoice => "single-choice",
            Self::MultipleChoice => "multiple-choice",
            Self::ShortAnswer => "short-answer",
        };
        f.write_str(name)
    }
}

/// A lettered option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub letter: char,
    pub text: String,
}

impl QuestionOption {
    pub fn new(letter: char, text: impl Into<String>) -> Self {
        Self {
            letter,
            text: text.into(),
        }
    }

    /// Option text without its full-width parenthesised translation.
    ///
    /// `"Apple（蘋果）"` becomes `"Apple"`.
    pub fn english_text(&self) -> String {
        match full_width_parens(&self.text) {
            Some((start, end)) => {
                let mut out = String::with_capacity(self.text.len());
                out.push_str(&self.text[..start]);
                out.push_str(&self.text[end..]);
                out.trim().to_string()
            }
            None => self.text.trim().to_string(),
        }
    }

    /// The translation inside the first `（…）`, or the whole text when there is none.
    pub fn chinese_text(&self) -> String {
        match full_width_parens(&self.text) {
            Some((start, end)) => {
                let inner = &self.text[start + '（'.len_utf8()..end - '）'.len_utf8()];
                inner.to_string()
            }
            None => self.text.clone(),
        }
    }
}

/// Byte span of the first non-empty `（…）` segment, parens included.
fn full_width_parens(text: &str) -> Option<(usize, usize)> {
    let open = text.find('（')?;
    let inner_start = open + '（'.len_utf8();
    let close = text[inner_start..].find('）')? + inner_start;
    if close == inner_start {
        return None;
    }
    Some((open, close + '）'.len_utf8()))
}

/// A parsed question. Immutable once parsed; `number` is the stable key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub number: u32,
    pub kind: QuestionKind,
    pub is_important: bool,
    pub prompt_english: String,
    pub prompt_chinese: String,
    pub images: Vec<String>,
    pub options: Vec<QuestionOption>,
    pub correct_answer: BTreeSet<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    /// Correct letters in ascending order, e.g. `"AB"`.
    pub fn correct_answer_string(&self) -> String {
        self.correct_answer.iter().collect()
    }

    /// Grade a letter selection. Short-answer questions are self-assessed and return `None`.
    pub fn grade(&self, selection: &BTreeSet<char>) -> Option<Outcome> {
        if !self.kind.is_choice() {
            return None;
        }
        Some(Outcome::from_correct(*selection == self.correct_answer))
    }

    pub fn has_explanation(&self) -> bool {
        self.explanation.is_some()
    }

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }
}

/// Result of answering a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Correct,
    Wrong,
}

impl Outcome {
    pub fn from_correct(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Wrong }
    }

    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

/// Answer counters computed over the whole answer state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerStats {
    pub correct_count: usize,
    pub wrong_count: usize,
    pub total_answered: usize,
}

impl AnswerStats {
    /// Percentage of correct answers, `0.0` when nothing has been answered.
    pub fn accuracy(&self) -> f64 {
        if self.total_answered == 0 {
            return 0.0;
        }
        self.correct_count as f64 / self.total_answered as f64 * 100.0
    }
}

/// How far through the bank the user is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.answered as f64 / self.total as f64 * 100.0
    }
}

fn default_range_start() -> u32 {
    1
}

fn default_enabled_kinds() -> BTreeSet<QuestionKind> {
    QuestionKind::ALL.into_iter().collect()
}

/// Active navigation filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub range_enabled: bool,
    #[serde(default = "default_range_start")]
    pub range_start: u32,
    #[serde(default)]
    pub range_end: Option<u32>,
    #[serde(default)]
    pub important_only: bool,
    #[serde(default = "default_enabled_kinds")]
    pub enabled_kinds: BTreeSet<QuestionKind>,
    #[serde(default)]
    pub random_jump_enabled: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            range_enabled: false,
            range_start: default_range_start(),
            range_end: None,
            important_only: false,
            enabled_kinds: default_enabled_kinds(),
            random_jump_enabled: false,
        }
    }
}

impl FilterConfig {
    pub fn is_kind_enabled(&self, kind: QuestionKind) -> bool {
        self.enabled_kinds.contains(&kind)
    }

    /// Disable the reading range and restore its default bounds.
    pub fn reset_range(&mut self) {
        self.range_enabled = false;
        self.range_start = default_range_start();
        self.range_end = None;
    }
}

/// Resolved reading-range window, as indices into the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeWindow {
    pub start_index: usize,
    pub end_index: usize,
    pub start_number: u32,
    pub end_number: u32,
    /// True when the configured range was empty or inverted and the full bank is used instead.
    pub fell_back: bool,
}

impl RangeWindow {
    /// Number of questions inside the window.
    pub fn count(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index <= self.end_index
    }
}

/// Which active filter excludes a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "filter", rename_all = "snake_case")]
pub enum FilterReason {
    Range { start: u32, end: u32 },
    Importance,
    Kind { kind: QuestionKind },
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range { start, end } => {
                write!(f, "outside the reading range ({} to {})", start, end)
            }
            Self::Importance => f.write_str("not marked important"),
            Self::Kind { kind } => write!(f, "{} questions are disabled", kind),
        }
    }
}
