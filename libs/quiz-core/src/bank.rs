//! Validated question bank.

use crate::error::BankError;
use crate::parser;
use crate::types::Question;

/// Questions sorted ascending by number, numbers unique, never empty.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank, rejecting empty input and duplicate numbers.
    pub fn new(mut questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        questions.sort_by_key(|q| q.number);
        if let Some(pair) = questions.windows(2).find(|w| w[0].number == w[1].number) {
            return Err(BankError::DuplicateNumber {
                number: pair[0].number,
            });
        }

        Ok(Self { questions })
    }

    /// Merge documents in the given order, parse, and build a bank.
    pub fn from_documents<S: AsRef<str>>(documents: &[S]) -> Result<Self, BankError> {
        let merged = parser::merge_documents(documents);
        let questions = parser::parse(&merged);
        tracing::debug!(
            documents = documents.len(),
            questions = questions.len(),
            "parsed question bank"
        );
        Self::new(questions)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    /// Index of the question with `number`.
    pub fn index_of(&self, number: u32) -> Option<usize> {
        self.questions
            .binary_search_by_key(&number, |q| q.number)
            .ok()
    }

    pub fn first_number(&self) -> u32 {
        self.questions[0].number
    }

    pub fn last_number(&self) -> u32 {
        self.questions[self.questions.len() - 1].number
    }
}
