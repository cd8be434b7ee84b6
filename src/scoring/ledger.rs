// src/scoring/ledger.rs

use super::ScoringError;

/// Selections of one in-progress attempt.
///
/// One slot per question position, so a question can never hold two selections.
/// Once sealed, the ledger ignores further selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerLedger {
    selections: Vec<Option<usize>>,
    sealed: bool,
}

impl AnswerLedger {
    pub fn new(question_count: usize) -> Self {
        Self {
            selections: vec![None; question_count],
            sealed: false,
        }
    }

    /// Builds a ledger from `(question, option)` pairs.
    /// Later pairs for the same question win.
    pub fn from_selections<I>(question_count: usize, selections: I) -> Result<Self, ScoringError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut ledger = Self::new(question_count);
        for (question, option) in selections {
            ledger.select(question, option)?;
        }
        Ok(ledger)
    }

    /// Records `option` for `question`, replacing any earlier choice.
    ///
    /// Returns `Ok(false)` without touching the ledger if it is sealed.
    pub fn select(&mut self, question: usize, option: usize) -> Result<bool, ScoringError> {
        if self.sealed {
            return Ok(false);
        }
        let count = self.selections.len();
        let slot = self
            .selections
            .get_mut(question)
            .ok_or(ScoringError::QuestionOutOfRange { question, count })?;
        *slot = Some(option);
        Ok(true)
    }

    pub fn selection(&self, question: usize) -> Option<usize> {
        self.selections.get(question).copied().flatten()
    }

    pub fn selections(&self) -> &[Option<usize>] {
        &self.selections
    }

    pub fn question_count(&self) -> usize {
        self.selections.len()
    }

    pub fn answered_count(&self) -> usize {
        self.selections.iter().filter(|s| s.is_some()).count()
    }

    /// True iff every question has a selection.
    pub fn is_complete(&self) -> bool {
        self.selections.iter().all(Option::is_some)
    }

    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}
