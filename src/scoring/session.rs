// src/scoring/session.rs

use std::sync::Arc;

use crate::models::quiz::Quiz;

use super::{
    ScoringError,
    grading::{GradeReport, grade},
    ledger::AnswerLedger,
    timer::{FinalizeTrigger, SessionTimer},
};

/// Result of the single finalization of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finalization {
    pub trigger: FinalizeTrigger,
    pub result: Result<GradeReport, ScoringError>,
}

/// One attempt in progress: the quiz being taken, its ledger and its timer.
///
/// Timer expiry and manual submit both end in `finalize`, which grades the
/// sealed ledger. Only the first trigger yields a `Finalization`.
#[derive(Debug, Clone)]
pub struct AttemptSession {
    quiz: Arc<Quiz>,
    ledger: AnswerLedger,
    timer: SessionTimer,
}

impl AttemptSession {
    pub fn start(quiz: Arc<Quiz>) -> Result<Self, ScoringError> {
        if quiz.questions.is_empty() {
            return Err(ScoringError::EmptyQuiz);
        }
        let ledger = AnswerLedger::new(quiz.questions.len());
        let timer = SessionTimer::start(quiz.time_limit_secs());
        Ok(Self { quiz, ledger, timer })
    }

    /// Records a selection. Returns `Ok(false)` once the session is finalized.
    pub fn select(&mut self, question: usize, option: usize) -> Result<bool, ScoringError> {
        if self.timer.is_finalized() {
            return Ok(false);
        }
        let count = self.quiz.questions.len();
        let q = self
            .quiz
            .questions
            .get(question)
            .ok_or(ScoringError::QuestionOutOfRange { question, count })?;
        if option >= q.options.len() {
            return Err(ScoringError::OptionOutOfRange {
                question,
                option,
                count: q.options.len(),
            });
        }
        self.ledger.select(question, option)
    }

    pub fn tick(&mut self) -> Option<Finalization> {
        let trigger = self.timer.tick()?;
        Some(self.finalize(trigger))
    }

    pub fn submit(&mut self) -> Option<Finalization> {
        let trigger = self.timer.submit()?;
        Some(self.finalize(trigger))
    }

    fn finalize(&mut self, trigger: FinalizeTrigger) -> Finalization {
        self.ledger.seal();
        Finalization {
            trigger,
            result: grade(&self.quiz, &self.ledger),
        }
    }

    pub fn quiz(&self) -> &Arc<Quiz> {
        &self.quiz
    }

    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn is_finalized(&self) -> bool {
        self.timer.is_finalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::fixtures;

    fn session(time_limit: i32) -> AttemptSession {
        let quiz = fixtures::quiz(&[&[false, true], &[true, false, false]], time_limit);
        AttemptSession::start(Arc::new(quiz)).unwrap()
    }

    #[test]
    fn submit_grades_current_selections() {
        let mut s = session(30);
        s.select(0, 1).unwrap();
        s.select(1, 2).unwrap();

        let fin = s.submit().unwrap();
        assert_eq!(fin.trigger, FinalizeTrigger::Submitted);
        let report = fin.result.unwrap();
        assert_eq!(report.score, 1);
        assert_eq!(report.total_questions(), 2);
    }

    #[test]
    fn expiry_grades_with_unanswered_placeholders() {
        let mut s = session(2);
        s.select(0, 1).unwrap();
        assert!(s.tick().is_none());

        let fin = s.tick().unwrap();
        assert_eq!(fin.trigger, FinalizeTrigger::Expired);
        let report = fin.result.unwrap();
        assert_eq!(report.score, 1);
        assert_eq!(report.answers[1].selected_option_id, 20);
        assert!(!report.answers[1].is_correct);
    }

    #[test]
    fn only_first_trigger_finalizes() {
        let mut s = session(1);
        assert!(s.submit().is_some());
        assert!(s.tick().is_none());
        assert!(s.submit().is_none());
    }

    #[test]
    fn selections_after_finalize_are_ignored() {
        let mut s = session(30);
        s.select(0, 0).unwrap();
        s.submit();
        assert_eq!(s.select(0, 1), Ok(false));
        assert_eq!(s.ledger().selection(0), Some(0));
    }

    #[test]
    fn rejects_out_of_range_selection() {
        let mut s = session(30);
        assert!(matches!(
            s.select(0, 2),
            Err(ScoringError::OptionOutOfRange { .. })
        ));
        assert!(matches!(
            s.select(5, 0),
            Err(ScoringError::QuestionOutOfRange { .. })
        ));
    }

    #[test]
    fn cannot_start_on_empty_quiz() {
        let quiz = fixtures::quiz(&[], 30);
        assert_eq!(
            AttemptSession::start(Arc::new(quiz)).err(),
            Some(ScoringError::EmptyQuiz)
        );
    }
}
