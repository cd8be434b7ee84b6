// src/scoring/grading.rs

use crate::models::{attempt::UserAnswer, quiz::Quiz};

use super::{ScoringError, ledger::AnswerLedger};

/// Outcome of grading one ledger against its quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeReport {
    /// Count of correct answers.
    pub score: i64,
    /// Exactly one entry per question, in quiz order.
    pub answers: Vec<UserAnswer>,
}

impl GradeReport {
    pub fn total_questions(&self) -> usize {
        self.answers.len()
    }
}

/// Grades a ledger snapshot.
///
/// * A selected option is correct when its own `is_correct` flag is set, so
///   questions with several correct options accept any of them.
/// * An unanswered question is recorded against its first option with
///   `is_correct = false`.
///
/// Pure: the same quiz and ledger always produce the same report.
pub fn grade(quiz: &Quiz, ledger: &AnswerLedger) -> Result<GradeReport, ScoringError> {
    if quiz.questions.is_empty() {
        return Err(ScoringError::EmptyQuiz);
    }
    if ledger.question_count() != quiz.questions.len() {
        return Err(ScoringError::LedgerMismatch {
            ledger: ledger.question_count(),
            quiz: quiz.questions.len(),
        });
    }

    let mut score = 0;
    let mut answers = Vec::with_capacity(quiz.questions.len());

    for (idx, question) in quiz.questions.iter().enumerate() {
        let answer = match ledger.selection(idx) {
            None => {
                let placeholder = question.options.first().ok_or(ScoringError::NoOptions(idx))?;
                UserAnswer {
                    question_id: question.id,
                    selected_option_id: placeholder.id,
                    is_correct: false,
                }
            }
            Some(option_idx) => {
                let option =
                    question
                        .options
                        .get(option_idx)
                        .ok_or(ScoringError::OptionOutOfRange {
                            question: idx,
                            option: option_idx,
                            count: question.options.len(),
                        })?;
                UserAnswer {
                    question_id: question.id,
                    selected_option_id: option.id,
                    is_correct: option.is_correct,
                }
            }
        };

        if answer.is_correct {
            score += 1;
        }
        answers.push(answer);
    }

    Ok(GradeReport { score, answers })
}
