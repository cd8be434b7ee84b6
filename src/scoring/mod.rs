// src/scoring/mod.rs

//! Grading and analytics for quiz attempts.
//!
//! Everything here is synchronous and free of I/O. Persistence and identity
//! live in `services` and `repository`.

pub mod aggregation;
pub mod grading;
pub mod ledger;
pub mod session;
pub mod timer;

use thiserror::Error;

/// Malformed quiz or answer data. Surfaced to callers as a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("quiz has no questions")]
    EmptyQuiz,

    #[error("question {question} is out of range (quiz has {count} questions)")]
    QuestionOutOfRange { question: usize, count: usize },

    #[error("option {option} is out of range for question {question} ({count} options)")]
    OptionOutOfRange {
        question: usize,
        option: usize,
        count: usize,
    },

    #[error("ledger covers {ledger} questions but quiz has {quiz}")]
    LedgerMismatch { ledger: usize, quiz: usize },

    #[error("question {0} has no options")]
    NoOptions(usize),
}
