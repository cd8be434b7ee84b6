// src/models/attempt.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::quiz::{AnswerOption, QuizSummary};

/// One graded answer, in quiz question order.
/// Unanswered questions carry the question's first option and `is_correct = false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserAnswer {
    pub question_id: i64,
    pub selected_option_id: i64,
    pub is_correct: bool,
}

/// Represents the 'quiz_attempts' table with its answers.
/// Created once per finalization, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Attempt {
    pub id: i64,
    pub quiz_id: i64,
    pub user_id: String,

    /// Count of correct answers.
    pub score: i64,
    pub user_answers: Vec<UserAnswer>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Attempt row joined with its quiz, as consumed by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttemptSummary {
    pub id: i64,
    pub quiz_id: i64,
    pub quiz_title: String,
    pub category: String,
    pub question_count: i32,
    pub time_limit: i32,
    pub score: Option<i64>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A stored answer joined with its question and every option of that question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnswerDetail {
    pub question_id: i64,
    pub question_text: String,
    pub options: Vec<AnswerOption>,
    pub selected_option_id: i64,
    pub is_correct: bool,
}

/// Attempt with nested quiz and per-answer detail, for review rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptDetail {
    pub attempt: Attempt,
    pub quiz: QuizSummary,
    pub answers: Vec<AnswerDetail>,
}

/// DTO for submitting a whole attempt at once.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitAttemptRequest {
    /// User's selections.
    /// Key: question position (0-based)
    /// Value: option position (0-based)
    #[serde(default)]
    pub answers: HashMap<usize, usize>,
}

/// Result of a finalized and persisted attempt.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponse {
    pub attempt_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total_questions: usize,
    pub user_answers: Vec<UserAnswer>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Review of a past attempt.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttemptReview {
    pub attempt_id: i64,
    pub quiz_id: i64,
    pub quiz_title: String,
    pub score: i64,
    pub correct: usize,
    pub total: usize,
    pub percentage: i64,
    pub feedback: String,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub answers: Vec<AnswerDetail>,
}

impl From<AttemptDetail> for AttemptReview {
    fn from(detail: AttemptDetail) -> Self {
        let total = detail.answers.len();
        let correct = detail.answers.iter().filter(|a| a.is_correct).count();
        let percentage = if total == 0 {
            0
        } else {
            (correct as f64 / total as f64 * 100.0).round() as i64
        };

        AttemptReview {
            attempt_id: detail.attempt.id,
            quiz_id: detail.quiz.id,
            quiz_title: detail.quiz.title,
            score: detail.attempt.score,
            correct,
            total,
            percentage,
            feedback: feedback_for(percentage).to_string(),
            completed_at: detail.attempt.completed_at,
            answers: detail.answers,
        }
    }
}

/// Feedback band shown next to a review percentage.
pub fn feedback_for(percentage: i64) -> &'static str {
    match percentage {
        p if p >= 90 => "Excellent!",
        p if p >= 70 => "Great job!",
        p if p >= 50 => "Good effort!",
        _ => "Keep practicing!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::Difficulty;

    fn detail(flags: &[bool]) -> AttemptDetail {
        let answers: Vec<AnswerDetail> = flags
            .iter()
            .enumerate()
            .map(|(i, &ok)| AnswerDetail {
                question_id: i as i64 + 1,
                question_text: format!("Q{}", i + 1),
                options: vec![],
                selected_option_id: 1,
                is_correct: ok,
            })
            .collect();
        AttemptDetail {
            attempt: Attempt {
                id: 7,
                quiz_id: 3,
                user_id: "user_1".to_string(),
                score: flags.iter().filter(|f| **f).count() as i64,
                user_answers: vec![],
                completed_at: None,
            },
            quiz: QuizSummary {
                id: 3,
                title: "Capitals".to_string(),
                description: None,
                question_count: flags.len() as i32,
                time_limit: 60,
                difficulty: Difficulty::Easy,
                category: "Geography".to_string(),
                created_at: None,
            },
            answers,
        }
    }

    #[test]
    fn review_computes_rounded_percentage_and_band() {
        let review = AttemptReview::from(detail(&[true, true, false]));
        assert_eq!(review.correct, 2);
        assert_eq!(review.total, 3);
        assert_eq!(review.percentage, 67);
        assert_eq!(review.feedback, "Good effort!");
    }

    #[test]
    fn review_of_empty_attempt_is_zero_percent() {
        let review = AttemptReview::from(detail(&[]));
        assert_eq!(review.percentage, 0);
    }

    #[test]
    fn feedback_bands() {
        assert_eq!(feedback_for(100), "Excellent!");
        assert_eq!(feedback_for(90), "Excellent!");
        assert_eq!(feedback_for(70), "Great job!");
        assert_eq!(feedback_for(50), "Good effort!");
        assert_eq!(feedback_for(49), "Keep practicing!");
    }
}
