// src/models/quiz.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Quiz and question difficulty.
/// Stored as 'EASY', 'MEDIUM' or 'HARD'.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EASY" => Ok(Difficulty::Easy),
            "MEDIUM" => Ok(Difficulty::Medium),
            "HARD" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

/// Question type: 'MULTIPLE_CHOICE' or 'TRUE_FALSE'.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "MULTIPLE_CHOICE",
            QuestionType::TrueFalse => "TRUE_FALSE",
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MULTIPLE_CHOICE" => Ok(QuestionType::MultipleChoice),
            "TRUE_FALSE" => Ok(QuestionType::TrueFalse),
            other => Err(format!("unknown question type '{}'", other)),
        }
    }
}

/// A selectable answer. More than one option of a question may be correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnswerOption {
    pub id: i64,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Question {
    pub id: i64,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    /// Options in authoring order. Option indices in a ledger refer to this order.
    pub options: Vec<AnswerOption>,
}

/// A quiz with its full question tree.
/// Immutable once fetched for an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub question_count: i32,

    /// Time limit in seconds.
    pub time_limit: i32,
    pub difficulty: Difficulty,
    pub category: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Time limit as a timer budget. Negative limits count as zero.
    pub fn time_limit_secs(&self) -> u32 {
        u32::try_from(self.time_limit).unwrap_or(0)
    }

    pub fn summary(&self) -> QuizSummary {
        QuizSummary {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            question_count: self.question_count,
            time_limit: self.time_limit,
            difficulty: self.difficulty,
            category: self.category.clone(),
            created_at: self.created_at,
        }
    }

    /// Strips correctness flags so the quiz can be sent to a quiz taker.
    pub fn to_public(&self) -> PublicQuiz {
        PublicQuiz {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            question_count: self.question_count,
            time_limit: self.time_limit,
            difficulty: self.difficulty,
            category: self.category.clone(),
            questions: self
                .questions
                .iter()
                .map(|q| PublicQuestion {
                    id: q.id,
                    text: q.text.clone(),
                    question_type: q.question_type,
                    difficulty: q.difficulty,
                    options: q
                        .options
                        .iter()
                        .map(|o| PublicOption {
                            id: o.id,
                            text: o.text.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Quiz listing row (no questions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub question_count: i32,
    pub time_limit: i32,
    pub difficulty: Difficulty,
    pub category: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for sending a quiz to the client (excludes `is_correct`).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicQuiz {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub question_count: i32,
    pub time_limit: i32,
    pub difficulty: Difficulty,
    pub category: String,
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicQuestion {
    pub id: i64,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub options: Vec<PublicOption>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicOption {
    pub id: i64,
    pub text: String,
}

/// Query parameters for listing quizzes.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuizFilter {
    pub difficulty: Option<Difficulty>,
    /// Exact, case-sensitive category match.
    pub category: Option<String>,
}

/// DTO for authoring a quiz with its questions and options.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 10, max = 3600, message = "Time limit must be between 10 and 3600 seconds."))]
    pub time_limit: i32,
    pub difficulty: Difficulty,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(
        length(min = 1, max = 100, message = "Quiz must have at least 1 question."),
        nested
    )]
    pub questions: Vec<CreateQuestionRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 500))]
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    #[validate(
        length(min = 2, max = 6, message = "A question must have between 2 and 6 options."),
        custom(function = validate_has_correct_option),
        nested
    )]
    pub options: Vec<CreateOptionRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOptionRequest {
    #[validate(length(min = 1, max = 200))]
    pub text: String,
    pub is_correct: bool,
}

fn validate_has_correct_option(
    options: &[CreateOptionRequest],
) -> Result<(), validator::ValidationError> {
    if !options.iter().any(|o| o.is_correct) {
        return Err(validator::ValidationError::new("no_correct_option")
            .with_message("At least one option must be marked correct.".into()));
    }
    Ok(())
}
