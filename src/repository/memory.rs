// src/repository/memory.rs

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::Utc;

use super::{AttemptRepository, QuizRepository, RepoError, UserRepository};
use crate::models::{
    attempt::{AnswerDetail, Attempt, AttemptDetail, AttemptSummary, UserAnswer},
    quiz::{AnswerOption, CreateQuizRequest, Question, Quiz, QuizFilter, QuizSummary},
    user::{ProfileUpdate, UserProfile},
};

#[derive(Default)]
struct Tables {
    quizzes: Vec<Quiz>,
    attempts: Vec<Attempt>,
    users: HashMap<String, UserProfile>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn quiz(&self, id: i64) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| q.id == id)
    }
}

/// Simple in-memory repository for tests and local prototyping.
/// All ids come from one shared counter.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepoError> {
        self.tables
            .lock()
            .map_err(|e| RepoError::Connection(e.to_string()))
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn get_quiz_by_id(&self, id: i64) -> Result<Option<Quiz>, RepoError> {
        Ok(self.lock()?.quiz(id).cloned())
    }

    async fn list_quizzes(&self, filter: &QuizFilter) -> Result<Vec<QuizSummary>, RepoError> {
        let tables = self.lock()?;
        Ok(tables
            .quizzes
            .iter()
            .rev()
            .filter(|q| filter.difficulty.is_none_or(|d| q.difficulty == d))
            .filter(|q| filter.category.as_ref().is_none_or(|c| &q.category == c))
            .map(Quiz::summary)
            .collect())
    }

    async fn create_quiz(&self, req: &CreateQuizRequest) -> Result<Quiz, RepoError> {
        let mut tables = self.lock()?;
        let quiz_id = tables.next_id();

        let mut questions = Vec::with_capacity(req.questions.len());
        for q in &req.questions {
            let question_id = tables.next_id();
            let mut options = Vec::with_capacity(q.options.len());
            for o in &q.options {
                options.push(AnswerOption {
                    id: tables.next_id(),
                    text: o.text.clone(),
                    is_correct: o.is_correct,
                });
            }
            questions.push(Question {
                id: question_id,
                text: q.text.clone(),
                question_type: q.question_type,
                difficulty: q.difficulty,
                options,
            });
        }

        let quiz = Quiz {
            id: quiz_id,
            title: req.title.clone(),
            description: req.description.clone(),
            question_count: questions.len() as i32,
            time_limit: req.time_limit,
            difficulty: req.difficulty,
            category: req.category.clone(),
            created_at: Some(Utc::now()),
            questions,
        };
        tables.quizzes.push(quiz.clone());
        Ok(quiz)
    }
}

#[async_trait]
impl AttemptRepository for InMemoryRepository {
    async fn save_attempt(
        &self,
        user_id: &str,
        quiz_id: i64,
        score: i64,
        answers: &[UserAnswer],
    ) -> Result<Attempt, RepoError> {
        let mut tables = self.lock()?;
        if tables.quiz(quiz_id).is_none() {
            return Err(RepoError::Database(format!("quiz {} does not exist", quiz_id)));
        }
        if !tables.users.contains_key(user_id) {
            return Err(RepoError::Database(format!("user {} does not exist", user_id)));
        }

        let attempt = Attempt {
            id: tables.next_id(),
            quiz_id,
            user_id: user_id.to_string(),
            score,
            user_answers: answers.to_vec(),
            completed_at: Some(Utc::now()),
        };
        tables.attempts.push(attempt.clone());
        Ok(attempt)
    }

    async fn get_attempt_by_id(&self, id: i64) -> Result<Option<AttemptDetail>, RepoError> {
        let tables = self.lock()?;
        let Some(attempt) = tables.attempts.iter().find(|a| a.id == id) else {
            return Ok(None);
        };
        let quiz = tables
            .quiz(attempt.quiz_id)
            .ok_or_else(|| RepoError::Corrupt(format!("attempt {} has no quiz", id)))?;

        let mut answers = Vec::with_capacity(attempt.user_answers.len());
        for answer in &attempt.user_answers {
            let question = quiz
                .questions
                .iter()
                .find(|q| q.id == answer.question_id)
                .ok_or_else(|| {
                    RepoError::Corrupt(format!("question {} is missing", answer.question_id))
                })?;
            answers.push(AnswerDetail {
                question_id: question.id,
                question_text: question.text.clone(),
                options: question.options.clone(),
                selected_option_id: answer.selected_option_id,
                is_correct: answer.is_correct,
            });
        }

        Ok(Some(AttemptDetail {
            attempt: attempt.clone(),
            quiz: quiz.summary(),
            answers,
        }))
    }

    async fn list_attempts_by_user(&self, user_id: &str) -> Result<Vec<AttemptSummary>, RepoError> {
        let tables = self.lock()?;
        // Insertion order is completion order, ids break timestamp ties.
        let mut summaries: Vec<AttemptSummary> = tables
            .attempts
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter_map(|a| {
                let quiz = tables.quiz(a.quiz_id)?;
                Some(AttemptSummary {
                    id: a.id,
                    quiz_id: a.quiz_id,
                    quiz_title: quiz.title.clone(),
                    category: quiz.category.clone(),
                    question_count: quiz.question_count,
                    time_limit: quiz.time_limit,
                    score: Some(a.score),
                    completed_at: a.completed_at,
                })
            })
            .collect();
        summaries.sort_by(|a, b| b.completed_at.cmp(&a.completed_at).then(b.id.cmp(&a.id)));
        Ok(summaries)
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn upsert_user(&self, profile: &ProfileUpdate) -> Result<UserProfile, RepoError> {
        let mut tables = self.lock()?;
        let created_at = tables
            .users
            .get(&profile.id)
            .and_then(|u| u.created_at)
            .unwrap_or_else(Utc::now);

        let user = UserProfile {
            id: profile.id.clone(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            email_verified: profile.email_verified,
            image: profile.image.clone(),
            created_at: Some(created_at),
        };
        tables.users.insert(profile.id.clone(), user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::{
        CreateOptionRequest, CreateQuestionRequest, Difficulty, QuestionType,
    };

    fn create_request(category: &str, difficulty: Difficulty) -> CreateQuizRequest {
        CreateQuizRequest {
            title: format!("{} quiz", category),
            description: Some("desc".to_string()),
            time_limit: 60,
            difficulty,
            category: category.to_string(),
            questions: vec![
                CreateQuestionRequest {
                    text: "Q1".to_string(),
                    question_type: QuestionType::TrueFalse,
                    difficulty,
                    options: vec![
                        CreateOptionRequest {
                            text: "True".to_string(),
                            is_correct: true,
                        },
                        CreateOptionRequest {
                            text: "False".to_string(),
                            is_correct: false,
                        },
                    ],
                },
                CreateQuestionRequest {
                    text: "Q2".to_string(),
                    question_type: QuestionType::MultipleChoice,
                    difficulty,
                    options: vec![
                        CreateOptionRequest {
                            text: "A".to_string(),
                            is_correct: false,
                        },
                        CreateOptionRequest {
                            text: "B".to_string(),
                            is_correct: true,
                        },
                        CreateOptionRequest {
                            text: "C".to_string(),
                            is_correct: false,
                        },
                    ],
                },
            ],
        }
    }

    fn profile(id: &str) -> ProfileUpdate {
        ProfileUpdate {
            id: id.to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            email_verified: true,
            image: None,
        }
    }

    #[tokio::test]
    async fn created_quiz_round_trips_in_order() {
        let repo = InMemoryRepository::new();
        let created = repo
            .create_quiz(&create_request("Science", Difficulty::Easy))
            .await
            .unwrap();

        let fetched = repo.get_quiz_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.question_count, 2);
        assert_eq!(fetched.questions[1].options[1].text, "B");
    }

    #[tokio::test]
    async fn unknown_quiz_is_none() {
        let repo = InMemoryRepository::new();
        assert!(repo.get_quiz_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_filters_and_orders_newest_first() {
        let repo = InMemoryRepository::new();
        repo.create_quiz(&create_request("Science", Difficulty::Easy))
            .await
            .unwrap();
        repo.create_quiz(&create_request("History", Difficulty::Hard))
            .await
            .unwrap();
        repo.create_quiz(&create_request("Science", Difficulty::Hard))
            .await
            .unwrap();

        let all = repo.list_quizzes(&QuizFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].category, "Science");
        assert_eq!(all[0].difficulty, Difficulty::Hard);

        let science = repo
            .list_quizzes(&QuizFilter {
                difficulty: None,
                category: Some("Science".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(science.len(), 2);

        let hard_science = repo
            .list_quizzes(&QuizFilter {
                difficulty: Some(Difficulty::Hard),
                category: Some("Science".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(hard_science.len(), 1);

        let lowercase = repo
            .list_quizzes(&QuizFilter {
                difficulty: None,
                category: Some("science".to_string()),
            })
            .await
            .unwrap();
        assert!(lowercase.is_empty());
    }

    #[tokio::test]
    async fn saved_attempt_round_trips_through_detail() {
        let repo = InMemoryRepository::new();
        let quiz = repo
            .create_quiz(&create_request("Science", Difficulty::Easy))
            .await
            .unwrap();
        repo.upsert_user(&profile("user_1")).await.unwrap();

        let answers = vec![
            UserAnswer {
                question_id: quiz.questions[0].id,
                selected_option_id: quiz.questions[0].options[0].id,
                is_correct: true,
            },
            UserAnswer {
                question_id: quiz.questions[1].id,
                selected_option_id: quiz.questions[1].options[2].id,
                is_correct: false,
            },
        ];
        let saved = repo.save_attempt("user_1", quiz.id, 1, &answers).await.unwrap();

        let detail = repo.get_attempt_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(detail.attempt, saved);
        assert_eq!(detail.attempt.user_answers, answers);
        assert_eq!(detail.quiz.id, quiz.id);
        assert_eq!(detail.answers[1].options.len(), 3);
    }

    #[tokio::test]
    async fn save_requires_known_user_and_quiz() {
        let repo = InMemoryRepository::new();
        let quiz = repo
            .create_quiz(&create_request("Science", Difficulty::Easy))
            .await
            .unwrap();
        assert!(repo.save_attempt("ghost", quiz.id, 0, &[]).await.is_err());

        repo.upsert_user(&profile("user_1")).await.unwrap();
        assert!(repo.save_attempt("user_1", 12345, 0, &[]).await.is_err());
    }

    #[tokio::test]
    async fn lists_user_attempts_most_recent_first() {
        let repo = InMemoryRepository::new();
        let quiz = repo
            .create_quiz(&create_request("Science", Difficulty::Easy))
            .await
            .unwrap();
        repo.upsert_user(&profile("user_1")).await.unwrap();
        repo.upsert_user(&profile("user_2")).await.unwrap();

        let first = repo.save_attempt("user_1", quiz.id, 1, &[]).await.unwrap();
        repo.save_attempt("user_2", quiz.id, 2, &[]).await.unwrap();
        let last = repo.save_attempt("user_1", quiz.id, 2, &[]).await.unwrap();

        let listed = repo.list_attempts_by_user("user_1").await.unwrap();
        let ids: Vec<i64> = listed.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![last.id, first.id]);
        assert_eq!(listed[0].category, "Science");
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let repo = InMemoryRepository::new();
        let first = repo.upsert_user(&profile("user_1")).await.unwrap();
        let second = repo.upsert_user(&profile("user_1")).await.unwrap();
        assert_eq!(first, second);
    }
}
