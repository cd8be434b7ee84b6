// tests/pg_repository_tests.rs
//
// Runs against a real Postgres database:
//   DATABASE_URL=postgres://... cargo test --test pg_repository_tests -- --ignored

use quizhub::{
    models::{
        attempt::UserAnswer,
        quiz::{
            CreateOptionRequest, CreateQuestionRequest, CreateQuizRequest, Difficulty, QuestionType,
            QuizFilter,
        },
        user::ProfileUpdate,
    },
    repository::Storage,
};
use sqlx::postgres::PgPoolOptions;

async fn storage() -> Storage {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing. Make sure DATABASE_URL is set.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    Storage::postgres(pool)
}

fn quiz_request(category: &str) -> CreateQuizRequest {
    let question = |text: &str| CreateQuestionRequest {
        text: text.to_string(),
        question_type: QuestionType::MultipleChoice,
        difficulty: Difficulty::Medium,
        options: vec![
            CreateOptionRequest {
                text: "A".to_string(),
                is_correct: false,
            },
            CreateOptionRequest {
                text: "B".to_string(),
                is_correct: true,
            },
        ],
    };

    CreateQuizRequest {
        title: "Persistence".to_string(),
        description: Some("Round trip".to_string()),
        time_limit: 120,
        difficulty: Difficulty::Medium,
        category: category.to_string(),
        questions: vec![question("First"), question("Second")],
    }
}

#[tokio::test]
#[ignore]
async fn quiz_and_attempt_round_trip() {
    let storage = storage().await;
    let user_id = format!("pg_{}", uuid::Uuid::new_v4().simple());
    let category = format!("cat_{}", uuid::Uuid::new_v4().simple());

    let quiz = storage.quizzes.create_quiz(&quiz_request(&category)).await.unwrap();
    assert_eq!(quiz.question_count, 2);
    assert_eq!(quiz.questions[1].options[1].text, "B");

    let fetched = storage.quizzes.get_quiz_by_id(quiz.id).await.unwrap().unwrap();
    assert_eq!(fetched.questions, quiz.questions);

    let listed = storage
        .quizzes
        .list_quizzes(&QuizFilter {
            difficulty: Some(Difficulty::Medium),
            category: Some(category.clone()),
        })
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    storage
        .users
        .upsert_user(&ProfileUpdate {
            id: user_id.clone(),
            name: "Pg Tester".to_string(),
            email: "pg@example.com".to_string(),
            email_verified: false,
            image: None,
        })
        .await
        .unwrap();

    let answers: Vec<UserAnswer> = quiz
        .questions
        .iter()
        .map(|q| UserAnswer {
            question_id: q.id,
            selected_option_id: q.options[1].id,
            is_correct: true,
        })
        .collect();
    let attempt = storage
        .attempts
        .save_attempt(&user_id, quiz.id, 2, &answers)
        .await
        .unwrap();

    let detail = storage.attempts.get_attempt_by_id(attempt.id).await.unwrap().unwrap();
    assert_eq!(detail.attempt.user_id, user_id);
    assert_eq!(detail.answers.len(), 2);
    assert_eq!(detail.answers[0].question_text, "First");
    assert_eq!(detail.answers[0].options.len(), 2);

    let history = storage.attempts.list_attempts_by_user(&user_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].category, category);
    assert_eq!(history[0].score, Some(2));
}

#[tokio::test]
#[ignore]
async fn upsert_user_is_idempotent() {
    let storage = storage().await;
    let id = format!("pg_{}", uuid::Uuid::new_v4().simple());
    let mut update = ProfileUpdate {
        id: id.clone(),
        name: "First".to_string(),
        email: "first@example.com".to_string(),
        email_verified: false,
        image: None,
    };

    storage.users.upsert_user(&update).await.unwrap();
    update.name = "Second".to_string();
    let profile = storage.users.upsert_user(&update).await.unwrap();

    assert_eq!(profile.id, id);
    assert_eq!(profile.name, "Second");
}
