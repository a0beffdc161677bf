// tests/quiz_tests.rs

use quiz_backend::{config::Config, routes, state::AppState};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::collections::HashSet;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL and a pool for seeding fixtures.
async fn spawn_app() -> (String, PgPool) {
    // Note: For Postgres, you must have a running database.
    // We'll read from DATABASE_URL environment variable.
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing. Make sure DATABASE_URL is set.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: database_url.clone(),
        rust_log: "error".to_string(),
        frontend_origin: "http://localhost:3000".to_string(),
        port: 0,
    };

    let state = AppState {
        pool: pool.clone(),
        config,
    };

    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, pool)
}

/// Unique category label per test so fixtures never collide.
fn unique_category(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

async fn seed_question(
    pool: &PgPool,
    category: &str,
    difficulty: &str,
    status: &str,
    correct_answer: i32,
) -> i64 {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO questions
        (category, question, options, correct_answer, explanation, difficulty, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(category)
    .bind(format!("Sample {} question?", difficulty))
    .bind(serde_json::json!(["A", "B", "C", "D"]))
    .bind(correct_answer)
    .bind("Option explained.")
    .bind(difficulty)
    .bind(status)
    .fetch_one(pool)
    .await
    .expect("Failed to seed question")
}

#[tokio::test]
async fn categories_report_per_difficulty_counts() {
    // Arrange
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let category = unique_category("Python");

    for difficulty in ["easy", "easy", "medium", "medium", "hard"] {
        seed_question(&pool, &category, difficulty, "active", 0).await;
    }
    // Inactive questions must not be counted.
    seed_question(&pool, &category, "easy", "inactive", 0).await;

    // Act
    let body: serde_json::Value = client
        .get(format!("{}/api/quiz/categories", address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    // Assert
    assert_eq!(body["success"], true);
    let entry = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == category.as_str())
        .expect("Seeded category missing from index");

    assert_eq!(entry["count"], 5);
    assert_eq!(entry["easy"], 2);
    assert_eq!(entry["medium"], 2);
    assert_eq!(entry["hard"], 1);
}

#[tokio::test]
async fn draw_is_bounded_and_duplicate_free() {
    // Arrange
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let category = unique_category("Java");

    for _ in 0..5 {
        seed_question(&pool, &category, "medium", "active", 1).await;
    }

    // Act: limit below the pool size
    let body: serde_json::Value = client
        .get(format!("{}/api/quiz/test/{}?limit=3", address, category))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Assert
    assert_eq!(body["count"], 3);
    let ids: HashSet<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids.len(), 3, "Draw must not contain duplicates");

    // Act: limit above the pool size returns exactly the eligible pool
    let body: serde_json::Value = client
        .get(format!("{}/api/quiz/test/{}?limit=50", address, category))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["count"], 5);
}

#[tokio::test]
async fn draw_never_leaks_answer_key() {
    // Arrange
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let category = unique_category("Aptitude");

    for _ in 0..3 {
        seed_question(&pool, &category, "easy", "active", 2).await;
    }

    // Act
    let body: serde_json::Value = client
        .get(format!("{}/api/quiz/test/{}", address, category))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Assert: no answer key under any plausible key name
    for question in body["data"].as_array().unwrap() {
        let obj = question.as_object().unwrap();
        assert!(!obj.contains_key("correctAnswer"));
        assert!(!obj.contains_key("correct_answer"));
        assert!(!obj.contains_key("explanation"));
    }
}

#[tokio::test]
async fn draw_applies_difficulty_filter() {
    // Arrange
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let category = unique_category("Sql");

    seed_question(&pool, &category, "easy", "active", 0).await;
    seed_question(&pool, &category, "easy", "active", 0).await;
    seed_question(&pool, &category, "hard", "active", 0).await;

    // Act
    let body: serde_json::Value = client
        .get(format!(
            "{}/api/quiz/test/{}?limit=10&difficulty=easy",
            address, category
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Assert: eligible pool is 2 < limit, so exactly the 2 easy questions
    assert_eq!(body["count"], 2);
    for question in body["data"].as_array().unwrap() {
        assert_eq!(question["difficulty"], "easy");
    }
}

#[tokio::test]
async fn draw_from_empty_pool_is_success_not_error() {
    // Arrange
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let category = unique_category("Ghost");

    // Only an easy question exists; asking for hard yields nothing.
    seed_question(&pool, &category, "easy", "active", 0).await;

    // Act: unknown category
    let response = client
        .get(format!("{}/api/quiz/test/{}", address, unique_category("Nothing")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // Act: known category, impossible difficulty
    let body: serde_json::Value = client
        .get(format!(
            "{}/api/quiz/test/{}?difficulty=hard",
            address, category
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn draw_excludes_inactive_questions() {
    // Arrange
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let category = unique_category("Retired");

    seed_question(&pool, &category, "medium", "inactive", 0).await;
    seed_question(&pool, &category, "medium", "inactive", 0).await;

    // Act
    let body: serde_json::Value = client
        .get(format!("{}/api/quiz/test/{}?limit=10", address, category))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Assert
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn submit_scores_batch_and_keeps_order() {
    // Arrange
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let category = unique_category("Score");

    let first = seed_question(&pool, &category, "easy", "active", 0).await;
    let second = seed_question(&pool, &category, "easy", "active", 1).await;

    // Act: one right, one wrong
    let response = client
        .post(format!("{}/api/quiz/submit", address))
        .json(&serde_json::json!({
            "answers": [
                { "questionId": first, "selectedAnswer": 0 },
                { "questionId": second, "selectedAnswer": 3 }
            ]
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let data = &body["data"];

    assert_eq!(data["total"], 2);
    assert_eq!(data["correct"], 1);
    assert_eq!(data["wrong"], 1);
    assert_eq!(data["percentage"], 50);

    let results = data["results"].as_array().unwrap();
    assert_eq!(results[0]["questionId"], first);
    assert_eq!(results[0]["correct"], true);
    assert_eq!(results[0]["explanation"], "Option explained.");
    assert_eq!(results[1]["questionId"], second);
    assert_eq!(results[1]["correct"], false);
    assert_eq!(results[1]["correctAnswer"], 1);
    assert_eq!(results[1]["selectedAnswer"], 3);
}

#[tokio::test]
async fn submit_with_unknown_id_does_not_abort_batch() {
    // Arrange
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let category = unique_category("Mixed");

    let real = seed_question(&pool, &category, "medium", "active", 2).await;

    // Act
    let response = client
        .post(format!("{}/api/quiz/submit", address))
        .json(&serde_json::json!({
            "answers": [
                { "questionId": real, "selectedAnswer": 2 },
                { "questionId": 9_999_999_999i64, "selectedAnswer": 0 }
            ]
        }))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let data = &body["data"];

    assert_eq!(data["total"], 2);
    assert_eq!(data["correct"], 1);

    let fake = &data["results"].as_array().unwrap()[1];
    assert_eq!(fake["correct"], false);
    // The answer key is withheld for ids that resolve to nothing.
    assert!(!fake.as_object().unwrap().contains_key("correctAnswer"));
}

#[tokio::test]
async fn submit_unanswered_sentinel_counts_wrong() {
    // Arrange
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let category = unique_category("Skipped");

    let id = seed_question(&pool, &category, "easy", "active", 0).await;

    // Act: the frontend sends -1 for skipped questions
    let body: serde_json::Value = client
        .post(format!("{}/api/quiz/submit", address))
        .json(&serde_json::json!({
            "answers": [{ "questionId": id, "selectedAnswer": -1 }]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["data"]["correct"], 0);
    assert_eq!(body["data"]["percentage"], 0);

    // Act: omitting the field entirely behaves the same
    let body: serde_json::Value = client
        .post(format!("{}/api/quiz/submit", address))
        .json(&serde_json::json!({
            "answers": [{ "questionId": id }]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["data"]["results"][0]["correct"], false);
}

#[tokio::test]
async fn submit_rejects_missing_or_empty_answers() {
    // Arrange
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    // Act: empty list
    let response = client
        .post(format!("{}/api/quiz/submit", address))
        .json(&serde_json::json!({ "answers": [] }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);

    // Act: field missing entirely
    let response = client
        .post(format!("{}/api/quiz/submit", address))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);

    // Act: not a list
    let response = client
        .post(format!("{}/api/quiz/submit", address))
        .json(&serde_json::json!({ "answers": "first one" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn practice_listing_returns_active_questions_only() {
    // Arrange
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let category = unique_category("Practice");

    seed_question(&pool, &category, "easy", "active", 0).await;
    seed_question(&pool, &category, "easy", "inactive", 0).await;

    // Act
    let body: serde_json::Value = client
        .get(format!("{}/api/quiz?category={}", address, category))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Assert: practice mode shows the answer key, but only for active rows
    assert_eq!(body["count"], 1);
    let question = &body["data"][0];
    assert_eq!(question["status"], "active");
    assert_eq!(question["correctAnswer"], 0);
}
