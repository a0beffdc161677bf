// src/handlers/quiz.rs

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    config::DEFAULT_TEST_LIMIT,
    error::AppError,
    models::{
        question::{CategorySummary, PublicQuestion, Question},
        submission::{AnswerEntry, AnswerVerdict, QuizResult, SubmitQuizRequest},
    },
};

/// Helper struct for fetching answer keys from the database.
#[derive(sqlx::FromRow)]
struct AnswerKey {
    id: i64,
    correct_answer: i32,
    explanation: Option<String>,
}

/// Query parameters for the public practice listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

/// Lists active questions for practice mode, optionally filtered by
/// category and difficulty. Practice mode reveals answers and explanations
/// immediately, so the full question rows are returned.
pub async fn list_questions(
    State(pool): State<PgPool>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, category, question, options, correct_answer, explanation,
               difficulty, status, created_at
        FROM questions
        WHERE status = 'active'
          AND ($1::TEXT IS NULL OR category = $1)
          AND ($2::TEXT IS NULL OR difficulty = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(params.category)
    .bind(params.difficulty)
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({
        "success": true,
        "count": questions.len(),
        "data": questions,
    })))
}

/// Summarizes the question bank into selectable topics.
///
/// Groups active questions by category and counts them per difficulty.
/// An empty bank yields an empty list, not an error.
pub async fn get_categories(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let categories = sqlx::query_as::<_, CategorySummary>(
        r#"
        SELECT
            category AS name,
            COUNT(*) AS count,
            COUNT(*) FILTER (WHERE difficulty = 'easy') AS easy,
            COUNT(*) FILTER (WHERE difficulty = 'medium') AS medium,
            COUNT(*) FILTER (WHERE difficulty = 'hard') AS hard
        FROM questions
        WHERE status = 'active'
        GROUP BY category
        ORDER BY category ASC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to aggregate categories: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(json!({
        "success": true,
        "data": categories,
    })))
}

/// Query parameters for a test draw.
#[derive(Debug, Deserialize)]
pub struct TestParams {
    pub limit: Option<i64>,
    pub difficulty: Option<String>,
}

/// Draws a randomized set of test questions for one category.
///
/// * Only active questions are eligible; category match is exact.
/// * Returns `min(limit, eligible)` questions, sampled uniformly without
///   replacement by the database PRNG (`ORDER BY RANDOM()`).
/// * The projection has no answer-key column, so the correct option can
///   never reach the client before submission.
/// * An empty eligible pool is a `count: 0` success, not an error.
pub async fn get_test_questions(
    State(pool): State<PgPool>,
    Path(category): Path<String>,
    Query(params): Query<TestParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_TEST_LIMIT).max(0);

    let questions = sqlx::query_as::<_, PublicQuestion>(
        r#"
        SELECT id, category, question, options, difficulty
        FROM questions
        WHERE status = 'active'
          AND category = $1
          AND ($2::TEXT IS NULL OR difficulty = $2)
        ORDER BY RANDOM()
        LIMIT $3
        "#,
    )
    .bind(&category)
    .bind(params.difficulty)
    .bind(limit)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to draw test questions: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(json!({
        "success": true,
        "count": questions.len(),
        "data": questions,
    })))
}

/// Scores a submitted answer batch against the question bank.
///
/// * Rejects a missing or empty `answers` list before touching the store.
/// * Resolves all referenced questions in one batch lookup.
/// * An id that resolves to no question counts as wrong for that entry
///   only; it never fails the whole submission.
/// * Nothing is persisted; resubmitting the same batch scores identically.
pub async fn submit_quiz(
    State(pool): State<PgPool>,
    Json(req): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let answers: Vec<AnswerEntry> = match req.answers {
        Some(list) => serde_json::from_value(list)
            .map_err(|_| AppError::BadRequest("Please provide answers".to_string()))?,
        None => Vec::new(),
    };

    if answers.is_empty() {
        return Err(AppError::BadRequest("Please provide answers".to_string()));
    }

    let question_ids: Vec<i64> = answers.iter().map(|a| a.question_id).collect();

    // Use QueryBuilder for dynamic IN clause
    let mut query_builder = QueryBuilder::<Postgres>::new(
        "SELECT id, correct_answer, explanation FROM questions WHERE id IN (",
    );

    let mut separated = query_builder.separated(",");
    for id in &question_ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");

    let answer_keys: Vec<AnswerKey> = query_builder
        .build_query_as()
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch answer keys: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    let key_map: HashMap<i64, AnswerKey> =
        answer_keys.into_iter().map(|k| (k.id, k)).collect();

    let result = score_answers(&answers, &key_map);

    Ok(Json(json!({
        "success": true,
        "data": result,
    })))
}

/// Resolves each submitted answer against the answer keys and computes
/// the aggregate score. Verdicts keep the submission order.
fn score_answers(answers: &[AnswerEntry], keys: &HashMap<i64, AnswerKey>) -> QuizResult {
    let mut correct = 0;

    let results: Vec<AnswerVerdict> = answers
        .iter()
        .map(|answer| match keys.get(&answer.question_id) {
            Some(key) => {
                let is_correct = answer.selected_answer == Some(key.correct_answer);
                if is_correct {
                    correct += 1;
                }
                AnswerVerdict {
                    question_id: answer.question_id,
                    correct: is_correct,
                    correct_answer: Some(key.correct_answer),
                    selected_answer: answer.selected_answer,
                    explanation: Some(key.explanation.clone().unwrap_or_default()),
                }
            }
            // Unknown id: counted wrong, answer key withheld.
            None => AnswerVerdict {
                question_id: answer.question_id,
                correct: false,
                correct_answer: None,
                selected_answer: answer.selected_answer,
                explanation: None,
            },
        })
        .collect();

    let total = answers.len();
    let percentage = ((correct as f64 / total as f64) * 100.0).round() as i64;

    QuizResult {
        total,
        correct,
        wrong: total - correct,
        percentage,
        results,
    }
}
