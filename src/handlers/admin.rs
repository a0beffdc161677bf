// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder, types::Json as SqlJson};
use validator::Validate;

use crate::{
    error::AppError,
    models::question::{CreateQuestionRequest, Question, UpdateQuestionRequest},
};

/// Helper struct for checking the index-in-range invariant on update.
#[derive(sqlx::FromRow)]
struct QuestionKey {
    options: SqlJson<Vec<String>>,
    correct_answer: i32,
}

/// Query parameters for the admin question listing.
#[derive(Debug, Deserialize)]
pub struct AdminListParams {
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub status: Option<String>,
}

/// Lists questions of any status, newest first.
/// Admin only.
pub async fn list_questions(
    State(pool): State<PgPool>,
    Query(params): Query<AdminListParams>,
) -> Result<impl IntoResponse, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, category, question, options, correct_answer, explanation,
               difficulty, status, created_at
        FROM questions
        WHERE ($1::TEXT IS NULL OR category = $1)
          AND ($2::TEXT IS NULL OR difficulty = $2)
          AND ($3::TEXT IS NULL OR status = $3)
        ORDER BY created_at DESC
        "#,
    )
    .bind(params.category)
    .bind(params.difficulty)
    .bind(params.status)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list questions: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(json!({
        "success": true,
        "count": questions.len(),
        "data": questions,
    })))
}

/// Retrieves a single question by ID, including the answer key.
/// Admin only.
pub async fn get_question(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let question = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, category, question, options, correct_answer, explanation,
               difficulty, status, created_at
        FROM questions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(json!({ "success": true, "data": question })))
}

/// Creates a new quiz question.
/// Admin only.
pub async fn create_question(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    // Cross-field invariant: the answer key must index into the options.
    if payload.correct_answer < 0 || payload.correct_answer as usize >= payload.options.len() {
        return Err(AppError::BadRequest(
            "correctAnswer must be a valid index into options".to_string(),
        ));
    }

    let options_json = serde_json::to_value(&payload.options).unwrap_or_default();
    let difficulty = payload.difficulty.unwrap_or_else(|| "medium".to_string());
    let status = payload.status.unwrap_or_else(|| "active".to_string());

    let question = sqlx::query_as::<_, Question>(
        r#"
        INSERT INTO questions
        (category, question, options, correct_answer, explanation, difficulty, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, category, question, options, correct_answer, explanation,
                  difficulty, status, created_at
        "#,
    )
    .bind(payload.category)
    .bind(payload.question)
    .bind(options_json)
    .bind(payload.correct_answer)
    .bind(payload.explanation)
    .bind(difficulty)
    .bind(status)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": question })),
    ))
}

/// Updates a question by ID.
/// Admin only. Re-checks the answer-index invariant against the options
/// the question will have after the update.
pub async fn update_question(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    // Check existence and fetch the fields the invariant depends on.
    let existing = sqlx::query_as::<_, QuestionKey>(
        "SELECT options, correct_answer FROM questions WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| AppError::InternalServerError(e.to_string()))?
    .ok_or(AppError::NotFound("Question not found".to_string()))?;

    if payload.category.is_none()
        && payload.question.is_none()
        && payload.options.is_none()
        && payload.correct_answer.is_none()
        && payload.explanation.is_none()
        && payload.difficulty.is_none()
        && payload.status.is_none()
    {
        return Ok(StatusCode::OK);
    }

    let effective_options = payload.options.as_deref().unwrap_or(&existing.options.0);
    let effective_answer = payload.correct_answer.unwrap_or(existing.correct_answer);
    if effective_answer < 0 || effective_answer as usize >= effective_options.len() {
        return Err(AppError::BadRequest(
            "correctAnswer must be a valid index into options".to_string(),
        ));
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE questions SET ");
    let mut separated = builder.separated(", ");

    if let Some(category) = payload.category {
        separated.push("category = ");
        separated.push_bind_unseparated(category);
    }

    if let Some(question) = payload.question {
        separated.push("question = ");
        separated.push_bind_unseparated(question);
    }

    if let Some(options) = payload.options {
        separated.push("options = ");
        separated.push_bind_unseparated(serde_json::to_value(options).unwrap_or_default());
    }

    if let Some(correct_answer) = payload.correct_answer {
        separated.push("correct_answer = ");
        separated.push_bind_unseparated(correct_answer);
    }

    if let Some(explanation) = payload.explanation {
        separated.push("explanation = ");
        separated.push_bind_unseparated(explanation);
    }

    if let Some(difficulty) = payload.difficulty {
        separated.push("difficulty = ");
        separated.push_bind_unseparated(difficulty);
    }

    if let Some(status) = payload.status {
        separated.push("status = ");
        separated.push_bind_unseparated(status);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes a quiz question by ID.
/// Admin only.
pub async fn delete_question(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete question: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
