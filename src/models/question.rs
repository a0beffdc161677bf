// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

pub const DIFFICULTIES: [&str; 3] = ["easy", "medium", "hard"];
pub const STATUSES: [&str; 2] = ["active", "inactive"];

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,

    /// Free-text topic label (e.g., "Python", "Aptitude").
    /// Categories are derived from this column, not stored separately.
    pub category: String,

    /// The prompt shown to a test-taker.
    pub question: String,

    /// Ordered list of answer options.
    /// Stored as a JSON array in the database; order is significant because
    /// answers reference options by index.
    pub options: Json<Vec<String>>,

    /// Zero-based index of the correct option.
    pub correct_answer: i32,

    /// Explanation shown after scoring.
    pub explanation: Option<String>,

    /// One of 'easy', 'medium', 'hard'.
    pub difficulty: String,

    /// One of 'active', 'inactive'. Only active questions are eligible
    /// for public listing and test draws.
    pub status: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for sending a test question to the client.
/// Excludes `correct_answer` and `explanation` so a draw can never leak
/// the answer key.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: i64,
    pub category: String,
    pub question: String,
    pub options: Json<Vec<String>>,
    pub difficulty: String,
}

/// One row of the category index: per-category question counts broken down
/// by difficulty. Active questions only.
#[derive(Debug, Serialize, FromRow)]
pub struct CategorySummary {
    pub name: String,
    pub count: i64,
    pub easy: i64,
    pub medium: i64,
    pub hard: i64,
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 2000))]
    pub question: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    pub correct_answer: i32,
    #[validate(length(max = 2000))]
    pub explanation: Option<String>,
    #[validate(custom(function = validate_difficulty))]
    pub difficulty: Option<String>,
    #[validate(custom(function = validate_status))]
    pub status: Option<String>,
}

/// DTO for updating a question. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub question: Option<String>,
    #[validate(custom(function = validate_options))]
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<i32>,
    #[validate(length(max = 2000))]
    pub explanation: Option<String>,
    #[validate(custom(function = validate_difficulty))]
    pub difficulty: Option<String>,
    #[validate(custom(function = validate_status))]
    pub status: Option<String>,
}

/// A question needs 2 to 6 options before it is usable in a session.
fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.len() < 2 || options.len() > 6 {
        return Err(validator::ValidationError::new("options_count_out_of_range"));
    }
    for opt in options {
        if opt.is_empty() || opt.len() > 500 {
            return Err(validator::ValidationError::new("option_length_invalid"));
        }
    }
    Ok(())
}

fn validate_difficulty(difficulty: &String) -> Result<(), validator::ValidationError> {
    if !DIFFICULTIES.contains(&difficulty.as_str()) {
        return Err(validator::ValidationError::new("unknown_difficulty"));
    }
    Ok(())
}

fn validate_status(status: &String) -> Result<(), validator::ValidationError> {
    if !STATUSES.contains(&status.as_str()) {
        return Err(validator::ValidationError::new("unknown_status"));
    }
    Ok(())
}
