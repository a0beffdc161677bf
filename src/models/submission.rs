// src/models/submission.rs

use serde::{Deserialize, Serialize};

/// DTO for submitting a quiz attempt.
///
/// `answers` is kept as raw JSON; the handler validates the shape so that
/// a missing, empty, or malformed list surfaces as a 400 in the API
/// envelope instead of a bare extractor rejection.
#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    pub answers: Option<serde_json::Value>,
}

/// One submitted answer.
///
/// `selected_answer` is `None` (or any index that matches no option,
/// the frontend sends -1) when the question was left unanswered.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    pub question_id: i64,
    #[serde(default)]
    pub selected_answer: Option<i32>,
}

/// Per-question verdict returned by the scorer, in submission order.
/// `correct_answer` and `explanation` are omitted when the submitted id
/// did not resolve to a known question.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerVerdict {
    pub question_id: i64,
    pub correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<i32>,
    pub selected_answer: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Aggregate result of one scored submission.
#[derive(Debug, Serialize)]
pub struct QuizResult {
    pub total: usize,
    pub correct: usize,
    pub wrong: usize,
    pub percentage: i64,
    pub results: Vec<AnswerVerdict>,
}
