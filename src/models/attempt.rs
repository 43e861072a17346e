// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::question::PublicQuestion;

/// Represents the 'attempts' table: one user's single pass through a test.
/// `result` stays NULL until every slot is answered and the attempt is
/// finalized.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Attempt {
    pub id: i64,
    pub subject_id: i64,
    pub test_id: i64,
    pub result: Option<f64>,
    pub success: bool,
    pub started_at: Option<chrono::NaiveDateTime>,
}

/// Represents one 'attempt_slots' row: the placeholder tracking which answer
/// (if any) was picked for a question during an attempt.
#[derive(Debug, Clone, FromRow)]
pub struct AttemptSlot {
    pub id: i64,
    pub attempt_id: i64,
    pub question_id: i64,
    pub answer_id: Option<i64>,
}

/// Correct/total tallies aggregated over an attempt's slots.
#[derive(Debug, FromRow)]
pub struct SlotTally {
    pub total: i64,
    pub correct: i64,
}

/// Response for GET on the attempt endpoint.
///
/// While questions remain, `question` is set; once the attempt is finalized,
/// `result`, `success` and `prize_awarded` are.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptResponse {
    Question {
        attempt_id: i64,
        question: PublicQuestion,
        answered: i64,
        total: i64,
    },
    Finished {
        attempt_id: i64,
        result: f64,
        success: bool,
        prize_awarded: i64,
    },
}

/// DTO for submitting an answer to the pending question.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer_id: i64,
}

/// Percentage of correct slots, 0 when the attempt has no slots at all.
pub fn score_percent(correct: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    correct as f64 * 100.0 / total as f64
}
