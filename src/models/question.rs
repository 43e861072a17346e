// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub test_id: i64,
    pub body_text: String,
}

/// Answer option as shown to a test taker: the `correct` flag is never
/// serialized on this shape.
#[derive(Debug, Serialize, FromRow)]
pub struct PublicAnswer {
    pub id: i64,
    pub body_text: String,
}

/// Question plus its selectable answers, as served during an attempt.
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub body_text: String,
    pub answers: Vec<PublicAnswer>,
}

/// DTO for one answer option when creating a question.
#[derive(Debug, Deserialize)]
pub struct CreateAnswer {
    pub body_text: String,
    pub correct: bool,
}

/// DTO for creating a question together with its answer options.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    pub test_id: i64,
    #[validate(length(
        min = 1,
        max = 512,
        message = "Question text length must be between 1 and 512 characters."
    ))]
    pub body_text: String,
    pub answers: Vec<CreateAnswer>,
}
