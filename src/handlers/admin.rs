// src/handlers/admin.rs
//
// Content management: themes, tests, questions and colors.
// All routes here sit behind auth_middleware + admin_middleware.

use std::sync::LazyLock;

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use regex::Regex;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use validator::Validate;

use crate::{
    config::Config,
    error::{AppError, conflict_on_unique},
    models::{
        question::CreateQuestionRequest,
        test::{CreateTestRequest, UpdateTestRequest},
        theme::{CreateThemeRequest, slugify},
        user::CreateColorRequest,
    },
    utils::jwt::Claims,
};

static HEX_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{6}$").expect("valid hex code regex"));

/// Creates a new theme. The slug is derived from the title.
pub async fn create_theme(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateThemeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let slug = slugify(&payload.title);
    if slug.is_empty() {
        return Err(AppError::BadRequest(
            "Theme title must contain at least one alphanumeric character".to_string(),
        ));
    }

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO themes (title, slug) VALUES (?, ?) RETURNING id",
    )
    .bind(&payload.title)
    .bind(&slug)
    .fetch_one(&pool)
    .await
    .map_err(|e| conflict_on_unique(e, &format!("Theme '{}' already exists", payload.title)))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({"id": id, "slug": slug})),
    ))
}

/// Deletes a theme by ID. Its tests survive with a NULL theme.
pub async fn delete_theme(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM themes WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Theme not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Creates a new test authored by the calling admin.
/// The prize must lie within the configured bounds.
pub async fn create_test(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if payload.prize < config.min_prize || payload.prize > config.max_prize {
        return Err(AppError::BadRequest(format!(
            "Prize must be between {} and {}",
            config.min_prize, config.max_prize
        )));
    }

    if let Some(theme_id) = payload.theme_id {
        sqlx::query_scalar::<_, i64>("SELECT id FROM themes WHERE id = ?")
            .bind(theme_id)
            .fetch_optional(&pool)
            .await?
            .ok_or(AppError::NotFound("Theme not found".to_string()))?;
    }

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO tests (title, theme_id, author_id, prize, percent_success)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&payload.title)
    .bind(payload.theme_id)
    .bind(claims.user_id()?)
    .bind(payload.prize)
    .bind(payload.percent_success)
    .fetch_one(&pool)
    .await
    .map_err(|e| conflict_on_unique(e, &format!("Test '{}' already exists", payload.title)))?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Updates a test by ID. Fields are optional.
pub async fn update_test(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.title.is_none()
        && payload.theme_id.is_none()
        && payload.prize.is_none()
        && payload.percent_success.is_none()
    {
        return Ok(StatusCode::OK);
    }

    if let Some(prize) = payload.prize {
        if prize < config.min_prize || prize > config.max_prize {
            return Err(AppError::BadRequest(format!(
                "Prize must be between {} and {}",
                config.min_prize, config.max_prize
            )));
        }
    }

    if let Some(percent_success) = payload.percent_success {
        if !(0..=100).contains(&percent_success) {
            return Err(AppError::BadRequest(
                "percent_success must be within 0-100".to_string(),
            ));
        }
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE tests SET ");
    let mut separated = builder.separated(", ");

    if let Some(title) = payload.title {
        separated.push("title = ");
        separated.push_bind_unseparated(title);
    }

    if let Some(theme_id) = payload.theme_id {
        separated.push("theme_id = ");
        separated.push_bind_unseparated(theme_id);
    }

    if let Some(prize) = payload.prize {
        separated.push("prize = ");
        separated.push_bind_unseparated(prize);
    }

    if let Some(percent_success) = payload.percent_success {
        separated.push("percent_success = ");
        separated.push_bind_unseparated(percent_success);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder
        .build()
        .execute(&pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Test title already exists"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Test not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes a test by ID, cascading to its questions, answers and attempts.
pub async fn delete_test(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM tests WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Test not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Creates a question with its answer options in one transaction.
/// At least one option must be marked correct.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if payload.answers.is_empty() {
        return Err(AppError::BadRequest(
            "A question needs at least one answer option".to_string(),
        ));
    }

    if !payload.answers.iter().any(|a| a.correct) {
        return Err(AppError::BadRequest(
            "At least one answer option must be marked correct".to_string(),
        ));
    }

    sqlx::query_scalar::<_, i64>("SELECT id FROM tests WHERE id = ?")
        .bind(payload.test_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Test not found".to_string()))?;

    let mut tx = pool.begin().await?;

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO questions (test_id, body_text) VALUES (?, ?) RETURNING id",
    )
    .bind(payload.test_id)
    .bind(&payload.body_text)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| conflict_on_unique(e, "Question text already exists"))?;

    for answer in &payload.answers {
        sqlx::query("INSERT INTO answers (question_id, body_text, correct) VALUES (?, ?, ?)")
            .bind(id)
            .bind(&answer.body_text)
            .bind(answer.correct)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Deletes a question by ID, cascading to its answers and slots.
pub async fn delete_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Creates a purchasable color. The hex code is six hex digits, no '#'.
pub async fn create_color(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateColorRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !HEX_CODE_RE.is_match(&payload.hex_code) {
        return Err(AppError::BadRequest(
            "hex_code must be exactly six hexadecimal digits".to_string(),
        ));
    }

    if payload.cost < 0 {
        return Err(AppError::BadRequest("Cost cannot be negative".to_string()));
    }

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO colors (hex_code, cost) VALUES (?, ?) RETURNING id",
    )
    .bind(payload.hex_code.to_uppercase())
    .bind(payload.cost)
    .fetch_one(&pool)
    .await
    .map_err(|e| conflict_on_unique(e, "Color already exists"))?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Deletes a color by ID. Users keep a NULL color afterwards.
pub async fn delete_color(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM colors WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Color not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
