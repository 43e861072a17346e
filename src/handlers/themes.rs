// src/handlers/themes.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        test::TestListItem,
        theme::{Theme, ThemeListItem},
    },
};

/// Lists all themes with the number of tests each one groups.
pub async fn list_themes(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let themes = sqlx::query_as::<_, ThemeListItem>(
        r#"
        SELECT th.id, th.title, th.slug,
               (SELECT COUNT(*) FROM tests t WHERE t.theme_id = th.id) AS test_count
        FROM themes th
        ORDER BY th.title
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(themes))
}

/// Retrieves a single theme by slug, together with its tests.
pub async fn get_theme(
    State(pool): State<SqlitePool>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let theme = sqlx::query_as::<_, Theme>("SELECT id, title, slug FROM themes WHERE slug = ?")
        .bind(&slug)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Theme not found".to_string()))?;

    let tests = sqlx::query_as::<_, TestListItem>(
        r#"
        SELECT t.id, t.title, th.title AS theme_title, t.prize, t.percent_success,
               (SELECT COUNT(*) FROM questions q WHERE q.test_id = t.id) AS question_count,
               t.date_creation
        FROM tests t
        LEFT JOIN themes th ON th.id = t.theme_id
        WHERE t.theme_id = ?
        ORDER BY t.date_creation DESC, t.id DESC
        "#,
    )
    .bind(theme.id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({
        "theme": theme,
        "tests": tests,
    })))
}
