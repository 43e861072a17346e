// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::{AppError, conflict_on_unique},
    models::user::{CreateUserRequest, User},
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it. The user starts with
/// the default zero-cost color and an empty wallet, created in the same
/// transaction. Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let mut tx = pool.begin().await?;

    let default_color: Option<i64> =
        sqlx::query_scalar("SELECT id FROM colors WHERE cost = 0 ORDER BY id LIMIT 1")
            .fetch_optional(&mut *tx)
            .await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password, color_id)
        VALUES (?, ?, ?)
        RETURNING id, username, password, role, color_id, created_at
        "#,
    )
    .bind(&payload.username)
    .bind(&hashed_password)
    .bind(default_color)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        conflict_on_unique(
            e,
            &format!("Username '{}' already exists", payload.username),
        )
    })?;

    sqlx::query("INSERT INTO wallets (owner_id, total_won, current_sum) VALUES (?, 0, 0)")
        .bind(user.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!("Registered user '{}' (id {})", user.username, user.id);

    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user and returns a JWT token.
///
/// Verifies the username and password against the database.
/// If valid, signs a JWT token with the user's ID and role.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password, role, color_id, created_at
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(&payload.username)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let user = user.ok_or(AppError::AuthError("User not found".to_string()))?;

    let is_valid = verify_password(&payload.password, &user.password)?;

    if !is_valid {
        return Err(AppError::AuthError("Invalid password".to_string()));
    }

    let token = sign_jwt(
        user.id,
        &user.role,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
    })))
}
