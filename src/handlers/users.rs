// src/handlers/users.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::user::{Color, LeaderboardEntry, MeResponse, PurchaseResponse, User, Wallet},
    utils::jwt::Claims,
};

/// Aggregated personal page for the current user: profile, wallet balances,
/// the equipped color and the next color on offer.
pub async fn me(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password, role, color_id, created_at FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    let wallet = sqlx::query_as::<_, Wallet>(
        "SELECT id, owner_id, total_won, current_sum FROM wallets WHERE owner_id = ?",
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await?;

    let color = match user.color_id {
        Some(color_id) => {
            sqlx::query_as::<_, Color>("SELECT id, hex_code, cost FROM colors WHERE id = ?")
                .bind(color_id)
                .fetch_optional(&pool)
                .await?
        }
        None => None,
    };

    // Cheapest color more expensive than the equipped one.
    let current_cost = color.as_ref().map(|c| c.cost).unwrap_or(0);
    let next_color = sqlx::query_as::<_, Color>(
        "SELECT id, hex_code, cost FROM colors WHERE cost > ? ORDER BY cost, id LIMIT 1",
    )
    .bind(current_cost)
    .fetch_optional(&pool)
    .await?;

    Ok(Json(MeResponse {
        id: user.id,
        username: user.username,
        role: user.role,
        created_at: user.created_at,
        wallet,
        color,
        next_color,
    }))
}

/// Leaderboard: every user annotated with attempt counts, distinct tests
/// attempted and passed, ordered by lifetime coins won.
pub async fn leaderboard(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let entries = sqlx::query_as::<_, LeaderboardEntry>(
        r#"
        SELECT u.id, u.username, c.hex_code AS color,
               w.total_won, w.current_sum,
               COUNT(a.id) AS attempts,
               COUNT(DISTINCT a.test_id) AS tests_attempted,
               COUNT(DISTINCT CASE WHEN a.success THEN a.test_id END) AS tests_passed
        FROM users u
        JOIN wallets w ON w.owner_id = u.id
        LEFT JOIN colors c ON c.id = u.color_id
        LEFT JOIN attempts a ON a.subject_id = u.id
        GROUP BY u.id
        ORDER BY w.total_won DESC, u.id
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch leaderboard: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(entries))
}

/// Purchases a cosmetic color for the current user.
///
/// The debit is a single conditional UPDATE, so the wallet can never go
/// negative even under concurrent purchases. Insufficient funds is a silent
/// no-op reported as `purchased: false`, not an error.
pub async fn buy_color(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(color_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let color = sqlx::query_as::<_, Color>("SELECT id, hex_code, cost FROM colors WHERE id = ?")
        .bind(color_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Color not found".to_string()))?;

    let mut tx = pool.begin().await?;

    let debited = sqlx::query(
        "UPDATE wallets SET current_sum = current_sum - ? WHERE owner_id = ? AND current_sum >= ?",
    )
    .bind(color.cost)
    .bind(user_id)
    .bind(color.cost)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let purchased = debited == 1;
    if purchased {
        sqlx::query("UPDATE users SET color_id = ? WHERE id = ?")
            .bind(color.id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tracing::info!(
            "User {} bought color {} for {} coins",
            user_id,
            color.hex_code,
            color.cost
        );
    }

    tx.commit().await?;

    let wallet = sqlx::query_as::<_, Wallet>(
        "SELECT id, owner_id, total_won, current_sum FROM wallets WHERE owner_id = ?",
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await?;

    let color_id = sqlx::query_scalar::<_, Option<i64>>("SELECT color_id FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(&pool)
        .await?;

    Ok(Json(PurchaseResponse {
        purchased,
        current_sum: wallet.current_sum,
        color_id,
    }))
}
