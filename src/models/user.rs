// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// User role: 'user' or 'admin'.
    pub role: String,

    /// Currently equipped cosmetic color.
    pub color_id: Option<i64>,

    pub created_at: Option<chrono::NaiveDateTime>,
}

/// Represents the 'wallets' table: a user's reward-coin balance.
/// `current_sum` never exceeds `total_won`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Wallet {
    pub id: i64,
    pub owner_id: i64,
    pub total_won: i64,
    pub current_sum: i64,
}

/// Represents the 'colors' table: a purchasable display color.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Color {
    pub id: i64,
    pub hex_code: String,
    pub cost: i64,
}

/// Aggregated profile data for the current user.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub created_at: Option<chrono::NaiveDateTime>,
    pub wallet: Wallet,
    pub color: Option<Color>,
    /// The next color on offer: cheapest one costing more than the current.
    pub next_color: Option<Color>,
}

/// One leaderboard row: user annotated with attempt statistics, ordered by
/// lifetime coins won.
#[derive(Debug, Serialize, FromRow)]
pub struct LeaderboardEntry {
    pub id: i64,
    pub username: String,
    pub color: Option<String>,
    pub total_won: i64,
    pub current_sum: i64,
    pub attempts: i64,
    pub tests_attempted: i64,
    pub tests_passed: i64,
}

/// Outcome of a cosmetic purchase. `purchased` is false when the wallet
/// could not cover the cost; that is not an error.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub purchased: bool,
    pub current_sum: i64,
    pub color_id: Option<i64>,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for creating a purchasable color.
#[derive(Debug, Deserialize)]
pub struct CreateColorRequest {
    pub hex_code: String,
    pub cost: i64,
}
