// tests/common/mod.rs

// Not every test binary uses every helper.
#![allow(dead_code)]

use quizcoin::{config::Config, routes, state::AppState};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// Spawns the app on a random port backed by a fresh in-memory SQLite
/// database. Returns the base URL and the pool for direct assertions.
pub async fn spawn_app() -> (String, SqlitePool) {
    // A single long-lived connection keeps the in-memory database alive for
    // the whole test.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        min_prize: 1,
        max_prize: 100,
        admin_username: None,
        admin_password: None,
    };

    let state = AppState {
        pool: pool.clone(),
        config,
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, pool)
}

/// Registers a fresh user and returns (username, token).
pub async fn register_and_login(client: &reqwest::Client, address: &str) -> (String, String) {
    let username = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);
    let password = "password123";

    let resp = client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "username": username,
            "password": password
        }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(resp.status().as_u16(), 201);

    let token = login(client, address, &username, password).await;
    (username, token)
}

pub async fn login(
    client: &reqwest::Client,
    address: &str,
    username: &str,
    password: &str,
) -> String {
    let resp = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "username": username,
            "password": password
        }))
        .send()
        .await
        .expect("Login failed")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse login json");

    resp["token"].as_str().expect("Token not found").to_string()
}

/// Registers a user, promotes it to admin directly in the database, and
/// logs in again so the token carries the admin role.
pub async fn admin_token(client: &reqwest::Client, address: &str, pool: &SqlitePool) -> String {
    let (username, _) = register_and_login(client, address).await;

    sqlx::query("UPDATE users SET role = 'admin' WHERE username = ?")
        .bind(&username)
        .execute(pool)
        .await
        .expect("Failed to promote user");

    login(client, address, &username, "password123").await
}

/// Creates a theme and returns its id.
pub async fn create_theme(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    title: &str,
) -> i64 {
    let resp = client
        .post(format!("{}/api/admin/themes", address))
        .bearer_auth(token)
        .json(&serde_json::json!({ "title": title }))
        .send()
        .await
        .expect("Create theme failed");
    assert_eq!(resp.status().as_u16(), 201);
    resp.json::<serde_json::Value>().await.unwrap()["id"]
        .as_i64()
        .unwrap()
}

/// Creates a test and returns its id.
pub async fn create_test(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    title: &str,
    theme_id: Option<i64>,
    prize: i64,
    percent_success: i64,
) -> i64 {
    let resp = client
        .post(format!("{}/api/admin/tests", address))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "title": title,
            "theme_id": theme_id,
            "prize": prize,
            "percent_success": percent_success
        }))
        .send()
        .await
        .expect("Create test failed");
    assert_eq!(resp.status().as_u16(), 201);
    resp.json::<serde_json::Value>().await.unwrap()["id"]
        .as_i64()
        .unwrap()
}

/// Creates a two-option question whose first option is the correct one.
pub async fn create_question(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    test_id: i64,
    body_text: &str,
) -> i64 {
    let resp = client
        .post(format!("{}/api/admin/questions", address))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "test_id": test_id,
            "body_text": body_text,
            "answers": [
                { "body_text": format!("{} - right", body_text), "correct": true },
                { "body_text": format!("{} - wrong", body_text), "correct": false }
            ]
        }))
        .send()
        .await
        .expect("Create question failed");
    assert_eq!(resp.status().as_u16(), 201);
    resp.json::<serde_json::Value>().await.unwrap()["id"]
        .as_i64()
        .unwrap()
}

/// GETs the attempt endpoint and returns the JSON body.
pub async fn get_attempt(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    test_id: i64,
) -> serde_json::Value {
    client
        .get(format!("{}/api/tests/{}/attempt", address, test_id))
        .bearer_auth(token)
        .send()
        .await
        .expect("Attempt GET failed")
        .json()
        .await
        .expect("Failed to parse attempt json")
}

/// Answers the currently pending question, picking the correct option when
/// `answer_correctly` is set (options are distinguished by body text).
pub async fn answer_pending(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    test_id: i64,
    answer_correctly: bool,
) {
    let body = get_attempt(client, address, token, test_id).await;
    assert_eq!(body["status"], "question", "expected a pending question");

    let answers = body["question"]["answers"].as_array().unwrap();
    let suffix = if answer_correctly { "right" } else { "wrong" };
    let answer_id = answers
        .iter()
        .find(|a| a["body_text"].as_str().unwrap().ends_with(suffix))
        .expect("expected option not present")["id"]
        .as_i64()
        .unwrap();

    let resp = client
        .post(format!("{}/api/tests/{}/attempt", address, test_id))
        .bearer_auth(token)
        .json(&serde_json::json!({ "answer_id": answer_id }))
        .send()
        .await
        .expect("Submit failed");
    assert_eq!(resp.status().as_u16(), 200);
}

/// Reads (total_won, current_sum) for a username straight from the database.
pub async fn wallet_of(pool: &SqlitePool, username: &str) -> (i64, i64) {
    sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT w.total_won, w.current_sum
        FROM wallets w
        JOIN users u ON u.id = w.owner_id
        WHERE u.username = ?
        "#,
    )
    .bind(username)
    .fetch_one(pool)
    .await
    .expect("wallet row missing")
}
