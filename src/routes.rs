// src/routes.rs

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::AppError,
    handlers::{admin, auth, tests, themes, users},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

async fn fallback_404() -> AppError {
    AppError::NotFound("Resource not found".to_string())
}

async fn index() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, themes, tests, users, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let theme_routes = Router::new()
        .route("/", get(themes::list_themes))
        .route("/{slug}", get(themes::get_theme));

    let test_routes = Router::new()
        .route("/", get(tests::list_tests))
        // Taking a test requires authentication
        .merge(
            Router::new()
                .route(
                    "/{id}/attempt",
                    get(tests::get_attempt).post(tests::submit_answer),
                )
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let user_routes = Router::new()
        .route("/", get(users::leaderboard))
        .merge(
            Router::new()
                .route("/me", get(users::me))
                .route("/color/{id}", post(users::buy_color))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let admin_routes = Router::new()
        .route("/themes", post(admin::create_theme))
        .route("/themes/{id}", delete(admin::delete_theme))
        .route("/tests", post(admin::create_test))
        .route(
            "/tests/{id}",
            put(admin::update_test).delete(admin::delete_test),
        )
        .route("/questions", post(admin::create_question))
        .route("/questions/{id}", delete(admin::delete_question))
        .route("/colors", post(admin::create_color))
        .route("/colors/{id}", delete(admin::delete_color))
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(index))
        .nest("/api/auth", auth_routes)
        .nest("/api/themes", theme_routes)
        .nest("/api/tests", test_routes)
        .nest("/api/users", user_routes)
        .nest("/api/admin", admin_routes)
        .fallback(fallback_404)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
