// src/routes.rs

use axum::{
    Json, Router,
    http::Method,
    routing::{get, post},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, quiz},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (quiz, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool, Config).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config.frontend_origin.parse::<axum::http::HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_questions))
        .route("/categories", get(quiz::get_categories))
        .route("/test/{category}", get(quiz::get_test_questions))
        .route("/submit", post(quiz::submit_quiz));

    // Authentication is deployed in front of these routes; see DESIGN.md.
    let admin_routes = Router::new()
        .route(
            "/questions",
            get(admin::list_questions).post(admin::create_question),
        )
        .route(
            "/questions/{id}",
            get(admin::get_question)
                .put(admin::update_question)
                .delete(admin::delete_question),
        );

    Router::new()
        .route("/api/health", get(health_check))
        .nest("/api/quiz", quiz_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Liveness probe.
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "message": "Quiz API is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
