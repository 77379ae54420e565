use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use diesel::SqliteConnection;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use serde::Serialize;

use crate::config::Config;
use crate::data::models::StoreError;
use crate::db::DbPool;
use crate::features::quiz::{QuestionRenderer, RendererState, TemplateQuestionRenderer};

pub mod auth;
pub mod error_responses;
pub mod learning;

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub renderer: Arc<TemplateQuestionRenderer>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn connection(
        &self,
    ) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, StoreError> {
        self.pool.get().map_err(|e| {
            log::error!("Failed to get DB connection: {}", e);
            StoreError::Pool(e)
        })
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    renderer: RendererState,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        renderer: state.renderer.state(),
    })
}

pub fn app_router(state: AppState) -> Router {
    let ml_router = Router::new()
        .route("/generate-quiz", post(learning::quiz::generate_quiz))
        .route("/generate-example", post(learning::vocabulary::generate_example))
        .route("/due-reviews", get(learning::review::due_reviews))
        .route("/create-review-schedule", post(learning::review::create_review_schedule))
        .route("/update-review-schedule", post(learning::review::update_review_schedule))
        .route("/calculate-quality", post(learning::review::calculate_quality));

    let api_router = Router::new()
        .route("/health", get(health))
        .route("/onboarding", post(learning::goals::onboarding))
        .route("/learning-goals/latest", get(learning::goals::latest_goal))
        .route("/vocabulary", get(learning::vocabulary::list_vocabulary))
        .route("/quiz/questions", get(learning::quiz::get_questions))
        .route("/quiz/sessions", post(learning::quiz::submit_session))
        .route("/statistics", get(learning::statistics::statistics))
        .nest("/ml", ml_router);

    Router::new()
        .nest("/auth", auth::auth_router())
        .nest("/api", api_router)
        .with_state(state)
}
