use axum::{Json, extract::State};
use chrono::Utc;
use diesel::Connection;
use tower_sessions::Session;
use validator::Validate;

use crate::data::models::{
    ApiError, CalculateQualityRequest, CreateReviewScheduleRequest, DueReviewItem,
    QualityResponse, ReviewScheduleResponse, UpdateReviewScheduleRequest,
};
use crate::data::repositories::{LearningStore, SqliteStore};
use crate::features::progression::ProgressionPolicy;
use crate::features::srs::{
    DEFAULT_AVG_TIME_SECONDS, SpacedRepetitionEngine, describe_quality, estimate_quality,
};
use crate::handlers::AppState;
use crate::utils::require_user;

const DUE_REVIEW_LIMIT: usize = 50;

pub async fn due_reviews(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<DueReviewItem>>, ApiError> {
    let user_id = require_user(&session).await?;

    let mut conn = state.connection()?;
    let items = SqliteStore::new(&mut conn).due_reviews(user_id, Utc::now().naive_utc(), DUE_REVIEW_LIMIT)?;
    Ok(Json(items))
}

/// Starts tracking a word; an existing schedule is returned untouched
pub async fn create_review_schedule(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CreateReviewScheduleRequest>,
) -> Result<Json<ReviewScheduleResponse>, ApiError> {
    let user_id = require_user(&session).await?;
    let word_id = request.word_id;

    let mut conn = state.connection()?;
    let schedule = conn.transaction::<_, ApiError, _>(|conn| {
        let mut store = SqliteStore::new(conn);
        if !store.word_exists(word_id)? {
            return Err(ApiError::NotFound(format!("Word {} not found", word_id)));
        }
        if let Some(existing) = store.get_schedule_state(user_id, word_id)? {
            return Ok(existing);
        }

        let initial = SpacedRepetitionEngine::new().create_initial_schedule();
        store.upsert_schedule_state(user_id, word_id, &initial)?;
        Ok(initial)
    })?;

    Ok(Json(ReviewScheduleResponse::new(user_id, word_id, &schedule)))
}

/// Grades one word with an explicit quality, creating its schedule if needed
pub async fn update_review_schedule(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<UpdateReviewScheduleRequest>,
) -> Result<Json<ReviewScheduleResponse>, ApiError> {
    let user_id = require_user(&session).await?;
    request.validate()?;

    let policy = ProgressionPolicy::new(state.config.quality_mode);
    let now = Utc::now().naive_utc();

    let mut conn = state.connection()?;
    let schedule = conn.transaction::<_, ApiError, _>(|conn| {
        let mut store = SqliteStore::new(conn);
        if !store.word_exists(request.word_id)? {
            return Err(ApiError::NotFound(format!("Word {} not found", request.word_id)));
        }
        let graded = policy.grade_answer(&mut store, user_id, request.word_id, request.quality, now)?;
        Ok(graded)
    })?;

    Ok(Json(ReviewScheduleResponse::new(user_id, request.word_id, &schedule)))
}

pub async fn calculate_quality(
    Json(request): Json<CalculateQualityRequest>,
) -> Result<Json<QualityResponse>, ApiError> {
    request.validate()?;

    let quality = estimate_quality(
        request.was_correct,
        request.time_taken_seconds,
        request.avg_time_seconds.unwrap_or(DEFAULT_AVG_TIME_SECONDS),
    );
    Ok(Json(QualityResponse {
        quality,
        description: describe_quality(quality),
    }))
}
