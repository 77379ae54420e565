use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use tower_sessions::Session;
use validator::Validate;

use crate::data::models::{ApiError, LearningGoal, LearningGoalCreate, LearningGoalRead};
use crate::data::repositories::{LearningStore, SqliteStore};
use crate::features::progression::level_progress;
use crate::handlers::AppState;
use crate::utils::require_user;

pub async fn onboarding(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LearningGoalCreate>,
) -> Result<(StatusCode, Json<LearningGoal>), ApiError> {
    let user_id = require_user(&session).await?;
    payload.validate()?;

    let mut conn = state.connection()?;
    let goal = SqliteStore::new(&mut conn).create_goal(user_id, &payload, Utc::now().naive_utc())?;

    log::info!("User {} set a {} goal at level {}", user_id, goal.goal_type, goal.level);
    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn latest_goal(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<LearningGoalRead>, ApiError> {
    let user_id = require_user(&session).await?;

    let mut conn = state.connection()?;
    let mut store = SqliteStore::new(&mut conn);
    let goal = store
        .get_latest_goal(user_id)?
        .ok_or_else(|| ApiError::NotFound("No learning goal found".into()))?;
    let xp = store.sum_correct_answers(user_id)?;

    let progress = level_progress(&goal.level, xp);
    Ok(Json(LearningGoalRead {
        goal,
        current_xp: progress.current_xp,
        next_level: progress.next_level,
        next_level_xp: progress.next_level_xp,
    }))
}
