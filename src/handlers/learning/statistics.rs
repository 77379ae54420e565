use axum::{Json, extract::State};
use tower_sessions::Session;

use crate::data::models::{ApiError, RecentQuizItem, StatisticsResponse};
use crate::data::repositories::SqliteStore;
use crate::handlers::AppState;
use crate::utils::require_user;

const RECENT_QUIZ_LIMIT: usize = 10;

pub async fn statistics(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<StatisticsResponse>, ApiError> {
    let user_id = require_user(&session).await?;

    let mut conn = state.connection()?;
    let mut store = SqliteStore::new(&mut conn);
    let totals = store.quiz_statistics(user_id)?;
    let recent_quizzes = store
        .recent_quiz_sessions(user_id, RECENT_QUIZ_LIMIT)?
        .into_iter()
        .map(|quiz| RecentQuizItem {
            date: quiz.created_at,
            score: quiz.score,
        })
        .collect();

    Ok(Json(StatisticsResponse {
        total_quizzes: totals.total_quizzes,
        average_score: totals.average_score,
        total_correct: totals.total_correct,
        total_questions: totals.total_questions,
        recent_quizzes,
    }))
}
