use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{NaiveDateTime, Utc};
use diesel::{Connection, SqliteConnection};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tower_sessions::Session;
use validator::Validate;

use super::requested_level;
use crate::data::models::{
    ApiError, QuizGenerationRequest, QuizParams, QuizQuestion, QuizQuestionList, QuizSessionCreate,
    QuizSession, QuizSessionRead, StoreError,
};
use crate::data::repositories::{LearningStore, SqliteStore};
use crate::features::progression::ProgressionPolicy;
use crate::features::progression::policy::ProgressionOutcome;
use crate::features::quiz::{QuestionSubject, QuizSelectionPolicy};
use crate::handlers::AppState;
use crate::utils::require_user;

/// Next quiz batch for the logged-in learner; the level defaults to the current goal's
pub async fn get_questions(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<QuizParams>,
) -> Result<Json<QuizQuestionList>, ApiError> {
    let user_id = require_user(&session).await?;
    let limit = state.config.quiz_limit(params.limit);

    let mut conn = state.connection()?;
    let mut store = SqliteStore::new(&mut conn);

    let goal_level = match params.level {
        Some(_) => None,
        None => store.get_latest_goal(user_id)?.map(|goal| goal.level),
    };
    let level = requested_level(params.level.as_deref().or(goal_level.as_deref()), "A1")?;

    let policy = QuizSelectionPolicy::new(state.renderer.as_ref());
    let mut rng = StdRng::from_entropy();
    let questions = policy.select_batch(
        &mut store,
        user_id,
        level.as_str(),
        limit,
        Utc::now().naive_utc(),
        &mut rng,
    )?;

    Ok(Json(QuizQuestionList {
        total: questions.len(),
        questions,
    }))
}

/// Stores a finished quiz, grades its answers and advances the goal level.
pub async fn submit_session(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<QuizSessionCreate>,
) -> Result<Json<QuizSessionRead>, ApiError> {
    let user_id = require_user(&session).await?;
    payload.validate()?;
    if payload.correct_answers > payload.total_questions {
        return Err(ApiError::Validation(
            "Correct answers cannot exceed total questions".into(),
        ));
    }

    let now = Utc::now().naive_utc();
    let policy = ProgressionPolicy::new(state.config.quality_mode);

    let mut conn = state.connection()?;
    let (quiz, outcome) = record_submission(&mut conn, &policy, user_id, &payload, now)?;

    log::info!(
        "User {} finished a quiz: {}/{} correct, {} answers graded, {} skipped, {} XP",
        user_id,
        quiz.correct_answers,
        quiz.total_questions,
        outcome.graded,
        outcome.skipped,
        outcome.current_xp
    );

    Ok(Json(QuizSessionRead {
        session: quiz,
        new_level: outcome.new_level,
    }))
}

/// Records the session and applies its answers in one transaction; on any
/// failure neither the session nor a schedule change is kept.
pub fn record_submission(
    conn: &mut SqliteConnection,
    policy: &ProgressionPolicy,
    user_id: i32,
    payload: &QuizSessionCreate,
    now: NaiveDateTime,
) -> Result<(QuizSession, ProgressionOutcome), StoreError> {
    conn.transaction::<_, StoreError, _>(|conn| {
        let mut store = SqliteStore::new(conn);
        let quiz = store.record_quiz_session(user_id, payload, now)?;
        let outcome = policy.apply_quiz_result(&mut store, user_id, &payload.results, now)?;
        Ok((quiz, outcome))
    })
}

/// One question for an arbitrary word, graded later only if the word is in the vocabulary
pub async fn generate_quiz(
    State(state): State<AppState>,
    Json(request): Json<QuizGenerationRequest>,
) -> Result<Json<QuizQuestion>, ApiError> {
    request.validate()?;

    let mut conn = state.connection()?;
    let mut store = SqliteStore::new(&mut conn);
    let known = store.find_word_by_text(&request.word)?;

    let subject = QuestionSubject {
        word_id: known.as_ref().map(|w| w.id),
        translation: request
            .translation
            .or_else(|| known.map(|w| w.translation)),
        word: request.word,
        level: request.level,
        category: Some(request.category),
    };

    let policy = QuizSelectionPolicy::new(state.renderer.as_ref());
    let mut rng = StdRng::from_entropy();
    let question = policy.build_question(&mut store, 1, subject, &mut rng)?;
    Ok(Json(question))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::QuizResultDetail;
    use crate::db::test_connection;
    use crate::schema::{quiz_sessions, review_schedules, vocabulary_words};
    use chrono::NaiveDate;
    use diesel::connection::SimpleConnection;
    use diesel::prelude::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
    }

    fn connection_with_word() -> (SqliteConnection, i32) {
        let mut conn = test_connection();
        diesel::insert_into(vocabulary_words::table)
            .values((
                vocabulary_words::word.eq("apple"),
                vocabulary_words::translation.eq("elma"),
                vocabulary_words::level.eq("A1"),
                vocabulary_words::created_at.eq(now()),
            ))
            .execute(&mut conn)
            .unwrap();
        let word_id = vocabulary_words::table
            .select(vocabulary_words::id)
            .first(&mut conn)
            .unwrap();
        (conn, word_id)
    }

    fn payload(word_id: i32) -> QuizSessionCreate {
        QuizSessionCreate {
            score: 100.0,
            total_questions: 1,
            correct_answers: 1,
            category_breakdown: None,
            results: vec![QuizResultDetail {
                word_id: Some(word_id),
                word: "apple".to_string(),
                is_correct: true,
                time_taken_seconds: None,
            }],
        }
    }

    fn row_counts(conn: &mut SqliteConnection) -> (i64, i64) {
        let sessions = quiz_sessions::table.count().get_result(conn).unwrap();
        let schedules = review_schedules::table.count().get_result(conn).unwrap();
        (sessions, schedules)
    }

    #[test]
    fn test_submission_stores_session_and_schedule() {
        let (mut conn, word_id) = connection_with_word();

        let (quiz, outcome) =
            record_submission(&mut conn, &ProgressionPolicy::default(), 1, &payload(word_id), now()).unwrap();

        assert_eq!(quiz.correct_answers, 1);
        assert_eq!(outcome.graded, 1);
        assert_eq!(outcome.current_xp, 1);
        assert_eq!(row_counts(&mut conn), (1, 1));
    }

    #[test]
    fn test_failed_submission_leaves_nothing_behind() {
        let (mut conn, word_id) = connection_with_word();
        // The goal lookup runs after the session insert and the grading
        conn.batch_execute("DROP TABLE learning_goals;").unwrap();

        let result = record_submission(&mut conn, &ProgressionPolicy::default(), 1, &payload(word_id), now());

        assert!(result.is_err());
        assert_eq!(row_counts(&mut conn), (0, 0));
    }
}
