use chrono::NaiveDateTime;
use diesel::{AsChangeset, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::review_schedules;

/// Scheduling state of one (user, word) pair.
///
/// `easiness_factor` never goes below 1.3 and `repetitions` counts
/// consecutive successful recalls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleState {
    pub next_review: NaiveDateTime,
    pub interval: i32,
    pub repetitions: i32,
    pub easiness_factor: f64,
    pub last_reviewed: NaiveDateTime,
}

/// Represents a row of `review_schedules`
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = review_schedules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReviewSchedule {
    pub id: i32,
    pub user_id: i32,
    pub word_id: i32,
    pub next_review: NaiveDateTime,
    pub interval: i32,
    pub repetitions: i32,
    pub easiness_factor: f64,
    pub last_reviewed: NaiveDateTime,
}

impl From<ReviewSchedule> for ScheduleState {
    fn from(row: ReviewSchedule) -> Self {
        ScheduleState {
            next_review: row.next_review,
            interval: row.interval,
            repetitions: row.repetitions,
            easiness_factor: row.easiness_factor,
            last_reviewed: row.last_reviewed,
        }
    }
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = review_schedules)]
pub struct NewReviewSchedule {
    pub user_id: i32,
    pub word_id: i32,
    pub next_review: NaiveDateTime,
    pub interval: i32,
    pub repetitions: i32,
    pub easiness_factor: f64,
    pub last_reviewed: NaiveDateTime,
}

impl NewReviewSchedule {
    pub fn new(user_id: i32, word_id: i32, state: &ScheduleState) -> Self {
        Self {
            user_id,
            word_id,
            next_review: state.next_review,
            interval: state.interval,
            repetitions: state.repetitions,
            easiness_factor: state.easiness_factor,
            last_reviewed: state.last_reviewed,
        }
    }
}

/// A due schedule joined with its word
#[derive(Debug, Serialize, Queryable)]
pub struct DueReviewItem {
    pub word_id: i32,
    pub word: String,
    pub translation: String,
    pub next_review: NaiveDateTime,
    pub interval: i32,
    pub repetitions: i32,
}

#[derive(Debug, Serialize)]
pub struct ReviewScheduleResponse {
    pub word_id: i32,
    pub user_id: i32,
    pub next_review: NaiveDateTime,
    pub interval: i32,
    pub repetitions: i32,
    pub easiness_factor: f64,
}

impl ReviewScheduleResponse {
    pub fn new(user_id: i32, word_id: i32, state: &ScheduleState) -> Self {
        Self {
            word_id,
            user_id,
            next_review: state.next_review,
            interval: state.interval,
            repetitions: state.repetitions,
            easiness_factor: state.easiness_factor,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewScheduleRequest {
    pub word_id: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReviewScheduleRequest {
    pub word_id: i32,
    #[validate(range(min = 0, max = 5, message = "Quality must be between 0 and 5"))]
    pub quality: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CalculateQualityRequest {
    pub was_correct: bool,
    #[validate(range(min = 0.0, message = "Time taken cannot be negative"))]
    pub time_taken_seconds: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "Average time must be positive"))]
    pub avg_time_seconds: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct QualityResponse {
    pub quality: i32,
    pub description: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(time_taken_seconds: Option<f64>, avg_time_seconds: Option<f64>) -> CalculateQualityRequest {
        CalculateQualityRequest {
            was_correct: true,
            time_taken_seconds,
            avg_time_seconds,
        }
    }

    #[test]
    fn test_quality_request_rejects_negative_time() {
        assert!(request(Some(-1.0), None).validate().is_err());
        assert!(request(Some(-0.5), Some(10.0)).validate().is_err());
    }

    #[test]
    fn test_quality_request_accepts_zero_or_missing_time() {
        assert!(request(Some(0.0), None).validate().is_ok());
        assert!(request(None, Some(8.0)).validate().is_ok());
        assert!(request(Some(3.5), Some(8.0)).validate().is_ok());
        assert!(request(Some(3.5), Some(0.0)).validate().is_err());
    }
}
