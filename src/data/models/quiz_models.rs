use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::progression::CefrLevel;
use crate::schema::quiz_sessions;

/// One completed quiz, append-only
#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Selectable)]
#[diesel(table_name = quiz_sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuizSession {
    pub id: i32,
    pub user_id: i32,
    pub score: f64,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub category_breakdown: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = quiz_sessions)]
pub struct NewQuizSession<'a> {
    pub user_id: i32,
    pub score: f64,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub category_breakdown: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

/// Outcome of one answered question
#[derive(Debug, Clone, Deserialize)]
pub struct QuizResultDetail {
    pub word_id: Option<i32>,
    #[serde(default)]
    pub word: String,
    pub is_correct: bool,
    #[serde(default)]
    pub time_taken_seconds: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct QuizSessionCreate {
    #[validate(range(min = 0.0, max = 100.0, message = "Score must be between 0 and 100"))]
    pub score: f64,
    #[validate(range(min = 0, message = "Total questions must not be negative"))]
    pub total_questions: i32,
    #[validate(range(min = 0, message = "Correct answers must not be negative"))]
    pub correct_answers: i32,
    pub category_breakdown: Option<String>,
    #[serde(default)]
    pub results: Vec<QuizResultDetail>,
}

#[derive(Debug, Serialize)]
pub struct QuizSessionRead {
    #[serde(flatten)]
    pub session: QuizSession,
    pub new_level: Option<CefrLevel>,
}

/// A rendered multiple choice question
#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestion {
    pub id: usize,
    /// Underlying word, needed to grade the answer later
    pub word_id: Option<i32>,
    pub question_text: String,
    pub question_type: &'static str,
    pub correct_answer: String,
    pub options: Vec<String>,
    pub level: String,
    pub category: Option<String>,
    pub explanation: String,
}

#[derive(Debug, Serialize)]
pub struct QuizQuestionList {
    pub questions: Vec<QuizQuestion>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct QuizParams {
    pub level: Option<String>,
    pub limit: Option<usize>,
}

fn default_category() -> String {
    "vocabulary".to_string()
}

#[derive(Debug, Deserialize, Validate)]
pub struct QuizGenerationRequest {
    #[validate(length(min = 1, message = "Word must not be empty"))]
    pub word: String,
    pub level: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub translation: Option<String>,
}

/// Aggregates over all quiz sessions of a user
#[derive(Debug, Default, PartialEq)]
pub struct QuizStatistics {
    pub total_quizzes: i64,
    pub average_score: f64,
    pub total_correct: i64,
    pub total_questions: i64,
}

#[derive(Debug, Serialize)]
pub struct RecentQuizItem {
    pub date: NaiveDateTime,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub total_quizzes: i64,
    pub average_score: f64,
    pub total_correct: i64,
    pub total_questions: i64,
    pub recent_quizzes: Vec<RecentQuizItem>,
}
