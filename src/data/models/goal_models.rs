use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::features::progression::CefrLevel;
use crate::schema::learning_goals;

/// A learner's goal; the most recently created one is the current goal
#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Selectable)]
#[diesel(table_name = learning_goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LearningGoal {
    pub id: i32,
    pub user_id: i32,
    pub target_language: String,
    pub level: String,
    pub daily_minutes: i32,
    pub goal_type: String,
    pub focus_topics: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = learning_goals)]
pub struct NewLearningGoal<'a> {
    pub user_id: i32,
    pub target_language: &'a str,
    pub level: &'a str,
    pub daily_minutes: i32,
    pub goal_type: &'a str,
    pub focus_topics: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

fn default_target_language() -> String {
    "en".to_string()
}

/// Onboarding payload
#[derive(Debug, Deserialize, Validate)]
pub struct LearningGoalCreate {
    #[serde(default = "default_target_language")]
    #[validate(length(min = 2, max = 8, message = "Target language must be 2-8 characters"))]
    pub target_language: String,
    pub level: CefrLevel,
    #[validate(range(min = 1, max = 1440, message = "Daily minutes must be between 1 and 1440"))]
    pub daily_minutes: i32,
    #[validate(length(min = 1, max = 32, message = "Goal type must be 1-32 characters"))]
    pub goal_type: String,
    pub focus_topics: Option<String>,
}

/// Goal plus progress towards the next level
#[derive(Debug, Serialize)]
pub struct LearningGoalRead {
    #[serde(flatten)]
    pub goal: LearningGoal,
    pub current_xp: i64,
    pub next_level: Option<CefrLevel>,
    pub next_level_xp: i64,
}
