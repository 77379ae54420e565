use chrono::NaiveDateTime;
use diesel::dsl::{avg, count_star, not, sum};
use diesel::prelude::*;
use diesel::sql_types::Integer;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::data::models::{
    ContextSentence, DueReviewItem, LearningGoal, LearningGoalCreate, NewLearningGoal,
    NewQuizSession, NewReviewSchedule, QuizSession, QuizSessionCreate, QuizStatistics,
    ReviewSchedule, ScheduleState, StoreError, WordRef,
};
use crate::features::quiz::sampling::sample_without_replacement;
use crate::schema::{
    learning_goals, quiz_sessions, review_schedules, sentences, vocabulary_words, word_sentences,
};
use crate::utils::text::word_pattern;

/// Storage the learning core reads and writes.
///
/// Sampling methods return distinct items with no ordering guarantee.
/// Callers serialize fetch-modify-write sequences on the same (user, word)
/// pair, typically by running them inside one transaction.
pub trait LearningStore {
    fn get_schedule_state(&mut self, user_id: i32, word_id: i32) -> Result<Option<ScheduleState>, StoreError>;

    fn upsert_schedule_state(
        &mut self,
        user_id: i32,
        word_id: i32,
        state: &ScheduleState,
    ) -> Result<(), StoreError>;

    /// Words due at `now`, most overdue first
    fn find_due_words(&mut self, user_id: i32, now: NaiveDateTime, limit: usize) -> Result<Vec<WordRef>, StoreError>;

    /// Words of `level` the user has never been graded on
    fn sample_new_words(&mut self, user_id: i32, level: &str, limit: usize) -> Result<Vec<WordRef>, StoreError>;

    fn sample_distractors(&mut self, exclude_word: &str, count: usize) -> Result<Vec<String>, StoreError>;

    fn find_context_sentence(&mut self, word: &str) -> Result<Option<ContextSentence>, StoreError>;

    fn word_exists(&mut self, word_id: i32) -> Result<bool, StoreError>;

    /// Cumulative correct answers over every quiz session of the user
    fn sum_correct_answers(&mut self, user_id: i32) -> Result<i64, StoreError>;

    fn get_latest_goal(&mut self, user_id: i32) -> Result<Option<LearningGoal>, StoreError>;

    fn update_goal_level(&mut self, goal_id: i32, level: &str) -> Result<(), StoreError>;
}

pub struct SqliteStore<'a> {
    conn: &'a mut SqliteConnection,
    rng: StdRng,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self::with_rng(conn, StdRng::from_entropy())
    }

    pub fn with_rng(conn: &'a mut SqliteConnection, rng: StdRng) -> Self {
        SqliteStore { conn, rng }
    }

    fn last_insert_id(&mut self) -> Result<i32, StoreError> {
        let id = diesel::select(diesel::dsl::sql::<Integer>("last_insert_rowid()"))
            .get_result::<i32>(self.conn)?;
        Ok(id)
    }

    pub fn record_quiz_session(
        &mut self,
        user_id: i32,
        payload: &QuizSessionCreate,
        now: NaiveDateTime,
    ) -> Result<QuizSession, StoreError> {
        diesel::insert_into(quiz_sessions::table)
            .values(&NewQuizSession {
                user_id,
                score: payload.score,
                total_questions: payload.total_questions,
                correct_answers: payload.correct_answers,
                category_breakdown: payload.category_breakdown.as_deref(),
                created_at: now,
            })
            .execute(self.conn)?;

        let id = self.last_insert_id()?;
        let session = quiz_sessions::table
            .find(id)
            .select(QuizSession::as_select())
            .first(self.conn)?;
        Ok(session)
    }

    pub fn create_goal(
        &mut self,
        user_id: i32,
        payload: &LearningGoalCreate,
        now: NaiveDateTime,
    ) -> Result<LearningGoal, StoreError> {
        diesel::insert_into(learning_goals::table)
            .values(&NewLearningGoal {
                user_id,
                target_language: &payload.target_language,
                level: payload.level.as_str(),
                daily_minutes: payload.daily_minutes,
                goal_type: &payload.goal_type,
                focus_topics: payload.focus_topics.as_deref(),
                created_at: now,
            })
            .execute(self.conn)?;

        let id = self.last_insert_id()?;
        let goal = learning_goals::table
            .find(id)
            .select(LearningGoal::as_select())
            .first(self.conn)?;
        Ok(goal)
    }

    pub fn quiz_statistics(&mut self, user_id: i32) -> Result<QuizStatistics, StoreError> {
        let (total_quizzes, average_score, total_correct, total_questions) = quiz_sessions::table
            .filter(quiz_sessions::user_id.eq(user_id))
            .select((
                count_star(),
                avg(quiz_sessions::score),
                sum(quiz_sessions::correct_answers),
                sum(quiz_sessions::total_questions),
            ))
            .first::<(i64, Option<f64>, Option<i64>, Option<i64>)>(self.conn)?;

        Ok(QuizStatistics {
            total_quizzes,
            average_score: average_score.unwrap_or(0.0),
            total_correct: total_correct.unwrap_or(0),
            total_questions: total_questions.unwrap_or(0),
        })
    }

    pub fn recent_quiz_sessions(&mut self, user_id: i32, limit: usize) -> Result<Vec<QuizSession>, StoreError> {
        let sessions = quiz_sessions::table
            .filter(quiz_sessions::user_id.eq(user_id))
            .order((quiz_sessions::created_at.desc(), quiz_sessions::id.desc()))
            .limit(limit as i64)
            .select(QuizSession::as_select())
            .load(self.conn)?;
        Ok(sessions)
    }

    /// Random words of a level, each with its first linked example sentence
    pub fn sample_words_with_examples(
        &mut self,
        level: &str,
        limit: usize,
    ) -> Result<Vec<(WordRef, Option<String>)>, StoreError> {
        let candidates = vocabulary_words::table
            .filter(vocabulary_words::level.eq(level))
            .select(WordRef::as_select())
            .load(self.conn)?;

        let mut words = Vec::new();
        for word in sample_without_replacement(&candidates, limit, &mut self.rng) {
            let example = word_sentences::table
                .inner_join(sentences::table)
                .filter(word_sentences::word_id.eq(word.id))
                .select(sentences::text)
                .first::<String>(self.conn)
                .optional()?;
            words.push((word, example));
        }
        Ok(words)
    }

    pub fn find_word_by_text(&mut self, word: &str) -> Result<Option<WordRef>, StoreError> {
        let found = vocabulary_words::table
            .filter(vocabulary_words::word.eq(word))
            .order(vocabulary_words::id.asc())
            .select(WordRef::as_select())
            .first(self.conn)
            .optional()?;
        Ok(found)
    }

    pub fn due_reviews(
        &mut self,
        user_id: i32,
        now: NaiveDateTime,
        limit: usize,
    ) -> Result<Vec<DueReviewItem>, StoreError> {
        let items = review_schedules::table
            .inner_join(vocabulary_words::table)
            .filter(review_schedules::user_id.eq(user_id))
            .filter(review_schedules::next_review.le(now))
            .order(review_schedules::next_review.asc())
            .limit(limit as i64)
            .select((
                vocabulary_words::id,
                vocabulary_words::word,
                vocabulary_words::translation,
                review_schedules::next_review,
                review_schedules::interval,
                review_schedules::repetitions,
            ))
            .load::<DueReviewItem>(self.conn)?;
        Ok(items)
    }
}

impl LearningStore for SqliteStore<'_> {
    fn get_schedule_state(&mut self, user_id: i32, word_id: i32) -> Result<Option<ScheduleState>, StoreError> {
        let row = review_schedules::table
            .filter(review_schedules::user_id.eq(user_id))
            .filter(review_schedules::word_id.eq(word_id))
            .select(ReviewSchedule::as_select())
            .first(self.conn)
            .optional()?;
        Ok(row.map(ScheduleState::from))
    }

    fn upsert_schedule_state(
        &mut self,
        user_id: i32,
        word_id: i32,
        state: &ScheduleState,
    ) -> Result<(), StoreError> {
        let row = NewReviewSchedule::new(user_id, word_id, state);
        diesel::insert_into(review_schedules::table)
            .values(&row)
            .on_conflict((review_schedules::user_id, review_schedules::word_id))
            .do_update()
            .set(&row)
            .execute(self.conn)?;
        Ok(())
    }

    fn find_due_words(&mut self, user_id: i32, now: NaiveDateTime, limit: usize) -> Result<Vec<WordRef>, StoreError> {
        let words = review_schedules::table
            .inner_join(vocabulary_words::table)
            .filter(review_schedules::user_id.eq(user_id))
            .filter(review_schedules::next_review.le(now))
            .order(review_schedules::next_review.asc())
            .limit(limit as i64)
            .select(WordRef::as_select())
            .load(self.conn)?;
        Ok(words)
    }

    fn sample_new_words(&mut self, user_id: i32, level: &str, limit: usize) -> Result<Vec<WordRef>, StoreError> {
        let scheduled = review_schedules::table
            .filter(review_schedules::user_id.eq(user_id))
            .select(review_schedules::word_id);

        let candidates = vocabulary_words::table
            .filter(vocabulary_words::level.eq(level))
            .filter(not(vocabulary_words::id.eq_any(scheduled)))
            .select(WordRef::as_select())
            .load(self.conn)?;

        Ok(sample_without_replacement(&candidates, limit, &mut self.rng))
    }

    fn sample_distractors(&mut self, exclude_word: &str, count: usize) -> Result<Vec<String>, StoreError> {
        let candidates = vocabulary_words::table
            .filter(vocabulary_words::word.ne(exclude_word))
            .select(vocabulary_words::word)
            .distinct()
            .load::<String>(self.conn)?;

        Ok(sample_without_replacement(&candidates, count, &mut self.rng))
    }

    fn find_context_sentence(&mut self, word: &str) -> Result<Option<ContextSentence>, StoreError> {
        let linked = word_sentences::table
            .inner_join(sentences::table)
            .inner_join(vocabulary_words::table)
            .filter(vocabulary_words::word.eq(word))
            .select((sentences::text, sentences::translation))
            .load::<ContextSentence>(self.conn)?;

        if let Some(sentence) = linked.choose(&mut self.rng) {
            return Ok(Some(sentence.clone()));
        }

        // Unlinked sentences that still use the word on its own
        let Some(matcher) = word_pattern(word, true) else {
            return Ok(None);
        };
        let loose = sentences::table
            .filter(sentences::text.like(format!("%{}%", word.trim())))
            .select((sentences::text, sentences::translation))
            .load::<ContextSentence>(self.conn)?;
        let matching: Vec<ContextSentence> = loose
            .into_iter()
            .filter(|s| matcher.is_match(&s.text))
            .collect();

        Ok(matching.choose(&mut self.rng).cloned())
    }

    fn word_exists(&mut self, word_id: i32) -> Result<bool, StoreError> {
        let exists = diesel::select(diesel::dsl::exists(vocabulary_words::table.find(word_id)))
            .get_result(self.conn)?;
        Ok(exists)
    }

    fn sum_correct_answers(&mut self, user_id: i32) -> Result<i64, StoreError> {
        let total = quiz_sessions::table
            .filter(quiz_sessions::user_id.eq(user_id))
            .select(sum(quiz_sessions::correct_answers))
            .first::<Option<i64>>(self.conn)?;
        Ok(total.unwrap_or(0))
    }

    fn get_latest_goal(&mut self, user_id: i32) -> Result<Option<LearningGoal>, StoreError> {
        let goal = learning_goals::table
            .filter(learning_goals::user_id.eq(user_id))
            .order((learning_goals::created_at.desc(), learning_goals::id.desc()))
            .select(LearningGoal::as_select())
            .first(self.conn)
            .optional()?;
        Ok(goal)
    }

    fn update_goal_level(&mut self, goal_id: i32, level: &str) -> Result<(), StoreError> {
        diesel::update(learning_goals::table.find(goal_id))
            .set(learning_goals::level.eq(level))
            .execute(self.conn)?;
        Ok(())
    }
}
