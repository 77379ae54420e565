//! XP based level advancement and per-answer grading.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::levels::{CefrLevel, LEVEL_THRESHOLDS};
use crate::data::models::{QuizResultDetail, ScheduleState, StoreError};
use crate::data::repositories::LearningStore;
use crate::features::srs::{QualityMode, SpacedRepetitionEngine};

/// Threshold of a stored level string; levels the table does not know count as 0
fn stored_threshold(level: &str) -> i64 {
    level.parse::<CefrLevel>().map(CefrLevel::threshold).unwrap_or(0)
}

/// Highest level `xp` qualifies for, if it lies strictly above `current_level`.
pub fn qualifying_level(current_level: &str, xp: i64) -> Option<CefrLevel> {
    let current = stored_threshold(current_level);
    LEVEL_THRESHOLDS
        .iter()
        .filter(|(_, threshold)| xp >= *threshold && *threshold > current)
        .max_by_key(|(_, threshold)| *threshold)
        .map(|(level, _)| *level)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelProgress {
    pub current_xp: i64,
    pub next_level: Option<CefrLevel>,
    /// XP at which `next_level` unlocks, 0 at the top level
    pub next_level_xp: i64,
}

/// Progress towards the level after `current_level`. A level the table does
/// not know has no next level.
pub fn level_progress(current_level: &str, xp: i64) -> LevelProgress {
    let next = current_level.parse::<CefrLevel>().ok().and_then(CefrLevel::next);

    LevelProgress {
        current_xp: xp,
        next_level: next,
        next_level_xp: next.map(CefrLevel::threshold).unwrap_or(0),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionOutcome {
    pub new_level: Option<CefrLevel>,
    pub current_xp: i64,
    pub graded: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressionPolicy {
    engine: SpacedRepetitionEngine,
    quality_mode: QualityMode,
}

impl ProgressionPolicy {
    pub fn new(quality_mode: QualityMode) -> Self {
        ProgressionPolicy {
            engine: SpacedRepetitionEngine::new(),
            quality_mode,
        }
    }

    /// Fetch-or-create the schedule of one (user, word) pair, grade it and persist it.
    pub fn grade_answer<S: LearningStore + ?Sized>(
        &self,
        store: &mut S,
        user_id: i32,
        word_id: i32,
        quality: i32,
        now: NaiveDateTime,
    ) -> Result<ScheduleState, StoreError> {
        let current = match store.get_schedule_state(user_id, word_id)? {
            Some(state) => state,
            None => self.engine.create_initial_schedule_at(now),
        };

        let next = self.engine.calculate_next_review_at(
            current.interval,
            current.repetitions,
            current.easiness_factor,
            quality,
            now,
        );
        store.upsert_schedule_state(user_id, word_id, &next)?;
        Ok(next)
    }

    /// Grades every answer that names a word, then advances the current goal's
    /// level if the user's cumulative XP qualifies for a higher one.
    ///
    /// The quiz session itself must already be stored so its correct answers
    /// count towards XP.
    pub fn apply_quiz_result<S: LearningStore + ?Sized>(
        &self,
        store: &mut S,
        user_id: i32,
        results: &[QuizResultDetail],
        now: NaiveDateTime,
    ) -> Result<ProgressionOutcome, StoreError> {
        let mut graded = 0;
        let mut skipped = 0;

        for result in results {
            let Some(word_id) = result.word_id else {
                log::warn!(
                    "Skipping answer without word id for user {} (word: {:?})",
                    user_id,
                    result.word
                );
                skipped += 1;
                continue;
            };
            if !store.word_exists(word_id)? {
                log::warn!("Skipping answer for unknown word {} from user {}", word_id, user_id);
                skipped += 1;
                continue;
            }

            let quality = self
                .quality_mode
                .quality_for(result.is_correct, result.time_taken_seconds);
            self.grade_answer(store, user_id, word_id, quality, now)?;
            graded += 1;
        }

        let current_xp = store.sum_correct_answers(user_id)?;
        let mut new_level = None;

        if let Some(goal) = store.get_latest_goal(user_id)? {
            if let Some(level) = qualifying_level(&goal.level, current_xp) {
                store.update_goal_level(goal.id, level.as_str())?;
                log::info!(
                    "User {} advanced from {} to {} with {} XP",
                    user_id,
                    goal.level,
                    level,
                    current_xp
                );
                new_level = Some(level);
            }
        }

        Ok(ProgressionOutcome {
            new_level,
            current_xp,
            graded,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::repositories::memory::MemoryStore;
    use crate::features::srs::engine::INITIAL_EASINESS;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn answer(word_id: Option<i32>, is_correct: bool) -> QuizResultDetail {
        QuizResultDetail {
            word_id,
            word: String::new(),
            is_correct,
            time_taken_seconds: None,
        }
    }

    #[test]
    fn test_highest_qualifying_level_wins() {
        assert_eq!(qualifying_level("A1", 150), Some(CefrLevel::B1));
        assert_eq!(qualifying_level("A1", 49), None);
        assert_eq!(qualifying_level("A2", 50), None);
        assert_eq!(qualifying_level("B1", 1200), Some(CefrLevel::C2));
        assert_eq!(qualifying_level("C2", 5000), None);
        assert_eq!(qualifying_level("gibberish", 60), Some(CefrLevel::A2));
    }

    #[test]
    fn test_progress_of_unknown_level_has_no_next_level() {
        let progress = level_progress("gibberish", 20);
        assert_eq!(progress.current_xp, 20);
        assert_eq!(progress.next_level, None);
        assert_eq!(progress.next_level_xp, 0);

        let progress = level_progress("a2", 20);
        assert_eq!(progress.next_level, Some(CefrLevel::B1));
        assert_eq!(progress.next_level_xp, 150);
    }

    #[test]
    fn test_level_never_goes_down() {
        for (level, _) in LEVEL_THRESHOLDS {
            for xp in [0, 10, 50, 149, 150, 300, 599, 1000, 10_000] {
                if let Some(next) = qualifying_level(level.as_str(), xp) {
                    assert!(next > level, "{} -> {} at {} XP", level, next, xp);
                }
            }
        }
    }

    #[test]
    fn test_progress_and_level_up_share_thresholds() {
        for (level, _) in LEVEL_THRESHOLDS {
            let progress = level_progress(level.as_str(), 0);
            if let Some(next) = progress.next_level {
                // Reaching the advertised XP is exactly what triggers the level up
                assert_eq!(qualifying_level(level.as_str(), progress.next_level_xp), Some(next));
                assert_eq!(qualifying_level(level.as_str(), progress.next_level_xp - 1), None);
            } else {
                assert_eq!(progress.next_level_xp, 0);
            }
        }
    }

    #[test]
    fn test_grade_answer_creates_then_advances_schedule() {
        let mut store = MemoryStore::new();
        let policy = ProgressionPolicy::default();

        let first = policy.grade_answer(&mut store, 1, 7, 4, now()).unwrap();
        assert_eq!(first.interval, 1);
        assert_eq!(first.repetitions, 1);
        assert_eq!(first.easiness_factor, INITIAL_EASINESS);

        let second = policy
            .grade_answer(&mut store, 1, 7, 4, now() + Duration::days(1))
            .unwrap();
        assert_eq!(second.interval, 6);
        assert_eq!(store.get_schedule_state(1, 7).unwrap(), Some(second));
    }

    #[test]
    fn test_apply_quiz_result_grades_and_levels_up() {
        let mut store = MemoryStore::new();
        let known = store.add_word("cat", "kedi", "A1");
        let missed = store.add_word("dog", "köpek", "A1");
        let goal_id = store.add_goal(1, "A1", now());
        store.add_session(1, 150);

        let results = vec![answer(Some(known), true), answer(Some(missed), false), answer(None, true)];
        let outcome = ProgressionPolicy::default()
            .apply_quiz_result(&mut store, 1, &results, now())
            .unwrap();

        assert_eq!(outcome.new_level, Some(CefrLevel::B1));
        assert_eq!(outcome.current_xp, 150);
        assert_eq!(outcome.graded, 2);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(store.goal_level(goal_id).as_deref(), Some("B1"));

        let failed = store.get_schedule_state(1, missed).unwrap().unwrap();
        assert_eq!(failed.repetitions, 0);
        assert_eq!(failed.interval, 1);
    }

    #[test]
    fn test_apply_quiz_result_skips_unknown_words() {
        let mut store = MemoryStore::new();
        let cat = store.add_word("cat", "kedi", "A1");
        store.add_session(1, 2);

        let results = vec![answer(Some(9999), true), answer(Some(cat), true)];
        let outcome = ProgressionPolicy::default()
            .apply_quiz_result(&mut store, 1, &results, now())
            .unwrap();

        assert_eq!(outcome.graded, 1);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(store.get_schedule_state(1, 9999).unwrap(), None);
        assert!(store.get_schedule_state(1, cat).unwrap().is_some());
    }

    #[test]
    fn test_apply_quiz_result_without_goal_reports_no_level() {
        let mut store = MemoryStore::new();
        let cat = store.add_word("cat", "kedi", "A1");
        store.add_session(1, 500);

        let outcome = ProgressionPolicy::default()
            .apply_quiz_result(&mut store, 1, &[answer(Some(cat), true)], now())
            .unwrap();
        assert_eq!(outcome.new_level, None);
        assert_eq!(outcome.graded, 1);
    }

    #[test]
    fn test_timed_mode_uses_answer_speed() {
        let mut store = MemoryStore::new();
        let cat = store.add_word("cat", "kedi", "A1");
        let policy = ProgressionPolicy::new(QualityMode::Timed { avg_time_seconds: 10.0 });

        let mut quick = answer(Some(cat), true);
        quick.time_taken_seconds = Some(2.0);
        policy.apply_quiz_result(&mut store, 1, &[quick], now()).unwrap();

        // Quality 5 raises easiness by 0.1
        let state = store.get_schedule_state(1, cat).unwrap().unwrap();
        assert!((state.easiness_factor - 2.6).abs() < 1e-9);
    }
}
