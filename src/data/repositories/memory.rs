//! In-memory `LearningStore` for exercising the learning policies without sqlite.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::LearningStore;
use crate::data::models::{ContextSentence, LearningGoal, ScheduleState, StoreError, WordRef};
use crate::features::quiz::sampling::sample_without_replacement;
use crate::utils::text::word_pattern;

pub struct MemoryStore {
    words: Vec<WordRef>,
    sentences: Vec<ContextSentence>,
    /// Sentences tied to a word whether or not they contain it
    linked: Vec<(String, ContextSentence)>,
    schedules: HashMap<(i32, i32), ScheduleState>,
    goals: Vec<LearningGoal>,
    correct_answers: Vec<(i32, i64)>,
    rng: StdRng,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            words: Vec::new(),
            sentences: Vec::new(),
            linked: Vec::new(),
            schedules: HashMap::new(),
            goals: Vec::new(),
            correct_answers: Vec::new(),
            rng: StdRng::seed_from_u64(7),
        }
    }

    pub fn add_word(&mut self, word: &str, translation: &str, level: &str) -> i32 {
        let id = self.words.len() as i32 + 1;
        self.words.push(WordRef {
            id,
            word: word.to_string(),
            translation: translation.to_string(),
            level: level.to_string(),
            category: None,
        });
        id
    }

    pub fn add_sentence(&mut self, text: &str, translation: Option<&str>) {
        self.sentences.push(ContextSentence {
            text: text.to_string(),
            translation: translation.map(str::to_string),
        });
    }

    pub fn link_sentence(&mut self, word: &str, text: &str, translation: Option<&str>) {
        self.linked.push((
            word.to_string(),
            ContextSentence {
                text: text.to_string(),
                translation: translation.map(str::to_string),
            },
        ));
    }

    pub fn add_goal(&mut self, user_id: i32, level: &str, created_at: NaiveDateTime) -> i32 {
        let id = self.goals.len() as i32 + 1;
        self.goals.push(LearningGoal {
            id,
            user_id,
            target_language: "en".to_string(),
            level: level.to_string(),
            daily_minutes: 15,
            goal_type: "general".to_string(),
            focus_topics: None,
            created_at,
        });
        id
    }

    pub fn add_session(&mut self, user_id: i32, correct_answers: i64) {
        self.correct_answers.push((user_id, correct_answers));
    }

    pub fn goal_level(&self, goal_id: i32) -> Option<String> {
        self.goals.iter().find(|g| g.id == goal_id).map(|g| g.level.clone())
    }
}

impl LearningStore for MemoryStore {
    fn get_schedule_state(&mut self, user_id: i32, word_id: i32) -> Result<Option<ScheduleState>, StoreError> {
        Ok(self.schedules.get(&(user_id, word_id)).cloned())
    }

    fn upsert_schedule_state(
        &mut self,
        user_id: i32,
        word_id: i32,
        state: &ScheduleState,
    ) -> Result<(), StoreError> {
        self.schedules.insert((user_id, word_id), state.clone());
        Ok(())
    }

    fn find_due_words(&mut self, user_id: i32, now: NaiveDateTime, limit: usize) -> Result<Vec<WordRef>, StoreError> {
        let mut due: Vec<(NaiveDateTime, &WordRef)> = self
            .words
            .iter()
            .filter_map(|w| {
                let state = self.schedules.get(&(user_id, w.id))?;
                (state.next_review <= now).then_some((state.next_review, w))
            })
            .collect();
        due.sort_by_key(|(next_review, w)| (*next_review, w.id));
        Ok(due.into_iter().take(limit).map(|(_, w)| w.clone()).collect())
    }

    fn sample_new_words(&mut self, user_id: i32, level: &str, limit: usize) -> Result<Vec<WordRef>, StoreError> {
        let candidates: Vec<WordRef> = self
            .words
            .iter()
            .filter(|w| w.level == level && !self.schedules.contains_key(&(user_id, w.id)))
            .cloned()
            .collect();
        Ok(sample_without_replacement(&candidates, limit, &mut self.rng))
    }

    fn sample_distractors(&mut self, exclude_word: &str, count: usize) -> Result<Vec<String>, StoreError> {
        let mut candidates: Vec<String> = self
            .words
            .iter()
            .map(|w| w.word.clone())
            .filter(|w| w != exclude_word)
            .collect();
        candidates.sort();
        candidates.dedup();
        Ok(sample_without_replacement(&candidates, count, &mut self.rng))
    }

    fn find_context_sentence(&mut self, word: &str) -> Result<Option<ContextSentence>, StoreError> {
        let linked: Vec<&ContextSentence> = self
            .linked
            .iter()
            .filter(|(owner, _)| owner == word)
            .map(|(_, sentence)| sentence)
            .collect();
        if let Some(sentence) = linked.choose(&mut self.rng) {
            return Ok(Some((*sentence).clone()));
        }

        let Some(matcher) = word_pattern(word, true) else {
            return Ok(None);
        };
        let matching: Vec<&ContextSentence> = self
            .sentences
            .iter()
            .filter(|s| matcher.is_match(&s.text))
            .collect();
        Ok(matching.choose(&mut self.rng).map(|s| (*s).clone()))
    }

    fn word_exists(&mut self, word_id: i32) -> Result<bool, StoreError> {
        Ok(self.words.iter().any(|w| w.id == word_id))
    }

    fn sum_correct_answers(&mut self, user_id: i32) -> Result<i64, StoreError> {
        Ok(self
            .correct_answers
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, correct)| correct)
            .sum())
    }

    fn get_latest_goal(&mut self, user_id: i32) -> Result<Option<LearningGoal>, StoreError> {
        Ok(self
            .goals
            .iter()
            .filter(|g| g.user_id == user_id)
            .max_by_key(|g| (g.created_at, g.id))
            .cloned())
    }

    fn update_goal_level(&mut self, goal_id: i32, level: &str) -> Result<(), StoreError> {
        if let Some(goal) = self.goals.iter_mut().find(|g| g.id == goal_id) {
            goal.level = level.to_string();
        }
        Ok(())
    }
}
