//! Batch selection: mixes due reviews with unseen words and turns each into a
//! four option multiple choice question.

use chrono::NaiveDateTime;
use rand::Rng;
use rand::seq::SliceRandom;

use super::renderer::{QuestionPrompt, QuestionRenderer, RenderedQuestion, fallback_question};
use crate::data::models::{QuizQuestion, StoreError, WordRef};
use crate::data::repositories::LearningStore;
use crate::utils::text::blank_out;

pub const QUESTION_TYPE: &str = "multiple_choice";
pub const OPTION_COUNT: usize = 4;
/// Pads the options when the vocabulary has too few other words
pub const PLACEHOLDER_OPTION: &str = "other";

/// The word a question is about
#[derive(Debug, Clone)]
pub struct QuestionSubject {
    /// `None` for ad-hoc words; such questions are never graded
    pub word_id: Option<i32>,
    pub word: String,
    pub translation: Option<String>,
    pub level: String,
    pub category: Option<String>,
}

impl From<WordRef> for QuestionSubject {
    fn from(word: WordRef) -> Self {
        QuestionSubject {
            word_id: Some(word.id),
            word: word.word,
            translation: Some(word.translation),
            level: word.level,
            category: word.category,
        }
    }
}

pub struct QuizSelectionPolicy<'r> {
    renderer: &'r dyn QuestionRenderer,
}

impl<'r> QuizSelectionPolicy<'r> {
    pub fn new(renderer: &'r dyn QuestionRenderer) -> Self {
        QuizSelectionPolicy { renderer }
    }

    /// Picks the words for one quiz.
    ///
    /// Half of `limit` (rounded down) goes to due reviews, most overdue first;
    /// unseen words of `level` fill the rest, including any slots the due
    /// reviews left empty. The batch is shuffled so reviews and new words
    /// are not grouped.
    pub fn select_words<S, R>(
        &self,
        store: &mut S,
        user_id: i32,
        level: &str,
        limit: usize,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Result<Vec<WordRef>, StoreError>
    where
        S: LearningStore + ?Sized,
        R: Rng + ?Sized,
    {
        let due_count = limit / 2;
        let mut words = if due_count > 0 {
            store.find_due_words(user_id, now, due_count)?
        } else {
            Vec::new()
        };
        words.truncate(due_count);

        let new_count = limit - words.len();
        if new_count > 0 {
            let fresh = store.sample_new_words(user_id, level, new_count)?;
            words.extend(fresh.into_iter().take(new_count));
        }

        log::debug!(
            "Selected {} words for user {} at level {} (limit {})",
            words.len(),
            user_id,
            level,
            limit
        );

        words.shuffle(rng);
        Ok(words)
    }

    /// `select_words`, with every word rendered as a question numbered from 1
    pub fn select_batch<S, R>(
        &self,
        store: &mut S,
        user_id: i32,
        level: &str,
        limit: usize,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Result<Vec<QuizQuestion>, StoreError>
    where
        S: LearningStore + ?Sized,
        R: Rng + ?Sized,
    {
        let words = self.select_words(store, user_id, level, limit, now, rng)?;
        words
            .into_iter()
            .enumerate()
            .map(|(idx, word)| self.build_question(&mut *store, idx + 1, QuestionSubject::from(word), &mut *rng))
            .collect()
    }

    pub fn build_question<S, R>(
        &self,
        store: &mut S,
        id: usize,
        subject: QuestionSubject,
        rng: &mut R,
    ) -> Result<QuizQuestion, StoreError>
    where
        S: LearningStore + ?Sized,
        R: Rng + ?Sized,
    {
        let prompt = self.build_prompt(store, &subject)?;
        let rendered = self.render(&prompt);
        let options = self.build_options(store, &subject.word, rng)?;

        Ok(QuizQuestion {
            id,
            word_id: subject.word_id,
            question_text: rendered.question_text,
            question_type: QUESTION_TYPE,
            correct_answer: subject.word,
            options,
            level: subject.level,
            category: subject.category,
            explanation: rendered.explanation,
        })
    }

    fn build_prompt<S>(&self, store: &mut S, subject: &QuestionSubject) -> Result<QuestionPrompt, StoreError>
    where
        S: LearningStore + ?Sized,
    {
        let translation = subject
            .translation
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        if let Some(sentence) = store.find_context_sentence(&subject.word)? {
            if let Some(blanked) = blank_out(&sentence.text, &subject.word) {
                return Ok(QuestionPrompt::FillBlank {
                    word: subject.word.clone(),
                    blanked,
                    sentence_translation: sentence.translation,
                });
            }

            // Linked sentence that never spells the word out
            if let Some(translation) = translation {
                return Ok(QuestionPrompt::EnglishFor {
                    word: subject.word.clone(),
                    translation: translation.to_string(),
                });
            }
            let meaning = sentence.translation.as_deref().map(str::trim).filter(|m| !m.is_empty());
            if let Some(meaning) = meaning {
                return Ok(QuestionPrompt::WordMeaning {
                    word: subject.word.clone(),
                    meaning: meaning.to_string(),
                });
            }
        }

        Ok(match translation {
            Some(translation) => QuestionPrompt::Translation {
                word: subject.word.clone(),
                translation: translation.to_string(),
            },
            None => QuestionPrompt::Definition {
                word: subject.word.clone(),
            },
        })
    }

    fn render(&self, prompt: &QuestionPrompt) -> RenderedQuestion {
        match self.renderer.render(prompt) {
            Ok(rendered) => rendered,
            Err(e) => {
                log::debug!("Using built-in question text: {}", e);
                fallback_question(prompt)
            }
        }
    }

    fn build_options<S, R>(&self, store: &mut S, word: &str, rng: &mut R) -> Result<Vec<String>, StoreError>
    where
        S: LearningStore + ?Sized,
        R: Rng + ?Sized,
    {
        let mut options = Vec::with_capacity(OPTION_COUNT);
        options.push(word.to_string());
        options.extend(
            store
                .sample_distractors(word, OPTION_COUNT - 1)?
                .into_iter()
                .take(OPTION_COUNT - 1),
        );
        while options.len() < OPTION_COUNT {
            options.push(PLACEHOLDER_OPTION.to_string());
        }
        options.shuffle(rng);
        Ok(options)
    }
}
