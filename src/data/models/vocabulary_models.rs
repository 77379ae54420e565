use diesel::{Queryable, Selectable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::vocabulary_words;

/// Reference to a vocabulary entry, enough to build a question and attribute a grade
#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Selectable)]
#[diesel(table_name = vocabulary_words)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WordRef {
    pub id: i32,
    pub word: String,
    pub translation: String,
    pub level: String,
    pub category: Option<String>,
}

/// Example sentence containing a word, with its translation if known
#[derive(Debug, Clone, PartialEq, Queryable)]
pub struct ContextSentence {
    pub text: String,
    pub translation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VocabularyWordRead {
    pub id: i32,
    pub word: String,
    pub translation: String,
    pub level: String,
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_sentence: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VocabularyWordList {
    pub words: Vec<VocabularyWordRead>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct VocabularyParams {
    pub level: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ExampleSentenceRequest {
    #[validate(length(min = 1, message = "Word must not be empty"))]
    pub word: String,
    pub level: String,
}

#[derive(Debug, Serialize)]
pub struct ExampleSentenceResponse {
    pub word: String,
    pub level: String,
    pub example_sentence: String,
}
