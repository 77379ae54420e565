use axum::{
    Json,
    extract::{Query, State},
};
use validator::Validate;

use super::requested_level;
use crate::data::models::{
    ApiError, ExampleSentenceRequest, ExampleSentenceResponse, VocabularyParams,
    VocabularyWordList, VocabularyWordRead,
};
use crate::data::repositories::{LearningStore, SqliteStore};
use crate::handlers::AppState;

const DEFAULT_VOCABULARY_LIMIT: usize = 20;

/// Random words of one level, each with an example sentence when one is linked
pub async fn list_vocabulary(
    State(state): State<AppState>,
    Query(params): Query<VocabularyParams>,
) -> Result<Json<VocabularyWordList>, ApiError> {
    let level = requested_level(params.level.as_deref(), "A1")?;
    let limit = params
        .limit
        .unwrap_or(DEFAULT_VOCABULARY_LIMIT)
        .clamp(1, state.config.max_quiz_limit);

    let mut conn = state.connection()?;
    let words: Vec<VocabularyWordRead> = SqliteStore::new(&mut conn)
        .sample_words_with_examples(level.as_str(), limit)?
        .into_iter()
        .map(|(word, example_sentence)| VocabularyWordRead {
            id: word.id,
            word: word.word,
            translation: word.translation,
            level: word.level,
            category: word.category,
            example_sentence,
        })
        .collect();

    Ok(Json(VocabularyWordList {
        total: words.len(),
        words,
    }))
}

pub async fn generate_example(
    State(state): State<AppState>,
    Json(request): Json<ExampleSentenceRequest>,
) -> Result<Json<ExampleSentenceResponse>, ApiError> {
    request.validate()?;

    let mut conn = state.connection()?;
    let example_sentence = match SqliteStore::new(&mut conn).find_context_sentence(&request.word)? {
        Some(sentence) => sentence.text,
        None => format!("Example for {}", request.word),
    };

    Ok(Json(ExampleSentenceResponse {
        word: request.word,
        level: request.level,
        example_sentence,
    }))
}
