//! Question phrasing.
//!
//! The selection policy decides *what* to ask (see [`QuestionPrompt`]); a
//! [`QuestionRenderer`] decides how the question reads. [`TemplateQuestionRenderer`] phrases
//! questions with tera templates and must be loaded before use:
//!
//! ```text
//! Uninitialized --load()--> Loading --> Ready
//!                                   \-> Failed(reason) --load()--> Loading ...
//! ```

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

use crate::utils::text::collapse_whitespace;

const FILL_BLANK_TEMPLATE: &str = "fill_blank.txt";
const TRANSLATION_TEMPLATE: &str = "translation.txt";
const DEFINITION_TEMPLATE: &str = "definition.txt";
const ENGLISH_FOR_TEMPLATE: &str = "english_for.txt";
const WORD_MEANING_TEMPLATE: &str = "word_meaning.txt";

const BUILT_IN_TEMPLATES: [(&str, &str); 5] = [
    (FILL_BLANK_TEMPLATE, "{{ blanked }}"),
    (TRANSLATION_TEMPLATE, "Select the correct English word for: '{{ translation }}'"),
    (DEFINITION_TEMPLATE, "Select the correct definition/synonym for '{{ word }}'"),
    (ENGLISH_FOR_TEMPLATE, "What is the English for '{{ translation }}'?"),
    (WORD_MEANING_TEMPLATE, "Which word means '{{ meaning }}'?"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum RendererState {
    Uninitialized,
    Loading,
    Ready,
    Failed(String),
}

/// What a question asks about a word
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionPrompt {
    /// Context sentence with the word blanked out
    FillBlank {
        word: String,
        blanked: String,
        sentence_translation: Option<String>,
    },
    Translation { word: String, translation: String },
    Definition { word: String },
    /// A context sentence exists but does not contain the word
    EnglishFor { word: String, translation: String },
    /// Same, for a word without a translation; asks via the sentence's meaning
    WordMeaning { word: String, meaning: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQuestion {
    pub question_text: String,
    pub explanation: String,
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Question renderer is not ready: {0:?}")]
    NotReady(RendererState),
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

pub trait QuestionRenderer: Send + Sync {
    fn state(&self) -> RendererState;

    fn render(&self, prompt: &QuestionPrompt) -> Result<RenderedQuestion, RenderError>;
}

fn explanation_for(prompt: &QuestionPrompt) -> String {
    match prompt {
        QuestionPrompt::FillBlank { sentence_translation: Some(meaning), .. } => {
            format!("Meaning: {}", meaning)
        }
        QuestionPrompt::FillBlank { .. } => "Fill in the missing word.".to_string(),
        QuestionPrompt::Translation { word, translation }
        | QuestionPrompt::EnglishFor { word, translation } => {
            format!("Translation: {} = {}", word, translation)
        }
        QuestionPrompt::Definition { .. } => "Vocabulary review.".to_string(),
        QuestionPrompt::WordMeaning { meaning, .. } => format!("Meaning: {}", meaning),
    }
}

/// Plain phrasing used when no renderer is available
pub fn fallback_question(prompt: &QuestionPrompt) -> RenderedQuestion {
    let question_text = match prompt {
        QuestionPrompt::FillBlank { blanked, .. } => blanked.clone(),
        QuestionPrompt::Translation { translation, .. } => {
            format!("Select the correct English word for: '{}'", translation)
        }
        QuestionPrompt::Definition { word } => {
            format!("Select the correct definition/synonym for '{}'", word)
        }
        QuestionPrompt::EnglishFor { translation, .. } => {
            format!("What is the English for '{}'?", translation)
        }
        QuestionPrompt::WordMeaning { meaning, .. } => format!("Which word means '{}'?", meaning),
    };
    RenderedQuestion {
        question_text,
        explanation: explanation_for(prompt),
    }
}

#[derive(Debug)]
enum TemplateSource {
    BuiltIn,
    Glob(String),
}

struct Inner {
    state: RendererState,
    tera: Option<Tera>,
}

/// Tera-backed renderer, constructed at startup and shared by reference
pub struct TemplateQuestionRenderer {
    source: TemplateSource,
    inner: RwLock<Inner>,
}

impl TemplateQuestionRenderer {
    pub fn built_in() -> Self {
        Self::with_source(TemplateSource::BuiltIn)
    }

    /// Templates from a glob such as `templates/questions/*.txt`; any question
    /// template missing there uses the built-in text
    pub fn from_glob(glob: impl Into<String>) -> Self {
        Self::with_source(TemplateSource::Glob(glob.into()))
    }

    fn with_source(source: TemplateSource) -> Self {
        TemplateQuestionRenderer {
            source,
            inner: RwLock::new(Inner {
                state: RendererState::Uninitialized,
                tera: None,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Compiles the templates. A no-op once ready; retries after a failure.
    pub fn load(&self) -> Result<(), RenderError> {
        {
            let mut inner = self.write();
            match inner.state {
                RendererState::Ready | RendererState::Loading => return Ok(()),
                _ => inner.state = RendererState::Loading,
            }
        }

        log::info!("Loading question templates from {:?}", self.source);
        let compiled = self.compile();

        let mut inner = self.write();
        match compiled {
            Ok(tera) => {
                inner.tera = Some(tera);
                inner.state = RendererState::Ready;
                log::info!("Question templates loaded");
                Ok(())
            }
            Err(e) => {
                inner.tera = None;
                inner.state = RendererState::Failed(e.to_string());
                log::error!("Failed to load question templates: {}", e);
                Err(e)
            }
        }
    }

    fn compile(&self) -> Result<Tera, RenderError> {
        let mut tera = match &self.source {
            TemplateSource::BuiltIn => Tera::default(),
            TemplateSource::Glob(glob) => Tera::new(glob)?,
        };
        tera.autoescape_on(Vec::new());

        let existing: Vec<String> = tera.get_template_names().map(str::to_string).collect();
        for (name, body) in BUILT_IN_TEMPLATES {
            if !existing.iter().any(|n| n == name) {
                tera.add_raw_template(name, body)?;
            }
        }
        Ok(tera)
    }
}

impl QuestionRenderer for TemplateQuestionRenderer {
    fn state(&self) -> RendererState {
        self.read().state.clone()
    }

    fn render(&self, prompt: &QuestionPrompt) -> Result<RenderedQuestion, RenderError> {
        let inner = self.read();
        let tera = match (&inner.state, &inner.tera) {
            (RendererState::Ready, Some(tera)) => tera,
            (state, _) => return Err(RenderError::NotReady(state.clone())),
        };

        let mut context = Context::new();
        let template = match prompt {
            QuestionPrompt::FillBlank { word, blanked, sentence_translation } => {
                context.insert("word", word);
                context.insert("blanked", blanked);
                context.insert("sentence_translation", sentence_translation);
                FILL_BLANK_TEMPLATE
            }
            QuestionPrompt::Translation { word, translation } => {
                context.insert("word", word);
                context.insert("translation", translation);
                TRANSLATION_TEMPLATE
            }
            QuestionPrompt::Definition { word } => {
                context.insert("word", word);
                DEFINITION_TEMPLATE
            }
            QuestionPrompt::EnglishFor { word, translation } => {
                context.insert("word", word);
                context.insert("translation", translation);
                ENGLISH_FOR_TEMPLATE
            }
            QuestionPrompt::WordMeaning { word, meaning } => {
                context.insert("word", word);
                context.insert("meaning", meaning);
                WORD_MEANING_TEMPLATE
            }
        };

        let question_text = collapse_whitespace(&tera.render(template, &context)?);
        Ok(RenderedQuestion {
            question_text,
            explanation: explanation_for(prompt),
        })
    }
}
