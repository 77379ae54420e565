pub mod renderer;
pub mod sampling;
pub mod selection;

pub use renderer::{QuestionRenderer, RendererState, TemplateQuestionRenderer};
pub use selection::{QuestionSubject, QuizSelectionPolicy};
