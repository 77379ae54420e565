pub mod auth_models;
pub mod error_models;
pub mod goal_models;
pub mod quiz_models;
pub mod srs_models;
pub mod user_models;
pub mod vocabulary_models;

pub use auth_models::{AuthError, LoginForm, RegisterForm};
pub use error_models::{ApiError, StoreError};
pub use goal_models::{LearningGoal, LearningGoalCreate, LearningGoalRead, NewLearningGoal};
pub use quiz_models::{
    NewQuizSession, QuizGenerationRequest, QuizParams, QuizQuestion, QuizQuestionList,
    QuizResultDetail, QuizSession, QuizSessionCreate, QuizSessionRead, QuizStatistics,
    RecentQuizItem, StatisticsResponse,
};
pub use srs_models::{
    CalculateQualityRequest, CreateReviewScheduleRequest, DueReviewItem, NewReviewSchedule,
    QualityResponse, ReviewSchedule, ReviewScheduleResponse, ScheduleState,
    UpdateReviewScheduleRequest,
};
pub use user_models::{NewUser, User, UserResponse};
pub use vocabulary_models::{
    ContextSentence, ExampleSentenceRequest, ExampleSentenceResponse, VocabularyParams,
    VocabularyWordList, VocabularyWordRead, WordRef,
};
