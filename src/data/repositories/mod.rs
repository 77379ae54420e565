pub mod learning_store;
#[cfg(test)]
pub mod memory;
pub mod user;

pub use learning_store::{LearningStore, SqliteStore};
pub use user::UserRepository;
