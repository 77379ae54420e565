pub mod session;
pub mod text;

pub use session::{require_user, set_user_session};
