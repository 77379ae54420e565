use axum::{
    Router,
    routing::{get, post},
};

use super::AppState;

pub mod login;
pub mod register;

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register::handle_register))
        .route("/login", post(login::handle_login))
        .route("/logout", get(login::handle_logout))
}
