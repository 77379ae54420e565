use axum::{Json, extract::State};
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::data::models::{AuthError, LoginForm, UserResponse};
use crate::data::repositories::UserRepository;
use crate::handlers::AppState;
use crate::utils::set_user_session;

pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<UserResponse>, AuthError> {
    let mut conn = state.pool.get().map_err(|e| {
        log::error!("Failed to get DB connection: {}", e);
        AuthError::PoolError(e)
    })?;

    let user = UserRepository::find_by_email(&mut conn, &form.email).map_err(|e| {
        log::error!("Database error during login: {}", e);
        AuthError::DatabaseError(e)
    })?;

    let Some(user) = user else {
        log::warn!("User not found: {}", form.email);
        return Err(AuthError::InvalidCredentials);
    };

    if !UserRepository::verify_password(&user.password, &form.password)? {
        log::warn!("Invalid password for user: {}", form.email);
        return Err(AuthError::InvalidCredentials);
    }

    set_user_session(&session, user.user_id, &user.email).await?;
    Ok(Json(UserResponse {
        user_id: user.user_id,
        email: user.email,
    }))
}

pub async fn handle_logout(session: Session) -> Result<Json<Value>, AuthError> {
    session.delete().await.map_err(|e| {
        log::error!("Failed to delete session: {}", e);
        AuthError::SessionError("Failed to logout".into())
    })?;
    Ok(Json(json!({ "message": "Logged out" })))
}
