use axum::{Json, extract::State, http::StatusCode};
use tower_sessions::Session;
use validator::Validate;

use crate::data::models::{AuthError, RegisterForm, UserResponse};
use crate::data::repositories::UserRepository;
use crate::handlers::AppState;
use crate::utils::set_user_session;

pub async fn handle_register(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, Json<UserResponse>), AuthError> {
    form.validate()?;

    let mut conn = state.pool.get().map_err(|e| {
        log::error!("Failed to get DB connection: {}", e);
        AuthError::PoolError(e)
    })?;

    if UserRepository::email_exists(&mut conn, &form.email)? {
        log::warn!("Registration attempt with existing email: {}", form.email);
        return Err(AuthError::EmailTaken);
    }

    let user = UserRepository::create_user(&mut conn, &form.email, &form.password).map_err(|e| {
        log::error!("User creation failed: {}", e);
        e
    })?;

    set_user_session(&session, user.user_id, &user.email).await?;

    log::info!("New user registered: {}", form.email);
    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            user_id: user.user_id,
            email: user.email,
        }),
    ))
}
