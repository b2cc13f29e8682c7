//! Admin authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use seedling_core::Email;

use crate::db::AdminUserRepository;
use crate::error::{AdminError, Result};
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::auth::verify_password;
use crate::state::AdminState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// Admin login.
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AdminState>,
    session: Session,
    Json(body): Json<LoginBody>,
) -> Result<Json<Value>> {
    let email = Email::parse(&body.email)
        .map_err(|_| AdminError::Unauthorized("invalid credentials".to_owned()))?;

    let (admin, hash) = AdminUserRepository::new(state.admin_pool())
        .get_password_hash(&email)
        .await?
        .ok_or_else(|| AdminError::Unauthorized("invalid credentials".to_owned()))?;

    verify_password(&body.password, &hash)
        .map_err(|_| AdminError::Unauthorized("invalid credentials".to_owned()))?;

    session
        .cycle_id()
        .await
        .map_err(|e| AdminError::Internal(format!("failed to cycle session: {e}")))?;

    let current = CurrentAdmin {
        id: admin.id,
        email: admin.email.as_str().to_owned(),
        name: admin.name.clone(),
    };
    set_current_admin(&session, &current)
        .await
        .map_err(|e| AdminError::Internal(format!("failed to persist session: {e}")))?;

    tracing::info!(admin_id = %admin.id, "admin logged in");

    Ok(Json(json!({
        "id": admin.id,
        "email": admin.email,
        "name": admin.name,
    })))
}

/// Admin logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AdminError::Internal(format!("failed to clear session: {e}")))?;
    Ok(StatusCode::NO_CONTENT)
}
