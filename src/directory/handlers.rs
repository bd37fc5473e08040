use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::state::AppState;

use super::dto::{
    ActiveStatusRequest, CreateUserRequest, FindUserQuery, StatusResponse, UpdateUserRequest,
};
use super::error::DirectoryError;
use super::policy::check_manual_update;

pub fn find_routes() -> Router<AppState> {
    Router::new().route("/user", get(find_user))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/user/update", post(update_user))
        .route("/user/create", post(create_user))
        .route("/user/activate", post(activate_user))
        .route("/user/deactivate", post(deactivate_user))
}

/// GET /user — look up a user by external login.
#[instrument(skip(state))]
async fn find_user(
    State(state): State<AppState>,
    Query(q): Query<FindUserQuery>,
) -> Result<Response, DirectoryError> {
    let provider = q.provider.as_deref().unwrap_or(&state.config.provider.name);

    match state
        .repo
        .find_by_external_identity(&q.login, provider)
        .await
    {
        Ok(Some(user)) => Ok(Json(user).into_response()),
        Ok(None) => {
            info!(login = %q.login, %provider, "user not found");
            Ok(StatusCode::NOT_FOUND.into_response())
        }
        Err(e) => {
            error!(error = %e, login = %q.login, "find user failed");
            Err(e)
        }
    }
}

/// POST /user/update — manual edit of name/email/login, gated by the
/// ownership policy.
#[instrument(skip(state, payload))]
async fn update_user(
    State(state): State<AppState>,
    Form(payload): Form<UpdateUserRequest>,
) -> Result<Json<StatusResponse>, DirectoryError> {
    if let Err(e) = check_manual_update(&state.config.provider) {
        warn!(login = %payload.login, "manual update rejected by ownership policy");
        return Err(e);
    }

    let provider = &state.config.provider.name;
    // The external login doubles as the local login for provider-sourced users.
    match state
        .repo
        .update_user(
            &payload.login,
            &payload.name,
            &payload.email,
            &payload.login,
            provider,
        )
        .await
    {
        Ok(()) => Ok(Json(StatusResponse::ok())),
        Err(e) => {
            error!(error = %e, login = %payload.login, "update user failed");
            Err(e)
        }
    }
}

/// POST /user/create — idempotence is the store's unique index; the losing
/// caller of a duplicate create observes Conflict, mapped to 400.
#[instrument(skip(state, payload))]
async fn create_user(
    State(state): State<AppState>,
    Form(payload): Form<CreateUserRequest>,
) -> Result<StatusCode, DirectoryError> {
    let provider = payload
        .provider
        .as_deref()
        .unwrap_or(&state.config.provider.name);

    match state
        .repo
        .create_user(
            &payload.login,
            &payload.name,
            &payload.email,
            &payload.login,
            provider,
            &state.config.default_groups,
        )
        .await
    {
        Ok(created) => {
            if !created.skipped_groups.is_empty() {
                warn!(
                    login = %payload.login,
                    uuid = %created.uuid,
                    skipped = ?created.skipped_groups,
                    "user created but not linked to all default groups"
                );
            }
            Ok(StatusCode::OK)
        }
        Err(e) => {
            error!(error = %e, login = %payload.login, "create user failed");
            Err(e)
        }
    }
}

/// POST /user/activate
#[instrument(skip(state, payload))]
async fn activate_user(
    State(state): State<AppState>,
    Form(payload): Form<ActiveStatusRequest>,
) -> Result<Json<StatusResponse>, DirectoryError> {
    change_active_status(state, payload, true).await
}

/// POST /user/deactivate
#[instrument(skip(state, payload))]
async fn deactivate_user(
    State(state): State<AppState>,
    Form(payload): Form<ActiveStatusRequest>,
) -> Result<Json<StatusResponse>, DirectoryError> {
    change_active_status(state, payload, false).await
}

/// Shared, policy-free implementation for activate/deactivate.
async fn change_active_status(
    state: AppState,
    payload: ActiveStatusRequest,
    active: bool,
) -> Result<Json<StatusResponse>, DirectoryError> {
    let provider = payload
        .provider
        .as_deref()
        .unwrap_or(&state.config.provider.name);

    match state.repo.set_active(&payload.login, provider, active).await {
        Ok(()) => Ok(Json(StatusResponse::ok())),
        Err(e) => {
            error!(error = %e, login = %payload.login, %active, "set active failed");
            Err(e)
        }
    }
}
