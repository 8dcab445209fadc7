// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Local identity handlers: signup, signin, signout and the current profile.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use tally_server_auth::{
	hash_password, sanitize_email, verify_password, AuthError, NewUser, Session, UserId, UserProfile,
};

pub use tally_server_api::{CurrentUserResponse, SigninRequest, SigninResponse, SignupRequest, UserResponse};

use crate::{api::AppState, auth_middleware::RequireAuth, error::ServerError, extract::ApiJson};

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid email, name or password", body = tally_server_api::ErrorResponse),
        (status = 409, description = "Email already registered", body = tally_server_api::ErrorResponse)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn signup(
	State(state): State<AppState>,
	ApiJson(payload): ApiJson<SignupRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let new_user = NewUser::validate(
		&payload.email,
		&payload.password,
		&payload.first_name,
		&payload.last_name,
		state.auth_config.min_password_len,
	)?;
	let password_hash = hash_password(&new_user.password)?;

	let now = Utc::now();
	let profile = UserProfile {
		id: UserId::generate(),
		email: new_user.email,
		first_name: new_user.first_name,
		last_name: new_user.last_name,
		created_at: now,
		updated_at: now,
	};
	state.user_repo.create_user(&profile, &password_hash).await?;

	tracing::info!(user_id = %profile.id, "user signed up");
	Ok((StatusCode::CREATED, Json(UserResponse::from(&profile))))
}

#[utoipa::path(
    post,
    path = "/auth/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Session issued", body = SigninResponse),
        (status = 401, description = "Invalid email or password", body = tally_server_api::ErrorResponse)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn signin(
	State(state): State<AppState>,
	ApiJson(payload): ApiJson<SigninRequest>,
) -> Result<Json<SigninResponse>, ServerError> {
	let email = sanitize_email(&payload.email);
	let (user, password_hash) = state
		.user_repo
		.get_credentials_by_email(&email)
		.await?
		.ok_or(AuthError::InvalidCredentials)?;

	if !verify_password(&payload.password, &password_hash)? {
		tracing::debug!(user_id = %user.id, "password mismatch");
		return Err(AuthError::InvalidCredentials.into());
	}

	let (session, token) = Session::new(user.id, state.auth_config.session_ttl_hours);
	state.session_repo.create_session(&session).await?;

	tracing::info!(user_id = %user.id, session_id = %session.id, "user signed in");
	Ok(Json(SigninResponse {
		token,
		expires_at: session.expires_at,
		user: UserResponse::from(&user),
	}))
}

#[utoipa::path(
    post,
    path = "/auth/signout",
    responses(
        (status = 204, description = "Session deleted"),
        (status = 401, description = "Not authenticated", body = tally_server_api::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id))]
pub async fn signout(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
) -> Result<StatusCode, ServerError> {
	state.session_repo.delete_session(&current_user.session_id).await?;
	Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user profile", body = CurrentUserResponse),
        (status = 401, description = "Not authenticated", body = tally_server_api::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me(RequireAuth(current_user): RequireAuth) -> Json<CurrentUserResponse> {
	Json(CurrentUserResponse::from(&current_user.user))
}
