// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication middleware for Axum.
//!
//! [`auth_layer`] resolves `Authorization: Bearer tly_…` into an
//! [`AuthContext`] stored in request extensions; [`RequireAuth`] rejects
//! requests without one.
//!
//! # Security Properties
//!
//! - Tokens are hashed with SHA-256 before lookup; raw tokens are never stored or logged.
//! - Session expiry is checked on every request.
//! - Failed lookups are logged at debug level without token details.

use std::sync::Arc;

use axum::{
	body::Body,
	extract::{FromRequestParts, State},
	http::{request::Parts, Request},
	middleware::Next,
	response::Response,
};
use chrono::Utc;
use tally_server_auth::{
	extract_bearer_token, hash_token, session::is_valid_session_token_format, AuthContext, CurrentUser,
};
use tally_server_db::{SessionStore, UserStore};
use tracing::instrument;

use crate::{api::AppState, error::ServerError};

/// Authentication middleware that stores an `AuthContext` for downstream handlers.
///
/// Requests without a valid bearer token continue unauthenticated; individual
/// handlers decide whether that is acceptable.
#[instrument(
	name = "auth_layer",
	skip(state, request, next),
	fields(user_id = tracing::field::Empty)
)]
pub async fn auth_layer(State(state): State<AppState>, mut request: Request<Body>, next: Next) -> Response {
	let auth_ctx = match extract_bearer_token(request.headers()) {
		Some(token) => authenticate_session(&token, &state.session_repo, &state.user_repo)
			.await
			.unwrap_or_else(AuthContext::unauthenticated),
		None => AuthContext::unauthenticated(),
	};

	if let Some(user) = auth_ctx.user() {
		tracing::Span::current().record("user_id", tracing::field::display(&user.user.id));
	}

	request.extensions_mut().insert(auth_ctx);
	next.run(request).await
}

/// Validates a bearer token against the session store.
#[instrument(skip_all, fields(session_id = tracing::field::Empty))]
async fn authenticate_session(
	token: &str,
	session_repo: &Arc<dyn SessionStore>,
	user_repo: &Arc<dyn UserStore>,
) -> Option<AuthContext> {
	if !is_valid_session_token_format(token) {
		tracing::debug!("Malformed bearer token");
		return None;
	}

	let token_hash = hash_token(token);
	let session = match session_repo.get_session_by_token_hash(&token_hash).await {
		Ok(Some(session)) => session,
		Ok(None) => {
			tracing::debug!("Session not found for token hash");
			return None;
		}
		Err(e) => {
			tracing::error!(error = %e, "Failed to look up session");
			return None;
		}
	};

	tracing::Span::current().record("session_id", tracing::field::display(&session.id));

	if session.is_expired_at(Utc::now()) {
		tracing::debug!(session_id = %session.id, "Session expired");
		return None;
	}

	let user = match user_repo.get_user_by_id(&session.user_id).await {
		Ok(Some(user)) => user,
		Ok(None) => {
			tracing::warn!(user_id = %session.user_id, "User not found for valid session");
			return None;
		}
		Err(e) => {
			tracing::error!(error = %e, "Failed to look up user");
			return None;
		}
	};

	Some(AuthContext::authenticated(CurrentUser::from_session(user, session.id)))
}

/// Extractor that requires authentication.
///
/// ```ignore
/// async fn me(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     user.user.display_name()
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
	S: Send + Sync,
{
	type Rejection = ServerError;

	#[instrument(name = "RequireAuth::from_request_parts", skip_all)]
	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let auth_ctx = parts
			.extensions
			.get::<AuthContext>()
			.cloned()
			.unwrap_or_else(AuthContext::unauthenticated);

		match auth_ctx.current_user {
			Some(user) => Ok(RequireAuth(user)),
			None => Err(ServerError::Unauthorized("authentication required".to_string())),
		}
	}
}
