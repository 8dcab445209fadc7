// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.
//!
//! | Variant | HTTP | `error` code |
//! |---|---|---|
//! | `Validation` | 400 | `validation_error` |
//! | `Unauthorized` | 401 | `unauthorized` |
//! | `NotAMember` | 403 | `not_a_member` |
//! | `ForbiddenRole` | 403 | `insufficient_role` |
//! | `Forbidden` | 403 | `forbidden` |
//! | `SelfApproval` | 403 | `self_approval` |
//! | `NotFound` | 404 | `not_found` |
//! | `UserNotFound` | 404 | `user_not_found` |
//! | `Conflict` | 409 | `conflict` |
//! | `Store` | 500 | `internal_error` |

use axum::{
	extract::rejection::JsonRejection,
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use tally_expense_core::{BudgetError, ExpenseError, MembershipError, ReviewError};
use tally_server_api::ErrorResponse;
use tally_server_auth::{AccessDenied, AuthError, InvalidRole, WorkspaceRole};
use tally_server_db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("{0}")]
	Validation(String),

	#[error("{0}")]
	Unauthorized(String),

	#[error("not a workspace member")]
	NotAMember,

	#[error("{}", role_denial_message(.required, .actual))]
	ForbiddenRole {
		required: &'static [WorkspaceRole],
		actual: WorkspaceRole,
	},

	#[error("{0}")]
	Forbidden(String),

	#[error("cannot review your own expense")]
	SelfApproval,

	#[error("{0}")]
	NotFound(String),

	/// An invite named an email with no account.
	#[error("no user with that email")]
	UserNotFound,

	#[error("{0}")]
	Conflict(String),

	/// Details are logged, never returned to the client.
	#[error("store error: {0}")]
	Store(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;

fn role_denial_message(required: &&'static [WorkspaceRole], actual: &WorkspaceRole) -> String {
	AccessDenied::InsufficientRole {
		required: *required,
		actual: *actual,
	}
	.to_string()
}

impl ServerError {
	pub fn status(&self) -> StatusCode {
		match self {
			ServerError::Validation(_) => StatusCode::BAD_REQUEST,
			ServerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
			ServerError::NotAMember
			| ServerError::ForbiddenRole { .. }
			| ServerError::Forbidden(_)
			| ServerError::SelfApproval => StatusCode::FORBIDDEN,
			ServerError::NotFound(_) | ServerError::UserNotFound => StatusCode::NOT_FOUND,
			ServerError::Conflict(_) => StatusCode::CONFLICT,
			ServerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn code(&self) -> &'static str {
		match self {
			ServerError::Validation(_) => "validation_error",
			ServerError::Unauthorized(_) => "unauthorized",
			ServerError::NotAMember => "not_a_member",
			ServerError::ForbiddenRole { .. } => "insufficient_role",
			ServerError::Forbidden(_) => "forbidden",
			ServerError::SelfApproval => "self_approval",
			ServerError::NotFound(_) => "not_found",
			ServerError::UserNotFound => "user_not_found",
			ServerError::Conflict(_) => "conflict",
			ServerError::Store(_) => "internal_error",
		}
	}

	fn body(&self) -> ErrorResponse {
		match self {
			ServerError::Store(_) => ErrorResponse::new(self.code(), "An internal error occurred"),
			ServerError::ForbiddenRole { required, actual } => {
				let mut body = ErrorResponse::new(self.code(), self.to_string());
				body.required = Some(required.iter().map(|r| r.as_str().to_string()).collect());
				body.your_role = Some(actual.as_str().to_string());
				body
			}
			_ => ErrorResponse::new(self.code(), self.to_string()),
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		match &self {
			ServerError::Store(detail) => tracing::error!(error = %detail, "store error"),
			ServerError::Unauthorized(_) => tracing::debug!(error = %self, "unauthorized"),
			_ => tracing::debug!(code = self.code(), error = %self, "request rejected"),
		}
		(self.status(), Json(self.body())).into_response()
	}
}

impl From<DbError> for ServerError {
	fn from(err: DbError) -> Self {
		match err {
			DbError::NotFound(what) => ServerError::NotFound(format!("{what} not found")),
			DbError::Conflict(msg) => ServerError::Conflict(msg),
			other => ServerError::Store(other.to_string()),
		}
	}
}

impl From<AccessDenied> for ServerError {
	fn from(err: AccessDenied) -> Self {
		match err {
			AccessDenied::NotAMember => ServerError::NotAMember,
			AccessDenied::InsufficientRole { required, actual } => ServerError::ForbiddenRole { required, actual },
		}
	}
}

impl From<ReviewError> for ServerError {
	fn from(err: ReviewError) -> Self {
		match err {
			ReviewError::SelfApproval => ServerError::SelfApproval,
			ReviewError::InvalidAction(_) => ServerError::Validation(err.to_string()),
			ReviewError::AlreadyReviewed(_) => ServerError::Conflict(err.to_string()),
		}
	}
}

impl From<ExpenseError> for ServerError {
	fn from(err: ExpenseError) -> Self {
		match err {
			ExpenseError::NotPending(_) => ServerError::Conflict(err.to_string()),
			ExpenseError::UnknownStatus(_) => ServerError::Store(err.to_string()),
			_ => ServerError::Validation(err.to_string()),
		}
	}
}

impl From<BudgetError> for ServerError {
	fn from(err: BudgetError) -> Self {
		match err {
			BudgetError::SpendOverflow(_) => ServerError::Store(err.to_string()),
			_ => ServerError::Validation(err.to_string()),
		}
	}
}

impl From<MembershipError> for ServerError {
	fn from(err: MembershipError) -> Self {
		match err {
			MembershipError::OwnerOnly => ServerError::Forbidden(err.to_string()),
			MembershipError::LastOwner => ServerError::Conflict(err.to_string()),
			_ => ServerError::Validation(err.to_string()),
		}
	}
}

impl From<AuthError> for ServerError {
	fn from(err: AuthError) -> Self {
		match err {
			AuthError::InvalidCredentials | AuthError::SessionExpired => ServerError::Unauthorized(err.to_string()),
			AuthError::Hashing(_) => ServerError::Store(err.to_string()),
			_ => ServerError::Validation(err.to_string()),
		}
	}
}

impl From<JsonRejection> for ServerError {
	fn from(rejection: JsonRejection) -> Self {
		ServerError::Validation(rejection.body_text())
	}
}

impl From<InvalidRole> for ServerError {
	fn from(err: InvalidRole) -> Self {
		ServerError::Validation(err.to_string())
	}
}
