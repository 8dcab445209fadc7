// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Internal: {0}")]
	Internal(String),
}

impl DbError {
	/// Maps a unique-constraint violation to `Conflict`, passing other errors through.
	pub(crate) fn unique_violation_as_conflict(err: sqlx::Error, message: impl Into<String>) -> Self {
		match &err {
			sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DbError::Conflict(message.into()),
			_ => DbError::Sqlx(err),
		}
	}
}

pub type Result<T> = std::result::Result<T, DbError>;
