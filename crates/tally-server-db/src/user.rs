// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User profile repository.
//!
//! Profiles double as the lookup table for invites: an invite names an email,
//! and the email must resolve to an existing profile.

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePool, Row};
use tally_server_auth::{UserId, UserProfile};

use crate::error::DbError;
use crate::rows::{format_ts, parse_id, parse_ts};

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn create_user(&self, profile: &UserProfile, password_hash: &str) -> Result<(), DbError>;
	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DbError>;
	async fn get_user_by_email(&self, email: &str) -> Result<Option<UserProfile>, DbError>;
	async fn get_credentials_by_email(&self, email: &str) -> Result<Option<(UserProfile, String)>, DbError>;
}

/// Repository for user profiles and their password hashes.
#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a profile with its Argon2 password hash.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the email is already registered.
	#[tracing::instrument(skip(self, profile, password_hash), fields(user_id = %profile.id))]
	pub async fn create_user(&self, profile: &UserProfile, password_hash: &str) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO users (id, email, first_name, last_name, password_hash, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(profile.id.to_string())
		.bind(&profile.email)
		.bind(&profile.first_name)
		.bind(&profile.last_name)
		.bind(password_hash)
		.bind(format_ts(&profile.created_at))
		.bind(format_ts(&profile.updated_at))
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::unique_violation_as_conflict(e, "email already registered"))?;

		tracing::debug!(user_id = %profile.id, "user created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_user_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, first_name, last_name, created_at, updated_at
			FROM users
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_profile(&r)).transpose()
	}

	/// Look up a profile by (already normalized) email.
	#[tracing::instrument(skip(self, email))]
	pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserProfile>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, first_name, last_name, created_at, updated_at
			FROM users
			WHERE email = ?
			"#,
		)
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_profile(&r)).transpose()
	}

	/// Profile plus stored password hash, for signin.
	#[tracing::instrument(skip(self, email))]
	pub async fn get_credentials_by_email(&self, email: &str) -> Result<Option<(UserProfile, String)>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, first_name, last_name, created_at, updated_at, password_hash
			FROM users
			WHERE email = ?
			"#,
		)
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;

		row
			.map(|r| {
				let profile = row_to_profile(&r)?;
				let hash: String = r.try_get("password_hash")?;
				Ok((profile, hash))
			})
			.transpose()
	}
}

/// Map a row carrying the profile columns. Column names may be aliased by
/// joins, so callers pass rows selected with these exact names.
pub(crate) fn row_to_profile(row: &sqlx::sqlite::SqliteRow) -> Result<UserProfile, DbError> {
	profile_from_columns(row, "id", "email", "first_name", "last_name", "created_at", "updated_at")
}

pub(crate) fn profile_from_columns(
	row: &sqlx::sqlite::SqliteRow,
	id: &str,
	email: &str,
	first_name: &str,
	last_name: &str,
	created_at: &str,
	updated_at: &str,
) -> Result<UserProfile, DbError> {
	let id_str: String = row.try_get(id)?;
	let created_at: String = row.try_get(created_at)?;
	let updated_at: String = row.try_get(updated_at)?;

	Ok(UserProfile {
		id: parse_id(&id_str, "user")?,
		email: row.try_get(email)?,
		first_name: row.try_get(first_name)?,
		last_name: row.try_get(last_name)?,
		created_at: parse_ts(&created_at)?,
		updated_at: parse_ts(&updated_at)?,
	})
}

#[async_trait]
impl UserStore for UserRepository {
	async fn create_user(&self, profile: &UserProfile, password_hash: &str) -> Result<(), DbError> {
		self.create_user(profile, password_hash).await
	}

	async fn get_user_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DbError> {
		self.get_user_by_id(id).await
	}

	async fn get_user_by_email(&self, email: &str) -> Result<Option<UserProfile>, DbError> {
		self.get_user_by_email(email).await
	}

	async fn get_credentials_by_email(&self, email: &str) -> Result<Option<(UserProfile, String)>, DbError> {
		self.get_credentials_by_email(email).await
	}
}
