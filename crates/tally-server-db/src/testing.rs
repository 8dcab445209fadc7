// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Helpers for repository tests.

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tally_server_auth::{UserId, UserProfile};

use crate::migrations::run_migrations;
use crate::user::UserRepository;

/// An in-memory database with the full schema applied.
///
/// Limited to one connection: every `:memory:` connection is its own database.
pub async fn create_test_pool() -> SqlitePool {
	let options = SqliteConnectOptions::from_str(":memory:")
		.unwrap()
		.foreign_keys(true)
		.create_if_missing(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect_with(options)
		.await
		.expect("Failed to create test pool");

	run_migrations(&pool).await.expect("Failed to run migrations");
	pool
}

/// Insert a user with a placeholder password hash.
pub async fn create_test_user(pool: &SqlitePool, email: &str) -> UserProfile {
	let now = Utc::now();
	let (first_name, last_name) = email
		.split_once('@')
		.map(|(local, _)| (local.to_string(), "Tester".to_string()))
		.unwrap_or_else(|| (email.to_string(), "Tester".to_string()));
	let profile = UserProfile {
		id: UserId::generate(),
		email: email.to_string(),
		first_name,
		last_name,
		created_at: now,
		updated_at: now,
	};

	UserRepository::new(pool.clone())
		.create_user(&profile, "$argon2id$placeholder")
		.await
		.expect("Failed to create test user");
	profile
}
