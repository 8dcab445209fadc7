// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User profiles and signup input validation.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{AuthError, Result};
use crate::password::validate_password;
use crate::UserId;

static EMAIL_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// A user profile. The password hash is kept by the store and never leaves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	pub id: UserId,
	pub email: String,
	pub first_name: String,
	pub last_name: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl UserProfile {
	/// "First Last", falling back to the email when both names are empty.
	pub fn display_name(&self) -> String {
		let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
		let name = name.trim();
		if name.is_empty() {
			self.email.clone()
		} else {
			name.to_string()
		}
	}
}

/// Validated signup input.
#[derive(Debug, Clone)]
pub struct NewUser {
	pub email: String,
	pub first_name: String,
	pub last_name: String,
	pub password: String,
}

impl NewUser {
	/// Normalizes the email and checks email format, names and password length.
	pub fn validate(
		email: &str,
		password: &str,
		first_name: &str,
		last_name: &str,
		min_password_len: usize,
	) -> Result<Self> {
		let email = sanitize_email(email);
		if !is_valid_email(&email) {
			return Err(AuthError::InvalidEmail);
		}
		let first_name = first_name.trim();
		if first_name.is_empty() {
			return Err(AuthError::MissingField("first_name"));
		}
		let last_name = last_name.trim();
		if last_name.is_empty() {
			return Err(AuthError::MissingField("last_name"));
		}
		validate_password(password, min_password_len)?;

		Ok(Self {
			email,
			first_name: first_name.to_string(),
			last_name: last_name.to_string(),
			password: password.to_string(),
		})
	}
}

/// Sanitize an email address by trimming whitespace and lowercasing.
pub fn sanitize_email(email: &str) -> String {
	email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
	email.len() <= 254 && EMAIL_REGEX.is_match(email)
}
