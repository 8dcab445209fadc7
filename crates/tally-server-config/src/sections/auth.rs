// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity and session configuration.

use serde::Deserialize;

const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;
const DEFAULT_MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct AuthConfig {
	/// Lifetime of a signin session.
	pub session_ttl_hours: i64,
	/// Minimum password length accepted at signup.
	pub min_password_len: usize,
}

impl Default for AuthConfig {
	fn default() -> Self {
		AuthConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub session_ttl_hours: Option<i64>,
	#[serde(default)]
	pub min_password_len: Option<usize>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.session_ttl_hours.is_some() {
			self.session_ttl_hours = other.session_ttl_hours;
		}
		if other.min_password_len.is_some() {
			self.min_password_len = other.min_password_len;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			session_ttl_hours: self.session_ttl_hours.unwrap_or(DEFAULT_SESSION_TTL_HOURS),
			min_password_len: self.min_password_len.unwrap_or(DEFAULT_MIN_PASSWORD_LEN),
		}
	}
}
