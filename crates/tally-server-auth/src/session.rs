// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bearer session tokens.
//!
//! A signin issues an opaque token `tly_` + 64 hex characters (32 random bytes).
//! Only the SHA-256 hash of the token is persisted; the plaintext is returned
//! to the client once and never stored or logged.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{SessionId, UserId};

/// Prefix for all Tally session tokens.
pub const SESSION_TOKEN_PREFIX: &str = "tly_";

/// Number of random bytes in a session token (produces 64 hex chars).
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Default session lifetime (7 days).
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;

/// A persisted session. The token itself is not part of this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
	pub id: SessionId,
	pub user_id: UserId,
	/// SHA-256 hex digest of the bearer token.
	pub token_hash: String,
	pub created_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
}

impl Session {
	/// Create a session for `user_id` valid for `ttl_hours`.
	///
	/// Returns the session and the plaintext token to hand to the client.
	pub fn new(user_id: UserId, ttl_hours: i64) -> (Self, String) {
		let (token, token_hash) = generate_session_token();
		let now = Utc::now();

		let session = Self {
			id: SessionId::generate(),
			user_id,
			token_hash,
			created_at: now,
			expires_at: now + Duration::hours(ttl_hours),
		};

		(session, token)
	}

	pub fn is_expired(&self) -> bool {
		self.is_expired_at(Utc::now())
	}

	pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
		now >= self.expires_at
	}
}

/// Generate a new session token.
///
/// Returns a tuple of (plaintext_token, sha256_hash).
pub fn generate_session_token() -> (String, String) {
	use rand::Rng;
	let mut rng = rand::thread_rng();
	let bytes: [u8; SESSION_TOKEN_BYTES] = rng.gen();
	let token = format!("{}{}", SESSION_TOKEN_PREFIX, hex::encode(bytes));
	let hash = hash_token(&token);
	(token, hash)
}

/// Hash a bearer token using SHA-256.
///
/// Must match the hash used by the auth middleware for lookup.
pub fn hash_token(token: &str) -> String {
	use sha2::{Digest, Sha256};
	let mut hasher = Sha256::new();
	hasher.update(token.as_bytes());
	hex::encode(hasher.finalize())
}

/// Check if a string has the shape of a session token.
pub fn is_valid_session_token_format(token: &str) -> bool {
	token
		.strip_prefix(SESSION_TOKEN_PREFIX)
		.map(|hex_part| {
			hex_part.len() == SESSION_TOKEN_BYTES * 2 && hex_part.chars().all(|c| c.is_ascii_hexdigit())
		})
		.unwrap_or(false)
}
