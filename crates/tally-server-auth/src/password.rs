// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password hashing and credential validation for local signup/signin.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::{AuthError, Result};

/// Minimum password length applied when configuration does not override it.
pub const DEFAULT_MIN_PASSWORD_LEN: usize = 8;

/// Argon2id with the library defaults (19 MiB, 2 passes). Unit tests hash with
/// 1 MiB and a single pass.
fn hasher() -> Argon2<'static> {
	#[cfg(test)]
	let params = Params::new(1024, 1, 1, None).ok();
	#[cfg(not(test))]
	let params: Option<Params> = None;

	match params {
		Some(params) => Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
		None => Argon2::default(),
	}
}

/// Hashes a password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String> {
	let salt = SaltString::generate(&mut OsRng);

	hasher()
		.hash_password(password.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verifies a password against a stored PHC string.
///
/// A malformed stored hash is reported as an error; a mismatch is `Ok(false)`.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
	let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hashing(e.to_string()))?;

	Ok(hasher()
		.verify_password(password.as_bytes(), &parsed)
		.is_ok())
}

/// Rejects passwords shorter than `min_len` characters.
pub fn validate_password(password: &str, min_len: usize) -> Result<()> {
	if password.chars().count() < min_len {
		return Err(AuthError::PasswordTooShort { min: min_len });
	}
	Ok(())
}
