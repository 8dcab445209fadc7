// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Errors raised by the identity helpers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
	#[error("invalid email address")]
	InvalidEmail,

	#[error("password must be at least {min} characters")]
	PasswordTooShort { min: usize },

	#[error("{0} is required")]
	MissingField(&'static str),

	#[error("invalid email or password")]
	InvalidCredentials,

	#[error("session expired")]
	SessionExpired,

	#[error("password hashing failed: {0}")]
	Hashing(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
