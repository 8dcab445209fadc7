// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity and authorization primitives for the Tally server.
//!
//! - [`types`]: ID newtypes and [`WorkspaceRole`]
//! - [`policy`]: the action table and [`authorize`]
//! - [`session`]: bearer token generation and hashing
//! - [`password`]: Argon2 password hashing
//! - [`user`]: profiles and signup validation
//! - [`middleware`]: [`CurrentUser`] and [`AuthContext`] carried through requests

pub mod error;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod session;
pub mod types;
pub mod user;

pub use error::{AuthError, Result};
pub use middleware::{extract_bearer_token, AuthContext, AuthRequired, CurrentUser};
pub use password::{hash_password, validate_password, verify_password, DEFAULT_MIN_PASSWORD_LEN};
pub use policy::{allowed_roles, authorize, AccessDecision, AccessDenied, Action};
pub use session::{
	generate_session_token, hash_token, Session, DEFAULT_SESSION_TTL_HOURS, SESSION_TOKEN_PREFIX,
};
pub use types::{ExpenseId, InvalidRole, SessionId, UserId, WorkspaceId, WorkspaceRole};
pub use user::{is_valid_email, sanitize_email, NewUser, UserProfile};
