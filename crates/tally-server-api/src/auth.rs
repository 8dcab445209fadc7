// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_server_auth::UserProfile;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SignupRequest {
	pub email: String,
	pub password: String,
	pub first_name: String,
	pub last_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SigninRequest {
	pub email: String,
	pub password: String,
}

/// A user profile as shown to other workspace members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
	pub id: Uuid,
	pub email: String,
	pub first_name: String,
	pub last_name: String,
	pub display_name: String,
}

impl From<&UserProfile> for UserResponse {
	fn from(user: &UserProfile) -> Self {
		Self {
			id: user.id.into_inner(),
			email: user.email.clone(),
			first_name: user.first_name.clone(),
			last_name: user.last_name.clone(),
			display_name: user.display_name(),
		}
	}
}

impl From<UserProfile> for UserResponse {
	fn from(user: UserProfile) -> Self {
		UserResponse::from(&user)
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserResponse {
	#[serde(flatten)]
	pub user: UserResponse,
	pub created_at: DateTime<Utc>,
}

impl From<&UserProfile> for CurrentUserResponse {
	fn from(user: &UserProfile) -> Self {
		Self {
			user: user.into(),
			created_at: user.created_at,
		}
	}
}

/// Returned by signin. The token is shown exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SigninResponse {
	pub token: String,
	pub expires_at: DateTime<Utc>,
	pub user: UserResponse,
}
