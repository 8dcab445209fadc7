// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_expense_core::Membership;
use tally_server_auth::{UserProfile, WorkspaceRole};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::UserResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceRoleApi {
	Owner,
	Admin,
	Member,
	Viewer,
}

impl From<WorkspaceRole> for WorkspaceRoleApi {
	fn from(v: WorkspaceRole) -> Self {
		match v {
			WorkspaceRole::Owner => WorkspaceRoleApi::Owner,
			WorkspaceRole::Admin => WorkspaceRoleApi::Admin,
			WorkspaceRole::Member => WorkspaceRoleApi::Member,
			WorkspaceRole::Viewer => WorkspaceRoleApi::Viewer,
		}
	}
}

impl From<WorkspaceRoleApi> for WorkspaceRole {
	fn from(v: WorkspaceRoleApi) -> Self {
		match v {
			WorkspaceRoleApi::Owner => WorkspaceRole::Owner,
			WorkspaceRoleApi::Admin => WorkspaceRole::Admin,
			WorkspaceRoleApi::Member => WorkspaceRole::Member,
			WorkspaceRoleApi::Viewer => WorkspaceRole::Viewer,
		}
	}
}

/// Invite an existing user by email.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InviteMemberRequest {
	pub email: String,
	/// One of `admin`, `member` or `viewer`.
	pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateMemberRoleRequest {
	pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransferOwnershipRequest {
	pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberResponse {
	pub user: UserResponse,
	pub role: WorkspaceRoleApi,
	pub joined_at: DateTime<Utc>,
}

impl MemberResponse {
	pub fn new(membership: &Membership, user: &UserProfile) -> Self {
		Self {
			user: user.into(),
			role: membership.role.into(),
			joined_at: membership.created_at,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListMembersResponse {
	pub members: Vec<MemberResponse>,
}
