// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Workspaces, memberships and the rules that keep every workspace owned.
//!
//! The action table decides *whether* a caller may manage members at all.
//! The checks here decide whether a specific change is acceptable:
//!
//! - invites cannot grant `owner`;
//! - only an owner may grant, revoke or remove the `owner` role;
//! - the last owner can be neither demoted nor removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_server_auth::{UserId, WorkspaceId, WorkspaceRole};

use crate::error::MembershipError;

pub const MAX_WORKSPACE_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
	pub id: WorkspaceId,
	pub name: String,
	pub owner_id: UserId,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Workspace {
	pub fn new(name: String, owner_id: UserId, now: DateTime<Utc>) -> Self {
		Self {
			id: WorkspaceId::generate(),
			name,
			owner_id,
			created_at: now,
			updated_at: now,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
	pub workspace_id: WorkspaceId,
	pub user_id: UserId,
	pub role: WorkspaceRole,
	pub created_at: DateTime<Utc>,
}

pub fn validate_workspace_name(name: &str) -> Result<String, MembershipError> {
	let name = name.trim();
	if name.is_empty() {
		return Err(MembershipError::MissingName);
	}
	if name.chars().count() > MAX_WORKSPACE_NAME_LEN {
		return Err(MembershipError::NameTooLong {
			max: MAX_WORKSPACE_NAME_LEN,
		});
	}
	Ok(name.to_string())
}

/// Roles an invite may assign.
pub fn check_invite_role(role: WorkspaceRole) -> Result<(), MembershipError> {
	if role == WorkspaceRole::Owner {
		return Err(MembershipError::OwnerInvite);
	}
	Ok(())
}

/// Validates changing `current` to `new_role`.
///
/// `owner_count` is the number of owner memberships in the workspace before
/// the change.
pub fn check_role_change(
	actor_role: WorkspaceRole,
	current: WorkspaceRole,
	new_role: WorkspaceRole,
	owner_count: u64,
) -> Result<(), MembershipError> {
	let touches_owner = current == WorkspaceRole::Owner || new_role == WorkspaceRole::Owner;
	if touches_owner && actor_role != WorkspaceRole::Owner {
		return Err(MembershipError::OwnerOnly);
	}
	if current == WorkspaceRole::Owner && new_role != WorkspaceRole::Owner && owner_count <= 1 {
		return Err(MembershipError::LastOwner);
	}
	Ok(())
}

/// Validates removing a member currently holding `target_role`.
pub fn check_removal(
	actor_role: WorkspaceRole,
	target_role: WorkspaceRole,
	owner_count: u64,
) -> Result<(), MembershipError> {
	if target_role == WorkspaceRole::Owner {
		if actor_role != WorkspaceRole::Owner {
			return Err(MembershipError::OwnerOnly);
		}
		if owner_count <= 1 {
			return Err(MembershipError::LastOwner);
		}
	}
	Ok(())
}

/// Validates handing ownership from `from` to `to`.
pub fn check_transfer(from: UserId, to: UserId) -> Result<(), MembershipError> {
	if from == to {
		return Err(MembershipError::TransferToSelf);
	}
	Ok(())
}
