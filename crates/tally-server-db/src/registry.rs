// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role lookup for access checks.

use async_trait::async_trait;
use tally_server_auth::{UserId, WorkspaceId, WorkspaceRole};

use crate::error::DbError;
use crate::workspace::WorkspaceRepository;

/// Resolves `(workspace, user)` to the user's role, or `None` if they are not
/// a member.
#[async_trait]
pub trait RoleRegistry: Send + Sync {
	async fn lookup_role(
		&self,
		workspace_id: &WorkspaceId,
		user_id: &UserId,
	) -> Result<Option<WorkspaceRole>, DbError>;
}

#[async_trait]
impl RoleRegistry for WorkspaceRepository {
	async fn lookup_role(
		&self,
		workspace_id: &WorkspaceId,
		user_id: &UserId,
	) -> Result<Option<WorkspaceRole>, DbError> {
		Ok(self
			.get_membership(workspace_id, user_id)
			.await?
			.map(|membership| membership.role))
	}
}
