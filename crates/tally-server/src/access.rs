// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Handler-level workspace authorization.
//!
//! Every workspace-scoped handler resolves the caller's role through the
//! [`RoleRegistry`] and evaluates it against the action table before touching
//! any workspace data:
//!
//! ```ignore
//! let role = require_action(state.role_registry.as_ref(), &workspace_id, &user.user_id(), Action::SetBudget).await?;
//! ```

use tally_server_auth::{authorize, Action, UserId, WorkspaceId, WorkspaceRole};
use tally_server_db::RoleRegistry;
use tracing::instrument;

use crate::error::ServerError;

/// Returns the caller's role if it permits `action` in the workspace.
///
/// # Errors
/// - `ServerError::NotAMember` when the caller has no membership (including
///   unknown workspaces)
/// - `ServerError::ForbiddenRole` when the role is not in the action's allowed set
#[instrument(skip(registry), fields(workspace_id = %workspace_id, user_id = %user_id, action = %action))]
pub async fn require_action(
	registry: &dyn RoleRegistry,
	workspace_id: &WorkspaceId,
	user_id: &UserId,
	action: Action,
) -> Result<WorkspaceRole, ServerError> {
	let role = registry.lookup_role(workspace_id, user_id).await?;
	let decision = authorize(role, action);
	if !decision.is_allowed() {
		tracing::info!(role = ?role, "workspace access denied");
	}
	Ok(decision.into_result()?)
}
