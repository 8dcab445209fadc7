// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_expense_core::Workspace;
use tally_server_auth::WorkspaceRole;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::members::WorkspaceRoleApi;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateWorkspaceRequest {
	pub name: String,
}

/// A workspace together with the caller's role in it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkspaceResponse {
	pub id: Uuid,
	pub name: String,
	pub owner_id: Uuid,
	pub role: WorkspaceRoleApi,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl WorkspaceResponse {
	pub fn new(workspace: &Workspace, role: WorkspaceRole) -> Self {
		Self {
			id: workspace.id.into_inner(),
			name: workspace.name.clone(),
			owner_id: workspace.owner_id.into_inner(),
			role: role.into(),
			created_at: workspace.created_at,
			updated_at: workspace.updated_at,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListWorkspacesResponse {
	pub workspaces: Vec<WorkspaceResponse>,
}
