// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Workspace HTTP handlers.
//!
//! - Create workspace (caller becomes owner)
//! - List the caller's workspaces with their role
//! - Transfer ownership to another member

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use chrono::Utc;
use tally_expense_core::{check_transfer, validate_workspace_name, Workspace};
use tally_server_auth::{Action, UserId, WorkspaceId, WorkspaceRole};

pub use tally_server_api::{
	CreateWorkspaceRequest, ListWorkspacesResponse, TransferOwnershipRequest, WorkspaceResponse,
};

use crate::{
	access::require_action, api::AppState, auth_middleware::RequireAuth, error::ServerError,
	extract::ApiJson,
};

#[utoipa::path(
    post,
    path = "/api/workspaces",
    request_body = CreateWorkspaceRequest,
    responses(
        (status = 201, description = "Workspace created", body = WorkspaceResponse),
        (status = 400, description = "Invalid name", body = tally_server_api::ErrorResponse),
        (status = 401, description = "Not authenticated", body = tally_server_api::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "workspaces"
)]
#[tracing::instrument(skip(state, payload, current_user), fields(user_id = %current_user.user.id))]
pub async fn create_workspace(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	ApiJson(payload): ApiJson<CreateWorkspaceRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let name = validate_workspace_name(&payload.name)?;
	let workspace = Workspace::new(name, current_user.user_id(), Utc::now());
	state.workspace_repo.create_workspace(&workspace).await?;

	tracing::info!(workspace_id = %workspace.id, "workspace created");
	Ok((
		StatusCode::CREATED,
		Json(WorkspaceResponse::new(&workspace, WorkspaceRole::Owner)),
	))
}

#[utoipa::path(
    get,
    path = "/api/workspaces",
    responses(
        (status = 200, description = "Workspaces the caller belongs to", body = ListWorkspacesResponse),
        (status = 401, description = "Not authenticated", body = tally_server_api::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "workspaces"
)]
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id))]
pub async fn list_workspaces(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
) -> Result<Json<ListWorkspacesResponse>, ServerError> {
	let workspaces = state
		.workspace_repo
		.list_workspaces_for_user(&current_user.user_id())
		.await?
		.iter()
		.map(|(workspace, role)| WorkspaceResponse::new(workspace, *role))
		.collect();

	Ok(Json(ListWorkspacesResponse { workspaces }))
}

#[utoipa::path(
    post,
    path = "/api/workspaces/{workspace_id}/transfer-ownership",
    params(("workspace_id" = uuid::Uuid, Path, description = "Workspace ID")),
    request_body = TransferOwnershipRequest,
    responses(
        (status = 200, description = "Ownership transferred; caller is now admin", body = WorkspaceResponse),
        (status = 400, description = "Transfer to self", body = tally_server_api::ErrorResponse),
        (status = 403, description = "Caller is not an owner", body = tally_server_api::ErrorResponse),
        (status = 404, description = "Target is not a member", body = tally_server_api::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "workspaces"
)]
#[tracing::instrument(
	skip(state, payload, current_user),
	fields(user_id = %current_user.user.id, workspace_id = %workspace_id, new_owner = %payload.user_id)
)]
pub async fn transfer_ownership(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(workspace_id): Path<WorkspaceId>,
	ApiJson(payload): ApiJson<TransferOwnershipRequest>,
) -> Result<Json<WorkspaceResponse>, ServerError> {
	let caller = current_user.user_id();
	require_action(
		state.role_registry.as_ref(),
		&workspace_id,
		&caller,
		Action::TransferOwnership,
	)
	.await?;

	let new_owner = UserId::new(payload.user_id);
	check_transfer(caller, new_owner)?;
	state
		.workspace_repo
		.transfer_ownership(&workspace_id, &caller, &new_owner)
		.await?;

	let workspace = state
		.workspace_repo
		.get_workspace(&workspace_id)
		.await?
		.ok_or_else(|| ServerError::NotFound("workspace not found".to_string()))?;

	tracing::info!("workspace ownership transferred");
	Ok(Json(WorkspaceResponse::new(&workspace, WorkspaceRole::Admin)))
}
