// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Workspace membership handlers.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use tally_expense_core::{check_invite_role, check_removal, check_role_change, Membership};
use tally_server_auth::{sanitize_email, Action, UserId, WorkspaceId, WorkspaceRole};

pub use tally_server_api::{
	InviteMemberRequest, ListMembersResponse, MemberResponse, UpdateMemberRoleRequest,
};

use crate::{
	access::require_action, api::AppState, auth_middleware::RequireAuth, error::ServerError,
	extract::ApiJson,
};

async fn existing_membership(
	state: &AppState,
	workspace_id: &WorkspaceId,
	user_id: &UserId,
) -> Result<Membership, ServerError> {
	state
		.workspace_repo
		.get_membership(workspace_id, user_id)
		.await?
		.ok_or_else(|| ServerError::NotFound("member not found".to_string()))
}

async fn owner_count(state: &AppState, workspace_id: &WorkspaceId) -> Result<u64, ServerError> {
	let count = state.workspace_repo.count_owners(workspace_id).await?;
	Ok(u64::try_from(count).unwrap_or(0))
}

#[utoipa::path(
    get,
    path = "/api/workspaces/{workspace_id}/members",
    params(("workspace_id" = uuid::Uuid, Path, description = "Workspace ID")),
    responses(
        (status = 200, description = "Members with profiles", body = ListMembersResponse),
        (status = 403, description = "Not a member", body = tally_server_api::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "members"
)]
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id, workspace_id = %workspace_id))]
pub async fn list_members(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(workspace_id): Path<WorkspaceId>,
) -> Result<Json<ListMembersResponse>, ServerError> {
	require_action(
		state.role_registry.as_ref(),
		&workspace_id,
		&current_user.user_id(),
		Action::ViewMembers,
	)
	.await?;

	let members = state
		.workspace_repo
		.list_members(&workspace_id)
		.await?
		.iter()
		.map(|(membership, user)| MemberResponse::new(membership, user))
		.collect();

	Ok(Json(ListMembersResponse { members }))
}

#[utoipa::path(
    post,
    path = "/api/workspaces/{workspace_id}/members",
    params(("workspace_id" = uuid::Uuid, Path, description = "Workspace ID")),
    request_body = InviteMemberRequest,
    responses(
        (status = 201, description = "Member added", body = MemberResponse),
        (status = 400, description = "Invalid or owner role", body = tally_server_api::ErrorResponse),
        (status = 403, description = "Requires owner or admin", body = tally_server_api::ErrorResponse),
        (status = 404, description = "No user with that email", body = tally_server_api::ErrorResponse),
        (status = 409, description = "Already a member", body = tally_server_api::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "members"
)]
#[tracing::instrument(
	skip(state, payload, current_user),
	fields(user_id = %current_user.user.id, workspace_id = %workspace_id, role = %payload.role)
)]
pub async fn invite_member(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(workspace_id): Path<WorkspaceId>,
	ApiJson(payload): ApiJson<InviteMemberRequest>,
) -> Result<impl IntoResponse, ServerError> {
	require_action(
		state.role_registry.as_ref(),
		&workspace_id,
		&current_user.user_id(),
		Action::InviteMember,
	)
	.await?;

	let role: WorkspaceRole = payload.role.trim().parse()?;
	check_invite_role(role)?;

	let invitee = state
		.user_repo
		.get_user_by_email(&sanitize_email(&payload.email))
		.await?
		.ok_or(ServerError::UserNotFound)?;

	let membership = state
		.workspace_repo
		.add_member(&workspace_id, &invitee.id, role)
		.await?;

	tracing::info!(invitee_id = %invitee.id, "member invited");
	Ok((StatusCode::CREATED, Json(MemberResponse::new(&membership, &invitee))))
}

#[utoipa::path(
    put,
    path = "/api/workspaces/{workspace_id}/members/{user_id}",
    params(
        ("workspace_id" = uuid::Uuid, Path, description = "Workspace ID"),
        ("user_id" = uuid::Uuid, Path, description = "Member user ID")
    ),
    request_body = UpdateMemberRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = MemberResponse),
        (status = 400, description = "Invalid role", body = tally_server_api::ErrorResponse),
        (status = 403, description = "Requires owner or admin; owner role requires owner", body = tally_server_api::ErrorResponse),
        (status = 404, description = "Not a member", body = tally_server_api::ErrorResponse),
        (status = 409, description = "Would leave the workspace without an owner", body = tally_server_api::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "members"
)]
#[tracing::instrument(
	skip(state, payload, current_user),
	fields(actor_id = %current_user.user.id, workspace_id = %workspace_id, target_id = %target_id)
)]
pub async fn update_member_role(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((workspace_id, target_id)): Path<(WorkspaceId, UserId)>,
	ApiJson(payload): ApiJson<UpdateMemberRoleRequest>,
) -> Result<Json<MemberResponse>, ServerError> {
	let actor_role = require_action(
		state.role_registry.as_ref(),
		&workspace_id,
		&current_user.user_id(),
		Action::UpdateMemberRole,
	)
	.await?;

	let new_role: WorkspaceRole = payload.role.trim().parse()?;
	let current = existing_membership(&state, &workspace_id, &target_id).await?;
	let owners = owner_count(&state, &workspace_id).await?;
	check_role_change(actor_role, current.role, new_role, owners)?;

	state
		.workspace_repo
		.update_member_role(&workspace_id, &target_id, new_role)
		.await?;

	let user = state
		.user_repo
		.get_user_by_id(&target_id)
		.await?
		.ok_or_else(|| ServerError::NotFound("user not found".to_string()))?;

	tracing::info!(from = %current.role, to = %new_role, "member role updated");
	let updated = Membership {
		role: new_role,
		..current
	};
	Ok(Json(MemberResponse::new(&updated, &user)))
}

#[utoipa::path(
    delete,
    path = "/api/workspaces/{workspace_id}/members/{user_id}",
    params(
        ("workspace_id" = uuid::Uuid, Path, description = "Workspace ID"),
        ("user_id" = uuid::Uuid, Path, description = "Member user ID")
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 403, description = "Requires owner or admin; removing an owner requires owner", body = tally_server_api::ErrorResponse),
        (status = 404, description = "Not a member", body = tally_server_api::ErrorResponse),
        (status = 409, description = "Last owner", body = tally_server_api::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "members"
)]
#[tracing::instrument(
	skip(state, current_user),
	fields(actor_id = %current_user.user.id, workspace_id = %workspace_id, target_id = %target_id)
)]
pub async fn remove_member(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((workspace_id, target_id)): Path<(WorkspaceId, UserId)>,
) -> Result<StatusCode, ServerError> {
	let actor_role = require_action(
		state.role_registry.as_ref(),
		&workspace_id,
		&current_user.user_id(),
		Action::RemoveMember,
	)
	.await?;

	let target = existing_membership(&state, &workspace_id, &target_id).await?;
	let owners = owner_count(&state, &workspace_id).await?;
	check_removal(actor_role, target.role, owners)?;

	if !state.workspace_repo.remove_member(&workspace_id, &target_id).await? {
		return Err(ServerError::NotFound("member not found".to_string()));
	}

	tracing::info!(role = %target.role, "member removed");
	Ok(StatusCode::NO_CONTENT)
}
