// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Expense HTTP handlers.
//!
//! Every mutation publishes an [`ExpenseEventKind`] on the event hub after the
//! store write succeeds, so SSE subscribers never see an event for a change that
//! was rolled back.

use std::convert::Infallible;

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::{
		sse::{Event, KeepAlive, Sse},
		IntoResponse,
	},
	Json,
};
use chrono::Utc;
use futures::stream::Stream;
use tally_expense_core::{may_modify, review, Expense, ExpenseUpdate, NewExpense};
use tally_server_auth::{Action, ExpenseId, UserId, WorkspaceId, WorkspaceRole};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

pub use tally_server_api::{
	CreateExpenseRequest, ExpenseEventResponse, ExpenseResponse, ListExpensesResponse, ReviewExpenseRequest,
	UpdateExpenseRequest,
};

use crate::{
	access::require_action, api::AppState, auth_middleware::RequireAuth, error::ServerError,
	events::ExpenseEventKind, extract::ApiJson,
};

async fn existing_expense(
	state: &AppState,
	workspace_id: &WorkspaceId,
	expense_id: &ExpenseId,
) -> Result<Expense, ServerError> {
	state
		.expense_repo
		.get_expense(workspace_id, expense_id)
		.await?
		.ok_or_else(|| ServerError::NotFound("expense not found".to_string()))
}

fn ensure_may_modify(role: WorkspaceRole, actor: UserId, expense: &Expense) -> Result<(), ServerError> {
	if may_modify(role, actor, expense) {
		Ok(())
	} else {
		tracing::info!(role = %role, expense_id = %expense.id, "member attempted to modify another member's expense");
		Err(ServerError::Forbidden(
			"members may only modify their own expenses".to_string(),
		))
	}
}

async fn respond_with_creator(state: &AppState, expense: &Expense) -> Result<ExpenseResponse, ServerError> {
	let creator = state.user_repo.get_user_by_id(&expense.created_by).await?;
	Ok(ExpenseResponse::new(expense, creator.as_ref()))
}

#[utoipa::path(
    post,
    path = "/api/workspaces/{workspace_id}/expenses",
    params(("workspace_id" = uuid::Uuid, Path, description = "Workspace ID")),
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense created as pending", body = ExpenseResponse),
        (status = 400, description = "Invalid title or amount", body = tally_server_api::ErrorResponse),
        (status = 403, description = "Viewer or non-member", body = tally_server_api::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "expenses"
)]
#[tracing::instrument(skip(state, payload, current_user), fields(user_id = %current_user.user.id, workspace_id = %workspace_id))]
pub async fn create_expense(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(workspace_id): Path<WorkspaceId>,
	ApiJson(payload): ApiJson<CreateExpenseRequest>,
) -> Result<impl IntoResponse, ServerError> {
	let caller = current_user.user_id();
	require_action(state.role_registry.as_ref(), &workspace_id, &caller, Action::CreateExpense).await?;

	let input = NewExpense::validate(&payload.title, payload.amount, payload.category.as_deref())?;
	let expense = Expense::new(workspace_id, caller, input, Utc::now());
	state.expense_repo.create_expense(&expense).await?;
	state
		.events
		.publish(workspace_id, expense.id, ExpenseEventKind::Created);

	tracing::info!(expense_id = %expense.id, amount = %expense.amount, "expense created");
	Ok((
		StatusCode::CREATED,
		Json(ExpenseResponse::new(&expense, Some(&current_user.user))),
	))
}

#[utoipa::path(
    get,
    path = "/api/workspaces/{workspace_id}/expenses",
    params(("workspace_id" = uuid::Uuid, Path, description = "Workspace ID")),
    responses(
        (status = 200, description = "Expenses, newest first, with creator profiles", body = ListExpensesResponse),
        (status = 403, description = "Not a member", body = tally_server_api::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "expenses"
)]
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id, workspace_id = %workspace_id))]
pub async fn list_expenses(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(workspace_id): Path<WorkspaceId>,
) -> Result<Json<ListExpensesResponse>, ServerError> {
	require_action(
		state.role_registry.as_ref(),
		&workspace_id,
		&current_user.user_id(),
		Action::ViewExpenses,
	)
	.await?;

	let expenses = state
		.expense_repo
		.list_expenses(&workspace_id)
		.await?
		.iter()
		.map(|(expense, creator)| ExpenseResponse::new(expense, Some(creator)))
		.collect();

	Ok(Json(ListExpensesResponse { expenses }))
}

#[utoipa::path(
    put,
    path = "/api/workspaces/{workspace_id}/expenses/{expense_id}",
    params(
        ("workspace_id" = uuid::Uuid, Path, description = "Workspace ID"),
        ("expense_id" = uuid::Uuid, Path, description = "Expense ID")
    ),
    request_body = UpdateExpenseRequest,
    responses(
        (status = 200, description = "Expense updated", body = ExpenseResponse),
        (status = 400, description = "Invalid title or amount", body = tally_server_api::ErrorResponse),
        (status = 403, description = "Not allowed to modify this expense", body = tally_server_api::ErrorResponse),
        (status = 404, description = "Expense not found", body = tally_server_api::ErrorResponse),
        (status = 409, description = "Expense already reviewed", body = tally_server_api::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "expenses"
)]
#[tracing::instrument(
	skip(state, payload, current_user),
	fields(user_id = %current_user.user.id, workspace_id = %workspace_id, expense_id = %expense_id)
)]
pub async fn update_expense(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((workspace_id, expense_id)): Path<(WorkspaceId, ExpenseId)>,
	ApiJson(payload): ApiJson<UpdateExpenseRequest>,
) -> Result<Json<ExpenseResponse>, ServerError> {
	let caller = current_user.user_id();
	let role = require_action(
		state.role_registry.as_ref(),
		&workspace_id,
		&caller,
		Action::ModifyOwnExpense,
	)
	.await?;

	let expense = existing_expense(&state, &workspace_id, &expense_id).await?;
	ensure_may_modify(role, caller, &expense)?;

	let updated = expense.apply_update(
		ExpenseUpdate {
			title: payload.title,
			amount: payload.amount,
			category: payload.category,
		},
		Utc::now(),
	)?;
	state.expense_repo.update_pending_expense(&updated).await?;
	state
		.events
		.publish(workspace_id, expense_id, ExpenseEventKind::Updated);

	Ok(Json(respond_with_creator(&state, &updated).await?))
}

#[utoipa::path(
    delete,
    path = "/api/workspaces/{workspace_id}/expenses/{expense_id}",
    params(
        ("workspace_id" = uuid::Uuid, Path, description = "Workspace ID"),
        ("expense_id" = uuid::Uuid, Path, description = "Expense ID")
    ),
    responses(
        (status = 204, description = "Expense deleted"),
        (status = 403, description = "Not allowed to delete this expense", body = tally_server_api::ErrorResponse),
        (status = 404, description = "Expense not found", body = tally_server_api::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "expenses"
)]
#[tracing::instrument(
	skip(state, current_user),
	fields(user_id = %current_user.user.id, workspace_id = %workspace_id, expense_id = %expense_id)
)]
pub async fn delete_expense(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((workspace_id, expense_id)): Path<(WorkspaceId, ExpenseId)>,
) -> Result<StatusCode, ServerError> {
	let caller = current_user.user_id();
	let role = require_action(
		state.role_registry.as_ref(),
		&workspace_id,
		&caller,
		Action::ModifyOwnExpense,
	)
	.await?;

	let expense = existing_expense(&state, &workspace_id, &expense_id).await?;
	ensure_may_modify(role, caller, &expense)?;

	if !state.expense_repo.delete_expense(&workspace_id, &expense_id).await? {
		return Err(ServerError::NotFound("expense not found".to_string()));
	}
	state
		.events
		.publish(workspace_id, expense_id, ExpenseEventKind::Deleted);

	tracing::info!(status = expense.status.as_str(), "expense deleted");
	Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/workspaces/{workspace_id}/expenses/{expense_id}/review",
    params(
        ("workspace_id" = uuid::Uuid, Path, description = "Workspace ID"),
        ("expense_id" = uuid::Uuid, Path, description = "Expense ID")
    ),
    request_body = ReviewExpenseRequest,
    responses(
        (status = 200, description = "Expense approved or rejected", body = ExpenseResponse),
        (status = 400, description = "Unknown review action", body = tally_server_api::ErrorResponse),
        (status = 403, description = "Requires owner or admin, or self-approval", body = tally_server_api::ErrorResponse),
        (status = 404, description = "Expense not found", body = tally_server_api::ErrorResponse),
        (status = 409, description = "Expense already reviewed", body = tally_server_api::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "expenses"
)]
#[tracing::instrument(
	skip(state, payload, current_user),
	fields(user_id = %current_user.user.id, workspace_id = %workspace_id, expense_id = %expense_id, action = %payload.action)
)]
pub async fn review_expense(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((workspace_id, expense_id)): Path<(WorkspaceId, ExpenseId)>,
	ApiJson(payload): ApiJson<ReviewExpenseRequest>,
) -> Result<Json<ExpenseResponse>, ServerError> {
	let caller = current_user.user_id();
	require_action(state.role_registry.as_ref(), &workspace_id, &caller, Action::ReviewExpense).await?;

	let expense = existing_expense(&state, &workspace_id, &expense_id).await?;
	let reviewed = review(
		&expense,
		payload.action.trim(),
		caller,
		payload.comment.as_deref(),
		Utc::now(),
	)?;
	state.expense_repo.apply_review(&reviewed).await?;
	state
		.events
		.publish(workspace_id, expense_id, ExpenseEventKind::Reviewed);

	tracing::info!(status = reviewed.status.as_str(), "expense reviewed");
	Ok(Json(respond_with_creator(&state, &reviewed).await?))
}

/// Streams change notifications for one workspace as server-sent events.
///
/// Each event is named after its kind (`created`, `updated`, `deleted`,
/// `reviewed`) and carries an [`ExpenseEventResponse`] as JSON. Events missed
/// while the subscriber lagged are skipped.
#[utoipa::path(
    get,
    path = "/api/workspaces/{workspace_id}/expenses/events",
    params(("workspace_id" = uuid::Uuid, Path, description = "Workspace ID")),
    responses(
        (status = 200, description = "SSE stream of expense change events", content_type = "text/event-stream"),
        (status = 403, description = "Not a member", body = tally_server_api::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "expenses"
)]
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id, workspace_id = %workspace_id))]
pub async fn stream_expense_events(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(workspace_id): Path<WorkspaceId>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ServerError> {
	require_action(
		state.role_registry.as_ref(),
		&workspace_id,
		&current_user.user_id(),
		Action::ViewExpenses,
	)
	.await?;

	let rx = state.events.subscribe();
	tracing::debug!(subscribers = state.events.receiver_count(), "expense event stream opened");

	let stream = BroadcastStream::new(rx).filter_map(move |result| {
		let event = result.ok()?;
		if event.workspace_id != workspace_id {
			return None;
		}
		let kind = event.kind.as_str();
		match serde_json::to_string(&ExpenseEventResponse::from(event)) {
			Ok(json) => Some(Ok::<_, Infallible>(Event::default().event(kind).data(json))),
			Err(_) => None,
		}
	});

	Ok(Sse::new(stream).keep_alive(
		KeepAlive::new()
			.interval(std::time::Duration::from_secs(15))
			.text("keep-alive"),
	))
}
