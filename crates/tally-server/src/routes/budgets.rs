// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Monthly budget handlers.

use axum::{
	extract::{Path, State},
	Json,
};
use tally_expense_core::{summarize, validate_budget_amount, BudgetMonth};
use tally_server_auth::{Action, WorkspaceId};

pub use tally_server_api::{BudgetResponse, BudgetSummaryResponse, SetBudgetRequest};

use crate::{
	access::require_action, api::AppState, auth_middleware::RequireAuth, error::ServerError,
	extract::ApiJson,
};

#[utoipa::path(
    put,
    path = "/api/workspaces/{workspace_id}/budgets/{month}",
    params(
        ("workspace_id" = uuid::Uuid, Path, description = "Workspace ID"),
        ("month" = String, Path, description = "Budget month as YYYY-MM")
    ),
    request_body = SetBudgetRequest,
    responses(
        (status = 200, description = "Budget set for the month", body = BudgetResponse),
        (status = 400, description = "Invalid month or negative amount", body = tally_server_api::ErrorResponse),
        (status = 403, description = "Requires owner or admin", body = tally_server_api::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "budgets"
)]
#[tracing::instrument(skip(state, payload, current_user), fields(user_id = %current_user.user.id, workspace_id = %workspace_id, month = %month))]
pub async fn set_budget(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((workspace_id, month)): Path<(WorkspaceId, String)>,
	ApiJson(payload): ApiJson<SetBudgetRequest>,
) -> Result<Json<BudgetResponse>, ServerError> {
	require_action(
		state.role_registry.as_ref(),
		&workspace_id,
		&current_user.user_id(),
		Action::SetBudget,
	)
	.await?;

	let month: BudgetMonth = month.trim().parse()?;
	let amount = validate_budget_amount(payload.amount)?;
	let budget = state
		.budget_repo
		.upsert_budget(&workspace_id, month, amount)
		.await?;

	tracing::info!(amount = %budget.amount, "budget set");
	Ok(Json(BudgetResponse::from(&budget)))
}

#[utoipa::path(
    get,
    path = "/api/workspaces/{workspace_id}/budgets/{month}/summary",
    params(
        ("workspace_id" = uuid::Uuid, Path, description = "Workspace ID"),
        ("month" = String, Path, description = "Budget month as YYYY-MM")
    ),
    responses(
        (status = 200, description = "Spend against the month's budget", body = BudgetSummaryResponse),
        (status = 400, description = "Invalid month", body = tally_server_api::ErrorResponse),
        (status = 403, description = "Not a member", body = tally_server_api::ErrorResponse),
        (status = 404, description = "No budget for the month", body = tally_server_api::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "budgets"
)]
#[tracing::instrument(skip(state, current_user), fields(user_id = %current_user.user.id, workspace_id = %workspace_id, month = %month))]
pub async fn get_budget_summary(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((workspace_id, month)): Path<(WorkspaceId, String)>,
) -> Result<Json<BudgetSummaryResponse>, ServerError> {
	require_action(
		state.role_registry.as_ref(),
		&workspace_id,
		&current_user.user_id(),
		Action::ViewBudgetSummary,
	)
	.await?;

	let month: BudgetMonth = month.trim().parse()?;
	let budget = state
		.budget_repo
		.get_budget(&workspace_id, month)
		.await?
		.ok_or_else(|| ServerError::NotFound(format!("no budget set for {month}")))?;

	let (start, end) = month.utc_range();
	let expenses = state
		.expense_repo
		.list_expenses_between(&workspace_id, start, end)
		.await?;

	let filter = state.budget_config.spend_filter;
	let summary = summarize(budget.amount, &expenses, month, filter)?;

	tracing::debug!(
		spent = %summary.spent,
		percentage = summary.percentage,
		status = summary.status.as_str(),
		filter = filter.as_str(),
		"budget summary computed"
	);
	Ok(Json(BudgetSummaryResponse::new(&summary, filter)))
}
