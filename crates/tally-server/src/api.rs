// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use std::sync::Arc;

use axum::{
	middleware::from_fn_with_state,
	routing::{get, post, put},
	Router,
};
use sqlx::SqlitePool;
use tally_server_config::{AuthConfig, BudgetConfig, ServerConfig};
use tally_server_db::{
	BudgetRepository, BudgetStore, ExpenseRepository, ExpenseStore, RoleRegistry, SessionRepository,
	SessionStore, UserRepository, UserStore, WorkspaceRepository, WorkspaceStore,
};

use crate::{auth_middleware::auth_layer, events::ExpenseEventHub, routes};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub user_repo: Arc<dyn UserStore>,
	pub session_repo: Arc<dyn SessionStore>,
	pub workspace_repo: Arc<dyn WorkspaceStore>,
	pub role_registry: Arc<dyn RoleRegistry>,
	pub expense_repo: Arc<dyn ExpenseStore>,
	pub budget_repo: Arc<dyn BudgetStore>,
	pub events: ExpenseEventHub,
	pub auth_config: AuthConfig,
	pub budget_config: BudgetConfig,
}

/// Creates the application state backed by sqlite repositories on `pool`.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> AppState {
	let workspace_repo = Arc::new(WorkspaceRepository::new(pool.clone()));

	AppState {
		user_repo: Arc::new(UserRepository::new(pool.clone())),
		session_repo: Arc::new(SessionRepository::new(pool.clone())),
		workspace_repo: workspace_repo.clone(),
		role_registry: workspace_repo,
		expense_repo: Arc::new(ExpenseRepository::new(pool.clone())),
		budget_repo: Arc::new(BudgetRepository::new(pool.clone())),
		events: ExpenseEventHub::default(),
		auth_config: config.auth.clone(),
		budget_config: config.budget.clone(),
		pool,
	}
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api-docs/openapi.json", get(routes::docs::openapi_json))
		// Identity
		.route("/auth/signup", post(routes::auth::signup))
		.route("/auth/signin", post(routes::auth::signin))
		.route("/auth/signout", post(routes::auth::signout))
		.route("/auth/me", get(routes::auth::me))
		// Workspaces and members
		.route(
			"/api/workspaces",
			post(routes::workspaces::create_workspace).get(routes::workspaces::list_workspaces),
		)
		.route(
			"/api/workspaces/{workspace_id}/transfer-ownership",
			post(routes::workspaces::transfer_ownership),
		)
		.route(
			"/api/workspaces/{workspace_id}/members",
			get(routes::members::list_members).post(routes::members::invite_member),
		)
		.route(
			"/api/workspaces/{workspace_id}/members/{user_id}",
			put(routes::members::update_member_role).delete(routes::members::remove_member),
		)
		// Expenses
		.route(
			"/api/workspaces/{workspace_id}/expenses",
			post(routes::expenses::create_expense).get(routes::expenses::list_expenses),
		)
		.route(
			"/api/workspaces/{workspace_id}/expenses/events",
			get(routes::expenses::stream_expense_events),
		)
		.route(
			"/api/workspaces/{workspace_id}/expenses/{expense_id}",
			put(routes::expenses::update_expense).delete(routes::expenses::delete_expense),
		)
		.route(
			"/api/workspaces/{workspace_id}/expenses/{expense_id}/review",
			post(routes::expenses::review_expense),
		)
		// Budgets
		.route(
			"/api/workspaces/{workspace_id}/budgets/{month}",
			put(routes::budgets::set_budget),
		)
		.route(
			"/api/workspaces/{workspace_id}/budgets/{month}/summary",
			get(routes::budgets::get_budget_summary),
		)
		.layer(from_fn_with_state(state.clone(), auth_layer))
		.with_state(state)
}
