// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for tally-server.
//!
//! The raw document is served at `/api-docs/openapi.json`.

use utoipa::{
	openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
	Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tally Server API",
        version = "1.0.0",
        description = "Shared-workspace expense tracking: members record expenses, admins approve or reject them, and monthly budgets report spend against a limit.",
        license(name = "Proprietary")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "health", description = "Health checks"),
        (name = "auth", description = "Signup, signin and session management"),
        (name = "workspaces", description = "Workspace creation and ownership"),
        (name = "members", description = "Workspace membership and roles"),
        (name = "expenses", description = "Expense recording, review and change events"),
        (name = "budgets", description = "Monthly budgets and spend summaries")
    ),
    paths(
        crate::routes::health::health_check,
        // Auth
        crate::routes::auth::signup,
        crate::routes::auth::signin,
        crate::routes::auth::signout,
        crate::routes::auth::me,
        // Workspaces
        crate::routes::workspaces::create_workspace,
        crate::routes::workspaces::list_workspaces,
        crate::routes::workspaces::transfer_ownership,
        // Members
        crate::routes::members::list_members,
        crate::routes::members::invite_member,
        crate::routes::members::update_member_role,
        crate::routes::members::remove_member,
        // Expenses
        crate::routes::expenses::create_expense,
        crate::routes::expenses::list_expenses,
        crate::routes::expenses::update_expense,
        crate::routes::expenses::delete_expense,
        crate::routes::expenses::review_expense,
        crate::routes::expenses::stream_expense_events,
        // Budgets
        crate::routes::budgets::set_budget,
        crate::routes::budgets::get_budget_summary,
    ),
    components(
        schemas(
            tally_server_api::ErrorResponse,
            tally_server_api::HealthResponse,
            // Auth
            tally_server_api::SignupRequest,
            tally_server_api::SigninRequest,
            tally_server_api::SigninResponse,
            tally_server_api::UserResponse,
            tally_server_api::CurrentUserResponse,
            // Workspaces and members
            tally_server_api::CreateWorkspaceRequest,
            tally_server_api::WorkspaceResponse,
            tally_server_api::ListWorkspacesResponse,
            tally_server_api::TransferOwnershipRequest,
            tally_server_api::WorkspaceRoleApi,
            tally_server_api::InviteMemberRequest,
            tally_server_api::UpdateMemberRoleRequest,
            tally_server_api::MemberResponse,
            tally_server_api::ListMembersResponse,
            // Expenses
            tally_server_api::ExpenseStatusApi,
            tally_server_api::CreateExpenseRequest,
            tally_server_api::UpdateExpenseRequest,
            tally_server_api::ReviewExpenseRequest,
            tally_server_api::ExpenseResponse,
            tally_server_api::ListExpensesResponse,
            tally_server_api::ExpenseEventKindApi,
            tally_server_api::ExpenseEventResponse,
            // Budgets
            tally_server_api::BudgetStatusApi,
            tally_server_api::SpendFilterApi,
            tally_server_api::SetBudgetRequest,
            tally_server_api::BudgetResponse,
            tally_server_api::BudgetSummaryResponse,
        )
    ),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by authenticated paths.
struct BearerAuth;

impl Modify for BearerAuth {
	fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
		if let Some(components) = openapi.components.as_mut() {
			components.add_security_scheme(
				"bearer",
				SecurityScheme::Http(
					HttpBuilder::new()
						.scheme(HttpAuthScheme::Bearer)
						.bearer_format("tly session token")
						.build(),
				),
			);
		}
	}
}
