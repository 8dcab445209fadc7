// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request and response types for the Tally HTTP API.
//!
//! Role, status and action fields on requests are plain strings so that the
//! server can report unknown values as validation errors.

pub mod auth;
pub mod budgets;
pub mod common;
pub mod expenses;
pub mod members;
pub mod workspaces;

pub use auth::{CurrentUserResponse, SigninRequest, SigninResponse, SignupRequest, UserResponse};
pub use budgets::{BudgetResponse, BudgetStatusApi, BudgetSummaryResponse, SetBudgetRequest, SpendFilterApi};
pub use common::{ErrorResponse, HealthResponse};
pub use expenses::{
	CreateExpenseRequest, ExpenseEventKindApi, ExpenseEventResponse, ExpenseResponse, ExpenseStatusApi,
	ListExpensesResponse, ReviewExpenseRequest, UpdateExpenseRequest,
};
pub use members::{
	InviteMemberRequest, ListMembersResponse, MemberResponse, TransferOwnershipRequest,
	UpdateMemberRoleRequest, WorkspaceRoleApi,
};
pub use workspaces::{CreateWorkspaceRequest, ListWorkspacesResponse, WorkspaceResponse};
