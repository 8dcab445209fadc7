// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::WorkspaceRole;

/// Operations gated by workspace role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
	SetBudget,
	ViewBudgetSummary,
	CreateExpense,
	ViewExpenses,
	/// Update or delete an expense. Members are further restricted to their own.
	ModifyOwnExpense,
	ReviewExpense,
	InviteMember,
	UpdateMemberRole,
	RemoveMember,
	ViewMembers,
	TransferOwnership,
}

impl Action {
	pub fn all() -> &'static [Action] {
		&[
			Action::SetBudget,
			Action::ViewBudgetSummary,
			Action::CreateExpense,
			Action::ViewExpenses,
			Action::ModifyOwnExpense,
			Action::ReviewExpense,
			Action::InviteMember,
			Action::UpdateMemberRole,
			Action::RemoveMember,
			Action::ViewMembers,
			Action::TransferOwnership,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Action::SetBudget => "set_budget",
			Action::ViewBudgetSummary => "view_budget_summary",
			Action::CreateExpense => "create_expense",
			Action::ViewExpenses => "view_expenses",
			Action::ModifyOwnExpense => "modify_own_expense",
			Action::ReviewExpense => "review_expense",
			Action::InviteMember => "invite_member",
			Action::UpdateMemberRole => "update_member_role",
			Action::RemoveMember => "remove_member",
			Action::ViewMembers => "view_members",
			Action::TransferOwnership => "transfer_ownership",
		}
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Outcome of evaluating a role against an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
	/// Permitted; carries the caller's role for downstream checks.
	Allow(WorkspaceRole),
	/// The caller has no membership in the workspace.
	NotAMember,
	/// The caller is a member but their role is not in the allowed set.
	InsufficientRole {
		required: &'static [WorkspaceRole],
		actual: WorkspaceRole,
	},
}

impl AccessDecision {
	pub fn is_allowed(&self) -> bool {
		matches!(self, AccessDecision::Allow(_))
	}

	/// Converts the decision into the caller's role or a denial.
	pub fn into_result(self) -> Result<WorkspaceRole, AccessDenied> {
		match self {
			AccessDecision::Allow(role) => Ok(role),
			AccessDecision::NotAMember => Err(AccessDenied::NotAMember),
			AccessDecision::InsufficientRole { required, actual } => {
				Err(AccessDenied::InsufficientRole { required, actual })
			}
		}
	}
}

/// A denied [`AccessDecision`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
	#[error("not a workspace member")]
	NotAMember,

	#[error("insufficient permissions: requires {}, you are {actual}", format_roles(.required))]
	InsufficientRole {
		required: &'static [WorkspaceRole],
		actual: WorkspaceRole,
	},
}

fn format_roles(roles: &[WorkspaceRole]) -> String {
	roles
		.iter()
		.map(WorkspaceRole::as_str)
		.collect::<Vec<_>>()
		.join("/")
}
