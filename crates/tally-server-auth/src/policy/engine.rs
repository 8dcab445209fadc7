// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy evaluation.
//!
//! [`authorize`] is a pure function: no I/O, no shared state. Absence of a
//! membership is always reported as [`AccessDecision::NotAMember`], never as an
//! insufficient role.

use tracing::instrument;

use super::types::{AccessDecision, Action};
use crate::WorkspaceRole;

use crate::WorkspaceRole::{Admin, Member, Owner, Viewer};

const EVERYONE: &[WorkspaceRole] = &[Owner, Admin, Member, Viewer];
const CONTRIBUTORS: &[WorkspaceRole] = &[Owner, Admin, Member];
const MANAGERS: &[WorkspaceRole] = &[Owner, Admin];
const OWNERS: &[WorkspaceRole] = &[Owner];

/// Roles permitted to perform `action`.
pub fn allowed_roles(action: Action) -> &'static [WorkspaceRole] {
	match action {
		Action::SetBudget => MANAGERS,
		Action::ViewBudgetSummary => EVERYONE,
		Action::CreateExpense => CONTRIBUTORS,
		Action::ViewExpenses => EVERYONE,
		Action::ModifyOwnExpense => CONTRIBUTORS,
		Action::ReviewExpense => MANAGERS,
		Action::InviteMember => MANAGERS,
		Action::UpdateMemberRole => MANAGERS,
		Action::RemoveMember => MANAGERS,
		Action::ViewMembers => EVERYONE,
		Action::TransferOwnership => OWNERS,
	}
}

/// Evaluates whether a caller holding `role` may perform `action`.
///
/// `role` is `None` when the caller has no membership in the workspace.
#[instrument(level = "debug", skip_all, ret, fields(action = %action, role = ?role))]
pub fn authorize(role: Option<WorkspaceRole>, action: Action) -> AccessDecision {
	let Some(role) = role else {
		return AccessDecision::NotAMember;
	};

	let required = allowed_roles(action);
	if required.contains(&role) {
		AccessDecision::Allow(role)
	} else {
		AccessDecision::InsufficientRole {
			required,
			actual: role,
		}
	}
}
