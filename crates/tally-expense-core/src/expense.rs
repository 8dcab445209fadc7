// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Expenses and the review workflow.
//!
//! ```text
//!            approve
//! pending ───────────▶ approved
//!    │
//!    └──────────────▶ rejected
//!            reject
//! ```
//!
//! `approved` and `rejected` are terminal. The creator of an expense can never
//! review it, whatever their role.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tally_server_auth::{ExpenseId, UserId, WorkspaceId, WorkspaceRole};
use tracing::instrument;

use crate::error::{ExpenseError, ReviewError};

pub const MAX_TITLE_LEN: usize = 200;

/// Largest accepted expense amount: one billion.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
	Pending,
	Approved,
	Rejected,
}

impl ExpenseStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			ExpenseStatus::Pending => "pending",
			ExpenseStatus::Approved => "approved",
			ExpenseStatus::Rejected => "rejected",
		}
	}

	pub fn is_terminal(&self) -> bool {
		!matches!(self, ExpenseStatus::Pending)
	}
}

impl fmt::Display for ExpenseStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ExpenseStatus {
	type Err = ExpenseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"pending" => Ok(ExpenseStatus::Pending),
			"approved" => Ok(ExpenseStatus::Approved),
			"rejected" => Ok(ExpenseStatus::Rejected),
			other => Err(ExpenseError::UnknownStatus(other.to_string())),
		}
	}
}

/// A reviewer's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
	Approve,
	Reject,
}

impl ReviewAction {
	pub fn resulting_status(&self) -> ExpenseStatus {
		match self {
			ReviewAction::Approve => ExpenseStatus::Approved,
			ReviewAction::Reject => ExpenseStatus::Rejected,
		}
	}
}

impl FromStr for ReviewAction {
	type Err = ReviewError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"approve" => Ok(ReviewAction::Approve),
			"reject" => Ok(ReviewAction::Reject),
			other => Err(ReviewError::InvalidAction(other.to_string())),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
	pub id: ExpenseId,
	pub workspace_id: WorkspaceId,
	pub title: String,
	pub amount: Decimal,
	pub category: Option<String>,
	pub created_by: UserId,
	pub status: ExpenseStatus,
	pub approved_by: Option<UserId>,
	pub approver_comment: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Expense {
	/// A fresh pending expense from validated input.
	pub fn new(workspace_id: WorkspaceId, created_by: UserId, input: NewExpense, now: DateTime<Utc>) -> Self {
		Self {
			id: ExpenseId::generate(),
			workspace_id,
			title: input.title,
			amount: input.amount,
			category: input.category,
			created_by,
			status: ExpenseStatus::Pending,
			approved_by: None,
			approver_comment: None,
			created_at: now,
			updated_at: now,
		}
	}

	/// Applies an edit. Only pending expenses can change.
	pub fn apply_update(&self, update: ExpenseUpdate, now: DateTime<Utc>) -> Result<Expense, ExpenseError> {
		if self.status != ExpenseStatus::Pending {
			return Err(ExpenseError::NotPending(self.status));
		}

		let mut updated = self.clone();
		if let Some(title) = update.title {
			updated.title = validate_title(&title)?;
		}
		if let Some(amount) = update.amount {
			updated.amount = validate_amount(amount)?;
		}
		if let Some(category) = update.category {
			updated.category = normalize_optional(category.as_deref());
		}
		updated.updated_at = now;
		Ok(updated)
	}
}

/// Validated input for a new expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
	pub title: String,
	pub amount: Decimal,
	pub category: Option<String>,
}

impl NewExpense {
	pub fn validate(title: &str, amount: Decimal, category: Option<&str>) -> Result<Self, ExpenseError> {
		Ok(Self {
			title: validate_title(title)?,
			amount: validate_amount(amount)?,
			category: normalize_optional(category),
		})
	}
}

/// Partial edit of a pending expense. `category: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseUpdate {
	pub title: Option<String>,
	pub amount: Option<Decimal>,
	pub category: Option<Option<String>>,
}

/// Whether a caller with `role` may edit or delete `expense`.
///
/// Owners and admins may touch any expense; members only their own.
pub fn may_modify(role: WorkspaceRole, actor: UserId, expense: &Expense) -> bool {
	match role {
		WorkspaceRole::Owner | WorkspaceRole::Admin => true,
		WorkspaceRole::Member => expense.created_by == actor,
		WorkspaceRole::Viewer => false,
	}
}

/// Runs the review state machine.
///
/// Checks, in order: self-approval, action validity, current status. On success
/// returns the reviewed expense with approver, trimmed comment and `updated_at`
/// set; the input is not modified.
#[instrument(level = "debug", skip(expense, comment), fields(expense_id = %expense.id, reviewer_id = %reviewer_id))]
pub fn review(
	expense: &Expense,
	action: &str,
	reviewer_id: UserId,
	comment: Option<&str>,
	now: DateTime<Utc>,
) -> Result<Expense, ReviewError> {
	if reviewer_id == expense.created_by {
		return Err(ReviewError::SelfApproval);
	}

	let action: ReviewAction = action.parse()?;

	if expense.status.is_terminal() {
		return Err(ReviewError::AlreadyReviewed(expense.status));
	}

	let mut reviewed = expense.clone();
	reviewed.status = action.resulting_status();
	reviewed.approved_by = Some(reviewer_id);
	reviewed.approver_comment = normalize_optional(comment);
	reviewed.updated_at = now;
	Ok(reviewed)
}

fn validate_title(title: &str) -> Result<String, ExpenseError> {
	let title = title.trim();
	if title.is_empty() {
		return Err(ExpenseError::MissingTitle);
	}
	if title.chars().count() > MAX_TITLE_LEN {
		return Err(ExpenseError::TitleTooLong { max: MAX_TITLE_LEN });
	}
	Ok(title.to_string())
}

fn validate_amount(amount: Decimal) -> Result<Decimal, ExpenseError> {
	if amount <= Decimal::ZERO {
		return Err(ExpenseError::NonPositiveAmount);
	}
	if amount > MAX_AMOUNT {
		return Err(ExpenseError::AmountTooLarge { max: MAX_AMOUNT });
	}
	Ok(amount.normalize())
}

fn normalize_optional(value: Option<&str>) -> Option<String> {
	value
		.map(str::trim)
		.filter(|v| !v.is_empty())
		.map(str::to_string)
}
