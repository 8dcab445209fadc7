// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

use crate::expense::ExpenseStatus;

/// Errors from the review state machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewError {
	#[error("cannot review your own expense")]
	SelfApproval,

	#[error("invalid review action '{0}', expected 'approve' or 'reject'")]
	InvalidAction(String),

	#[error("expense already {0}")]
	AlreadyReviewed(ExpenseStatus),
}

/// Errors validating or editing expenses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExpenseError {
	#[error("title is required")]
	MissingTitle,

	#[error("title must be at most {max} characters")]
	TitleTooLong { max: usize },

	#[error("amount must be greater than zero")]
	NonPositiveAmount,

	#[error("amount must be at most {max}")]
	AmountTooLarge { max: rust_decimal::Decimal },

	#[error("only pending expenses can be modified (expense is {0})")]
	NotPending(ExpenseStatus),

	#[error("unknown expense status '{0}'")]
	UnknownStatus(String),
}

/// Errors parsing months or validating budgets.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BudgetError {
	#[error("invalid month '{0}', expected YYYY-MM")]
	InvalidMonth(String),

	#[error("budget amount must not be negative")]
	NegativeAmount,

	#[error("unknown spend filter '{0}', expected 'all' or 'approved_only'")]
	UnknownSpendFilter(String),

	#[error("spend for {0} exceeds the representable range")]
	SpendOverflow(String),
}

/// Violations of the workspace membership rules.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MembershipError {
	#[error("workspace name is required")]
	MissingName,

	#[error("workspace name must be at most {max} characters")]
	NameTooLong { max: usize },

	#[error("members cannot be invited as owner; use ownership transfer")]
	OwnerInvite,

	#[error("only an owner can grant, change or remove the owner role")]
	OwnerOnly,

	#[error("a workspace must keep at least one owner")]
	LastOwner,

	#[error("ownership can only be transferred to another member")]
	TransferToSelf,
}
