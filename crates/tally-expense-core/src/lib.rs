// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Domain model for Tally: workspaces and memberships, expenses and their
//! review workflow, and monthly budget evaluation.
//!
//! Everything here is pure; persistence lives in `tally-server-db`.

pub mod budget;
pub mod error;
pub mod expense;
pub mod workspace;

pub use budget::{
	percentage_of, summarize, validate_budget_amount, Budget, BudgetMonth, BudgetStatus, BudgetSummary,
	SpendFilter,
};
pub use error::{BudgetError, ExpenseError, MembershipError, ReviewError};
pub use expense::{
	may_modify, review, Expense, ExpenseStatus, ExpenseUpdate, NewExpense, ReviewAction, MAX_AMOUNT,
};
pub use workspace::{
	check_invite_role, check_removal, check_role_change, check_transfer, validate_workspace_name, Membership,
	Workspace,
};
