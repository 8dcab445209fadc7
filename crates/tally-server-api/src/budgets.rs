// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_expense_core::{Budget, BudgetStatus, BudgetSummary, SpendFilter};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatusApi {
	Normal,
	Alert,
	Warning,
	Critical,
}

impl From<BudgetStatus> for BudgetStatusApi {
	fn from(v: BudgetStatus) -> Self {
		match v {
			BudgetStatus::Normal => BudgetStatusApi::Normal,
			BudgetStatus::Alert => BudgetStatusApi::Alert,
			BudgetStatus::Warning => BudgetStatusApi::Warning,
			BudgetStatus::Critical => BudgetStatusApi::Critical,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpendFilterApi {
	All,
	ApprovedOnly,
}

impl From<SpendFilter> for SpendFilterApi {
	fn from(v: SpendFilter) -> Self {
		match v {
			SpendFilter::All => SpendFilterApi::All,
			SpendFilter::ApprovedOnly => SpendFilterApi::ApprovedOnly,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetBudgetRequest {
	#[schema(value_type = f64)]
	pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BudgetResponse {
	pub workspace_id: Uuid,
	/// `YYYY-MM`.
	pub month: String,
	#[schema(value_type = f64)]
	pub amount: Decimal,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<&Budget> for BudgetResponse {
	fn from(budget: &Budget) -> Self {
		Self {
			workspace_id: budget.workspace_id.into_inner(),
			month: budget.month.to_string(),
			amount: budget.amount,
			created_at: budget.created_at,
			updated_at: budget.updated_at,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BudgetSummaryResponse {
	pub month: String,
	#[schema(value_type = f64)]
	pub budget: Decimal,
	#[schema(value_type = f64)]
	pub spent: Decimal,
	#[schema(value_type = f64)]
	pub remaining: Decimal,
	pub percentage: i64,
	pub status: BudgetStatusApi,
	pub spend_filter: SpendFilterApi,
}

impl BudgetSummaryResponse {
	pub fn new(summary: &BudgetSummary, filter: SpendFilter) -> Self {
		Self {
			month: summary.month.to_string(),
			budget: summary.budget,
			spent: summary.spent,
			remaining: summary.remaining,
			percentage: summary.percentage,
			status: summary.status.into(),
			spend_filter: filter.into(),
		}
	}
}
