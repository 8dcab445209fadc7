// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tally_expense_core::{Expense, ExpenseStatus};
use tally_server_auth::UserProfile;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::UserResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatusApi {
	Pending,
	Approved,
	Rejected,
}

impl From<ExpenseStatus> for ExpenseStatusApi {
	fn from(v: ExpenseStatus) -> Self {
		match v {
			ExpenseStatus::Pending => ExpenseStatusApi::Pending,
			ExpenseStatus::Approved => ExpenseStatusApi::Approved,
			ExpenseStatus::Rejected => ExpenseStatusApi::Rejected,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateExpenseRequest {
	pub title: String,
	#[schema(value_type = f64)]
	pub amount: Decimal,
	#[serde(default)]
	pub category: Option<String>,
}

/// Partial update of a pending expense.
///
/// `category: null` clears the category; omitting it leaves it unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateExpenseRequest {
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	#[schema(value_type = Option<f64>)]
	pub amount: Option<Decimal>,
	#[serde(default, deserialize_with = "deserialize_some")]
	#[schema(value_type = Option<String>)]
	pub category: Option<Option<String>>,
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
	T: Deserialize<'de>,
	D: Deserializer<'de>,
{
	T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewExpenseRequest {
	/// `approve` or `reject`.
	pub action: String,
	#[serde(default)]
	pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExpenseResponse {
	pub id: Uuid,
	pub workspace_id: Uuid,
	pub title: String,
	#[schema(value_type = f64)]
	pub amount: Decimal,
	pub category: Option<String>,
	pub status: ExpenseStatusApi,
	pub created_by: Uuid,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub creator: Option<UserResponse>,
	pub approved_by: Option<Uuid>,
	pub approver_comment: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl ExpenseResponse {
	pub fn new(expense: &Expense, creator: Option<&UserProfile>) -> Self {
		Self {
			id: expense.id.into_inner(),
			workspace_id: expense.workspace_id.into_inner(),
			title: expense.title.clone(),
			amount: expense.amount,
			category: expense.category.clone(),
			status: expense.status.into(),
			created_by: expense.created_by.into_inner(),
			creator: creator.map(UserResponse::from),
			approved_by: expense.approved_by.map(|id| id.into_inner()),
			approver_comment: expense.approver_comment.clone(),
			created_at: expense.created_at,
			updated_at: expense.updated_at,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListExpensesResponse {
	pub expenses: Vec<ExpenseResponse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseEventKindApi {
	Created,
	Updated,
	Deleted,
	Reviewed,
}

/// Payload of one server-sent change event.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExpenseEventResponse {
	pub workspace_id: Uuid,
	pub expense_id: Uuid,
	pub kind: ExpenseEventKindApi,
}
