// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Budget repository. One row per (workspace, first day of month).

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{sqlite::SqlitePool, Row};
use tally_expense_core::{Budget, BudgetMonth};
use tally_server_auth::WorkspaceId;

use crate::error::DbError;
use crate::rows::{format_ts, parse_decimal, parse_id, parse_ts};

#[async_trait]
pub trait BudgetStore: Send + Sync {
	async fn upsert_budget(
		&self,
		workspace_id: &WorkspaceId,
		month: BudgetMonth,
		amount: Decimal,
	) -> Result<Budget, DbError>;
	async fn get_budget(&self, workspace_id: &WorkspaceId, month: BudgetMonth) -> Result<Option<Budget>, DbError>;
}

#[derive(Clone)]
pub struct BudgetRepository {
	pool: SqlitePool,
}

impl BudgetRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert or replace the budget for a month. Last writer wins.
	#[tracing::instrument(skip(self), fields(workspace_id = %workspace_id, month = %month, amount = %amount))]
	pub async fn upsert_budget(
		&self,
		workspace_id: &WorkspaceId,
		month: BudgetMonth,
		amount: Decimal,
	) -> Result<Budget, DbError> {
		let now = format_ts(&Utc::now());
		let row = sqlx::query(
			r#"
			INSERT INTO budgets (workspace_id, month, amount, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?)
			ON CONFLICT (workspace_id, month) DO UPDATE SET
				amount = excluded.amount,
				updated_at = excluded.updated_at
			RETURNING workspace_id, month, amount, created_at, updated_at
			"#,
		)
		.bind(workspace_id.to_string())
		.bind(month_key(month))
		.bind(amount.to_string())
		.bind(&now)
		.bind(&now)
		.fetch_one(&self.pool)
		.await?;

		tracing::debug!(workspace_id = %workspace_id, month = %month, "budget saved");
		row_to_budget(&row)
	}

	#[tracing::instrument(skip(self), fields(workspace_id = %workspace_id, month = %month))]
	pub async fn get_budget(&self, workspace_id: &WorkspaceId, month: BudgetMonth) -> Result<Option<Budget>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT workspace_id, month, amount, created_at, updated_at
			FROM budgets
			WHERE workspace_id = ? AND month = ?
			"#,
		)
		.bind(workspace_id.to_string())
		.bind(month_key(month))
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_budget(&r)).transpose()
	}
}

/// Storage key: the first day of the month, `YYYY-MM-01`.
fn month_key(month: BudgetMonth) -> String {
	month.first_day().format("%Y-%m-%d").to_string()
}

fn row_to_budget(row: &sqlx::sqlite::SqliteRow) -> Result<Budget, DbError> {
	let workspace_id: String = row.try_get("workspace_id")?;
	let month: String = row.try_get("month")?;
	let amount: String = row.try_get("amount")?;
	let created_at: String = row.try_get("created_at")?;
	let updated_at: String = row.try_get("updated_at")?;

	let first_day = NaiveDate::parse_from_str(&month, "%Y-%m-%d")
		.map_err(|e| DbError::Internal(format!("Invalid budget month '{month}': {e}")))?;

	Ok(Budget {
		workspace_id: parse_id(&workspace_id, "workspace")?,
		month: BudgetMonth::from_first_day(first_day),
		amount: parse_decimal(&amount)?,
		created_at: parse_ts(&created_at)?,
		updated_at: parse_ts(&updated_at)?,
	})
}

#[async_trait]
impl BudgetStore for BudgetRepository {
	async fn upsert_budget(
		&self,
		workspace_id: &WorkspaceId,
		month: BudgetMonth,
		amount: Decimal,
	) -> Result<Budget, DbError> {
		self.upsert_budget(workspace_id, month, amount).await
	}

	async fn get_budget(&self, workspace_id: &WorkspaceId, month: BudgetMonth) -> Result<Option<Budget>, DbError> {
		self.get_budget(workspace_id, month).await
	}
}
