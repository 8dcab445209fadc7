// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Expense repository.
//!
//! Every lookup is scoped by workspace: an expense id from another workspace
//! resolves to nothing. Edits and reviews are conditional on `status = 'pending'`
//! so a concurrent reviewer that loses the race gets `DbError::Conflict`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row};
use tally_expense_core::Expense;
use tally_server_auth::{ExpenseId, UserProfile, WorkspaceId};

use crate::error::DbError;
use crate::rows::{format_ts, parse_decimal, parse_id, parse_ts};
use crate::user::profile_from_columns;

const ALREADY_REVIEWED: &str = "expense is no longer pending";

#[async_trait]
pub trait ExpenseStore: Send + Sync {
	async fn create_expense(&self, expense: &Expense) -> Result<(), DbError>;
	async fn get_expense(
		&self,
		workspace_id: &WorkspaceId,
		id: &ExpenseId,
	) -> Result<Option<Expense>, DbError>;
	async fn list_expenses(&self, workspace_id: &WorkspaceId) -> Result<Vec<(Expense, UserProfile)>, DbError>;
	async fn list_expenses_between(
		&self,
		workspace_id: &WorkspaceId,
		start: DateTime<Utc>,
		end: DateTime<Utc>,
	) -> Result<Vec<Expense>, DbError>;
	async fn update_pending_expense(&self, expense: &Expense) -> Result<(), DbError>;
	async fn apply_review(&self, reviewed: &Expense) -> Result<(), DbError>;
	async fn delete_expense(&self, workspace_id: &WorkspaceId, id: &ExpenseId) -> Result<bool, DbError>;
}

#[derive(Clone)]
pub struct ExpenseRepository {
	pool: SqlitePool,
}

impl ExpenseRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, expense), fields(expense_id = %expense.id, workspace_id = %expense.workspace_id))]
	pub async fn create_expense(&self, expense: &Expense) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO expenses (
				id, workspace_id, title, amount, category, created_by,
				status, approved_by, approver_comment, created_at, updated_at
			)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(expense.id.to_string())
		.bind(expense.workspace_id.to_string())
		.bind(&expense.title)
		.bind(expense.amount.to_string())
		.bind(&expense.category)
		.bind(expense.created_by.to_string())
		.bind(expense.status.as_str())
		.bind(expense.approved_by.map(|id| id.to_string()))
		.bind(&expense.approver_comment)
		.bind(format_ts(&expense.created_at))
		.bind(format_ts(&expense.updated_at))
		.execute(&self.pool)
		.await?;

		tracing::debug!(expense_id = %expense.id, "expense created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(workspace_id = %workspace_id, expense_id = %id))]
	pub async fn get_expense(
		&self,
		workspace_id: &WorkspaceId,
		id: &ExpenseId,
	) -> Result<Option<Expense>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, workspace_id, title, amount, category, created_by,
			       status, approved_by, approver_comment, created_at, updated_at
			FROM expenses
			WHERE id = ? AND workspace_id = ?
			"#,
		)
		.bind(id.to_string())
		.bind(workspace_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_expense(&r)).transpose()
	}

	/// All expenses of a workspace, newest first, with the creator's profile.
	#[tracing::instrument(skip(self), fields(workspace_id = %workspace_id))]
	pub async fn list_expenses(&self, workspace_id: &WorkspaceId) -> Result<Vec<(Expense, UserProfile)>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT e.id, e.workspace_id, e.title, e.amount, e.category, e.created_by,
			       e.status, e.approved_by, e.approver_comment, e.created_at, e.updated_at,
			       u.id AS creator_id, u.email AS creator_email,
			       u.first_name AS creator_first_name, u.last_name AS creator_last_name,
			       u.created_at AS creator_created_at, u.updated_at AS creator_updated_at
			FROM expenses e
			JOIN users u ON u.id = e.created_by
			WHERE e.workspace_id = ?
			ORDER BY e.created_at DESC, e.id DESC
			"#,
		)
		.bind(workspace_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows
			.iter()
			.map(|r| {
				let creator = profile_from_columns(
					r,
					"creator_id",
					"creator_email",
					"creator_first_name",
					"creator_last_name",
					"creator_created_at",
					"creator_updated_at",
				)?;
				Ok((row_to_expense(r)?, creator))
			})
			.collect()
	}

	/// Expenses created in `[start, end)`.
	#[tracing::instrument(skip(self), fields(workspace_id = %workspace_id, start = %start, end = %end))]
	pub async fn list_expenses_between(
		&self,
		workspace_id: &WorkspaceId,
		start: DateTime<Utc>,
		end: DateTime<Utc>,
	) -> Result<Vec<Expense>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, workspace_id, title, amount, category, created_by,
			       status, approved_by, approver_comment, created_at, updated_at
			FROM expenses
			WHERE workspace_id = ? AND created_at >= ? AND created_at < ?
			ORDER BY created_at ASC
			"#,
		)
		.bind(workspace_id.to_string())
		.bind(format_ts(&start))
		.bind(format_ts(&end))
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_expense).collect()
	}

	/// Persist title/amount/category edits of a pending expense.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the expense was reviewed in the meantime,
	/// `DbError::NotFound` if it no longer exists.
	#[tracing::instrument(skip(self, expense), fields(expense_id = %expense.id))]
	pub async fn update_pending_expense(&self, expense: &Expense) -> Result<(), DbError> {
		let result = sqlx::query(
			r#"
			UPDATE expenses
			SET title = ?, amount = ?, category = ?, updated_at = ?
			WHERE id = ? AND workspace_id = ? AND status = 'pending'
			"#,
		)
		.bind(&expense.title)
		.bind(expense.amount.to_string())
		.bind(&expense.category)
		.bind(format_ts(&expense.updated_at))
		.bind(expense.id.to_string())
		.bind(expense.workspace_id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(self.explain_missed_update(expense).await?);
		}
		Ok(())
	}

	/// Persist the outcome of a review. First writer wins.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the expense is no longer pending.
	#[tracing::instrument(skip(self, reviewed), fields(expense_id = %reviewed.id, status = %reviewed.status))]
	pub async fn apply_review(&self, reviewed: &Expense) -> Result<(), DbError> {
		let result = sqlx::query(
			r#"
			UPDATE expenses
			SET status = ?, approved_by = ?, approver_comment = ?, updated_at = ?
			WHERE id = ? AND workspace_id = ? AND status = 'pending'
			"#,
		)
		.bind(reviewed.status.as_str())
		.bind(reviewed.approved_by.map(|id| id.to_string()))
		.bind(&reviewed.approver_comment)
		.bind(format_ts(&reviewed.updated_at))
		.bind(reviewed.id.to_string())
		.bind(reviewed.workspace_id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(self.explain_missed_update(reviewed).await?);
		}

		tracing::info!(expense_id = %reviewed.id, status = %reviewed.status, "expense reviewed");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(workspace_id = %workspace_id, expense_id = %id))]
	pub async fn delete_expense(&self, workspace_id: &WorkspaceId, id: &ExpenseId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM expenses WHERE id = ? AND workspace_id = ?")
			.bind(id.to_string())
			.bind(workspace_id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	async fn explain_missed_update(&self, expense: &Expense) -> Result<DbError, DbError> {
		Ok(match self.get_expense(&expense.workspace_id, &expense.id).await? {
			Some(_) => DbError::Conflict(ALREADY_REVIEWED.to_string()),
			None => DbError::NotFound(format!("expense {}", expense.id)),
		})
	}
}

fn row_to_expense(row: &sqlx::sqlite::SqliteRow) -> Result<Expense, DbError> {
	let id: String = row.try_get("id")?;
	let workspace_id: String = row.try_get("workspace_id")?;
	let amount: String = row.try_get("amount")?;
	let created_by: String = row.try_get("created_by")?;
	let status: String = row.try_get("status")?;
	let approved_by: Option<String> = row.try_get("approved_by")?;
	let created_at: String = row.try_get("created_at")?;
	let updated_at: String = row.try_get("updated_at")?;

	Ok(Expense {
		id: parse_id(&id, "expense")?,
		workspace_id: parse_id(&workspace_id, "workspace")?,
		title: row.try_get("title")?,
		amount: parse_decimal(&amount)?,
		category: row.try_get("category")?,
		created_by: parse_id(&created_by, "user")?,
		status: status
			.parse()
			.map_err(|e: tally_expense_core::ExpenseError| DbError::Internal(e.to_string()))?,
		approved_by: approved_by.as_deref().map(|s| parse_id(s, "user")).transpose()?,
		approver_comment: row.try_get("approver_comment")?,
		created_at: parse_ts(&created_at)?,
		updated_at: parse_ts(&updated_at)?,
	})
}

#[async_trait]
impl ExpenseStore for ExpenseRepository {
	async fn create_expense(&self, expense: &Expense) -> Result<(), DbError> {
		self.create_expense(expense).await
	}

	async fn get_expense(
		&self,
		workspace_id: &WorkspaceId,
		id: &ExpenseId,
	) -> Result<Option<Expense>, DbError> {
		self.get_expense(workspace_id, id).await
	}

	async fn list_expenses(&self, workspace_id: &WorkspaceId) -> Result<Vec<(Expense, UserProfile)>, DbError> {
		self.list_expenses(workspace_id).await
	}

	async fn list_expenses_between(
		&self,
		workspace_id: &WorkspaceId,
		start: DateTime<Utc>,
		end: DateTime<Utc>,
	) -> Result<Vec<Expense>, DbError> {
		self.list_expenses_between(workspace_id, start, end).await
	}

	async fn update_pending_expense(&self, expense: &Expense) -> Result<(), DbError> {
		self.update_pending_expense(expense).await
	}

	async fn apply_review(&self, reviewed: &Expense) -> Result<(), DbError> {
		self.apply_review(reviewed).await
	}

	async fn delete_expense(&self, workspace_id: &WorkspaceId, id: &ExpenseId) -> Result<bool, DbError> {
		self.delete_expense(workspace_id, id).await
	}
}
