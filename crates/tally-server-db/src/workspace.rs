// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Workspace and membership repository.
//!
//! - Workspace creation inserts the owner membership in the same transaction
//! - Membership writes: add (unique per workspace/user), role update, removal
//! - Ownership transfer swaps owner/admin and moves `workspaces.owner_id`
//!
//! Demoting or removing the last owner is refused inside the SQL statement
//! itself, so two concurrent requests cannot both succeed and leave the
//! workspace without an owner.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqlitePool, Row, Sqlite, Transaction};
use tally_expense_core::{Membership, Workspace};
use tally_server_auth::{UserId, UserProfile, WorkspaceId, WorkspaceRole};

use crate::error::DbError;
use crate::rows::{format_ts, parse_id, parse_role, parse_ts};
use crate::user::row_to_profile;

const LAST_OWNER: &str = "a workspace must keep at least one owner";

#[async_trait]
pub trait WorkspaceStore: Send + Sync {
	async fn create_workspace(&self, workspace: &Workspace) -> Result<(), DbError>;
	async fn get_workspace(&self, id: &WorkspaceId) -> Result<Option<Workspace>, DbError>;
	async fn list_workspaces_for_user(
		&self,
		user_id: &UserId,
	) -> Result<Vec<(Workspace, WorkspaceRole)>, DbError>;
	async fn get_membership(
		&self,
		workspace_id: &WorkspaceId,
		user_id: &UserId,
	) -> Result<Option<Membership>, DbError>;
	async fn add_member(
		&self,
		workspace_id: &WorkspaceId,
		user_id: &UserId,
		role: WorkspaceRole,
	) -> Result<Membership, DbError>;
	async fn update_member_role(
		&self,
		workspace_id: &WorkspaceId,
		user_id: &UserId,
		role: WorkspaceRole,
	) -> Result<(), DbError>;
	async fn remove_member(&self, workspace_id: &WorkspaceId, user_id: &UserId) -> Result<bool, DbError>;
	async fn list_members(
		&self,
		workspace_id: &WorkspaceId,
	) -> Result<Vec<(Membership, UserProfile)>, DbError>;
	async fn count_owners(&self, workspace_id: &WorkspaceId) -> Result<i64, DbError>;
	async fn transfer_ownership(
		&self,
		workspace_id: &WorkspaceId,
		from: &UserId,
		to: &UserId,
	) -> Result<(), DbError>;
}

#[derive(Clone)]
pub struct WorkspaceRepository {
	pool: SqlitePool,
}

impl WorkspaceRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	// =========================================================================
	// Workspaces
	// =========================================================================

	/// Create a workspace and its owner membership atomically.
	#[tracing::instrument(skip(self, workspace), fields(workspace_id = %workspace.id, owner_id = %workspace.owner_id))]
	pub async fn create_workspace(&self, workspace: &Workspace) -> Result<(), DbError> {
		let mut tx = self.pool.begin().await?;

		sqlx::query(
			r#"
			INSERT INTO workspaces (id, name, owner_id, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(workspace.id.to_string())
		.bind(&workspace.name)
		.bind(workspace.owner_id.to_string())
		.bind(format_ts(&workspace.created_at))
		.bind(format_ts(&workspace.updated_at))
		.execute(&mut *tx)
		.await?;

		sqlx::query(
			r#"
			INSERT INTO workspace_memberships (workspace_id, user_id, role, created_at)
			VALUES (?, ?, 'owner', ?)
			"#,
		)
		.bind(workspace.id.to_string())
		.bind(workspace.owner_id.to_string())
		.bind(format_ts(&workspace.created_at))
		.execute(&mut *tx)
		.await?;

		tx.commit().await?;

		tracing::debug!(workspace_id = %workspace.id, "workspace created");
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(workspace_id = %id))]
	pub async fn get_workspace(&self, id: &WorkspaceId) -> Result<Option<Workspace>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, owner_id, created_at, updated_at
			FROM workspaces
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_workspace(&r)).transpose()
	}

	/// Workspaces the user belongs to, newest first, with the user's role.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn list_workspaces_for_user(
		&self,
		user_id: &UserId,
	) -> Result<Vec<(Workspace, WorkspaceRole)>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT w.id, w.name, w.owner_id, w.created_at, w.updated_at, m.role
			FROM workspaces w
			JOIN workspace_memberships m ON m.workspace_id = w.id
			WHERE m.user_id = ?
			ORDER BY w.created_at DESC
			"#,
		)
		.bind(user_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows
			.iter()
			.map(|r| {
				let role: String = r.try_get("role")?;
				Ok((row_to_workspace(r)?, parse_role(&role)?))
			})
			.collect()
	}

	// =========================================================================
	// Memberships
	// =========================================================================

	#[tracing::instrument(skip(self), fields(workspace_id = %workspace_id, user_id = %user_id))]
	pub async fn get_membership(
		&self,
		workspace_id: &WorkspaceId,
		user_id: &UserId,
	) -> Result<Option<Membership>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT workspace_id, user_id, role, created_at
			FROM workspace_memberships
			WHERE workspace_id = ? AND user_id = ?
			"#,
		)
		.bind(workspace_id.to_string())
		.bind(user_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_membership(&r)).transpose()
	}

	/// # Errors
	/// Returns `DbError::Conflict` if the user is already a member.
	#[tracing::instrument(skip(self), fields(workspace_id = %workspace_id, user_id = %user_id, role = %role))]
	pub async fn add_member(
		&self,
		workspace_id: &WorkspaceId,
		user_id: &UserId,
		role: WorkspaceRole,
	) -> Result<Membership, DbError> {
		let membership = Membership {
			workspace_id: *workspace_id,
			user_id: *user_id,
			role,
			created_at: Utc::now(),
		};

		sqlx::query(
			r#"
			INSERT INTO workspace_memberships (workspace_id, user_id, role, created_at)
			VALUES (?, ?, ?, ?)
			"#,
		)
		.bind(workspace_id.to_string())
		.bind(user_id.to_string())
		.bind(role.as_str())
		.bind(format_ts(&membership.created_at))
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::unique_violation_as_conflict(e, "user is already a member of this workspace"))?;

		tracing::debug!(workspace_id = %workspace_id, user_id = %user_id, role = %role, "member added");
		Ok(membership)
	}

	/// # Errors
	/// - `DbError::NotFound` if the user is not a member
	/// - `DbError::Conflict` if this would demote the last owner
	#[tracing::instrument(skip(self), fields(workspace_id = %workspace_id, user_id = %user_id, role = %role))]
	pub async fn update_member_role(
		&self,
		workspace_id: &WorkspaceId,
		user_id: &UserId,
		role: WorkspaceRole,
	) -> Result<(), DbError> {
		let mut tx = self.pool.begin().await?;

		let result = sqlx::query(
			r#"
			UPDATE workspace_memberships
			SET role = ?1
			WHERE workspace_id = ?2 AND user_id = ?3
			  AND NOT (
				role = 'owner' AND ?1 <> 'owner'
				AND (SELECT COUNT(*) FROM workspace_memberships WHERE workspace_id = ?2 AND role = 'owner') <= 1
			  )
			"#,
		)
		.bind(role.as_str())
		.bind(workspace_id.to_string())
		.bind(user_id.to_string())
		.execute(&mut *tx)
		.await?;

		if result.rows_affected() == 0 {
			return Err(if membership_exists(&mut tx, workspace_id, user_id).await? {
				DbError::Conflict(LAST_OWNER.to_string())
			} else {
				DbError::NotFound(format!("membership for user {user_id}"))
			});
		}

		sync_owner_reference(&mut tx, workspace_id).await?;
		tx.commit().await?;

		tracing::debug!(workspace_id = %workspace_id, user_id = %user_id, role = %role, "member role updated");
		Ok(())
	}

	/// Remove a membership. Returns `false` if the user was not a member.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the user is the last owner.
	#[tracing::instrument(skip(self), fields(workspace_id = %workspace_id, user_id = %user_id))]
	pub async fn remove_member(&self, workspace_id: &WorkspaceId, user_id: &UserId) -> Result<bool, DbError> {
		let mut tx = self.pool.begin().await?;

		let result = sqlx::query(
			r#"
			DELETE FROM workspace_memberships
			WHERE workspace_id = ?1 AND user_id = ?2
			  AND NOT (
				role = 'owner'
				AND (SELECT COUNT(*) FROM workspace_memberships WHERE workspace_id = ?1 AND role = 'owner') <= 1
			  )
			"#,
		)
		.bind(workspace_id.to_string())
		.bind(user_id.to_string())
		.execute(&mut *tx)
		.await?;

		if result.rows_affected() == 0 {
			if membership_exists(&mut tx, workspace_id, user_id).await? {
				return Err(DbError::Conflict(LAST_OWNER.to_string()));
			}
			return Ok(false);
		}

		sync_owner_reference(&mut tx, workspace_id).await?;
		tx.commit().await?;

		tracing::debug!(workspace_id = %workspace_id, user_id = %user_id, "member removed");
		Ok(true)
	}

	/// Members with their profiles, in join order.
	#[tracing::instrument(skip(self), fields(workspace_id = %workspace_id))]
	pub async fn list_members(
		&self,
		workspace_id: &WorkspaceId,
	) -> Result<Vec<(Membership, UserProfile)>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT m.role, m.created_at AS joined_at,
			       u.id, u.email, u.first_name, u.last_name, u.created_at, u.updated_at
			FROM workspace_memberships m
			JOIN users u ON u.id = m.user_id
			WHERE m.workspace_id = ?
			ORDER BY m.created_at ASC, u.email ASC
			"#,
		)
		.bind(workspace_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows
			.iter()
			.map(|r| {
				let profile = row_to_profile(r)?;
				let role: String = r.try_get("role")?;
				let joined_at: String = r.try_get("joined_at")?;
				let membership = Membership {
					workspace_id: *workspace_id,
					user_id: profile.id,
					role: parse_role(&role)?,
					created_at: parse_ts(&joined_at)?,
				};
				Ok((membership, profile))
			})
			.collect()
	}

	#[tracing::instrument(skip(self), fields(workspace_id = %workspace_id))]
	pub async fn count_owners(&self, workspace_id: &WorkspaceId) -> Result<i64, DbError> {
		let row: (i64,) = sqlx::query_as(
			r#"
			SELECT COUNT(*) FROM workspace_memberships
			WHERE workspace_id = ? AND role = 'owner'
			"#,
		)
		.bind(workspace_id.to_string())
		.fetch_one(&self.pool)
		.await?;

		Ok(row.0)
	}

	/// Make `to` an owner and `from` an admin, in one transaction.
	///
	/// # Errors
	/// - `DbError::NotFound` if `to` is not a member
	/// - `DbError::Conflict` if `from` is no longer an owner
	#[tracing::instrument(skip(self), fields(workspace_id = %workspace_id, from = %from, to = %to))]
	pub async fn transfer_ownership(
		&self,
		workspace_id: &WorkspaceId,
		from: &UserId,
		to: &UserId,
	) -> Result<(), DbError> {
		let mut tx = self.pool.begin().await?;

		let promoted = sqlx::query(
			r#"
			UPDATE workspace_memberships SET role = 'owner'
			WHERE workspace_id = ? AND user_id = ?
			"#,
		)
		.bind(workspace_id.to_string())
		.bind(to.to_string())
		.execute(&mut *tx)
		.await?;
		if promoted.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("membership for user {to}")));
		}

		let demoted = sqlx::query(
			r#"
			UPDATE workspace_memberships SET role = 'admin'
			WHERE workspace_id = ? AND user_id = ? AND role = 'owner'
			"#,
		)
		.bind(workspace_id.to_string())
		.bind(from.to_string())
		.execute(&mut *tx)
		.await?;
		if demoted.rows_affected() == 0 {
			return Err(DbError::Conflict("caller is no longer an owner".to_string()));
		}

		sqlx::query("UPDATE workspaces SET owner_id = ?, updated_at = ? WHERE id = ?")
			.bind(to.to_string())
			.bind(format_ts(&Utc::now()))
			.bind(workspace_id.to_string())
			.execute(&mut *tx)
			.await?;

		tx.commit().await?;

		tracing::info!(workspace_id = %workspace_id, from = %from, to = %to, "ownership transferred");
		Ok(())
	}
}

async fn membership_exists(
	tx: &mut Transaction<'_, Sqlite>,
	workspace_id: &WorkspaceId,
	user_id: &UserId,
) -> Result<bool, DbError> {
	let row: (i64,) = sqlx::query_as(
		"SELECT COUNT(*) FROM workspace_memberships WHERE workspace_id = ? AND user_id = ?",
	)
	.bind(workspace_id.to_string())
	.bind(user_id.to_string())
	.fetch_one(&mut **tx)
	.await?;

	Ok(row.0 > 0)
}

/// Point `workspaces.owner_id` at a current owner if it no longer is one.
async fn sync_owner_reference(
	tx: &mut Transaction<'_, Sqlite>,
	workspace_id: &WorkspaceId,
) -> Result<(), DbError> {
	sqlx::query(
		r#"
		UPDATE workspaces
		SET owner_id = (
				SELECT user_id FROM workspace_memberships
				WHERE workspace_id = ?1 AND role = 'owner'
				ORDER BY created_at ASC
				LIMIT 1
			),
			updated_at = ?2
		WHERE id = ?1
		  AND owner_id NOT IN (
			SELECT user_id FROM workspace_memberships WHERE workspace_id = ?1 AND role = 'owner'
		  )
		"#,
	)
	.bind(workspace_id.to_string())
	.bind(format_ts(&Utc::now()))
	.execute(&mut **tx)
	.await?;

	Ok(())
}

fn row_to_workspace(row: &sqlx::sqlite::SqliteRow) -> Result<Workspace, DbError> {
	let id: String = row.try_get("id")?;
	let owner_id: String = row.try_get("owner_id")?;
	let created_at: String = row.try_get("created_at")?;
	let updated_at: String = row.try_get("updated_at")?;

	Ok(Workspace {
		id: parse_id(&id, "workspace")?,
		name: row.try_get("name")?,
		owner_id: parse_id(&owner_id, "user")?,
		created_at: parse_ts(&created_at)?,
		updated_at: parse_ts(&updated_at)?,
	})
}

fn row_to_membership(row: &sqlx::sqlite::SqliteRow) -> Result<Membership, DbError> {
	let workspace_id: String = row.try_get("workspace_id")?;
	let user_id: String = row.try_get("user_id")?;
	let role: String = row.try_get("role")?;
	let created_at: String = row.try_get("created_at")?;

	Ok(Membership {
		workspace_id: parse_id(&workspace_id, "workspace")?,
		user_id: parse_id(&user_id, "user")?,
		role: parse_role(&role)?,
		created_at: parse_ts(&created_at)?,
	})
}

#[async_trait]
impl WorkspaceStore for WorkspaceRepository {
	async fn create_workspace(&self, workspace: &Workspace) -> Result<(), DbError> {
		self.create_workspace(workspace).await
	}

	async fn get_workspace(&self, id: &WorkspaceId) -> Result<Option<Workspace>, DbError> {
		self.get_workspace(id).await
	}

	async fn list_workspaces_for_user(
		&self,
		user_id: &UserId,
	) -> Result<Vec<(Workspace, WorkspaceRole)>, DbError> {
		self.list_workspaces_for_user(user_id).await
	}

	async fn get_membership(
		&self,
		workspace_id: &WorkspaceId,
		user_id: &UserId,
	) -> Result<Option<Membership>, DbError> {
		self.get_membership(workspace_id, user_id).await
	}

	async fn add_member(
		&self,
		workspace_id: &WorkspaceId,
		user_id: &UserId,
		role: WorkspaceRole,
	) -> Result<Membership, DbError> {
		self.add_member(workspace_id, user_id, role).await
	}

	async fn update_member_role(
		&self,
		workspace_id: &WorkspaceId,
		user_id: &UserId,
		role: WorkspaceRole,
	) -> Result<(), DbError> {
		self.update_member_role(workspace_id, user_id, role).await
	}

	async fn remove_member(&self, workspace_id: &WorkspaceId, user_id: &UserId) -> Result<bool, DbError> {
		self.remove_member(workspace_id, user_id).await
	}

	async fn list_members(
		&self,
		workspace_id: &WorkspaceId,
	) -> Result<Vec<(Membership, UserProfile)>, DbError> {
		self.list_members(workspace_id).await
	}

	async fn count_owners(&self, workspace_id: &WorkspaceId) -> Result<i64, DbError> {
		self.count_owners(workspace_id).await
	}

	async fn transfer_ownership(
		&self,
		workspace_id: &WorkspaceId,
		from: &UserId,
		to: &UserId,
	) -> Result<(), DbError> {
		self.transfer_ownership(workspace_id, from, to).await
	}
}
