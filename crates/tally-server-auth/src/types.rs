// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for authentication and authorization.
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs ([`UserId`], [`WorkspaceId`],
//!   [`ExpenseId`], [`SessionId`]) preventing accidental mixing
//! - **Workspace roles**: [`WorkspaceRole`], the four roles a membership can carry
//!
//! All ID types implement transparent serde serialization (as UUID strings) and
//! provide conversion to/from [`uuid::Uuid`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Uuid::parse_str(s).map(Self)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(SessionId, "Unique identifier for a session.");
define_id_type!(WorkspaceId, "Unique identifier for a workspace.");
define_id_type!(ExpenseId, "Unique identifier for an expense.");

// =============================================================================
// Workspace Roles
// =============================================================================

/// Roles within a workspace, ordered by decreasing privilege.
///
/// Permissions are not derived from this ordering; see
/// [`crate::policy::allowed_roles`] for the per-action table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceRole {
	/// Created the workspace (or received it by transfer).
	Owner,
	/// Manages members, budgets and reviews expenses.
	Admin,
	/// Submits expenses.
	Member,
	/// Read-only access.
	Viewer,
}

impl WorkspaceRole {
	/// Returns all available workspace roles, most privileged first.
	pub fn all() -> &'static [WorkspaceRole] {
		&[
			WorkspaceRole::Owner,
			WorkspaceRole::Admin,
			WorkspaceRole::Member,
			WorkspaceRole::Viewer,
		]
	}

	/// Stable string form used in storage and on the wire.
	pub fn as_str(&self) -> &'static str {
		match self {
			WorkspaceRole::Owner => "owner",
			WorkspaceRole::Admin => "admin",
			WorkspaceRole::Member => "member",
			WorkspaceRole::Viewer => "viewer",
		}
	}

	/// Returns true for owner and admin.
	pub fn is_manager(&self) -> bool {
		matches!(self, WorkspaceRole::Owner | WorkspaceRole::Admin)
	}
}

impl fmt::Display for WorkspaceRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when a string is not one of the four workspace roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid workspace role: {0}")]
pub struct InvalidRole(pub String);

impl FromStr for WorkspaceRole {
	type Err = InvalidRole;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"owner" => Ok(WorkspaceRole::Owner),
			"admin" => Ok(WorkspaceRole::Admin),
			"member" => Ok(WorkspaceRole::Member),
			"viewer" => Ok(WorkspaceRole::Viewer),
			other => Err(InvalidRole(other.to_string())),
		}
	}
}
