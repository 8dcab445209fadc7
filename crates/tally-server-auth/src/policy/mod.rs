// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Workspace access policy.
//!
//! Every workspace-scoped operation names an [`Action`]. Which roles may perform
//! it is declared once in [`allowed_roles`]; [`authorize`] evaluates a caller's
//! membership role (or its absence) against that table.
//!
//! ```text
//! (workspace, user) ──RoleRegistry──▶ Option<WorkspaceRole>
//!                                          │
//!                          authorize(role, action)
//!                                          │
//!            ┌─────────────────────────────┼──────────────────────────┐
//!            ▼                             ▼                          ▼
//!       Allow(role)                   NotAMember          InsufficientRole{required, actual}
//! ```

pub mod engine;
pub mod types;

pub use engine::{allowed_roles, authorize};
pub use types::{AccessDecision, Action, AccessDenied};
