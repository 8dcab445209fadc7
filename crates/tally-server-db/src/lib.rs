// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! # tally-server-db
//!
//! Persistence layer for the Tally server using SQLite via sqlx.
//!
//! ## Repository Pattern
//!
//! Each domain has two components:
//! - **`*Store` trait**: the interface the server depends on
//! - **`*Repository` struct**: the sqlite implementation holding a `SqlitePool`
//!
//! ## Error Handling
//!
//! | Variant | When |
//! |---------|------|
//! | `NotFound` | A caller-supplied ID that should exist does not |
//! | `Conflict` | Unique violation, lost review race, last-owner guard |
//! | `Sqlx` | Unexpected database errors |
//! | `Internal` | Invalid stored data (unparseable UUID, timestamp, amount) |
//!
//! Lookups where absence is normal return `Result<Option<T>>`.

pub mod budget;
pub mod error;
pub mod expense;
pub mod migrations;
pub mod pool;
pub mod registry;
mod rows;
pub mod session;
#[cfg(test)]
pub(crate) mod testing;
pub mod user;
pub mod workspace;

pub use budget::{BudgetRepository, BudgetStore};
pub use error::{DbError, Result};
pub use expense::{ExpenseRepository, ExpenseStore};
pub use migrations::run_migrations;
pub use pool::create_pool;
pub use registry::RoleRegistry;
pub use session::{SessionRepository, SessionStore};
pub use user::{UserRepository, UserStore};
pub use workspace::{WorkspaceRepository, WorkspaceStore};
