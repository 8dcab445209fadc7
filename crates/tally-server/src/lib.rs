// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tally expense-tracking server.
//!
//! This crate provides the HTTP API for shared workspaces: membership and
//! roles, expense recording and review, monthly budgets, and a server-sent
//! event stream of expense changes, backed by SQLite.

pub mod access;
pub mod api;
pub mod api_docs;
pub mod auth_middleware;
pub mod error;
pub mod events;
pub mod extract;
pub mod routes;
pub mod session_sweeper;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use error::ServerError;
pub use events::{ExpenseEvent, ExpenseEventHub, ExpenseEventKind};
pub use tally_server_config::ServerConfig;
