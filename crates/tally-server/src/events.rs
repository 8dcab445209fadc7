// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-process fan-out of expense change notifications.
//!
//! ```text
//! handler ──publish──> broadcast::Sender ──> receiver (workspace A stream)
//!                                       └──> receiver (workspace B stream)
//! ```
//!
//! A single channel carries events for every workspace; each SSE subscriber
//! filters on its own workspace. Delivery is best effort: a slow receiver that
//! lags behind the channel capacity skips events rather than blocking writers.

use serde::Serialize;
use tally_server_api::{ExpenseEventKindApi, ExpenseEventResponse};
use tally_server_auth::{ExpenseId, WorkspaceId};
use tokio::sync::broadcast;

const DEFAULT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseEventKind {
	Created,
	Updated,
	Deleted,
	Reviewed,
}

impl ExpenseEventKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ExpenseEventKind::Created => "created",
			ExpenseEventKind::Updated => "updated",
			ExpenseEventKind::Deleted => "deleted",
			ExpenseEventKind::Reviewed => "reviewed",
		}
	}
}

impl From<ExpenseEventKind> for ExpenseEventKindApi {
	fn from(v: ExpenseEventKind) -> Self {
		match v {
			ExpenseEventKind::Created => ExpenseEventKindApi::Created,
			ExpenseEventKind::Updated => ExpenseEventKindApi::Updated,
			ExpenseEventKind::Deleted => ExpenseEventKindApi::Deleted,
			ExpenseEventKind::Reviewed => ExpenseEventKindApi::Reviewed,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseEvent {
	pub workspace_id: WorkspaceId,
	pub expense_id: ExpenseId,
	pub kind: ExpenseEventKind,
}

impl From<ExpenseEvent> for ExpenseEventResponse {
	fn from(event: ExpenseEvent) -> Self {
		Self {
			workspace_id: event.workspace_id.into_inner(),
			expense_id: event.expense_id.into_inner(),
			kind: event.kind.into(),
		}
	}
}

#[derive(Clone)]
pub struct ExpenseEventHub {
	sender: broadcast::Sender<ExpenseEvent>,
}

impl Default for ExpenseEventHub {
	fn default() -> Self {
		Self::new(DEFAULT_CHANNEL_CAPACITY)
	}
}

impl ExpenseEventHub {
	pub fn new(capacity: usize) -> Self {
		let (sender, _receiver) = broadcast::channel(capacity);
		Self { sender }
	}

	pub fn subscribe(&self) -> broadcast::Receiver<ExpenseEvent> {
		self.sender.subscribe()
	}

	/// Returns the number of receivers the event reached.
	pub fn publish(&self, workspace_id: WorkspaceId, expense_id: ExpenseId, kind: ExpenseEventKind) -> usize {
		let event = ExpenseEvent {
			workspace_id,
			expense_id,
			kind,
		};
		match self.sender.send(event) {
			Ok(count) => {
				tracing::debug!(
					workspace_id = %workspace_id,
					expense_id = %expense_id,
					kind = kind.as_str(),
					receiver_count = count,
					"published expense event"
				);
				count
			}
			Err(_) => {
				tracing::trace!(workspace_id = %workspace_id, kind = kind.as_str(), "no subscribers for expense event");
				0
			}
		}
	}

	pub fn receiver_count(&self) -> usize {
		self.sender.receiver_count()
	}
}
