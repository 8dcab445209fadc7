// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Periodic deletion of expired sessions.
//!
//! Expired sessions never authenticate, so sweeping only bounds table growth.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tally_server_db::{DbError, SessionStore};
use tokio::task::JoinHandle;
use tracing::instrument;

pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Deletes sessions that expired before now. Returns the number removed.
#[instrument(skip(session_repo))]
pub async fn sweep_expired_sessions(session_repo: &dyn SessionStore) -> Result<u64, DbError> {
	let deleted = session_repo.delete_expired_sessions(Utc::now()).await?;
	if deleted > 0 {
		tracing::info!(deleted, "expired sessions removed");
	}
	Ok(deleted)
}

/// Runs [`sweep_expired_sessions`] every `period` until the task is aborted.
pub fn spawn_session_sweeper(session_repo: Arc<dyn SessionStore>, period: Duration) -> JoinHandle<()> {
	tokio::spawn(async move {
		let mut ticker = tokio::time::interval(period);
		loop {
			ticker.tick().await;
			if let Err(e) = sweep_expired_sessions(session_repo.as_ref()).await {
				tracing::warn!(error = %e, "session sweep failed");
			}
		}
	})
}
