// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite connection settings.

use serde::Deserialize;

const DEFAULT_URL: &str = "sqlite:./tally.db";

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
	/// A `sqlite:` URL, e.g. `sqlite:/var/lib/tally/tally.db?mode=rwc`.
	pub url: String,
}

impl DatabaseConfig {
	/// Only SQLite is supported; `sqlite::memory:` is accepted but loses data
	/// on restart.
	pub fn validate(&self) -> Result<(), String> {
		let Some(target) = self.url.strip_prefix("sqlite:") else {
			return Err(format!("database.url must be a sqlite: URL, got '{}'", self.url));
		};
		let path = target.trim_start_matches("//");
		if path.is_empty() || path.starts_with('?') {
			return Err("database.url names no database file".to_string());
		}
		Ok(())
	}

	pub fn is_in_memory(&self) -> bool {
		self.url.starts_with("sqlite::memory:")
	}
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			url: DEFAULT_URL.to_string(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
}

impl DatabaseConfigLayer {
	pub fn merge(&mut self, other: DatabaseConfigLayer) {
		if other.url.is_some() {
			self.url = other.url;
		}
	}

	pub fn finalize(self) -> DatabaseConfig {
		DatabaseConfig {
			url: self
				.url
				.map(|url| url.trim().to_string())
				.unwrap_or_else(|| DEFAULT_URL.to_string()),
		}
	}
}
