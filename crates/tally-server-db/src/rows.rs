// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Conversions between stored TEXT columns and domain types.
//!
//! Timestamps are RFC 3339 with nanosecond precision and a `Z` suffix so that
//! string order equals time order. Amounts are decimal strings.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use tally_server_auth::WorkspaceRole;
use uuid::Uuid;

use crate::error::DbError;

pub(crate) fn format_ts(ts: &DateTime<Utc>) -> String {
	ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_ts(value: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid timestamp '{value}': {e}")))
}

pub(crate) fn parse_id<T: From<Uuid>>(value: &str, kind: &str) -> Result<T, DbError> {
	Uuid::parse_str(value)
		.map(T::from)
		.map_err(|e| DbError::Internal(format!("Invalid {kind} ID: {e}")))
}

pub(crate) fn parse_decimal(value: &str) -> Result<Decimal, DbError> {
	Decimal::from_str(value).map_err(|e| DbError::Internal(format!("Invalid amount '{value}': {e}")))
}

pub(crate) fn parse_role(value: &str) -> Result<WorkspaceRole, DbError> {
	WorkspaceRole::from_str(value).map_err(|e| DbError::Internal(e.to_string()))
}
