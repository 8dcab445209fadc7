// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Monthly budgets and spend evaluation.
//!
//! A budget is keyed by workspace and calendar month. [`summarize`] totals the
//! expenses created in that month and classifies the spend-to-budget ratio:
//!
//! | rounded percentage | status |
//! |---|---|
//! | `>= 100` | critical |
//! | `>= 90` | warning |
//! | `>= 80` | alert |
//! | otherwise | normal |

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tally_server_auth::WorkspaceId;

use crate::error::BudgetError;
use crate::expense::{Expense, ExpenseStatus};

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BudgetMonth {
	year: i32,
	month: u32,
}

impl BudgetMonth {
	pub fn new(year: i32, month: u32) -> Result<Self, BudgetError> {
		if !(1..=12).contains(&month) || !(1..=9999).contains(&year) {
			return Err(BudgetError::InvalidMonth(format!("{year:04}-{month:02}")));
		}
		Ok(Self { year, month })
	}

	pub fn of(at: DateTime<Utc>) -> Self {
		Self {
			year: at.year(),
			month: at.month(),
		}
	}

	pub fn year(&self) -> i32 {
		self.year
	}

	pub fn month(&self) -> u32 {
		self.month
	}

	/// The first day of the month; the storage key for budgets.
	pub fn first_day(&self) -> NaiveDate {
		NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
	}

	pub fn next(&self) -> Self {
		if self.month == 12 {
			Self {
				year: self.year + 1,
				month: 1,
			}
		} else {
			Self {
				year: self.year,
				month: self.month + 1,
			}
		}
	}

	/// Half-open UTC range `[start of month, start of next month)`.
	pub fn utc_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
		let start = Utc.from_utc_datetime(&self.first_day().and_hms_opt(0, 0, 0).unwrap_or_default());
		let end = Utc.from_utc_datetime(&self.next().first_day().and_hms_opt(0, 0, 0).unwrap_or_default());
		(start, end)
	}

	pub fn contains(&self, at: DateTime<Utc>) -> bool {
		at.year() == self.year && at.month() == self.month
	}

	/// Parses the storage form `YYYY-MM-01`.
	pub fn from_first_day(date: NaiveDate) -> Self {
		Self {
			year: date.year(),
			month: date.month(),
		}
	}
}

impl FromStr for BudgetMonth {
	type Err = BudgetError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = || BudgetError::InvalidMonth(s.to_string());
		let (year, month) = s.split_once('-').ok_or_else(invalid)?;
		if year.len() != 4 || month.len() != 2 {
			return Err(invalid());
		}
		if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
			return Err(invalid());
		}
		let year: i32 = year.parse().map_err(|_| invalid())?;
		let month: u32 = month.parse().map_err(|_| invalid())?;
		BudgetMonth::new(year, month).map_err(|_| invalid())
	}
}

impl fmt::Display for BudgetMonth {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:04}-{:02}", self.year, self.month)
	}
}

impl Serialize for BudgetMonth {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for BudgetMonth {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
	pub workspace_id: WorkspaceId,
	pub month: BudgetMonth,
	pub amount: Decimal,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

pub fn validate_budget_amount(amount: Decimal) -> Result<Decimal, BudgetError> {
	if amount < Decimal::ZERO {
		return Err(BudgetError::NegativeAmount);
	}
	Ok(amount.normalize())
}

/// Severity tier, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
	Normal,
	Alert,
	Warning,
	Critical,
}

impl BudgetStatus {
	pub fn from_percentage(percentage: i64) -> Self {
		if percentage >= 100 {
			BudgetStatus::Critical
		} else if percentage >= 90 {
			BudgetStatus::Warning
		} else if percentage >= 80 {
			BudgetStatus::Alert
		} else {
			BudgetStatus::Normal
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			BudgetStatus::Normal => "normal",
			BudgetStatus::Alert => "alert",
			BudgetStatus::Warning => "warning",
			BudgetStatus::Critical => "critical",
		}
	}
}

impl fmt::Display for BudgetStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Which expenses count toward spend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendFilter {
	/// Every expense in the month, whatever its status.
	#[default]
	All,
	ApprovedOnly,
}

impl SpendFilter {
	pub fn counts(&self, status: ExpenseStatus) -> bool {
		match self {
			SpendFilter::All => true,
			SpendFilter::ApprovedOnly => status == ExpenseStatus::Approved,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			SpendFilter::All => "all",
			SpendFilter::ApprovedOnly => "approved_only",
		}
	}
}

impl FromStr for SpendFilter {
	type Err = BudgetError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"all" => Ok(SpendFilter::All),
			"approved_only" => Ok(SpendFilter::ApprovedOnly),
			other => Err(BudgetError::UnknownSpendFilter(other.to_string())),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSummary {
	pub month: BudgetMonth,
	pub budget: Decimal,
	pub spent: Decimal,
	pub remaining: Decimal,
	pub percentage: i64,
	pub status: BudgetStatus,
}

/// Evaluates spend against a budget for one month.
///
/// Expenses outside `month` are ignored, as are those excluded by `filter`.
/// Fails with [`BudgetError::SpendOverflow`] when the total leaves the
/// decimal range.
pub fn summarize<'a, I>(
	budget: Decimal,
	expenses: I,
	month: BudgetMonth,
	filter: SpendFilter,
) -> Result<BudgetSummary, BudgetError>
where
	I: IntoIterator<Item = &'a Expense>,
{
	let overflow = || BudgetError::SpendOverflow(month.to_string());
	let spent = expenses
		.into_iter()
		.filter(|e| month.contains(e.created_at) && filter.counts(e.status))
		.try_fold(Decimal::ZERO, |total, e| total.checked_add(e.amount))
		.ok_or_else(overflow)?;
	let remaining = budget.checked_sub(spent).ok_or_else(overflow)?;

	let percentage = percentage_of(spent, budget);

	Ok(BudgetSummary {
		month,
		budget,
		spent,
		remaining,
		percentage,
		status: BudgetStatus::from_percentage(percentage),
	})
}

/// `round(spent / budget * 100)` with halves rounded up; `0` for a zero budget.
pub fn percentage_of(spent: Decimal, budget: Decimal) -> i64 {
	if budget <= Decimal::ZERO {
		return 0;
	}

	spent
		.checked_mul(Decimal::ONE_HUNDRED)
		.and_then(|scaled| scaled.checked_div(budget))
		.map(|ratio| ratio.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
		.and_then(|rounded| rounded.to_i64())
		.unwrap_or(i64::MAX)
}
