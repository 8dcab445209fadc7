// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Budget evaluation configuration.

use serde::Deserialize;
use tally_expense_core::SpendFilter;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetConfig {
	/// Which expense statuses count toward monthly spend.
	pub spend_filter: SpendFilter,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetConfigLayer {
	#[serde(default)]
	pub spend_filter: Option<SpendFilter>,
}

impl BudgetConfigLayer {
	pub fn merge(&mut self, other: BudgetConfigLayer) {
		if other.spend_filter.is_some() {
			self.spend_filter = other.spend_filter;
		}
	}

	pub fn finalize(self) -> BudgetConfig {
		BudgetConfig {
			spend_filter: self.spend_filter.unwrap_or_default(),
		}
	}
}
