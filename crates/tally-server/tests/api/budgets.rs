// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;
use tally_expense_core::{BudgetMonth, SpendFilter};
use tally_server::ServerConfig;

use super::support::{body_json, expect_error, TestApp};

fn this_month() -> String {
	BudgetMonth::of(Utc::now()).to_string()
}

#[tokio::test]
async fn spend_of_80_percent_raises_an_alert() {
	let app = TestApp::new().await;
	let ws = app.workspace("household").await;
	let month = this_month();

	let resp = app
		.put(
			&format!("/api/workspaces/{}/budgets/{month}", ws.id),
			Some(&ws.owner),
			json!({"amount": 1000.0}),
		)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body = body_json(resp).await;
	assert_eq!(body["month"], month.as_str());
	assert_eq!(body["amount"], 1000.0);

	app.create_expense(&ws.id, &ws.member, "Rent share", 300.0).await;
	app.create_expense(&ws.id, &ws.admin, "Utilities", 500.0).await;

	let resp = app
		.get(&format!("/api/workspaces/{}/budgets/{month}/summary", ws.id), Some(&ws.viewer))
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let summary = body_json(resp).await;
	assert_eq!(summary["month"], month.as_str());
	assert_eq!(summary["budget"], 1000.0);
	assert_eq!(summary["spent"], 800.0);
	assert_eq!(summary["remaining"], 200.0);
	assert_eq!(summary["percentage"], 80);
	assert_eq!(summary["status"], "alert");
	assert_eq!(summary["spend_filter"], "all");
}

#[tokio::test]
async fn setting_a_budget_twice_replaces_it() {
	let app = TestApp::new().await;
	let ws = app.workspace("replace").await;
	let month = this_month();
	let path = format!("/api/workspaces/{}/budgets/{month}", ws.id);

	app.put(&path, Some(&ws.owner), json!({"amount": 100.0})).await;
	let resp = app.put(&path, Some(&ws.admin), json!({"amount": 250.0})).await;
	assert_eq!(resp.status(), StatusCode::OK);

	app.create_expense(&ws.id, &ws.member, "Dinner", 250.0).await;
	let resp = app.get(&format!("{path}/summary"), Some(&ws.member)).await;
	let summary = body_json(resp).await;
	assert_eq!(summary["budget"], 250.0);
	assert_eq!(summary["percentage"], 100);
	assert_eq!(summary["status"], "critical");
}

#[tokio::test]
async fn zero_budget_reports_zero_percent() {
	let app = TestApp::new().await;
	let ws = app.workspace("zero").await;
	let month = this_month();
	let path = format!("/api/workspaces/{}/budgets/{month}", ws.id);

	let resp = app.put(&path, Some(&ws.owner), json!({"amount": 0.0})).await;
	assert_eq!(resp.status(), StatusCode::OK);
	app.create_expense(&ws.id, &ws.member, "Coffee", 4.0).await;

	let summary = body_json(app.get(&format!("{path}/summary"), Some(&ws.owner)).await).await;
	assert_eq!(summary["percentage"], 0);
	assert_eq!(summary["status"], "normal");
	assert_eq!(summary["remaining"], -4.0);
}

#[tokio::test]
async fn budget_input_is_validated() {
	let app = TestApp::new().await;
	let ws = app.workspace("validation").await;

	for month in ["2025-13", "2025-1", "25-01", "january"] {
		let resp = app
			.put(
				&format!("/api/workspaces/{}/budgets/{month}", ws.id),
				Some(&ws.owner),
				json!({"amount": 10.0}),
			)
			.await;
		expect_error(resp, StatusCode::BAD_REQUEST, "validation_error").await;
	}

	let resp = app
		.put(
			&format!("/api/workspaces/{}/budgets/2025-06", ws.id),
			Some(&ws.owner),
			json!({"amount": -1.0}),
		)
		.await;
	expect_error(resp, StatusCode::BAD_REQUEST, "validation_error").await;

	let resp = app
		.get(&format!("/api/workspaces/{}/budgets/2025-00/summary", ws.id), Some(&ws.owner))
		.await;
	expect_error(resp, StatusCode::BAD_REQUEST, "validation_error").await;
}

#[tokio::test]
async fn largest_expenses_still_summarize() {
	let app = TestApp::new().await;
	let ws = app.workspace("lavish").await;
	let month = this_month();
	let expenses = format!("/api/workspaces/{}/expenses", ws.id);

	for _ in 0..2 {
		let resp = app
			.post(&expenses, Some(&ws.member), json!({"title": "Island", "amount": 5e28}))
			.await;
		expect_error(resp, StatusCode::BAD_REQUEST, "validation_error").await;
	}
	app.create_expense(&ws.id, &ws.member, "Jet", 1e9).await;
	app.create_expense(&ws.id, &ws.admin, "Hangar", 1e9).await;

	let resp = app
		.put(
			&format!("/api/workspaces/{}/budgets/{month}", ws.id),
			Some(&ws.owner),
			json!({"amount": 1000.0}),
		)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);

	let resp = app
		.get(&format!("/api/workspaces/{}/budgets/{month}/summary", ws.id), Some(&ws.member))
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let summary = body_json(resp).await;
	assert_eq!(summary["spent"], 2e9);
	assert_eq!(summary["percentage"], 200_000_000);
	assert_eq!(summary["status"], "critical");
}

#[tokio::test]
async fn budget_body_must_carry_an_amount() {
	let app = TestApp::new().await;
	let ws = app.workspace("amountless").await;

	for payload in [json!({}), json!({"amount": "lots"})] {
		let resp = app
			.put(
				&format!("/api/workspaces/{}/budgets/2025-06", ws.id),
				Some(&ws.owner),
				payload,
			)
			.await;
		expect_error(resp, StatusCode::BAD_REQUEST, "validation_error").await;
	}
}

#[tokio::test]
async fn only_managers_set_budgets() {
	let app = TestApp::new().await;
	let ws = app.workspace("managers").await;
	let path = format!("/api/workspaces/{}/budgets/{}", ws.id, this_month());

	for user in [&ws.member, &ws.viewer] {
		let resp = app.put(&path, Some(user), json!({"amount": 10.0})).await;
		expect_error(resp, StatusCode::FORBIDDEN, "insufficient_role").await;
	}
}

#[tokio::test]
async fn summary_without_budget_is_not_found() {
	let app = TestApp::new().await;
	let ws = app.workspace("unbudgeted").await;

	let resp = app
		.get(&format!("/api/workspaces/{}/budgets/2024-02/summary", ws.id), Some(&ws.owner))
		.await;
	expect_error(resp, StatusCode::NOT_FOUND, "not_found").await;
}

#[tokio::test]
async fn other_months_do_not_count() {
	let app = TestApp::new().await;
	let ws = app.workspace("months").await;
	let next = BudgetMonth::of(Utc::now()).next().to_string();
	let path = format!("/api/workspaces/{}/budgets/{next}", ws.id);

	app.put(&path, Some(&ws.owner), json!({"amount": 100.0})).await;
	app.create_expense(&ws.id, &ws.member, "Now", 90.0).await;

	let summary = body_json(app.get(&format!("{path}/summary"), Some(&ws.owner)).await).await;
	assert_eq!(summary["spent"], 0.0);
	assert_eq!(summary["status"], "normal");
}

#[tokio::test]
async fn approved_only_filter_ignores_pending_and_rejected() {
	let mut config = ServerConfig::default();
	config.budget.spend_filter = SpendFilter::ApprovedOnly;
	let app = TestApp::with_config(config).await;
	let ws = app.workspace("strict").await;
	let month = this_month();
	let path = format!("/api/workspaces/{}/budgets/{month}", ws.id);
	app.put(&path, Some(&ws.owner), json!({"amount": 1000.0})).await;

	let approved = app.create_expense(&ws.id, &ws.member, "Approved", 600.0).await;
	let rejected = app.create_expense(&ws.id, &ws.member, "Rejected", 300.0).await;
	app.create_expense(&ws.id, &ws.member, "Pending", 100.0).await;

	for (id, action) in [(&approved, "approve"), (&rejected, "reject")] {
		let resp = app
			.post(
				&format!("/api/workspaces/{}/expenses/{id}/review", ws.id),
				Some(&ws.admin),
				json!({"action": action}),
			)
			.await;
		assert_eq!(resp.status(), StatusCode::OK);
	}

	let summary = body_json(app.get(&format!("{path}/summary"), Some(&ws.owner)).await).await;
	assert_eq!(summary["spent"], 600.0);
	assert_eq!(summary["percentage"], 60);
	assert_eq!(summary["spend_filter"], "approved_only");
}
