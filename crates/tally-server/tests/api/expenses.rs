// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;
use serde_json::json;

use super::support::{body_json, expect_error, TestApp};

#[tokio::test]
async fn member_records_pending_expense() {
	let app = TestApp::new().await;
	let ws = app.workspace("records").await;

	let resp = app
		.post(
			&format!("/api/workspaces/{}/expenses", ws.id),
			Some(&ws.member),
			json!({"title": "  Groceries ", "amount": 42.5, "category": " food "}),
		)
		.await;
	assert_eq!(resp.status(), StatusCode::CREATED);
	let body = body_json(resp).await;
	assert_eq!(body["title"], "Groceries");
	assert_eq!(body["amount"], 42.5);
	assert_eq!(body["category"], "food");
	assert_eq!(body["status"], "pending");
	assert_eq!(body["created_by"], ws.member.id.as_str());
	assert!(body["approved_by"].is_null());
	assert_eq!(body["creator"]["email"], ws.member.email.as_str());
}

#[tokio::test]
async fn invalid_expenses_are_rejected() {
	let app = TestApp::new().await;
	let ws = app.workspace("invalid").await;
	let path = format!("/api/workspaces/{}/expenses", ws.id);

	for payload in [
		json!({"title": "", "amount": 10.0}),
		json!({"title": "Zero", "amount": 0.0}),
		json!({"title": "Negative", "amount": -5.0}),
		json!({"title": "x".repeat(201), "amount": 1.0}),
		json!({"title": "Too much", "amount": 5e28}),
		json!({"title": "No amount"}),
		json!({"title": "Wordy", "amount": "ten"}),
		json!({"title": "Null", "amount": null}),
		json!({"amount": 10.0}),
	] {
		let resp = app.post(&path, Some(&ws.member), &payload).await;
		expect_error(resp, StatusCode::BAD_REQUEST, "validation_error").await;
	}

	for raw in ["{\"title\": \"Cut off\", \"amount\":", "not json", ""] {
		let resp = app.post_raw(&path, &ws.member, raw).await;
		expect_error(resp, StatusCode::BAD_REQUEST, "validation_error").await;
	}

	let resp = app.get(&path, Some(&ws.member)).await;
	let body = body_json(resp).await;
	assert_eq!(body["expenses"], json!([]));
}

#[tokio::test]
async fn update_rejects_oversized_amount() {
	let app = TestApp::new().await;
	let ws = app.workspace("oversized").await;
	let id = app.create_expense(&ws.id, &ws.member, "Lunch", 12.0).await;

	let resp = app
		.put(
			&format!("/api/workspaces/{}/expenses/{id}", ws.id),
			Some(&ws.member),
			json!({"amount": 5e28}),
		)
		.await;
	let body = expect_error(resp, StatusCode::BAD_REQUEST, "validation_error").await;
	assert_eq!(body["message"], "amount must be at most 1000000000");
}

#[tokio::test]
async fn viewer_cannot_create_expense() {
	let app = TestApp::new().await;
	let ws = app.workspace("readonly").await;

	let resp = app
		.post(
			&format!("/api/workspaces/{}/expenses", ws.id),
			Some(&ws.viewer),
			json!({"title": "Snacks", "amount": 3.0}),
		)
		.await;
	let body = expect_error(resp, StatusCode::FORBIDDEN, "insufficient_role").await;
	assert_eq!(body["your_role"], "viewer");
	assert_eq!(body["required"], json!(["owner", "admin", "member"]));
}

#[tokio::test]
async fn list_is_newest_first_with_creators() {
	let app = TestApp::new().await;
	let ws = app.workspace("listing").await;
	let first = app.create_expense(&ws.id, &ws.member, "First", 1.0).await;
	let second = app.create_expense(&ws.id, &ws.admin, "Second", 2.0).await;

	let resp = app
		.get(&format!("/api/workspaces/{}/expenses", ws.id), Some(&ws.viewer))
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body = body_json(resp).await;
	let expenses = body["expenses"].as_array().unwrap();
	assert_eq!(expenses.len(), 2);
	assert_eq!(expenses[0]["id"], second.as_str());
	assert_eq!(expenses[1]["id"], first.as_str());
	assert_eq!(expenses[0]["creator"]["email"], ws.admin.email.as_str());
}

#[tokio::test]
async fn members_edit_only_their_own_expenses() {
	let app = TestApp::new().await;
	let ws = app.workspace("ownership").await;
	let other = app.user("other.ownership@example.com").await;
	app.invite(&ws.id, &ws.owner, &other, "member").await;

	let expense = app.create_expense(&ws.id, &ws.member, "Taxi", 20.0).await;
	let path = format!("/api/workspaces/{}/expenses/{expense}", ws.id);

	let resp = app.put(&path, Some(&other), json!({"amount": 1.0})).await;
	expect_error(resp, StatusCode::FORBIDDEN, "forbidden").await;

	let resp = app.delete(&path, Some(&other)).await;
	expect_error(resp, StatusCode::FORBIDDEN, "forbidden").await;

	let resp = app
		.put(&path, Some(&ws.member), json!({"title": "Airport taxi", "category": "travel"}))
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body = body_json(resp).await;
	assert_eq!(body["title"], "Airport taxi");
	assert_eq!(body["amount"], 20.0);
	assert_eq!(body["category"], "travel");

	let resp = app.put(&path, Some(&ws.admin), json!({"amount": 25.0})).await;
	assert_eq!(resp.status(), StatusCode::OK);
	assert_eq!(body_json(resp).await["amount"], 25.0);

	let resp = app.put(&path, Some(&ws.viewer), json!({"amount": 30.0})).await;
	expect_error(resp, StatusCode::FORBIDDEN, "insufficient_role").await;
}

#[tokio::test]
async fn null_category_clears_it() {
	let app = TestApp::new().await;
	let ws = app.workspace("categories").await;
	let resp = app
		.post(
			&format!("/api/workspaces/{}/expenses", ws.id),
			Some(&ws.member),
			json!({"title": "Lunch", "amount": 12.0, "category": "food"}),
		)
		.await;
	let id = body_json(resp).await["id"].as_str().unwrap().to_string();
	let path = format!("/api/workspaces/{}/expenses/{id}", ws.id);

	let resp = app.put(&path, Some(&ws.member), json!({"title": "Team lunch"})).await;
	assert_eq!(body_json(resp).await["category"], "food");

	let resp = app.put(&path, Some(&ws.member), json!({"category": null})).await;
	assert!(body_json(resp).await["category"].is_null());
}

#[tokio::test]
async fn reviewed_expenses_are_frozen() {
	let app = TestApp::new().await;
	let ws = app.workspace("frozen").await;
	let expense = app.create_expense(&ws.id, &ws.member, "Hotel", 300.0).await;
	let path = format!("/api/workspaces/{}/expenses/{expense}", ws.id);

	let resp = app
		.post(&format!("{path}/review"), Some(&ws.admin), json!({"action": "approve"}))
		.await;
	assert_eq!(resp.status(), StatusCode::OK);

	let resp = app.put(&path, Some(&ws.member), json!({"amount": 1.0})).await;
	expect_error(resp, StatusCode::CONFLICT, "conflict").await;

	// Deletion is allowed in any status.
	let resp = app.delete(&path, Some(&ws.member)).await;
	assert_eq!(resp.status(), StatusCode::NO_CONTENT);

	let resp = app.delete(&path, Some(&ws.member)).await;
	expect_error(resp, StatusCode::NOT_FOUND, "not_found").await;
}

#[tokio::test]
async fn approve_and_reject_record_the_reviewer() {
	let app = TestApp::new().await;
	let ws = app.workspace("reviews").await;
	let approved = app.create_expense(&ws.id, &ws.member, "Books", 40.0).await;
	let rejected = app.create_expense(&ws.id, &ws.member, "Yacht", 9000.0).await;

	let resp = app
		.post(
			&format!("/api/workspaces/{}/expenses/{approved}/review", ws.id),
			Some(&ws.admin),
			json!({"action": "approve", "comment": "  thanks  "}),
		)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body = body_json(resp).await;
	assert_eq!(body["status"], "approved");
	assert_eq!(body["approved_by"], ws.admin.id.as_str());
	assert_eq!(body["approver_comment"], "thanks");

	let resp = app
		.post(
			&format!("/api/workspaces/{}/expenses/{rejected}/review", ws.id),
			Some(&ws.owner),
			json!({"action": "reject", "comment": "No."}),
		)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body = body_json(resp).await;
	assert_eq!(body["status"], "rejected");
	assert_eq!(body["approved_by"], ws.owner.id.as_str());
}

#[tokio::test]
async fn review_rules() {
	let app = TestApp::new().await;
	let ws = app.workspace("gatekeeping").await;
	let own = app.create_expense(&ws.id, &ws.admin, "Conference", 500.0).await;
	let theirs = app.create_expense(&ws.id, &ws.member, "Monitor", 200.0).await;
	let review = |id: &str| format!("/api/workspaces/{}/expenses/{id}/review", ws.id);

	let resp = app.post(&review(&own), Some(&ws.admin), json!({"action": "approve"})).await;
	expect_error(resp, StatusCode::FORBIDDEN, "self_approval").await;

	let resp = app.post(&review(&theirs), Some(&ws.member), json!({"action": "approve"})).await;
	expect_error(resp, StatusCode::FORBIDDEN, "insufficient_role").await;

	let resp = app.post(&review(&theirs), Some(&ws.admin), json!({"action": "maybe"})).await;
	expect_error(resp, StatusCode::BAD_REQUEST, "validation_error").await;

	let resp = app.post(&review(&theirs), Some(&ws.admin), json!({"action": "reject"})).await;
	assert_eq!(resp.status(), StatusCode::OK);

	let resp = app.post(&review(&theirs), Some(&ws.owner), json!({"action": "approve"})).await;
	expect_error(resp, StatusCode::CONFLICT, "conflict").await;

	let missing = uuid::Uuid::new_v4();
	let resp = app.post(&review(&missing.to_string()), Some(&ws.admin), json!({"action": "approve"})).await;
	expect_error(resp, StatusCode::NOT_FOUND, "not_found").await;
}

#[tokio::test]
async fn concurrent_reviews_have_one_winner() {
	let app = TestApp::new().await;
	let ws = app.workspace("race").await;
	let expense = app.create_expense(&ws.id, &ws.member, "Flights", 800.0).await;
	let path = format!("/api/workspaces/{}/expenses/{expense}/review", ws.id);

	let (a, b) = tokio::join!(
		app.post(&path, Some(&ws.admin), json!({"action": "approve"})),
		app.post(&path, Some(&ws.owner), json!({"action": "reject"})),
	);

	let mut statuses = [a.status(), b.status()];
	statuses.sort();
	assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);

	let resp = app.get(&format!("/api/workspaces/{}/expenses", ws.id), Some(&ws.member)).await;
	let body = body_json(resp).await;
	assert_ne!(body["expenses"][0]["status"], "pending");
}

#[tokio::test]
async fn expenses_are_isolated_between_workspaces() {
	let app = TestApp::new().await;
	let a = app.workspace("tenant-a").await;
	let b = app.workspace("tenant-b").await;
	let expense = app.create_expense(&a.id, &a.member, "Secret", 99.0).await;

	// B's owner cannot reach A's expense through B's routes.
	let through_b = format!("/api/workspaces/{}/expenses/{expense}", b.id);
	let resp = app.put(&through_b, Some(&b.owner), json!({"amount": 1.0})).await;
	expect_error(resp, StatusCode::NOT_FOUND, "not_found").await;
	let resp = app.delete(&through_b, Some(&b.owner)).await;
	expect_error(resp, StatusCode::NOT_FOUND, "not_found").await;
	let resp = app
		.post(&format!("{through_b}/review"), Some(&b.owner), json!({"action": "approve"}))
		.await;
	expect_error(resp, StatusCode::NOT_FOUND, "not_found").await;

	// Nor through A's routes, where they are not a member.
	let resp = app
		.get(&format!("/api/workspaces/{}/expenses", a.id), Some(&b.owner))
		.await;
	expect_error(resp, StatusCode::FORBIDDEN, "not_a_member").await;

	let resp = app
		.get(&format!("/api/workspaces/{}/expenses", b.id), Some(&b.owner))
		.await;
	assert!(body_json(resp).await["expenses"].as_array().unwrap().is_empty());
}
