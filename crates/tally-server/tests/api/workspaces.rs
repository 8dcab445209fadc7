// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;
use serde_json::json;

use super::support::{body_json, expect_error, TestApp};

#[tokio::test]
async fn creator_becomes_owner() {
	let app = TestApp::new().await;
	let user = app.user("founder@example.com").await;

	let resp = app
		.post("/api/workspaces", Some(&user), json!({"name": "  Household  "}))
		.await;
	assert_eq!(resp.status(), StatusCode::CREATED);
	let body = body_json(resp).await;
	assert_eq!(body["name"], "Household");
	assert_eq!(body["role"], "owner");
	assert_eq!(body["owner_id"], user.id.as_str());

	let resp = app
		.get(&format!("/api/workspaces/{}/members", body["id"].as_str().unwrap()), Some(&user))
		.await;
	let members = body_json(resp).await;
	assert_eq!(members["members"].as_array().unwrap().len(), 1);
	assert_eq!(members["members"][0]["role"], "owner");
}

#[tokio::test]
async fn blank_name_is_rejected() {
	let app = TestApp::new().await;
	let user = app.user("blank@example.com").await;

	let resp = app.post("/api/workspaces", Some(&user), json!({"name": "   "})).await;
	expect_error(resp, StatusCode::BAD_REQUEST, "validation_error").await;
}

#[tokio::test]
async fn list_shows_only_joined_workspaces_with_roles() {
	let app = TestApp::new().await;
	let ws = app.workspace("acme").await;
	let outsider = app.user("outsider@example.com").await;
	app.create_workspace(&outsider, "Solo").await;

	let resp = app.get("/api/workspaces", Some(&ws.viewer)).await;
	let body = body_json(resp).await;
	let workspaces = body["workspaces"].as_array().unwrap();
	assert_eq!(workspaces.len(), 1);
	assert_eq!(workspaces[0]["id"], ws.id.as_str());
	assert_eq!(workspaces[0]["role"], "viewer");

	let resp = app.get("/api/workspaces", Some(&outsider)).await;
	let body = body_json(resp).await;
	assert_eq!(body["workspaces"].as_array().unwrap().len(), 1);
	assert_eq!(body["workspaces"][0]["name"], "Solo");
}

#[tokio::test]
async fn owner_transfers_ownership_and_becomes_admin() {
	let app = TestApp::new().await;
	let ws = app.workspace("handover").await;
	let path = format!("/api/workspaces/{}/transfer-ownership", ws.id);

	let resp = app.post(&path, Some(&ws.owner), json!({"user_id": ws.admin.id})).await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body = body_json(resp).await;
	assert_eq!(body["owner_id"], ws.admin.id.as_str());
	assert_eq!(body["role"], "admin");

	let resp = app.get(&format!("/api/workspaces/{}/members", ws.id), Some(&ws.owner)).await;
	let members = body_json(resp).await;
	let role_of = |id: &str| {
		members["members"]
			.as_array()
			.unwrap()
			.iter()
			.find(|m| m["user"]["id"] == id)
			.map(|m| m["role"].as_str().unwrap().to_string())
			.unwrap()
	};
	assert_eq!(role_of(&ws.admin.id), "owner");
	assert_eq!(role_of(&ws.owner.id), "admin");

	// The former owner can no longer transfer.
	let resp = app.post(&path, Some(&ws.owner), json!({"user_id": ws.member.id})).await;
	let body = expect_error(resp, StatusCode::FORBIDDEN, "insufficient_role").await;
	assert_eq!(body["your_role"], "admin");
}

#[tokio::test]
async fn transfer_requires_a_member_target_other_than_self() {
	let app = TestApp::new().await;
	let ws = app.workspace("nowhere").await;
	let outsider = app.user("outsider.nowhere@example.com").await;
	let path = format!("/api/workspaces/{}/transfer-ownership", ws.id);

	let resp = app.post(&path, Some(&ws.owner), json!({"user_id": ws.owner.id})).await;
	expect_error(resp, StatusCode::BAD_REQUEST, "validation_error").await;

	let resp = app.post(&path, Some(&ws.owner), json!({"user_id": outsider.id})).await;
	expect_error(resp, StatusCode::NOT_FOUND, "not_found").await;

	let resp = app.post(&path, Some(&ws.admin), json!({"user_id": ws.member.id})).await;
	expect_error(resp, StatusCode::FORBIDDEN, "insufficient_role").await;
}

#[tokio::test]
async fn unknown_workspace_is_treated_as_non_membership() {
	let app = TestApp::new().await;
	let user = app.user("lost@example.com").await;
	let missing = uuid::Uuid::new_v4();

	let resp = app
		.get(&format!("/api/workspaces/{missing}/expenses"), Some(&user))
		.await;
	expect_error(resp, StatusCode::FORBIDDEN, "not_a_member").await;
}
