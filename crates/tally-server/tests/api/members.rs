// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;
use serde_json::json;

use super::support::{body_json, expect_error, TestApp};

#[tokio::test]
async fn admin_invites_existing_user() {
	let app = TestApp::new().await;
	let ws = app.workspace("invites").await;
	let newcomer = app.user("Newcomer@example.com").await;

	let resp = app
		.post(
			&format!("/api/workspaces/{}/members", ws.id),
			Some(&ws.admin),
			json!({"email": "NEWCOMER@example.com", "role": "member"}),
		)
		.await;
	assert_eq!(resp.status(), StatusCode::CREATED);
	let body = body_json(resp).await;
	assert_eq!(body["user"]["id"], newcomer.id.as_str());
	assert_eq!(body["role"], "member");

	let resp = app
		.get(&format!("/api/workspaces/{}/members", ws.id), Some(&newcomer))
		.await;
	assert_eq!(body_json(resp).await["members"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn inviting_unknown_email_creates_nothing() {
	let app = TestApp::new().await;
	let ws = app.workspace("ghosts").await;
	let members_path = format!("/api/workspaces/{}/members", ws.id);

	let resp = app
		.post(
			&members_path,
			Some(&ws.owner),
			json!({"email": "ghost@example.com", "role": "member"}),
		)
		.await;
	expect_error(resp, StatusCode::NOT_FOUND, "user_not_found").await;

	let resp = app.get(&members_path, Some(&ws.owner)).await;
	assert_eq!(body_json(resp).await["members"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn invite_rejects_owner_role_unknown_role_and_duplicates() {
	let app = TestApp::new().await;
	let ws = app.workspace("rules").await;
	let candidate = app.user("candidate@example.com").await;
	let members_path = format!("/api/workspaces/{}/members", ws.id);

	let resp = app
		.post(&members_path, Some(&ws.owner), json!({"email": candidate.email, "role": "owner"}))
		.await;
	expect_error(resp, StatusCode::BAD_REQUEST, "validation_error").await;

	let resp = app
		.post(&members_path, Some(&ws.owner), json!({"email": candidate.email, "role": "superuser"}))
		.await;
	expect_error(resp, StatusCode::BAD_REQUEST, "validation_error").await;

	let resp = app
		.post(&members_path, Some(&ws.owner), json!({"email": ws.member.email, "role": "viewer"}))
		.await;
	expect_error(resp, StatusCode::CONFLICT, "conflict").await;
}

#[tokio::test]
async fn members_and_viewers_cannot_invite() {
	let app = TestApp::new().await;
	let ws = app.workspace("closed").await;
	let candidate = app.user("hopeful@example.com").await;
	let members_path = format!("/api/workspaces/{}/members", ws.id);

	for user in [&ws.member, &ws.viewer] {
		let resp = app
			.post(&members_path, Some(user), json!({"email": candidate.email, "role": "member"}))
			.await;
		let body = expect_error(resp, StatusCode::FORBIDDEN, "insufficient_role").await;
		assert_eq!(body["required"], json!(["owner", "admin"]));
	}
}

#[tokio::test]
async fn role_changes_follow_owner_rules() {
	let app = TestApp::new().await;
	let ws = app.workspace("promotions").await;
	let member_path = format!("/api/workspaces/{}/members/{}", ws.id, ws.member.id);

	let resp = app.put(&member_path, Some(&ws.admin), json!({"role": "admin"})).await;
	assert_eq!(resp.status(), StatusCode::OK);
	assert_eq!(body_json(resp).await["role"], "admin");

	// Only owners grant ownership.
	let resp = app.put(&member_path, Some(&ws.admin), json!({"role": "owner"})).await;
	expect_error(resp, StatusCode::FORBIDDEN, "forbidden").await;

	let resp = app.put(&member_path, Some(&ws.owner), json!({"role": "owner"})).await;
	assert_eq!(resp.status(), StatusCode::OK);

	// Admins cannot demote owners.
	let resp = app.put(&member_path, Some(&ws.admin), json!({"role": "viewer"})).await;
	expect_error(resp, StatusCode::FORBIDDEN, "forbidden").await;

	let resp = app.put(&member_path, Some(&ws.owner), json!({"role": "nonsense"})).await;
	expect_error(resp, StatusCode::BAD_REQUEST, "validation_error").await;
}

#[tokio::test]
async fn last_owner_cannot_be_demoted_or_removed() {
	let app = TestApp::new().await;
	let ws = app.workspace("solo-owner").await;
	let owner_path = format!("/api/workspaces/{}/members/{}", ws.id, ws.owner.id);

	let resp = app.put(&owner_path, Some(&ws.owner), json!({"role": "admin"})).await;
	expect_error(resp, StatusCode::CONFLICT, "conflict").await;

	let resp = app.delete(&owner_path, Some(&ws.owner)).await;
	expect_error(resp, StatusCode::CONFLICT, "conflict").await;

	let resp = app.get(&format!("/api/workspaces/{}/members", ws.id), Some(&ws.owner)).await;
	let body = body_json(resp).await;
	let owners = body["members"]
		.as_array()
		.unwrap()
		.iter()
		.filter(|m| m["role"] == "owner")
		.count();
	assert_eq!(owners, 1);
}

#[tokio::test]
async fn removing_members() {
	let app = TestApp::new().await;
	let ws = app.workspace("pruning").await;
	let viewer_path = format!("/api/workspaces/{}/members/{}", ws.id, ws.viewer.id);

	let resp = app.delete(&viewer_path, Some(&ws.member)).await;
	expect_error(resp, StatusCode::FORBIDDEN, "insufficient_role").await;

	let resp = app.delete(&viewer_path, Some(&ws.admin)).await;
	assert_eq!(resp.status(), StatusCode::NO_CONTENT);

	let resp = app.delete(&viewer_path, Some(&ws.admin)).await;
	expect_error(resp, StatusCode::NOT_FOUND, "not_found").await;

	// The removed viewer loses access.
	let resp = app
		.get(&format!("/api/workspaces/{}/expenses", ws.id), Some(&ws.viewer))
		.await;
	expect_error(resp, StatusCode::FORBIDDEN, "not_a_member").await;

	// Admins cannot remove owners.
	let owner_path = format!("/api/workspaces/{}/members/{}", ws.id, ws.owner.id);
	let resp = app.delete(&owner_path, Some(&ws.admin)).await;
	expect_error(resp, StatusCode::FORBIDDEN, "forbidden").await;
}
