// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use tally_server_auth::{Session, UserId};

use super::support::{body_json, expect_error, TestApp, PASSWORD};

#[tokio::test]
async fn signup_signin_and_me() {
	let app = TestApp::new().await;
	let user = app.user("ada@example.com").await;
	assert!(user.token.starts_with("tly_"));

	let resp = app.get("/auth/me", Some(&user)).await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body = body_json(resp).await;
	assert_eq!(body["email"], "ada@example.com");
	assert_eq!(body["display_name"], "ada example.com");
	assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn signup_normalizes_email_and_rejects_duplicates() {
	let app = TestApp::new().await;
	let payload = json!({
		"email": "  Grace@Example.COM ",
		"password": PASSWORD,
		"first_name": "Grace",
		"last_name": "Hopper",
	});

	let resp = app.post("/auth/signup", None, &payload).await;
	assert_eq!(resp.status(), StatusCode::CREATED);
	assert_eq!(body_json(resp).await["email"], "grace@example.com");

	let resp = app.post("/auth/signup", None, &payload).await;
	expect_error(resp, StatusCode::CONFLICT, "conflict").await;
}

#[tokio::test]
async fn signup_validates_input() {
	let app = TestApp::new().await;

	let resp = app
		.post(
			"/auth/signup",
			None,
			json!({"email": "not-an-email", "password": PASSWORD, "first_name": "A", "last_name": "B"}),
		)
		.await;
	expect_error(resp, StatusCode::BAD_REQUEST, "validation_error").await;

	let resp = app
		.post(
			"/auth/signup",
			None,
			json!({"email": "short@example.com", "password": "short", "first_name": "A", "last_name": "B"}),
		)
		.await;
	expect_error(resp, StatusCode::BAD_REQUEST, "validation_error").await;

	let resp = app
		.post(
			"/auth/signup",
			None,
			json!({"email": "blank@example.com", "password": PASSWORD, "first_name": "  ", "last_name": "B"}),
		)
		.await;
	expect_error(resp, StatusCode::BAD_REQUEST, "validation_error").await;
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
	let app = TestApp::new().await;
	app.user("linus@example.com").await;

	let wrong = app
		.post(
			"/auth/signin",
			None,
			json!({"email": "linus@example.com", "password": "not the password"}),
		)
		.await;
	let wrong = expect_error(wrong, StatusCode::UNAUTHORIZED, "unauthorized").await;

	let unknown = app
		.post(
			"/auth/signin",
			None,
			json!({"email": "nobody@example.com", "password": PASSWORD}),
		)
		.await;
	let unknown = expect_error(unknown, StatusCode::UNAUTHORIZED, "unauthorized").await;

	assert_eq!(wrong["message"], unknown["message"]);
}

#[tokio::test]
async fn protected_routes_require_a_session() {
	let app = TestApp::new().await;

	let resp = app.get("/auth/me", None).await;
	expect_error(resp, StatusCode::UNAUTHORIZED, "unauthorized").await;

	let resp = app.get_with_token("/api/workspaces", "garbage").await;
	expect_error(resp, StatusCode::UNAUTHORIZED, "unauthorized").await;

	let unknown = format!("tly_{}", "a".repeat(64));
	let resp = app.get_with_token("/api/workspaces", &unknown).await;
	expect_error(resp, StatusCode::UNAUTHORIZED, "unauthorized").await;
}

#[tokio::test]
async fn expired_session_does_not_authenticate() {
	let app = TestApp::new().await;
	let user = app.user("expired@example.com").await;
	let user_id = UserId::new(user.id.parse().unwrap());

	let (mut session, token) = Session::new(user_id, 1);
	session.expires_at = Utc::now() - Duration::minutes(1);
	app.state.session_repo.create_session(&session).await.unwrap();

	let resp = app.get_with_token("/auth/me", &token).await;
	expect_error(resp, StatusCode::UNAUTHORIZED, "unauthorized").await;
}

#[tokio::test]
async fn signout_invalidates_the_session() {
	let app = TestApp::new().await;
	let user = app.user("bye@example.com").await;

	let resp = app.post("/auth/signout", Some(&user), json!({})).await;
	assert_eq!(resp.status(), StatusCode::NO_CONTENT);

	let resp = app.get("/auth/me", Some(&user)).await;
	assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_reports_database_status() {
	let app = TestApp::new().await;
	let resp = app.get("/health", None).await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body = body_json(resp).await;
	assert_eq!(body["status"], "healthy");
	assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn openapi_document_is_served() {
	let app = TestApp::new().await;
	let resp = app.get("/api-docs/openapi.json", None).await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body = body_json(resp).await;
	assert!(body["paths"]["/api/workspaces/{workspace_id}/expenses"].is_object());
}
