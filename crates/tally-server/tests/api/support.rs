// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	body::Body,
	http::{header, Method, Request, StatusCode},
	response::Response,
	Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use tally_server::{
	api::{create_app_state, create_router, AppState},
	ServerConfig,
};

pub const PASSWORD: &str = "correct horse battery";

#[derive(Clone, Debug)]
pub struct TestUser {
	pub id: String,
	pub email: String,
	pub token: String,
}

/// A workspace with one user per role.
pub struct WorkspaceFixture {
	pub id: String,
	pub owner: TestUser,
	pub admin: TestUser,
	pub member: TestUser,
	pub viewer: TestUser,
}

pub struct TestApp {
	pub router: Router,
	pub state: AppState,
	_temp_dir: TempDir,
}

impl TestApp {
	pub async fn new() -> Self {
		Self::with_config(ServerConfig::default()).await
	}

	pub async fn with_config(config: ServerConfig) -> Self {
		let temp_dir = tempfile::tempdir().unwrap();
		let db_path = temp_dir.path().join("tally_test.db");
		let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

		let pool = tally_server_db::create_pool(&db_url).await.unwrap();
		tally_server_db::run_migrations(&pool).await.unwrap();

		let state = create_app_state(pool, &config);
		let router = create_router(state.clone());

		Self {
			router,
			state,
			_temp_dir: temp_dir,
		}
	}

	pub async fn get(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self.request(Method::GET, path, user, Option::<()>::None).await
	}

	pub async fn post(&self, path: &str, user: Option<&TestUser>, body: impl Serialize) -> Response<Body> {
		self.request(Method::POST, path, user, Some(body)).await
	}

	pub async fn put(&self, path: &str, user: Option<&TestUser>, body: impl Serialize) -> Response<Body> {
		self.request(Method::PUT, path, user, Some(body)).await
	}

	pub async fn delete(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self.request(Method::DELETE, path, user, Option::<()>::None).await
	}

	/// Sends a request with a raw bearer token.
	pub async fn get_with_token(&self, path: &str, token: &str) -> Response<Body> {
		let request = Request::builder()
			.method(Method::GET)
			.uri(path)
			.header(header::AUTHORIZATION, format!("Bearer {token}"))
			.body(Body::empty())
			.unwrap();
		self.router.clone().oneshot(request).await.unwrap()
	}

	/// Posts `body` verbatim as `application/json`.
	pub async fn post_raw(&self, path: &str, user: &TestUser, body: &'static str) -> Response<Body> {
		let request = Request::builder()
			.method(Method::POST)
			.uri(path)
			.header(header::AUTHORIZATION, format!("Bearer {}", user.token))
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(body))
			.unwrap();
		self.router.clone().oneshot(request).await.unwrap()
	}

	async fn request<T: Serialize>(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		body: Option<T>,
	) -> Response<Body> {
		let mut builder = Request::builder().method(method).uri(path);

		if let Some(test_user) = user {
			builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", test_user.token));
		}

		let request_body = match body {
			Some(b) => {
				builder = builder.header(header::CONTENT_TYPE, "application/json");
				Body::from(serde_json::to_string(&b).unwrap())
			}
			None => Body::empty(),
		};

		let request = builder.body(request_body).unwrap();
		self.router.clone().oneshot(request).await.unwrap()
	}

	/// Signs up and signs in a user, returning their session.
	pub async fn user(&self, email: &str) -> TestUser {
		let (first, last) = email.split_once('@').unwrap_or((email, "example"));
		let resp = self
			.post(
				"/auth/signup",
				None,
				json!({
					"email": email,
					"password": PASSWORD,
					"first_name": first,
					"last_name": last,
				}),
			)
			.await;
		assert_eq!(resp.status(), StatusCode::CREATED, "signup {email}");

		let resp = self
			.post("/auth/signin", None, json!({"email": email, "password": PASSWORD}))
			.await;
		assert_eq!(resp.status(), StatusCode::OK, "signin {email}");
		let body = body_json(resp).await;

		TestUser {
			id: body["user"]["id"].as_str().unwrap().to_string(),
			email: email.to_string(),
			token: body["token"].as_str().unwrap().to_string(),
		}
	}

	pub async fn create_workspace(&self, owner: &TestUser, name: &str) -> String {
		let resp = self.post("/api/workspaces", Some(owner), json!({"name": name})).await;
		assert_eq!(resp.status(), StatusCode::CREATED);
		body_json(resp).await["id"].as_str().unwrap().to_string()
	}

	pub async fn invite(&self, workspace_id: &str, inviter: &TestUser, invitee: &TestUser, role: &str) {
		let resp = self
			.post(
				&format!("/api/workspaces/{workspace_id}/members"),
				Some(inviter),
				json!({"email": invitee.email, "role": role}),
			)
			.await;
		assert_eq!(resp.status(), StatusCode::CREATED, "invite {} as {role}", invitee.email);
	}

	/// A workspace named `name` whose users are `<role>.<name>@example.com`.
	pub async fn workspace(&self, name: &str) -> WorkspaceFixture {
		let owner = self.user(&format!("owner.{name}@example.com")).await;
		let admin = self.user(&format!("admin.{name}@example.com")).await;
		let member = self.user(&format!("member.{name}@example.com")).await;
		let viewer = self.user(&format!("viewer.{name}@example.com")).await;

		let id = self.create_workspace(&owner, name).await;
		self.invite(&id, &owner, &admin, "admin").await;
		self.invite(&id, &owner, &member, "member").await;
		self.invite(&id, &owner, &viewer, "viewer").await;

		WorkspaceFixture {
			id,
			owner,
			admin,
			member,
			viewer,
		}
	}

	pub async fn create_expense(&self, workspace_id: &str, user: &TestUser, title: &str, amount: f64) -> String {
		let resp = self
			.post(
				&format!("/api/workspaces/{workspace_id}/expenses"),
				Some(user),
				json!({"title": title, "amount": amount}),
			)
			.await;
		assert_eq!(resp.status(), StatusCode::CREATED, "create expense {title}");
		body_json(resp).await["id"].as_str().unwrap().to_string()
	}
}

pub async fn body_json(resp: Response<Body>) -> Value {
	let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

/// Asserts an error response and returns its body.
pub async fn expect_error(resp: Response<Body>, status: StatusCode, code: &str) -> Value {
	assert_eq!(resp.status(), status);
	let body = body_json(resp).await;
	assert_eq!(body["error"], code, "unexpected error body: {body}");
	body
}
