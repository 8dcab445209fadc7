// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use axum::{body::Body, http::StatusCode, response::Response};
use futures::StreamExt;
use serde_json::{json, Value};

use super::support::{expect_error, TestApp};

/// Reads SSE frames until one carries data, returning its event name and payload.
async fn next_event(stream: &mut axum::body::BodyDataStream) -> (String, Value) {
	let mut buffer = String::new();
	loop {
		let chunk = tokio::time::timeout(Duration::from_secs(5), stream.next())
			.await
			.expect("timed out waiting for event")
			.expect("stream ended")
			.unwrap();
		buffer.push_str(std::str::from_utf8(&chunk).unwrap());

		while let Some(end) = buffer.find("\n\n") {
			let frame: String = buffer.drain(..end + 2).collect();
			let mut name = None;
			let mut data = None;
			for line in frame.lines() {
				if let Some(v) = line.strip_prefix("event:") {
					name = Some(v.trim().to_string());
				} else if let Some(v) = line.strip_prefix("data:") {
					data = Some(v.trim().to_string());
				}
			}
			if let (Some(name), Some(data)) = (name, data) {
				return (name, serde_json::from_str(&data).unwrap());
			}
		}
	}
}

fn event_stream(resp: Response<Body>) -> axum::body::BodyDataStream {
	assert_eq!(resp.status(), StatusCode::OK);
	let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
	assert!(content_type.starts_with("text/event-stream"), "{content_type}");
	resp.into_body().into_data_stream()
}

#[tokio::test]
async fn subscribers_see_changes_in_their_workspace_only() {
	let app = TestApp::new().await;
	let a = app.workspace("stream-a").await;
	let b = app.workspace("stream-b").await;

	let resp = app
		.get(&format!("/api/workspaces/{}/expenses/events", a.id), Some(&a.viewer))
		.await;
	let mut stream = event_stream(resp);

	// Activity in B is filtered out of A's stream.
	app.create_expense(&b.id, &b.member, "Elsewhere", 5.0).await;
	let expense = app.create_expense(&a.id, &a.member, "Here", 7.0).await;

	let (name, payload) = next_event(&mut stream).await;
	assert_eq!(name, "created");
	assert_eq!(payload["workspace_id"], a.id.as_str());
	assert_eq!(payload["expense_id"], expense.as_str());
	assert_eq!(payload["kind"], "created");

	let path = format!("/api/workspaces/{}/expenses/{expense}", a.id);
	app.post(&format!("{path}/review"), Some(&a.admin), json!({"action": "approve"}))
		.await;
	let (name, payload) = next_event(&mut stream).await;
	assert_eq!(name, "reviewed");
	assert_eq!(payload["expense_id"], expense.as_str());

	app.delete(&path, Some(&a.owner)).await;
	let (name, _) = next_event(&mut stream).await;
	assert_eq!(name, "deleted");
}

#[tokio::test]
async fn updates_are_published() {
	let app = TestApp::new().await;
	let ws = app.workspace("stream-update").await;
	let expense = app.create_expense(&ws.id, &ws.member, "Draft", 1.0).await;

	let resp = app
		.get(&format!("/api/workspaces/{}/expenses/events", ws.id), Some(&ws.member))
		.await;
	let mut stream = event_stream(resp);

	let resp = app
		.put(
			&format!("/api/workspaces/{}/expenses/{expense}", ws.id),
			Some(&ws.member),
			json!({"amount": 2.0}),
		)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);

	let (name, payload) = next_event(&mut stream).await;
	assert_eq!(name, "updated");
	assert_eq!(payload["kind"], "updated");
}

#[tokio::test]
async fn outsiders_cannot_subscribe() {
	let app = TestApp::new().await;
	let ws = app.workspace("stream-private").await;
	let outsider = app.user("eavesdropper@example.com").await;

	let resp = app
		.get(&format!("/api/workspaces/{}/expenses/events", ws.id), Some(&outsider))
		.await;
	expect_error(resp, StatusCode::FORBIDDEN, "not_a_member").await;

	let resp = app
		.get(&format!("/api/workspaces/{}/expenses/events", ws.id), None)
		.await;
	expect_error(resp, StatusCode::UNAUTHORIZED, "unauthorized").await;
}
