// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request body extraction.

use axum::extract::FromRequest;

use crate::error::ServerError;

/// `axum::Json` whose rejections (missing fields, wrong types, bad syntax or
/// content type) become a 400 `validation_error`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct ApiJson<T>(pub T);
