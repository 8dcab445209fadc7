// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod auth;
mod budgets;
mod events;
mod expenses;
mod members;
mod support;
mod workspaces;
