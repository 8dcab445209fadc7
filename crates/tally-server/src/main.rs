// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tally expense-tracking server binary.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tally_server::{create_app_state, create_router, session_sweeper};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Tally server - shared workspace expense tracking.
#[derive(Parser, Debug)]
#[command(name = "tally-server", about = "Tally expense-tracking server", version)]
struct Args {
	/// Configuration file layered over defaults and under environment variables.
	#[arg(long, env = "TALLY_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("tally-server version: {}", env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => tally_server_config::load_config_with_file(path.clone()),
		None => tally_server_config::load_config(),
	}
	.context("failed to load configuration")?;

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		spend_filter = config.budget.spend_filter.as_str(),
		"starting tally-server"
	);

	if config.database.is_in_memory() {
		tracing::warn!("in-memory database: all data is lost on shutdown");
	}

	let pool = tally_server_db::create_pool(&config.database.url)
		.await
		.context("failed to open database")?;
	tally_server_db::run_migrations(&pool)
		.await
		.context("failed to run migrations")?;

	let state = create_app_state(pool, &config);
	let sweeper = session_sweeper::spawn_session_sweeper(
		state.session_repo.clone(),
		session_sweeper::DEFAULT_SWEEP_INTERVAL,
	);

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	let listener = tokio::net::TcpListener::bind(&addr)
		.await
		.with_context(|| format!("failed to bind {addr}"))?;
	tracing::info!(addr = %addr, "listening");

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("received shutdown signal");
		}
	}

	sweeper.abort();
	tracing::info!("server shutdown complete");
	Ok(())
}
