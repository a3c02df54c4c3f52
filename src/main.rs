// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! IronPulse API Server
//!
//! Generates workout plans with Gemini, enriches them from the exercise
//! catalog and keeps a per-profile training log in a local store.

use anyhow::Context;
use ironpulse::{config::Config, db::LocalStore, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging()?;

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        port = config.port,
        model = %config.gemini_model,
        ai_configured = config.gemini_api_key.is_some(),
        "Starting IronPulse API"
    );
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set, plan generation will fail");
    }

    let store = LocalStore::open(&config.data_path).context("Failed to open local store")?;

    let state = Arc::new(AppState::new(config.clone(), store));
    tracing::info!(endpoint = %state.catalog.endpoint(), "Exercise catalog configured");

    let app = ironpulse::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ironpulse=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
