// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! IronPulse: AI-generated workout plans with a local training log
//!
//! This crate provides the backend API that generates workout plans with
//! Gemini, enriches them from a public exercise catalog and tracks workouts
//! per profile.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use dashmap::DashMap;
use db::LocalStore;
use services::{
    CatalogCache, CatalogService, GeminiClient, PlanGenerator, SessionStore, WorkoutRuntime,
};
use tokio::sync::Mutex;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub session: SessionStore,
    pub catalog: CatalogService,
    pub generator: PlanGenerator<GeminiClient>,
    /// One workout runtime per profile
    pub runtimes: DashMap<String, Arc<Mutex<WorkoutRuntime>>>,
}

impl AppState {
    /// Wire up services on top of an opened store.
    ///
    /// A catalog endpoint saved in settings takes precedence over the
    /// configured one.
    pub fn new(config: Config, store: LocalStore) -> Self {
        let session = SessionStore::new(store);

        let endpoint = session
            .catalog_endpoint_override()
            .unwrap_or_else(|| config.catalog_url.clone());
        let catalog = CatalogService::new(endpoint, CatalogCache::new());

        let model = GeminiClient::new(
            config.gemini_base_url.clone(),
            config.gemini_model.clone(),
            config.gemini_api_key.clone(),
        );
        let generator = PlanGenerator::new(model, config.plan_locale.clone());

        Self {
            config,
            session,
            catalog,
            generator,
            runtimes: DashMap::new(),
        }
    }

    /// The workout runtime for `user`, created on first use.
    pub fn runtime_for(&self, user: &str) -> Arc<Mutex<WorkoutRuntime>> {
        self.runtimes
            .entry(user.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(WorkoutRuntime::new())))
            .clone()
    }

    /// Drop a profile's runtime, stopping any running clock.
    pub fn drop_runtime(&self, user: &str) {
        if self.runtimes.remove(user).is_some() {
            tracing::debug!(user, "Dropped workout runtime");
        }
    }
}
