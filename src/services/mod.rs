// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod enrich;
pub mod gemini;
pub mod generator;
pub mod runtime;
pub mod session;

pub use catalog::{CatalogCache, CatalogQuery, CatalogService};
pub use enrich::{enrich, enrich_from_catalog};
pub use gemini::{ContentModel, GeminiClient};
pub use generator::PlanGenerator;
pub use runtime::{RuntimeSnapshot, RuntimeState, WorkoutRuntime};
pub use session::SessionStore;
