// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local runs. The Gemini credential is
//! optional at startup; generation reports a configuration error when it
//! is missing so the rest of the app stays usable.

use std::env;
use std::path::PathBuf;

/// Public JSON list used when no catalog override is stored.
pub const DEFAULT_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/luiizsilverio/api-academia/main/api.json";

/// Gemini REST base URL (v1beta exposes `responseSchema`).
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Language the generated plan is written in. Matches the catalog vocabulary.
pub const DEFAULT_PLAN_LOCALE: &str = "Brazilian Portuguese (pt-BR)";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key (None disables generation)
    pub gemini_api_key: Option<String>,
    /// Gemini model name
    pub gemini_model: String,
    /// Gemini REST base URL
    pub gemini_base_url: String,
    /// Exercise catalog endpoint (overridable at runtime via settings)
    pub catalog_url: String,
    /// Language requested for generated plans
    pub plan_locale: String,
    /// Path of the local JSON key-value store
    pub data_path: PathBuf,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: "http://127.0.0.1:9/v1beta".to_string(),
            catalog_url: "http://127.0.0.1:9/api.json".to_string(),
            plan_locale: DEFAULT_PLAN_LOCALE.to_string(),
            data_path: PathBuf::from("target/test-data/ironpulse.json"),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let gemini_api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let catalog_url =
            env::var("CATALOG_URL").unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string());
        validate_url("CATALOG_URL", &catalog_url)?;

        let gemini_base_url = env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        validate_url("GEMINI_BASE_URL", &gemini_base_url)?;

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                reason: format!("'{}' is not a port number", raw),
            })?,
            Err(_) => 8080,
        };

        Ok(Self {
            gemini_api_key,
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url,
            catalog_url,
            plan_locale: env::var("PLAN_LOCALE")
                .unwrap_or_else(|_| DEFAULT_PLAN_LOCALE.to_string()),
            data_path: env::var("DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/ironpulse.json")),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port,
        })
    }
}

fn validate_url(var: &'static str, value: &str) -> Result<(), ConfigError> {
    reqwest::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}
