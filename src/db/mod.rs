//! Persistence layer (local JSON key-value store).

pub mod local_store;

pub use local_store::LocalStore;

/// Storage keys. Per-user keys share the `ironpulse_<user>_` prefix.
pub mod keys {
    pub const APP_PREFIX: &str = "ironpulse";
    pub const CURRENT_USER: &str = "ironpulse_current_user";
    pub const USERS: &str = "ironpulse_users";
    /// Catalog endpoint override set from the settings screen
    pub const CATALOG_URL_OVERRIDE: &str = "custom_api_url";

    const STATS: &str = "stats";
    const HISTORY: &str = "history";
    const SAVED_WORKOUTS: &str = "saved_workouts";

    pub fn user_prefix(user: &str) -> String {
        format!("{}_{}_", APP_PREFIX, user)
    }

    pub fn stats(user: &str) -> String {
        format!("{}{}", user_prefix(user), STATS)
    }

    pub fn history(user: &str) -> String {
        format!("{}{}", user_prefix(user), HISTORY)
    }

    pub fn saved_workouts(user: &str) -> String {
        format!("{}{}", user_prefix(user), SAVED_WORKOUTS)
    }
}
