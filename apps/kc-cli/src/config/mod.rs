//! Configuration management for the kc CLI

mod paths;
mod settings;

pub use paths::ConfigPaths;
pub use settings::{Config, GrantType};

/// Realm used for token acquisition when `auth_realm` is not configured
pub const DEFAULT_AUTH_REALM: &str = "master";

/// Client used for the password grant when no `client_id` is configured
pub const DEFAULT_ADMIN_CLIENT: &str = "admin-cli";
