//! Keycloak admin API client modules

mod client;
mod client_roles;
mod client_scopes;
mod clients;
mod realms;
mod roles;
mod users;

pub use client::ApiClient;
pub(crate) use client::missing_id;
pub use client_scopes::ScopeAssignment;
