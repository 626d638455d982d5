//! Keycloak admin API representations

pub mod client;
pub mod client_scope;
pub mod realm;
pub mod role;
pub mod token;
pub mod user;

pub use client::ClientRepresentation;
pub use client_scope::{ClientScopeRepresentation, DEFAULT_SCOPE_PROTOCOL};
pub use realm::RealmRepresentation;
pub use role::RoleRepresentation;
pub use token::{OAuthError, TokenResponse};
pub use user::{CredentialRepresentation, UserRepresentation};
