//! kc CLI library
//!
//! Batch create/update/delete/list of Keycloak realm resources across one or
//! many realms, with a mirrored execution log and a CSV audit trail. The
//! binary in main.rs is a thin wrapper around [`cli::main_entry`].

pub mod api;
pub mod audit;
pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod password;
