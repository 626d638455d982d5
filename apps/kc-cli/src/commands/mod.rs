//! CLI command implementations
//!
//! Each resource module holds its clap arguments and a thin
//! [`ManagedResource`](crate::batch::ManagedResource) adapter.

pub mod client_roles;
pub mod client_scopes;
pub mod clients;
pub mod realms;
pub mod roles;
pub mod users;

use crate::batch::BatchReport;
use crate::context::Invocation;
use crate::error::{CliError, CliResult};
use clap::Subcommand;
use std::time::Duration;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect realms
    Realms(realms::RealmsArgs),

    /// Manage realm roles
    Roles(roles::RolesArgs),

    /// Manage users
    Users(users::UsersArgs),

    /// Manage clients and their scope assignments
    Clients(clients::ClientsArgs),

    /// Manage roles of a client
    ClientRoles(client_roles::ClientRolesArgs),

    /// Manage realm client scopes
    ClientScopes(client_scopes::ClientScopesArgs),
}

impl Commands {
    /// Command path as recorded in the audit trail, e.g. `kc roles create`
    pub fn path(&self) -> String {
        let (group, verb) = match self {
            Commands::Realms(a) => ("realms", a.command.verb()),
            Commands::Roles(a) => ("roles", a.command.verb()),
            Commands::Users(a) => ("users", a.command.verb()),
            Commands::Clients(a) => ("clients", a.command.verb()),
            Commands::ClientRoles(a) => ("client-roles", a.command.verb()),
            Commands::ClientScopes(a) => ("client-scopes", a.command.verb()),
        };
        format!("kc {group} {verb}")
    }

    /// Deadline for the whole command
    pub fn timeout(&self) -> Duration {
        let secs = match self {
            Commands::Realms(_) => 30,
            Commands::Roles(_) | Commands::ClientRoles(_) | Commands::ClientScopes(_) => 60,
            Commands::Users(_) => 120,
            Commands::Clients(a) if a.command.is_list() => 60,
            Commands::Clients(_) => 120,
        };
        Duration::from_secs(secs)
    }
}

/// Run a parsed command, collecting output lines in `report`
pub async fn execute(
    command: Commands,
    inv: &mut Invocation,
    report: &mut BatchReport,
) -> CliResult<()> {
    match command {
        Commands::Realms(args) => realms::execute(args, inv, report).await,
        Commands::Roles(args) => roles::execute(args, inv, report).await,
        Commands::Users(args) => users::execute(args, inv, report).await,
        Commands::Clients(args) => clients::execute(args, inv, report).await,
        Commands::ClientRoles(args) => client_roles::execute(args, inv, report).await,
        Commands::ClientScopes(args) => client_scopes::execute(args, inv, report).await,
    }
}

/// Reject an update that would change nothing
pub(crate) fn require_any_field(changes: &[bool], flags: &str) -> CliResult<()> {
    if changes.iter().any(|c| *c) {
        Ok(())
    } else {
        Err(CliError::Validation(format!(
            "nothing to update: pass at least one of {flags}"
        )))
    }
}

/// Parent client id required by nested commands
pub(crate) fn require_client_id(client_id: Option<String>) -> CliResult<String> {
    client_id
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| CliError::Validation("--client-id is required".to_string()))
}
