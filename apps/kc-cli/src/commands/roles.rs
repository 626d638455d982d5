//! Realm role commands

use crate::api::ApiClient;
use crate::batch::{
    list_all, reconcile, require_keys, BatchReport, FieldValues, ManagedResource, Mutation, Probe,
    RealmSelection, Verb,
};
use crate::commands::require_any_field;
use crate::context::Invocation;
use crate::error::CliResult;
use crate::models::RoleRepresentation;
use async_trait::async_trait;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct RolesArgs {
    /// Default realm for this command
    #[arg(long)]
    pub realm: Option<String>,

    #[command(subcommand)]
    pub command: RolesCommands,
}

#[derive(Subcommand, Debug)]
pub enum RolesCommands {
    /// Create realm roles (existing roles are skipped)
    Create(CreateArgs),
    /// Update realm roles
    Update(UpdateArgs),
    /// Delete realm roles
    Delete(DeleteArgs),
    /// List realm roles
    List(ListArgs),
}

impl RolesCommands {
    pub fn verb(&self) -> &'static str {
        match self {
            RolesCommands::Create(_) => "create",
            RolesCommands::Update(_) => "update",
            RolesCommands::Delete(_) => "delete",
            RolesCommands::List(_) => "list",
        }
    }
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Role name (repeatable or comma-separated)
    #[arg(long = "name", value_delimiter = ',')]
    pub names: Vec<String>,

    /// Description: once for all roles or once per --name
    #[arg(long = "description")]
    pub descriptions: Vec<String>,

    #[command(flatten)]
    pub target: RealmSelection,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Role name (repeatable or comma-separated)
    #[arg(long = "name", value_delimiter = ',')]
    pub names: Vec<String>,

    /// New description: once for all roles or once per --name
    #[arg(long = "description")]
    pub descriptions: Vec<String>,

    /// Rename: once per --name
    #[arg(long = "new-name")]
    pub new_names: Vec<String>,

    /// Skip roles that do not exist
    #[arg(long)]
    pub ignore_missing: bool,

    #[command(flatten)]
    pub target: RealmSelection,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Role name (repeatable or comma-separated)
    #[arg(long = "name", value_delimiter = ',')]
    pub names: Vec<String>,

    /// Skip roles that do not exist
    #[arg(long)]
    pub ignore_missing: bool,

    #[command(flatten)]
    pub target: RealmSelection,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub target: RealmSelection,
}

/// Realm roles, keyed by name
struct RealmRoles<'a> {
    api: &'a ApiClient,
    descriptions: FieldValues<String>,
    new_names: FieldValues<String>,
}

impl<'a> RealmRoles<'a> {
    fn new(api: &'a ApiClient) -> Self {
        Self {
            api,
            descriptions: FieldValues::default(),
            new_names: FieldValues::default(),
        }
    }
}

#[async_trait]
impl ManagedResource for RealmRoles<'_> {
    type Existing = RoleRepresentation;

    fn noun(&self) -> &'static str {
        "role"
    }

    async fn probe(&mut self, realm: &str, key: &str) -> CliResult<Probe<RoleRepresentation>> {
        Probe::from_lookup(self.api.get_realm_role(realm, key).await)
    }

    async fn create(&mut self, realm: &str, index: usize, key: &str) -> CliResult<Mutation> {
        let role = RoleRepresentation::new(key, self.descriptions.cloned(index));
        self.api.create_realm_role(realm, &role).await?;
        Ok(Mutation::done())
    }

    async fn update(
        &mut self,
        realm: &str,
        index: usize,
        key: &str,
        mut role: RoleRepresentation,
    ) -> CliResult<Mutation> {
        if let Some(description) = self.descriptions.cloned(index) {
            role.description = Some(description);
        }
        let mut mutation = Mutation::done();
        if let Some(new_name) = self.new_names.cloned(index) {
            mutation = mutation.note(format!("  Renamed {key:?} to {new_name:?}."));
            role.name = new_name;
        }
        self.api.update_realm_role(realm, key, &role).await?;
        Ok(mutation)
    }

    async fn delete(
        &mut self,
        realm: &str,
        key: &str,
        _role: RoleRepresentation,
    ) -> CliResult<Mutation> {
        self.api.delete_realm_role(realm, key).await?;
        Ok(Mutation::done())
    }

    async fn list(&mut self, realm: &str) -> CliResult<Vec<String>> {
        let roles = self.api.list_realm_roles(realm).await?;
        Ok(roles.into_iter().map(|r| describe(&r)).collect())
    }
}

/// `name` or `name - description`
pub(crate) fn describe(role: &RoleRepresentation) -> String {
    match role.description.as_deref().filter(|d| !d.is_empty()) {
        Some(description) => format!("{} - {description}", role.name),
        None => role.name.clone(),
    }
}

pub async fn execute(args: RolesArgs, inv: &mut Invocation, report: &mut BatchReport) -> CliResult<()> {
    let api = inv.api();
    let command_realm = args.realm.as_deref();

    match args.command {
        RolesCommands::Create(a) => {
            let names = require_keys("name", a.names)?;
            let mut roles = RealmRoles::new(&api);
            roles.descriptions = FieldValues::bind("description", a.descriptions, "name", names.len())?;

            let target = inv.resolve(&a.target, command_realm).await?;
            reconcile(&mut roles, Verb::Create, &target.realms, &names, false, report).await
        }
        RolesCommands::Update(a) => {
            let names = require_keys("name", a.names)?;
            require_any_field(
                &[!a.descriptions.is_empty(), !a.new_names.is_empty()],
                "--description, --new-name",
            )?;
            let mut roles = RealmRoles::new(&api);
            roles.descriptions = FieldValues::bind("description", a.descriptions, "name", names.len())?;
            roles.new_names = FieldValues::bind("new-name", a.new_names, "name", names.len())?;

            let target = inv.resolve(&a.target, command_realm).await?;
            reconcile(&mut roles, Verb::Update, &target.realms, &names, a.ignore_missing, report).await
        }
        RolesCommands::Delete(a) => {
            let names = require_keys("name", a.names)?;
            let mut roles = RealmRoles::new(&api);

            let target = inv.resolve(&a.target, command_realm).await?;
            reconcile(&mut roles, Verb::Delete, &target.realms, &names, a.ignore_missing, report).await
        }
        RolesCommands::List(a) => {
            let mut roles = RealmRoles::new(&api);
            let target = inv.resolve(&a.target, command_realm).await?;
            list_all(&mut roles, &target.realms, report).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        assert_eq!(describe(&RoleRepresentation::new("admin", None)), "admin");
        assert_eq!(
            describe(&RoleRepresentation::new("ops", Some("Operators".to_string()))),
            "ops - Operators"
        );
    }

    #[test]
    fn test_verb_names() {
        let list = RolesCommands::List(ListArgs {
            target: RealmSelection::default(),
        });
        assert_eq!(list.verb(), "list");
    }
}
