//! Client role commands

use crate::api::{missing_id, ApiClient};
use crate::batch::{
    list_all, reconcile, require_keys, BatchReport, FieldValues, ManagedResource, Mutation, Probe,
    RealmSelection, Verb,
};
use crate::commands::roles::describe;
use crate::commands::{require_any_field, require_client_id};
use crate::context::Invocation;
use crate::error::CliResult;
use crate::models::RoleRepresentation;
use async_trait::async_trait;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct ClientRolesArgs {
    /// Default realm for this command
    #[arg(long)]
    pub realm: Option<String>,

    #[command(subcommand)]
    pub command: ClientRolesCommands,
}

#[derive(Subcommand, Debug)]
pub enum ClientRolesCommands {
    /// Create client roles (existing roles are skipped)
    Create(CreateArgs),
    /// Update client roles
    Update(UpdateArgs),
    /// Delete client roles
    Delete(DeleteArgs),
    /// List roles of a client
    List(ListArgs),
}

impl ClientRolesCommands {
    pub fn verb(&self) -> &'static str {
        match self {
            ClientRolesCommands::Create(_) => "create",
            ClientRolesCommands::Update(_) => "update",
            ClientRolesCommands::Delete(_) => "delete",
            ClientRolesCommands::List(_) => "list",
        }
    }
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Client owning the roles
    #[arg(long)]
    pub client_id: Option<String>,

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
    /// Client owning the roles
    #[arg(long)]
    pub client_id: Option<String>,

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
    /// Client owning the roles
    #[arg(long)]
    pub client_id: Option<String>,

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
    /// Client owning the roles
    #[arg(long)]
    pub client_id: Option<String>,

    #[command(flatten)]
    pub target: RealmSelection,
}

/// Roles of one client, keyed by role name
///
/// The parent client is looked up again in every realm.
struct ClientRoles<'a> {
    api: &'a ApiClient,
    client_id: String,
    client_uuid: Option<String>,
    descriptions: FieldValues<String>,
    new_names: FieldValues<String>,
}

impl<'a> ClientRoles<'a> {
    fn new(api: &'a ApiClient, client_id: String) -> Self {
        Self {
            api,
            client_id,
            client_uuid: None,
            descriptions: FieldValues::default(),
            new_names: FieldValues::default(),
        }
    }

    fn client_uuid(&self) -> CliResult<&str> {
        self.client_uuid
            .as_deref()
            .ok_or_else(|| missing_id("client"))
    }
}

#[async_trait]
impl ManagedResource for ClientRoles<'_> {
    type Existing = RoleRepresentation;

    fn noun(&self) -> &'static str {
        "client role"
    }

    fn location(&self, realm: &str) -> String {
        format!("of client {:?} in realm {realm:?}", self.client_id)
    }

    async fn enter_realm(&mut self, realm: &str) -> CliResult<()> {
        self.client_uuid = Some(self.api.client_uuid(realm, &self.client_id).await?);
        Ok(())
    }

    async fn probe(&mut self, realm: &str, key: &str) -> CliResult<Probe<RoleRepresentation>> {
        let client_uuid = self.client_uuid()?;
        Probe::from_lookup(self.api.get_client_role(realm, client_uuid, key).await)
    }

    async fn create(&mut self, realm: &str, index: usize, key: &str) -> CliResult<Mutation> {
        let mut role = RoleRepresentation::new(key, self.descriptions.cloned(index));
        role.client_role = Some(true);
        self.api
            .create_client_role(realm, self.client_uuid()?, &role)
            .await?;
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
        self.api
            .update_client_role(realm, self.client_uuid()?, key, &role)
            .await?;
        Ok(mutation)
    }

    async fn delete(
        &mut self,
        realm: &str,
        key: &str,
        _role: RoleRepresentation,
    ) -> CliResult<Mutation> {
        self.api
            .delete_client_role(realm, self.client_uuid()?, key)
            .await?;
        Ok(Mutation::done())
    }

    async fn list(&mut self, realm: &str) -> CliResult<Vec<String>> {
        let roles = self
            .api
            .list_client_roles(realm, self.client_uuid()?)
            .await?;
        Ok(roles.iter().map(describe).collect())
    }
}

pub async fn execute(
    args: ClientRolesArgs,
    inv: &mut Invocation,
    report: &mut BatchReport,
) -> CliResult<()> {
    let api = inv.api();
    let command_realm = args.realm.as_deref();

    match args.command {
        ClientRolesCommands::Create(a) => {
            let client_id = require_client_id(a.client_id)?;
            let names = require_keys("name", a.names)?;
            let mut roles = ClientRoles::new(&api, client_id);
            roles.descriptions =
                FieldValues::bind("description", a.descriptions, "name", names.len())?;

            let target = inv.resolve(&a.target, command_realm).await?;
            reconcile(&mut roles, Verb::Create, &target.realms, &names, false, report).await
        }
        ClientRolesCommands::Update(a) => {
            let client_id = require_client_id(a.client_id)?;
            let names = require_keys("name", a.names)?;
            require_any_field(
                &[!a.descriptions.is_empty(), !a.new_names.is_empty()],
                "--description, --new-name",
            )?;
            let mut roles = ClientRoles::new(&api, client_id);
            roles.descriptions =
                FieldValues::bind("description", a.descriptions, "name", names.len())?;
            roles.new_names = FieldValues::bind("new-name", a.new_names, "name", names.len())?;

            let target = inv.resolve(&a.target, command_realm).await?;
            reconcile(
                &mut roles,
                Verb::Update,
                &target.realms,
                &names,
                a.ignore_missing,
                report,
            )
            .await
        }
        ClientRolesCommands::Delete(a) => {
            let client_id = require_client_id(a.client_id)?;
            let names = require_keys("name", a.names)?;
            let mut roles = ClientRoles::new(&api, client_id);

            let target = inv.resolve(&a.target, command_realm).await?;
            reconcile(
                &mut roles,
                Verb::Delete,
                &target.realms,
                &names,
                a.ignore_missing,
                report,
            )
            .await
        }
        ClientRolesCommands::List(a) => {
            let client_id = require_client_id(a.client_id)?;
            let mut roles = ClientRoles::new(&api, client_id);

            let target = inv.resolve(&a.target, command_realm).await?;
            list_all(&mut roles, &target.realms, report).await
        }
    }
}
