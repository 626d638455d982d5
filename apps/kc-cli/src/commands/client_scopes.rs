//! Client scope commands

use crate::api::{missing_id, ApiClient};
use crate::batch::{
    list_all, reconcile, require_keys, BatchReport, FieldValues, ManagedResource, Mutation, Probe,
    RealmSelection, Verb,
};
use crate::commands::require_any_field;
use crate::context::Invocation;
use crate::error::CliResult;
use crate::models::{ClientScopeRepresentation, DEFAULT_SCOPE_PROTOCOL};
use async_trait::async_trait;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct ClientScopesArgs {
    /// Default realm for this command
    #[arg(long)]
    pub realm: Option<String>,

    #[command(subcommand)]
    pub command: ClientScopesCommands,
}

#[derive(Subcommand, Debug)]
pub enum ClientScopesCommands {
    /// Create client scopes (existing scopes are skipped)
    Create(CreateArgs),
    /// Update client scopes
    Update(UpdateArgs),
    /// Delete client scopes
    Delete(DeleteArgs),
    /// List client scopes
    List(ListArgs),
}

impl ClientScopesCommands {
    pub fn verb(&self) -> &'static str {
        match self {
            ClientScopesCommands::Create(_) => "create",
            ClientScopesCommands::Update(_) => "update",
            ClientScopesCommands::Delete(_) => "delete",
            ClientScopesCommands::List(_) => "list",
        }
    }
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Scope name (repeatable or comma-separated)
    #[arg(long = "name", value_delimiter = ',')]
    pub names: Vec<String>,

    /// Description: once for all scopes or once per --name
    #[arg(long = "description")]
    pub descriptions: Vec<String>,

    /// Protocol (default openid-connect): once for all or once per --name
    #[arg(long = "protocol")]
    pub protocols: Vec<String>,

    #[command(flatten)]
    pub target: RealmSelection,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Scope name (repeatable or comma-separated)
    #[arg(long = "name", value_delimiter = ',')]
    pub names: Vec<String>,

    #[arg(long = "description")]
    pub descriptions: Vec<String>,

    #[arg(long = "protocol")]
    pub protocols: Vec<String>,

    /// Rename: once per --name
    #[arg(long = "new-name")]
    pub new_names: Vec<String>,

    /// Skip scopes that do not exist
    #[arg(long)]
    pub ignore_missing: bool,

    #[command(flatten)]
    pub target: RealmSelection,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Scope name (repeatable or comma-separated)
    #[arg(long = "name", value_delimiter = ',')]
    pub names: Vec<String>,

    /// Skip scopes that do not exist
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

/// Realm client scopes, keyed by name
struct ClientScopes<'a> {
    api: &'a ApiClient,
    descriptions: FieldValues<String>,
    protocols: FieldValues<String>,
    new_names: FieldValues<String>,
}

impl<'a> ClientScopes<'a> {
    fn new(api: &'a ApiClient) -> Self {
        Self {
            api,
            descriptions: FieldValues::default(),
            protocols: FieldValues::default(),
            new_names: FieldValues::default(),
        }
    }
}

#[async_trait]
impl ManagedResource for ClientScopes<'_> {
    type Existing = ClientScopeRepresentation;

    fn noun(&self) -> &'static str {
        "client scope"
    }

    async fn probe(
        &mut self,
        realm: &str,
        key: &str,
    ) -> CliResult<Probe<ClientScopeRepresentation>> {
        Probe::from_lookup(self.api.find_client_scope(realm, key).await)
    }

    async fn create(&mut self, realm: &str, index: usize, key: &str) -> CliResult<Mutation> {
        let scope = ClientScopeRepresentation {
            name: key.to_string(),
            description: self.descriptions.cloned(index),
            protocol: Some(
                self.protocols
                    .cloned(index)
                    .unwrap_or_else(|| DEFAULT_SCOPE_PROTOCOL.to_string()),
            ),
            ..Default::default()
        };
        let id = self.api.create_client_scope(realm, &scope).await?;
        Ok(Mutation::with_id(id))
    }

    async fn update(
        &mut self,
        realm: &str,
        index: usize,
        key: &str,
        mut scope: ClientScopeRepresentation,
    ) -> CliResult<Mutation> {
        let scope_id = scope.id.clone().ok_or_else(|| missing_id("client scope"))?;
        if let Some(description) = self.descriptions.cloned(index) {
            scope.description = Some(description);
        }
        if let Some(protocol) = self.protocols.cloned(index) {
            scope.protocol = Some(protocol);
        }
        let mut mutation = Mutation::with_id(Some(scope_id.clone()));
        if let Some(new_name) = self.new_names.cloned(index) {
            mutation = mutation.note(format!("  Renamed {key:?} to {new_name:?}."));
            scope.name = new_name;
        }
        self.api.update_client_scope(realm, &scope_id, &scope).await?;
        Ok(mutation)
    }

    async fn delete(
        &mut self,
        realm: &str,
        _key: &str,
        scope: ClientScopeRepresentation,
    ) -> CliResult<Mutation> {
        let scope_id = scope.id.ok_or_else(|| missing_id("client scope"))?;
        self.api.delete_client_scope(realm, &scope_id).await?;
        Ok(Mutation::with_id(Some(scope_id)))
    }

    async fn list(&mut self, realm: &str) -> CliResult<Vec<String>> {
        let scopes = self.api.list_client_scopes(realm).await?;
        Ok(scopes
            .into_iter()
            .map(|s| match s.protocol {
                Some(protocol) => format!("{} ({protocol})", s.name),
                None => s.name,
            })
            .collect())
    }
}

pub async fn execute(
    args: ClientScopesArgs,
    inv: &mut Invocation,
    report: &mut BatchReport,
) -> CliResult<()> {
    let api = inv.api();
    let command_realm = args.realm.as_deref();

    match args.command {
        ClientScopesCommands::Create(a) => {
            let names = require_keys("name", a.names)?;
            let count = names.len();
            let mut scopes = ClientScopes::new(&api);
            scopes.descriptions = FieldValues::bind("description", a.descriptions, "name", count)?;
            scopes.protocols = FieldValues::bind("protocol", a.protocols, "name", count)?;

            let target = inv.resolve(&a.target, command_realm).await?;
            reconcile(&mut scopes, Verb::Create, &target.realms, &names, false, report).await
        }
        ClientScopesCommands::Update(a) => {
            let names = require_keys("name", a.names)?;
            require_any_field(
                &[
                    !a.descriptions.is_empty(),
                    !a.protocols.is_empty(),
                    !a.new_names.is_empty(),
                ],
                "--description, --protocol, --new-name",
            )?;
            let count = names.len();
            let mut scopes = ClientScopes::new(&api);
            scopes.descriptions = FieldValues::bind("description", a.descriptions, "name", count)?;
            scopes.protocols = FieldValues::bind("protocol", a.protocols, "name", count)?;
            scopes.new_names = FieldValues::bind("new-name", a.new_names, "name", count)?;

            let target = inv.resolve(&a.target, command_realm).await?;
            reconcile(
                &mut scopes,
                Verb::Update,
                &target.realms,
                &names,
                a.ignore_missing,
                report,
            )
            .await
        }
        ClientScopesCommands::Delete(a) => {
            let names = require_keys("name", a.names)?;
            let mut scopes = ClientScopes::new(&api);

            let target = inv.resolve(&a.target, command_realm).await?;
            reconcile(
                &mut scopes,
                Verb::Delete,
                &target.realms,
                &names,
                a.ignore_missing,
                report,
            )
            .await
        }
        ClientScopesCommands::List(a) => {
            let mut scopes = ClientScopes::new(&api);
            let target = inv.resolve(&a.target, command_realm).await?;
            list_all(&mut scopes, &target.realms, report).await
        }
    }
}
