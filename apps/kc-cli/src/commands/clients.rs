//! Client commands, including client scope assignment

use crate::api::{missing_id, ApiClient, ScopeAssignment};
use crate::batch::{
    list_all, reconcile, require_keys, BatchReport, FieldValues, ManagedResource, Mutation, Probe,
    RealmSelection, Verb, Wording,
};
use crate::commands::{require_any_field, require_client_id};
use crate::context::Invocation;
use crate::error::CliResult;
use crate::models::{ClientRepresentation, DEFAULT_SCOPE_PROTOCOL};
use async_trait::async_trait;
use clap::{ArgAction, Args, Subcommand};

#[derive(Args, Debug)]
pub struct ClientsArgs {
    /// Default realm for this command
    #[arg(long)]
    pub realm: Option<String>,

    #[command(subcommand)]
    pub command: ClientsCommands,
}

#[derive(Subcommand, Debug)]
pub enum ClientsCommands {
    /// Create clients (existing clientIds are skipped)
    Create(CreateArgs),
    /// Update clients
    Update(UpdateArgs),
    /// Delete clients
    Delete(DeleteArgs),
    /// List clients
    List(ListArgs),
    /// Assign or remove client scopes
    Scopes(ScopesArgs),
}

impl ClientsCommands {
    pub fn verb(&self) -> &'static str {
        match self {
            ClientsCommands::Create(_) => "create",
            ClientsCommands::Update(_) => "update",
            ClientsCommands::Delete(_) => "delete",
            ClientsCommands::List(_) => "list",
            ClientsCommands::Scopes(s) => match s.command {
                ScopesCommands::Assign(_) => "scopes assign",
                ScopesCommands::Remove(_) => "scopes remove",
            },
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ClientsCommands::List(_))
    }
}

/// Attribute flags shared by create and update
#[derive(Args, Debug, Default)]
pub struct ClientFields {
    /// Display name: once for all clients or once per --client-id
    #[arg(long = "name")]
    pub names: Vec<String>,

    /// Client secret (ignored for public clients)
    #[arg(long = "secret")]
    pub secrets: Vec<String>,

    /// Protocol, e.g. openid-connect or saml
    #[arg(long = "protocol")]
    pub protocols: Vec<String>,

    #[arg(long = "root-url")]
    pub root_urls: Vec<String>,

    #[arg(long = "base-url")]
    pub base_urls: Vec<String>,

    /// Public client flag
    #[arg(long = "public", action = ArgAction::Append)]
    pub public: Vec<bool>,

    #[arg(long = "enabled", action = ArgAction::Append)]
    pub enabled: Vec<bool>,

    #[arg(long = "standard-flow", action = ArgAction::Append)]
    pub standard_flow: Vec<bool>,

    #[arg(long = "direct-access", action = ArgAction::Append)]
    pub direct_access: Vec<bool>,

    #[arg(long = "implicit-flow", action = ArgAction::Append)]
    pub implicit_flow: Vec<bool>,

    #[arg(long = "service-accounts", action = ArgAction::Append)]
    pub service_accounts: Vec<bool>,

    /// Redirect URI applied to every client (repeatable)
    #[arg(long = "redirect-uri")]
    pub redirect_uris: Vec<String>,

    /// Web origin applied to every client (repeatable)
    #[arg(long = "web-origin")]
    pub web_origins: Vec<String>,
}

impl ClientFields {
    fn any(&self) -> bool {
        [
            self.names.is_empty(),
            self.secrets.is_empty(),
            self.protocols.is_empty(),
            self.root_urls.is_empty(),
            self.base_urls.is_empty(),
            self.public.is_empty(),
            self.enabled.is_empty(),
            self.standard_flow.is_empty(),
            self.direct_access.is_empty(),
            self.implicit_flow.is_empty(),
            self.service_accounts.is_empty(),
            self.redirect_uris.is_empty(),
            self.web_origins.is_empty(),
        ]
        .iter()
        .any(|empty| !empty)
    }
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// clientId (repeatable or comma-separated)
    #[arg(long = "client-id", value_delimiter = ',')]
    pub client_ids: Vec<String>,

    #[command(flatten)]
    pub fields: ClientFields,

    #[command(flatten)]
    pub target: RealmSelection,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// clientId (repeatable or comma-separated)
    #[arg(long = "client-id", value_delimiter = ',')]
    pub client_ids: Vec<String>,

    #[command(flatten)]
    pub fields: ClientFields,

    /// New clientId: once per --client-id
    #[arg(long = "new-client-id")]
    pub new_client_ids: Vec<String>,

    /// Skip clients that do not exist
    #[arg(long)]
    pub ignore_missing: bool,

    #[command(flatten)]
    pub target: RealmSelection,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// clientId (repeatable or comma-separated)
    #[arg(long = "client-id", value_delimiter = ',')]
    pub client_ids: Vec<String>,

    /// Skip clients that do not exist
    #[arg(long)]
    pub ignore_missing: bool,

    #[command(flatten)]
    pub target: RealmSelection,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show this clientId
    #[arg(long)]
    pub client_id: Option<String>,

    #[command(flatten)]
    pub target: RealmSelection,
}

#[derive(Args, Debug)]
pub struct ScopesArgs {
    #[command(subcommand)]
    pub command: ScopesCommands,
}

#[derive(Subcommand, Debug)]
pub enum ScopesCommands {
    /// Attach realm client scopes to a client
    Assign(ScopeChangeArgs),
    /// Detach client scopes from a client
    Remove(ScopeChangeArgs),
}

#[derive(Args, Debug)]
pub struct ScopeChangeArgs {
    /// Client to change
    #[arg(long)]
    pub client_id: Option<String>,

    /// Client scope name (repeatable or comma-separated)
    #[arg(long = "scope", value_delimiter = ',')]
    pub scopes: Vec<String>,

    /// Assignment type
    #[arg(long = "type", value_enum, default_value = "default")]
    pub kind: ScopeAssignment,

    /// Skip scopes that are not assigned (remove only)
    #[arg(long)]
    pub ignore_missing: bool,

    #[command(flatten)]
    pub target: RealmSelection,
}

/// Client attributes after binding
#[derive(Default)]
struct BoundFields {
    names: FieldValues<String>,
    secrets: FieldValues<String>,
    protocols: FieldValues<String>,
    root_urls: FieldValues<String>,
    base_urls: FieldValues<String>,
    public: FieldValues<bool>,
    enabled: FieldValues<bool>,
    standard_flow: FieldValues<bool>,
    direct_access: FieldValues<bool>,
    implicit_flow: FieldValues<bool>,
    service_accounts: FieldValues<bool>,
    redirect_uris: Vec<String>,
    web_origins: Vec<String>,
}

impl BoundFields {
    fn bind(fields: ClientFields, count: usize) -> CliResult<Self> {
        let key = "client-id";
        Ok(Self {
            names: FieldValues::bind("name", fields.names, key, count)?,
            secrets: FieldValues::bind("secret", fields.secrets, key, count)?,
            protocols: FieldValues::bind("protocol", fields.protocols, key, count)?,
            root_urls: FieldValues::bind("root-url", fields.root_urls, key, count)?,
            base_urls: FieldValues::bind("base-url", fields.base_urls, key, count)?,
            public: FieldValues::bind("public", fields.public, key, count)?,
            enabled: FieldValues::bind("enabled", fields.enabled, key, count)?,
            standard_flow: FieldValues::bind("standard-flow", fields.standard_flow, key, count)?,
            direct_access: FieldValues::bind("direct-access", fields.direct_access, key, count)?,
            implicit_flow: FieldValues::bind("implicit-flow", fields.implicit_flow, key, count)?,
            service_accounts: FieldValues::bind(
                "service-accounts",
                fields.service_accounts,
                key,
                count,
            )?,
            redirect_uris: fields.redirect_uris,
            web_origins: fields.web_origins,
        })
    }

    /// Apply the attributes given for `index`; returns warning notes
    fn apply(&self, index: usize, client: &mut ClientRepresentation) -> Vec<String> {
        let mut notes = Vec::new();
        set(&mut client.name, self.names.cloned(index));
        set(&mut client.protocol, self.protocols.cloned(index));
        set(&mut client.root_url, self.root_urls.cloned(index));
        set(&mut client.base_url, self.base_urls.cloned(index));
        set(&mut client.public_client, self.public.cloned(index));
        set(&mut client.enabled, self.enabled.cloned(index));
        set(&mut client.standard_flow_enabled, self.standard_flow.cloned(index));
        set(&mut client.direct_access_grants_enabled, self.direct_access.cloned(index));
        set(&mut client.implicit_flow_enabled, self.implicit_flow.cloned(index));
        set(&mut client.service_accounts_enabled, self.service_accounts.cloned(index));
        if !self.redirect_uris.is_empty() {
            client.redirect_uris = Some(self.redirect_uris.clone());
        }
        if !self.web_origins.is_empty() {
            client.web_origins = Some(self.web_origins.clone());
        }

        if let Some(secret) = self.secrets.cloned(index) {
            if client.public_client == Some(true) {
                let id = client.client_id.as_deref().unwrap_or_default();
                tracing::warn!(client_id = id, "secret ignored for public client");
                notes.push(format!("  Warning: --secret ignored for public client {id:?}."));
            } else {
                client.secret = Some(secret);
            }
        }
        notes
    }
}

fn set<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Clients, keyed by clientId
struct Clients<'a> {
    api: &'a ApiClient,
    fields: BoundFields,
    new_client_ids: FieldValues<String>,
    filter: Option<String>,
}

impl<'a> Clients<'a> {
    fn new(api: &'a ApiClient) -> Self {
        Self {
            api,
            fields: BoundFields::default(),
            new_client_ids: FieldValues::default(),
            filter: None,
        }
    }
}

#[async_trait]
impl ManagedResource for Clients<'_> {
    type Existing = ClientRepresentation;

    fn noun(&self) -> &'static str {
        "client"
    }

    async fn probe(&mut self, realm: &str, key: &str) -> CliResult<Probe<ClientRepresentation>> {
        Probe::from_lookup(self.api.find_client(realm, key).await)
    }

    async fn create(&mut self, realm: &str, index: usize, key: &str) -> CliResult<Mutation> {
        let mut client = ClientRepresentation {
            client_id: Some(key.to_string()),
            protocol: Some(DEFAULT_SCOPE_PROTOCOL.to_string()),
            enabled: Some(true),
            ..Default::default()
        };
        let notes = self.fields.apply(index, &mut client);

        let id = self.api.create_client(realm, &client).await?;
        let mut mutation = Mutation::with_id(id);
        for note in notes {
            mutation = mutation.note(note);
        }
        Ok(mutation)
    }

    async fn update(
        &mut self,
        realm: &str,
        index: usize,
        key: &str,
        mut client: ClientRepresentation,
    ) -> CliResult<Mutation> {
        let client_uuid = client.id.clone().ok_or_else(|| missing_id("client"))?;
        let notes = self.fields.apply(index, &mut client);

        let mut mutation = Mutation::with_id(Some(client_uuid.clone()));
        if let Some(new_client_id) = self.new_client_ids.cloned(index) {
            mutation = mutation.note(format!("  Renamed {key:?} to {new_client_id:?}."));
            client.client_id = Some(new_client_id);
        }
        for note in notes {
            mutation = mutation.note(note);
        }

        self.api.update_client(realm, &client_uuid, &client).await?;
        Ok(mutation)
    }

    async fn delete(
        &mut self,
        realm: &str,
        _key: &str,
        client: ClientRepresentation,
    ) -> CliResult<Mutation> {
        let client_uuid = client.id.ok_or_else(|| missing_id("client"))?;
        self.api.delete_client(realm, &client_uuid).await?;
        Ok(Mutation::with_id(Some(client_uuid)))
    }

    async fn list(&mut self, realm: &str) -> CliResult<Vec<String>> {
        let clients = match self.filter.as_deref() {
            Some(client_id) => match self.api.find_client(realm, client_id).await {
                Ok(client) => vec![client],
                Err(e) if e.is_not_found() => Vec::new(),
                Err(e) => return Err(e),
            },
            None => self.api.list_clients(realm).await?,
        };
        Ok(clients.iter().map(describe).collect())
    }
}

fn describe(client: &ClientRepresentation) -> String {
    let client_id = client.client_id.as_deref().unwrap_or("<unnamed>");
    let kind = if client.public_client == Some(true) {
        "public"
    } else {
        "confidential"
    };
    let mut line = format!("{client_id} ({kind})");
    if client.enabled == Some(false) {
        line.push_str(" (disabled)");
    }
    line
}

/// Scope assignments on one client, keyed by scope name
struct ScopeAssignments<'a> {
    api: &'a ApiClient,
    client_id: String,
    kind: ScopeAssignment,
    client_uuid: Option<String>,
}

impl ScopeAssignments<'_> {
    fn client_uuid(&self) -> CliResult<&str> {
        self.client_uuid
            .as_deref()
            .ok_or_else(|| missing_id("client"))
    }
}

#[async_trait]
impl ManagedResource for ScopeAssignments<'_> {
    /// Scope id
    type Existing = String;

    fn noun(&self) -> &'static str {
        match self.kind {
            ScopeAssignment::Default => "default client scope",
            ScopeAssignment::Optional => "optional client scope",
        }
    }

    fn location(&self, realm: &str) -> String {
        format!("on client {:?} in realm {realm:?}", self.client_id)
    }

    fn wording(&self, verb: Verb) -> Wording {
        match verb {
            Verb::Create => Wording {
                infinitive: "assign",
                past: "Assigned",
                exists: "already assigned",
                missing: "not found",
            },
            _ => Wording {
                infinitive: "remove",
                past: "Removed",
                exists: "already assigned",
                missing: "not assigned",
            },
        }
    }

    /// The parent client must exist in every target realm
    async fn enter_realm(&mut self, realm: &str) -> CliResult<()> {
        self.client_uuid = Some(self.api.client_uuid(realm, &self.client_id).await?);
        Ok(())
    }

    async fn probe(&mut self, realm: &str, key: &str) -> CliResult<Probe<String>> {
        let assigned = self
            .api
            .client_assigned_scopes(realm, self.client_uuid()?, self.kind)
            .await?;
        Ok(assigned
            .into_iter()
            .find(|s| s.name == key)
            .and_then(|s| s.id)
            .map_or(Probe::NotFound, Probe::Found))
    }

    /// Unknown scope names are fatal
    async fn create(&mut self, realm: &str, _index: usize, key: &str) -> CliResult<Mutation> {
        let scope = self.api.find_client_scope(realm, key).await?;
        let scope_id = scope.id.ok_or_else(|| missing_id("client scope"))?;
        self.api
            .assign_client_scope(realm, self.client_uuid()?, self.kind, &scope_id)
            .await?;
        Ok(Mutation::done())
    }

    async fn delete(&mut self, realm: &str, _key: &str, scope_id: String) -> CliResult<Mutation> {
        self.api
            .remove_client_scope(realm, self.client_uuid()?, self.kind, &scope_id)
            .await?;
        Ok(Mutation::done())
    }
}

pub async fn execute(args: ClientsArgs, inv: &mut Invocation, report: &mut BatchReport) -> CliResult<()> {
    let api = inv.api();
    let command_realm = args.realm.as_deref();

    match args.command {
        ClientsCommands::Create(a) => {
            let client_ids = require_keys("client-id", a.client_ids)?;
            let mut clients = Clients::new(&api);
            clients.fields = BoundFields::bind(a.fields, client_ids.len())?;

            let target = inv.resolve(&a.target, command_realm).await?;
            reconcile(&mut clients, Verb::Create, &target.realms, &client_ids, false, report).await
        }
        ClientsCommands::Update(a) => {
            let client_ids = require_keys("client-id", a.client_ids)?;
            require_any_field(
                &[a.fields.any(), !a.new_client_ids.is_empty()],
                "the client attribute flags or --new-client-id",
            )?;
            let count = client_ids.len();
            let mut clients = Clients::new(&api);
            clients.fields = BoundFields::bind(a.fields, count)?;
            clients.new_client_ids =
                FieldValues::bind("new-client-id", a.new_client_ids, "client-id", count)?;

            let target = inv.resolve(&a.target, command_realm).await?;
            reconcile(
                &mut clients,
                Verb::Update,
                &target.realms,
                &client_ids,
                a.ignore_missing,
                report,
            )
            .await
        }
        ClientsCommands::Delete(a) => {
            let client_ids = require_keys("client-id", a.client_ids)?;
            let mut clients = Clients::new(&api);

            let target = inv.resolve(&a.target, command_realm).await?;
            reconcile(
                &mut clients,
                Verb::Delete,
                &target.realms,
                &client_ids,
                a.ignore_missing,
                report,
            )
            .await
        }
        ClientsCommands::List(a) => {
            let mut clients = Clients::new(&api);
            clients.filter = a.client_id.filter(|c| !c.trim().is_empty());

            let target = inv.resolve(&a.target, command_realm).await?;
            list_all(&mut clients, &target.realms, report).await
        }
        ClientsCommands::Scopes(s) => {
            let (verb, a) = match s.command {
                ScopesCommands::Assign(a) => (Verb::Create, a),
                ScopesCommands::Remove(a) => (Verb::Delete, a),
            };
            let client_id = require_client_id(a.client_id)?;
            let scopes = require_keys("scope", a.scopes)?;
            let mut assignments = ScopeAssignments {
                api: &api,
                client_id,
                kind: a.kind,
                client_uuid: None,
            };

            let target = inv.resolve(&a.target, command_realm).await?;
            reconcile(
                &mut assignments,
                verb,
                &target.realms,
                &scopes,
                a.ignore_missing,
                report,
            )
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_ignored_for_public_client() {
        let fields = ClientFields {
            public: vec![true],
            secrets: vec!["s3cret".to_string()],
            ..Default::default()
        };
        let bound = BoundFields::bind(fields, 1).unwrap();
        let mut client = ClientRepresentation {
            client_id: Some("spa".to_string()),
            ..Default::default()
        };
        let notes = bound.apply(0, &mut client);
        assert!(client.secret.is_none());
        assert_eq!(client.public_client, Some(true));
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn test_lists_apply_to_every_client() {
        let fields = ClientFields {
            redirect_uris: vec!["https://a/*".to_string(), "https://b/*".to_string()],
            names: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            ..Default::default()
        };
        let bound = BoundFields::bind(fields, 3).unwrap();
        let mut client = ClientRepresentation::default();
        bound.apply(2, &mut client);
        assert_eq!(client.name.as_deref(), Some("C"));
        assert_eq!(client.redirect_uris.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_boolean_cardinality() {
        let fields = ClientFields {
            enabled: vec![true, false],
            ..Default::default()
        };
        let err = BoundFields::bind(fields, 3).err().unwrap();
        assert!(err.to_string().starts_with("invalid --enabled"));
    }

    #[test]
    fn test_any_field() {
        assert!(!ClientFields::default().any());
        let fields = ClientFields {
            web_origins: vec!["+".to_string()],
            ..Default::default()
        };
        assert!(fields.any());
    }

    #[test]
    fn test_scope_verb_paths() {
        let command = ClientsCommands::Scopes(ScopesArgs {
            command: ScopesCommands::Remove(ScopeChangeArgs {
                client_id: Some("web".to_string()),
                scopes: vec!["email".to_string()],
                kind: ScopeAssignment::Optional,
                ignore_missing: false,
                target: RealmSelection::default(),
            }),
        });
        assert_eq!(command.verb(), "scopes remove");
        assert!(!command.is_list());
    }
}
