//! User commands

use crate::api::{missing_id, ApiClient};
use crate::batch::{
    list_all, reconcile, require_keys, BatchReport, FieldValues, ManagedResource, Mutation, Probe,
    RealmSelection, Verb,
};
use crate::commands::require_any_field;
use crate::context::Invocation;
use crate::error::{CliError, CliResult};
use crate::models::{CredentialRepresentation, RoleRepresentation, UserRepresentation};
use crate::password;
use async_trait::async_trait;
use clap::{ArgAction, Args, Subcommand};

#[derive(Args, Debug)]
pub struct UsersArgs {
    /// Default realm for this command
    #[arg(long)]
    pub realm: Option<String>,

    #[command(subcommand)]
    pub command: UsersCommands,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommands {
    /// Create users (existing usernames are skipped)
    Create(CreateArgs),
    /// Update users
    Update(UpdateArgs),
    /// Delete users
    Delete(DeleteArgs),
    /// List users
    List(ListArgs),
}

impl UsersCommands {
    pub fn verb(&self) -> &'static str {
        match self {
            UsersCommands::Create(_) => "create",
            UsersCommands::Update(_) => "update",
            UsersCommands::Delete(_) => "delete",
            UsersCommands::List(_) => "list",
        }
    }
}

/// Attribute flags shared by create and update
#[derive(Args, Debug, Default)]
pub struct UserFields {
    /// Email: once for all users or once per --username
    #[arg(long = "email")]
    pub emails: Vec<String>,

    /// First name: once for all users or once per --username
    #[arg(long = "first-name")]
    pub first_names: Vec<String>,

    /// Last name: once for all users or once per --username
    #[arg(long = "last-name")]
    pub last_names: Vec<String>,

    /// Password: once for all users or once per --username
    #[arg(long = "password")]
    pub passwords: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Username (repeatable or comma-separated)
    #[arg(long = "username", value_delimiter = ',')]
    pub usernames: Vec<String>,

    #[command(flatten)]
    pub fields: UserFields,

    /// Enabled flag: once for all users or once per --username (default true)
    #[arg(long = "enabled", action = ArgAction::Append)]
    pub enabled: Vec<bool>,

    /// Realm role granted to every created user (repeatable)
    #[arg(long = "realm-role", value_delimiter = ',')]
    pub realm_roles: Vec<String>,

    /// Client role granted to every created user (needs --client-id)
    #[arg(long = "client-role", value_delimiter = ',')]
    pub client_roles: Vec<String>,

    /// Client owning the --client-role roles
    #[arg(long)]
    pub client_id: Option<String>,

    #[command(flatten)]
    pub target: RealmSelection,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Username (repeatable or comma-separated)
    #[arg(long = "username", value_delimiter = ',')]
    pub usernames: Vec<String>,

    #[command(flatten)]
    pub fields: UserFields,

    /// Enable or disable every listed user
    #[arg(long)]
    pub enabled: Option<bool>,

    /// Skip users that do not exist
    #[arg(long)]
    pub ignore_missing: bool,

    #[command(flatten)]
    pub target: RealmSelection,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Username (repeatable or comma-separated)
    #[arg(long = "username", value_delimiter = ',')]
    pub usernames: Vec<String>,

    /// Skip users that do not exist
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

/// Per-item attributes after binding
#[derive(Default)]
struct BoundFields {
    emails: FieldValues<String>,
    first_names: FieldValues<String>,
    last_names: FieldValues<String>,
    passwords: FieldValues<String>,
}

impl BoundFields {
    /// Bind every list and check supplied passwords before any remote call
    fn bind(fields: UserFields, count: usize) -> CliResult<Self> {
        for pw in &fields.passwords {
            password::validate(pw)?;
        }
        Ok(Self {
            emails: FieldValues::bind("email", fields.emails, "username", count)?,
            first_names: FieldValues::bind("first-name", fields.first_names, "username", count)?,
            last_names: FieldValues::bind("last-name", fields.last_names, "username", count)?,
            passwords: FieldValues::bind("password", fields.passwords, "username", count)?,
        })
    }

    /// Representation carrying only the attributes given for `index`
    fn representation(&self, index: usize) -> UserRepresentation {
        let email = self.emails.cloned(index);
        UserRepresentation {
            email_verified: email.as_ref().map(|_| true),
            email,
            first_name: self.first_names.cloned(index),
            last_name: self.last_names.cloned(index),
            ..Default::default()
        }
    }
}

/// Client roles granted on create, resolved per realm
struct ClientGrant {
    client_id: String,
    roles: Vec<String>,
    client_uuid: Option<String>,
    resolved: Vec<RoleRepresentation>,
}

/// Users, keyed by username
struct Users<'a> {
    api: &'a ApiClient,
    fields: BoundFields,
    enabled: FieldValues<bool>,
    update_enabled: Option<bool>,
    realm_roles: Vec<String>,
    resolved_realm_roles: Vec<RoleRepresentation>,
    client_grant: Option<ClientGrant>,
}

impl<'a> Users<'a> {
    fn new(api: &'a ApiClient) -> Self {
        Self {
            api,
            fields: BoundFields::default(),
            enabled: FieldValues::default(),
            update_enabled: None,
            realm_roles: Vec::new(),
            resolved_realm_roles: Vec::new(),
            client_grant: None,
        }
    }

    /// Password given for `index`, or a freshly generated one
    fn password_for(&self, index: usize) -> CliResult<(String, bool)> {
        let (password, generated) = match self.fields.passwords.cloned(index) {
            Some(password) => (password, false),
            None => (password::generate(password::DEFAULT_LENGTH)?, true),
        };
        password::validate(&password)?;
        Ok((password, generated))
    }

    async fn grant_roles(&self, realm: &str, user_id: &str) -> CliResult<Vec<String>> {
        let mut notes = Vec::new();
        if !self.resolved_realm_roles.is_empty() {
            self.api
                .add_realm_role_mappings(realm, user_id, &self.resolved_realm_roles)
                .await?;
            notes.push(format!("  Realm roles: {}", self.realm_roles.join(", ")));
        }
        if let Some(grant) = &self.client_grant {
            if let Some(client_uuid) = grant.client_uuid.as_deref() {
                self.api
                    .add_client_role_mappings(realm, user_id, client_uuid, &grant.resolved)
                    .await?;
                notes.push(format!(
                    "  Client roles ({}): {}",
                    grant.client_id,
                    grant.roles.join(", ")
                ));
            }
        }
        Ok(notes)
    }
}

#[async_trait]
impl ManagedResource for Users<'_> {
    type Existing = UserRepresentation;

    fn noun(&self) -> &'static str {
        "user"
    }

    /// Look up the roles to grant once per realm; a missing role is fatal
    async fn enter_realm(&mut self, realm: &str) -> CliResult<()> {
        let mut realm_roles = Vec::with_capacity(self.realm_roles.len());
        for name in &self.realm_roles {
            realm_roles.push(self.api.get_realm_role(realm, name).await?);
        }
        self.resolved_realm_roles = realm_roles;

        if let Some(grant) = self.client_grant.as_mut() {
            let client_uuid = self.api.client_uuid(realm, &grant.client_id).await?;
            let mut roles = Vec::with_capacity(grant.roles.len());
            for name in &grant.roles {
                roles.push(self.api.get_client_role(realm, &client_uuid, name).await?);
            }
            grant.client_uuid = Some(client_uuid);
            grant.resolved = roles;
        }
        Ok(())
    }

    async fn probe(&mut self, realm: &str, key: &str) -> CliResult<Probe<UserRepresentation>> {
        Probe::from_lookup(self.api.find_user(realm, key).await)
    }

    async fn create(&mut self, realm: &str, index: usize, key: &str) -> CliResult<Mutation> {
        let (password, generated) = self.password_for(index)?;

        let mut user = self.fields.representation(index);
        user.username = Some(key.to_string());
        user.enabled = Some(self.enabled.cloned(index).unwrap_or(true));
        user.credentials = Some(vec![CredentialRepresentation::password(&password)]);

        let user_id = match self.api.create_user(realm, &user).await? {
            Some(id) => id,
            None => self
                .api
                .find_user(realm, key)
                .await?
                .id
                .ok_or_else(|| missing_id("user"))?,
        };

        let label = if generated { "Generated password" } else { "Password" };
        Ok(Mutation::with_id(Some(user_id))
            .note(format!("  {label}: {password}"))
            .detail(format!("{key}={password}@{realm}")))
    }

    /// Role grants run once the user and its password are on record
    async fn after_create(
        &mut self,
        realm: &str,
        _key: &str,
        id: Option<&str>,
    ) -> CliResult<Vec<String>> {
        let user_id = id.ok_or_else(|| missing_id("user"))?;
        self.grant_roles(realm, user_id).await
    }

    async fn update(
        &mut self,
        realm: &str,
        index: usize,
        key: &str,
        existing: UserRepresentation,
    ) -> CliResult<Mutation> {
        let user_id = existing.id.ok_or_else(|| missing_id("user"))?;

        let mut patch = self.fields.representation(index);
        patch.enabled = self.update_enabled;
        let has_attributes = patch.email.is_some()
            || patch.first_name.is_some()
            || patch.last_name.is_some()
            || patch.enabled.is_some();
        if has_attributes {
            self.api.update_user(realm, &user_id, &patch).await?;
        }

        let mut mutation = Mutation::with_id(Some(user_id.clone()));
        if let Some(password) = self.fields.passwords.cloned(index) {
            self.api.reset_password(realm, &user_id, &password).await?;
            mutation = mutation
                .note(format!("  Password: {password}"))
                .detail(format!("{key}={password}@{realm}"));
        }
        Ok(mutation)
    }

    async fn delete(
        &mut self,
        realm: &str,
        _key: &str,
        existing: UserRepresentation,
    ) -> CliResult<Mutation> {
        let user_id = existing.id.ok_or_else(|| missing_id("user"))?;
        self.api.delete_user(realm, &user_id).await?;
        Ok(Mutation::with_id(Some(user_id)))
    }

    async fn list(&mut self, realm: &str) -> CliResult<Vec<String>> {
        let users = self.api.list_users(realm).await?;
        Ok(users.iter().map(describe).collect())
    }
}

fn describe(user: &UserRepresentation) -> String {
    let username = user.username.as_deref().unwrap_or("<unnamed>");
    let mut line = match user.email.as_deref() {
        Some(email) => format!("{username} <{email}>"),
        None => username.to_string(),
    };
    if user.enabled == Some(false) {
        line.push_str(" (disabled)");
    }
    line
}

pub async fn execute(args: UsersArgs, inv: &mut Invocation, report: &mut BatchReport) -> CliResult<()> {
    let api = inv.api();
    let command_realm = args.realm.as_deref();

    match args.command {
        UsersCommands::Create(a) => {
            let usernames = require_keys("username", a.usernames)?;
            let count = usernames.len();
            let mut users = Users::new(&api);
            users.fields = BoundFields::bind(a.fields, count)?;
            users.enabled = FieldValues::bind("enabled", a.enabled, "username", count)?;
            users.realm_roles = a.realm_roles;
            users.client_grant = client_grant(a.client_roles, a.client_id)?;

            let target = inv.resolve(&a.target, command_realm).await?;
            reconcile(&mut users, Verb::Create, &target.realms, &usernames, false, report).await
        }
        UsersCommands::Update(a) => {
            let usernames = require_keys("username", a.usernames)?;
            require_any_field(
                &[
                    !a.fields.emails.is_empty(),
                    !a.fields.first_names.is_empty(),
                    !a.fields.last_names.is_empty(),
                    !a.fields.passwords.is_empty(),
                    a.enabled.is_some(),
                ],
                "--email, --first-name, --last-name, --password, --enabled",
            )?;
            let mut users = Users::new(&api);
            users.fields = BoundFields::bind(a.fields, usernames.len())?;
            users.update_enabled = a.enabled;

            let target = inv.resolve(&a.target, command_realm).await?;
            reconcile(
                &mut users,
                Verb::Update,
                &target.realms,
                &usernames,
                a.ignore_missing,
                report,
            )
            .await
        }
        UsersCommands::Delete(a) => {
            let usernames = require_keys("username", a.usernames)?;
            let mut users = Users::new(&api);

            let target = inv.resolve(&a.target, command_realm).await?;
            reconcile(
                &mut users,
                Verb::Delete,
                &target.realms,
                &usernames,
                a.ignore_missing,
                report,
            )
            .await
        }
        UsersCommands::List(a) => {
            let mut users = Users::new(&api);
            let target = inv.resolve(&a.target, command_realm).await?;
            list_all(&mut users, &target.realms, report).await
        }
    }
}

fn client_grant(roles: Vec<String>, client_id: Option<String>) -> CliResult<Option<ClientGrant>> {
    let roles: Vec<String> = roles
        .into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();
    if roles.is_empty() {
        return Ok(None);
    }
    let client_id = client_id
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| CliError::Validation("--client-role requires --client-id".to_string()))?;
    Ok(Some(ClientGrant {
        client_id,
        roles,
        client_uuid: None,
        resolved: Vec::new(),
    }))
}
