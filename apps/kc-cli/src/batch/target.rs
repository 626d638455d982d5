//! Target realm resolution

use crate::api::ApiClient;
use crate::error::{CliError, CliResult};
use async_trait::async_trait;

/// Label used when every realm is targeted
pub const ALL_REALMS_LABEL: &str = "all realms";

/// Realm flags accepted by every resource verb
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RealmSelection {
    /// Target realm (repeatable or comma-separated)
    #[arg(long = "realm", value_name = "REALM", value_delimiter = ',')]
    pub realms: Vec<String>,

    /// Target every realm on the server
    #[arg(long, conflicts_with = "realms")]
    pub all_realms: bool,
}

impl RealmSelection {
    pub fn realms(realms: &[&str]) -> Self {
        Self {
            realms: realms.iter().map(|r| r.to_string()).collect(),
            all_realms: false,
        }
    }

    pub fn all() -> Self {
        Self {
            realms: Vec::new(),
            all_realms: true,
        }
    }
}

/// Fallback realms, in precedence order
#[derive(Debug, Clone, Default)]
pub struct RealmDefaults {
    /// Resource group `--realm`
    pub command: Option<String>,
    /// Top-level `--realm`
    pub global: Option<String>,
    /// `realm` in config.json
    pub config: Option<String>,
}

impl RealmDefaults {
    /// First non-empty default
    pub fn first(&self) -> Option<&str> {
        [&self.command, &self.global, &self.config]
            .into_iter()
            .filter_map(|r| r.as_deref())
            .map(str::trim)
            .find(|r| !r.is_empty())
    }
}

/// Resolved, non-empty target realm list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRealms {
    pub realms: Vec<String>,
    /// Display form for the summary header and audit record
    pub label: String,
}

/// Anything that can enumerate realms
#[async_trait]
pub trait RealmSource: Sync {
    async fn realm_names(&self) -> CliResult<Vec<String>>;
}

#[async_trait]
impl RealmSource for ApiClient {
    async fn realm_names(&self) -> CliResult<Vec<String>> {
        self.list_realms().await
    }
}

/// Resolve target realms
///
/// `--all-realms` asks the server (one call); explicit realms are used as
/// given, duplicates and order included; otherwise the first default wins.
pub async fn resolve_realms(
    selection: &RealmSelection,
    defaults: &RealmDefaults,
    source: &dyn RealmSource,
) -> CliResult<TargetRealms> {
    if selection.all_realms {
        let realms = source.realm_names().await?;
        if realms.is_empty() {
            return Err(CliError::Resolution(
                "--all-realms matched no realms on the server".to_string(),
            ));
        }
        return Ok(TargetRealms {
            realms,
            label: ALL_REALMS_LABEL.to_string(),
        });
    }

    let explicit: Vec<String> = selection
        .realms
        .iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();
    if !explicit.is_empty() {
        return Ok(TargetRealms {
            label: explicit.join(","),
            realms: explicit,
        });
    }

    match defaults.first() {
        Some(realm) => Ok(TargetRealms {
            realms: vec![realm.to_string()],
            label: realm.to_string(),
        }),
        None => Err(CliError::Resolution(
            "target realm not specified. Use --realm or set realm in config.json".to_string(),
        )),
    }
}
