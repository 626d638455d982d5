//! Generic reconciler
//!
//! One probe-then-mutate loop shared by every resource type. A resource only
//! supplies the capability calls; skip policy and outcome lines live here.

use crate::batch::result::{BatchReport, Outcome};
use crate::error::{CliError, CliResult};
use async_trait::async_trait;

/// Batch verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Create,
    Update,
    Delete,
}

impl Verb {
    fn outcome(&self) -> Outcome {
        match self {
            Verb::Create => Outcome::Created,
            Verb::Update => Outcome::Updated,
            Verb::Delete => Outcome::Deleted,
        }
    }
}

/// Words used in outcome lines for a verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wording {
    /// "create" in `Failed to create ...`
    pub infinitive: &'static str,
    /// "Created" in `Created role ...` and the summary line
    pub past: &'static str,
    /// Skip reason when the item is already present
    pub exists: &'static str,
    /// Skip reason when the item is absent
    pub missing: &'static str,
}

impl Wording {
    pub fn standard(verb: Verb) -> Self {
        let (infinitive, past) = match verb {
            Verb::Create => ("create", "Created"),
            Verb::Update => ("update", "Updated"),
            Verb::Delete => ("delete", "Deleted"),
        };
        Self {
            infinitive,
            past,
            exists: "already exists",
            missing: "not found",
        }
    }
}

/// Result of an existence probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    Found(T),
    NotFound,
}

impl<T> Probe<T> {
    /// Treat a remote "not found" as absence; other errors pass through
    pub fn from_lookup(result: CliResult<T>) -> CliResult<Self> {
        match result {
            Ok(found) => Ok(Probe::Found(found)),
            Err(e) if e.is_not_found() => Ok(Probe::NotFound),
            Err(e) => Err(e),
        }
    }
}

/// What a successful mutation reports back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mutation {
    /// Server-assigned id, shown as `(ID: ...)`
    pub id: Option<String>,
    /// Extra lines printed after the outcome line
    pub notes: Vec<String>,
    /// Audit detail (e.g. generated credentials)
    pub detail: Option<String>,
}

impl Mutation {
    pub fn done() -> Self {
        Self::default()
    }

    pub fn with_id(id: Option<String>) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Capability adapter for one resource type
///
/// Items are addressed by natural key (name, username, clientId). Mutating
/// calls report remote "absent" and "already present" as
/// [`CliError::NotFound`] and [`CliError::Conflict`].
#[async_trait]
pub trait ManagedResource: Send {
    /// Whatever the probe fetched, handed to update/delete
    type Existing: Send;

    /// Lower-case resource noun, e.g. `client role`
    fn noun(&self) -> &'static str;

    /// Where an item lives, e.g. `in realm "demo"`
    fn location(&self, realm: &str) -> String {
        format!("in realm {realm:?}")
    }

    fn wording(&self, verb: Verb) -> Wording {
        Wording::standard(verb)
    }

    /// Per-realm setup such as resolving a parent client
    async fn enter_realm(&mut self, _realm: &str) -> CliResult<()> {
        Ok(())
    }

    async fn probe(&mut self, realm: &str, key: &str) -> CliResult<Probe<Self::Existing>>;

    async fn create(&mut self, _realm: &str, _index: usize, _key: &str) -> CliResult<Mutation> {
        Err(unsupported(self.noun(), "create"))
    }

    /// Follow-up work on an item that now exists, e.g. role grants
    ///
    /// Runs after the create has been recorded; returned lines are shown
    /// under the outcome line.
    async fn after_create(
        &mut self,
        _realm: &str,
        _key: &str,
        _id: Option<&str>,
    ) -> CliResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn update(
        &mut self,
        _realm: &str,
        _index: usize,
        _key: &str,
        _existing: Self::Existing,
    ) -> CliResult<Mutation> {
        Err(unsupported(self.noun(), "update"))
    }

    async fn delete(
        &mut self,
        _realm: &str,
        _key: &str,
        _existing: Self::Existing,
    ) -> CliResult<Mutation> {
        Err(unsupported(self.noun(), "delete"))
    }

    /// Display names of every item in the realm
    async fn list(&mut self, _realm: &str) -> CliResult<Vec<String>> {
        Err(unsupported(self.noun(), "list"))
    }
}

fn unsupported(noun: &str, verb: &str) -> CliError {
    CliError::Validation(format!("{verb} is not supported for {noun}"))
}

fn capitalize(noun: &str) -> String {
    let mut chars = noun.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Apply `verb` to every key in every realm, realm-major
///
/// Create skips items that already exist, including a conflict raised by the
/// create call itself. Update and delete abort on a missing item unless
/// `ignore_missing` is set. Anything else aborts; earlier changes stay.
pub async fn reconcile<R: ManagedResource>(
    resource: &mut R,
    verb: Verb,
    realms: &[String],
    keys: &[String],
    ignore_missing: bool,
    report: &mut BatchReport,
) -> CliResult<()> {
    let wording = resource.wording(verb);

    for realm in realms {
        if let Err(e) = resource.enter_realm(realm).await {
            report.add_failure(realm, "", format!("Failed in realm {realm:?}: {e}"));
            return Err(e.context(format!("realm {realm:?}")));
        }

        for (index, key) in keys.iter().enumerate() {
            let step = Step {
                verb,
                wording,
                realm,
                index,
                key,
                ignore_missing,
            };
            step.run(resource, report).await?;
        }
    }

    let summary = report.summary_line(wording.past);
    report.push_line(summary);
    Ok(())
}

struct Step<'a> {
    verb: Verb,
    wording: Wording,
    realm: &'a str,
    index: usize,
    key: &'a str,
    ignore_missing: bool,
}

impl Step<'_> {
    async fn run<R: ManagedResource>(
        &self,
        resource: &mut R,
        report: &mut BatchReport,
    ) -> CliResult<()> {
        let noun = resource.noun();
        let location = resource.location(self.realm);
        let (realm, key) = (self.realm, self.key);

        let probe = match resource.probe(realm, key).await {
            Ok(probe) => probe,
            Err(e) => return Err(self.fail(report, noun, &location, e)),
        };

        let result = match (self.verb, probe) {
            (Verb::Create, Probe::Found(_)) => {
                self.skip(report, noun, &location, self.wording.exists);
                return Ok(());
            }
            (Verb::Create, Probe::NotFound) => resource.create(realm, self.index, key).await,
            (_, Probe::NotFound) => {
                if self.ignore_missing {
                    self.skip(report, noun, &location, self.wording.missing);
                    return Ok(());
                }
                let message = format!("{noun} {key:?} {} {location}", self.wording.missing);
                report.add_failure(realm, key, format!("{}.", capitalize(&message)));
                return Err(CliError::NotFound(message));
            }
            (Verb::Update, Probe::Found(existing)) => {
                resource.update(realm, self.index, key, existing).await
            }
            (Verb::Delete, Probe::Found(existing)) => resource.delete(realm, key, existing).await,
        };

        match result {
            Ok(mutation) => {
                let id = mutation
                    .id
                    .as_deref()
                    .map(|id| format!(" (ID: {id})"))
                    .unwrap_or_default();
                tracing::info!(realm, key, noun, verb = self.wording.infinitive, "applied");
                report.add_change(
                    realm,
                    key,
                    self.verb.outcome(),
                    format!("{} {noun} {key:?}{id} {location}.", self.wording.past),
                );
                for note in mutation.notes {
                    report.push_line(note);
                }
                if let Some(detail) = mutation.detail {
                    report.push_detail(detail);
                }
                if self.verb == Verb::Create {
                    self.finish_create(resource, report, noun, &location, mutation.id.as_deref())
                        .await?;
                }
                Ok(())
            }
            Err(e) if e.is_conflict() && self.verb == Verb::Create => {
                tracing::warn!(realm, key, error = %e, "conflict downgraded to skip");
                self.skip(report, noun, &location, self.wording.exists);
                Ok(())
            }
            Err(e) if e.is_not_found() && self.ignore_missing && self.verb != Verb::Create => {
                tracing::warn!(realm, key, error = %e, "missing item downgraded to skip");
                self.skip(report, noun, &location, self.wording.missing);
                Ok(())
            }
            Err(e) => Err(self.fail(report, noun, &location, e)),
        }
    }

    /// The item stays created even when its follow-up fails
    async fn finish_create<R: ManagedResource>(
        &self,
        resource: &mut R,
        report: &mut BatchReport,
        noun: &str,
        location: &str,
        id: Option<&str>,
    ) -> CliResult<()> {
        match resource.after_create(self.realm, self.key, id).await {
            Ok(notes) => {
                for note in notes {
                    report.push_line(note);
                }
                Ok(())
            }
            Err(e) => {
                let what = format!("{noun} {:?} was created {location} but setup failed", self.key);
                report.add_failure(self.realm, self.key, format!("{}: {e}", capitalize(&what)));
                Err(e.context(what))
            }
        }
    }

    fn skip(&self, report: &mut BatchReport, noun: &str, location: &str, reason: &str) {
        report.add_skipped(
            self.realm,
            self.key,
            format!("{} {:?} {reason} {location}. Skipped.", capitalize(noun), self.key),
        );
    }

    fn fail(&self, report: &mut BatchReport, noun: &str, location: &str, e: CliError) -> CliError {
        let what = format!("{} {noun} {:?} {location}", self.wording.infinitive, self.key);
        report.add_failure(self.realm, self.key, format!("Failed to {what}: {e}"));
        e.context(format!("failed to {what}"))
    }
}

/// List every realm through the resource's `list` capability
pub async fn list_all<R: ManagedResource>(
    resource: &mut R,
    realms: &[String],
    report: &mut BatchReport,
) -> CliResult<()> {
    let noun = capitalize(resource.noun());
    let mut total = 0;

    for realm in realms {
        resource
            .enter_realm(realm)
            .await
            .map_err(|e| e.context(format!("realm {realm:?}")))?;
        let names = resource
            .list(realm)
            .await
            .map_err(|e| e.context(format!("realm {realm:?}")))?;

        report.push_line(format!("{noun}s {}:", resource.location(realm)));
        if names.is_empty() {
            report.push_line("  (none)");
        }
        total += names.len();
        for name in names {
            report.push_line(format!("  {name}"));
        }
    }

    report.push_line(format!("Total: {total}"));
    Ok(())
}
