//! Batch reconciliation engine
//!
//! Shared by every resource command: bind per-item attributes, resolve the
//! target realms, then walk realm × item through a [`ManagedResource`].

pub mod binder;
pub mod reconcile;
pub mod result;
pub mod target;

pub use binder::{bind, require_keys, FieldValues};
pub use reconcile::{list_all, reconcile, ManagedResource, Mutation, Probe, Verb, Wording};
pub use result::{BatchReport, Outcome, OutcomeRecord};
pub use target::{resolve_realms, RealmDefaults, RealmSelection, RealmSource, TargetRealms};
