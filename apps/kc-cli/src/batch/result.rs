//! Batch outcome aggregation
//!
//! Tracks one outcome per (realm, item) in the order the executor visits them,
//! plus the human-readable lines that end up in the summary box.

use serde::Serialize;

/// Outcome of a single (realm, item) step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Created,
    Updated,
    Deleted,
    /// Nothing to do; the batch still succeeds
    Skipped,
    /// Fatal for the batch
    Failed,
}

impl Outcome {
    /// Whether the step changed remote state
    pub fn is_change(&self) -> bool {
        matches!(self, Outcome::Created | Outcome::Updated | Outcome::Deleted)
    }
}

/// Result for one item in one realm
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeRecord {
    pub realm: String,
    pub key: String,
    pub outcome: Outcome,
    pub line: String,
}

/// Accumulated result of one invocation
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Per-item outcomes, realm-major then item order
    pub items: Vec<OutcomeRecord>,
    /// Items that changed remote state
    pub changed_count: usize,
    pub skipped_count: usize,
    pub failure_count: usize,
    lines: Vec<String>,
    details: Vec<String>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an item that changed remote state
    pub fn add_change(&mut self, realm: &str, key: &str, outcome: Outcome, line: String) {
        self.changed_count += 1;
        self.push(realm, key, outcome, line);
    }

    /// Record an item left untouched
    pub fn add_skipped(&mut self, realm: &str, key: &str, line: String) {
        self.skipped_count += 1;
        self.push(realm, key, Outcome::Skipped, line);
    }

    /// Record the item that aborted the batch
    pub fn add_failure(&mut self, realm: &str, key: &str, line: String) {
        self.failure_count += 1;
        self.push(realm, key, Outcome::Failed, line);
    }

    fn push(&mut self, realm: &str, key: &str, outcome: Outcome, line: String) {
        self.lines.push(line.clone());
        self.items.push(OutcomeRecord {
            realm: realm.to_string(),
            key: key.to_string(),
            outcome,
            line,
        });
    }

    /// Add an informational line (list output, notes, summary)
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Add a free-form detail for the audit record
    pub fn push_detail(&mut self, detail: impl Into<String>) {
        self.details.push(detail.into());
    }

    /// Lines in the order they were produced
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// Final counts line, e.g. `Done. Created: 1, Skipped: 0.`
    pub fn summary_line(&self, changed_label: &str) -> String {
        format!(
            "Done. {changed_label}: {}, Skipped: {}.",
            self.changed_count, self.skipped_count
        )
    }

    /// Whether any item aborted the batch
    pub fn has_failures(&self) -> bool {
        self.failure_count > 0
    }
}
