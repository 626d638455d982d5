//! Per-item attribute binding
//!
//! Every optional attribute flag may be given 0, 1 or N times, where N is the
//! number of primary identifiers: none leaves the attribute unset, one value
//! applies to every item, N values bind positionally.

use crate::error::{CliError, CliResult};

/// Bind one attribute list for the item at `index`
///
/// Returns `Ok(None)` when the attribute was not given.
pub fn bind<T>(values: &[T], count: usize, index: usize) -> CliResult<Option<&T>> {
    match values.len() {
        0 => Ok(None),
        1 => Ok(values.first()),
        n if n == count => Ok(values.get(index)),
        n => Err(CliError::Validation(format!(
            "got {n} values for {count} items; pass none, one for all, or one per item"
        ))),
    }
}

/// An attribute list checked against the primary identifier count
#[derive(Debug, Clone)]
pub struct FieldValues<T> {
    values: Vec<T>,
    count: usize,
}

impl<T> FieldValues<T> {
    /// Validate `values` for `flag` against `count` occurrences of `primary`
    pub fn bind(flag: &str, values: Vec<T>, primary: &str, count: usize) -> CliResult<Self> {
        let len = values.len();
        if len > 1 && len != count {
            return Err(CliError::Validation(format!(
                "invalid --{flag}: got {len} values for {count} --{primary}; pass no --{flag}, \
                 a single --{flag} to apply to all, or one --{flag} per --{primary} (in order)"
            )));
        }
        Ok(Self { values, count })
    }

    /// Value for the item at `index`, if the attribute was given
    pub fn get(&self, index: usize) -> Option<&T> {
        // Length was checked at construction.
        bind(&self.values, self.count, index).ok().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T> Default for FieldValues<T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            count: 0,
        }
    }
}

impl<T: Clone> FieldValues<T> {
    pub fn cloned(&self, index: usize) -> Option<T> {
        self.get(index).cloned()
    }
}

/// Trim identifiers and require at least one
pub fn require_keys(flag: &str, keys: Vec<String>) -> CliResult<Vec<String>> {
    let keys: Vec<String> = keys
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    if keys.is_empty() {
        return Err(CliError::Validation(format!(
            "at least one --{flag} is required"
        )));
    }
    Ok(keys)
}
