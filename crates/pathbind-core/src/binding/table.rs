//! The ordered binding table.
//!
//! Bindings are kept in strictly descending byte order of their host path,
//! so that a deeper host path is always consulted before any of its
//! ancestors.

use std::path::Path;

use pathbind_common::constants::MAX_PATH_LEN;
use pathbind_common::error::{PathbindError, Result};

use super::Binding;
use crate::path::as_bytes;

/// Ordered collection of bindings, exclusively owning every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    bindings: Vec<Binding>,
}

impl BindingTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Registers a binding of `host` at `guest` (defaults to `host`).
    ///
    /// The host side is resolved against the real filesystem right away; a
    /// host path that cannot be resolved drops the request, with a warning
    /// when `must_exist` is set. The guest side is stored verbatim until
    /// sanitization.
    ///
    /// # Errors
    ///
    /// Returns [`PathbindError::Config`] if the guest path does not fit
    /// within the pathname limit. Nothing else escapes this call.
    pub fn insert(&mut self, host: &Path, guest: Option<&Path>, must_exist: bool) -> Result<()> {
        let resolved = match std::fs::canonicalize(host) {
            Ok(resolved) => resolved,
            Err(e) if must_exist => {
                tracing::warn!(
                    host = %host.display(),
                    error = %e,
                    "can't resolve binding host path"
                );
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(
                    host = %host.display(),
                    error = %e,
                    "skipping missing optional binding"
                );
                return Ok(());
            }
        };

        let guest = guest.unwrap_or(host);
        let guest_bytes = as_bytes(guest);
        if guest_bytes.len() >= MAX_PATH_LEN {
            return Err(PathbindError::Config {
                message: format!("binding location \"{}\" is too long", guest.display()),
            });
        }

        if let Err(e) = self.bindings.try_reserve(1) {
            tracing::warn!(host = %host.display(), error = %e, "can't allocate binding");
            return Ok(());
        }

        let binding = Binding::registered(as_bytes(&resolved).to_vec(), guest_bytes.to_vec());
        tracing::debug!(binding = %binding, "binding registered");
        self.insort(binding);
        Ok(())
    }

    /// Inserts before the first binding whose host path is not strictly
    /// greater than the new one.
    fn insort(&mut self, binding: Binding) {
        let index = self
            .bindings
            .partition_point(|existing| existing.host.path > binding.host.path);
        self.bindings.insert(index, binding);
    }

    /// Iterates over bindings in table order.
    pub fn iter(&self) -> std::slice::Iter<'_, Binding> {
        self.bindings.iter()
    }

    /// Number of registered bindings, usable or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no binding is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub(super) fn get(&self, index: usize) -> Option<&Binding> {
        self.bindings.get(index)
    }

    pub(super) fn get_mut(&mut self, index: usize) -> Option<&mut Binding> {
        self.bindings.get_mut(index)
    }

    /// Returns one display line per binding and logs each of them.
    pub fn describe(&self) -> Vec<String> {
        self.bindings
            .iter()
            .map(|binding| {
                let line = binding.to_string();
                tracing::info!("binding = {line}");
                line
            })
            .collect()
    }

    /// Builds a table from already sanitized bindings, keeping the order.
    #[cfg(test)]
    pub(crate) fn from_sanitized(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }
}

impl<'a> IntoIterator for &'a BindingTable {
    type Item = &'a Binding;
    type IntoIter = std::slice::Iter<'a, Binding>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
