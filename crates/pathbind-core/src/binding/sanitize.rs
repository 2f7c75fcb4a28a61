//! One-shot sanitization of every registered binding.
//!
//! Runs once the real root and guest working directory are known. Each
//! binding gets a canonical guest side, its substitution metadata, and a
//! bootstrapped mount point. Failures stay local to their binding; this is
//! the one place that decides what a failure means for it.

use std::path::PathBuf;

use pathbind_common::constants::{MAX_SYMLINK_DEPTH, SEPARATOR};
use pathbind_common::error::{PathbindError, Result};

use super::BindingTable;
use super::bootstrap::{self, Bootstrap};
use crate::path::canon::canonicalize;
use crate::path::translate::GuestView;
use crate::path::{RealRoot, as_path};

/// Final state of one binding after sanitization.
#[derive(Debug)]
pub enum BindingOutcome {
    /// Usable, with its mount point present under the real root.
    Ready(Bootstrap),
    /// Usable, but its mount point could not be materialized.
    MountPointMissing(PathbindError),
    /// Left unsanitized; it never takes part in matching.
    Unusable(PathbindError),
}

impl BindingOutcome {
    /// Whether the binding takes part in substitution.
    #[must_use]
    pub const fn is_usable(&self) -> bool {
        !matches!(self, Self::Unusable(_))
    }
}

/// Per-binding record of a sanitization pass, in table order.
#[derive(Debug)]
pub struct BindingReport {
    /// Canonical host path.
    pub host: PathBuf,
    /// Guest path: canonical when usable, as requested otherwise.
    pub guest: PathBuf,
    /// What happened to the binding.
    pub outcome: BindingOutcome,
}

/// Result of sanitizing a whole table.
#[derive(Debug, Default)]
pub struct FinalizeReport {
    /// One entry per binding, in table order.
    pub bindings: Vec<BindingReport>,
}

impl FinalizeReport {
    /// Number of bindings that take part in substitution.
    #[must_use]
    pub fn usable(&self) -> usize {
        self.bindings.iter().filter(|b| b.outcome.is_usable()).count()
    }

    /// Bindings left unusable, with the reason.
    pub fn unusable(&self) -> impl Iterator<Item = &BindingReport> {
        self.bindings.iter().filter(|b| !b.outcome.is_usable())
    }
}

/// Canonicalizes the requested guest path inside the guest view.
fn canonical_guest(
    table: &BindingTable,
    root: &RealRoot,
    cwd: &[u8],
    requested: &[u8],
) -> Result<Vec<u8>> {
    let view = GuestView::new(root, table);
    let guest = canonicalize(&view, cwd, requested, true, MAX_SYMLINK_DEPTH)?;
    if guest == [SEPARATOR] {
        return Err(PathbindError::RootBinding {
            path: as_path(requested).to_path_buf(),
        });
    }
    Ok(guest)
}

/// Sanitizes every binding of `table`, in table order.
///
/// Earlier bindings are already usable while later guest paths are
/// canonicalized, so a guest path may traverse another binding.
pub fn finalize(table: &mut BindingTable, root: &RealRoot, cwd: &[u8]) -> FinalizeReport {
    let mut report = FinalizeReport {
        bindings: Vec::with_capacity(table.len()),
    };

    for index in 0..table.len() {
        let Some(binding) = table.get(index) else {
            break;
        };
        let requested = binding.guest.path.clone();
        let host = binding.host.path.clone();
        let canonical = canonical_guest(table, root, cwd, &requested);

        let Some(binding) = table.get_mut(index) else {
            break;
        };
        let outcome = match canonical {
            Ok(guest) => {
                binding.set_canonical_guest(guest);
                let outcome = match bootstrap::materialize(root, binding.guest.prefix(), &host) {
                    Ok(done) => BindingOutcome::Ready(done),
                    Err(e) => {
                        tracing::warn!(
                            location = %String::from_utf8_lossy(binding.guest.prefix()),
                            error = %e,
                            "can't create parent directories for binding location"
                        );
                        BindingOutcome::MountPointMissing(e)
                    }
                };
                binding.sanitized = true;
                outcome
            }
            Err(e) => {
                tracing::warn!(
                    location = %String::from_utf8_lossy(&requested),
                    error = %e,
                    "can't sanitize binding location"
                );
                binding.sanitized = false;
                BindingOutcome::Unusable(e)
            }
        };

        report.bindings.push(BindingReport {
            host: as_path(&host).to_path_buf(),
            guest: as_path(binding.guest.path()).to_path_buf(),
            outcome,
        });
    }

    report
}
