//! Whole-path translation between the guest view and the host filesystem.
//!
//! Substitution only rewrites paths covered by a binding; everything else
//! in the guest view lives under the real root.

use pathbind_common::error::Result;
use pathbind_common::types::{Direction, Substitution};

use super::RealRoot;
use crate::binding::BindingTable;

/// Read-only view of the guest namespace: a real root plus its bindings.
#[derive(Debug, Clone, Copy)]
pub struct GuestView<'a> {
    root: &'a RealRoot,
    bindings: &'a BindingTable,
}

impl<'a> GuestView<'a> {
    /// Creates a view over `root` and `bindings`.
    #[must_use]
    pub const fn new(root: &'a RealRoot, bindings: &'a BindingTable) -> Self {
        Self { root, bindings }
    }

    /// Maps an absolute, canonical guest path to its host location.
    ///
    /// # Errors
    ///
    /// Returns an error if the substituted path would be too long.
    pub fn to_host(&self, guest: &[u8]) -> Result<Vec<u8>> {
        let mut path = guest.to_vec();
        match self.bindings.substitute(self.root, Direction::ToHost, &mut path)? {
            Substitution::NotABinding => Ok(self.root.join(guest)),
            Substitution::NoSubstitutionNeeded | Substitution::Substituted => Ok(path),
        }
    }

    /// Maps a host path back to the guest view.
    ///
    /// Paths that are neither bound nor under the real root are returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the substituted path would be too long.
    pub fn to_guest(&self, host: &[u8]) -> Result<Vec<u8>> {
        let mut path = host.to_vec();
        match self.bindings.substitute(self.root, Direction::ToGuest, &mut path)? {
            Substitution::NotABinding => Ok(self.root.strip(host).unwrap_or(path)),
            Substitution::NoSubstitutionNeeded | Substitution::Substituted => Ok(path),
        }
    }
}
