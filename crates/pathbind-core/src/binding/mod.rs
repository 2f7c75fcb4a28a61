//! Host/guest path bindings.
//!
//! A binding exposes a host path at a guest location. Bindings are
//! registered first (host side resolved, guest side deferred), then
//! sanitized exactly once, and from then on only read by substitution.

pub mod bootstrap;
pub mod sanitize;
pub mod substitute;
pub mod table;

use std::fmt;

use pathbind_common::constants::SEPARATOR;
use pathbind_common::types::Direction;

use crate::path::compare::is_equal;

pub use self::table::BindingTable;

/// One side of a binding.
///
/// `length` is the number of leading bytes of `path` that take part in
/// matching and splicing. It is zero when the side is the host root, so
/// that side prefixes every absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingPath {
    path: Vec<u8>,
    length: usize,
}

impl BindingPath {
    fn new(path: Vec<u8>, length: usize) -> Self {
        Self { path, length }
    }

    /// The full stored path.
    #[must_use]
    pub fn path(&self) -> &[u8] {
        &self.path
    }

    /// Number of bytes used for matching and splicing.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Whether this side is the whole-root sentinel (or not yet sanitized).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The part of the path used for matching and splicing.
    #[must_use]
    pub fn prefix(&self) -> &[u8] {
        &self.path[..self.length]
    }
}

/// A host/guest mapping plus its sanitization state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    host: BindingPath,
    guest: BindingPath,
    sanitized: bool,
    need_substitution: bool,
}

impl Binding {
    /// Creates an unsanitized binding from a canonical host path and a raw
    /// guest string.
    fn registered(host: Vec<u8>, guest: Vec<u8>) -> Self {
        let host_length = if host.len() == 1 { 0 } else { host.len() };
        Self {
            host: BindingPath::new(host, host_length),
            guest: BindingPath::new(guest, 0),
            sanitized: false,
            need_substitution: false,
        }
    }

    /// Installs the canonical guest path and derives substitution metadata.
    fn set_canonical_guest(&mut self, mut guest: Vec<u8>) {
        self.need_substitution = !is_equal(&self.host.path, &guest);
        if guest.len() > 1 && guest.last() == Some(&SEPARATOR) {
            let _ = guest.pop();
        }
        let length = guest.len();
        self.guest = BindingPath::new(guest, length);
    }

    /// The host side.
    #[must_use]
    pub const fn host(&self) -> &BindingPath {
        &self.host
    }

    /// The guest side. Only meaningful once sanitized.
    #[must_use]
    pub const fn guest(&self) -> &BindingPath {
        &self.guest
    }

    /// Whether the guest side is canonical and the binding takes part in
    /// matching.
    #[must_use]
    pub const fn is_sanitized(&self) -> bool {
        self.sanitized
    }

    /// Whether host and guest sides differ textually.
    #[must_use]
    pub const fn needs_substitution(&self) -> bool {
        self.need_substitution
    }

    /// Returns `(reference, replacement)` for a query in `direction`.
    #[must_use]
    pub const fn sides(&self, direction: Direction) -> (&BindingPath, &BindingPath) {
        match direction {
            Direction::ToHost => (&self.guest, &self.host),
            Direction::ToGuest => (&self.host, &self.guest),
        }
    }

    /// Builds an already sanitized binding without touching the filesystem.
    #[cfg(test)]
    pub(crate) fn sanitized(host: &[u8], guest: &[u8]) -> Self {
        let mut binding = Self::registered(host.to_vec(), guest.to_vec());
        binding.set_canonical_guest(guest.to_vec());
        binding.sanitized = true;
        binding
    }
}

/// Renders `host` for symmetric bindings and `host:guest` otherwise.
impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let host = String::from_utf8_lossy(&self.host.path);
        if is_equal(&self.host.path, &self.guest.path) {
            write!(f, "{host}")
        } else {
            write!(f, "{host}:{}", String::from_utf8_lossy(&self.guest.path))
        }
    }
}
