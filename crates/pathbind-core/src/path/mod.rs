//! Pathname primitives shared by the binding engine.
//!
//! Paths are handled as raw bytes: the kernel hands them over that way and
//! they need not be valid UTF-8.

pub mod canon;
pub mod compare;
pub mod probe;
pub mod translate;

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use pathbind_common::constants::SEPARATOR;
use pathbind_common::error::{PathbindError, Result};

use self::compare::{PathComparison, compare};

/// Borrows a path as raw bytes.
#[must_use]
pub fn as_bytes(path: &Path) -> &[u8] {
    path.as_os_str().as_bytes()
}

/// Borrows raw bytes as a path.
#[must_use]
pub fn as_path(bytes: &[u8]) -> &Path {
    Path::new(OsStr::from_bytes(bytes))
}

/// Appends `component` to `path`, inserting one separator.
pub(crate) fn push_component(path: &mut Vec<u8>, component: &[u8]) {
    if path.last() != Some(&SEPARATOR) {
        path.push(SEPARATOR);
    }
    path.extend_from_slice(component);
}

/// Drops the last component of an absolute `path`, never going above `/`.
pub(crate) fn pop_component(path: &mut Vec<u8>) {
    match path.iter().rposition(|&b| b == SEPARATOR) {
        Some(0) | None => path.truncate(1),
        Some(index) => path.truncate(index),
    }
}

/// Iterates over the non-empty components of `path`.
pub(crate) fn components(path: &[u8]) -> impl Iterator<Item = &[u8]> {
    path.split(|&b| b == SEPARATOR).filter(|c| !c.is_empty())
}

/// The real root: where the guest view is overlaid on the host filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealRoot {
    path: Vec<u8>,
}

impl RealRoot {
    /// Resolves `path` to its canonical real location.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be resolved.
    pub fn new(path: &Path) -> Result<Self> {
        let resolved = std::fs::canonicalize(path).map_err(|e| PathbindError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            path: as_bytes(&resolved).to_vec(),
        })
    }

    /// The host filesystem root itself.
    #[must_use]
    pub fn host() -> Self {
        Self {
            path: vec![SEPARATOR],
        }
    }

    /// Returns the root as raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.path
    }

    /// Returns the root as a path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        as_path(&self.path)
    }

    /// Whether the guest view is overlaid on `/`.
    #[must_use]
    pub fn is_host_root(&self) -> bool {
        self.path == [SEPARATOR]
    }

    /// Whether the host path `path` lies under this root.
    #[must_use]
    pub fn contains(&self, path: &[u8]) -> bool {
        matches!(
            compare(&self.path, path),
            PathComparison::Equal | PathComparison::FirstIsPrefix
        )
    }

    /// Returns the host location of the absolute guest path `guest`.
    #[must_use]
    pub fn join(&self, guest: &[u8]) -> Vec<u8> {
        if self.is_host_root() {
            return guest.to_vec();
        }
        let mut joined = self.path.clone();
        for component in components(guest) {
            push_component(&mut joined, component);
        }
        joined
    }

    /// Returns the guest form of `host` when it lies under this root.
    #[must_use]
    pub fn strip(&self, host: &[u8]) -> Option<Vec<u8>> {
        if !self.contains(host) {
            return None;
        }
        if self.is_host_root() {
            return Some(host.to_vec());
        }
        let rest = &host[self.path.len()..];
        if rest.is_empty() {
            Some(vec![SEPARATOR])
        } else {
            Some(rest.to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(path: &str) -> RealRoot {
        RealRoot {
            path: path.as_bytes().to_vec(),
        }
    }

    #[test]
    fn push_and_pop_components() {
        let mut path = b"/".to_vec();
        push_component(&mut path, b"usr");
        push_component(&mut path, b"lib");
        assert_eq!(path, b"/usr/lib");
        pop_component(&mut path);
        assert_eq!(path, b"/usr");
        pop_component(&mut path);
        assert_eq!(path, b"/");
        pop_component(&mut path);
        assert_eq!(path, b"/");
    }

    #[test]
    fn components_skip_empty_segments() {
        let parts: Vec<&[u8]> = components(b"//usr///lib/").collect();
        assert_eq!(parts, vec![&b"usr"[..], &b"lib"[..]]);
    }

    #[test]
    fn join_under_host_root_is_identity() {
        assert_eq!(RealRoot::host().join(b"/usr/lib"), b"/usr/lib");
    }

    #[test]
    fn join_under_rootfs_prefixes_root() {
        let rootfs = root("/srv/guest");
        assert_eq!(rootfs.join(b"/usr/lib"), b"/srv/guest/usr/lib");
        assert_eq!(rootfs.join(b"/"), b"/srv/guest");
    }

    #[test]
    fn contains_respects_component_boundaries() {
        let rootfs = root("/srv/guest");
        assert!(rootfs.contains(b"/srv/guest"));
        assert!(rootfs.contains(b"/srv/guest/etc"));
        assert!(!rootfs.contains(b"/srv/guestbook"));
        assert!(!rootfs.contains(b"/srv"));
    }

    #[test]
    fn strip_returns_guest_form() {
        let rootfs = root("/srv/guest");
        assert_eq!(rootfs.strip(b"/srv/guest/etc"), Some(b"/etc".to_vec()));
        assert_eq!(rootfs.strip(b"/srv/guest"), Some(b"/".to_vec()));
        assert_eq!(rootfs.strip(b"/opt"), None);
    }

    #[test]
    fn new_canonicalizes_existing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let rootfs = RealRoot::new(dir.path()).expect("root");
        let expected = std::fs::canonicalize(dir.path()).expect("canonicalize");
        assert_eq!(rootfs.as_path(), expected.as_path());
        assert!(!rootfs.is_host_root());
    }

    #[test]
    fn new_fails_for_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(RealRoot::new(&dir.path().join("missing")).is_err());
    }
}
