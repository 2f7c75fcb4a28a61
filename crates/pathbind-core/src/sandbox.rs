//! Sandbox session: the real root, the guest working directory, and the
//! binding table they share.
//!
//! A session has two phases. Bindings are requested first; then
//! [`Sandbox::finalize_bindings`] sanitizes them once, after which the
//! table is read-only and only queried.

use std::path::{Path, PathBuf};

use pathbind_common::config::SandboxConfig;
use pathbind_common::constants::{MAX_SYMLINK_DEPTH, SEPARATOR};
use pathbind_common::error::{PathbindError, Result};
use pathbind_common::types::{Direction, Substitution};

use crate::binding::BindingTable;
use crate::binding::sanitize::{self, FinalizeReport};
use crate::path::canon::canonicalize;
use crate::path::translate::GuestView;
use crate::path::{RealRoot, as_bytes, as_path};

/// One path-virtualization session.
#[derive(Debug)]
pub struct Sandbox {
    root: RealRoot,
    cwd: Vec<u8>,
    bindings: BindingTable,
    finalized: bool,
}

impl Sandbox {
    /// Opens a session over the real root `rootfs`, starting in the guest
    /// directory `cwd`.
    ///
    /// # Errors
    ///
    /// Returns an error if `rootfs` cannot be resolved or `cwd` is not
    /// absolute.
    pub fn new(rootfs: &Path, cwd: &Path) -> Result<Self> {
        let root = RealRoot::new(rootfs)?;
        if as_bytes(cwd).first() != Some(&SEPARATOR) {
            return Err(PathbindError::Config {
                message: format!(
                    "guest working directory \"{}\" is not absolute",
                    cwd.display()
                ),
            });
        }
        tracing::info!(
            rootfs = %root.as_path().display(),
            cwd = %cwd.display(),
            "opening sandbox"
        );
        Ok(Self {
            root,
            cwd: as_bytes(cwd).to_vec(),
            bindings: BindingTable::new(),
            finalized: false,
        })
    }

    /// Opens a session and requests every binding of `config`.
    ///
    /// The bindings are not finalized yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be opened or a binding is a
    /// fatal configuration error.
    pub fn from_config(config: &SandboxConfig) -> Result<Self> {
        let mut sandbox = Self::new(&config.rootfs, &config.cwd)?;
        for spec in config.all_bindings() {
            sandbox.request_binding(&spec.host, spec.guest.as_deref(), spec.must_exist)?;
        }
        Ok(sandbox)
    }

    /// Registers one host/guest mapping.
    ///
    /// # Errors
    ///
    /// Returns [`PathbindError::AlreadyFinalized`] after finalization, and
    /// [`PathbindError::Config`] if the guest path is too long.
    pub fn request_binding(
        &mut self,
        host: &Path,
        guest: Option<&Path>,
        must_exist: bool,
    ) -> Result<()> {
        if self.finalized {
            return Err(PathbindError::AlreadyFinalized);
        }
        self.bindings.insert(host, guest, must_exist)
    }

    /// Sanitizes and bootstraps every registered binding.
    ///
    /// # Errors
    ///
    /// Returns [`PathbindError::AlreadyFinalized`] on a second call.
    /// Per-binding failures are reported, not returned.
    pub fn finalize_bindings(&mut self) -> Result<FinalizeReport> {
        if self.finalized {
            return Err(PathbindError::AlreadyFinalized);
        }
        self.finalized = true;
        let report = sanitize::finalize(&mut self.bindings, &self.root, &self.cwd);
        tracing::debug!(
            total = report.bindings.len(),
            usable = report.usable(),
            "bindings finalized"
        );
        Ok(report)
    }

    /// Rewrites `path` in place. See [`BindingTable::substitute`].
    ///
    /// # Errors
    ///
    /// Returns [`PathbindError::NameTooLong`] if the result would not fit.
    pub fn substitute(&self, direction: Direction, path: &mut Vec<u8>) -> Result<Substitution> {
        self.bindings.substitute(&self.root, direction, path)
    }

    /// Returns the rewritten copy of `path`. See [`BindingTable::substituted`].
    ///
    /// # Errors
    ///
    /// Returns [`PathbindError::NameTooLong`] if the result would not fit.
    pub fn substituted(
        &self,
        direction: Direction,
        path: &[u8],
    ) -> Result<(Substitution, Vec<u8>)> {
        self.bindings.substituted(&self.root, direction, path)
    }

    /// One display line per binding: `host` or `host:guest`.
    pub fn describe_bindings(&self) -> Vec<String> {
        self.bindings.describe()
    }

    /// Maps a guest path, relative to the guest working directory or
    /// absolute, to its host location.
    ///
    /// # Errors
    ///
    /// Returns an error if canonicalization fails or the result is too
    /// long.
    pub fn translate(&self, guest: &Path, follow_final: bool) -> Result<PathBuf> {
        let view = self.view();
        let canonical = canonicalize(
            &view,
            &self.cwd,
            as_bytes(guest),
            follow_final,
            MAX_SYMLINK_DEPTH,
        )?;
        let host = view.to_host(&canonical)?;
        Ok(as_path(&host).to_path_buf())
    }

    /// Maps a host path back to the guest view.
    ///
    /// # Errors
    ///
    /// Returns an error if the result is too long.
    pub fn detranslate(&self, host: &Path) -> Result<PathBuf> {
        let guest = self.view().to_guest(as_bytes(host))?;
        Ok(as_path(&guest).to_path_buf())
    }

    /// Whether the host path `path` lies under the real root.
    #[must_use]
    pub fn is_under_real_root(&self, path: &[u8]) -> bool {
        self.root.contains(path)
    }

    /// The real root.
    #[must_use]
    pub const fn root(&self) -> &RealRoot {
        &self.root
    }

    /// The binding table.
    #[must_use]
    pub const fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    /// Whether [`Sandbox::finalize_bindings`] has run.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    const fn view(&self) -> GuestView<'_> {
        GuestView::new(&self.root, &self.bindings)
    }
}
