//! Sandbox configuration model.
//!
//! A configuration can be assembled from command-line flags or loaded
//! from a JSON file; both produce the same [`SandboxConfig`].

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_GUEST_CWD, DEFAULT_ROOTFS, HOME_ENV, RECOMMENDED_BINDINGS};
use crate::error::{PathbindError, Result};

/// One bind request: a host path exposed at a guest location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindSpec {
    /// Host path, resolved against the real filesystem at registration.
    pub host: PathBuf,
    /// Guest location. Defaults to the host path (symmetric binding).
    #[serde(default)]
    pub guest: Option<PathBuf>,
    /// Whether a missing host path deserves a warning.
    #[serde(default = "default_must_exist")]
    pub must_exist: bool,
}

const fn default_must_exist() -> bool {
    true
}

impl BindSpec {
    /// Creates a bind request whose host path must exist.
    #[must_use]
    pub fn new(host: impl Into<PathBuf>, guest: Option<PathBuf>) -> Self {
        Self {
            host: host.into(),
            guest,
            must_exist: true,
        }
    }

    /// Creates a symmetric bind request tolerated to be missing.
    #[must_use]
    pub fn optional(host: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            guest: None,
            must_exist: false,
        }
    }
}

/// Parses the `host[:guest]` command-line syntax.
impl FromStr for BindSpec {
    type Err = PathbindError;

    fn from_str(s: &str) -> Result<Self> {
        let (host, guest) = match s.split_once(':') {
            Some((host, guest)) => (host, Some(guest)),
            None => (s, None),
        };
        if host.is_empty() {
            return Err(PathbindError::Config {
                message: format!("binding \"{s}\" has an empty host path"),
            });
        }
        let guest = match guest {
            Some("") => {
                return Err(PathbindError::Config {
                    message: format!("binding \"{s}\" has an empty guest path"),
                });
            }
            Some(g) => Some(PathBuf::from(g)),
            None => None,
        };
        Ok(Self::new(host, guest))
    }
}

/// Root configuration for one sandbox session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Real root onto which the guest view is overlaid.
    #[serde(default = "default_rootfs")]
    pub rootfs: PathBuf,
    /// Initial working directory, as seen from the guest.
    #[serde(default = "default_cwd")]
    pub cwd: PathBuf,
    /// Explicit bind requests.
    #[serde(default)]
    pub bindings: Vec<BindSpec>,
    /// Whether to add the recommended host bindings.
    #[serde(default)]
    pub recommended: bool,
}

fn default_rootfs() -> PathBuf {
    PathBuf::from(DEFAULT_ROOTFS)
}

fn default_cwd() -> PathBuf {
    PathBuf::from(DEFAULT_GUEST_CWD)
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            rootfs: default_rootfs(),
            cwd: default_cwd(),
            bindings: Vec::new(),
            recommended: false,
        }
    }
}

impl SandboxConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| PathbindError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Returns every bind request, recommended ones first when enabled.
    #[must_use]
    pub fn all_bindings(&self) -> Vec<BindSpec> {
        let mut all = Vec::with_capacity(self.bindings.len() + RECOMMENDED_BINDINGS.len() + 1);
        if self.recommended {
            all.extend(RECOMMENDED_BINDINGS.iter().map(|p| BindSpec::optional(*p)));
            if let Some(home) = std::env::var_os(HOME_ENV) {
                all.push(BindSpec::optional(home));
            }
        }
        all.extend(self.bindings.iter().cloned());
        all
    }
}
