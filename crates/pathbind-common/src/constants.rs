//! System-wide constants and default paths.

/// Exclusive upper bound on the length of any pathname handled by the
/// binding engine, terminator included.
#[allow(clippy::cast_sign_loss)]
pub const MAX_PATH_LEN: usize = libc::PATH_MAX as usize;

/// Maximum number of symbolic links followed while canonicalizing one path.
pub const MAX_SYMLINK_DEPTH: usize = 40;

/// Path separator, as a byte.
pub const SEPARATOR: u8 = b'/';

/// Default real root: the host filesystem itself.
pub const DEFAULT_ROOTFS: &str = "/";

/// Default working directory inside the guest view.
pub const DEFAULT_GUEST_CWD: &str = "/";

/// Mode used for directories created while bootstrapping a mount point.
pub const BOOTSTRAP_DIR_MODE: u32 = 0o777;

/// Mode used for empty files created while bootstrapping a mount point.
pub const BOOTSTRAP_FILE_MODE: u32 = 0o766;

/// Host paths bound symmetrically by `--recommended`.
///
/// Missing entries are skipped without a warning.
pub const RECOMMENDED_BINDINGS: &[&str] = &[
    "/etc/host.conf",
    "/etc/hosts",
    "/etc/nsswitch.conf",
    "/etc/resolv.conf",
    "/dev/",
    "/sys/",
    "/proc/",
    "/tmp/",
];

/// Environment variable naming the home directory, also recommended.
pub const HOME_ENV: &str = "HOME";
