//! Blocking filesystem probes used while sanitizing bindings.
//!
//! Thin wrappers over `stat(2)`, `lstat(2)`, `mkdir(2)` and `readlink(2)`
//! that keep the error number, so callers can tell "already exists" and
//! "not found" apart from real failures.

use std::os::unix::ffi::OsStringExt;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use nix::errno::Errno;
use nix::sys::stat::{Mode, SFlag, lstat, stat};
use pathbind_common::error::{PathbindError, Result};

/// Type of the entry a path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A regular file.
    Regular,
    /// A directory.
    Directory,
    /// A symbolic link (only reported when not following).
    Symlink,
    /// Anything else: devices, sockets, pipes.
    Other,
}

impl FileKind {
    fn from_mode(mode: nix::libc::mode_t) -> Self {
        let format = SFlag::from_bits_truncate(mode) & SFlag::S_IFMT;
        if format == SFlag::S_IFREG {
            Self::Regular
        } else if format == SFlag::S_IFDIR {
            Self::Directory
        } else if format == SFlag::S_IFLNK {
            Self::Symlink
        } else {
            Self::Other
        }
    }
}

/// Whether a creation call made a new entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Created {
    /// The entry was created.
    New,
    /// The entry was already there.
    AlreadyExists,
}

/// Classifies `path`, following symbolic links.
///
/// # Errors
///
/// Returns an error if `stat(2)` fails.
pub fn stat_follow(path: &Path) -> Result<FileKind> {
    let st = stat(path).map_err(|e| PathbindError::sys(path, e))?;
    Ok(FileKind::from_mode(st.st_mode))
}

/// Classifies `path` itself, without following a final symbolic link.
///
/// Returns `None` when nothing exists at `path`. A dangling symbolic link
/// exists.
///
/// # Errors
///
/// Returns an error if `lstat(2)` fails with anything but `ENOENT`; a
/// parent that is not a directory is such a failure.
pub fn stat_no_follow(path: &Path) -> Result<Option<FileKind>> {
    match lstat(path) {
        Ok(st) => Ok(Some(FileKind::from_mode(st.st_mode))),
        Err(Errno::ENOENT) => Ok(None),
        Err(e) => Err(PathbindError::sys(path, e)),
    }
}

/// Creates a directory, tolerating one that already exists.
///
/// # Errors
///
/// Returns an error if `mkdir(2)` fails with anything but `EEXIST`.
pub fn make_directory(path: &Path, mode: u32) -> Result<Created> {
    match nix::unistd::mkdir(path, Mode::from_bits_truncate(mode)) {
        Ok(()) => Ok(Created::New),
        Err(Errno::EEXIST) => Ok(Created::AlreadyExists),
        Err(e) => Err(PathbindError::sys(path, e)),
    }
}

/// Creates an empty regular file, leaving an existing one untouched.
///
/// # Errors
///
/// Returns an error if the file cannot be opened for creation.
pub fn create_empty_file(path: &Path, mode: u32) -> Result<()> {
    let _file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .mode(mode)
        .open(path)
        .map_err(|e| PathbindError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(())
}

/// Reads the target of `path` when it is a symbolic link.
///
/// Returns `None` when `path` is not a link, including when it cannot
/// exist because a parent is missing or not a directory.
///
/// # Errors
///
/// Returns an error if `lstat(2)` or `readlink(2)` fails unexpectedly.
pub fn read_symlink(path: &Path) -> Result<Option<Vec<u8>>> {
    match lstat(path) {
        Ok(st) if FileKind::from_mode(st.st_mode) == FileKind::Symlink => {}
        Ok(_) | Err(Errno::ENOENT | Errno::ENOTDIR) => return Ok(None),
        Err(e) => return Err(PathbindError::sys(path, e)),
    }
    let target = nix::fcntl::readlink(path).map_err(|e| PathbindError::sys(path, e))?;
    Ok(Some(target.into_vec()))
}
