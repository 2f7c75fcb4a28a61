//! Mount point bootstrap.
//!
//! Programs may walk toward a binding's guest location with ordinary
//! filesystem calls before any of them is substituted, so the location has
//! to exist under the real root. Missing components are created as
//! directories; the final one mirrors the host side (empty file for a
//! regular file, directory otherwise). Nothing is rolled back on failure.

use pathbind_common::constants::{BOOTSTRAP_DIR_MODE, BOOTSTRAP_FILE_MODE};
use pathbind_common::error::Result;

use crate::path::probe::{self, FileKind};
use crate::path::{RealRoot, as_path, components, push_component};

/// What bootstrap did for one mount point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// Something already exists at the location.
    AlreadyPresent,
    /// The location was created.
    Created,
}

/// Makes the canonical guest path `guest` exist under `root`, shaped after
/// the host path `host`.
///
/// # Errors
///
/// Returns an error if the host side cannot be classified, if probing the
/// location fails for a reason other than a missing entry, or if a
/// component cannot be created.
pub fn materialize(root: &RealRoot, guest: &[u8], host: &[u8]) -> Result<Bootstrap> {
    let kind = probe::stat_follow(as_path(host))?;

    let location = root.join(guest);
    if probe::stat_no_follow(as_path(&location))?.is_some() {
        return Ok(Bootstrap::AlreadyPresent);
    }

    let mut current = if root.is_host_root() {
        Vec::new()
    } else {
        root.as_bytes().to_vec()
    };
    let parts: Vec<&[u8]> = components(guest).collect();
    for (index, component) in parts.iter().enumerate() {
        push_component(&mut current, component);
        let is_final = index + 1 == parts.len();
        if is_final && kind == FileKind::Regular {
            probe::create_empty_file(as_path(&current), BOOTSTRAP_FILE_MODE)?;
        } else {
            let _ = probe::make_directory(as_path(&current), BOOTSTRAP_DIR_MODE)?;
        }
    }

    tracing::info!(
        location = %String::from_utf8_lossy(guest),
        "created the binding location"
    );
    Ok(Bootstrap::Created)
}

#[cfg(test)]
mod tests {
    use std::os::unix::fs::symlink;

    use super::*;
    use crate::path::as_bytes;

    fn setup() -> (tempfile::TempDir, RealRoot) {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("rootfs")).expect("mkdir rootfs");
        std::fs::create_dir(dir.path().join("hostdir")).expect("mkdir hostdir");
        std::fs::write(dir.path().join("hostfile"), b"data").expect("write hostfile");
        let root = RealRoot::new(&dir.path().join("rootfs")).expect("root");
        (dir, root)
    }

    #[test]
    fn directory_mount_point_is_created() {
        let (dir, root) = setup();
        let host = dir.path().join("hostdir");

        let outcome = materialize(&root, b"/opt/tools/bin", as_bytes(&host)).expect("materialize");
        assert_eq!(outcome, Bootstrap::Created);
        assert!(root.as_path().join("opt/tools/bin").is_dir());
    }

    #[test]
    fn file_mount_point_is_an_empty_file() {
        let (dir, root) = setup();
        let host = dir.path().join("hostfile");

        let outcome = materialize(&root, b"/etc/resolv.conf", as_bytes(&host)).expect("materialize");
        assert_eq!(outcome, Bootstrap::Created);
        let created = root.as_path().join("etc/resolv.conf");
        assert!(created.is_file());
        assert_eq!(std::fs::read(created).expect("read"), b"");
    }

    #[test]
    fn existing_location_is_left_alone() {
        let (dir, root) = setup();
        std::fs::create_dir_all(root.as_path().join("srv")).expect("mkdir");
        let host = dir.path().join("hostfile");

        let outcome = materialize(&root, b"/srv", as_bytes(&host)).expect("materialize");
        assert_eq!(outcome, Bootstrap::AlreadyPresent);
        assert!(root.as_path().join("srv").is_dir());
    }

    #[test]
    fn dangling_symlink_counts_as_existing() {
        let (dir, root) = setup();
        symlink("/nowhere", root.as_path().join("mnt")).expect("symlink");
        let host = dir.path().join("hostdir");

        let outcome = materialize(&root, b"/mnt", as_bytes(&host)).expect("materialize");
        assert_eq!(outcome, Bootstrap::AlreadyPresent);
    }

    #[test]
    fn missing_host_aborts_without_creating_anything() {
        let (dir, root) = setup();
        let host = dir.path().join("missing");

        assert!(materialize(&root, b"/opt/x", as_bytes(&host)).is_err());
        assert!(!root.as_path().join("opt").exists());
    }

    #[test]
    fn component_blocked_by_a_file_fails() {
        let (dir, root) = setup();
        std::fs::create_dir(root.as_path().join("var")).expect("mkdir");
        std::fs::write(root.as_path().join("var/file"), b"").expect("write");
        let host = dir.path().join("hostdir");

        assert!(materialize(&root, b"/var/file/sub/leaf", as_bytes(&host)).is_err());
        assert!(root.as_path().join("var").is_dir());
    }
}
