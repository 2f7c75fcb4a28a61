//! End-to-end tests for a sandbox session.
//!
//! These tests drive the public API the way the syscall layer does:
//! 1. Request bindings
//! 2. Finalize them (canonicalize guest sides, bootstrap mount points)
//! 3. Substitute and translate paths in both directions

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use pathbind_common::constants::MAX_PATH_LEN;
use pathbind_common::error::PathbindError;
use pathbind_common::types::{Direction, Substitution};
use pathbind_core::binding::sanitize::BindingOutcome;
use pathbind_core::sandbox::Sandbox;
use proptest::prelude::*;

struct Layout {
    _dir: tempfile::TempDir,
    rootfs: PathBuf,
    host_lib: PathBuf,
    host_conf: PathBuf,
}

fn layout() -> Layout {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = std::fs::canonicalize(dir.path()).expect("canonicalize");
    let rootfs = base.join("rootfs");
    let host_lib = base.join("host/lib");
    let host_conf = base.join("host/resolv.conf");
    std::fs::create_dir_all(&rootfs).expect("mkdir rootfs");
    std::fs::create_dir_all(&host_lib).expect("mkdir host lib");
    std::fs::write(&host_conf, b"nameserver 127.0.0.1\n").expect("write conf");
    Layout {
        _dir: dir,
        rootfs,
        host_lib,
        host_conf,
    }
}

fn bytes(path: &Path) -> Vec<u8> {
    path.as_os_str().as_bytes().to_vec()
}

fn joined(base: &Path, rest: &str) -> Vec<u8> {
    let mut path = bytes(base);
    path.extend_from_slice(rest.as_bytes());
    path
}

// ── Registration ─────────────────────────────────────────────────────

#[test]
fn table_stays_sorted_for_any_request_order() {
    let fx = layout();
    for name in ["b", "a/z", "c", "a", "bb"] {
        std::fs::create_dir_all(fx.rootfs.join("..").join("host").join(name)).expect("mkdir");
    }
    let mut sandbox = Sandbox::new(&fx.rootfs, Path::new("/")).expect("sandbox");
    for name in ["b", "a/z", "c", "a", "bb"] {
        let host = fx.host_lib.join("..").join(name);
        sandbox
            .request_binding(&host, Some(Path::new("/mnt")), true)
            .expect("request");
    }

    let hosts: Vec<Vec<u8>> = sandbox
        .bindings()
        .iter()
        .map(|b| b.host().path().to_vec())
        .collect();
    assert_eq!(hosts.len(), 5);
    assert!(hosts.windows(2).all(|pair| pair[0] > pair[1]));
}

const HOST_NAMES: [&str; 7] = ["a", "a/z", "ab", "b", "bb", "c", "c/a/b"];

proptest! {
    /// Any request order, duplicates included, leaves the table in
    /// descending host order with every request kept.
    #[test]
    fn prop_table_sorted_after_any_requests(
        picks in prop::collection::vec(0..=HOST_NAMES.len(), 1..16),
    ) {
        let fx = layout();
        let base = fx.rootfs.parent().expect("base").join("pool");
        for name in HOST_NAMES {
            std::fs::create_dir_all(base.join(name)).expect("mkdir");
        }
        let mut sandbox = Sandbox::new(&fx.rootfs, Path::new("/")).expect("sandbox");
        for &pick in &picks {
            let host = HOST_NAMES
                .get(pick)
                .map_or_else(|| PathBuf::from("/"), |name| base.join(name));
            sandbox
                .request_binding(&host, Some(Path::new("/mnt")), true)
                .expect("request");
        }

        let hosts: Vec<Vec<u8>> = sandbox
            .bindings()
            .iter()
            .map(|b| b.host().path().to_vec())
            .collect();
        prop_assert_eq!(hosts.len(), picks.len());
        prop_assert!(hosts.windows(2).all(|pair| pair[0] >= pair[1]));
    }
}

#[test]
fn overlong_guest_is_fatal() {
    let fx = layout();
    let mut sandbox = Sandbox::new(&fx.rootfs, Path::new("/")).expect("sandbox");
    let guest = format!("/{}", "g".repeat(MAX_PATH_LEN));
    let err = sandbox
        .request_binding(&fx.host_lib, Some(Path::new(&guest)), true)
        .unwrap_err();
    assert!(matches!(err, PathbindError::Config { .. }));
}

// ── Finalization ─────────────────────────────────────────────────────

#[test]
fn finalize_bootstraps_file_and_directory_mount_points() {
    let fx = layout();
    let mut sandbox = Sandbox::new(&fx.rootfs, Path::new("/")).expect("sandbox");
    sandbox
        .request_binding(&fx.host_lib, Some(Path::new("/usr/lib")), true)
        .expect("request");
    sandbox
        .request_binding(&fx.host_conf, Some(Path::new("/etc/resolv.conf")), true)
        .expect("request");

    let report = sandbox.finalize_bindings().expect("finalize");
    assert_eq!(report.usable(), 2);
    assert!(fx.rootfs.join("usr/lib").is_dir());
    assert!(fx.rootfs.join("etc/resolv.conf").is_file());
}

#[test]
fn failed_binding_never_matches() {
    let fx = layout();
    let mut sandbox = Sandbox::new(&fx.rootfs, Path::new("/")).expect("sandbox");
    sandbox
        .request_binding(&fx.host_lib, Some(Path::new("/")), true)
        .expect("request");

    let report = sandbox.finalize_bindings().expect("finalize");
    assert!(matches!(
        report.bindings[0].outcome,
        BindingOutcome::Unusable(PathbindError::RootBinding { .. })
    ));
    assert_eq!(sandbox.bindings().len(), 1);

    let mut path = b"/".to_vec();
    let outcome = sandbox
        .substitute(Direction::ToHost, &mut path)
        .expect("substitute");
    assert_eq!(outcome, Substitution::NotABinding);

    let mut path = bytes(&fx.host_lib);
    let outcome = sandbox
        .substitute(Direction::ToGuest, &mut path)
        .expect("substitute");
    assert_eq!(outcome, Substitution::NotABinding);
}

// ── Substitution ─────────────────────────────────────────────────────

#[test]
fn asymmetric_binding_round_trips() {
    let fx = layout();
    let mut sandbox = Sandbox::new(&fx.rootfs, Path::new("/")).expect("sandbox");
    sandbox
        .request_binding(&fx.host_lib, Some(Path::new("/usr/lib")), true)
        .expect("request");
    let _ = sandbox.finalize_bindings().expect("finalize");

    let (outcome, host) = sandbox
        .substituted(Direction::ToHost, b"/usr/lib/foo.so")
        .expect("substitute");
    assert_eq!(outcome, Substitution::Substituted);
    assert_eq!(host, joined(&fx.host_lib, "/foo.so"));

    let (outcome, guest) = sandbox
        .substituted(Direction::ToGuest, &host)
        .expect("substitute");
    assert_eq!(outcome, Substitution::Substituted);
    assert_eq!(guest, b"/usr/lib/foo.so");
}

#[test]
fn symmetric_binding_leaves_buffer_alone() {
    let fx = layout();
    let mut sandbox = Sandbox::new(&fx.rootfs, Path::new("/")).expect("sandbox");
    sandbox
        .request_binding(&fx.host_lib, None, true)
        .expect("request");
    let _ = sandbox.finalize_bindings().expect("finalize");

    let query = joined(&fx.host_lib, "/libc.so");
    for direction in [Direction::ToHost, Direction::ToGuest] {
        let mut path = query.clone();
        let outcome = sandbox.substitute(direction, &mut path).expect("substitute");
        assert_eq!(outcome, Substitution::NoSubstitutionNeeded);
        assert_eq!(path, query);
    }
}

#[test]
fn host_root_binding_never_yields_empty_path() {
    let fx = layout();
    let mut sandbox = Sandbox::new(&fx.rootfs, Path::new("/")).expect("sandbox");
    sandbox
        .request_binding(Path::new("/"), Some(Path::new("/mnt/host")), true)
        .expect("request");
    let _ = sandbox.finalize_bindings().expect("finalize");

    let (outcome, path) = sandbox
        .substituted(Direction::ToHost, b"/mnt/host")
        .expect("substitute");
    assert_eq!(outcome, Substitution::Substituted);
    assert_eq!(path, b"/");
}

#[test]
fn component_boundary_is_respected() {
    let fx = layout();
    let mut sandbox = Sandbox::new(&fx.rootfs, Path::new("/")).expect("sandbox");
    sandbox
        .request_binding(&fx.host_lib, Some(Path::new("/usr/lib")), true)
        .expect("request");
    let _ = sandbox.finalize_bindings().expect("finalize");

    let (outcome, path) = sandbox
        .substituted(Direction::ToHost, b"/usr/libfoo")
        .expect("substitute");
    assert_eq!(outcome, Substitution::NotABinding);
    assert_eq!(path, b"/usr/libfoo");
}

#[test]
fn overflow_is_a_failure_not_a_truncation() {
    let fx = layout();
    let mut sandbox = Sandbox::new(&fx.rootfs, Path::new("/")).expect("sandbox");
    sandbox
        .request_binding(&fx.host_lib, Some(Path::new("/l")), true)
        .expect("request");
    let _ = sandbox.finalize_bindings().expect("finalize");

    let mut path = b"/l/".to_vec();
    path.resize(MAX_PATH_LEN - 1, b'x');
    let original = path.clone();
    let err = sandbox
        .substitute(Direction::ToHost, &mut path)
        .unwrap_err();
    assert!(matches!(err, PathbindError::NameTooLong { .. }));
    assert_eq!(path, original);
}

#[test]
fn first_binding_in_table_order_wins() {
    let fx = layout();
    let other = fx.host_lib.join("../other");
    std::fs::create_dir_all(&other).expect("mkdir");
    let mut sandbox = Sandbox::new(&fx.rootfs, Path::new("/")).expect("sandbox");
    sandbox
        .request_binding(&other, Some(Path::new("/usr/lib/other")), true)
        .expect("request");
    sandbox
        .request_binding(&fx.host_lib, Some(Path::new("/usr/lib")), true)
        .expect("request");
    let _ = sandbox.finalize_bindings().expect("finalize");

    // "/…/host/other" sorts before "/…/host/lib", so it is consulted first.
    let (_, path) = sandbox
        .substituted(Direction::ToHost, b"/usr/lib/other/file")
        .expect("substitute");
    let other = std::fs::canonicalize(&other).expect("canonicalize");
    assert_eq!(path, joined(&other, "/file"));
}

// ── Translation ──────────────────────────────────────────────────────

#[test]
fn translate_and_detranslate_unbound_paths() {
    let fx = layout();
    let mut sandbox = Sandbox::new(&fx.rootfs, Path::new("/home")).expect("sandbox");
    let _ = sandbox.finalize_bindings().expect("finalize");

    let host = sandbox
        .translate(Path::new("user/../etc/passwd"), true)
        .expect("translate");
    assert_eq!(host, fx.rootfs.join("home/etc/passwd"));
    assert_eq!(
        sandbox.detranslate(&host).expect("detranslate"),
        PathBuf::from("/home/etc/passwd")
    );
    assert!(sandbox.is_under_real_root(&bytes(&host)));
}

#[test]
fn describe_bindings_lists_both_shapes() {
    let fx = layout();
    let mut sandbox = Sandbox::new(&fx.rootfs, Path::new("/")).expect("sandbox");
    sandbox
        .request_binding(&fx.host_lib, Some(Path::new("/usr/lib")), true)
        .expect("request");
    sandbox
        .request_binding(&fx.host_conf, None, true)
        .expect("request");
    let _ = sandbox.finalize_bindings().expect("finalize");

    let lines = sandbox.describe_bindings();
    assert_eq!(lines.len(), 2);
    let lib = format!("{}:/usr/lib", fx.host_lib.display());
    let conf = fx.host_conf.display().to_string();
    assert!(lines.contains(&lib), "{lines:?}");
    assert!(lines.contains(&conf), "{lines:?}");
}
