//! `pbind translate` / `detranslate` / `substitute` — Map paths between views.

use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use clap::Args;
use pathbind_common::types::Direction;
use pathbind_core::sandbox::Sandbox;

use crate::output::{format_mapping, format_substitution};

/// Arguments for the `translate` command.
#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Guest paths, absolute or relative to the guest working directory.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Do not dereference a final symbolic link.
    #[arg(long)]
    pub no_follow: bool,
}

/// Arguments for the `detranslate` command.
#[derive(Args, Debug)]
pub struct DetranslateArgs {
    /// Host paths.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Arguments for the `substitute` command.
#[derive(Args, Debug)]
pub struct SubstituteArgs {
    /// Treat the paths as host paths and rewrite them toward the guest view.
    #[arg(long)]
    pub to_guest: bool,

    /// Absolute paths to rewrite.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Executes the `translate` command.
///
/// # Errors
///
/// Returns an error if a path cannot be translated.
#[allow(clippy::print_stdout)]
pub fn execute(sandbox: &Sandbox, args: &TranslateArgs) -> anyhow::Result<()> {
    for path in &args.paths {
        let host = sandbox.translate(path, !args.no_follow)?;
        println!("{}", format_mapping(path, &host));
    }
    Ok(())
}

/// Executes the `detranslate` command.
///
/// # Errors
///
/// Returns an error if a path cannot be mapped back.
#[allow(clippy::print_stdout)]
pub fn execute_reverse(sandbox: &Sandbox, args: &DetranslateArgs) -> anyhow::Result<()> {
    for path in &args.paths {
        let guest = sandbox.detranslate(path)?;
        println!("{}", format_mapping(path, &guest));
    }
    Ok(())
}

/// Executes the `substitute` command.
///
/// # Errors
///
/// Returns an error if a rewritten path would be too long.
#[allow(clippy::print_stdout)]
pub fn execute_substitute(sandbox: &Sandbox, args: &SubstituteArgs) -> anyhow::Result<()> {
    let direction = if args.to_guest {
        Direction::ToGuest
    } else {
        Direction::ToHost
    };
    for path in &args.paths {
        let (outcome, rewritten) = sandbox.substituted(direction, path.as_os_str().as_bytes())?;
        println!("{}", format_substitution(path, &rewritten, direction, outcome));
    }
    Ok(())
}
