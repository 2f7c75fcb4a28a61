//! CLI command definitions and dispatch.

pub mod bindings;
pub mod translate;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pathbind_common::config::{BindSpec, SandboxConfig};
use pathbind_core::sandbox::Sandbox;

/// pathbind — host/guest path bindings without privileges.
#[derive(Parser, Debug)]
#[command(name = "pbind", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Real root onto which the guest view is overlaid.
    #[arg(short, long, global = true, env = "PBIND_ROOTFS")]
    pub rootfs: Option<PathBuf>,

    /// Bind a host path at a guest location (`host[:guest]`), repeatable.
    #[arg(short = 'b', long = "bind", visible_alias = "mount", global = true)]
    pub bindings: Vec<BindSpec>,

    /// Add the recommended host bindings (`/etc/hosts`, `/dev`, `/proc`, ...).
    #[arg(short = 'B', long, global = true)]
    pub recommended: bool,

    /// Initial working directory inside the guest view.
    #[arg(short = 'w', long, global = true)]
    pub cwd: Option<PathBuf>,

    /// JSON configuration file; flags are applied on top of it.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at info level (shows bindings and created mount points).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the finalized bindings.
    Bindings(bindings::BindingsArgs),
    /// Map guest paths to their host location.
    Translate(translate::TranslateArgs),
    /// Map host paths back to the guest view.
    Detranslate(translate::DetranslateArgs),
    /// Run the raw prefix substitution on paths, as the syscall layer does.
    Substitute(translate::SubstituteArgs),
}

impl Cli {
    /// Builds the sandbox configuration from the config file and flags.
    fn sandbox_config(&self) -> anyhow::Result<SandboxConfig> {
        let mut config = match &self.config {
            Some(path) => SandboxConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SandboxConfig::default(),
        };
        if let Some(rootfs) = &self.rootfs {
            config.rootfs.clone_from(rootfs);
        }
        if let Some(cwd) = &self.cwd {
            config.cwd.clone_from(cwd);
        }
        config.recommended |= self.recommended;
        config.bindings.extend(self.bindings.iter().cloned());
        Ok(config)
    }
}

/// Opens and finalizes the sandbox described by the CLI.
fn open_sandbox(cli: &Cli) -> anyhow::Result<Sandbox> {
    let config = cli.sandbox_config()?;
    let mut sandbox = Sandbox::from_config(&config)?;
    let report = sandbox.finalize_bindings()?;
    for failed in report.unusable() {
        tracing::warn!(
            host = %failed.host.display(),
            guest = %failed.guest.display(),
            "binding disabled"
        );
    }
    Ok(sandbox)
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the sandbox cannot be set up or the command fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let sandbox = open_sandbox(&cli)?;
    match cli.command {
        Command::Bindings(args) => bindings::execute(&sandbox, &args),
        Command::Translate(args) => translate::execute(&sandbox, &args),
        Command::Detranslate(args) => translate::execute_reverse(&sandbox, &args),
        Command::Substitute(args) => translate::execute_substitute(&sandbox, &args),
    }
}
