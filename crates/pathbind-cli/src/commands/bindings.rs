//! `pbind bindings` — List the finalized bindings.

use clap::Args;
use pathbind_core::sandbox::Sandbox;

/// Arguments for the `bindings` command.
#[derive(Args, Debug)]
pub struct BindingsArgs {
    /// Also list bindings that failed sanitization.
    #[arg(short, long)]
    pub all: bool,
}

/// Executes the `bindings` command.
///
/// # Errors
///
/// Never fails once the sandbox is open.
#[allow(clippy::print_stdout)]
pub fn execute(sandbox: &Sandbox, args: &BindingsArgs) -> anyhow::Result<()> {
    let lines = sandbox.describe_bindings();
    for (binding, line) in sandbox.bindings().iter().zip(lines) {
        if binding.is_sanitized() {
            println!("{line}");
        } else if args.all {
            println!("{line} (disabled)");
        }
    }
    Ok(())
}
