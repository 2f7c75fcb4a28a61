//! Formatted output helpers for CLI commands.

use std::path::Path;

use pathbind_common::types::{Direction, Substitution};

/// Formats one path mapping as `from -> to`.
#[must_use]
pub fn format_mapping(from: &Path, to: &Path) -> String {
    format!("{} -> {}", from.display(), to.display())
}

/// Formats a raw substitution, tagged with its direction and outcome.
#[must_use]
pub fn format_substitution(
    from: &Path,
    to: &[u8],
    direction: Direction,
    outcome: Substitution,
) -> String {
    if outcome.is_binding() {
        format!(
            "{} -> {} [{direction}, {outcome}]",
            from.display(),
            String::from_utf8_lossy(to)
        )
    } else {
        format!("{} [{direction}, {outcome}]", from.display())
    }
}
