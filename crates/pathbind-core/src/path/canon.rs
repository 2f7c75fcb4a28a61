//! Canonicalization of guest paths.
//!
//! Resolves `.`, `..` and symbolic links as a program inside the guest view
//! would see them: every intermediate component is looked up on the host
//! through [`GuestView::to_host`], and link targets are read as guest
//! paths. Components that do not exist yet are kept verbatim, so a binding
//! may name a mount point that bootstrap has still to create.

use pathbind_common::constants::SEPARATOR;
use pathbind_common::error::{PathbindError, Result};

use super::translate::GuestView;
use super::{as_path, components, pop_component, probe, push_component};

/// Canonicalizes `path` within `view`.
///
/// Relative paths are resolved against `cwd`, an absolute guest path that
/// is walked like the rest, so its own `.`, `..` and links are resolved
/// too. `..` never climbs above the guest root. When `follow_final` is
/// false a final symbolic link is left as is. At most `budget` links are
/// followed.
///
/// # Errors
///
/// Returns [`PathbindError::SymlinkLoop`] when the link budget runs out, or
/// an error if a host lookup fails for a reason other than a missing entry.
pub fn canonicalize(
    view: &GuestView<'_>,
    cwd: &[u8],
    path: &[u8],
    follow_final: bool,
    budget: usize,
) -> Result<Vec<u8>> {
    let anchored;
    let path = if path.first() == Some(&SEPARATOR) || cwd.is_empty() {
        path
    } else {
        anchored = [cwd, &[SEPARATOR][..], path].concat();
        anchored.as_slice()
    };
    let mut resolved = vec![SEPARATOR];

    let parts: Vec<&[u8]> = components(path).collect();
    for (index, component) in parts.iter().enumerate() {
        match *component {
            b"." => continue,
            b".." => {
                pop_component(&mut resolved);
                continue;
            }
            _ => push_component(&mut resolved, component),
        }

        let is_final = index + 1 == parts.len();
        if is_final && !follow_final {
            continue;
        }

        let host = view.to_host(&resolved)?;
        let Some(target) = probe::read_symlink(as_path(&host))? else {
            continue;
        };
        if budget == 0 {
            return Err(PathbindError::SymlinkLoop {
                path: as_path(path).to_path_buf(),
            });
        }

        tracing::trace!(
            link = %String::from_utf8_lossy(&resolved),
            target = %String::from_utf8_lossy(&target),
            "following guest symlink"
        );
        pop_component(&mut resolved);
        let mut rest = target;
        for remaining in &parts[index + 1..] {
            rest.push(SEPARATOR);
            rest.extend_from_slice(remaining);
        }
        return canonicalize(view, &resolved, &rest, follow_final, budget - 1);
    }

    Ok(resolved)
}
