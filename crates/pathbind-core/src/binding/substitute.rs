//! Prefix substitution: the per-syscall hot path.
//!
//! For one query path, the first sanitized binding whose reference side
//! covers it wins; its reference prefix is replaced in place by the other
//! side. No binding past the winner is consulted.

use pathbind_common::constants::{MAX_PATH_LEN, SEPARATOR};
use pathbind_common::error::{PathbindError, Result};
use pathbind_common::types::{Direction, Substitution};

use super::BindingTable;
use crate::path::RealRoot;
use crate::path::compare::{PathComparison, compare};

impl BindingTable {
    /// Rewrites `path` in place according to the first matching binding.
    ///
    /// `direction` picks the side matched against: [`Direction::ToHost`]
    /// reads `path` as a guest path, [`Direction::ToGuest`] as a host path.
    /// On [`Substitution::NotABinding`] and
    /// [`Substitution::NoSubstitutionNeeded`] the buffer is left untouched.
    /// The rewrite never shrinks to an empty path: it becomes `/` instead.
    ///
    /// # Errors
    ///
    /// Returns [`PathbindError::NameTooLong`] if the rewritten path would
    /// reach [`MAX_PATH_LEN`]; the buffer is then left untouched.
    pub fn substitute(
        &self,
        root: &RealRoot,
        direction: Direction,
        path: &mut Vec<u8>,
    ) -> Result<Substitution> {
        for binding in self.iter().filter(|b| b.is_sanitized()) {
            let (reference, replacement) = binding.sides(direction);

            match compare(reference.prefix(), path.as_slice()) {
                PathComparison::Equal | PathComparison::FirstIsPrefix => {}
                PathComparison::SecondIsPrefix | PathComparison::Unrelated => continue,
            }

            // Paths already under a non-trivial real root are guest-shaped;
            // rewriting them as host paths would map them twice.
            if direction == Direction::ToGuest
                && !root.is_host_root()
                && root.contains(path.as_slice())
            {
                continue;
            }

            let query_length = if reference.is_empty() && path.len() == 1 {
                0
            } else {
                path.len()
            };

            if !binding.needs_substitution() {
                return Ok(Substitution::NoSubstitutionNeeded);
            }

            let suffix_start = reference.len().min(query_length);
            let new_length = query_length - suffix_start + replacement.len();
            if new_length >= MAX_PATH_LEN {
                tracing::warn!(
                    binding = %binding,
                    length = new_length,
                    "can't handle binding: pathname too long"
                );
                return Err(PathbindError::NameTooLong {
                    length: new_length,
                    max: MAX_PATH_LEN,
                });
            }

            path.truncate(query_length);
            let _ = path.splice(..suffix_start, replacement.prefix().iter().copied());
            if path.is_empty() {
                path.push(SEPARATOR);
            }
            return Ok(Substitution::Substituted);
        }

        Ok(Substitution::NotABinding)
    }

    /// Allocating variant of [`BindingTable::substitute`].
    ///
    /// # Errors
    ///
    /// Returns [`PathbindError::NameTooLong`] if the rewritten path would
    /// reach [`MAX_PATH_LEN`].
    pub fn substituted(
        &self,
        root: &RealRoot,
        direction: Direction,
        path: &[u8],
    ) -> Result<(Substitution, Vec<u8>)> {
        let mut buffer = path.to_vec();
        let outcome = self.substitute(root, direction, &mut buffer)?;
        Ok((outcome, buffer))
    }
}
