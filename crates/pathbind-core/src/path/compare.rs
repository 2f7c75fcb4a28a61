//! Component-aware comparison of two pathnames.
//!
//! Pure byte comparison, no filesystem access. One trailing separator on
//! either side is ignored, and a prefix only counts when it ends on a
//! component boundary: `/usr/lib` is a prefix of `/usr/lib/x` but not of
//! `/usr/libfoo`.

use pathbind_common::constants::SEPARATOR;

/// Relationship between two pathnames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathComparison {
    /// Both paths name the same location.
    Equal,
    /// The first path is a strict ancestor of the second.
    FirstIsPrefix,
    /// The second path is a strict ancestor of the first.
    SecondIsPrefix,
    /// Neither path contains the other.
    Unrelated,
}

fn strip_trailing_separator(path: &[u8]) -> &[u8] {
    match path.split_last() {
        Some((&SEPARATOR, rest)) => rest,
        _ => path,
    }
}

/// Compares `first` against `second`.
///
/// Slices are compared over their whole length, so a zero-length slice
/// (the whole-root sentinel) is a prefix of every absolute path.
#[must_use]
pub fn compare(first: &[u8], second: &[u8]) -> PathComparison {
    let first = strip_trailing_separator(first);
    let second = strip_trailing_separator(second);
    let common = first.len().min(second.len());

    let sentinel = if first.len() < second.len() {
        second.get(common)
    } else {
        first.get(common)
    };
    if sentinel.is_some_and(|&c| c != SEPARATOR) {
        return PathComparison::Unrelated;
    }
    if first[..common] != second[..common] {
        return PathComparison::Unrelated;
    }

    match first.len().cmp(&second.len()) {
        std::cmp::Ordering::Equal => PathComparison::Equal,
        std::cmp::Ordering::Less => PathComparison::FirstIsPrefix,
        std::cmp::Ordering::Greater => PathComparison::SecondIsPrefix,
    }
}

/// Whether `first` and `second` name the same location.
#[must_use]
pub fn is_equal(first: &[u8], second: &[u8]) -> bool {
    compare(first, second) == PathComparison::Equal
}
