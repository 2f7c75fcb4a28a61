//! Domain primitive types used across the pathbind workspace.

use std::fmt;

/// Which side of a binding a query path is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The query is a guest path to be rewritten into host form.
    ToHost,
    /// The query is a host path to be rewritten into guest form.
    ToGuest,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToHost => write!(f, "toward-host"),
            Self::ToGuest => write!(f, "toward-guest"),
        }
    }
}

/// Outcome of a successful substitution query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Substitution {
    /// No sanitized binding covers the path. The buffer is untouched.
    NotABinding,
    /// A symmetric binding covers the path. The buffer is untouched.
    NoSubstitutionNeeded,
    /// An asymmetric binding covers the path and its prefix was rewritten.
    Substituted,
}

impl Substitution {
    /// Whether some binding covered the path.
    #[must_use]
    pub const fn is_binding(self) -> bool {
        !matches!(self, Self::NotABinding)
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotABinding => write!(f, "not a binding"),
            Self::NoSubstitutionNeeded => write!(f, "symmetric binding"),
            Self::Substituted => write!(f, "substituted"),
        }
    }
}
