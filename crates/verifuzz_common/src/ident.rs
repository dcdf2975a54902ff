//! Validated Verilog identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated Verilog identifier: a non-empty string matching
/// `[A-Za-z_][A-Za-z0-9_]*`.
///
/// Identifiers order lexicographically (via the derived `Ord`), which the
/// shrinker relies on to pick the smallest in-scope replacement name.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ident(String);

/// Error returned when a string is not a valid Verilog identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier '{0}'")]
pub struct InvalidIdent(pub String);

impl Ident {
    /// Creates an identifier, validating the character set.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidIdent> {
        let s = s.into();
        if Self::is_valid(&s) {
            Ok(Self(s))
        } else {
            Err(InvalidIdent(s))
        }
    }

    /// Returns true if `s` is a well-formed identifier.
    pub fn is_valid(s: &str) -> bool {
        let mut chars = s.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ident({})", self.0)
    }
}

impl TryFrom<String> for Ident {
    type Error = InvalidIdent;

    fn try_from(s: String) -> Result<Self, InvalidIdent> {
        Self::new(s)
    }
}

impl From<Ident> for String {
    fn from(id: Ident) -> String {
        id.0
    }
}
